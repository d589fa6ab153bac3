// Logging macros that pass the formatted message through a redactor

#[macro_export]
macro_rules! redacted_warn {
    ($redactor:expr, $($arg:tt)*) => {
        tracing::warn!("{}", $redactor.redact(&format!($($arg)*)))
    };
}
