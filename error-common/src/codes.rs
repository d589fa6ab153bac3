// Error codes implementation
// Stable codes surfaced by the CLI and in structured logs

pub mod validation {
    pub const INVALID_RECORD: &str = "VALIDATION_1001";
}

pub mod authentication {
    pub const NOT_SIGNED_IN: &str = "AUTH_2001";
    pub const NO_OFFICE_MEMBERSHIP: &str = "AUTH_2002";
}

pub mod data {
    pub const FETCH_FAILED: &str = "DATA_4001";
    pub const DECODE_FAILED: &str = "DATA_4002";
    pub const FIXTURE_UNREADABLE: &str = "DATA_4003";
}

pub mod configuration {
    pub const INVALID_CONFIG: &str = "CONFIG_5001";
}
