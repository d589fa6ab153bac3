use clap::Parser;
use error_common::{log_error, ClarteError, Result};
use logger_redacted::init_logging;

use ops_cli::{execute, load_config, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.logging).map_err(|e| ClarteError::Logging(e.to_string()))?;

    match execute(&cli, config).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            log_error("clarte", &err);
            Err(err)
        }
    }
}
