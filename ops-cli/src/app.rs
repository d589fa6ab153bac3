use std::sync::Arc;
use std::time::Duration;

use billing_dashboard::{
    AuthenticatedUser, DashboardService, HostedRecordSource, InMemoryRecordSource, OfficeView, RecordSource,
};
use chrono::Local;
use config_engine::{ClarteConfig, RecordSourceKind};
use error_common::{ClarteError, Result};
use logger_redacted::{PiiRedactor, RedactionConfig};
use tracing::{debug, info};

use crate::cli::{Cli, Command};
use crate::render::Renderer;

/// Load configuration for this invocation. `--fixture` switches the record
/// source to that file before validation.
pub fn load_config(cli: &Cli) -> Result<ClarteConfig> {
    let mut config =
        ClarteConfig::load_unchecked(cli.config.as_deref()).map_err(|e| ClarteError::Config(e.to_string()))?;

    if let Some(path) = &cli.fixture {
        config.record_source.kind = RecordSourceKind::Fixture;
        config.record_source.fixture_path = Some(path.clone());
    }
    if cli.verbose {
        config.logging.log_level = "debug".to_string();
    }

    config.validate().map_err(|e| ClarteError::Config(e.to_string()))?;
    Ok(config)
}

/// Build the configured record source. Takes the API key out of `config`.
pub async fn build_source(config: &mut ClarteConfig) -> Result<Arc<dyn RecordSource>> {
    let settings = &mut config.record_source;
    match settings.kind {
        RecordSourceKind::Fixture => {
            let path = settings
                .fixture_path
                .as_ref()
                .ok_or_else(|| ClarteError::Config("record_source.fixture_path is required".to_string()))?;
            info!("Reading records from fixture {}", path.display());
            Ok(Arc::new(InMemoryRecordSource::load(path).await?))
        }
        RecordSourceKind::Hosted => {
            let url = settings
                .url
                .clone()
                .ok_or_else(|| ClarteError::Config("record_source.url is required".to_string()))?;
            let api_key = settings
                .api_key
                .take()
                .ok_or_else(|| ClarteError::Config("record_source.api_key is required".to_string()))?;
            let redactor = PiiRedactor::new(RedactionConfig::from_logger_config(&config.logging));

            info!("Reading records from {}", url);
            let source = HostedRecordSource::new(
                url,
                api_key,
                Duration::from_secs(settings.timeout_seconds),
                redactor,
            )?;
            Ok(Arc::new(source))
        }
    }
}

/// Run one command and return what should be printed
pub async fn execute(cli: &Cli, mut config: ClarteConfig) -> Result<String> {
    let source = build_source(&mut config).await?;
    let options = config.dashboard_options();
    let window = options.recent_claim_window_days;
    let service = DashboardService::new(source, options);

    let user = cli.user.as_deref().map(AuthenticatedUser::new);
    let today = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    debug!("Loading dashboard as of {}", today);

    let mut view = OfficeView::new(window);
    view.reload(&service, user.as_ref(), today).await?;

    match &cli.command {
        Command::Claims { tab, search } => {
            view.set_claims_tab(tab);
            view.set_claims_search(search.as_str());
        }
        Command::Receivables { tab } => view.set_ar_tab(tab),
        Command::Ledger { tab } => view.set_ledger_tab(tab),
        Command::Summary | Command::Flags => {}
    }

    Renderer {
        json: cli.json,
        mask_names: cli.mask_names,
    }
    .render(&view, &cli.command)
}
