use std::path::PathBuf;

use billing_dashboard::{ArTab, ClaimsTab, LedgerTab};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Billing dashboard for dental offices
#[derive(Parser, Debug)]
#[command(name = "clarte", version)]
#[command(about = "Claims, A/R aging, credits and wallets for your office")]
pub struct Cli {
    /// Configuration file (YAML or TOML)
    #[arg(short, long, env = "CLARTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read records from a JSON fixture instead of the hosted store
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Signed-in user id; without it the dashboard shows the signed-out state
    #[arg(short, long, env = "CLARTE_USER")]
    pub user: Option<String>,

    /// Date to age records against (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Show patient initials only
    #[arg(long)]
    pub mask_names: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dashboard totals, action items and load failures
    Summary,

    /// Insurance claims
    Claims {
        /// "OI 0-30" or "OI 30+"; anything else shows every claim
        #[arg(long, default_value = ClaimsTab::RECENT_LABEL)]
        tab: String,

        /// Patient or insurer name, any case
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Accounts receivable by aging bucket
    Receivables {
        /// "All", "0-30 Days", "31-60 Days", "61-90 Days" or "90+ Days"
        #[arg(long, default_value = "All")]
        tab: String,
    },

    /// Patient credits or wallets
    Ledger {
        /// "Credits" or "Wallets"
        #[arg(long, default_value = "Credits")]
        tab: String,
    },

    /// Claims matching the auto-flag and carrier rules
    Flags,
}

impl Command {
    /// Canonical tab label for the screen, for display
    pub fn tab_label(&self) -> Option<&'static str> {
        match self {
            Self::Claims { tab, .. } => Some(ClaimsTab::from_label(tab).label()),
            Self::Receivables { tab } => Some(ArTab::from_label(tab).label()),
            Self::Ledger { tab } => Some(LedgerTab::from_label(tab).label()),
            Self::Summary | Self::Flags => None,
        }
    }
}
