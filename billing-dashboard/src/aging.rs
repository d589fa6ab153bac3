//! Aging classification for A/R balances and patient wallets.
//!
//! A/R buckets use inclusive upper bounds (30, 60, 90). Wallet tiers sit one
//! day earlier (29, 59, 89). Both conventions are what offices see on their
//! statements, so the two must stay different.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::models::Collection;

/// A/R aging bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgingBucket {
    #[serde(rename = "0-30")]
    Days0To30,
    #[serde(rename = "31-60")]
    Days31To60,
    #[serde(rename = "61-90")]
    Days61To90,
    #[serde(rename = "90+")]
    Days90Plus,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 4] = [
        Self::Days0To30,
        Self::Days31To60,
        Self::Days61To90,
        Self::Days90Plus,
    ];

    /// Label as stored in the `aging_bucket` column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Days0To30 => "0-30",
            Self::Days31To60 => "31-60",
            Self::Days61To90 => "61-90",
            Self::Days90Plus => "90+",
        }
    }

    /// Parse a stored `aging_bucket` value
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|bucket| bucket.label() == label)
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wallet activity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WalletAgeTier {
    #[serde(rename = "Active (0-29 days)")]
    Active,
    #[serde(rename = "Recent (30-59 days)")]
    Recent,
    #[serde(rename = "Inactive (60-89 days)")]
    Inactive,
    #[serde(rename = "Stale (90+ days)")]
    Stale,
}

impl WalletAgeTier {
    pub const ALL: [WalletAgeTier; 4] = [Self::Active, Self::Recent, Self::Inactive, Self::Stale];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active (0-29 days)",
            Self::Recent => "Recent (30-59 days)",
            Self::Inactive => "Inactive (60-89 days)",
            Self::Stale => "Stale (90+ days)",
        }
    }
}

impl fmt::Display for WalletAgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_ar_bucket(age_days: u32) -> AgingBucket {
    match age_days {
        0..=30 => AgingBucket::Days0To30,
        31..=60 => AgingBucket::Days31To60,
        61..=90 => AgingBucket::Days61To90,
        _ => AgingBucket::Days90Plus,
    }
}

pub fn classify_wallet_tier(age_days: u32) -> WalletAgeTier {
    match age_days {
        0..=29 => WalletAgeTier::Active,
        30..=59 => WalletAgeTier::Recent,
        60..=89 => WalletAgeTier::Inactive,
        _ => WalletAgeTier::Stale,
    }
}

/// Ingestion guard for a raw A/R age.
pub fn validate_ar_age(record_id: &str, age: i64) -> DashboardResult<u32> {
    u32::try_from(age).map_err(|_| DashboardError::InvalidRecord {
        collection: Collection::ArRecords,
        record_id: record_id.to_string(),
        reason: format!("age must be a non-negative day count, got {age}"),
    })
}

/// Whole days from `since` to `today`, zero when `since` is in the future
pub fn days_since(since: NaiveDate, today: NaiveDate) -> u32 {
    let days = today.signed_duration_since(since).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
