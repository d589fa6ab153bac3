use serde::{Deserialize, Serialize};

use crate::aging::AgingBucket;
use crate::models::ArRecord;

/// Tabs on the accounts-receivable screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArTab {
    #[default]
    All,
    Bucket(AgingBucket),
}

impl ArTab {
    pub const ALL: [ArTab; 5] = [
        Self::All,
        Self::Bucket(AgingBucket::Days0To30),
        Self::Bucket(AgingBucket::Days31To60),
        Self::Bucket(AgingBucket::Days61To90),
        Self::Bucket(AgingBucket::Days90Plus),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Bucket(AgingBucket::Days0To30) => "0-30 Days",
            Self::Bucket(AgingBucket::Days31To60) => "31-60 Days",
            Self::Bucket(AgingBucket::Days61To90) => "61-90 Days",
            Self::Bucket(AgingBucket::Days90Plus) => "90+ Days",
        }
    }

    /// Parse a tab label ("61-90 Days") or a bare bucket label ("61-90").
    /// Unknown labels select `All`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(label))
            .or_else(|| AgingBucket::from_label(label).map(Self::Bucket))
            .unwrap_or(Self::All)
    }
}

pub fn filter_ar(records: &[ArRecord], tab: ArTab) -> Vec<ArRecord> {
    match tab {
        ArTab::All => records.to_vec(),
        ArTab::Bucket(bucket) => records
            .iter()
            .filter(|record| record.bucket() == bucket)
            .cloned()
            .collect(),
    }
}

pub fn filter_ar_by_label(records: &[ArRecord], label: &str) -> Vec<ArRecord> {
    filter_ar(records, ArTab::from_label(label))
}
