use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Claim;

/// Claims submitted within this many days are "recent" (OI 0-30)
pub const RECENT_CLAIM_WINDOW_DAYS: u32 = 30;

/// Tabs on the claims screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimsTab {
    /// "OI 0-30": submitted on or after the cutoff
    #[default]
    Recent,
    /// "OI 30+": submitted before the cutoff
    Older,
    /// Unrecognised tab, nothing filtered
    All,
}

impl ClaimsTab {
    pub const RECENT_LABEL: &'static str = "OI 0-30";
    pub const OLDER_LABEL: &'static str = "OI 30+";

    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case(Self::RECENT_LABEL) {
            Self::Recent
        } else if label.eq_ignore_ascii_case(Self::OLDER_LABEL) {
            Self::Older
        } else {
            Self::All
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Recent => Self::RECENT_LABEL,
            Self::Older => Self::OLDER_LABEL,
            Self::All => "All",
        }
    }
}

/// First submission date that still counts as recent
pub fn recent_cutoff(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Claims visible under `tab`, narrowed by a free-text search.
///
/// The search matches patient or insurer name as a case-insensitive
/// substring. A blank search matches everything.
pub fn filter_claims(claims: &[Claim], tab: ClaimsTab, search: &str, cutoff: NaiveDate) -> Vec<Claim> {
    let needle = search.trim().to_lowercase();

    claims
        .iter()
        .filter(|claim| match tab {
            ClaimsTab::Recent => claim.submitted_date >= cutoff,
            ClaimsTab::Older => claim.submitted_date < cutoff,
            ClaimsTab::All => true,
        })
        .filter(|claim| needle.is_empty() || matches_search(claim, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lower-case
fn matches_search(claim: &Claim, needle: &str) -> bool {
    claim.patient_name.to_lowercase().contains(needle)
        || claim.insurance_company.to_lowercase().contains(needle)
}

/// Claims still open past the recent window
pub fn count_overdue(claims: &[Claim], cutoff: NaiveDate) -> usize {
    claims.iter().filter(|claim| claim.submitted_date < cutoff).count()
}
