//! Review flags and dashboard action items.
//!
//! Flags follow the office's auto-flagging rules and carrier rules from the
//! settings screen; action items are the short "needs attention" list on the
//! dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aging::AgingBucket;
use crate::models::{ArRecord, Claim, ClaimStatus};

/// Auto-flagging rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFlagRules {
    /// Flag every denied claim
    pub flag_denied: bool,
    /// Flag claims above `high_value_threshold`
    pub flag_high_value: bool,
    pub high_value_threshold: Decimal,
}

impl Default for AutoFlagRules {
    fn default() -> Self {
        Self {
            flag_denied: true,
            flag_high_value: false,
            high_value_threshold: Decimal::from(1000),
        }
    }
}

/// Special handling for one insurer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRule {
    pub insurer: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FlagReason {
    Denied { status: ClaimStatus },
    HighValue { amount: Decimal, threshold: Decimal },
    Carrier { insurer: String, note: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedClaim {
    pub claim_id: String,
    pub reasons: Vec<FlagReason>,
}

/// Claims matching at least one rule, in input order
pub fn flag_claims(claims: &[Claim], rules: &AutoFlagRules, carriers: &[CarrierRule]) -> Vec<FlaggedClaim> {
    claims
        .iter()
        .filter_map(|claim| {
            let reasons = reasons_for(claim, rules, carriers);
            (!reasons.is_empty()).then(|| FlaggedClaim {
                claim_id: claim.id.clone(),
                reasons,
            })
        })
        .collect()
}

fn reasons_for(claim: &Claim, rules: &AutoFlagRules, carriers: &[CarrierRule]) -> Vec<FlagReason> {
    let mut reasons = Vec::new();
    let status = claim.display_status();

    if rules.flag_denied && status.is_denied() {
        reasons.push(FlagReason::Denied { status });
    }

    if rules.flag_high_value && claim.amount > rules.high_value_threshold {
        reasons.push(FlagReason::HighValue {
            amount: claim.amount,
            threshold: rules.high_value_threshold,
        });
    }

    let insurer = claim.insurance_company.trim();
    for carrier in carriers {
        if carrier.insurer.trim().eq_ignore_ascii_case(insurer) {
            reasons.push(FlagReason::Carrier {
                insurer: carrier.insurer.clone(),
                note: carrier.note.clone(),
            });
        }
    }

    reasons
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ClaimDenied,
    InfoRequested,
    ArOver90Days,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub kind: ActionKind,
    pub record_id: String,
    pub patient_name: String,
}

impl ActionItem {
    pub fn message(&self) -> String {
        match self.kind {
            ActionKind::ClaimDenied => {
                format!("Claim #{} for {} was denied.", self.record_id, self.patient_name)
            }
            ActionKind::InfoRequested => format!(
                "Information requested for Claim #{} ({}).",
                self.record_id, self.patient_name
            ),
            ActionKind::ArOver90Days => format!("AR for {} is over 90 days.", self.patient_name),
        }
    }
}

/// Denied and info-requested claims, then A/R accounts past 90 days
pub fn action_items(claims: &[Claim], ar_records: &[ArRecord]) -> Vec<ActionItem> {
    let claim_items = claims.iter().filter_map(|claim| {
        let kind = match claim.display_status() {
            status if status.is_denied() => ActionKind::ClaimDenied,
            ClaimStatus::InfoRequested => ActionKind::InfoRequested,
            _ => return None,
        };
        Some(ActionItem {
            kind,
            record_id: claim.id.clone(),
            patient_name: claim.patient_name.clone(),
        })
    });

    let ar_items = ar_records
        .iter()
        .filter(|record| record.bucket() == AgingBucket::Days90Plus)
        .map(|record| ActionItem {
            kind: ActionKind::ArOver90Days,
            record_id: record.id.clone(),
            patient_name: record.patient_name.clone(),
        });

    claim_items.chain(ar_items).collect()
}
