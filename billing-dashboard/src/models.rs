use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aging::{self, AgingBucket, WalletAgeTier};

/// Tenant scope: every record belongs to exactly one office
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficeId(pub String);

impl OfficeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfficeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfficeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The signed-in user, as handed over by the authentication boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// A user's membership in an office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeMembership {
    pub office_id: OfficeId,
    pub office_name: String,
    #[serde(default)]
    pub role: String,
}

/// The record collections a dashboard is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Claims,
    ArRecords,
    Credits,
    Wallets,
    Memberships,
}

impl Collection {
    /// Table name in the hosted store
    pub fn table(&self) -> &'static str {
        match self {
            Self::Claims => "claims",
            Self::ArRecords => "ar_records",
            Self::Credits => "credits",
            Self::Wallets => "wallets",
            Self::Memberships => "office_memberships",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// Anything shown as a table row with a checkbox
pub trait Row {
    fn row_id(&self) -> &str;
}

/// Claim status as displayed. Stored values are kept raw on [`Claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "Submitted")]
    Submitted,
    #[serde(rename = "Paid")]
    Paid,
    #[serde(rename = "Denied")]
    Denied,
    #[serde(rename = "Resubmitted - No Claim on file")]
    ResubmittedNoClaim,
    #[serde(rename = "Appeal 1 Submitted")]
    Appeal1Submitted,
    #[serde(rename = "Claim Denied - Pt Resp")]
    ClaimDeniedPtResp,
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Pre-Authorization")]
    PreAuthorization,
    #[serde(rename = "Secondary Claim")]
    SecondaryClaim,
    #[serde(rename = "Info Requested")]
    InfoRequested,
    #[serde(rename = "Corrected Claim")]
    CorrectedClaim,
    #[serde(rename = "Tracer")]
    Tracer,
    #[serde(rename = "EOB Received")]
    EobReceived,
    #[serde(rename = "In Review")]
    InReview,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Other")]
    Other,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 16] = [
        Self::Submitted,
        Self::Paid,
        Self::Denied,
        Self::ResubmittedNoClaim,
        Self::Appeal1Submitted,
        Self::ClaimDeniedPtResp,
        Self::Pending,
        Self::PreAuthorization,
        Self::SecondaryClaim,
        Self::InfoRequested,
        Self::CorrectedClaim,
        Self::Tracer,
        Self::EobReceived,
        Self::InReview,
        Self::Closed,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Paid => "Paid",
            Self::Denied => "Denied",
            Self::ResubmittedNoClaim => "Resubmitted - No Claim on file",
            Self::Appeal1Submitted => "Appeal 1 Submitted",
            Self::ClaimDeniedPtResp => "Claim Denied - Pt Resp",
            Self::Pending => "Pending",
            Self::PreAuthorization => "Pre-Authorization",
            Self::SecondaryClaim => "Secondary Claim",
            Self::InfoRequested => "Info Requested",
            Self::CorrectedClaim => "Corrected Claim",
            Self::Tracer => "Tracer",
            Self::EobReceived => "EOB Received",
            Self::InReview => "In Review",
            Self::Closed => "Closed",
            Self::Other => "Other",
        }
    }

    /// Map a stored or displayed status onto the display enumeration.
    ///
    /// Case, `_`/`-` separators and extra whitespace are ignored, so
    /// `"info_requested"`, `"Info Requested"` and `"INFO-REQUESTED"` agree.
    /// Anything unrecognised is `Other`.
    pub fn parse(raw: &str) -> Self {
        let key = normalize(raw);
        if key == "resubmitted no claim" {
            return Self::ResubmittedNoClaim;
        }
        if key == "preauthorization" {
            return Self::PreAuthorization;
        }
        Self::ALL
            .into_iter()
            .find(|status| normalize(status.label()) == key)
            .unwrap_or(Self::Other)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied | Self::ClaimDeniedPtResp)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Collection status of an A/R account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArStatus {
    #[default]
    #[serde(rename = "None", alias = "none")]
    None,
    #[serde(rename = "In Collections", alias = "in_collections")]
    InCollections,
    #[serde(rename = "Payment Plan", alias = "payment_plan")]
    PaymentPlan,
    #[serde(rename = "Promise to Pay", alias = "promise_to_pay")]
    PromiseToPay,
    #[serde(rename = "Paid In Full", alias = "paid_in_full")]
    PaidInFull,
}

impl ArStatus {
    pub const ALL: [ArStatus; 5] = [
        Self::None,
        Self::InCollections,
        Self::PaymentPlan,
        Self::PromiseToPay,
        Self::PaidInFull,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::InCollections => "In Collections",
            Self::PaymentPlan => "Payment Plan",
            Self::PromiseToPay => "Promise to Pay",
            Self::PaidInFull => "Paid In Full",
        }
    }

    /// Same normalisation as [`ClaimStatus::parse`], but unknown values are `None`
    /// so the caller can reject the record.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = normalize(raw);
        if key.is_empty() {
            return Some(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|status| normalize(status.label()) == key)
    }
}

impl fmt::Display for ArStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditStatus {
    Active,
    Applied,
    Refunded,
}

impl CreditStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Applied => "Applied",
            Self::Refunded => "Refunded",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "active" => Some(Self::Active),
            "applied" => Some(Self::Applied),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Insurance claim filed by the office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub patient_name: String,
    pub insurance_company: String,
    pub amount: Decimal,
    /// Status exactly as stored (lower-case in the hosted store)
    pub status: String,
    pub submitted_date: NaiveDate,
    pub last_updated: NaiveDate,
}

impl Claim {
    pub fn display_status(&self) -> ClaimStatus {
        ClaimStatus::parse(&self.status)
    }
}

impl Row for Claim {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Accounts-receivable balance for one patient.
///
/// The aging bucket is always derived from `age_days`, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArRecord {
    pub id: String,
    pub patient_name: String,
    pub balance: Decimal,
    pub age_days: u32,
    #[serde(default)]
    pub status: ArStatus,
    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,
}

impl ArRecord {
    pub fn bucket(&self) -> AgingBucket {
        aging::classify_ar_bucket(self.age_days)
    }
}

impl Row for ArRecord {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Patient credit on account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: String,
    pub patient_name: String,
    pub balance: Decimal,
    /// Status exactly as stored
    pub status: String,
    #[serde(default)]
    pub last_appt: Option<NaiveDate>,
    #[serde(default)]
    pub next_appt: Option<NaiveDate>,
    #[serde(default)]
    pub credit_year: Option<i32>,
    #[serde(default)]
    pub insurance_balance: Decimal,
    #[serde(default)]
    pub wallet_balance: Decimal,
    #[serde(default)]
    pub outstanding_claim: Decimal,
    #[serde(default)]
    pub date_changed: Option<NaiveDate>,
    #[serde(default)]
    pub team_member: Option<String>,
}

impl Credit {
    pub fn display_status(&self) -> Option<CreditStatus> {
        CreditStatus::parse(&self.status)
    }
}

impl Row for Credit {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Prepaid patient wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    pub patient_name: String,
    pub balance: Decimal,
    pub last_used_date: NaiveDate,
}

impl Wallet {
    /// Days since last use; a last-used date after `today` counts as zero
    pub fn age_days(&self, today: NaiveDate) -> u32 {
        aging::days_since(self.last_used_date, today)
    }

    pub fn age_tier(&self, today: NaiveDate) -> WalletAgeTier {
        aging::classify_wallet_tier(self.age_days(today))
    }
}

impl Row for Wallet {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// All four collections for one office
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficeRecords {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub ar_records: Vec<ArRecord>,
    #[serde(default)]
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
}

fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .replace(|c| c == '_' || c == '-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_status_parses_stored_and_display_forms() {
        assert_eq!(ClaimStatus::parse("pending"), ClaimStatus::Pending);
        assert_eq!(ClaimStatus::parse("Info Requested"), ClaimStatus::InfoRequested);
        assert_eq!(ClaimStatus::parse("info_requested"), ClaimStatus::InfoRequested);
        assert_eq!(ClaimStatus::parse("EOB-RECEIVED"), ClaimStatus::EobReceived);
        assert_eq!(
            ClaimStatus::parse("Resubmitted - No Claim on file"),
            ClaimStatus::ResubmittedNoClaim
        );
        assert_eq!(ClaimStatus::parse("resubmitted_no_claim"), ClaimStatus::ResubmittedNoClaim);
        assert_eq!(ClaimStatus::parse("pre_authorization"), ClaimStatus::PreAuthorization);
        assert_eq!(ClaimStatus::parse("claim_denied_pt_resp"), ClaimStatus::ClaimDeniedPtResp);
        assert_eq!(ClaimStatus::parse("something new"), ClaimStatus::Other);
    }

    #[test]
    fn test_every_claim_label_round_trips() {
        for status in ClaimStatus::ALL {
            assert_eq!(ClaimStatus::parse(status.label()), status);
        }
    }

    #[test]
    fn test_claim_status_serializes_as_label() {
        let json = serde_json::to_string(&ClaimStatus::ClaimDeniedPtResp).unwrap();
        assert_eq!(json, "\"Claim Denied - Pt Resp\"");
    }

    #[test]
    fn test_ar_status_parse() {
        assert_eq!(ArStatus::parse("in_collections"), Some(ArStatus::InCollections));
        assert_eq!(ArStatus::parse("Promise to Pay"), Some(ArStatus::PromiseToPay));
        assert_eq!(ArStatus::parse(""), Some(ArStatus::None));
        assert_eq!(ArStatus::parse("written off"), None);
    }

    #[test]
    fn test_ar_status_accepts_snake_case_in_json() {
        let status: ArStatus = serde_json::from_str("\"payment_plan\"").unwrap();
        assert_eq!(status, ArStatus::PaymentPlan);
    }

    #[test]
    fn test_credit_status_is_optional_display() {
        let mut credit = Credit {
            id: "CR001".into(),
            patient_name: "Jennifer King".into(),
            balance: Decimal::from(50),
            status: "Active".into(),
            last_appt: None,
            next_appt: None,
            credit_year: None,
            insurance_balance: Decimal::ZERO,
            wallet_balance: Decimal::ZERO,
            outstanding_claim: Decimal::ZERO,
            date_changed: None,
            team_member: None,
        };
        assert_eq!(credit.display_status(), Some(CreditStatus::Active));

        credit.status = "unresolved".into();
        assert_eq!(credit.display_status(), None);
    }
}
