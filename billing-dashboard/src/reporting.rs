use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aging::AgingBucket;
use crate::claims;
use crate::models::{ArRecord, Claim, Credit, OfficeRecords, Wallet};

/// Stored claim statuses that count as pending. Matched case-sensitively.
pub const PENDING_CLAIM_STATUSES: [&str; 2] = ["pending", "submitted"];

/// Stored credit status that counts as unresolved. Matched case-sensitively.
pub const UNRESOLVED_CREDIT_STATUS: &str = "unresolved";

/// A/R balance per aging bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    #[serde(rename = "0-30")]
    pub days_0_30: Decimal,
    #[serde(rename = "31-60")]
    pub days_31_60: Decimal,
    #[serde(rename = "61-90")]
    pub days_61_90: Decimal,
    #[serde(rename = "90+")]
    pub days_90_plus: Decimal,
}

impl BucketTotals {
    pub fn get(&self, bucket: AgingBucket) -> Decimal {
        match bucket {
            AgingBucket::Days0To30 => self.days_0_30,
            AgingBucket::Days31To60 => self.days_31_60,
            AgingBucket::Days61To90 => self.days_61_90,
            AgingBucket::Days90Plus => self.days_90_plus,
        }
    }

    fn slot(&mut self, bucket: AgingBucket) -> &mut Decimal {
        match bucket {
            AgingBucket::Days0To30 => &mut self.days_0_30,
            AgingBucket::Days31To60 => &mut self.days_31_60,
            AgingBucket::Days61To90 => &mut self.days_61_90,
            AgingBucket::Days90Plus => &mut self.days_90_plus,
        }
    }

    pub fn total(&self) -> Decimal {
        sum_amounts(self.iter().map(|(_, amount)| amount))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgingBucket, Decimal)> + '_ {
        AgingBucket::ALL.into_iter().map(move |bucket| (bucket, self.get(bucket)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimStats {
    pub total_claims: Decimal,
    pub pending_claims: usize,
    pub claims_count: usize,
    pub overdue_claims: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArStats {
    pub total_ar: Decimal,
    pub ar_by_bucket: BucketTotals,
    pub ar_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreditStats {
    pub total_credits: Decimal,
    pub unresolved_credits: usize,
    pub credits_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletStats {
    pub total_wallets: Decimal,
    pub wallets_count: usize,
}

/// Dashboard summary, recomputed on every load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub claims: ClaimStats,
    #[serde(flatten)]
    pub receivables: ArStats,
    #[serde(flatten)]
    pub credits: CreditStats,
    #[serde(flatten)]
    pub wallets: WalletStats,
}

/// Sum of money amounts. Saturates at `Decimal::MAX`/`MIN` instead of
/// overflowing, so a corrupt balance can skew a total but never abort a load.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Claims with a submission date before `overdue_cutoff` count as overdue
pub fn claim_stats(claims: &[Claim], overdue_cutoff: NaiveDate) -> ClaimStats {
    ClaimStats {
        total_claims: sum_amounts(claims.iter().map(|c| c.amount)),
        pending_claims: claims
            .iter()
            .filter(|c| PENDING_CLAIM_STATUSES.contains(&c.status.as_str()))
            .count(),
        claims_count: claims.len(),
        overdue_claims: claims::count_overdue(claims, overdue_cutoff),
    }
}

pub fn ar_stats(records: &[ArRecord]) -> ArStats {
    let mut by_bucket = BucketTotals::default();
    for record in records {
        let slot = by_bucket.slot(record.bucket());
        *slot = slot.saturating_add(record.balance);
    }

    ArStats {
        total_ar: sum_amounts(records.iter().map(|r| r.balance)),
        ar_by_bucket: by_bucket,
        ar_count: records.len(),
    }
}

pub fn credit_stats(credits: &[Credit]) -> CreditStats {
    CreditStats {
        total_credits: sum_amounts(credits.iter().map(|c| c.balance)),
        unresolved_credits: credits
            .iter()
            .filter(|c| c.status == UNRESOLVED_CREDIT_STATUS)
            .count(),
        credits_count: credits.len(),
    }
}

pub fn wallet_stats(wallets: &[Wallet]) -> WalletStats {
    WalletStats {
        total_wallets: sum_amounts(wallets.iter().map(|w| w.balance)),
        wallets_count: wallets.len(),
    }
}

pub fn summarize(records: &OfficeRecords, overdue_cutoff: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        claims: claim_stats(&records.claims, overdue_cutoff),
        receivables: ar_stats(&records.ar_records),
        credits: credit_stats(&records.credits),
        wallets: wallet_stats(&records.wallets),
    }
}
