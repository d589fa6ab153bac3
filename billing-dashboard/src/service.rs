use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::claims::{self, RECENT_CLAIM_WINDOW_DAYS};
use crate::error::{DashboardError, DashboardResult};
use crate::flagging::{self, ActionItem, AutoFlagRules, CarrierRule, FlaggedClaim};
use crate::models::{ArRecord, AuthenticatedUser, Claim, Collection, Credit, OfficeMembership, Wallet};
use crate::reporting::{self, ArStats, ClaimStats, CreditStats, WalletStats};
use crate::source::RecordSource;

/// Per-office dashboard settings
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub recent_claim_window_days: u32,
    pub flag_rules: AutoFlagRules,
    pub carrier_rules: Vec<CarrierRule>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            recent_claim_window_days: RECENT_CLAIM_WINDOW_DAYS,
            flag_rules: AutoFlagRules::default(),
            carrier_rules: Vec::new(),
        }
    }
}

/// Why a collection could not be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub collection: Collection,
    pub message: String,
    pub code: &'static str,
}

impl LoadFailure {
    fn from_error(collection: Collection, err: &DashboardError) -> Self {
        Self {
            collection: err.collection().unwrap_or(collection),
            message: err.to_string(),
            code: err.code(),
        }
    }
}

/// Outcome of fetching one collection. An empty `Loaded` is a valid result,
/// not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionLoad<T> {
    Loaded(Vec<T>),
    Failed(LoadFailure),
}

impl<T> CollectionLoad<T> {
    pub fn from_result(collection: Collection, result: DashboardResult<Vec<T>>) -> Self {
        match result {
            Ok(records) => Self::Loaded(records),
            Err(err) => {
                warn!("Failed to load {}: {}", collection, err);
                Self::Failed(LoadFailure::from_error(collection, &err))
            }
        }
    }

    pub fn records(&self) -> Option<&[T]> {
        match self {
            Self::Loaded(records) => Some(records.as_slice()),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Apply a view filter to the loaded records; failures pass through
    pub fn filtered(&self, filter: impl FnOnce(&[T]) -> Vec<T>) -> Self {
        match self {
            Self::Loaded(records) => Self::Loaded(filter(records)),
            Self::Failed(failure) => Self::Failed(failure.clone()),
        }
    }
}

/// Everything fetched for one office on one load
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub office: OfficeMembership,
    pub as_of: NaiveDate,
    pub claims: CollectionLoad<Claim>,
    pub ar_records: CollectionLoad<ArRecord>,
    pub credits: CollectionLoad<Credit>,
    pub wallets: CollectionLoad<Wallet>,
}

impl DashboardSnapshot {
    pub fn failures(&self) -> Vec<LoadFailure> {
        [
            self.claims.failure(),
            self.ar_records.failure(),
            self.credits.failure(),
            self.wallets.failure(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }

    /// First submission date that counts as recent for this snapshot
    pub fn recent_cutoff(&self, window_days: u32) -> NaiveDate {
        claims::recent_cutoff(self.as_of, window_days)
    }

    /// Compute the dashboard report. Stats for a failed collection are `None`
    /// so they can never be mistaken for a real zero.
    pub fn report(&self, options: &DashboardOptions) -> DashboardReport {
        let cutoff = self.recent_cutoff(options.recent_claim_window_days);
        let claims = self.claims.records();
        let ar_records = self.ar_records.records();

        DashboardReport {
            office: self.office.clone(),
            as_of: self.as_of,
            claims: claims.map(|c| reporting::claim_stats(c, cutoff)),
            receivables: ar_records.map(reporting::ar_stats),
            credits: self.credits.records().map(reporting::credit_stats),
            wallets: self.wallets.records().map(reporting::wallet_stats),
            action_items: flagging::action_items(claims.unwrap_or_default(), ar_records.unwrap_or_default()),
            flagged_claims: flagging::flag_claims(
                claims.unwrap_or_default(),
                &options.flag_rules,
                &options.carrier_rules,
            ),
            failures: self.failures(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub office: OfficeMembership,
    pub as_of: NaiveDate,
    pub claims: Option<ClaimStats>,
    pub receivables: Option<ArStats>,
    pub credits: Option<CreditStats>,
    pub wallets: Option<WalletStats>,
    pub action_items: Vec<ActionItem>,
    pub flagged_claims: Vec<FlaggedClaim>,
    pub failures: Vec<LoadFailure>,
}

/// A loaded dashboard: the raw snapshot and the report computed from it
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub snapshot: DashboardSnapshot,
    pub report: DashboardReport,
}

/// What the presentation layer should render
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    /// No authenticated user
    SignedOut,
    /// Signed in, but not a member of any office
    NoOffice,
    Ready(Box<Dashboard>),
}

/// Loads dashboards from a record source
#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn RecordSource>,
    options: DashboardOptions,
}

impl DashboardService {
    pub fn new(source: Arc<dyn RecordSource>, options: DashboardOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Office the user belongs to. `Ok(None)` means "no office found".
    pub async fn resolve_office(&self, user: &AuthenticatedUser) -> DashboardResult<Option<OfficeMembership>> {
        let membership = self.source.office_membership(user).await?;
        match &membership {
            Some(m) => debug!("User {} resolved to office {}", user.user_id, m.office_id),
            None => info!("User {} has no office membership", user.user_id),
        }
        Ok(membership)
    }

    /// Fetch all four collections concurrently. Each one succeeds or fails
    /// on its own.
    pub async fn load_snapshot(&self, office: OfficeMembership, today: NaiveDate) -> DashboardSnapshot {
        let id = &office.office_id;
        let (claims, ar_records, credits, wallets) = tokio::join!(
            self.source.claims(id),
            self.source.ar_records(id),
            self.source.credits(id),
            self.source.wallets(id),
        );

        let snapshot = DashboardSnapshot {
            claims: CollectionLoad::from_result(Collection::Claims, claims),
            ar_records: CollectionLoad::from_result(Collection::ArRecords, ar_records),
            credits: CollectionLoad::from_result(Collection::Credits, credits),
            wallets: CollectionLoad::from_result(Collection::Wallets, wallets),
            office,
            as_of: today,
        };

        info!(
            "Loaded dashboard for office {} ({} collection(s) failed)",
            snapshot.office.office_id,
            snapshot.failures().len()
        );
        snapshot
    }

    /// Full dashboard load.
    ///
    /// # Errors
    /// Only a failed membership lookup is an error. Collection failures are
    /// reported inside the returned dashboard.
    pub async fn load(&self, user: Option<&AuthenticatedUser>, today: NaiveDate) -> DashboardResult<DashboardState> {
        let Some(user) = user else {
            debug!("No authenticated user, dashboard not loaded");
            return Ok(DashboardState::SignedOut);
        };

        let Some(office) = self.resolve_office(user).await? else {
            return Ok(DashboardState::NoOffice);
        };

        let snapshot = self.load_snapshot(office, today).await;
        let report = snapshot.report(&self.options);
        Ok(DashboardState::Ready(Box::new(Dashboard { snapshot, report })))
    }
}
