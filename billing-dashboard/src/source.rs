use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    ArRecord, AuthenticatedUser, Claim, Collection, Credit, OfficeId, OfficeMembership, OfficeRecords, Wallet,
};

/// Read-only access to an office's billing records.
///
/// A missing membership is `Ok(None)`, never an error: callers render it as
/// "no office found", distinct from a failed fetch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Office the user belongs to, if any
    async fn office_membership(&self, user: &AuthenticatedUser) -> DashboardResult<Option<OfficeMembership>>;

    /// Claims, newest first. Sources without a creation timestamp order by
    /// submission date.
    async fn claims(&self, office: &OfficeId) -> DashboardResult<Vec<Claim>>;

    /// A/R accounts, largest balance first
    async fn ar_records(&self, office: &OfficeId) -> DashboardResult<Vec<ArRecord>>;

    /// Credits, newest first where the store tracks creation time,
    /// otherwise in stored order
    async fn credits(&self, office: &OfficeId) -> DashboardResult<Vec<Credit>>;

    /// Wallets, largest balance first
    async fn wallets(&self, office: &OfficeId) -> DashboardResult<Vec<Wallet>>;
}

#[derive(Debug, Deserialize)]
struct FixtureMembership {
    user_id: String,
    #[serde(flatten)]
    membership: OfficeMembership,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fixture {
    memberships: Vec<FixtureMembership>,
    offices: HashMap<OfficeId, OfficeRecords>,
}

/// In-memory record source for development, tests and offline use
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    memberships: HashMap<String, OfficeMembership>,
    offices: HashMap<OfficeId, OfficeRecords>,
    failures: HashMap<Collection, String>,
}

impl InMemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a fixture document:
    /// `{"memberships": [{"user_id", "office_id", "office_name", "role"}], "offices": {"<id>": {...}}}`
    pub fn from_json_str(json: &str) -> DashboardResult<Self> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| DashboardError::Fixture(format!("invalid fixture: {}", e)))?;

        let mut source = Self::new();
        for entry in fixture.memberships {
            source.memberships.insert(entry.user_id, entry.membership);
        }
        source.offices = fixture.offices;
        Ok(source)
    }

    /// Load a fixture file from disk
    pub async fn load(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DashboardError::Fixture(format!("cannot read {}: {}", path.display(), e)))?;

        let source = Self::from_json_str(&json)?;
        debug!(
            path = %path.display(),
            offices = source.offices.len(),
            memberships = source.memberships.len(),
            "Loaded record fixture"
        );
        Ok(source)
    }

    pub fn with_membership(mut self, user_id: impl Into<String>, membership: OfficeMembership) -> Self {
        self.memberships.insert(user_id.into(), membership);
        self
    }

    pub fn with_office(mut self, office_id: OfficeId, records: OfficeRecords) -> Self {
        self.offices.insert(office_id, records);
        self
    }

    /// Make every fetch of `collection` fail with `message`
    pub fn fail_collection(mut self, collection: Collection, message: impl Into<String>) -> Self {
        self.failures.insert(collection, message.into());
        self
    }

    fn check(&self, collection: Collection) -> DashboardResult<()> {
        match self.failures.get(&collection) {
            Some(message) => Err(DashboardError::fetch(collection, message.clone())),
            None => Ok(()),
        }
    }

    fn records(&self, office: &OfficeId) -> Option<&OfficeRecords> {
        self.offices.get(office)
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn office_membership(&self, user: &AuthenticatedUser) -> DashboardResult<Option<OfficeMembership>> {
        self.check(Collection::Memberships)?;
        Ok(self.memberships.get(&user.user_id).cloned())
    }

    async fn claims(&self, office: &OfficeId) -> DashboardResult<Vec<Claim>> {
        self.check(Collection::Claims)?;
        let mut claims = self.records(office).map(|r| r.claims.clone()).unwrap_or_default();
        claims.sort_by(|a, b| b.submitted_date.cmp(&a.submitted_date));
        Ok(claims)
    }

    async fn ar_records(&self, office: &OfficeId) -> DashboardResult<Vec<ArRecord>> {
        self.check(Collection::ArRecords)?;
        let mut records = self.records(office).map(|r| r.ar_records.clone()).unwrap_or_default();
        records.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(records)
    }

    async fn credits(&self, office: &OfficeId) -> DashboardResult<Vec<Credit>> {
        self.check(Collection::Credits)?;
        Ok(self.records(office).map(|r| r.credits.clone()).unwrap_or_default())
    }

    async fn wallets(&self, office: &OfficeId) -> DashboardResult<Vec<Wallet>> {
        self.check(Collection::Wallets)?;
        let mut wallets = self.records(office).map(|r| r.wallets.clone()).unwrap_or_default();
        wallets.sort_by(|a, b| b.balance.cmp(&a.balance));
        Ok(wallets)
    }
}
