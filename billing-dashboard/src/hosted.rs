//! Record source backed by a hosted PostgREST-style store.
//!
//! Every table is read with `GET {base}/rest/v1/{table}` filtered on
//! `office_id`. Rows are decoded into wire structs first and converted into
//! the dashboard models with `TryFrom`, so a malformed row fails its own
//! collection and nothing else.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use logger_redacted::{redacted_warn, PiiRedactor};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::aging::{self, AgingBucket};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    ArRecord, ArStatus, AuthenticatedUser, Claim, Collection, Credit, OfficeId, OfficeMembership, Wallet,
};
use crate::source::RecordSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HostedRecordSource {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    redactor: PiiRedactor,
}

impl HostedRecordSource {
    /// # Arguments
    /// * `base_url` - project URL, e.g. `https://abc.supabase.co`
    /// * `api_key` - anon or service key, sent as `apikey` and bearer token
    /// * `timeout` - per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
        redactor: PiiRedactor,
    ) -> DashboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            redactor,
        })
    }

    fn url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table())
    }

    async fn fetch_rows<W: DeserializeOwned + Send>(
        &self,
        collection: Collection,
        query: &[(&str, String)],
    ) -> DashboardResult<Vec<W>> {
        let key = self.api_key.expose_secret();
        let response = self
            .client
            .get(self.url(collection))
            .query(query)
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| self.fetch_error(collection, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fetch_error(collection, format!("{}: {}", status, body)));
        }

        let rows: Vec<W> = response.json().await.map_err(|e| {
            let err = DashboardError::Decode {
                collection,
                message: self.redactor.redact(&e.to_string()),
            };
            redacted_warn!(self.redactor, "{}", err);
            err
        })?;

        debug!(collection = %collection, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    async fn fetch_office<W, T>(&self, collection: Collection, office: &OfficeId, order: &str) -> DashboardResult<Vec<T>>
    where
        W: DeserializeOwned + TryInto<T, Error = DashboardError> + Send,
        T: Send,
    {
        let query = [
            ("select", "*".to_string()),
            ("office_id", format!("eq.{}", office)),
            ("order", order.to_string()),
        ];
        let rows: Vec<W> = self.fetch_rows(collection, &query).await?;
        rows.into_iter()
            .map(TryInto::try_into)
            .collect::<DashboardResult<Vec<T>>>()
            .map_err(|err| {
                redacted_warn!(self.redactor, "Rejected {} row: {}", collection, err);
                err
            })
    }

    /// Server errors can echo patient names back; the message is redacted
    /// before it is logged or returned.
    fn fetch_error(&self, collection: Collection, message: String) -> DashboardError {
        let err = DashboardError::fetch(collection, self.redactor.redact(&message));
        redacted_warn!(self.redactor, "{}", err);
        err
    }
}

#[async_trait]
impl RecordSource for HostedRecordSource {
    async fn office_membership(&self, user: &AuthenticatedUser) -> DashboardResult<Option<OfficeMembership>> {
        let query = [
            ("select", "office_id,role,offices(id,name)".to_string()),
            ("user_id", format!("eq.{}", user.user_id)),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<MembershipRow> = self.fetch_rows(Collection::Memberships, &query).await?;
        Ok(rows.into_iter().next().map(OfficeMembership::from))
    }

    async fn claims(&self, office: &OfficeId) -> DashboardResult<Vec<Claim>> {
        self.fetch_office::<ClaimRow, _>(Collection::Claims, office, "created_at.desc").await
    }

    async fn ar_records(&self, office: &OfficeId) -> DashboardResult<Vec<ArRecord>> {
        self.fetch_office::<ArRow, _>(Collection::ArRecords, office, "balance.desc").await
    }

    async fn credits(&self, office: &OfficeId) -> DashboardResult<Vec<Credit>> {
        self.fetch_office::<CreditRow, _>(Collection::Credits, office, "created_at.desc").await
    }

    async fn wallets(&self, office: &OfficeId) -> DashboardResult<Vec<Wallet>> {
        self.fetch_office::<WalletRow, _>(Collection::Wallets, office, "balance.desc").await
    }
}

#[derive(Debug, Deserialize)]
struct OfficeRow {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
    office_id: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    offices: Option<OfficeRow>,
}

impl From<MembershipRow> for OfficeMembership {
    fn from(row: MembershipRow) -> Self {
        let (office_id, office_name) = match row.offices {
            Some(office) => (office.id, office.name),
            None => (row.office_id.clone(), row.office_id),
        };
        OfficeMembership {
            office_id: OfficeId(office_id),
            office_name,
            role: row.role.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClaimRow {
    id: String,
    patient_name: String,
    insurance_company: String,
    claim_amount: Decimal,
    status: String,
    submitted_date: String,
    #[serde(default)]
    updated_at: Option<String>,
}

impl TryFrom<ClaimRow> for Claim {
    type Error = DashboardError;

    fn try_from(row: ClaimRow) -> DashboardResult<Self> {
        let submitted_date = parse_date(Collection::Claims, &row.id, "submitted_date", &row.submitted_date)?;
        let last_updated = match row.updated_at.as_deref() {
            Some(raw) => parse_date(Collection::Claims, &row.id, "updated_at", raw)?,
            None => submitted_date,
        };
        Ok(Claim {
            id: row.id,
            patient_name: row.patient_name,
            insurance_company: row.insurance_company,
            amount: row.claim_amount,
            status: row.status,
            submitted_date,
            last_updated,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ArRow {
    id: String,
    patient_name: String,
    balance: Decimal,
    age: i64,
    #[serde(default)]
    aging_bucket: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    last_payment_date: Option<String>,
}

impl TryFrom<ArRow> for ArRecord {
    type Error = DashboardError;

    fn try_from(row: ArRow) -> DashboardResult<Self> {
        let invalid = |reason: String| DashboardError::InvalidRecord {
            collection: Collection::ArRecords,
            record_id: row.id.clone(),
            reason,
        };

        let age_days = aging::validate_ar_age(&row.id, row.age)?;
        if row.balance.is_sign_negative() {
            return Err(invalid(format!("balance must not be negative, got {}", row.balance)));
        }

        // Stored buckets are advisory; one that disagrees with the age is corrupt
        if let Some(stored) = row.aging_bucket.as_deref() {
            let derived = aging::classify_ar_bucket(age_days);
            match AgingBucket::from_label(stored) {
                Some(bucket) if bucket == derived => {}
                _ => {
                    return Err(invalid(format!(
                        "aging bucket {:?} does not match age {} ({})",
                        stored,
                        age_days,
                        derived.label()
                    )))
                }
            }
        }

        let status = match row.status.as_deref() {
            Some(raw) => ArStatus::parse(raw).ok_or_else(|| invalid(format!("unknown status {:?}", raw)))?,
            None => ArStatus::None,
        };
        let last_payment_date = row
            .last_payment_date
            .as_deref()
            .map(|raw| parse_date(Collection::ArRecords, &row.id, "last_payment_date", raw))
            .transpose()?;

        Ok(ArRecord {
            id: row.id,
            patient_name: row.patient_name,
            balance: row.balance,
            age_days,
            status,
            last_payment_date,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreditRow {
    id: String,
    patient_name: String,
    credit_amount: Decimal,
    status: String,
    #[serde(default)]
    last_appt: Option<String>,
    #[serde(default)]
    next_appt: Option<String>,
    #[serde(default)]
    credit_year: Option<i32>,
    #[serde(default)]
    insurance_bal: Option<Decimal>,
    #[serde(default)]
    wallet_bal: Option<Decimal>,
    #[serde(default)]
    outstanding_claim: Option<Decimal>,
    #[serde(default)]
    date_changed: Option<String>,
    #[serde(default)]
    team_member: Option<String>,
}

impl TryFrom<CreditRow> for Credit {
    type Error = DashboardError;

    fn try_from(row: CreditRow) -> DashboardResult<Self> {
        let date = |field: &str, raw: &Option<String>| {
            raw.as_deref()
                .map(|value| parse_date(Collection::Credits, &row.id, field, value))
                .transpose()
        };
        let last_appt = date("last_appt", &row.last_appt)?;
        let next_appt = date("next_appt", &row.next_appt)?;
        let date_changed = date("date_changed", &row.date_changed)?;

        Ok(Credit {
            id: row.id,
            patient_name: row.patient_name,
            balance: row.credit_amount,
            status: row.status,
            last_appt,
            next_appt,
            credit_year: row.credit_year,
            insurance_balance: row.insurance_bal.unwrap_or_default(),
            wallet_balance: row.wallet_bal.unwrap_or_default(),
            outstanding_claim: row.outstanding_claim.unwrap_or_default(),
            date_changed,
            team_member: row.team_member,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WalletRow {
    id: String,
    patient_name: String,
    balance: Decimal,
    last_used_date: String,
}

impl TryFrom<WalletRow> for Wallet {
    type Error = DashboardError;

    fn try_from(row: WalletRow) -> DashboardResult<Self> {
        let last_used_date = parse_date(Collection::Wallets, &row.id, "last_used_date", &row.last_used_date)?;
        Ok(Wallet {
            id: row.id,
            patient_name: row.patient_name,
            balance: row.balance,
            last_used_date,
        })
    }
}

/// Accepts `YYYY-MM-DD` and timestamps that start with one
fn parse_date(collection: Collection, record_id: &str, field: &str, raw: &str) -> DashboardResult<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| DashboardError::InvalidRecord {
        collection,
        record_id: record_id.to_string(),
        reason: format!("{} is not a date: {:?}", field, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use logger_redacted::RedactionConfig;
    use mockito::Matcher;

    fn source(server: &mockito::Server) -> HostedRecordSource {
        HostedRecordSource::new(
            server.url(),
            SecretString::new("anon-key".to_string()),
            Duration::from_secs(5),
            PiiRedactor::new(RedactionConfig::default()),
        )
        .unwrap()
    }

    fn office_query(order: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("office_id".into(), "eq.office-1".into()),
            Matcher::UrlEncoded("order".into(), order.into()),
        ])
    }

    #[tokio::test]
    async fn test_claims_request_and_decode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/claims")
            .match_query(office_query("created_at.desc"))
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .with_status(200)
            .with_body(
                r#"[{"id":"C1","office_id":"office-1","patient_name":"Emily Clark","insurance_company":"Aetna",
                    "claim_amount":250.5,"status":"pending","submitted_date":"2024-06-01",
                    "updated_at":"2024-06-03T10:15:00+00:00","created_at":"2024-06-01T09:00:00+00:00"}]"#,
            )
            .create_async()
            .await;

        let claims = source(&server).claims(&OfficeId::from("office-1")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].amount, "250.5".parse::<Decimal>().unwrap());
        assert_eq!(claims[0].status, "pending");
        assert_eq!(claims[0].last_updated, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[tokio::test]
    async fn test_membership_first_row_or_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/office_memberships")
            .match_query(Matcher::UrlEncoded("user_id".into(), "eq.user-1".into()))
            .with_status(200)
            .with_body(r#"[{"office_id":"office-1","role":"admin","offices":{"id":"office-1","name":"Bright Smiles"}}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/office_memberships")
            .match_query(Matcher::UrlEncoded("user_id".into(), "eq.user-2".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let source = source(&server);
        let membership = source
            .office_membership(&AuthenticatedUser::new("user-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.office_name, "Bright Smiles");
        assert_eq!(membership.role, "admin");

        let none = source.office_membership(&AuthenticatedUser::new("user-2")).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_failure_with_redacted_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/wallets")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("lookup failed for jane.doe@example.com")
            .create_async()
            .await;

        let err = source(&server).wallets(&OfficeId::from("office-1")).await.unwrap_err();
        assert!(matches!(err, DashboardError::Fetch { collection: Collection::Wallets, .. }));
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(!message.contains("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_ar_rows_are_validated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/ar_records")
            .match_query(office_query("balance.desc"))
            .with_status(200)
            .with_body(
                r#"[{"id":"AR1","patient_name":"Lisa Hall","balance":"300.00","age":45,"aging_bucket":"31-60","status":"payment_plan"},
                    {"id":"AR2","patient_name":"Mark Young","balance":"80.00","age":10,"aging_bucket":"0-30"}]"#,
            )
            .create_async()
            .await;

        let records = source(&server).ar_records(&OfficeId::from("office-1")).await.unwrap();
        assert_eq!(records[0].status, ArStatus::PaymentPlan);
        assert_eq!(records[1].bucket(), AgingBucket::Days0To30);
    }

    #[test]
    fn test_ar_row_rejections() {
        let row = |age: i64, bucket: Option<&str>, balance: &str| ArRow {
            id: "AR9".to_string(),
            patient_name: "Paul Allen".to_string(),
            balance: balance.parse().unwrap(),
            age,
            aging_bucket: bucket.map(str::to_string),
            status: None,
            last_payment_date: None,
        };

        assert!(ArRecord::try_from(row(-1, None, "10")).is_err());
        assert!(ArRecord::try_from(row(30, Some("31-60"), "10")).is_err());
        assert!(ArRecord::try_from(row(30, None, "-5")).is_err());
        assert!(ArRecord::try_from(row(30, Some("0-30"), "10")).is_ok());
    }

    #[test]
    fn test_credit_row_conversion() {
        let row: CreditRow = serde_json::from_str(
            r#"{"id":"CR1","patient_name":"Susan Lopez","credit_amount":"75.25","status":"unresolved",
                "last_appt":"2024-04-02","credit_year":2024,"insurance_bal":12,"team_member":"Alice"}"#,
        )
        .unwrap();
        let credit = Credit::try_from(row).unwrap();

        assert_eq!(credit.balance, "75.25".parse::<Decimal>().unwrap());
        assert_eq!(credit.insurance_balance, Decimal::from(12));
        assert_eq!(credit.wallet_balance, Decimal::ZERO);
        assert_eq!(credit.last_appt, NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(credit.next_appt, None);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date(Collection::Wallets, "W1", "last_used_date", "yesterday").is_err());
        assert_eq!(
            parse_date(Collection::Wallets, "W1", "last_used_date", "2024-02-29T00:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
