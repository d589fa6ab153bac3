//! End-to-end dashboard loads against the demo office fixture
//!
//! Covers:
//! 1. Summary statistics for a fully loaded office
//! 2. Signed-out and no-office states
//! 3. One failing collection leaving the others intact
//! 4. Claims tab and free-text search through an `OfficeView`
//! 5. Wallet age tiers and the credits/wallets ledger tabs

use billing_dashboard::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/demo-office.json");

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

async fn fixture_source() -> InMemoryRecordSource {
    InMemoryRecordSource::load(FIXTURE).await.unwrap()
}

fn service(source: InMemoryRecordSource) -> DashboardService {
    DashboardService::new(Arc::new(source), DashboardOptions::default())
}

async fn load_ready(source: InMemoryRecordSource) -> Dashboard {
    let user = AuthenticatedUser::new("dr-chen");
    let state = service(source).load(Some(&user), as_of()).await.unwrap();
    let DashboardState::Ready(dashboard) = state else {
        panic!("expected a loaded dashboard");
    };
    *dashboard
}

#[tokio::test]
async fn test_summary_for_demo_office() {
    let dashboard = load_ready(fixture_source().await).await;
    let report = &dashboard.report;

    assert_eq!(report.office.office_name, "Bright Smiles Dental");
    assert!(report.failures.is_empty());

    let claims = report.claims.as_ref().unwrap();
    assert_eq!(claims.total_claims, dec("3086.45"));
    assert_eq!(claims.pending_claims, 3);
    assert_eq!(claims.claims_count, 8);
    assert_eq!(claims.overdue_claims, 3);

    let ar = report.receivables.as_ref().unwrap();
    assert_eq!(ar.total_ar, dec("1170.75"));
    assert_eq!(ar.ar_by_bucket.get(AgingBucket::Days0To30), dec("110.00"));
    assert_eq!(ar.ar_by_bucket.get(AgingBucket::Days31To60), dec("240.75"));
    assert_eq!(ar.ar_by_bucket.get(AgingBucket::Days61To90), dec("200.00"));
    assert_eq!(ar.ar_by_bucket.get(AgingBucket::Days90Plus), dec("620.00"));
    assert_eq!(ar.ar_by_bucket.total(), ar.total_ar);

    let credits = report.credits.as_ref().unwrap();
    assert_eq!(credits.total_credits, dec("175.50"));
    assert_eq!(credits.unresolved_credits, 1);

    let wallets = report.wallets.as_ref().unwrap();
    assert_eq!(wallets.total_wallets, dec("2150.00"));
    assert_eq!(wallets.wallets_count, 5);

    let flagged: Vec<&str> = report.flagged_claims.iter().map(|f| f.claim_id.as_str()).collect();
    assert_eq!(flagged, vec!["C003", "C007"]);

    let actions: Vec<&str> = report.action_items.iter().map(|a| a.record_id.as_str()).collect();
    assert_eq!(actions, vec!["C008", "C003", "C007", "AR005", "AR006"]);
}

#[tokio::test]
async fn test_signed_out_and_no_office_are_distinct_states() {
    let service = service(fixture_source().await);

    let signed_out = service.load(None, as_of()).await.unwrap();
    assert_eq!(signed_out, DashboardState::SignedOut);

    let stranger = AuthenticatedUser::new("new-hire");
    let no_office = service.load(Some(&stranger), as_of()).await.unwrap();
    assert_eq!(no_office, DashboardState::NoOffice);
}

#[tokio::test]
async fn test_membership_failure_is_not_no_office() {
    let source = fixture_source()
        .await
        .fail_collection(Collection::Memberships, "auth service unavailable");
    let user = AuthenticatedUser::new("dr-chen");

    let result = service(source).load(Some(&user), as_of()).await;
    assert!(matches!(result, Err(DashboardError::Fetch { collection: Collection::Memberships, .. })));
}

#[tokio::test]
async fn test_wallet_failure_is_isolated() {
    let source = fixture_source().await.fail_collection(Collection::Wallets, "HTTP 503");
    let dashboard = load_ready(source).await;
    let report = &dashboard.report;

    assert!(report.wallets.is_none());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].collection, Collection::Wallets);

    assert_eq!(report.receivables.as_ref().unwrap().total_ar, dec("1170.75"));
    assert_eq!(report.claims.as_ref().unwrap().claims_count, 8);
    assert_eq!(report.credits.as_ref().unwrap().credits_count, 3);
}

#[tokio::test]
async fn test_claims_search_for_aetna() {
    let service = service(fixture_source().await);
    let user = AuthenticatedUser::new("dr-chen");

    let mut view = OfficeView::new(RECENT_CLAIM_WINDOW_DAYS);
    view.reload(&service, Some(&user), as_of()).await.unwrap();

    let ids = |view: &OfficeView| -> Vec<String> {
        match view.visible_claims() {
            Some(CollectionLoad::Loaded(claims)) => claims.into_iter().map(|c| c.id).collect(),
            _ => Vec::new(),
        }
    };

    assert_eq!(ids(&view), vec!["C001", "C005", "C008", "C002", "C006"]);

    view.set_claims_search("AETNA");
    assert_eq!(ids(&view), vec!["C002", "C006"]);

    view.set_claims_tab(ClaimsTab::OLDER_LABEL);
    assert!(ids(&view).is_empty());

    view.set_claims_search("  ");
    assert_eq!(ids(&view), vec!["C004", "C003", "C007"]);
}

#[tokio::test]
async fn test_receivables_tabs_and_selection() {
    let service = service(fixture_source().await);
    let user = AuthenticatedUser::new("front-desk");

    let mut view = OfficeView::new(RECENT_CLAIM_WINDOW_DAYS);
    view.reload(&service, Some(&user), as_of()).await.unwrap();

    view.set_ar_tab("90+ Days");
    let Some(CollectionLoad::Loaded(over_90)) = view.visible_ar() else {
        unreachable!("A/R should be loaded");
    };
    assert_eq!(over_90.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["AR005", "AR006"]);

    view.selection.select_all(&over_90);
    assert_eq!(view.selection.len(), 2);

    view.reload(&service, Some(&user), as_of()).await.unwrap();
    assert!(view.selection.is_empty());
    assert_eq!(view.ar_tab, ArTab::Bucket(AgingBucket::Days90Plus));
}

#[tokio::test]
async fn test_wallet_tiers_and_ledger_tabs() {
    let dashboard = load_ready(fixture_source().await).await;
    let wallets = dashboard.snapshot.wallets.records().unwrap();

    let tiers: Vec<(&str, WalletAgeTier)> = wallets
        .iter()
        .map(|w| (w.id.as_str(), w.age_tier(as_of())))
        .collect();
    assert!(tiers.contains(&("W001", WalletAgeTier::Active)));
    assert!(tiers.contains(&("W002", WalletAgeTier::Recent)));
    assert!(tiers.contains(&("W003", WalletAgeTier::Inactive)));
    assert!(tiers.contains(&("W004", WalletAgeTier::Stale)));

    let credits = dashboard.snapshot.credits.records().unwrap();
    let view = select_ledger(LedgerTab::from_label("Wallets"), credits, wallets);
    assert_eq!(view.len(), 5);
    assert_eq!(view.row_ids().first(), Some(&"W005"));

    let view = select_ledger(LedgerTab::from_label("Credits"), credits, wallets);
    assert_eq!(view.len(), 3);
}
