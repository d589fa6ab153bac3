use chrono::NaiveDate;

use crate::claims::{self, ClaimsTab, RECENT_CLAIM_WINDOW_DAYS};
use crate::error::DashboardResult;
use crate::ledger::{self, LedgerTab, LedgerView};
use crate::models::{ArRecord, AuthenticatedUser, Claim};
use crate::receivables::{self, ArTab};
use crate::selection::RowSelection;
use crate::service::{CollectionLoad, Dashboard, DashboardService, DashboardState, LoadFailure};

/// State owned by one dashboard view: active tabs, claim search text, checked
/// rows and the last loaded state.
///
/// Every load replaces the previous state wholesale. Overlapping loads are not
/// cancelled; whichever finishes last is what the view shows.
#[derive(Debug, Clone)]
pub struct OfficeView {
    pub ar_tab: ArTab,
    pub claims_tab: ClaimsTab,
    pub claims_search: String,
    pub ledger_tab: LedgerTab,
    pub selection: RowSelection,
    state: Option<DashboardState>,
    recent_window_days: u32,
}

impl Default for OfficeView {
    fn default() -> Self {
        Self::new(RECENT_CLAIM_WINDOW_DAYS)
    }
}

impl OfficeView {
    pub fn new(recent_window_days: u32) -> Self {
        Self {
            ar_tab: ArTab::default(),
            claims_tab: ClaimsTab::default(),
            claims_search: String::new(),
            ledger_tab: LedgerTab::default(),
            selection: RowSelection::new(),
            state: None,
            recent_window_days,
        }
    }

    /// Load through `service` and replace whatever the view held
    pub async fn reload(
        &mut self,
        service: &DashboardService,
        user: Option<&AuthenticatedUser>,
        today: NaiveDate,
    ) -> DashboardResult<()> {
        let state = service.load(user, today).await?;
        self.replace(state);
        Ok(())
    }

    /// Swap in a freshly loaded state. The selection does not survive a reload.
    pub fn replace(&mut self, state: DashboardState) {
        self.selection.clear();
        self.state = Some(state);
    }

    pub fn state(&self) -> Option<&DashboardState> {
        self.state.as_ref()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.state {
            Some(DashboardState::Ready(dashboard)) => Some(dashboard.as_ref()),
            _ => None,
        }
    }

    pub fn set_ar_tab(&mut self, label: &str) {
        self.ar_tab = ArTab::from_label(label);
        self.selection.clear();
    }

    pub fn set_claims_tab(&mut self, label: &str) {
        self.claims_tab = ClaimsTab::from_label(label);
        self.selection.clear();
    }

    pub fn set_claims_search(&mut self, search: impl Into<String>) {
        self.claims_search = search.into();
        if let Some(CollectionLoad::Loaded(visible)) = self.visible_claims() {
            self.selection.retain_visible(&visible);
        }
    }

    pub fn set_ledger_tab(&mut self, label: &str) {
        self.ledger_tab = LedgerTab::from_label(label);
        self.selection.clear();
    }

    /// A/R rows under the active tab; `None` until a dashboard is loaded
    pub fn visible_ar(&self) -> Option<CollectionLoad<ArRecord>> {
        let dashboard = self.dashboard()?;
        let tab = self.ar_tab;
        Some(dashboard.snapshot.ar_records.filtered(|records| receivables::filter_ar(records, tab)))
    }

    /// Claims under the active tab and search text
    pub fn visible_claims(&self) -> Option<CollectionLoad<Claim>> {
        let dashboard = self.dashboard()?;
        let cutoff = claims::recent_cutoff(dashboard.snapshot.as_of, self.recent_window_days);
        let (tab, search) = (self.claims_tab, self.claims_search.as_str());
        Some(
            dashboard
                .snapshot
                .claims
                .filtered(|records| claims::filter_claims(records, tab, search, cutoff)),
        )
    }

    /// The credits or wallets collection, whichever tab is active.
    ///
    /// `Err` carries the failure of the collection behind the active tab.
    pub fn ledger(&self) -> Option<Result<LedgerView<'_>, &LoadFailure>> {
        let snapshot = &self.dashboard()?.snapshot;
        let view = match self.ledger_tab {
            LedgerTab::Credits => match &snapshot.credits {
                CollectionLoad::Loaded(credits) => Ok(ledger::select_ledger(LedgerTab::Credits, credits, &[])),
                CollectionLoad::Failed(failure) => Err(failure),
            },
            LedgerTab::Wallets => match &snapshot.wallets {
                CollectionLoad::Loaded(wallets) => Ok(ledger::select_ledger(LedgerTab::Wallets, &[], wallets)),
                CollectionLoad::Failed(failure) => Err(failure),
            },
        };
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aging::AgingBucket;
    use crate::models::{ArStatus, Collection, OfficeId, OfficeMembership, Wallet};
    use crate::service::{DashboardOptions, DashboardSnapshot};
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn claim(id: &str, patient: &str, insurer: &str, submitted: NaiveDate) -> Claim {
        Claim {
            id: id.to_string(),
            patient_name: patient.to_string(),
            insurance_company: insurer.to_string(),
            amount: Decimal::from(100),
            status: "submitted".to_string(),
            submitted_date: submitted,
            last_updated: submitted,
        }
    }

    fn ar(id: &str, age_days: u32) -> ArRecord {
        ArRecord {
            id: id.to_string(),
            patient_name: "Linda Young".to_string(),
            balance: Decimal::from(75),
            age_days,
            status: ArStatus::None,
            last_payment_date: None,
        }
    }

    fn ready(claims: Vec<Claim>, ar_records: Vec<ArRecord>) -> DashboardState {
        let snapshot = DashboardSnapshot {
            office: OfficeMembership {
                office_id: OfficeId::from("office-1"),
                office_name: "Bright Smiles".to_string(),
                role: String::new(),
            },
            as_of: day(2024, 6, 30),
            claims: CollectionLoad::Loaded(claims),
            ar_records: CollectionLoad::Loaded(ar_records),
            credits: CollectionLoad::Failed(LoadFailure {
                collection: Collection::Credits,
                message: "Failed to load credits: 503".to_string(),
                code: "DATA_4001",
            }),
            wallets: CollectionLoad::Loaded(vec![Wallet {
                id: "W1".to_string(),
                patient_name: "Barbara Scott".to_string(),
                balance: Decimal::from(20),
                last_used_date: day(2024, 6, 1),
            }]),
        };
        let report = snapshot.report(&DashboardOptions::default());
        DashboardState::Ready(Box::new(Dashboard { snapshot, report }))
    }

    #[test]
    fn test_nothing_visible_before_load() {
        let view = OfficeView::new(30);
        assert!(view.state().is_none());
        assert!(view.visible_ar().is_none());
        assert!(view.ledger().is_none());
    }

    #[test]
    fn test_default_view_uses_recent_claim_window() {
        let mut view = OfficeView::default();
        view.replace(ready(
            vec![
                claim("C1", "Emily Clark", "Aetna", day(2024, 6, 20)),
                claim("C2", "John Doe", "Cigna", day(2024, 4, 2)),
            ],
            Vec::new(),
        ));

        assert_eq!(view.claims_tab, ClaimsTab::Recent);
        let visible = view.visible_claims().and_then(|l| l.records().map(<[_]>::to_vec)).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "C1");
    }

    #[test]
    fn test_claims_tab_and_search() {
        let mut view = OfficeView::new(30);
        view.replace(ready(
            vec![
                claim("C1", "emily clark", "Aetna", day(2024, 6, 20)),
                claim("C2", "John Doe", "Cigna", day(2024, 6, 25)),
                claim("C3", "Mary Major", "AETNA", day(2024, 4, 2)),
            ],
            Vec::new(),
        ));

        view.set_claims_search("aetna");
        let ids = |load: Option<CollectionLoad<Claim>>| -> Vec<String> {
            load.and_then(|l| l.records().map(|r| r.iter().map(|c| c.id.clone()).collect()))
                .unwrap_or_default()
        };
        assert_eq!(ids(view.visible_claims()), vec!["C1"]);

        view.set_claims_tab("OI 30+");
        assert_eq!(ids(view.visible_claims()), vec!["C3"]);

        view.set_claims_search("");
        view.set_claims_tab("Everything");
        assert_eq!(ids(view.visible_claims()).len(), 3);
    }

    #[test]
    fn test_ar_tab_and_selection_reset() {
        let mut view = OfficeView::new(30);
        view.replace(ready(Vec::new(), vec![ar("AR1", 5), ar("AR2", 61), ar("AR3", 90)]));

        view.set_ar_tab("61-90 Days");
        assert_eq!(view.ar_tab, ArTab::Bucket(AgingBucket::Days61To90));
        let visible = view.visible_ar().and_then(|l| l.records().map(<[_]>::to_vec)).unwrap();
        assert_eq!(visible.len(), 2);

        view.selection.select_all(&visible);
        assert!(view.selection.all_selected(&visible));

        view.set_ar_tab("All");
        assert!(view.selection.is_empty());
    }

    #[test]
    fn test_ledger_tab_reports_failed_collection() {
        let mut view = OfficeView::new(30);
        view.replace(ready(Vec::new(), Vec::new()));

        assert!(matches!(view.ledger(), Some(Err(f)) if f.collection == Collection::Credits));

        view.set_ledger_tab("Wallets");
        let ledger = view.ledger().unwrap().unwrap();
        assert_eq!(ledger.row_ids(), vec!["W1"]);
    }

    #[test]
    fn test_reload_replaces_previous_state() {
        let mut view = OfficeView::new(30);
        view.replace(ready(Vec::new(), vec![ar("AR1", 5)]));
        view.selection.select("AR1");

        view.replace(DashboardState::NoOffice);
        assert_eq!(view.state(), Some(&DashboardState::NoOffice));
        assert!(view.dashboard().is_none());
        assert!(view.selection.is_empty());
    }
}
