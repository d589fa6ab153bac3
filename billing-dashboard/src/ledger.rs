use serde::{Deserialize, Serialize};

use crate::models::{Credit, Row, Wallet};

/// Top-level tabs of the credits & wallets screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerTab {
    #[default]
    Credits,
    Wallets,
}

impl LedgerTab {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Credits => "Credits",
            Self::Wallets => "Wallets",
        }
    }

    /// Unknown labels fall back to the default (`Credits`) tab
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case(Self::Wallets.label()) {
            Self::Wallets
        } else {
            Self::Credits
        }
    }
}

/// The collection a ledger tab exposes. Neither collection is filtered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerView<'a> {
    Credits(&'a [Credit]),
    Wallets(&'a [Wallet]),
}

impl<'a> LedgerView<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Credits(rows) => rows.len(),
            Self::Wallets(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row_ids(&self) -> Vec<&'a str> {
        match *self {
            Self::Credits(rows) => rows.iter().map(Row::row_id).collect(),
            Self::Wallets(rows) => rows.iter().map(Row::row_id).collect(),
        }
    }
}

pub fn select_ledger<'a>(tab: LedgerTab, credits: &'a [Credit], wallets: &'a [Wallet]) -> LedgerView<'a> {
    match tab {
        LedgerTab::Credits => LedgerView::Credits(credits),
        LedgerTab::Wallets => LedgerView::Wallets(wallets),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn wallet(id: &str) -> Wallet {
        Wallet {
            id: id.to_string(),
            patient_name: "Barbara Scott".to_string(),
            balance: Decimal::from(200),
            last_used_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_tab_selects_collection() {
        let wallets = vec![wallet("W1"), wallet("W2")];

        let view = select_ledger(LedgerTab::Wallets, &[], &wallets);
        assert_eq!(view.len(), 2);
        assert_eq!(view.row_ids(), vec!["W1", "W2"]);

        let view = select_ledger(LedgerTab::Credits, &[], &wallets);
        assert!(view.is_empty());
        assert!(matches!(view, LedgerView::Credits(_)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(LedgerTab::from_label("wallets"), LedgerTab::Wallets);
        assert_eq!(LedgerTab::from_label("Credits"), LedgerTab::Credits);
        assert_eq!(LedgerTab::from_label("Refunds"), LedgerTab::Credits);
    }
}
