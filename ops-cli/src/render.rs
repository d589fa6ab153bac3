//! Text and JSON rendering for each dashboard screen.

use billing_dashboard::{
    ArRecord, Claim, CollectionLoad, Credit, Dashboard, DashboardReport, DashboardState, FlagReason, LedgerView,
    LoadFailure, OfficeView, Wallet,
};
use chrono::NaiveDate;
use colored::Colorize;
use error_common::{codes, ClarteError, Result};
use logger_redacted::mask_name;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::cli::Command;

pub struct Renderer {
    pub json: bool,
    pub mask_names: bool,
}

impl Renderer {
    /// Render the screen for `command` from the view's current state
    pub fn render(&self, view: &OfficeView, command: &Command) -> Result<String> {
        let dashboard = match view.state() {
            None | Some(DashboardState::SignedOut) => {
                return self.empty_state("signed_out", codes::authentication::NOT_SIGNED_IN, SIGNED_OUT)
            }
            Some(DashboardState::NoOffice) => {
                return self.empty_state("no_office", codes::authentication::NO_OFFICE_MEMBERSHIP, NO_OFFICE)
            }
            Some(DashboardState::Ready(dashboard)) => dashboard,
        };

        if self.json {
            let body = self.json_screen(view, dashboard, command);
            return serde_json::to_string_pretty(&body).map_err(|e| ClarteError::Other(e.into()));
        }

        Ok(match command {
            Command::Summary => self.summary_text(&self.masked(&dashboard.report)),
            Command::Claims { .. } => self.rows_text(view.visible_claims(), |c| self.claim_line(c)),
            Command::Receivables { .. } => self.rows_text(view.visible_ar(), |r| self.ar_line(r)),
            Command::Ledger { .. } => self.ledger_text(view, dashboard.snapshot.as_of),
            Command::Flags => self.flags_text(&dashboard.report),
        })
    }

    /// Signed-out and no-office are normal states, not errors
    fn empty_state(&self, state: &str, code: &str, message: &str) -> Result<String> {
        if self.json {
            return serde_json::to_string_pretty(&json!({ "state": state, "code": code, "message": message }))
                .map_err(|e| ClarteError::Other(e.into()));
        }
        Ok(message.yellow().to_string())
    }

    fn name(&self, name: &str) -> String {
        if self.mask_names {
            mask_name(name)
        } else {
            name.to_string()
        }
    }

    /// Report with action-item patient names masked when requested
    fn masked(&self, report: &DashboardReport) -> DashboardReport {
        let mut report = report.clone();
        for item in &mut report.action_items {
            item.patient_name = self.name(&item.patient_name);
        }
        report
    }

    fn json_screen(&self, view: &OfficeView, dashboard: &Dashboard, command: &Command) -> Value {
        let mut body = json!({
            "state": "ready",
            "office": dashboard.report.office,
            "as_of": dashboard.report.as_of,
        });

        let screen = match command {
            Command::Summary => json!({ "summary": self.masked(&dashboard.report) }),
            Command::Claims { .. } => {
                json!({ "tab": view.claims_tab.label(), "search": view.claims_search, "claims": self.load_json(view.visible_claims(), |c| self.claim_json(c)) })
            }
            Command::Receivables { .. } => {
                json!({ "tab": view.ar_tab.label(), "ar_records": self.load_json(view.visible_ar(), |r| self.ar_json(r)) })
            }
            Command::Ledger { .. } => {
                let rows = match view.ledger() {
                    Some(Ok(LedgerView::Credits(credits))) => {
                        json!(credits.iter().map(|c| self.credit_json(c)).collect::<Vec<_>>())
                    }
                    Some(Ok(LedgerView::Wallets(wallets))) => json!(wallets
                        .iter()
                        .map(|w| self.wallet_json(w, dashboard.snapshot.as_of))
                        .collect::<Vec<_>>()),
                    Some(Err(failure)) => json!({ "failed": failure }),
                    None => Value::Null,
                };
                json!({ "tab": view.ledger_tab.label(), "rows": rows })
            }
            Command::Flags => json!({ "flagged_claims": dashboard.report.flagged_claims }),
        };

        if let (Value::Object(target), Value::Object(extra)) = (&mut body, screen) {
            target.extend(extra);
        }
        body
    }

    fn load_json<T>(&self, load: Option<CollectionLoad<T>>, row: impl Fn(&T) -> Value) -> Value {
        match load {
            Some(CollectionLoad::Loaded(rows)) => Value::Array(rows.iter().map(row).collect()),
            Some(CollectionLoad::Failed(failure)) => json!({ "failed": failure }),
            None => Value::Null,
        }
    }

    fn claim_json(&self, claim: &Claim) -> Value {
        json!({
            "id": claim.id,
            "patient_name": self.name(&claim.patient_name),
            "insurance_company": claim.insurance_company,
            "amount": claim.amount,
            "status": claim.display_status(),
            "submitted_date": claim.submitted_date,
            "last_updated": claim.last_updated,
        })
    }

    fn ar_json(&self, record: &ArRecord) -> Value {
        json!({
            "id": record.id,
            "patient_name": self.name(&record.patient_name),
            "balance": record.balance,
            "age_days": record.age_days,
            "aging_bucket": record.bucket(),
            "status": record.status,
            "last_payment_date": record.last_payment_date,
        })
    }

    fn credit_json(&self, credit: &Credit) -> Value {
        json!({
            "id": credit.id,
            "patient_name": self.name(&credit.patient_name),
            "balance": credit.balance,
            "status": credit.status,
            "last_appt": credit.last_appt,
            "next_appt": credit.next_appt,
            "team_member": credit.team_member,
        })
    }

    fn wallet_json(&self, wallet: &Wallet, as_of: NaiveDate) -> Value {
        json!({
            "id": wallet.id,
            "patient_name": self.name(&wallet.patient_name),
            "balance": wallet.balance,
            "last_used_date": wallet.last_used_date,
            "age_tier": wallet.age_tier(as_of),
        })
    }

    fn summary_text(&self, report: &DashboardReport) -> String {
        let mut out = vec![format!("{} (as of {})", report.office.office_name.bold(), report.as_of)];

        out.push(match &report.claims {
            Some(s) => format!(
                "{:<10} {:>12}  {} claims, {} pending, {} overdue",
                "Claims",
                money(s.total_claims),
                s.claims_count,
                s.pending_claims,
                s.overdue_claims
            ),
            None => unavailable("Claims"),
        });

        match &report.receivables {
            Some(s) => {
                out.push(format!("{:<10} {:>12}  {} accounts", "A/R", money(s.total_ar), s.ar_count));
                for (bucket, amount) in s.ar_by_bucket.iter() {
                    out.push(format!("  {:<8} {:>12}", bucket.label(), money(amount)));
                }
            }
            None => out.push(unavailable("A/R")),
        }

        out.push(match &report.credits {
            Some(s) => format!(
                "{:<10} {:>12}  {} credits, {} unresolved",
                "Credits",
                money(s.total_credits),
                s.credits_count,
                s.unresolved_credits
            ),
            None => unavailable("Credits"),
        });

        out.push(match &report.wallets {
            Some(s) => format!("{:<10} {:>12}  {} wallets", "Wallets", money(s.total_wallets), s.wallets_count),
            None => unavailable("Wallets"),
        });

        if !report.action_items.is_empty() {
            out.push(String::new());
            out.push("Action items".bold().to_string());
            for item in &report.action_items {
                out.push(format!("  - {}", item.message()));
            }
        }

        out.extend(report.failures.iter().map(failure_line));
        out.join("\n")
    }

    fn rows_text<T>(&self, load: Option<CollectionLoad<T>>, line: impl Fn(&T) -> String) -> String {
        match load {
            Some(CollectionLoad::Loaded(rows)) if rows.is_empty() => "No records.".dimmed().to_string(),
            Some(CollectionLoad::Loaded(rows)) => rows.iter().map(line).collect::<Vec<_>>().join("\n"),
            Some(CollectionLoad::Failed(failure)) => failure_line(&failure),
            None => String::new(),
        }
    }

    fn claim_line(&self, claim: &Claim) -> String {
        let status = format!("{:<30}", claim.display_status().label());
        let status = if claim.display_status().is_denied() {
            status.red().to_string()
        } else {
            status
        };
        format!(
            "{:<6} {:<20} {:<14} {:>10} {} {}",
            claim.id,
            self.name(&claim.patient_name),
            claim.insurance_company,
            money(claim.amount),
            status,
            claim.submitted_date
        )
    }

    fn ar_line(&self, record: &ArRecord) -> String {
        format!(
            "{:<6} {:<20} {:>10} {:>4}d {:<6} {}",
            record.id,
            self.name(&record.patient_name),
            money(record.balance),
            record.age_days,
            record.bucket().label(),
            record.status
        )
    }

    fn ledger_text(&self, view: &OfficeView, as_of: NaiveDate) -> String {
        match view.ledger() {
            Some(Ok(LedgerView::Credits(credits))) if !credits.is_empty() => credits
                .iter()
                .map(|c| {
                    format!(
                        "{:<6} {:<20} {:>10} {:<12} {}",
                        c.id,
                        self.name(&c.patient_name),
                        money(c.balance),
                        c.status,
                        c.team_member.as_deref().unwrap_or("-")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Some(Ok(LedgerView::Wallets(wallets))) if !wallets.is_empty() => wallets
                .iter()
                .map(|w| {
                    format!(
                        "{:<6} {:<20} {:>10} {} {}",
                        w.id,
                        self.name(&w.patient_name),
                        money(w.balance),
                        w.last_used_date,
                        w.age_tier(as_of)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Some(Ok(_)) => "No records.".dimmed().to_string(),
            Some(Err(failure)) => failure_line(failure),
            None => String::new(),
        }
    }

    fn flags_text(&self, report: &DashboardReport) -> String {
        if report.flagged_claims.is_empty() {
            return "No flagged claims.".dimmed().to_string();
        }

        let mut out = Vec::new();
        for flagged in &report.flagged_claims {
            let reasons: Vec<String> = flagged
                .reasons
                .iter()
                .map(|reason| match reason {
                    FlagReason::Denied { status } => format!("denied ({})", status),
                    FlagReason::HighValue { amount, threshold } => {
                        format!("high value ({} > {})", money(*amount), money(*threshold))
                    }
                    FlagReason::Carrier { insurer, note } => format!("{}: {}", insurer, note),
                })
                .collect();
            out.push(format!("{:<6} {}", flagged.claim_id.bold(), reasons.join("; ")));
        }
        out.extend(report.failures.iter().map(failure_line));
        out.join("\n")
    }
}

const SIGNED_OUT: &str = "Not signed in. Pass --user or set CLARTE_USER.";
const NO_OFFICE: &str = "No office found for this account.";

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn unavailable(section: &str) -> String {
    format!("{:<10} {:>12}", section, "unavailable").red().to_string()
}

fn failure_line(failure: &LoadFailure) -> String {
    format!("{} [{}]", failure.message, failure.code).red().to_string()
}
