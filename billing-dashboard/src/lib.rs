//! Billing dashboard core for dental offices
//!
//! Provides:
//! - A/R aging buckets and wallet age tiers
//! - Dashboard summary statistics over claims, A/R, credits and wallets
//! - Tab, search and row-selection filtering for each screen
//! - Review flags and action items
//! - The record source contract, with in-memory and hosted implementations

pub mod aging;
pub mod claims;
pub mod error;
pub mod flagging;
pub mod hosted;
pub mod ledger;
pub mod models;
pub mod receivables;
pub mod reporting;
pub mod selection;
pub mod service;
pub mod source;
pub mod view;

pub use aging::*;
pub use claims::*;
pub use error::*;
pub use flagging::*;
pub use hosted::*;
pub use ledger::*;
pub use models::*;
pub use receivables::*;
pub use reporting::*;
pub use selection::*;
pub use service::*;
pub use source::*;
pub use view::*;
