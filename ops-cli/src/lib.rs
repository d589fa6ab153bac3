//! `clarte`: command-line front end for the billing dashboard.
//!
//! # Example Usage
//!
//! ```bash
//! # Offline, against the bundled demo office
//! clarte --fixture fixtures/demo-office.json --user dr-chen --as-of 2024-07-01 summary
//! clarte --fixture fixtures/demo-office.json --user dr-chen claims --tab "OI 30+"
//! clarte --fixture fixtures/demo-office.json --user dr-chen claims --search aetna --json
//! clarte --fixture fixtures/demo-office.json --user dr-chen receivables --tab "90+ Days"
//! clarte --fixture fixtures/demo-office.json --user dr-chen ledger --tab Wallets
//!
//! # Hosted store, settings from clarte.yaml and CLARTE_* variables
//! CLARTE_RECORD_SOURCE__API_KEY=... clarte --config clarte.yaml --user $USER_ID flags
//! ```

pub mod app;
pub mod cli;
pub mod render;

pub use app::*;
pub use cli::*;
pub use render::*;
