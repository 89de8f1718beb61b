//! # Lot Ledger Contract
//!
//! A two-currency ledger with a quota-limited wager book on top. The
//! contract keeps balances and supply for both currencies, and routes every
//! incoming transfer into one of a small set of economic operations:
//!
//! - **Direct transfer** — secondary currency moving between accounts.
//! - **Exchange** — primary currency paid into the treasury, answered by an
//!   issuance of secondary currency at the configured rate.
//! - **Wager** — secondary currency paid into the treasury with a
//!   `type-period-picks` memo, checked against the operator's config rows
//!   and the participant's quota, then recorded.
//! - **Refund** — once a period is stopped, the treasury reverses a wager,
//!   keeping a deduction for the fee collector.
//!
//! ## Design Principles
//!
//! 1. Amounts are `i64` smallest units and every sum is checked.
//! 2. An action is all-or-nothing: it runs against a copy of the state,
//!    including every dependent call it makes.
//! 3. Routing is one ordered match over a closed set of routes.
//! 4. Runtime parameters are an explicit value, rebuilt per action from
//!    the config rows.

pub mod action;
pub mod balance;
pub mod config_registry;
pub mod contract;
pub mod error;
pub mod memo;
pub mod metrics;
pub mod params;
pub mod quota;
pub mod refund;
pub mod router;
pub mod state;
pub mod supply;

pub use action::{Action, ActionReceipt};
pub use config_registry::{ConfigEntry, ConfigRegistry, ConfigRow, UpsertOutcome};
pub use contract::{ActionContext, Authority, LotContract};
pub use error::LedgerError;
pub use metrics::LedgerMetrics;
pub use params::RuntimeParams;
pub use quota::{HitRecord, QuotaPartition};
pub use refund::RefundRecord;
pub use router::Route;
pub use state::LedgerState;
