//! # Actions
//!
//! The five entry points the host can invoke, as one tagged enum. JSON
//! payloads carry the action name in an `"action"` field:
//!
//! ```json
//! { "action": "transfer", "from": "alice", "to": "bob",
//!   "quantity": { "amount": 5000, "symbol": { "precision": 4, "code": "LOT" } },
//!   "memo": "" }
//! ```

use chrono::{DateTime, Utc};
use lot_protocol::types::{AccountName, Asset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config_registry::ConfigEntry;

/// A host-invoked contract action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Register a currency.
    Create {
        /// Account allowed to issue.
        issuer: AccountName,
        /// Supply cap; its symbol defines the currency.
        maximum_supply: Asset,
    },
    /// Mint to the issuer, then forward to `to`.
    Issue {
        /// Final recipient.
        to: AccountName,
        /// Amount to mint.
        quantity: Asset,
        /// Passed on to the forwarding transfer.
        memo: String,
    },
    /// Move value. Routed by currency and parties.
    Transfer {
        /// Payer.
        from: AccountName,
        /// Payee.
        to: AccountName,
        /// Amount.
        quantity: Asset,
        /// Free text, or a wager memo.
        memo: String,
    },
    /// Reverse a closed period's wager with a fee split.
    Refund {
        /// Must be the treasury.
        from: AccountName,
        /// Refund recipient.
        to: AccountName,
        /// Gross secondary amount being refunded.
        quantity: Asset,
        /// Wager type.
        typ: String,
        /// Wager period.
        period: String,
        /// Stored on the refund record.
        memo: String,
    },
    /// Upsert a config row.
    Init(ConfigEntry),
}

impl Action {
    /// The action's name as it appears in the `"action"` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Issue { .. } => "issue",
            Self::Transfer { .. } => "transfer",
            Self::Refund { .. } => "refund",
            Self::Init(_) => "init",
        }
    }
}

/// Returned for every committed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    /// Unique per execution.
    pub id: Uuid,
    /// The action name.
    pub action: String,
    /// Host time at execution.
    pub executed_at: DateTime<Utc>,
    /// Accounts notified, in first-notified order.
    pub notified: Vec<AccountName>,
}
