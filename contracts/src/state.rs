//! # Ledger State
//!
//! Every persisted table in one value. The dispatcher clones it before an
//! action, runs the action against the clone and swaps it in on success,
//! which is what makes an action all-or-nothing.
//!
//! ## Snapshots
//!
//! The host persists the state as an opaque `bincode` blob. For audit, each
//! table is also hashed under its own BLAKE3 derive-key context and the
//! table digests are folded into a Merkle root:
//!
//! ```text
//! leaf_i = blake3_derive(ctx_i, bincode(table_i))
//! root   = merkle_root([balances, supply, configs, quotas, refunds])
//! ```

use lot_protocol::hash::{domain_separated_hash, merkle_root, to_hex};
use serde::{Deserialize, Serialize};

use crate::balance::BalanceStore;
use crate::config_registry::ConfigRegistry;
use crate::quota::QuotaLedger;
use crate::refund::RefundLedger;
use crate::supply::SupplyRegistry;

const BALANCES_CONTEXT: &str = "lot-ledger 2026 balances";
const SUPPLY_CONTEXT: &str = "lot-ledger 2026 supply";
const CONFIGS_CONTEXT: &str = "lot-ledger 2026 configs";
const QUOTAS_CONTEXT: &str = "lot-ledger 2026 quotas";
const REFUNDS_CONTEXT: &str = "lot-ledger 2026 refunds";

/// All contract tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Per-account balances.
    pub balances: BalanceStore,
    /// Per-currency supply.
    pub supply: SupplyRegistry,
    /// Operator rule rows.
    pub configs: ConfigRegistry,
    /// Wager records.
    pub quotas: QuotaLedger,
    /// Refund records.
    pub refunds: RefundLedger,
}

impl LedgerState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the state for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restores a state written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Deterministic fingerprint of every table.
    pub fn state_root(&self) -> Result<[u8; 32], bincode::Error> {
        let leaves = [
            domain_separated_hash(BALANCES_CONTEXT, &bincode::serialize(&self.balances)?),
            domain_separated_hash(SUPPLY_CONTEXT, &bincode::serialize(&self.supply)?),
            domain_separated_hash(CONFIGS_CONTEXT, &bincode::serialize(&self.configs)?),
            domain_separated_hash(QUOTAS_CONTEXT, &bincode::serialize(&self.quotas)?),
            domain_separated_hash(REFUNDS_CONTEXT, &bincode::serialize(&self.refunds)?),
        ];
        Ok(merkle_root(&leaves))
    }

    /// [`state_root`](Self::state_root) as lowercase hex.
    pub fn state_root_hex(&self) -> Result<String, bincode::Error> {
        self.state_root().map(|root| to_hex(&root))
    }
}
