//! # Quota Ledger
//!
//! Append-only wager records. Records are scoped by the receiving account
//! and split into two partitions: `"3d"` wagers in their own table, every
//! other type in the standard one. A participant's usage for a
//! `(type, period)` is the sum of their records in the matching partition.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lot_protocol::config::WAGER_TYPE_3D;
use lot_protocol::types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Which record table a wager type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuotaPartition {
    /// `"3d"` wagers.
    ThreeD,
    /// All other wager types.
    Standard,
}

impl QuotaPartition {
    /// Partition for a wager type.
    pub fn for_type(typ: &str) -> Self {
        if typ == WAGER_TYPE_3D {
            Self::ThreeD
        } else {
            Self::Standard
        }
    }

    /// Table name used in logs and state fingerprints.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThreeD => "hit3d",
            Self::Standard => "hit",
        }
    }
}

/// One accepted wager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    /// Sequential within its (scope, partition) table.
    pub id: u64,
    /// The wagering account.
    pub participant: AccountName,
    /// Amount wagered.
    pub quantity: Asset,
    /// When the wager was accepted.
    pub timestamp: DateTime<Utc>,
    /// The hit detail from the memo.
    pub memo: String,
    /// Wager period.
    pub period: String,
    /// Wager type.
    pub typ: String,
}

/// Fields of a record before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHit {
    /// The wagering account.
    pub participant: AccountName,
    /// Amount wagered.
    pub quantity: Asset,
    /// When the wager was accepted.
    pub timestamp: DateTime<Utc>,
    /// The hit detail.
    pub memo: String,
    /// Wager period.
    pub period: String,
    /// Wager type.
    pub typ: String,
}

/// Wager records keyed by `(scope, partition)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLedger {
    tables: BTreeMap<(AccountName, QuotaPartition), Vec<HitRecord>>,
}

impl QuotaLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total wagered by `participant` on `(typ, period)` in `scope`.
    pub fn usage(
        &self,
        scope: &AccountName,
        participant: &AccountName,
        typ: &str,
        period: &str,
    ) -> Result<i64, LedgerError> {
        self.records(scope, QuotaPartition::for_type(typ))
            .iter()
            .filter(|r| r.typ == typ && r.period == period && &r.participant == participant)
            .try_fold(0i64, |total, r| {
                total
                    .checked_add(r.quantity.amount)
                    .ok_or(LedgerError::Overflow("quota usage"))
            })
    }

    /// Appends a record to the partition of its type and returns its id.
    pub fn append(&mut self, scope: &AccountName, hit: NewHit) -> u64 {
        let partition = QuotaPartition::for_type(&hit.typ);
        let table = self.tables.entry((scope.clone(), partition)).or_default();
        let id = table.last().map(|r| r.id + 1).unwrap_or(0);
        table.push(HitRecord {
            id,
            participant: hit.participant,
            quantity: hit.quantity,
            timestamp: hit.timestamp,
            memo: hit.memo,
            period: hit.period,
            typ: hit.typ,
        });
        id
    }

    /// Records of one table in id order.
    pub fn records(&self, scope: &AccountName, partition: QuotaPartition) -> &[HitRecord] {
        self.tables
            .get(&(scope.clone(), partition))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every table, keyed by scope and partition.
    pub fn tables(&self) -> impl Iterator<Item = (&(AccountName, QuotaPartition), &Vec<HitRecord>)> {
        self.tables.iter()
    }

    /// Total number of records across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Returns `true` if no wager has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
