//! # Config Registry
//!
//! Operator-maintained rule rows keyed by `(type, period)`. A row says
//! whether wagers for the pair are still open (`stop == false`) or closed
//! and awaiting refunds, and carries a free-form memo plus bookkeeping
//! targets the contract stores but does not interpret.
//!
//! The row whose type is `"init"` is special: its memo holds the runtime
//! parameters (see [`crate::params`]).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Values written by an `init` action. Everything except the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Wager type, e.g. `"db"`, `"3d"`, or `"init"`.
    pub typ: String,
    /// Period label, e.g. `"week1"`.
    pub period: String,
    /// Wagers closed, refunds open.
    pub stop: bool,
    /// Free-form; parsed as runtime parameters on the `"init"` row.
    pub memo: String,
    /// First draw index covered by the period.
    pub start_index: u64,
    /// Last draw index covered by the period.
    pub end_index: u64,
    /// Target hit count.
    pub total_hit: u32,
    /// Target amount.
    pub total_amount: u32,
}

impl ConfigEntry {
    /// Builds an open entry with an empty memo and zeroed targets.
    pub fn new(typ: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            typ: typ.into(),
            period: period.into(),
            ..Self::default()
        }
    }

    /// Sets the stop flag.
    pub fn stopped(mut self, stop: bool) -> Self {
        self.stop = stop;
        self
    }

    /// Sets the memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// A stored config row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRow {
    /// Assigned on insert, never reused.
    pub id: u64,
    /// The row's values.
    pub entry: ConfigEntry,
}

/// Whether an upsert created a row or rewrote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was added with this id.
    Inserted(u64),
    /// The row with this id was overwritten.
    Updated(u64),
}

impl UpsertOutcome {
    /// Id of the affected row.
    pub fn id(self) -> u64 {
        match self {
            Self::Inserted(id) | Self::Updated(id) => id,
        }
    }
}

/// Config rows in insertion order. At most one row per `(type, period)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRegistry {
    rows: Vec<ConfigRow>,
}

impl ConfigRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, or overwrites every field of the row with the same
    /// `(type, period)`. The id of an existing row is kept.
    pub fn upsert(&mut self, entry: ConfigEntry) -> UpsertOutcome {
        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.entry.typ == entry.typ && r.entry.period == entry.period)
        {
            row.entry = entry;
            return UpsertOutcome::Updated(row.id);
        }

        let id = self.next_id();
        self.rows.push(ConfigRow { id, entry });
        UpsertOutcome::Inserted(id)
    }

    /// Row for `(typ, period)`.
    pub fn find(&self, typ: &str, period: &str) -> Option<&ConfigRow> {
        self.rows
            .iter()
            .find(|r| r.entry.typ == typ && r.entry.period == period)
    }

    /// First row, in id order, whose type is `typ`.
    pub fn find_by_type(&self, typ: &str) -> Option<&ConfigRow> {
        self.rows.iter().find(|r| r.entry.typ == typ)
    }

    /// All rows in id order.
    pub fn rows(&self) -> &[ConfigRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the registry holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn next_id(&self) -> u64 {
        self.rows.last().map(|r| r.id + 1).unwrap_or(0)
    }
}
