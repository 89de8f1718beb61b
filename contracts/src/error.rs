//! Error type shared by every contract operation.
//!
//! Each variant is one terminal failure kind. Whatever the variant, the
//! action that produced it is rolled back in full; the `Display` string is
//! the diagnostic handed back to the caller.

use lot_protocol::types::{AccountName, SymbolCode};
use thiserror::Error;

/// Errors that abort a contract action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The action lacks the authority of a required account.
    #[error("missing required authority of {0}")]
    Unauthorized(AccountName),

    /// The symbol is malformed or does not match the registered precision.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A currency with this code is already registered.
    #[error("token with symbol already exists: {0}")]
    AlreadyExists(SymbolCode),

    /// The currency has not been created.
    #[error("token with symbol does not exist, create token before issue: {0}")]
    NotFound(SymbolCode),

    /// The quantity is out of range or not positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Issuing would push the supply past its maximum.
    #[error("quantity exceeds available supply: requested {requested}, available {available}")]
    SupplyExceeded {
        /// Smallest units requested.
        requested: i64,
        /// Smallest units still issuable.
        available: i64,
    },

    /// The debited account holds less than the amount.
    #[error("overdrawn balance: {owner} holds {available}, needs {requested}")]
    InsufficientBalance {
        /// The debited account.
        owner: AccountName,
        /// Its current balance in smallest units.
        available: i64,
        /// The requested debit in smallest units.
        requested: i64,
    },

    /// The wager memo is empty.
    #[error("bad memo")]
    BadMemo,

    /// The wager memo has no type segment.
    #[error("bad type")]
    BadType,

    /// The wager memo has no period segment.
    #[error("bad period")]
    BadPeriod,

    /// The wager memo has no hit-detail segment.
    #[error("bad hit")]
    BadHit,

    /// The hit detail has the wrong number of picks for its type.
    #[error("bad hit number: type {typ:?} with {count} picks")]
    BadHitNumber {
        /// Wager type from the memo.
        typ: String,
        /// Pick count produced by the scan.
        count: usize,
    },

    /// The wager is not a whole number of hit units.
    #[error("bad amount: {amount} is not a multiple of {unit}")]
    BadAmount {
        /// Wagered smallest units.
        amount: i64,
        /// Smallest units per hit.
        unit: i64,
    },

    /// No config row for the (type, period) pair.
    #[error("bad type or period: {typ:?}/{period:?}")]
    BadTypeOrPeriod {
        /// Requested type.
        typ: String,
        /// Requested period.
        period: String,
    },

    /// Wagers are closed for the (type, period) pair.
    #[error("hit has stopped: {typ:?}/{period:?}")]
    HitStopped {
        /// Wager type.
        typ: String,
        /// Wager period.
        period: String,
    },

    /// Refunds need the (type, period) pair to be closed first.
    #[error("hit not stopped: {typ:?}/{period:?}")]
    HitNotStopped {
        /// Wager type.
        typ: String,
        /// Wager period.
        period: String,
    },

    /// The participant's cumulative wagers would pass the cap.
    #[error("reach limit: already wagered {used}, adding {requested} exceeds cap {cap}")]
    QuotaExceeded {
        /// Smallest units already wagered.
        used: i64,
        /// Smallest units in this wager.
        requested: i64,
        /// Cap in smallest units.
        cap: i64,
    },

    /// Source and destination are the same account.
    #[error("cannot transfer to self")]
    SelfTransfer,

    /// The referenced account does not exist on the host.
    #[error("account does not exist: {0}")]
    AccountNotFound(AccountName),

    /// The memo is longer than 256 bytes.
    #[error("memo has more than 256 bytes ({0})")]
    MemoTooLong(usize),

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// A runtime parameter segment is not a valid number.
    #[error("invalid runtime parameter {name}: {segment:?}")]
    InvalidParameter {
        /// Which parameter failed.
        name: &'static str,
        /// The raw segment.
        segment: String,
    },
}

impl LedgerError {
    /// Stable snake_case identifier, used for log fields and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidSymbol(_) => "invalid_symbol",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::SupplyExceeded { .. } => "supply_exceeded",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::BadMemo => "bad_memo",
            Self::BadType => "bad_type",
            Self::BadPeriod => "bad_period",
            Self::BadHit => "bad_hit",
            Self::BadHitNumber { .. } => "bad_hit_number",
            Self::BadAmount { .. } => "bad_amount",
            Self::BadTypeOrPeriod { .. } => "bad_type_or_period",
            Self::HitStopped { .. } => "hit_stopped",
            Self::HitNotStopped { .. } => "hit_not_stopped",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::SelfTransfer => "self_transfer",
            Self::AccountNotFound(_) => "account_not_found",
            Self::MemoTooLong(_) => "memo_too_long",
            Self::Overflow(_) => "overflow",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_name_the_failure() {
        let err = LedgerError::QuotaExceeded {
            used: 49_000_000,
            requested: 2_000_000,
            cap: 50_000_000,
        };
        assert!(err.to_string().starts_with("reach limit"));
        assert_eq!(err.code(), "quota_exceeded");
        assert_eq!(LedgerError::SelfTransfer.to_string(), "cannot transfer to self");
    }

    #[test]
    fn memo_length_is_reported() {
        assert_eq!(
            LedgerError::MemoTooLong(300).to_string(),
            "memo has more than 256 bytes (300)"
        );
    }
}
