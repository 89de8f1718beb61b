//! # Wager Memo
//!
//! A wager names what it is for in the transfer memo:
//!
//! ```text
//! <type>-<period>-<hit detail>
//! db-week1-01 05 12 19 23 28 07
//! ```
//!
//! The type and period are split off at the first two `-`; everything after
//! the second `-` is the hit detail, a space-separated list of picks that is
//! stored verbatim on the wager record.
//!
//! ## Pick counting
//!
//! Picks are counted with a delimiter scan that starts at offset 0, searches
//! for the next space from one past the previous hit, and counts every
//! search including the last one that finds nothing. For well-formed detail
//! (single spaces, no leading space) this equals the number of picks. It
//! diverges on a leading space (skipped) and on runs of spaces (each space
//! counts); ledgers replaying old wagers depend on this exact count, so it
//! is kept.

use lot_protocol::config::{
    DB_HIT_COUNT, HIT_TOKEN_DELIMITER, MEMO_FIELD_DELIMITER, THREE_D_HIT_COUNT, WAGER_TYPE_3D,
    WAGER_TYPE_DB,
};

use crate::error::LedgerError;

/// A parsed wager memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerMemo<'a> {
    /// Wager type, e.g. `"db"`.
    pub typ: &'a str,
    /// Period label.
    pub period: &'a str,
    /// Hit detail, stored on the record.
    pub detail: &'a str,
}

impl<'a> WagerMemo<'a> {
    /// Splits a wager memo into its three fields.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::BadMemo`] for an empty memo.
    /// - [`LedgerError::BadType`] if there is no `-` or the type is empty.
    /// - [`LedgerError::BadPeriod`] if there is no second `-` or the period
    ///   is empty.
    /// - [`LedgerError::BadHit`] if the detail is empty.
    pub fn parse(memo: &'a str) -> Result<Self, LedgerError> {
        if memo.is_empty() {
            return Err(LedgerError::BadMemo);
        }

        let (typ, rest) = memo
            .split_once(MEMO_FIELD_DELIMITER)
            .ok_or(LedgerError::BadType)?;
        if typ.is_empty() {
            return Err(LedgerError::BadType);
        }

        let (period, detail) = rest
            .split_once(MEMO_FIELD_DELIMITER)
            .ok_or(LedgerError::BadPeriod)?;
        if period.is_empty() {
            return Err(LedgerError::BadPeriod);
        }

        if detail.is_empty() {
            return Err(LedgerError::BadHit);
        }

        Ok(Self {
            typ,
            period,
            detail,
        })
    }

    /// Pick count of the detail. See the module docs for the exact rule.
    pub fn hit_count(&self) -> usize {
        hit_count(self.detail)
    }

    /// Checks the pick count against the type's requirement.
    ///
    /// # Errors
    ///
    /// [`LedgerError::BadHitNumber`] if the type is unknown or the count is
    /// wrong for it.
    pub fn check_hit_number(&self) -> Result<usize, LedgerError> {
        let count = self.hit_count();
        match expected_hit_count(self.typ) {
            Some(expected) if expected == count => Ok(count),
            _ => Err(LedgerError::BadHitNumber {
                typ: self.typ.to_string(),
                count,
            }),
        }
    }
}

/// Number of picks a wager type requires, or `None` for types that cannot
/// be wagered on.
pub fn expected_hit_count(typ: &str) -> Option<usize> {
    match typ {
        WAGER_TYPE_DB => Some(DB_HIT_COUNT),
        WAGER_TYPE_3D => Some(THREE_D_HIT_COUNT),
        _ => None,
    }
}

/// Counts delimiter searches over `detail`, last failed search included.
pub fn hit_count(detail: &str) -> usize {
    let bytes = detail.as_bytes();
    let delimiter = HIT_TOKEN_DELIMITER as u8;

    let mut index = 0usize;
    let mut count = 0usize;
    loop {
        count += 1;
        let from = index + 1;
        match bytes
            .get(from..)
            .and_then(|rest| rest.iter().position(|&b| b == delimiter))
        {
            Some(offset) => index = from + offset,
            None => return count,
        }
    }
}
