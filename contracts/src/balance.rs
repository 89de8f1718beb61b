//! # Balance Store
//!
//! One row per (owner, currency code). A row is created by the first credit
//! and erased by the debit that brings it to exactly zero, so the table
//! never holds a zero balance and never holds a negative one.
//!
//! Credits and debits are only ever issued in pairs by a transfer, or as
//! the issuer credit of an issuance. Nothing here checks authority.

use std::collections::BTreeMap;

use lot_protocol::types::{AccountName, Asset, SymbolCode};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Per-account, per-currency balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceStore {
    rows: BTreeMap<AccountName, BTreeMap<SymbolCode, Asset>>,
}

impl BalanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to `owner`'s balance, creating the row if needed.
    /// Returns the new balance in smallest units.
    ///
    /// A zero credit leaves the table untouched.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Overflow`] if the balance would leave the asset range,
    /// [`LedgerError::InvalidSymbol`] if the stored row has another precision.
    pub fn credit(&mut self, owner: &AccountName, value: &Asset) -> Result<i64, LedgerError> {
        if value.is_zero() {
            return Ok(self.balance_of(owner, &value.symbol.code));
        }

        let row = self
            .rows
            .entry(owner.clone())
            .or_default()
            .entry(value.symbol.code.clone())
            .or_insert_with(|| Asset::zero(value.symbol.clone()));

        if row.symbol != value.symbol {
            return Err(LedgerError::InvalidSymbol(format!(
                "balance held as {}, credited as {}",
                row.symbol, value.symbol
            )));
        }

        *row = row
            .checked_add(value)
            .ok_or(LedgerError::Overflow("balance credit"))?;
        Ok(row.amount)
    }

    /// Subtracts `value` from `owner`'s balance. An exact debit erases the
    /// row. Returns the remaining balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientBalance`] if the row is missing or holds
    /// less than `value`.
    pub fn debit(&mut self, owner: &AccountName, value: &Asset) -> Result<i64, LedgerError> {
        let code = &value.symbol.code;
        let insufficient = |available: i64| LedgerError::InsufficientBalance {
            owner: owner.clone(),
            available,
            requested: value.amount,
        };

        let per_owner = self.rows.get_mut(owner).ok_or_else(|| insufficient(0))?;
        let row = per_owner.get_mut(code).ok_or_else(|| insufficient(0))?;

        if row.amount < value.amount {
            return Err(insufficient(row.amount));
        }

        if row.amount == value.amount {
            per_owner.remove(code);
            if per_owner.is_empty() {
                self.rows.remove(owner);
            }
            return Ok(0);
        }

        *row = row
            .checked_sub(value)
            .ok_or_else(|| LedgerError::InvalidSymbol(value.symbol.to_string()))?;
        Ok(row.amount)
    }

    /// Returns the row for (owner, code), if any.
    pub fn get(&self, owner: &AccountName, code: &SymbolCode) -> Option<&Asset> {
        self.rows.get(owner).and_then(|per_owner| per_owner.get(code))
    }

    /// Returns the balance in smallest units, or 0 without a row.
    pub fn balance_of(&self, owner: &AccountName, code: &SymbolCode) -> i64 {
        self.get(owner, code).map(|a| a.amount).unwrap_or(0)
    }

    /// Every balance row held by `owner`.
    pub fn holdings(&self, owner: &AccountName) -> Vec<&Asset> {
        self.rows
            .get(owner)
            .map(|per_owner| per_owner.values().collect())
            .unwrap_or_default()
    }

    /// Sum of every holder's balance of `code`. Equals the circulating
    /// supply when the books are consistent.
    pub fn circulating(&self, code: &SymbolCode) -> i64 {
        self.rows
            .values()
            .filter_map(|per_owner| per_owner.get(code))
            .map(|a| a.amount)
            .sum()
    }

    /// Number of (owner, currency) rows.
    pub fn row_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no balance rows exist.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
