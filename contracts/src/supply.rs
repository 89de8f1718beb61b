//! # Supply Registry
//!
//! One row per currency code: the issued supply, the hard maximum, and the
//! account allowed to issue. Supply only ever grows; there is no retire
//! path, so `supply <= max_supply` is established by `create` and kept by
//! every `record_issue`.

use std::collections::BTreeMap;

use lot_protocol::types::{AccountName, Asset, Symbol, SymbolCode};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Supply information for one registered currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStats {
    /// Issued so far. Same symbol as `max_supply`.
    pub supply: Asset,
    /// Upper bound on `supply`.
    pub max_supply: Asset,
    /// The only account that may issue.
    pub issuer: AccountName,
}

impl CurrencyStats {
    /// The registered symbol, precision included.
    pub fn symbol(&self) -> &Symbol {
        &self.max_supply.symbol
    }

    /// Smallest units still issuable.
    pub fn available(&self) -> i64 {
        self.max_supply.amount - self.supply.amount
    }
}

/// Registered currencies keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyRegistry {
    stats: BTreeMap<SymbolCode, CurrencyStats>,
}

impl SupplyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a currency with zero supply.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidSymbol`] for a malformed symbol.
    /// - [`LedgerError::InvalidAmount`] if `max_supply` is out of range or not
    ///   positive.
    /// - [`LedgerError::AlreadyExists`] if the code is taken, whatever the
    ///   precision.
    pub fn create(
        &mut self,
        issuer: AccountName,
        max_supply: Asset,
    ) -> Result<&CurrencyStats, LedgerError> {
        if !max_supply.symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol(max_supply.symbol.to_string()));
        }
        if !max_supply.is_valid() {
            return Err(LedgerError::InvalidAmount(format!(
                "invalid supply {max_supply}"
            )));
        }
        if max_supply.amount <= 0 {
            return Err(LedgerError::InvalidAmount(
                "max-supply must be positive".into(),
            ));
        }

        let code = max_supply.symbol.code.clone();
        if self.stats.contains_key(&code) {
            return Err(LedgerError::AlreadyExists(code));
        }

        let stats = CurrencyStats {
            supply: Asset::zero(max_supply.symbol.clone()),
            max_supply,
            issuer,
        };
        Ok(&*self.stats.entry(code).or_insert(stats))
    }

    /// Looks up a currency by code.
    pub fn get(&self, code: &SymbolCode) -> Option<&CurrencyStats> {
        self.stats.get(code)
    }

    /// Looks up a currency, failing with [`LedgerError::NotFound`].
    pub fn require(&self, code: &SymbolCode) -> Result<&CurrencyStats, LedgerError> {
        self.get(code)
            .ok_or_else(|| LedgerError::NotFound(code.clone()))
    }

    /// Adds `quantity` to the issued supply. Balances are not touched; the
    /// caller credits the issuer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the currency is not registered.
    /// - [`LedgerError::InvalidSymbol`] if the precision differs.
    /// - [`LedgerError::SupplyExceeded`] if the maximum would be passed.
    pub fn record_issue(&mut self, quantity: &Asset) -> Result<&CurrencyStats, LedgerError> {
        let code = &quantity.symbol.code;
        let stats = self
            .stats
            .get_mut(code)
            .ok_or_else(|| LedgerError::NotFound(code.clone()))?;

        if stats.supply.symbol != quantity.symbol {
            return Err(LedgerError::InvalidSymbol(format!(
                "symbol precision mismatch: registered {}, got {}",
                stats.supply.symbol, quantity.symbol
            )));
        }

        let available = stats.available();
        if quantity.amount > available {
            return Err(LedgerError::SupplyExceeded {
                requested: quantity.amount,
                available,
            });
        }

        stats.supply = stats
            .supply
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow("supply issue"))?;
        Ok(&*stats)
    }

    /// All registered currencies in code order.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyStats> {
        self.stats.values()
    }

    /// Number of registered currencies.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns `true` if no currency is registered.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(amount: i64) -> Asset {
        Asset::new(amount, Symbol::new(4, "LOT").unwrap())
    }

    fn issuer() -> AccountName {
        AccountName::from("lotttttttttt")
    }

    #[test]
    fn create_registers_zero_supply() {
        let mut registry = SupplyRegistry::new();
        let stats = registry.create(issuer(), lot(1_000_000)).unwrap();
        assert_eq!(stats.supply, lot(0));
        assert_eq!(stats.available(), 1_000_000);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_code_rejected_regardless_of_precision() {
        let mut registry = SupplyRegistry::new();
        registry.create(issuer(), lot(1_000_000)).unwrap();
        let two_dp = Asset::new(10, Symbol::new(2, "LOT").unwrap());
        assert!(matches!(
            registry.create(issuer(), two_dp),
            Err(LedgerError::AlreadyExists(_))
        ));
    }

    #[test]
    fn non_positive_max_rejected() {
        let mut registry = SupplyRegistry::new();
        assert!(matches!(
            registry.create(issuer(), lot(0)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            registry.create(issuer(), lot(-5)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn issue_up_to_max_then_rejected() {
        let mut registry = SupplyRegistry::new();
        registry.create(issuer(), lot(1000)).unwrap();
        registry.record_issue(&lot(600)).unwrap();
        let stats = registry.record_issue(&lot(400)).unwrap();
        assert_eq!(stats.supply, lot(1000));

        assert_eq!(
            registry.record_issue(&lot(1)),
            Err(LedgerError::SupplyExceeded {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn issue_unknown_currency_rejected() {
        let mut registry = SupplyRegistry::new();
        assert!(matches!(
            registry.record_issue(&lot(1)),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn issue_with_wrong_precision_rejected() {
        let mut registry = SupplyRegistry::new();
        registry.create(issuer(), lot(1000)).unwrap();
        let two_dp = Asset::new(1, Symbol::new(2, "LOT").unwrap());
        assert!(matches!(
            registry.record_issue(&two_dp),
            Err(LedgerError::InvalidSymbol(_))
        ));
    }
}
