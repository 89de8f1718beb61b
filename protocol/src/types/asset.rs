//! Symbols and fixed-point asset amounts.
//!
//! An [`Asset`] is an `i64` count of the smallest unit of a currency plus
//! the [`Symbol`] that says how many of those units make one whole token.
//! `Asset::new(1_000_000, lot)` with precision 4 is `100.0000 LOT`.
//!
//! No floating point ever touches an amount. Parsing and formatting go
//! through string manipulation on the integer representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest magnitude an asset amount may hold: `2^62 - 1`.
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// Largest supported symbol precision. `10^18` still fits in an `i64`.
pub const MAX_PRECISION: u8 = 18;

/// Maximum length of a symbol code.
pub const MAX_SYMBOL_CODE_LENGTH: usize = 7;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while building or parsing assets and symbols.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The symbol code is empty, too long, or not all uppercase letters.
    #[error("invalid symbol code: {0:?}")]
    InvalidSymbolCode(String),

    /// The precision exceeds [`MAX_PRECISION`].
    #[error("invalid symbol precision: {0}")]
    InvalidPrecision(u8),

    /// The textual amount could not be parsed.
    #[error("invalid asset string: {0:?}")]
    Malformed(String),

    /// The amount does not fit in the asset range.
    #[error("asset amount out of range: {0}")]
    OutOfRange(String),
}

// ---------------------------------------------------------------------------
// SymbolCode / Symbol
// ---------------------------------------------------------------------------

/// The ticker part of a symbol, e.g. `LOT` or `EOS`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCode(String);

impl SymbolCode {
    /// Validates and wraps a ticker.
    pub fn new(code: &str) -> Result<Self, AssetError> {
        let code = Self(code.to_string());
        if code.is_valid() {
            Ok(code)
        } else {
            Err(AssetError::InvalidSymbolCode(code.0))
        }
    }

    /// Wraps a compile-time ticker without validation.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_string())
    }

    /// 1 to 7 uppercase ASCII letters.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= MAX_SYMBOL_CODE_LENGTH
            && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }

    /// Returns the ticker.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A currency symbol: ticker plus decimal precision.
///
/// Two symbols are equal only if both code and precision match, so a
/// `4,LOT` asset is rejected where `2,LOT` is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Number of decimal places.
    pub precision: u8,
    /// Ticker.
    pub code: SymbolCode,
}

impl Symbol {
    /// Builds a validated symbol.
    pub fn new(precision: u8, code: &str) -> Result<Self, AssetError> {
        if precision > MAX_PRECISION {
            return Err(AssetError::InvalidPrecision(precision));
        }
        Ok(Self {
            precision,
            code: SymbolCode::new(code)?,
        })
    }

    /// Returns `true` if both the code and the precision are acceptable.
    pub fn is_valid(&self) -> bool {
        self.precision <= MAX_PRECISION && self.code.is_valid()
    }

    /// Number of smallest units in one whole token: `10^precision`.
    pub fn scale(&self) -> i64 {
        10i64.pow(u32::from(self.precision.min(MAX_PRECISION)))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// An amount of a currency in its smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Count of smallest units. May be negative only transiently; the
    /// ledger rejects non-positive quantities at every entry point.
    pub amount: i64,
    /// Currency of the amount.
    pub symbol: Symbol,
}

impl Asset {
    /// Creates an asset from a raw smallest-unit amount.
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    /// Creates a zero amount of the given currency.
    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    /// Amount within `±MAX_AMOUNT` and a valid symbol.
    pub fn is_valid(&self) -> bool {
        (-MAX_AMOUNT..=MAX_AMOUNT).contains(&self.amount) && self.symbol.is_valid()
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Adds two amounts of the same currency. `None` on overflow, on
    /// leaving the valid range, or on a symbol mismatch.
    pub fn checked_add(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .filter(|a| (-MAX_AMOUNT..=MAX_AMOUNT).contains(a))
            .map(|amount| Asset::new(amount, self.symbol.clone()))
    }

    /// Subtracts `other` from `self`. Same failure rules as [`checked_add`](Self::checked_add).
    pub fn checked_sub(&self, other: &Asset) -> Option<Asset> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .filter(|a| (-MAX_AMOUNT..=MAX_AMOUNT).contains(a))
            .map(|amount| Asset::new(amount, self.symbol.clone()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        let precision = u32::from(self.symbol.precision.min(MAX_PRECISION));
        if precision == 0 {
            return write!(f, "{}{} {}", sign, magnitude, self.symbol.code);
        }
        let divisor = 10u64.pow(precision);
        write!(
            f,
            "{}{}.{:0>width$} {}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            self.symbol.code,
            width = precision as usize
        )
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    /// Parses `"100.0000 LOT"`. The number of fractional digits becomes the
    /// symbol precision.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AssetError::Malformed(s.to_string());

        let (number, code) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if digits.contains('.') && frac.is_empty() {
            return Err(malformed());
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let precision = u8::try_from(frac.len()).map_err(|_| malformed())?;
        let symbol = Symbol::new(precision, code.trim())?;

        let out_of_range = || AssetError::OutOfRange(s.to_string());
        let mut amount: i64 = format!("{whole}{frac}").parse().map_err(|_| out_of_range())?;
        if negative {
            amount = -amount;
        }
        if !(-MAX_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            return Err(out_of_range());
        }

        Ok(Asset::new(amount, symbol))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> Symbol {
        Symbol::new(4, "LOT").unwrap()
    }

    #[test]
    fn symbol_validation() {
        assert!(Symbol::new(4, "LOT").is_ok());
        assert!(Symbol::new(4, "lot").is_err());
        assert!(Symbol::new(4, "").is_err());
        assert!(Symbol::new(4, "TOOLONGX").is_err());
        assert_eq!(Symbol::new(19, "LOT"), Err(AssetError::InvalidPrecision(19)));
    }

    #[test]
    fn scale_follows_precision() {
        assert_eq!(lot().scale(), 10_000);
        assert_eq!(Symbol::new(0, "PTS").unwrap().scale(), 1);
    }

    #[test]
    fn display_formats_fixed_point() {
        assert_eq!(Asset::new(1_000_000, lot()).to_string(), "100.0000 LOT");
        assert_eq!(Asset::new(5, lot()).to_string(), "0.0005 LOT");
        assert_eq!(Asset::new(-15_000, lot()).to_string(), "-1.5000 LOT");
        let pts = Symbol::new(0, "PTS").unwrap();
        assert_eq!(Asset::new(42, pts).to_string(), "42 PTS");
    }

    #[test]
    fn parse_reads_precision_from_fraction() {
        let a: Asset = "100.0000 LOT".parse().unwrap();
        assert_eq!(a, Asset::new(1_000_000, lot()));

        let b: Asset = "-0.50 EOS".parse().unwrap();
        assert_eq!(b.amount, -50);
        assert_eq!(b.symbol.precision, 2);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("LOT".parse::<Asset>().is_err());
        assert!("1. LOT".parse::<Asset>().is_err());
        assert!("1.x0 LOT".parse::<Asset>().is_err());
        assert!("1.00 lot".parse::<Asset>().is_err());
        assert!("99999999999999999999 LOT".parse::<Asset>().is_err());
    }

    #[test]
    fn validity_bounds() {
        assert!(Asset::new(MAX_AMOUNT, lot()).is_valid());
        assert!(!Asset::new(MAX_AMOUNT + 1, lot()).is_valid());
    }

    #[test]
    fn checked_arithmetic() {
        let a = Asset::new(10, lot());
        let b = Asset::new(3, lot());
        assert_eq!(a.checked_add(&b).unwrap().amount, 13);
        assert_eq!(a.checked_sub(&b).unwrap().amount, 7);
        assert!(Asset::new(MAX_AMOUNT, lot()).checked_add(&b).is_none());

        let eos = Asset::new(3, Symbol::new(4, "EOS").unwrap());
        assert!(a.checked_add(&eos).is_none());
    }
}
