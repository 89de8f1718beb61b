//! # Runtime Parameters
//!
//! Four numbers steer every action: the exchange rate, the wager unit, the
//! per-participant hit cap and the refund deduction. They live in the memo
//! of the first `"init"` config row as `rate-unit-cap-deduction`, e.g.
//! `"1000-100-50-10"`. Trailing segments may be left off and keep their
//! defaults; an empty or missing memo means all defaults.
//!
//! The struct is rebuilt at the start of each action and passed down
//! explicitly. Nothing caches it between actions.

use lot_protocol::config::{
    DEFAULT_DEDUCTION, DEFAULT_EXCHANGE_RATE, DEFAULT_MAX_HIT, DEFAULT_PER_HIT,
    MEMO_FIELD_DELIMITER, PARAMS_CONFIG_TYPE, REFUND_DIVISOR, REFUND_PERCENT_BASE,
};
use lot_protocol::types::Symbol;
use serde::{Deserialize, Serialize};

use crate::config_registry::ConfigRegistry;
use crate::error::LedgerError;

/// Action-scoped tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeParams {
    /// Secondary units issued per primary unit deposited.
    pub exchange_rate: u16,
    /// Whole secondary tokens per hit.
    pub per_hit: u16,
    /// Hits a participant may buy per (type, period).
    pub max_hit: u8,
    /// Refund deduction in percent.
    pub deduction: u8,
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            per_hit: DEFAULT_PER_HIT,
            max_hit: DEFAULT_MAX_HIT,
            deduction: DEFAULT_DEDUCTION,
        }
    }
}

impl RuntimeParams {
    /// Parses a parameter memo. Segments are positional; an empty memo
    /// yields the defaults.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidParameter`] if a present segment is not a
    /// number that fits its field, or the deduction is above 100.
    pub fn parse(memo: &str) -> Result<Self, LedgerError> {
        let mut params = Self::default();
        if memo.is_empty() {
            return Ok(params);
        }

        let mut segments = memo.splitn(4, MEMO_FIELD_DELIMITER);
        if let Some(segment) = segments.next() {
            params.exchange_rate = parse_segment("exchange_rate", segment)?;
        }
        if let Some(segment) = segments.next() {
            params.per_hit = parse_segment("per_hit", segment)?;
        }
        if let Some(segment) = segments.next() {
            params.max_hit = parse_segment("max_hit", segment)?;
        }
        if let Some(segment) = segments.next() {
            params.deduction = parse_segment("deduction", segment)?;
        }

        if i64::from(params.deduction) > REFUND_PERCENT_BASE {
            return Err(LedgerError::InvalidParameter {
                name: "deduction",
                segment: params.deduction.to_string(),
            });
        }
        Ok(params)
    }

    /// Derives the parameters from the first `"init"` row of `configs`.
    pub fn from_registry(configs: &ConfigRegistry) -> Result<Self, LedgerError> {
        match configs.find_by_type(PARAMS_CONFIG_TYPE) {
            Some(row) => Self::parse(&row.entry.memo),
            None => Ok(Self::default()),
        }
    }

    /// Smallest units of `symbol` per hit. Every wager must be a multiple.
    pub fn hit_unit(&self, symbol: &Symbol) -> Result<i64, LedgerError> {
        i64::from(self.per_hit)
            .checked_mul(symbol.scale())
            .ok_or(LedgerError::Overflow("hit unit"))
    }

    /// Cumulative wager cap in smallest units of `symbol`.
    pub fn quota_cap(&self, symbol: &Symbol) -> Result<i64, LedgerError> {
        self.hit_unit(symbol)?
            .checked_mul(i64::from(self.max_hit))
            .ok_or(LedgerError::Overflow("quota cap"))
    }

    /// Secondary units issued for `deposit` primary units.
    pub fn exchange(&self, deposit: i64) -> Result<i64, LedgerError> {
        deposit
            .checked_mul(i64::from(self.exchange_rate))
            .ok_or(LedgerError::Overflow("exchange conversion"))
    }

    /// Splits a refunded `gross` into `(net, fee)` primary units:
    /// `gross * (100 - deduction) / 100000` and `gross * deduction / 100000`.
    /// Both round toward zero, so `net + fee` may be one unit short.
    pub fn refund_split(&self, gross: i64) -> Result<(i64, i64), LedgerError> {
        let deduction = i64::from(self.deduction);
        let net = gross
            .checked_mul(REFUND_PERCENT_BASE - deduction)
            .ok_or(LedgerError::Overflow("refund net"))?
            / REFUND_DIVISOR;
        let fee = gross
            .checked_mul(deduction)
            .ok_or(LedgerError::Overflow("refund fee"))?
            / REFUND_DIVISOR;
        Ok((net, fee))
    }
}

fn parse_segment<T: std::str::FromStr>(
    name: &'static str,
    segment: &str,
) -> Result<T, LedgerError> {
    segment
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidParameter {
            name,
            segment: segment.to_string(),
        })
}
