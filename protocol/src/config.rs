//! # Contract Configuration & Constants
//!
//! Every fixed value the ledger relies on lives here: the well-known
//! accounts, the two currencies, memo limits, the wager rule table, and the
//! fallback runtime parameters used when no `init` row overrides them.
//!
//! [`ContractConfig`] bundles the deployment-specific parts (which account
//! is the treasury, which symbols are in play) so a host can load them from
//! JSON instead of recompiling.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::asset::{Symbol, SymbolCode};
use crate::types::AccountName;

// ---------------------------------------------------------------------------
// Well-known Accounts
// ---------------------------------------------------------------------------

/// The account the contract is deployed to. Creating currencies requires
/// its authority.
pub const CONTRACT_ACCOUNT: &str = "lotttttttttt";

/// The treasury: destination of exchange deposits and wagers, source of
/// refunds, and the only account allowed to edit the config registry.
pub const TREASURY_ACCOUNT: &str = "lotttttttttt";

/// Receives the fee share of every refund. Its primary-currency transfers
/// back into the treasury are swallowed by the router.
pub const FEE_COLLECTOR_ACCOUNT: &str = "lottttttteos";

/// Holds wagered units returned by a refund. Its secondary-currency
/// transfers into the treasury are plain transfers, not wagers.
pub const RESERVE_ACCOUNT: &str = "lotttttttlot";

// ---------------------------------------------------------------------------
// Currencies
// ---------------------------------------------------------------------------

/// Ticker of the primary (exchange) currency.
pub const PRIMARY_SYMBOL_CODE: &str = "EOS";

/// Ticker of the secondary (quota) currency.
pub const SECONDARY_SYMBOL_CODE: &str = "LOT";

/// Both currencies use four decimal places.
pub const DEFAULT_PRECISION: u8 = 4;

// ---------------------------------------------------------------------------
// Memo Protocol
// ---------------------------------------------------------------------------

/// Memos longer than this many bytes are rejected by transfers and issues.
pub const MAX_MEMO_LENGTH: usize = 256;

/// Separates `<type>-<period>-<hit-detail>` in a wager memo, and the four
/// integers in the `init` parameter memo.
pub const MEMO_FIELD_DELIMITER: char = '-';

/// Separates the picks inside the hit-detail segment.
pub const HIT_TOKEN_DELIMITER: char = ' ';

/// Config rows with this type carry the runtime parameter memo.
pub const PARAMS_CONFIG_TYPE: &str = "init";

/// Wager type that expects seven picks.
pub const WAGER_TYPE_DB: &str = "db";

/// Pick count required for [`WAGER_TYPE_DB`].
pub const DB_HIT_COUNT: usize = 7;

/// Wager type that expects three picks and keeps its own record partition.
pub const WAGER_TYPE_3D: &str = "3d";

/// Pick count required for [`WAGER_TYPE_3D`].
pub const THREE_D_HIT_COUNT: usize = 3;

/// Memo attached to the issuance that pays out an exchange deposit.
pub const EXCHANGE_ISSUE_MEMO: &str = "thanks";

/// Memo on the refund leg that parks the wagered units in the reserve.
pub const REFUND_RESERVE_MEMO: &str = "transfer LOT";

/// Memo on the refund leg that pays the recipient.
pub const REFUND_NET_MEMO: &str = "refund EOS";

/// Memo on the refund leg that pays the fee collector.
pub const REFUND_FEE_MEMO: &str = "transfer eos";

// ---------------------------------------------------------------------------
// Runtime Parameter Defaults
// ---------------------------------------------------------------------------

/// Secondary units issued per primary unit deposited.
pub const DEFAULT_EXCHANGE_RATE: u16 = 1000;

/// Whole secondary tokens per hit; wagers must be multiples of this.
pub const DEFAULT_PER_HIT: u16 = 100;

/// Hits one participant may place per (type, period).
pub const DEFAULT_MAX_HIT: u8 = 50;

/// Percentage of a refund kept as fee.
pub const DEFAULT_DEDUCTION: u8 = 10;

/// Percent base of the refund split.
pub const REFUND_PERCENT_BASE: i64 = 100;

/// Divisor of the refund split. Folds the percent base together with the
/// default exchange rate, so a refund of wagered units pays out primary
/// units at `1/1000` of their count.
pub const REFUND_DIVISOR: i64 = 100_000;

// ---------------------------------------------------------------------------
// ContractConfig
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a [`ContractConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured account name is malformed.
    #[error("invalid account name for {role}: {name:?}")]
    InvalidAccount {
        /// Which role the name was configured for.
        role: &'static str,
        /// The offending name.
        name: String,
    },

    /// A configured symbol is malformed.
    #[error("invalid symbol for {role}: {symbol}")]
    InvalidSymbol {
        /// Which currency the symbol was configured for.
        role: &'static str,
        /// The offending symbol.
        symbol: String,
    },

    /// Two roles that must be held by different accounts share one.
    #[error("{first} and {second} must be different accounts (both {name})")]
    RoleCollision {
        /// First role.
        first: &'static str,
        /// Second role.
        second: &'static str,
        /// The shared account.
        name: String,
    },

    /// Both currencies use the same ticker.
    #[error("primary and secondary currencies share the ticker {0}")]
    SymbolCollision(String),
}

/// Deployment settings for one contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Account the contract runs as.
    pub contract: AccountName,
    /// Treasury operator account.
    pub treasury: AccountName,
    /// Refund fee recipient.
    pub fee_collector: AccountName,
    /// Refund reserve account.
    pub reserve: AccountName,
    /// Exchange currency.
    pub primary_symbol: Symbol,
    /// Quota currency.
    pub secondary_symbol: Symbol,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            contract: AccountName::from(CONTRACT_ACCOUNT),
            treasury: AccountName::from(TREASURY_ACCOUNT),
            fee_collector: AccountName::from(FEE_COLLECTOR_ACCOUNT),
            reserve: AccountName::from(RESERVE_ACCOUNT),
            primary_symbol: Symbol {
                precision: DEFAULT_PRECISION,
                code: SymbolCode::from_static(PRIMARY_SYMBOL_CODE),
            },
            secondary_symbol: Symbol {
                precision: DEFAULT_PRECISION,
                code: SymbolCode::from_static(SECONDARY_SYMBOL_CODE),
            },
        }
    }
}

impl ContractConfig {
    /// Parses and validates a JSON document. Missing fields fall back to
    /// the defaults above.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), treasury = %config.treasury, "contract config loaded");
        Ok(config)
    }

    /// Checks account names, symbols, and that the treasury, fee collector
    /// and reserve are three distinct accounts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let accounts = [
            ("contract", &self.contract),
            ("treasury", &self.treasury),
            ("fee_collector", &self.fee_collector),
            ("reserve", &self.reserve),
        ];
        for (role, name) in accounts {
            if !name.is_valid() {
                return Err(ConfigError::InvalidAccount {
                    role,
                    name: name.to_string(),
                });
            }
        }

        let distinct = [
            ("treasury", &self.treasury),
            ("fee_collector", &self.fee_collector),
            ("reserve", &self.reserve),
        ];
        for (i, &(first, a)) in distinct.iter().enumerate() {
            for &(second, b) in distinct.iter().skip(i + 1) {
                if a == b {
                    return Err(ConfigError::RoleCollision {
                        first,
                        second,
                        name: a.to_string(),
                    });
                }
            }
        }

        for (role, symbol) in [
            ("primary", &self.primary_symbol),
            ("secondary", &self.secondary_symbol),
        ] {
            if !symbol.is_valid() {
                return Err(ConfigError::InvalidSymbol {
                    role,
                    symbol: symbol.to_string(),
                });
            }
        }
        if self.primary_symbol.code == self.secondary_symbol.code {
            return Err(ConfigError::SymbolCollision(
                self.primary_symbol.code.to_string(),
            ));
        }

        Ok(())
    }
}
