//! # Transfer Router
//!
//! Every value movement that reaches the contract is classified into one
//! of five routes. The checks run in a fixed order and the first match
//! wins:
//!
//! | # | Route       | Currency  | Parties                                           |
//! |---|-------------|-----------|---------------------------------------------------|
//! | 1 | Bypass      | primary   | fee collector -> treasury                         |
//! | 2 | Direct      | secondary | to != treasury, or reserve -> treasury            |
//! | 3 | Exchange    | primary   | anyone but the treasury -> treasury               |
//! | 4 | Wager       | secondary | anyone but the treasury -> treasury               |
//! | 5 | PassThrough | any       | everything else; accepted with no effect          |
//!
//! Rows 1 and 2 must stay ahead of 3 and 4: fee sweeps would otherwise be
//! converted, and reserve top-ups would be read as wagers.

use lot_protocol::config::EXCHANGE_ISSUE_MEMO;
use lot_protocol::types::{AccountName, Asset, Symbol};
use lot_protocol::{ContractConfig, Host};
use tracing::debug;

use crate::contract::{ActionContext, LedgerEvent};
use crate::error::LedgerError;
use crate::memo::WagerMemo;
use crate::quota::{NewHit, QuotaPartition};

/// How a value movement is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Fee sweep into the treasury. Nothing to do.
    Bypass,
    /// Plain secondary-currency transfer.
    Direct,
    /// Primary deposit converted to secondary at the exchange rate.
    Exchange,
    /// Secondary deposit recorded against a wager quota.
    Wager,
    /// No rule applies.
    PassThrough,
}

/// Picks the route for a movement of `symbol` from `from` to `to`.
///
/// Currencies are matched on the full symbol, precision included.
pub fn classify(config: &ContractConfig, from: &AccountName, to: &AccountName, symbol: &Symbol) -> Route {
    let primary = symbol == &config.primary_symbol;
    let secondary = symbol == &config.secondary_symbol;
    let into_treasury = to == &config.treasury;
    let from_treasury = from == &config.treasury;

    if primary && from == &config.fee_collector && into_treasury {
        Route::Bypass
    } else if secondary && (!into_treasury || from == &config.reserve) {
        Route::Direct
    } else if primary && !from_treasury && into_treasury {
        Route::Exchange
    } else if secondary && !from_treasury && into_treasury {
        Route::Wager
    } else {
        Route::PassThrough
    }
}

impl<'a, H: Host> ActionContext<'a, H> {
    /// Classifies and executes one movement. Returns the route taken.
    pub fn route_transfer(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<Route, LedgerError> {
        let route = classify(self.config, from, to, &quantity.symbol);
        match route {
            Route::Bypass | Route::PassThrough => {}
            Route::Direct => self.sub_transfer(from, to, quantity, memo)?,
            Route::Exchange => self.exchange(from, quantity)?,
            Route::Wager => self.wager(from, to, quantity, memo)?,
        }
        Ok(route)
    }

    /// Issues `deposit * exchange_rate` secondary units to `from`, with the
    /// treasury's authority.
    fn exchange(&mut self, from: &AccountName, deposit: &Asset) -> Result<(), LedgerError> {
        let converted = Asset::new(
            self.params.exchange(deposit.amount)?,
            self.config.secondary_symbol.clone(),
        );
        let treasury = self.config.treasury.clone();
        self.with_authority(&treasury, |ctx| ctx.issue(from, &converted, EXCHANGE_ISSUE_MEMO))?;

        debug!(%from, %deposit, issued = %converted, "deposit exchanged");
        self.record(LedgerEvent::ExchangeIssued(converted.amount));
        Ok(())
    }

    /// Validates a wager against its memo, config row and quota, moves the
    /// stake to `to`, and appends the record.
    fn wager(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.require_account(from)?;
        let wager = WagerMemo::parse(memo)?;

        let row = self
            .state
            .configs
            .find(wager.typ, wager.period)
            .ok_or_else(|| LedgerError::BadTypeOrPeriod {
                typ: wager.typ.to_string(),
                period: wager.period.to_string(),
            })?;
        if row.entry.stop {
            return Err(LedgerError::HitStopped {
                typ: wager.typ.to_string(),
                period: wager.period.to_string(),
            });
        }

        wager.check_hit_number()?;

        let unit = self.params.hit_unit(&quantity.symbol)?;
        if quantity.amount.checked_rem(unit) != Some(0) {
            return Err(LedgerError::BadAmount {
                amount: quantity.amount,
                unit,
            });
        }

        let used = self.state.quotas.usage(to, from, wager.typ, wager.period)?;
        let cap = self.params.quota_cap(&quantity.symbol)?;
        let total = used
            .checked_add(quantity.amount)
            .ok_or(LedgerError::Overflow("quota usage"))?;
        if total > cap {
            return Err(LedgerError::QuotaExceeded {
                used,
                requested: quantity.amount,
                cap,
            });
        }

        self.sub_transfer(from, to, quantity, memo)?;

        let timestamp = self.now();
        let id = self.state.quotas.append(
            to,
            NewHit {
                participant: from.clone(),
                quantity: quantity.clone(),
                timestamp,
                memo: wager.detail.to_string(),
                period: wager.period.to_string(),
                typ: wager.typ.to_string(),
            },
        );
        let partition = QuotaPartition::for_type(wager.typ);
        debug!(
            %from,
            typ = wager.typ,
            period = wager.period,
            table = partition.as_str(),
            id,
            used = total,
            cap,
            "wager accepted"
        );
        self.record(LedgerEvent::WagerAccepted(partition));
        Ok(())
    }
}
