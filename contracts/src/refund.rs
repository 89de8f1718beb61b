//! # Refund Workflow
//!
//! Once the operator stops a `(type, period)`, the treasury can hand a
//! participant's stake back. The gross secondary amount goes to the
//! reserve account; the participant receives the primary-currency value
//! minus the deduction, and the deduction goes to the fee collector:
//!
//! ```text
//! net = gross * (100 - deduction) / 100000
//! fee = gross * deduction / 100000
//! ```
//!
//! The three legs run as ordinary transfers with the treasury's authority
//! and commit together with the refund record, or not at all.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lot_protocol::config::{REFUND_FEE_MEMO, REFUND_NET_MEMO, REFUND_RESERVE_MEMO};
use lot_protocol::types::{AccountName, Asset};
use lot_protocol::Host;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contract::{ActionContext, LedgerEvent};
use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One executed refund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRecord {
    /// Sequential within the refunding account's table.
    pub id: u64,
    /// Who got the net amount.
    pub recipient: AccountName,
    /// Primary currency paid to the recipient.
    pub net: Asset,
    /// Primary currency paid to the fee collector.
    pub fee: Asset,
    /// Secondary currency returned to the reserve.
    pub gross: Asset,
    /// When the refund ran.
    pub timestamp: DateTime<Utc>,
    /// Operator memo.
    pub memo: String,
    /// Wager period.
    pub period: String,
    /// Wager type.
    pub typ: String,
}

/// Refund records keyed by the refunding account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundLedger {
    tables: BTreeMap<AccountName, Vec<RefundRecord>>,
}

impl RefundLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to `scope`'s table, assigning the next id.
    pub fn append(&mut self, scope: &AccountName, mut record: RefundRecord) -> u64 {
        let table = self.tables.entry(scope.clone()).or_default();
        record.id = table.last().map(|r| r.id + 1).unwrap_or(0);
        let id = record.id;
        table.push(record);
        id
    }

    /// Records in `scope`'s table in id order.
    pub fn records(&self, scope: &AccountName) -> &[RefundRecord] {
        self.tables.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Returns `true` if no refund has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

impl<'a, H: Host> ActionContext<'a, H> {
    /// Refunds `quantity` of a stopped `(typ, period)` to `to`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Unauthorized`] without `from`'s authority, or if
    ///   `from` is not the treasury.
    /// - [`LedgerError::SelfTransfer`] if `to` is the treasury.
    /// - [`LedgerError::InvalidSymbol`] unless `quantity` is secondary currency.
    /// - [`LedgerError::AccountNotFound`], [`LedgerError::BadType`],
    ///   [`LedgerError::BadPeriod`], [`LedgerError::BadTypeOrPeriod`],
    ///   [`LedgerError::HitNotStopped`] from the eligibility checks.
    /// - Anything the three transfers can fail with, e.g.
    ///   [`LedgerError::InvalidAmount`] when the net or the fee rounds to zero.
    pub fn refund(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        typ: &str,
        period: &str,
        memo: &str,
    ) -> Result<(), LedgerError> {
        self.require_auth(from)?;
        let treasury = self.config.treasury.clone();
        if from != &treasury {
            return Err(LedgerError::Unauthorized(treasury));
        }
        if to == &treasury {
            return Err(LedgerError::SelfTransfer);
        }
        if quantity.symbol != self.config.secondary_symbol {
            return Err(LedgerError::InvalidSymbol(format!(
                "refunds are paid for {}, got {}",
                self.config.secondary_symbol, quantity.symbol
            )));
        }

        self.require_account(to)?;
        if typ.is_empty() {
            return Err(LedgerError::BadType);
        }
        if period.is_empty() {
            return Err(LedgerError::BadPeriod);
        }

        let row = self.state.configs.find(typ, period).ok_or_else(|| {
            LedgerError::BadTypeOrPeriod {
                typ: typ.to_string(),
                period: period.to_string(),
            }
        })?;
        if !row.entry.stop {
            return Err(LedgerError::HitNotStopped {
                typ: typ.to_string(),
                period: period.to_string(),
            });
        }

        let (net_amount, fee_amount) = self.params.refund_split(quantity.amount)?;
        let primary = self.config.primary_symbol.clone();
        let net = Asset::new(net_amount, primary.clone());
        let fee = Asset::new(fee_amount, primary);
        let reserve = self.config.reserve.clone();
        let fee_collector = self.config.fee_collector.clone();

        self.with_authority(&treasury, |ctx| {
            ctx.transfer(&treasury, &reserve, quantity, REFUND_RESERVE_MEMO)?;
            ctx.transfer(&treasury, to, &net, REFUND_NET_MEMO)?;
            ctx.transfer(&treasury, &fee_collector, &fee, REFUND_FEE_MEMO)
        })?;

        let record = RefundRecord {
            id: 0,
            recipient: to.clone(),
            net,
            fee,
            gross: quantity.clone(),
            timestamp: self.now(),
            memo: memo.to_string(),
            period: period.to_string(),
            typ: typ.to_string(),
        };
        let id = self.state.refunds.append(from, record);
        debug!(%to, gross = %quantity, net_amount, fee_amount, id, "refund executed");
        self.record(LedgerEvent::RefundExecuted);
        Ok(())
    }
}
