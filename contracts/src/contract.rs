//! # Lot Contract
//!
//! [`LotContract`] owns the ledger state and is the single entry point the
//! host calls. Every action runs inside an [`ActionContext`]:
//!
//! 1. Runtime parameters are derived from the current config rows.
//! 2. The state is cloned into the context; all mutations go to the clone.
//! 3. Notifications and outcome events are buffered in the context.
//! 4. On success the clone replaces the live state and the buffered
//!    notifications are delivered. On failure everything is dropped.
//!
//! Dependent calls (the exchange issuance, the forwarding transfer of an
//! issue, the refund legs) are plain method calls on the same context, so
//! they commit or roll back together with the action that made them. They
//! run under a delegated [`Authority`]: only the delegating account's
//! authority is held, whatever the host's signers are.

use chrono::{DateTime, Utc};
use lot_protocol::config::{ConfigError, MAX_MEMO_LENGTH, PARAMS_CONFIG_TYPE};
use lot_protocol::types::{AccountName, Asset, SymbolCode};
use lot_protocol::{ContractConfig, Host};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::action::{Action, ActionReceipt};
use crate::config_registry::{ConfigEntry, ConfigRow};
use crate::error::LedgerError;
use crate::metrics::LedgerMetrics;
use crate::params::RuntimeParams;
use crate::quota::{HitRecord, QuotaPartition};
use crate::refund::RefundRecord;
use crate::state::LedgerState;
use crate::supply::CurrencyStats;

// ---------------------------------------------------------------------------
// Execution context
// ---------------------------------------------------------------------------

/// Whose authority the code currently runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authority {
    /// The signatures the host attached to the action.
    Host,
    /// A dependent call made on behalf of this account.
    Delegated(AccountName),
}

/// Outcomes worth counting once the action commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LedgerEvent {
    WagerAccepted(QuotaPartition),
    RefundExecuted,
    ExchangeIssued(i64),
}

/// Scratch space for one action.
pub struct ActionContext<'a, H: Host> {
    pub(crate) state: LedgerState,
    pub(crate) config: &'a ContractConfig,
    pub(crate) params: RuntimeParams,
    host: &'a H,
    authority: Authority,
    notices: Vec<AccountName>,
    events: Vec<LedgerEvent>,
}

impl<'a, H: Host> ActionContext<'a, H> {
    fn new(
        state: LedgerState,
        config: &'a ContractConfig,
        host: &'a H,
        params: RuntimeParams,
    ) -> Self {
        Self {
            state,
            config,
            params,
            host,
            authority: Authority::Host,
            notices: Vec::new(),
            events: Vec::new(),
        }
    }

    fn finish(self) -> (LedgerState, Vec<AccountName>, Vec<LedgerEvent>) {
        (self.state, self.notices, self.events)
    }

    /// The authority in effect.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Fails with [`LedgerError::Unauthorized`] unless `account`'s authority
    /// is held.
    pub fn require_auth(&self, account: &AccountName) -> Result<(), LedgerError> {
        let held = match &self.authority {
            Authority::Host => self.host.has_auth(account),
            Authority::Delegated(delegate) => delegate == account,
        };
        if held {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(account.clone()))
        }
    }

    /// Runs `f` with `account`'s delegated authority, then restores the
    /// previous authority whatever `f` returned.
    pub fn with_authority<T>(
        &mut self,
        account: &AccountName,
        f: impl FnOnce(&mut Self) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let previous = std::mem::replace(&mut self.authority, Authority::Delegated(account.clone()));
        let result = f(self);
        self.authority = previous;
        result
    }

    /// Fails with [`LedgerError::AccountNotFound`] for unknown accounts.
    pub fn require_account(&self, account: &AccountName) -> Result<(), LedgerError> {
        if self.host.is_account(account) {
            Ok(())
        } else {
            Err(LedgerError::AccountNotFound(account.clone()))
        }
    }

    /// Host time.
    pub fn now(&self) -> DateTime<Utc> {
        self.host.now()
    }

    /// Buffers a notification for delivery on commit. Each account is
    /// notified at most once per action.
    pub fn notify(&mut self, account: &AccountName) {
        if !self.notices.contains(account) {
            self.notices.push(account.clone());
        }
    }

    pub(crate) fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    // ---- Actions ----

    fn execute(&mut self, action: Action) -> Result<(), LedgerError> {
        match action {
            Action::Create {
                issuer,
                maximum_supply,
            } => self.create(issuer, maximum_supply),
            Action::Issue { to, quantity, memo } => self.issue(&to, &quantity, &memo),
            Action::Transfer {
                from,
                to,
                quantity,
                memo,
            } => self.transfer(&from, &to, &quantity, &memo),
            Action::Refund {
                from,
                to,
                quantity,
                typ,
                period,
                memo,
            } => self.refund(&from, &to, &quantity, &typ, &period, &memo),
            Action::Init(entry) => self.init(entry),
        }
    }

    /// Registers a currency. Needs the contract account's authority.
    pub fn create(&mut self, issuer: AccountName, maximum_supply: Asset) -> Result<(), LedgerError> {
        self.require_auth(&self.config.contract)?;
        let stats = self.state.supply.create(issuer, maximum_supply)?;
        debug!(
            symbol = %stats.symbol(),
            max_supply = %stats.max_supply,
            issuer = %stats.issuer,
            "currency created"
        );
        Ok(())
    }

    /// Mints `quantity` to the issuer and, if `to` is someone else,
    /// forwards it with the issuer's authority through [`transfer`](Self::transfer).
    pub fn issue(&mut self, to: &AccountName, quantity: &Asset, memo: &str) -> Result<(), LedgerError> {
        if !quantity.symbol.is_valid() {
            return Err(LedgerError::InvalidSymbol(quantity.symbol.to_string()));
        }
        check_memo(memo)?;

        let issuer = self.state.supply.require(&quantity.symbol.code)?.issuer.clone();
        self.require_auth(&issuer)?;
        check_quantity(quantity)?;

        let stats = self.state.supply.record_issue(quantity)?;
        debug!(
            quantity = %quantity,
            supply = %stats.supply,
            "issued"
        );
        self.state.balances.credit(&issuer, quantity)?;

        if to != &issuer {
            self.with_authority(&issuer, |ctx| ctx.transfer(&issuer, to, quantity, memo))?;
        }
        Ok(())
    }

    /// Top-level transfer. A primary-currency move is settled first (it
    /// stands in for that currency's own ledger) and then shown to the
    /// router as an incoming notification; every other currency is
    /// handled by the router alone.
    pub fn transfer(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        if quantity.symbol == self.config.primary_symbol {
            self.sub_transfer(from, to, quantity, memo)?;
        }
        let route = self.route_transfer(from, to, quantity, memo)?;
        debug!(%from, %to, %quantity, ?route, "transfer routed");
        Ok(())
    }

    /// Upserts a config row. Needs the treasury's authority. A parameter
    /// row is parsed before it is stored so a bad memo cannot block every
    /// later action.
    pub fn init(&mut self, entry: ConfigEntry) -> Result<(), LedgerError> {
        self.require_auth(&self.config.treasury)?;
        if entry.typ == PARAMS_CONFIG_TYPE {
            RuntimeParams::parse(&entry.memo)?;
        }
        let outcome = self.state.configs.upsert(entry);
        debug!(?outcome, "config row written");
        Ok(())
    }

    /// Balance-level transfer with the standard checks. Both parties are
    /// notified.
    pub fn sub_transfer(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        self.require_auth(from)?;
        self.require_account(to)?;
        let registered = self.state.supply.require(&quantity.symbol.code)?.symbol().clone();

        self.notify(from);
        self.notify(to);

        check_quantity(quantity)?;
        if quantity.symbol != registered {
            return Err(LedgerError::InvalidSymbol(format!(
                "symbol precision mismatch: registered {registered}, got {}",
                quantity.symbol
            )));
        }
        check_memo(memo)?;

        self.state.balances.debit(from, quantity)?;
        self.state.balances.credit(to, quantity)?;
        debug!(%from, %to, %quantity, "balances moved");
        Ok(())
    }
}

fn check_memo(memo: &str) -> Result<(), LedgerError> {
    if memo.len() > MAX_MEMO_LENGTH {
        return Err(LedgerError::MemoTooLong(memo.len()));
    }
    Ok(())
}

fn check_quantity(quantity: &Asset) -> Result<(), LedgerError> {
    if !quantity.is_valid() {
        return Err(LedgerError::InvalidAmount(format!("invalid quantity {quantity}")));
    }
    if quantity.amount <= 0 {
        return Err(LedgerError::InvalidAmount(
            "must transfer positive quantity".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// The ledger contract bound to a host.
#[derive(Debug)]
pub struct LotContract<H: Host> {
    config: ContractConfig,
    host: H,
    state: LedgerState,
    metrics: Option<LedgerMetrics>,
}

impl<H: Host> LotContract<H> {
    /// A contract with empty state.
    pub fn new(config: ContractConfig, host: H) -> Result<Self, ConfigError> {
        Self::from_state(config, host, LedgerState::new())
    }

    /// A contract resuming from a persisted state.
    pub fn from_state(
        config: ContractConfig,
        host: H,
        state: LedgerState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            host,
            state,
            metrics: None,
        })
    }

    /// Attaches metrics that are updated after each action.
    pub fn with_metrics(mut self, metrics: LedgerMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Executes one action atomically.
    ///
    /// # Errors
    ///
    /// Any [`LedgerError`]. The state is unchanged and no notification is
    /// delivered when an error is returned.
    pub fn dispatch(&mut self, action: Action) -> Result<ActionReceipt, LedgerError> {
        let name = action.name();
        let result = RuntimeParams::from_registry(&self.state.configs).and_then(|params| {
            let mut ctx = ActionContext::new(self.state.clone(), &self.config, &self.host, params);
            ctx.execute(action)?;
            Ok(ctx.finish())
        });

        match result {
            Ok((state, notices, events)) => {
                self.state = state;
                for account in &notices {
                    self.host.notify(account);
                }
                if let Some(metrics) = &self.metrics {
                    metrics.record_committed(name);
                    for event in &events {
                        match event {
                            LedgerEvent::WagerAccepted(partition) => metrics.record_wager(*partition),
                            LedgerEvent::RefundExecuted => metrics.record_refund(),
                            LedgerEvent::ExchangeIssued(units) => metrics.record_exchange(*units),
                        }
                    }
                }

                let receipt = ActionReceipt {
                    id: Uuid::new_v4(),
                    action: name.to_string(),
                    executed_at: self.host.now(),
                    notified: notices,
                };
                info!(action = name, receipt = %receipt.id, "action committed");
                Ok(receipt)
            }
            Err(e) => {
                warn!(action = name, code = e.code(), error = %e, "action rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.record_rejected(e.code());
                }
                Err(e)
            }
        }
    }

    // ---- Convenience wrappers ----

    /// Dispatches [`Action::Create`].
    pub fn create(
        &mut self,
        issuer: impl Into<AccountName>,
        maximum_supply: Asset,
    ) -> Result<ActionReceipt, LedgerError> {
        self.dispatch(Action::Create {
            issuer: issuer.into(),
            maximum_supply,
        })
    }

    /// Dispatches [`Action::Issue`].
    pub fn issue(
        &mut self,
        to: impl Into<AccountName>,
        quantity: Asset,
        memo: impl Into<String>,
    ) -> Result<ActionReceipt, LedgerError> {
        self.dispatch(Action::Issue {
            to: to.into(),
            quantity,
            memo: memo.into(),
        })
    }

    /// Dispatches [`Action::Transfer`].
    pub fn transfer(
        &mut self,
        from: impl Into<AccountName>,
        to: impl Into<AccountName>,
        quantity: Asset,
        memo: impl Into<String>,
    ) -> Result<ActionReceipt, LedgerError> {
        self.dispatch(Action::Transfer {
            from: from.into(),
            to: to.into(),
            quantity,
            memo: memo.into(),
        })
    }

    /// Dispatches [`Action::Refund`].
    pub fn refund(
        &mut self,
        from: impl Into<AccountName>,
        to: impl Into<AccountName>,
        quantity: Asset,
        typ: impl Into<String>,
        period: impl Into<String>,
        memo: impl Into<String>,
    ) -> Result<ActionReceipt, LedgerError> {
        self.dispatch(Action::Refund {
            from: from.into(),
            to: to.into(),
            quantity,
            typ: typ.into(),
            period: period.into(),
            memo: memo.into(),
        })
    }

    /// Dispatches [`Action::Init`].
    pub fn init(&mut self, entry: ConfigEntry) -> Result<ActionReceipt, LedgerError> {
        self.dispatch(Action::Init(entry))
    }

    // ---- Queries ----

    /// Balance of `owner` in smallest units of `code`.
    pub fn balance_of(&self, owner: &AccountName, code: &SymbolCode) -> i64 {
        self.state.balances.balance_of(owner, code)
    }

    /// The balance row, if any.
    pub fn balance(&self, owner: &AccountName, code: &SymbolCode) -> Option<&Asset> {
        self.state.balances.get(owner, code)
    }

    /// Supply information for a currency.
    pub fn currency(&self, code: &SymbolCode) -> Option<&CurrencyStats> {
        self.state.supply.get(code)
    }

    /// Config row for `(typ, period)`.
    pub fn config_row(&self, typ: &str, period: &str) -> Option<&ConfigRow> {
        self.state.configs.find(typ, period)
    }

    /// Parameters the next action will run with.
    pub fn runtime_params(&self) -> Result<RuntimeParams, LedgerError> {
        RuntimeParams::from_registry(&self.state.configs)
    }

    /// Total `participant` has wagered on `(typ, period)` with the treasury.
    pub fn quota_usage(
        &self,
        participant: &AccountName,
        typ: &str,
        period: &str,
    ) -> Result<i64, LedgerError> {
        self.state
            .quotas
            .usage(&self.config.treasury, participant, typ, period)
    }

    /// Wager records held by the treasury in one partition.
    pub fn hit_records(&self, partition: QuotaPartition) -> &[HitRecord] {
        self.state.quotas.records(&self.config.treasury, partition)
    }

    /// Refund records written by the treasury.
    pub fn refund_records(&self) -> &[RefundRecord] {
        self.state.refunds.records(&self.config.treasury)
    }

    /// The live state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Consumes the contract, returning its state for persistence.
    pub fn into_state(self) -> LedgerState {
        self.state
    }

    /// Deployment configuration.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for signing and clock control between actions.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
