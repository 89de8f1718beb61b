//! # Host Boundary
//!
//! The ledger runs embedded in a host that owns identities, signatures and
//! the wall clock. [`Host`] is the narrow slice of that environment the
//! contract consumes:
//!
//! - **authority** — did the current action carry this account's signature?
//! - **existence** — is this a registered account?
//! - **time** — the logical timestamp stamped onto records.
//! - **notification** — tell an account it took part in a transfer.
//!
//! [`MemoryHost`] is a self-contained implementation for tests, benches and
//! single-process embedding.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::AccountName;

/// Services the contract needs from its execution environment.
pub trait Host {
    /// Returns `true` if the action being executed is authorized by `account`.
    fn has_auth(&self, account: &AccountName) -> bool;

    /// Returns `true` if `account` exists on the host.
    fn is_account(&self, account: &AccountName) -> bool;

    /// Current logical time.
    fn now(&self) -> DateTime<Utc>;

    /// Delivers a transfer notification to `account`. Only called for
    /// actions that committed.
    fn notify(&mut self, account: &AccountName);
}

/// In-memory host with an explicit account set, an explicit signer set and
/// a manually driven clock.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    accounts: BTreeSet<AccountName>,
    signers: BTreeSet<AccountName>,
    clock: DateTime<Utc>,
    notifications: Vec<AccountName>,
}

impl MemoryHost {
    /// Creates a host with no accounts, no signers, and the clock at the
    /// Unix epoch.
    pub fn new() -> Self {
        Self {
            accounts: BTreeSet::new(),
            signers: BTreeSet::new(),
            clock: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            notifications: Vec::new(),
        }
    }

    /// Creates a host with the given accounts registered.
    pub fn with_accounts<I, A>(accounts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AccountName>,
    {
        let mut host = Self::new();
        for account in accounts {
            host.add_account(account);
        }
        host
    }

    /// Registers an account.
    pub fn add_account(&mut self, account: impl Into<AccountName>) {
        self.accounts.insert(account.into());
    }

    /// Replaces the signer set for the next action.
    pub fn sign_as<I, A>(&mut self, signers: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<AccountName>,
    {
        self.signers = signers.into_iter().map(Into::into).collect();
    }

    /// Clears every signer.
    pub fn clear_signers(&mut self) {
        self.signers.clear();
    }

    /// Sets the clock.
    pub fn set_time(&mut self, at: DateTime<Utc>) {
        self.clock = at;
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.clock += by;
    }

    /// Notifications delivered so far, in order.
    pub fn notifications(&self) -> &[AccountName] {
        &self.notifications
    }

    /// Drains and returns the delivered notifications.
    pub fn take_notifications(&mut self) -> Vec<AccountName> {
        std::mem::take(&mut self.notifications)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    fn has_auth(&self, account: &AccountName) -> bool {
        self.signers.contains(account)
    }

    fn is_account(&self, account: &AccountName) -> bool {
        self.accounts.contains(account)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock
    }

    fn notify(&mut self, account: &AccountName) {
        self.notifications.push(account.clone());
    }
}
