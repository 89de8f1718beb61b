//! Account names.
//!
//! Accounts are identified by short base-32 names (`a-z`, `1-5`, `.`), at
//! most twelve characters long. The ledger never interprets a name beyond
//! equality; existence and authority are the host's business.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of an account name in characters.
pub const MAX_NAME_LENGTH: usize = 12;

/// Identifier of a ledger account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    /// Wraps a name without validating it.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name uses only the account alphabet, is
    /// non-empty, at most twelve characters, and does not end with a dot.
    pub fn is_valid(&self) -> bool {
        let s = self.0.as_str();
        !s.is_empty()
            && s.len() <= MAX_NAME_LENGTH
            && !s.ends_with('.')
            && s
                .chars()
                .all(|c| c == '.' || ('a'..='z').contains(&c) || ('1'..='5').contains(&c))
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
