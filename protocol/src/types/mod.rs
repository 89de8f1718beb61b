//! Core value types shared by the contract and its host.
//!
//! Three of them: an account name, a currency symbol, and a
//! fixed-point asset. Everything that moves through the ledger is built
//! from them.

pub mod asset;
pub mod name;

pub use asset::{Asset, AssetError, Symbol, SymbolCode, MAX_AMOUNT};
pub use name::AccountName;
