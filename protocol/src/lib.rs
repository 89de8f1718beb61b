// Copyright (c) 2026 Lot Ledger Developers. MIT License.
// See LICENSE for details.

//! # Lot Protocol — Shared Primitives
//!
//! Everything the contract and its host have to agree on before a single
//! token moves: how accounts are named, how amounts are written, what the
//! host provides, and which accounts and currencies play which role.
//!
//! ## Modules
//!
//! - **types** — `AccountName`, `Symbol`, `Asset`. Fixed-point, no floats.
//! - **host** — The `Host` trait (authority, existence, clock, notify) and
//!   an in-memory implementation.
//! - **config** — Well-known accounts, memo protocol constants, runtime
//!   parameter defaults, and the loadable `ContractConfig`.
//! - **hash** — BLAKE3 helpers for state fingerprints.
//! - **logging** — `tracing` subscriber setup for embedding processes.

pub mod config;
pub mod hash;
pub mod host;
pub mod logging;
pub mod types;

pub use config::ContractConfig;
pub use host::{Host, MemoryHost};
pub use types::{AccountName, Asset, AssetError, Symbol, SymbolCode};
