//! Mint custom assets on a Stellar-compatible ledger.
//!
//! [`mint::mint_asset`] drives the whole flow against any [`ledger::LedgerClient`]:
//! optionally fund a distributor, trust the asset, issue it, and optionally lock
//! the issuer.

pub mod account;
pub mod amount;
pub mod asset;
pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod mint;
pub mod transaction;
