//! Ledger boundary.
//!
//! Account operations only ever talk to the network through [`LedgerClient`].
//! [`HorizonClient`] is the production implementation. [`MockLedger`] keeps
//! accounts in memory and counts every call, so the mint flow can be
//! exercised without a live network.

use async_trait::async_trait;

use crate::asset::Asset;
use crate::error::LedgerError;
use crate::transaction::SignedTransaction;

pub mod horizon;
pub mod mock;

pub use horizon::HorizonClient;
pub use mock::MockLedger;

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the current snapshot of an account.
    async fn account_detail(&self, account_id: &str) -> Result<Account, LedgerError>;

    /// Submit a signed transaction and wait for the ledger's verdict.
    async fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitResponse, LedgerError>;
}

/// Read-only account snapshot. Never cached between operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: String,
    pub sequence: i64,
    pub balances: Vec<Balance>,
}

impl Account {
    pub fn new(address: impl Into<String>, sequence: i64) -> Self {
        Self {
            address: address.into(),
            sequence,
            balances: Vec::new(),
        }
    }

    /// Whether this account holds a trustline (balance line) for `asset`.
    pub fn trusts(&self, asset: &Asset) -> bool {
        self.balances
            .iter()
            .any(|balance| balance.asset.as_ref() == Some(asset))
    }
}

/// One balance line. `asset` is `None` for the native asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub asset: Option<Asset>,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub hash: String,
    pub ledger: Option<u32>,
}
