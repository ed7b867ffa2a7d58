//! In-memory ledger for tests and dry runs.
//!
//! Applies the effects of the four operations this tool submits, enforces
//! `sequence + 1` on every submission, and records each lookup and
//! submission so callers can assert on ordering and counts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Account, Balance, LedgerClient, SubmitResponse};
use crate::amount::{format_amount, STROOPS_PER_UNIT};
use crate::asset::Asset;
use crate::error::LedgerError;
use crate::transaction::{Operation, SignedTransaction};

const DEFAULT_NATIVE_BALANCE: i64 = 10_000 * STROOPS_PER_UNIT;

#[derive(Debug, Clone, Default)]
struct MockAccount {
    sequence: i64,
    native: i64,
    lines: Vec<(Asset, i64)>,
    locked: bool,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, MockAccount>,
    lookups: Vec<String>,
    submissions: Vec<SignedTransaction>,
    failing_operation: Option<&'static str>,
}

#[derive(Default)]
pub struct MockLedger {
    state: Mutex<State>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account with a native balance.
    #[must_use]
    pub fn with_account(self, address: impl Into<String>, sequence: i64) -> Self {
        self.state().accounts.insert(
            address.into(),
            MockAccount {
                sequence,
                native: DEFAULT_NATIVE_BALANCE,
                ..MockAccount::default()
            },
        );
        self
    }

    /// Reject every submission whose operation has this name
    /// (see [`Operation::name`]).
    #[must_use]
    pub fn failing_operation(self, name: &'static str) -> Self {
        self.state().failing_operation = Some(name);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.state().lookups.len()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.state().lookups.clone()
    }

    pub fn submission_count(&self) -> usize {
        self.state().submissions.len()
    }

    pub fn submissions(&self) -> Vec<SignedTransaction> {
        self.state().submissions.clone()
    }

    /// Names of submitted operations, in submission order.
    pub fn submitted_operations(&self) -> Vec<&'static str> {
        self.state()
            .submissions
            .iter()
            .map(|tx| tx.operation.name())
            .collect()
    }

    pub fn account(&self, address: &str) -> Option<Account> {
        self.state()
            .accounts
            .get(address)
            .map(|acct| render(address, acct))
    }

    pub fn is_locked(&self, address: &str) -> bool {
        self.state()
            .accounts
            .get(address)
            .is_some_and(|acct| acct.locked)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn render(address: &str, acct: &MockAccount) -> Account {
    let mut balances: Vec<Balance> = acct
        .lines
        .iter()
        .map(|(asset, amount)| Balance {
            asset: Some(asset.clone()),
            amount: format_amount(*amount),
        })
        .collect();
    balances.push(Balance {
        asset: None,
        amount: format_amount(acct.native),
    });

    Account {
        address: address.to_string(),
        sequence: acct.sequence,
        balances,
    }
}

fn rejected(code: &str) -> LedgerError {
    LedgerError::Rejected {
        status: 400,
        result_codes: code.to_string(),
    }
}

impl State {
    fn apply(&mut self, tx: &SignedTransaction) -> Result<(), LedgerError> {
        if self.failing_operation == Some(tx.operation.name()) {
            return Err(rejected("tx_failed [op_injected_failure]"));
        }

        let source = self
            .accounts
            .get(&tx.source)
            .ok_or_else(|| rejected("tx_no_source_account"))?;
        if source.locked {
            return Err(rejected("tx_bad_auth"));
        }
        if tx.sequence != source.sequence + 1 {
            return Err(rejected("tx_bad_seq"));
        }

        match &tx.operation {
            Operation::CreateAccount {
                destination,
                starting_balance,
            } => {
                if self.accounts.contains_key(destination) {
                    return Err(rejected("tx_failed [op_already_exists]"));
                }
                if source.native < *starting_balance {
                    return Err(rejected("tx_failed [op_underfunded]"));
                }
                self.accounts.insert(
                    destination.clone(),
                    MockAccount {
                        native: *starting_balance,
                        ..MockAccount::default()
                    },
                );
                self.source_mut(&tx.source).native -= starting_balance;
            }
            Operation::ChangeTrust { asset, .. } => {
                let acct = self.source_mut(&tx.source);
                if !acct.lines.iter().any(|(a, _)| a == asset) {
                    acct.lines.push((asset.clone(), 0));
                }
            }
            Operation::Payment {
                destination,
                asset,
                amount,
            } => {
                let dest = self
                    .accounts
                    .get_mut(destination)
                    .ok_or_else(|| rejected("tx_failed [op_no_destination]"))?;
                let line = dest
                    .lines
                    .iter_mut()
                    .find(|(a, _)| a == asset)
                    .ok_or_else(|| rejected("tx_failed [op_no_trust]"))?;
                line.1 = line
                    .1
                    .checked_add(*amount)
                    .ok_or_else(|| rejected("tx_failed [op_line_full]"))?;
            }
            Operation::SetOptions(opts) => {
                if opts.master_weight == Some(0) {
                    self.source_mut(&tx.source).locked = true;
                }
            }
        }

        self.source_mut(&tx.source).sequence = tx.sequence;
        Ok(())
    }

    fn source_mut(&mut self, address: &str) -> &mut MockAccount {
        self.accounts.entry(address.to_string()).or_default()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn account_detail(&self, account_id: &str) -> Result<Account, LedgerError> {
        let mut state = self.state();
        state.lookups.push(account_id.to_string());
        state
            .accounts
            .get(account_id)
            .map(|acct| render(account_id, acct))
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))
    }

    async fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitResponse, LedgerError> {
        let mut state = self.state();
        state.submissions.push(tx.clone());
        state.apply(tx)?;
        Ok(SubmitResponse {
            hash: tx.hash_hex(),
            ledger: None,
        })
    }
}
