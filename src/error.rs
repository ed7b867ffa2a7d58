use thiserror::Error;

/// Failures reported by a ledger backend.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("account {0} not found")]
    NotFound(String),

    #[error("ledger unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("transaction rejected with status {status}: {result_codes}")]
    Rejected { status: u16, result_codes: String },

    #[error("unexpected ledger response: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum MintError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("failed to parse {role} seed: {reason}")]
    InvalidSeed { role: &'static str, reason: String },

    #[error("invalid account address {address:?}")]
    InvalidAddress { address: String },

    #[error("invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: &'static str },

    #[error("unsupported asset {code:?}: {reason}")]
    UnsupportedAsset { code: String, reason: &'static str },

    #[error("failed to encode transaction: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    #[error("failed to {action}: {source}")]
    Ledger {
        action: &'static str,
        #[source]
        source: LedgerError,
    },
}

impl MintError {
    pub(crate) fn ledger(action: &'static str) -> impl FnOnce(LedgerError) -> Self {
        move |source| MintError::Ledger { action, source }
    }
}
