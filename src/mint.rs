//! Mint orchestration.
//!
//! A fixed, linear sequence of steps:
//!
//! ```text
//! ParseIssuer → [CreateDistributor] → [TrustAsset] → LoadIssuer → IssuePayment → [LockIssuer]
//! ```
//!
//! Bracketed steps run only when their flag is set. The first failure stops
//! the run. Nothing already submitted is rolled back; instead the failure
//! carries the log of completed steps so the operator knows where to resume.

use std::fmt;
use thiserror::Error;
use tracing::info;

use crate::account::{self, CreatedAccount};
use crate::amount::parse_amount;
use crate::asset::Asset;
use crate::config::NetworkConfig;
use crate::crypto::{decode_address, Keypair};
use crate::error::MintError;
use crate::ledger::{LedgerClient, SubmitResponse};
use crate::transaction::check_memo;

pub const DEFAULT_STARTING_BALANCE: &str = "100";
pub const DEFAULT_MEMO: &str = "Minting new asset";

#[derive(Clone)]
pub struct MintRequest {
    pub issuer_seed: String,
    pub asset_code: String,
    pub amount: String,
    pub distributor_address: String,
    pub distributor_seed: String,
    pub create_distributor: bool,
    pub trust_asset: bool,
    pub lock_issuer: bool,
    pub starting_balance: String,
    pub memo: Option<String>,
}

impl MintRequest {
    /// A request with the default flags: trust the asset, do not create the
    /// distributor, do not lock the issuer.
    pub fn new(
        issuer_seed: impl Into<String>,
        asset_code: impl Into<String>,
        amount: impl Into<String>,
        distributor_address: impl Into<String>,
        distributor_seed: impl Into<String>,
    ) -> Self {
        Self {
            issuer_seed: issuer_seed.into(),
            asset_code: asset_code.into(),
            amount: amount.into(),
            distributor_address: distributor_address.into(),
            distributor_seed: distributor_seed.into(),
            create_distributor: false,
            trust_asset: true,
            lock_issuer: false,
            starting_balance: DEFAULT_STARTING_BALANCE.to_string(),
            memo: Some(DEFAULT_MEMO.to_string()),
        }
    }

    /// Everything that can be checked without the network.
    fn parse(&self) -> Result<(Keypair, Asset), MintError> {
        let issuer = Keypair::from_seed(&self.issuer_seed, "issuer")?;
        let asset = Asset::new(self.asset_code.trim(), issuer.address());
        asset.validate()?;
        parse_amount(&self.amount)?;
        decode_address(&self.distributor_address)?;
        check_memo(self.memo.as_deref())?;

        if self.create_distributor || self.trust_asset {
            Keypair::from_seed(&self.distributor_seed, "distributor")?;
        }
        if self.create_distributor {
            parse_amount(&self.starting_balance)?;
        }

        Ok((issuer, asset))
    }
}

impl fmt::Debug for MintRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintRequest")
            .field("issuer_seed", &"[REDACTED]")
            .field("asset_code", &self.asset_code)
            .field("amount", &self.amount)
            .field("distributor_address", &self.distributor_address)
            .field("distributor_seed", &"[REDACTED]")
            .field("create_distributor", &self.create_distributor)
            .field("trust_asset", &self.trust_asset)
            .field("lock_issuer", &self.lock_issuer)
            .field("starting_balance", &self.starting_balance)
            .field("memo", &self.memo)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MintStep {
    ParseIssuer,
    CreateDistributor,
    TrustAsset,
    LoadIssuer,
    IssuePayment,
    LockIssuer,
}

impl fmt::Display for MintStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            MintStep::ParseIssuer => "validate mint request",
            MintStep::CreateDistributor => "create distributor account",
            MintStep::TrustAsset => "create trustline",
            MintStep::LoadIssuer => "load issuer account",
            MintStep::IssuePayment => "issue asset",
            MintStep::LockIssuer => "lock issuer account",
        };
        f.write_str(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStep {
    pub step: MintStep,
    /// Set for steps that submitted a transaction.
    pub transaction_hash: Option<String>,
}

#[derive(Debug)]
pub struct MintReport {
    pub issuer: String,
    pub asset: Asset,
    pub payment: SubmitResponse,
    pub created_account: Option<CreatedAccount>,
    pub steps: Vec<CompletedStep>,
}

#[derive(Debug, Error)]
#[error("failed to {step}: {source}")]
pub struct MintFailure {
    pub step: MintStep,
    pub completed: Vec<CompletedStep>,
    #[source]
    pub source: MintError,
}

impl MintFailure {
    /// Steps that changed ledger state before the failure.
    pub fn submitted(&self) -> impl Iterator<Item = &CompletedStep> {
        self.completed
            .iter()
            .filter(|s| s.transaction_hash.is_some())
    }
}

#[derive(Default)]
struct Progress {
    completed: Vec<CompletedStep>,
}

impl Progress {
    fn done(&mut self, step: MintStep, transaction_hash: Option<String>) {
        info!(%step, hash = transaction_hash.as_deref().unwrap_or("-"), "step completed");
        self.completed.push(CompletedStep {
            step,
            transaction_hash,
        });
    }

    fn fail(&self, step: MintStep, source: MintError) -> MintFailure {
        MintFailure {
            step,
            completed: self.completed.clone(),
            source,
        }
    }
}

/// Run the mint sequence once.
pub async fn mint_asset<C>(
    client: &C,
    network: &NetworkConfig,
    request: &MintRequest,
) -> Result<MintReport, MintFailure>
where
    C: LedgerClient + ?Sized,
{
    let mut progress = Progress::default();

    let (issuer, asset) = request
        .parse()
        .map_err(|e| progress.fail(MintStep::ParseIssuer, e))?;
    progress.done(MintStep::ParseIssuer, None);

    info!(
        asset = %asset,
        distributor = %request.distributor_address,
        create_distributor = request.create_distributor,
        trust_asset = request.trust_asset,
        lock_issuer = request.lock_issuer,
        "minting asset"
    );

    let created_account = if request.create_distributor {
        let created = account::create_account(
            client,
            network,
            &request.distributor_seed,
            &request.starting_balance,
        )
        .await
        .map_err(|e| progress.fail(MintStep::CreateDistributor, e))?;
        progress.done(
            MintStep::CreateDistributor,
            Some(created.response.hash.clone()),
        );
        Some(created)
    } else {
        None
    };

    if request.trust_asset {
        let response =
            account::create_trustline(client, network, &request.distributor_seed, &asset)
                .await
                .map_err(|e| progress.fail(MintStep::TrustAsset, e))?;
        progress.done(MintStep::TrustAsset, Some(response.hash));
    }

    let issuer_account = account::load_account(client, &issuer.address())
        .await
        .map_err(|e| progress.fail(MintStep::LoadIssuer, e))?;
    progress.done(MintStep::LoadIssuer, None);

    let payment = account::issue_payment(
        client,
        network,
        &issuer,
        &issuer_account,
        request.distributor_address.trim(),
        &asset,
        &request.amount,
        request.memo.as_deref(),
    )
    .await
    .map_err(|e| progress.fail(MintStep::IssuePayment, e))?;
    progress.done(MintStep::IssuePayment, Some(payment.hash.clone()));

    // Must stay last: the issuer cannot sign anything afterwards.
    if request.lock_issuer {
        let response = account::lock_account(client, network, &issuer)
            .await
            .map_err(|e| progress.fail(MintStep::LockIssuer, e))?;
        progress.done(MintStep::LockIssuer, Some(response.hash));
    }

    Ok(MintReport {
        issuer: issuer.address(),
        asset,
        payment,
        created_account,
        steps: progress.completed,
    })
}
