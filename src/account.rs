//! Account operations. Each one fetches a fresh snapshot, builds a single
//! operation transaction, signs it, and submits it.

use tracing::info;

use crate::amount::parse_amount;
use crate::asset::Asset;
use crate::config::NetworkConfig;
use crate::crypto::{decode_address, Keypair};
use crate::error::MintError;
use crate::ledger::{Account, LedgerClient, SubmitResponse};
use crate::transaction::{Operation, SetOptions, TransactionBuilder};

/// A newly funded account together with the keys that control it.
#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub account: Account,
    pub keypair: Keypair,
    pub response: SubmitResponse,
}

pub async fn load_account<C>(client: &C, account_id: &str) -> Result<Account, MintError>
where
    C: LedgerClient + ?Sized,
{
    let account_id = account_id.trim();
    if account_id.is_empty() {
        return Err(MintError::InvalidInput("account ID is required"));
    }
    decode_address(account_id)?;

    client
        .account_detail(account_id)
        .await
        .map_err(MintError::ledger("fetch account details"))
}

/// Whether `account_id` already holds a trustline for `asset`.
pub async fn account_trusts_asset<C>(
    client: &C,
    account_id: &str,
    asset: &Asset,
) -> Result<bool, MintError>
where
    C: LedgerClient + ?Sized,
{
    Ok(load_account(client, account_id).await?.trusts(asset))
}

/// Fund a brand-new random account from `source_seed`.
///
/// The returned snapshot is synthesized locally with sequence 0; it is not
/// re-read from the ledger.
pub async fn create_account<C>(
    client: &C,
    network: &NetworkConfig,
    source_seed: &str,
    starting_balance: &str,
) -> Result<CreatedAccount, MintError>
where
    C: LedgerClient + ?Sized,
{
    let source = Keypair::from_seed(source_seed, "source")?;
    let new_account = Keypair::random();
    let starting_balance = parse_amount(starting_balance)?;

    let snapshot = client
        .account_detail(&source.address())
        .await
        .map_err(MintError::ledger("fetch source account details"))?;

    let tx = TransactionBuilder::new(
        &snapshot,
        Operation::CreateAccount {
            destination: new_account.address(),
            starting_balance,
        },
        network.base_fee,
    )?
    .sign(&source, &network.network_passphrase)?;

    let response = client
        .submit_transaction(&tx)
        .await
        .map_err(MintError::ledger("submit transaction for account creation"))?;

    info!(
        funder = %source.address(),
        account = %new_account.address(),
        hash = %response.hash,
        "account created"
    );

    Ok(CreatedAccount {
        account: Account::new(new_account.address(), 0),
        keypair: new_account,
        response,
    })
}

/// Establish a trustline from the `source_seed` account to `asset`.
///
/// Does not check for an existing trustline first.
pub async fn create_trustline<C>(
    client: &C,
    network: &NetworkConfig,
    source_seed: &str,
    asset: &Asset,
) -> Result<SubmitResponse, MintError>
where
    C: LedgerClient + ?Sized,
{
    let source = Keypair::from_seed(source_seed, "source")?;

    let snapshot = client
        .account_detail(&source.address())
        .await
        .map_err(MintError::ledger("fetch source account details"))?;

    // Surface an unconvertible asset before signing anything.
    asset.to_change_trust_asset()?;

    let tx = TransactionBuilder::new(
        &snapshot,
        Operation::ChangeTrust {
            asset: asset.clone(),
            limit: i64::MAX,
        },
        network.base_fee,
    )?
    .sign(&source, &network.network_passphrase)?;

    let response = client
        .submit_transaction(&tx)
        .await
        .map_err(MintError::ledger("submit transaction for trustline creation"))?;

    info!(account = %source.address(), asset = %asset, hash = %response.hash, "trustline created");
    Ok(response)
}

/// Pay `amount` of `asset` from the issuer to `destination`.
///
/// `issuer_account` must have been loaded immediately before this call.
#[allow(clippy::too_many_arguments)]
pub async fn issue_payment<C>(
    client: &C,
    network: &NetworkConfig,
    issuer: &Keypair,
    issuer_account: &Account,
    destination: &str,
    asset: &Asset,
    amount: &str,
    memo: Option<&str>,
) -> Result<SubmitResponse, MintError>
where
    C: LedgerClient + ?Sized,
{
    let amount = parse_amount(amount)?;

    let tx = TransactionBuilder::new(
        issuer_account,
        Operation::Payment {
            destination: destination.to_string(),
            asset: asset.clone(),
            amount,
        },
        network.base_fee,
    )?
    .memo(memo.map(str::to_string))
    .sign(issuer, &network.network_passphrase)?;

    let response = client
        .submit_transaction(&tx)
        .await
        .map_err(MintError::ledger("submit transaction"))?;

    info!(destination, asset = %asset, hash = %response.hash, "payment submitted");
    Ok(response)
}

/// Permanently remove the issuer's ability to sign.
pub async fn lock_account<C>(
    client: &C,
    network: &NetworkConfig,
    issuer: &Keypair,
) -> Result<SubmitResponse, MintError>
where
    C: LedgerClient + ?Sized,
{
    let address = issuer.address();
    let snapshot = client
        .account_detail(&address)
        .await
        .map_err(MintError::ledger("fetch source account details"))?;

    let tx = TransactionBuilder::new(
        &snapshot,
        Operation::SetOptions(SetOptions::lock(&address)),
        network.base_fee,
    )?
    .sign(issuer, &network.network_passphrase)?;

    let response = client
        .submit_transaction(&tx)
        .await
        .map_err(MintError::ledger("submit transaction for account locking"))?;

    info!(account = %address, hash = %response.hash, "account locked");
    Ok(response)
}
