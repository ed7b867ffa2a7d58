use clap::{Args, Parser, Subcommand};

use asset_mint::config::{NetworkConfig, MIN_BASE_FEE, TESTNET_HORIZON_URL, TESTNET_PASSPHRASE};
use asset_mint::mint::{DEFAULT_MEMO, DEFAULT_STARTING_BALANCE};

#[derive(Parser)]
#[command(name = "asset-mint")]
#[command(about = "Mint a custom asset on a Stellar-compatible network")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue a new asset to a distributor account (prompts for keys)
    Mint(MintArgs),
    /// Show an account's balances and, optionally, whether it trusts an asset
    Balance(BalanceArgs),
}

#[derive(Args)]
pub struct NetworkArgs {
    /// Horizon endpoint
    #[arg(long, default_value = TESTNET_HORIZON_URL)]
    pub horizon_url: String,

    /// Network passphrase used when signing
    #[arg(long, default_value = TESTNET_PASSPHRASE)]
    pub network_passphrase: String,

    /// Fee per operation, in stroops
    #[arg(long, default_value_t = MIN_BASE_FEE, value_parser = clap::value_parser!(u32).range(MIN_BASE_FEE as i64..))]
    pub base_fee: u32,
}

impl NetworkArgs {
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            horizon_url: self.horizon_url.clone(),
            network_passphrase: self.network_passphrase.clone(),
            base_fee: self.base_fee,
        }
    }
}

#[derive(Args)]
pub struct MintArgs {
    /// Fund a new account from the distributor before minting
    #[arg(long)]
    pub create_distributor: bool,

    /// Starting balance for the account created by --create-distributor
    #[arg(long, default_value = DEFAULT_STARTING_BALANCE)]
    pub starting_balance: String,

    /// Skip the distributor trustline (it must already exist)
    #[arg(long)]
    pub no_trust: bool,

    /// Permanently lock the issuer after minting. Irreversible.
    #[arg(long)]
    pub lock_issuer: bool,

    /// Memo text attached to the issuing payment
    #[arg(long, default_value = DEFAULT_MEMO)]
    pub memo: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Args)]
pub struct BalanceArgs {
    /// Account to inspect
    #[arg(long)]
    pub account: String,

    /// Asset to check a trustline for, as CODE:ISSUER
    #[arg(long)]
    pub asset: Option<String>,

    #[command(flatten)]
    pub network: NetworkArgs,
}
