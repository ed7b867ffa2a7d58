use crate::cli::MintArgs;
use anyhow::{bail, Context, Result};
use asset_mint::config::create_ledger_client;
use asset_mint::mint::{mint_asset, MintRequest};
use std::io::{self, BufRead, Write};
use tracing::{error, warn};

pub async fn execute(args: MintArgs) -> Result<()> {
    let network = args.network.network_config();

    println!("Welcome to the asset minting tool");

    let issuer_seed = prompt_secret("Enter Issuer Seed Key")?;
    let asset_code = prompt("Enter Asset Code")?;
    let amount = prompt("Enter Amount to Mint")?;
    let distributor_address = prompt("Enter Distributor Account ID")?;
    let distributor_seed = prompt_secret("Enter Distributor Seed Key")?;

    let mut request = MintRequest::new(
        issuer_seed,
        asset_code,
        amount,
        distributor_address,
        distributor_seed,
    );
    request.create_distributor = args.create_distributor;
    request.trust_asset = !args.no_trust;
    request.lock_issuer = args.lock_issuer;
    request.starting_balance = args.starting_balance;
    request.memo = Some(args.memo).filter(|m| !m.is_empty());

    if request.lock_issuer {
        warn!("--lock-issuer zeroes every signing weight on the issuer; it can never sign again");
        let answer = prompt("Type 'yes' to lock the issuer after minting")?;
        if answer != "yes" {
            bail!("issuer lock not confirmed; nothing was submitted");
        }
    }

    let client = create_ledger_client(&network);

    println!("Preparing to mint asset...");
    let report = match mint_asset(&client, &network, &request).await {
        Ok(report) => report,
        Err(failure) => {
            for done in failure.submitted() {
                error!(
                    step = %done.step,
                    hash = done.transaction_hash.as_deref().unwrap_or_default(),
                    "already applied to the ledger"
                );
            }
            return Err(failure).context("Minting failed");
        }
    };

    if let Some(created) = &report.created_account {
        println!("New account: {}", created.account.address);
        println!("New account seed (store it now, it is not shown again): {}", created.keypair.seed());
    }
    println!("Transaction successfully submitted. Hash: {}", report.payment.hash);
    println!("Asset: {}", report.asset);
    println!("Asset minted successfully");

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("Prompt failed: {label}"))?;
    if read == 0 {
        bail!("Prompt failed: {label}: no input");
    }
    Ok(line.trim().to_string())
}

fn prompt_secret(label: &str) -> Result<String> {
    rpassword::prompt_password(format!("{label}: "))
        .map(|s| s.trim().to_string())
        .with_context(|| format!("Prompt failed: {label}"))
}
