use crate::cli::BalanceArgs;
use anyhow::{Context, Result};
use asset_mint::account::{account_trusts_asset, load_account};
use asset_mint::asset::Asset;
use asset_mint::config::create_ledger_client;

pub async fn execute(args: BalanceArgs) -> Result<()> {
    let network = args.network.network_config();
    let asset: Option<Asset> = args
        .asset
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("Invalid --asset")?;

    let client = create_ledger_client(&network);
    let account = load_account(&client, &args.account)
        .await
        .with_context(|| format!("Account lookup failed for {}", args.account))?;

    println!("Account {}", account.address);
    println!("  Sequence: {}", account.sequence);
    for balance in &account.balances {
        match &balance.asset {
            Some(asset) => println!("  {}: {}", asset, balance.amount),
            None => println!("  native: {}", balance.amount),
        }
    }

    if let Some(asset) = asset {
        let trusted = account_trusts_asset(&client, &account.address, &asset)
            .await
            .context("Trust check failed")?;
        let trusted = if trusted { "yes" } else { "no" };
        println!("  Trusts {}: {}", asset, trusted);
    }

    Ok(())
}
