mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    asset_mint::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mint(args) => commands::mint::execute(args).await,
        Commands::Balance(args) => commands::balance::execute(args).await,
    }
}
