//! LexHarvest CLI — bulk harvester for EU legal acts.
//!
//! Discovers CELEX identifiers from the EUR-Lex SPARQL endpoint and
//! persists cleaned plain-text renditions per language.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
