//! mailstore CLI: inspect and manage the captured-mail archive. Config from env and optional CLI args.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use mail_cli::{run, Cli, CliConfig};
use mail_core::{init_console_tracing, init_tracing};
use mail_storage::SqliteMessageStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::load()?.with_overrides(cli.database_url, cli.table);

    if cli.log_to_file {
        init_tracing(&config.log_file)?;
    } else {
        init_console_tracing()?;
    }

    let store = SqliteMessageStore::new(&config.store_config())
        .await
        .with_context(|| format!("Open message store at {}", config.database_url))?;

    let result = run(&store, cli.command, &mut io::stdout()).await;
    store.close().await;
    result
}
