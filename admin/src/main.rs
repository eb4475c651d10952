//! `arenaticket` binary.

use anyhow::Context;
use arenaticket_admin::cli::{load_config, App, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,arenaticket=debug")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.api_url).context("invalid configuration")?;
    let app = App::from_config(config);

    let outcome = app.session().restore_from_storage();
    tracing::debug!(?outcome, "Stored session checked");

    let output = app.execute(cli.command).await?;
    print!("{output}");
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
