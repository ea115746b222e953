//! CLI entry point - the composition root.

use clap::Parser;

use faultbox_axum::start_server;
use faultbox_cli::{Cli, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so its values feed clap's env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose)?;

    let config = cli.server_config();
    tracing::info!(
        port = config.port,
        bind = %config.bind_address,
        max_workers = config.max_workers,
        "Starting faultbox"
    );

    start_server(config).await
}
