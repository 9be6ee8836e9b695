mod cli;

use anyhow::Context;
use clap::Parser;
use core_runtime::config::CoreConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use core_service::CoreService;
use tracing::info;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default().with_level(cli.log_level);
    if let Some(format) = cli.log_format {
        logging = logging.with_format(format);
    }
    init_logging(logging).context("Failed to initialize logging")?;

    let builder = CoreConfig::builder()
        .from_env()
        .context("Failed to read configuration from the environment")?;
    let config = cli
        .apply(builder)
        .build()
        .context("Invalid configuration")?;
    config.log_summary();

    let service = CoreService::bootstrap(config).context("Failed to start sync service")?;
    let summary = service.run_once().await.context("Sync run failed")?;

    info!(
        added = summary.added(),
        failed = summary.failed(),
        channels = summary.channels.len(),
        "Done"
    );

    Ok(())
}
