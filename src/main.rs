mod cli;
mod commands;

use tracing::{debug, error};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let (command, settings) = cli::parse_args()?;

    // Initialize the logger
    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Using store {}", settings.store_path.display());
    if let Err(e) = commands::run(command, &settings).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
