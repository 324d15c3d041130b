//! Create the sales store and its schema. Safe to run repeatedly.

use salesgenius::config::Config;
use salesgenius::db;
use salesgenius::domain::ReportError;

#[tokio::main]
async fn main() {
    salesgenius::init_tracing();

    let config = Config::default();
    if let Err(e) = run(&config).await {
        tracing::error!(kind = e.kind(), "store creation failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), ReportError> {
    db::open_store(config).await?;
    tracing::info!(path = %config.store_path.display(), "store ready");
    Ok(())
}
