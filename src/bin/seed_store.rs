//! Populate the sales store with synthetic test data.

use salesgenius::config::Config;
use salesgenius::domain::ReportError;
use salesgenius::{db, seed};

#[tokio::main]
async fn main() {
    salesgenius::init_tracing();

    let config = Config::default();
    if let Err(e) = run(&config).await {
        tracing::error!(kind = e.kind(), "population failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), ReportError> {
    let db = db::open_store(config).await?;
    let report = seed::seed_demo_data(&db, config).await?;
    tracing::info!(
        categories = report.categories,
        promotions = report.promotions,
        products = report.products,
        clients = report.clients,
        sales = report.sales,
        "store populated"
    );
    Ok(())
}
