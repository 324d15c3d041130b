//! Fit the yearly revenue trend and render the forecast chart.

use salesgenius::config::Config;
use salesgenius::db;
use salesgenius::domain::ReportError;
use salesgenius::services::trend_service;

#[tokio::main]
async fn main() {
    salesgenius::init_tracing();

    let config = Config::default();
    if let Err(e) = run(&config).await {
        tracing::error!(kind = e.kind(), "forecast failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<(), ReportError> {
    let db = db::open_store(config).await?;
    if let Some(model) = trend_service::run_forecast(&db, config).await? {
        println!(
            "Tendance ajustée : montant ≈ {:.2} × jour + {:.2} (FCFA)",
            model.slope, model.intercept
        );
    }
    Ok(())
}
