//! Produce the sales report: summary statistics on stdout, the combined
//! chart figure and the spreadsheet export on disk.

use salesgenius::config::Config;
use salesgenius::db;
use salesgenius::domain::ReportError;
use salesgenius::services::report_service::{self, ReportSummary};

#[tokio::main]
async fn main() {
    salesgenius::init_tracing();

    let config = Config::default();
    tracing::info!("sales analysis started");
    if let Err(e) = run(&config).await {
        tracing::error!(kind = e.kind(), "sales analysis failed: {}", e);
        std::process::exit(1);
    }
    tracing::info!("sales analysis finished");
}

async fn run(config: &Config) -> Result<(), ReportError> {
    let db = db::open_store(config).await?;
    if let Some(summary) = report_service::run_report(&db, config).await? {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &ReportSummary) {
    println!("\n=== STATISTIQUES GLOBALES ===");
    println!("CA Total : {:.2} FCFA", summary.total_fcfa);
    println!("Moyenne/vente : {:.2} FCFA", summary.mean_fcfa);
    println!("Nombre de ventes : {}", summary.sale_count);
    println!("\n=== TOP 5 PRODUITS (FCFA) ===");
    for (name, total) in &summary.top_products {
        println!("{} : {:.2} FCFA", name, total);
    }
}
