use std::path::PathBuf;

/// Runtime configuration for the batch jobs.
///
/// Every component receives a `&Config` instead of reading module-level
/// constants, so tests can point the toolkit at a temporary store and
/// scratch output directories. `Default` carries the production constants;
/// no environment variables are consulted.
#[derive(Clone, Debug)]
pub struct Config {
    /// Location of the SQLite store file.
    pub store_path: PathBuf,
    /// Combined bar + pie analysis figure.
    pub analysis_chart_path: PathBuf,
    /// Scatter + fitted-line forecast figure.
    pub forecast_chart_path: PathBuf,
    /// Spreadsheet export of the denormalized, converted record set.
    pub export_path: PathBuf,
    /// Multiplicative conversion applied to every stored amount
    /// before aggregation (1 EUR = 655.957 FCFA).
    pub exchange_rate: f64,
    /// Number of synthetic products inserted by the populator.
    pub product_count: u32,
    /// Number of synthetic clients inserted by the populator.
    pub client_count: u32,
    /// Inclusive bounds for the random number of synthetic sales.
    pub min_sales: u32,
    pub max_sales: u32,
    /// Calendar year the synthetic sale dates fall in.
    pub sales_year: i32,
    /// Seed for the reproducible train/held-out split of the trend fit.
    pub trend_seed: u64,
    /// Fraction of the trend sample used for training.
    pub train_ratio: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/sales_2024.db"),
            analysis_chart_path: PathBuf::from("report/charts/sales_analysis_fcfa.png"),
            forecast_chart_path: PathBuf::from("report/charts/revenue_forecast.png"),
            export_path: PathBuf::from("report/exports/sales_data.xlsx"),
            exchange_rate: 655.957,
            product_count: 20,
            client_count: 50,
            min_sales: 200,
            max_sales: 300,
            sales_year: 2024,
            trend_seed: 42,
            train_ratio: 0.8,
        }
    }
}

impl Config {
    /// Connection URL for the store file, created on first open.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.store_path.display())
    }
}
