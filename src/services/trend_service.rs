//! Trend Estimator - fits a one-dimensional linear model on day-of-year
//! against converted sale amounts and renders the scatter + fitted line.
//!
//! The estimator reads the store directly and re-derives the currency
//! conversion instead of reusing the aggregator's output.

use chrono::{Datelike, NaiveDate};
use linfa::DatasetBase;
use linfa::traits::Fit;
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::config::Config;
use crate::domain::ReportError;
use crate::render::charts;

/// One converted sample of the trend input.
#[derive(Clone, Copy, Debug)]
pub struct TrendPoint {
    pub day_of_year: u32,
    pub amount_fcfa: f64,
}

/// A fitted line over day-of-year.
#[derive(Clone, Copy, Debug)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    pub fn predict(&self, day: f64) -> f64 {
        self.slope * day + self.intercept
    }
}

/// Load (date, converted amount) pairs straight from the sales table.
pub async fn fetch_trend_points(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<Vec<TrendPoint>, ReportError> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT sale_date, amount FROM sales ORDER BY id".to_owned(),
    );
    let rows = db
        .query_all(stmt)
        .await
        .map_err(|e| ReportError::Store(e.to_string()))?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_date: String = row
            .try_get("", "sale_date")
            .map_err(|e| ReportError::DataShape(format!("column 'sale_date': {}", e)))?;
        let amount: f64 = row
            .try_get("", "amount")
            .map_err(|e| ReportError::DataShape(format!("column 'amount': {}", e)))?;
        let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|e| {
            ReportError::DataShape(format!("unparseable sale_date '{}': {}", raw_date, e))
        })?;
        points.push(TrendPoint {
            day_of_year: date.ordinal(),
            amount_fcfa: amount * config.exchange_rate,
        });
    }
    Ok(points)
}

/// Fit day-of-year -> amount on a seeded random training subset; the
/// remaining samples are held out. Same seed, same split, same line.
pub fn fit_trend(points: &[TrendPoint], config: &Config) -> Result<TrendModel, ReportError> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.trend_seed);
    indices.shuffle(&mut rng);

    let train_len = ((points.len() as f64) * config.train_ratio).round() as usize;
    let train_len = train_len.clamp(1, points.len());
    let train = &indices[..train_len];
    tracing::debug!(
        train = train_len,
        held_out = points.len() - train_len,
        "trend sample split"
    );

    let records = Array2::from_shape_vec(
        (train.len(), 1),
        train
            .iter()
            .map(|&i| points[i].day_of_year as f64)
            .collect(),
    )
    .map_err(|e| ReportError::Unexpected(format!("building training matrix: {}", e)))?;
    let targets = Array1::from_iter(train.iter().map(|&i| points[i].amount_fcfa));

    let ds = DatasetBase::from(records).with_targets(targets);
    let fitted: FittedLinearRegression<f64> = LinearRegression::default()
        .fit(&ds)
        .map_err(|e| ReportError::Unexpected(format!("linear fit failed: {}", e)))?;

    Ok(TrendModel {
        slope: fitted.params()[0],
        intercept: fitted.intercept(),
    })
}

/// Run the full forecasting pipeline: load, fit, render. Returns `None`
/// without producing a chart when the store holds fewer than two sales.
pub async fn run_forecast(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<Option<TrendModel>, ReportError> {
    let points = fetch_trend_points(db, config).await?;
    tracing::info!(points = points.len(), "trend samples loaded");

    if points.len() < 2 {
        tracing::warn!("not enough sales to fit a trend, no chart produced");
        return Ok(None);
    }

    let model = fit_trend(&points, config)?;
    tracing::info!(slope = model.slope, intercept = model.intercept, "trend fitted");

    charts::render_forecast_chart(&points, &model, &config.forecast_chart_path)?;
    tracing::info!(path = %config.forecast_chart_path.display(), "forecast chart written");

    Ok(Some(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_points(n: u32, slope: f64, intercept: f64) -> Vec<TrendPoint> {
        (1..=n)
            .map(|d| TrendPoint {
                day_of_year: d,
                amount_fcfa: slope * d as f64 + intercept,
            })
            .collect()
    }

    #[test]
    fn fit_recovers_exact_linear_data() {
        let config = Config::default();
        let points = linear_points(120, 2.0, 10.0);
        let model = fit_trend(&points, &config).expect("fit");
        assert!((model.slope - 2.0).abs() < 1e-6, "slope {}", model.slope);
        assert!(
            (model.intercept - 10.0).abs() < 1e-4,
            "intercept {}",
            model.intercept
        );
        assert!((model.predict(400.0) - 810.0).abs() < 1e-3);
    }

    #[test]
    fn seeded_split_is_reproducible() {
        let config = Config::default();
        let points: Vec<TrendPoint> = (1..=60)
            .map(|d| TrendPoint {
                day_of_year: d,
                amount_fcfa: (d * d) as f64 * 0.5 + 100.0,
            })
            .collect();
        let a = fit_trend(&points, &config).expect("first fit");
        let b = fit_trend(&points, &config).expect("second fit");
        assert_eq!(a.slope.to_bits(), b.slope.to_bits());
        assert_eq!(a.intercept.to_bits(), b.intercept.to_bits());
    }
}
