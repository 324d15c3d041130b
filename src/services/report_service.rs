//! Report Aggregator - joins the store into a denormalized record set,
//! converts amounts to FCFA and derives the summary statistics behind the
//! charts and the spreadsheet export.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};
use serde::Serialize;

use crate::config::Config;
use crate::domain::ReportError;
use crate::render::{charts, spreadsheet};

/// Sentinel for sales whose product carries no promotion.
pub const NO_PROMOTION: &str = "Aucune";

/// Month names displayed on the report, keyed by month index so the
/// output never depends on the host locale.
pub const MONTH_NAMES_FR: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// `month` is 1-12, as returned by `NaiveDate::month`.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES_FR[(month - 1) as usize]
}

/// One denormalized sale, already cleaned and converted.
#[derive(Clone, Debug, Serialize)]
pub struct ReportRow {
    pub sale_date: NaiveDate,
    /// Amount in EUR as persisted. Aggregation trusts this field; it is
    /// never recomputed from price and quantity.
    pub amount: f64,
    pub product: String,
    pub category: String,
    pub client: String,
    pub promotion: String,
    pub discount: f64,
    pub month: String,
    pub amount_fcfa: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct ReportSummary {
    pub sale_count: usize,
    pub total_fcfa: f64,
    pub mean_fcfa: f64,
    /// Top products by summed converted amount, descending; ties keep
    /// first-seen order.
    pub top_products: Vec<(String, f64)>,
    /// Month name and total, in chronological month order.
    pub monthly_totals: Vec<(String, f64)>,
    /// Category name and total, in first-seen order.
    pub category_totals: Vec<(String, f64)>,
}

/// ORDER BY keeps the record set in stable input order, which is what
/// breaks ranking ties downstream.
const REPORT_QUERY: &str = r#"
    SELECT s.sale_date, s.amount, p.name AS product,
           c.name AS category, cl.name AS client,
           pr.name AS promotion, pr.discount
    FROM sales s
    JOIN products p ON s.product_id = p.id
    JOIN categories c ON p.category_id = c.id
    JOIN clients cl ON s.client_id = cl.id
    LEFT JOIN promotions pr ON p.promotion_id = pr.id
    ORDER BY s.id
"#;

/// Load the joined record set and apply the cleaning rules: sentinel for
/// missing promotions, zero for missing discounts, locale-independent
/// month names, and the EUR -> FCFA conversion (before any aggregation).
pub async fn fetch_report_rows(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<Vec<ReportRow>, ReportError> {
    let stmt = Statement::from_string(db.get_database_backend(), REPORT_QUERY.to_owned());
    let rows = db
        .query_all(stmt)
        .await
        .map_err(|e| ReportError::Store(e.to_string()))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_date: String = row
            .try_get("", "sale_date")
            .map_err(|e| column_error("sale_date", e))?;
        let amount: f64 = row
            .try_get("", "amount")
            .map_err(|e| column_error("amount", e))?;
        let product: String = row
            .try_get("", "product")
            .map_err(|e| column_error("product", e))?;
        let category: String = row
            .try_get("", "category")
            .map_err(|e| column_error("category", e))?;
        let client: String = row
            .try_get("", "client")
            .map_err(|e| column_error("client", e))?;
        let promotion: Option<String> = row
            .try_get("", "promotion")
            .map_err(|e| column_error("promotion", e))?;
        let discount: Option<f64> = row
            .try_get("", "discount")
            .map_err(|e| column_error("discount", e))?;

        let sale_date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|e| {
            ReportError::DataShape(format!("unparseable sale_date '{}': {}", raw_date, e))
        })?;

        out.push(ReportRow {
            sale_date,
            amount,
            product,
            category,
            client,
            promotion: promotion.unwrap_or_else(|| NO_PROMOTION.to_owned()),
            discount: discount.unwrap_or(0.0),
            month: month_name(sale_date.month()).to_owned(),
            amount_fcfa: amount * config.exchange_rate,
        });
    }
    Ok(out)
}

fn column_error(column: &str, e: DbErr) -> ReportError {
    ReportError::DataShape(format!("column '{}': {}", column, e))
}

/// Compute the summary statistics over already-converted rows.
pub fn summarize(rows: &[ReportRow]) -> ReportSummary {
    let total_fcfa: f64 = rows.iter().map(|r| r.amount_fcfa).sum();
    let mean_fcfa = if rows.is_empty() {
        0.0
    } else {
        total_fcfa / rows.len() as f64
    };

    let mut top_products = grouped_totals(rows, |r| r.product.as_str());
    // Stable sort, so equal totals keep their first-seen order
    top_products.sort_by(|a, b| b.1.total_cmp(&a.1));
    top_products.truncate(5);

    let mut by_month: BTreeMap<u32, f64> = BTreeMap::new();
    for r in rows {
        *by_month.entry(r.sale_date.month()).or_insert(0.0) += r.amount_fcfa;
    }
    let monthly_totals = by_month
        .into_iter()
        .map(|(m, t)| (month_name(m).to_owned(), t))
        .collect();

    ReportSummary {
        sale_count: rows.len(),
        total_fcfa,
        mean_fcfa,
        top_products,
        monthly_totals,
        category_totals: grouped_totals(rows, |r| r.category.as_str()),
    }
}

/// Sum converted amounts per key, keeping keys in first-seen order.
fn grouped_totals<'a, F>(rows: &'a [ReportRow], key: F) -> Vec<(String, f64)>
where
    F: Fn(&'a ReportRow) -> &'a str,
{
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        let k = key(row);
        match index.get(k) {
            Some(&i) => totals[i].1 += row.amount_fcfa,
            None => {
                index.insert(k, totals.len());
                totals.push((k.to_owned(), row.amount_fcfa));
            }
        }
    }
    totals
}

/// Run the full reporting pipeline: load, summarize, render the combined
/// chart and export the spreadsheet. Returns `None` without touching the
/// filesystem when the store has no sales. Any failure aborts before the
/// first artifact is written.
pub async fn run_report(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<Option<ReportSummary>, ReportError> {
    let rows = fetch_report_rows(db, config).await?;
    tracing::info!(rows = rows.len(), "joined sales records loaded");

    if rows.is_empty() {
        tracing::warn!("store contains no sales, no report artifacts produced");
        return Ok(None);
    }

    let summary = summarize(&rows);

    charts::render_analysis_chart(&summary, &config.analysis_chart_path)?;
    tracing::info!(path = %config.analysis_chart_path.display(), "analysis chart written");

    spreadsheet::export_report(&rows, &config.export_path)?;
    tracing::info!(path = %config.export_path.display(), "spreadsheet export written");

    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, product: &str, category: &str, amount_fcfa: f64) -> ReportRow {
        ReportRow {
            sale_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount: amount_fcfa / 655.957,
            product: product.to_owned(),
            category: category.to_owned(),
            client: "Client 1".to_owned(),
            promotion: NO_PROMOTION.to_owned(),
            discount: 0.0,
            month: month_name(
                NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap().month(),
            )
            .to_owned(),
            amount_fcfa,
        }
    }

    #[test]
    fn month_table_is_locale_independent() {
        assert_eq!(month_name(1), "Janvier");
        assert_eq!(month_name(8), "Août");
        assert_eq!(month_name(12), "Décembre");
    }

    #[test]
    fn monthly_totals_are_chronological() {
        let rows = vec![
            row("2024-11-03", "A", "Cat", 10.0),
            row("2024-02-14", "A", "Cat", 20.0),
            row("2024-07-01", "A", "Cat", 30.0),
        ];
        let summary = summarize(&rows);
        let months: Vec<&str> = summary
            .monthly_totals
            .iter()
            .map(|(m, _)| m.as_str())
            .collect();
        assert_eq!(months, vec!["Février", "Juillet", "Novembre"]);
    }

    #[test]
    fn top_products_break_ties_in_input_order() {
        let rows = vec![
            row("2024-01-01", "Tard", "Cat", 50.0),
            row("2024-01-02", "Premier", "Cat", 100.0),
            row("2024-01-03", "Second", "Cat", 100.0),
            row("2024-01-04", "Tard", "Cat", 50.0),
        ];
        let summary = summarize(&rows);
        // "Tard" sums to 100.0 as well, but was seen first
        let names: Vec<&str> = summary
            .top_products
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["Tard", "Premier", "Second"]);
    }

    #[test]
    fn summary_totals_add_up() {
        let rows = vec![
            row("2024-01-01", "A", "X", 10.0),
            row("2024-01-02", "B", "Y", 30.0),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.sale_count, 2);
        assert!((summary.total_fcfa - 40.0).abs() < 1e-9);
        assert!((summary.mean_fcfa - 20.0).abs() < 1e-9);
        let by_category: f64 = summary.category_totals.iter().map(|(_, t)| t).sum();
        assert!((by_category - summary.total_fcfa).abs() < 1e-9);
    }
}
