use chrono::{Duration, NaiveDate};
use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};

use crate::config::Config;
use crate::domain::ReportError;
use crate::models::{category, client, product, promotion, sale};

/// Fixed reference data inserted before the synthetic rows.
const CATEGORIES: [(&str, &str); 2] = [
    ("Électronique", "Appareils électroniques"),
    ("Alimentation", "Produits alimentaires"),
];

const PROMOTIONS: [(&str, f64, &str, &str); 2] = [
    ("Soldes Hiver", 20.0, "2024-01-10", "2024-02-10"),
    ("Spécial Été", 15.0, "2024-06-01", "2024-06-30"),
];

const CITIES: [&str; 4] = ["Paris", "Lyon", "Marseille", "Toulouse"];

/// Row counts written by a population run.
#[derive(Debug)]
pub struct SeedReport {
    pub categories: usize,
    pub promotions: usize,
    pub products: usize,
    pub clients: usize,
    pub sales: usize,
}

/// Populate the store with synthetic test data.
///
/// Everything runs inside one transaction: readers see either the full
/// data set or, after any failure, nothing at all.
pub async fn seed_demo_data(
    db: &DatabaseConnection,
    config: &Config,
) -> Result<SeedReport, ReportError> {
    let mut rng = rand::thread_rng();
    let txn = db.begin().await?;

    // 1. Reference data
    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let saved = category::ActiveModel {
            name: Set(name.to_owned()),
            description: Set(Some(description.to_owned())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        category_ids.push(saved.id);
    }

    let mut promotion_ids = Vec::with_capacity(PROMOTIONS.len());
    for (name, discount, start_date, end_date) in PROMOTIONS {
        let saved = promotion::ActiveModel {
            name: Set(name.to_owned()),
            discount: Set(Some(discount)),
            start_date: Set(start_date.to_owned()),
            end_date: Set(end_date.to_owned()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        promotion_ids.push(saved.id);
    }

    // 2. Products: random category, price in [10, 500], stock in [0, 100],
    //    roughly a third without promotion
    let mut product_ids = Vec::with_capacity(config.product_count as usize);
    for i in 1..=config.product_count {
        let promotion_id = match rng.gen_range(0..=promotion_ids.len()) {
            0 => None,
            n => Some(promotion_ids[n - 1]),
        };
        let saved = product::ActiveModel {
            name: Set(format!("Produit {}", i)),
            category_id: Set(Some(category_ids[rng.gen_range(0..category_ids.len())])),
            price: Set(round2(rng.gen_range(10.0..=500.0))),
            stock: Set(Some(rng.gen_range(0..=100))),
            promotion_id: Set(promotion_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        product_ids.push(saved.id);
    }

    // 3. Clients with unique synthetic emails
    let mut client_ids = Vec::with_capacity(config.client_count as usize);
    for i in 1..=config.client_count {
        let saved = client::ActiveModel {
            name: Set(format!("Client {}", i)),
            email: Set(Some(format!("client{}@example.com", i))),
            city: Set(Some(CITIES[rng.gen_range(0..CITIES.len())].to_owned())),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        client_ids.push(saved.id);
    }

    // 4. Sales across the calendar year
    let year_start = NaiveDate::from_ymd_opt(config.sales_year, 1, 1)
        .ok_or_else(|| ReportError::Unexpected(format!("invalid year {}", config.sales_year)))?;
    let sale_count = rng.gen_range(config.min_sales..=config.max_sales) as usize;

    for _ in 0..sale_count {
        let product_id = product_ids[rng.gen_range(0..product_ids.len())];
        let client_id = client_ids[rng.gen_range(0..client_ids.len())];
        let sale_date = year_start + Duration::days(rng.gen_range(0..365));
        let quantity: i32 = rng.gen_range(1..=5);

        // The current price, looked up at insertion time
        let product = product::Entity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ReportError::Store(format!("product {} missing during population", product_id))
            })?;
        let amount = round2(product.price * quantity as f64);

        sale::ActiveModel {
            product_id: Set(Some(product_id)),
            client_id: Set(Some(client_id)),
            sale_date: Set(sale_date.format("%Y-%m-%d").to_string()),
            quantity: Set(quantity),
            amount: Set(amount),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(SeedReport {
        categories: category_ids.len(),
        promotions: promotion_ids.len(),
        products: product_ids.len(),
        clients: client_ids.len(),
        sales: sale_count,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(499.994), 499.99);
        assert_eq!(round2(3.0), 3.0);
    }
}
