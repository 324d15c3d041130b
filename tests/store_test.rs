use salesgenius::config::Config;
use salesgenius::db;
use salesgenius::domain::ReportError;
use salesgenius::models::{category, client, product, promotion, sale};
use salesgenius::seed;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set,
    Statement,
};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn table_names(db: &DatabaseConnection) -> Vec<String> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
            .to_owned(),
    );
    db.query_all(stmt)
        .await
        .expect("Failed to list tables")
        .into_iter()
        .map(|row| row.try_get::<String>("", "name").expect("table name"))
        .collect()
}

#[tokio::test]
async fn schema_creation_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        store_path: dir.path().join("data").join("sales_test.db"),
        ..Config::default()
    };

    let first = db::open_store(&config).await.expect("first open");
    let tables_after_first = table_names(&first).await;
    drop(first);

    // Second run against the same location must not error or lose anything
    let second = db::open_store(&config)
        .await
        .expect("second open must succeed");
    let tables_after_second = table_names(&second).await;

    assert_eq!(tables_after_first, tables_after_second);
    assert_eq!(
        tables_after_second,
        vec!["categories", "clients", "products", "promotions", "sales"]
    );

    let stmt = Statement::from_string(
        second.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'idx_sales_date'"
            .to_owned(),
    );
    let indexes = second.query_all(stmt).await.expect("list indexes");
    assert_eq!(indexes.len(), 1, "sales date index must exist");
}

#[tokio::test]
async fn promotion_discount_must_stay_in_range() {
    let db = setup_test_db().await;

    for bad in [150.0, -5.0] {
        let res = promotion::ActiveModel {
            name: Set("Promo cassée".to_owned()),
            discount: Set(Some(bad)),
            start_date: Set("2024-01-01".to_owned()),
            end_date: Set("2024-01-31".to_owned()),
            ..Default::default()
        }
        .insert(&db)
        .await;
        let err = ReportError::from(res.expect_err("discount outside [0,100] must be rejected"));
        assert!(matches!(err, ReportError::Constraint(_)), "{}", err);
    }

    // Boundary values are accepted
    for ok in [0.0, 100.0] {
        promotion::ActiveModel {
            name: Set("Promo limite".to_owned()),
            discount: Set(Some(ok)),
            start_date: Set("2024-01-01".to_owned()),
            end_date: Set("2024-01-31".to_owned()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("boundary discount must be accepted");
    }
}

#[tokio::test]
async fn product_price_must_be_positive() {
    let db = setup_test_db().await;

    let res = product::ActiveModel {
        name: Set("Produit gratuit".to_owned()),
        price: Set(0.0),
        ..Default::default()
    }
    .insert(&db)
    .await;
    let err = ReportError::from(res.expect_err("zero price must be rejected"));
    assert!(matches!(err, ReportError::Constraint(_)), "{}", err);
}

#[tokio::test]
async fn sale_quantity_must_be_positive() {
    let db = setup_test_db().await;

    let res = sale::ActiveModel {
        sale_date: Set("2024-04-01".to_owned()),
        quantity: Set(0),
        amount: Set(10.0),
        ..Default::default()
    }
    .insert(&db)
    .await;
    let err = ReportError::from(res.expect_err("zero quantity must be rejected"));
    assert!(matches!(err, ReportError::Constraint(_)), "{}", err);
}

#[tokio::test]
async fn client_email_is_unique() {
    let db = setup_test_db().await;

    client::ActiveModel {
        name: Set("Client 1".to_owned()),
        email: Set(Some("dupe@example.com".to_owned())),
        city: Set(Some("Paris".to_owned())),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("first client");

    let res = client::ActiveModel {
        name: Set("Client 2".to_owned()),
        email: Set(Some("dupe@example.com".to_owned())),
        city: Set(Some("Lyon".to_owned())),
        ..Default::default()
    }
    .insert(&db)
    .await;
    let err = ReportError::from(res.expect_err("duplicate email must be rejected"));
    assert!(matches!(err, ReportError::Constraint(_)), "{}", err);
}

#[tokio::test]
async fn category_name_is_unique() {
    let db = setup_test_db().await;

    category::ActiveModel {
        name: Set("Électronique".to_owned()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("first category");

    let res = category::ActiveModel {
        name: Set("Électronique".to_owned()),
        ..Default::default()
    }
    .insert(&db)
    .await;
    let err = ReportError::from(res.expect_err("duplicate category name must be rejected"));
    assert!(matches!(err, ReportError::Constraint(_)), "{}", err);
}

#[tokio::test]
async fn populated_sales_match_looked_up_prices() {
    let db = setup_test_db().await;
    let config = Config {
        product_count: 5,
        client_count: 4,
        min_sales: 30,
        max_sales: 40,
        ..Config::default()
    };

    let report = seed::seed_demo_data(&db, &config).await.expect("population");
    assert_eq!(report.categories, 2);
    assert_eq!(report.promotions, 2);
    assert_eq!(report.products, 5);
    assert_eq!(report.clients, 4);
    assert!((30..=40).contains(&report.sales));

    let sales = sale::Entity::find().all(&db).await.expect("sales");
    assert_eq!(sales.len(), report.sales);

    // Prices never change after population, so the price looked up now is
    // the price that was looked up at insertion time.
    for s in sales {
        let product_id = s.product_id.expect("sale references a product");
        let product = product::Entity::find_by_id(product_id)
            .one(&db)
            .await
            .expect("product query")
            .expect("product exists");

        let expected = (product.price * s.quantity as f64 * 100.0).round() / 100.0;
        assert!(
            (s.amount - expected).abs() < 1e-9,
            "sale {} amount {} != {} * {}",
            s.id,
            s.amount,
            product.price,
            s.quantity
        );
        assert!((1..=5).contains(&s.quantity));
        assert!(s.sale_date.starts_with("2024-"));
        assert!(product.price >= 10.0 && product.price <= 500.0);
    }
}

#[tokio::test]
async fn population_rolls_back_on_failure() {
    let db = setup_test_db().await;

    // Occupy the first synthetic email so the client insert collides
    client::ActiveModel {
        name: Set("Squatteur".to_owned()),
        email: Set(Some("client1@example.com".to_owned())),
        city: Set(Some("Paris".to_owned())),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("conflicting client");

    let config = Config {
        product_count: 3,
        client_count: 2,
        min_sales: 5,
        max_sales: 5,
        ..Config::default()
    };
    let err = seed::seed_demo_data(&db, &config)
        .await
        .expect_err("population must fail on the email collision");
    assert!(matches!(err, ReportError::Constraint(_)), "{}", err);

    // Nothing from the failed run is visible: full rollback
    let categories = category::Entity::find().count(&db).await.expect("count");
    let products = product::Entity::find().count(&db).await.expect("count");
    let sales = sale::Entity::find().count(&db).await.expect("count");
    assert_eq!(categories, 0);
    assert_eq!(products, 0);
    assert_eq!(sales, 0);
}
