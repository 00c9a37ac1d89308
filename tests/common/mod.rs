use actix_web::{test, web, App};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

use sales_report_rs::report;

// Tests share one transactions table, so they take turns.
static DB_GATE: LazyLock<Arc<tokio::sync::Mutex<()>>> =
    LazyLock::new(|| Arc::new(tokio::sync::Mutex::new(())));

pub struct TestApp {
    pub pool: PgPool,
    _guard: tokio::sync::OwnedMutexGuard<()>,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }
}

impl TestApp {
    /// Connect to the test database, or return None (skipping the test)
    /// when DATABASE_URL is not configured.
    pub async fn new() -> Option<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set, skipping integration test");
                return None;
            }
        };

        let guard = DB_GATE.clone().lock_owned().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to database for tests");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price NUMERIC NOT NULL,
                category TEXT NOT NULL,
                date_of_sale TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create transactions table");

        sqlx::query("TRUNCATE transactions")
            .execute(&pool)
            .await
            .expect("Failed to truncate transactions table");

        Some(TestApp {
            pool,
            _guard: guard,
        })
    }

    /// Insert one transaction row and return its id.
    pub async fn seed(
        &self,
        title: &str,
        description: &str,
        price: Decimal,
        category: &str,
        date_of_sale: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO transactions (id, title, description, price, category, date_of_sale)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(date_of_sale)
        .execute(&self.pool)
        .await
        .expect("Failed to seed transaction");
        id
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.pool.clone()))
                .route("/health", web::get().to(health_handler))
                .service(report::price_histogram)
                .service(report::category_breakdown)
                .service(report::combined_report)
                .service(report::list_transactions),
        )
        .await;

        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;

        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        TestResponse { status, body }
    }
}

async fn health_handler() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}
