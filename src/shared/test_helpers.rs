use axum_test::TestServer;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::items::models::Item;

/// Serve the full API router over an in-memory transport
pub fn test_server(pool: PgPool) -> TestServer {
    TestServer::new(crate::features::api_router(pool)).expect("failed to build test server")
}

/// Insert a category named `name` with description "`name` games"
pub async fn insert_category(pool: &PgPool, name: &str) -> Category {
    sqlx::query_as!(
        Category,
        r#"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, is_active, created_at, updated_at
        "#,
        name,
        format!("{} games", name)
    )
    .fetch_one(pool)
    .await
    .expect("failed to insert category")
}

/// Insert a fully populated item under `category_id`
pub async fn insert_item(pool: &PgPool, category_id: Uuid, title: &str) -> Item {
    sqlx::query_as!(
        Item,
        r#"
        INSERT INTO items (
            title, description, price, release_date, developer, publisher,
            rating, category_id
        ) VALUES ($1, $2, $3, DATE '2020-01-15', 'Studio', 'Publisher', 8, $4)
        RETURNING id, title, description, price, release_date, developer, publisher,
                  rating, is_available, category_id, created_at, updated_at
        "#,
        title,
        format!("About {}", title),
        Decimal::new(1999, 2),
        category_id
    )
    .fetch_one(pool)
    .await
    .expect("failed to insert item")
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}
