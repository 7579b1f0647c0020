use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::items::handlers;
use crate::features::items::services::ItemService;

/// Create routes for the items feature
pub fn routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route("/api/items", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/api/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .patch(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::shared::test_helpers::{count_rows, insert_category, insert_item, test_server};

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_create_item_with_category(pool: PgPool) {
        let category = insert_category(&pool, "Adventure").await;
        let server = test_server(pool);

        let response = server
            .post("/api/items")
            .json(&json!({
                "title": "Zelda",
                "price": 59.99,
                "release_date": "2023-05-12",
                "rating": 10,
                "category_id": category.id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["title"], "Zelda");
        assert_eq!(body["data"]["price"], "59.99");
        assert_eq!(body["data"]["release_date"], "2023-05-12");
        assert_eq!(body["data"]["is_available"], true);
        assert_eq!(body["data"]["category"]["name"], "Adventure");
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_unknown_category_is_rejected(pool: PgPool) {
        let server = test_server(pool.clone());

        let response = server
            .post("/api/items")
            .json(&json!({
                "title": "Orphan",
                "price": "10.00",
                "category_id": Uuid::new_v4(),
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(
            body["errors"]["category_id"][0],
            "The selected category id is invalid."
        );
        assert_eq!(count_rows(&pool, "items").await, 0);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_price_and_rating_bounds(pool: PgPool) {
        let category = insert_category(&pool, "Arcade").await;
        let server = test_server(pool.clone());

        let body: Value = server
            .post("/api/items")
            .json(&json!({
                "title": "Pong",
                "price": -10.00,
                "rating": 15,
                "category_id": category.id,
            }))
            .await
            .json();
        assert_eq!(body["success"], false);
        assert!(body["errors"]["price"].is_array());
        assert!(body["errors"]["rating"].is_array());
        assert!(body["errors"].get("title").is_none());

        let response = server
            .post("/api/items")
            .json(&json!({
                "title": "Pong",
                "price": "abc",
                "category_id": category.id,
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["errors"]["price"].is_array());
        assert_eq!(count_rows(&pool, "items").await, 0);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_wrong_json_types_are_keyed_by_field(pool: PgPool) {
        let category = insert_category(&pool, "Casual").await;
        let server = test_server(pool.clone());

        let response = server
            .post("/api/items")
            .json(&json!({ "title": "x", "price": 39.99, "category_id": 999 }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert!(body["errors"]["category_id"].is_array());
        assert!(body["errors"].get("body").is_none());

        for (field, value) in [("rating", json!(7.5)), ("is_available", json!("yes"))] {
            let mut payload = json!({
                "title": "Tetris",
                "price": "4.99",
                "category_id": category.id,
            });
            payload[field] = value;

            let response = server.post("/api/items").json(&payload).await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            let body: Value = response.json();
            assert!(body["errors"][field].is_array(), "{field}: {body}");
        }

        assert_eq!(count_rows(&pool, "items").await, 0);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_update_only_availability(pool: PgPool) {
        let category = insert_category(&pool, "Platformer").await;
        let item = insert_item(&pool, category.id, "Celeste").await;
        let server = test_server(pool);
        let path = format!("/api/items/{}", item.id);

        let before: Value = server.get(&path).await.json();
        let after: Value = server
            .patch(&path)
            .json(&json!({ "is_available": false }))
            .await
            .json();

        assert_eq!(after["data"]["is_available"], false);
        for field in [
            "title",
            "description",
            "price",
            "release_date",
            "developer",
            "publisher",
            "rating",
            "category_id",
        ] {
            assert_eq!(before["data"][field], after["data"][field], "{field} changed");
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_update_moves_and_clears(pool: PgPool) {
        let from = insert_category(&pool, "Indie").await;
        let to = insert_category(&pool, "Roguelike").await;
        let item = insert_item(&pool, from.id, "Hades").await;
        let server = test_server(pool);
        let path = format!("/api/items/{}", item.id);

        let body: Value = server
            .put(&path)
            .json(&json!({ "category_id": to.id, "rating": null, "price": "24.50" }))
            .await
            .json();
        assert_eq!(body["data"]["category_id"], to.id.to_string());
        assert_eq!(body["data"]["category"]["name"], "Roguelike");
        assert_eq!(body["data"]["rating"], Value::Null);
        assert_eq!(body["data"]["price"], "24.50");

        let response = server
            .put(&path)
            .json(&json!({ "category_id": Uuid::new_v4() }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_list_returns_every_item_with_category(pool: PgPool) {
        let a = insert_category(&pool, "Shooter").await;
        let b = insert_category(&pool, "Sports").await;
        insert_item(&pool, a.id, "Halo").await;
        insert_item(&pool, a.id, "Doom").await;
        insert_item(&pool, b.id, "FIFA").await;
        let server = test_server(pool);

        let body: Value = server.get("/api/items").await.json();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert!(data.iter().all(|item| item["category"]["id"] == item["category_id"]));
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_zero_price_has_two_decimals(pool: PgPool) {
        let category = insert_category(&pool, "Free to play").await;
        let server = test_server(pool);

        let body: Value = server
            .post("/api/items")
            .json(&json!({ "title": "Dota", "price": 0, "category_id": category.id }))
            .await
            .json();
        assert_eq!(body["data"]["price"], "0.00");

        let body: Value = server.get("/api/items").await.json();
        assert_eq!(body["data"][0]["price"], "0.00");
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_unknown_item_id_is_not_found(pool: PgPool) {
        let server = test_server(pool);
        let missing = Uuid::new_v4();

        for response in [
            server.get(&format!("/api/items/{missing}")).await,
            server
                .put(&format!("/api/items/{missing}"))
                .json(&json!({ "title": "Ghost" }))
                .await,
            server
                .patch(&format!("/api/items/{missing}"))
                .json(&json!({ "is_available": false }))
                .await,
            server.get("/api/items/12345").await,
        ] {
            response.assert_status_not_found();
            let body: Value = response.json();
            assert_eq!(body["success"], false);
            assert!(body.get("data").is_none());
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_delete_item(pool: PgPool) {
        let category = insert_category(&pool, "Puzzle").await;
        let item = insert_item(&pool, category.id, "Portal").await;
        let server = test_server(pool.clone());
        let path = format!("/api/items/{}", item.id);

        server.delete(&path).await.assert_status_ok();
        assert_eq!(count_rows(&pool, "items").await, 0);
        assert_eq!(count_rows(&pool, "categories").await, 1);

        let response = server.delete(&path).await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["message"], "Item not found");
        assert!(body.get("data").is_none());
    }
}
