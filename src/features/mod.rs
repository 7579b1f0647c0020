pub mod categories;
pub mod items;

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::core::error::AppError;
use categories::{routes as categories_routes, CategoryService};
use items::{routes as items_routes, ItemService};

/// Every `/api` route, with unmatched paths answered by a 404 envelope
pub fn api_router(pool: PgPool) -> Router {
    let category_service = Arc::new(CategoryService::new(pool.clone()));
    tracing::info!("Category service initialized");

    let item_service = Arc::new(ItemService::new(pool));
    tracing::info!("Item service initialized");

    Router::new()
        .merge(categories_routes::routes(category_service))
        .merge(items_routes::routes(item_service))
        .fallback(route_not_found)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}
