use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::items::dtos::{CreateItemDto, ItemResponseDto, UpdateItemDto};
use crate::features::items::services::ItemService;
use crate::shared::types::ApiResponse;

/// List all items with their category
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "List of items", body = ApiResponse<Vec<ItemResponseDto>>),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "items"
)]
pub async fn list_items(
    State(service): State<Arc<ItemService>>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let items = service.list().await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        "Items retrieved successfully",
    )))
}

/// Create an item
#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemDto,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<ItemResponseDto>),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "items"
)]
pub async fn create_item(
    State(service): State<Arc<ItemService>>,
    AppJson(dto): AppJson<CreateItemDto>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponseDto>>)> {
    let item = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), "Item created successfully")),
    ))
}

/// Get an item by id
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn get_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        "Item retrieved successfully",
    )))
}

/// Update an item (partial, also served on PATCH)
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemDto,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "items"
)]
pub async fn update_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateItemDto>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        "Item updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(service): State<Arc<ItemService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(None, "Item deleted successfully")))
}
