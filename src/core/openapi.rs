use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::items::{dtos as items_dtos, handlers as items_handlers};
use crate::shared::types::ApiResponse;
use crate::shared::validation::FieldErrors;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::create_category,
        categories_handlers::get_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Items
        items_handlers::list_items,
        items_handlers::create_item,
        items_handlers::get_item,
        items_handlers::update_item,
        items_handlers::delete_item,
    ),
    components(
        schemas(
            FieldErrors,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Items
            items_dtos::CreateItemDto,
            items_dtos::UpdateItemDto,
            items_dtos::ItemResponseDto,
            ApiResponse<items_dtos::ItemResponseDto>,
            ApiResponse<Vec<items_dtos::ItemResponseDto>>,
        )
    ),
    tags(
        (name = "categories", description = "Item categories; deleting one removes its items"),
        (name = "items", description = "Catalog items"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "CRUD API for categories and their items",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
