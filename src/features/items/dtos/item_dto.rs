use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::items::models::Item;
use crate::shared::constants::PRICE_SCALE;
use crate::shared::validation::{not_blank, trimmed, validate_price};

/// Request DTO for creating an item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemDto {
    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "The Last Adventure")]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Decimal in [0, 999999.99]; accepts a JSON number or string
    #[validate(required, custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "59.99")]
    pub price: Option<Decimal>,

    /// `YYYY-MM-DD`
    pub release_date: Option<NaiveDate>,

    #[validate(length(max = 255))]
    pub developer: Option<String>,

    #[validate(length(max = 255))]
    pub publisher: Option<String>,

    #[validate(range(min = 1, max = 10))]
    pub rating: Option<i32>,

    /// Defaults to true
    pub is_available: Option<bool>,

    /// Must reference an existing category
    #[validate(required)]
    pub category_id: Option<Uuid>,
}

impl CreateItemDto {
    /// Trim single-line text fields before validation
    pub fn normalized(mut self) -> Self {
        self.title = trimmed(self.title);
        self.developer = trimmed(self.developer);
        self.publisher = trimmed(self.publisher);
        self
    }
}

/// Request DTO for a partial item update.
///
/// Absent keys keep their stored value. Nullable columns (description,
/// release_date, developer, publisher, rating) are cleared by an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItemDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "crate::shared::nullable::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "49.99")]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "crate::shared::nullable::double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub release_date: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "crate::shared::nullable::double_option")]
    #[validate(length(max = 255))]
    #[schema(value_type = Option<String>)]
    pub developer: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::shared::nullable::double_option")]
    #[validate(length(max = 255))]
    #[schema(value_type = Option<String>)]
    pub publisher: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::shared::nullable::double_option")]
    #[validate(range(min = 1, max = 10))]
    #[schema(value_type = Option<i32>)]
    pub rating: Option<Option<i32>>,

    pub is_available: Option<bool>,

    pub category_id: Option<Uuid>,
}

impl UpdateItemDto {
    pub fn normalized(mut self) -> Self {
        self.title = trimmed(self.title);
        self.developer = self.developer.map(trimmed);
        self.publisher = self.publisher.map(trimmed);
        self
    }
}

/// Response DTO for item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct ItemResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Serialized as a string with two decimals, e.g. "59.99"
    #[schema(value_type = String, example = "59.99")]
    pub price: Decimal,
    pub release_date: Option<NaiveDate>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub rating: Option<i32>,
    pub is_available: bool,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning category; present on every item endpoint except when nested in a category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Box<CategoryResponseDto>>,
}

impl ItemResponseDto {
    pub fn with_category(mut self, category: CategoryResponseDto) -> Self {
        self.category = Some(Box::new(category));
        self
    }
}

impl From<Item> for ItemResponseDto {
    fn from(i: Item) -> Self {
        // NUMERIC zero comes back without its scale
        let mut price = i.price;
        price.rescale(PRICE_SCALE);

        Self {
            id: i.id,
            title: i.title,
            description: i.description,
            price,
            release_date: i.release_date,
            developer: i.developer,
            publisher: i.publisher,
            rating: i.rating,
            is_available: i.is_available,
            category_id: i.category_id,
            created_at: i.created_at,
            updated_at: i.updated_at,
            category: None,
        }
    }
}
