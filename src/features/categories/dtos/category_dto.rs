use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::features::items::dtos::ItemResponseDto;
use crate::shared::validation::{not_blank, trimmed};

/// Request DTO for creating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    /// Unique category name
    #[validate(required, custom(function = "not_blank"), length(max = 255))]
    #[schema(example = "Action")]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Defaults to true
    pub is_active: Option<bool>,
}

impl CreateCategoryDto {
    /// Trim the name before it is validated or compared for uniqueness
    pub fn normalized(mut self) -> Self {
        self.name = trimmed(self.name);
        self
    }
}

/// Request DTO for a partial category update.
///
/// Absent keys keep their stored value; `"description": null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "crate::shared::nullable::double_option"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    pub is_active: Option<bool>,
}

impl UpdateCategoryDto {
    pub fn normalized(mut self) -> Self {
        self.name = trimmed(self.name);
        self
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present on list and read-one responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ItemResponseDto>>,
}

impl CategoryResponseDto {
    pub fn with_items(mut self, items: Vec<ItemResponseDto>) -> Self {
        self.items = Some(items);
        self
    }
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
            items: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::FieldErrors;

    #[test]
    fn test_create_requires_name() {
        let dto: CreateCategoryDto = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        let errors = FieldErrors::from_result(dto.validate());
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_create_rejects_long_name() {
        let dto = CreateCategoryDto {
            name: Some("a".repeat(256)),
            ..Default::default()
        };
        assert!(FieldErrors::from_result(dto.validate()).has("name"));

        let dto = CreateCategoryDto {
            name: Some("a".repeat(255)),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_allows_empty_body() {
        let dto: UpdateCategoryDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.name.is_none());
        assert!(dto.description.is_none());
    }

    #[test]
    fn test_update_rejects_blank_name() {
        let dto: UpdateCategoryDto = serde_json::from_str(r#"{"name": " "}"#).unwrap();
        assert!(FieldErrors::from_result(dto.validate()).has("name"));
    }

    #[test]
    fn test_normalized_trims_name() {
        let dto: CreateCategoryDto = serde_json::from_str(r#"{"name": "  Arcade "}"#).unwrap();
        assert_eq!(dto.normalized().name.as_deref(), Some("Arcade"));

        let dto: UpdateCategoryDto = serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        let dto = dto.normalized();
        assert_eq!(dto.name.as_deref(), Some(""));
        assert!(FieldErrors::from_result(dto.validate()).has("name"));
    }

    #[test]
    fn test_update_null_description_clears() {
        let dto: UpdateCategoryDto = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(dto.description, Some(None));
    }

    #[test]
    fn test_response_omits_items_unless_attached() {
        let now = Utc::now();
        let dto = CategoryResponseDto::from(Category {
            id: Uuid::new_v4(),
            name: "RPG".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        });

        let plain = serde_json::to_value(&dto).unwrap();
        assert!(plain.get("items").is_none());

        let attached = serde_json::to_value(dto.with_items(Vec::new())).unwrap();
        assert_eq!(attached["items"], serde_json::json!([]));
    }
}
