use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::features::items::dtos::ItemResponseDto;
use crate::features::items::models::Item;
use crate::shared::nullable;
use crate::shared::validation::{require, taken_message, FieldErrors};

/// Unique constraint on `categories.name`
const NAME_UNIQUE_CONSTRAINT: &str = "categories_name_key";

/// Convert database error to a field error where the engine enforced a rule
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // A concurrent insert can win the race between our uniqueness check and
        // this statement; report it the same way the check would have.
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505"))
            && db_err.constraint() == Some(NAME_UNIQUE_CONSTRAINT)
        {
            return AppError::Validation(FieldErrors::single("name", taken_message("name")));
        }
    }

    tracing::error!("Category query failed: {:?}", e);
    AppError::Database(e)
}

fn not_found(id: Uuid) -> AppError {
    tracing::debug!("Category {} not found", id);
    AppError::NotFound("Category not found".to_string())
}

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every category with its items attached
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as!(
            Category,
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM categories
            ORDER BY created_at, id
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)?;

        let ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
        let mut items_by_category = self.items_for(&ids).await?;

        Ok(categories
            .into_iter()
            .map(|c| {
                let items = items_by_category.remove(&c.id).unwrap_or_default();
                CategoryResponseDto::from(c).with_items(items)
            })
            .collect())
    }

    /// Get category by id with its items attached
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let category = self.find(id).await?.ok_or_else(|| not_found(id))?;
        let items = self
            .items_for(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(CategoryResponseDto::from(category).with_items(items))
    }

    /// Create a new category
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let dto = dto.normalized();
        let mut errors = FieldErrors::from_result(dto.validate());
        if let Some(name) = dto.name.as_deref() {
            if !errors.has("name") && self.name_taken(name, None).await? {
                errors.add("name", taken_message("name"));
            }
        }
        errors.into_result()?;

        let name = require("name", dto.name)?;
        let category = sqlx::query_as!(
            Category,
            r#"
            INSERT INTO categories (name, description, is_active)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
            name,
            dto.description,
            dto.is_active
        )
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);

        Ok(category.into())
    }

    /// Apply the supplied fields to an existing category
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        if self.find(id).await?.is_none() {
            return Err(not_found(id));
        }

        let dto = dto.normalized();
        let mut errors = FieldErrors::from_result(dto.validate());
        if let Some(name) = dto.name.as_deref() {
            if !errors.has("name") && self.name_taken(name, Some(id)).await? {
                errors.add("name", taken_message("name"));
            }
        }
        errors.into_result()?;

        let (set_description, description) = nullable::split(dto.description);
        let category = sqlx::query_as!(
            Category,
            r#"
            UPDATE categories
            SET name = COALESCE($1, name),
                description = CASE WHEN $2 THEN $3 ELSE description END,
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
            dto.name,
            set_description,
            description,
            dto.is_active,
            id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)?
        .ok_or_else(|| not_found(id))?;

        tracing::info!("Category updated: id={}", category.id);

        Ok(category.into())
    }

    /// Delete a category; its items are removed by the foreign key cascade
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query!("DELETE FROM categories WHERE id = $1", id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as!(
            Category,
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    /// Exact (case-sensitive) name match, optionally ignoring one record
    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        sqlx::query_scalar!(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)
            ) as "taken!"
            "#,
            name,
            exclude
        )
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    /// Load the items of the given categories, grouped by category id
    async fn items_for(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<ItemResponseDto>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = sqlx::query_as!(
            Item,
            r#"
            SELECT id, title, description, price, release_date, developer, publisher,
                   rating, is_available, category_id, created_at, updated_at
            FROM items
            WHERE category_id = ANY($1)
            ORDER BY created_at, id
            "#,
            ids
        )
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)?;

        let mut grouped: HashMap<Uuid, Vec<ItemResponseDto>> = HashMap::new();
        for item in items {
            grouped
                .entry(item.category_id)
                .or_default()
                .push(item.into());
        }
        Ok(grouped)
    }
}
