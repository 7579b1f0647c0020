use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::features::items::dtos::{CreateItemDto, ItemResponseDto, UpdateItemDto};
use crate::features::items::models::Item;
use crate::shared::constants::PRICE_SCALE;
use crate::shared::nullable;
use crate::shared::validation::{invalid_selection_message, require, FieldErrors};

/// Foreign key `items.category_id -> categories.id`
const CATEGORY_FOREIGN_KEY: &str = "items_category_id_fkey";

/// Convert database error to a field error where the engine enforced a rule
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // The category was deleted between the existence check and the write
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503"))
            && db_err.constraint() == Some(CATEGORY_FOREIGN_KEY)
        {
            return AppError::Validation(FieldErrors::single(
                "category_id",
                invalid_selection_message("category_id"),
            ));
        }
    }

    tracing::error!("Item query failed: {:?}", e);
    AppError::Database(e)
}

fn not_found(id: Uuid) -> AppError {
    tracing::debug!("Item {} not found", id);
    AppError::NotFound("Item not found".to_string())
}

/// Service for item operations
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every item with its owning category attached
    pub async fn list(&self) -> Result<Vec<ItemResponseDto>> {
        let items = sqlx::query_as!(
            Item,
            r#"
            SELECT id, title, description, price, release_date, developer, publisher,
                   rating, is_available, category_id, created_at, updated_at
            FROM items
            ORDER BY created_at, id
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)?;

        self.attach_categories(items).await
    }

    /// Get item by id with its category attached
    pub async fn get_by_id(&self, id: Uuid) -> Result<ItemResponseDto> {
        let item = self.find(id).await?.ok_or_else(|| not_found(id))?;
        self.attach_category(item).await
    }

    /// Create a new item under an existing category
    pub async fn create(&self, dto: CreateItemDto) -> Result<ItemResponseDto> {
        let dto = dto.normalized();
        let mut errors = FieldErrors::from_result(dto.validate());
        self.check_category(dto.category_id, &mut errors).await?;
        errors.into_result()?;

        let title = require("title", dto.title)?;
        let price = require("price", dto.price)?.round_dp(PRICE_SCALE);
        let category_id = require("category_id", dto.category_id)?;

        let item = sqlx::query_as!(
            Item,
            r#"
            INSERT INTO items (
                title, description, price, release_date, developer, publisher,
                rating, is_available, category_id
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, COALESCE($8, TRUE), $9
            )
            RETURNING id, title, description, price, release_date, developer, publisher,
                   rating, is_available, category_id, created_at, updated_at
            "#,
            title,
            dto.description,
            price,
            dto.release_date,
            dto.developer,
            dto.publisher,
            dto.rating,
            dto.is_available,
            category_id
        )
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        tracing::info!(
            "Item created: id={}, category_id={}",
            item.id,
            item.category_id
        );

        self.attach_category(item).await
    }

    /// Apply the supplied fields to an existing item
    pub async fn update(&self, id: Uuid, dto: UpdateItemDto) -> Result<ItemResponseDto> {
        if self.find(id).await?.is_none() {
            return Err(not_found(id));
        }

        let dto = dto.normalized();
        let mut errors = FieldErrors::from_result(dto.validate());
        self.check_category(dto.category_id, &mut errors).await?;
        errors.into_result()?;

        let (set_description, description) = nullable::split(dto.description);
        let (set_release_date, release_date) = nullable::split(dto.release_date);
        let (set_developer, developer) = nullable::split(dto.developer);
        let (set_publisher, publisher) = nullable::split(dto.publisher);
        let (set_rating, rating) = nullable::split(dto.rating);

        let price = dto.price.map(|p| p.round_dp(PRICE_SCALE));
        let item = sqlx::query_as!(
            Item,
            r#"
            UPDATE items
            SET title = COALESCE($1, title),
                description = CASE WHEN $2 THEN $3 ELSE description END,
                price = COALESCE($4, price),
                release_date = CASE WHEN $5 THEN $6 ELSE release_date END,
                developer = CASE WHEN $7 THEN $8 ELSE developer END,
                publisher = CASE WHEN $9 THEN $10 ELSE publisher END,
                rating = CASE WHEN $11 THEN $12 ELSE rating END,
                is_available = COALESCE($13, is_available),
                category_id = COALESCE($14, category_id),
                updated_at = NOW()
            WHERE id = $15
            RETURNING id, title, description, price, release_date, developer, publisher,
                   rating, is_available, category_id, created_at, updated_at
            "#,
            dto.title,
            set_description,
            description,
            price,
            set_release_date,
            release_date,
            set_developer,
            developer,
            set_publisher,
            publisher,
            set_rating,
            rating,
            dto.is_available,
            dto.category_id,
            id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)?
        .ok_or_else(|| not_found(id))?;

        tracing::info!("Item updated: id={}", item.id);

        self.attach_category(item).await
    }

    /// Delete an item
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query!("DELETE FROM items WHERE id = $1", id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::info!("Item deleted: id={}", id);

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Item>> {
        sqlx::query_as!(
            Item,
            r#"
            SELECT id, title, description, price, release_date, developer, publisher,
                   rating, is_available, category_id, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
            id
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(handle_db_error)
    }

    /// Add a `category_id` error when a supplied id names no category
    async fn check_category(
        &self,
        category_id: Option<Uuid>,
        errors: &mut FieldErrors,
    ) -> Result<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        if errors.has("category_id") {
            return Ok(());
        }

        let exists = sqlx::query_scalar!(
            r#"SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1) as "exists!""#,
            category_id
        )
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)?;

        if !exists {
            errors.add("category_id", invalid_selection_message("category_id"));
        }
        Ok(())
    }

    async fn attach_category(&self, item: Item) -> Result<ItemResponseDto> {
        self.attach_categories(vec![item])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Item vanished while loading its category".into()))
    }

    /// Load the owning categories in one query and attach them to the items
    async fn attach_categories(&self, items: Vec<Item>) -> Result<Vec<ItemResponseDto>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<Uuid> = items.iter().map(|i| i.category_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let categories = sqlx::query_as!(
            Category,
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM categories
            WHERE id = ANY($1)
            "#,
            &ids[..]
        )
        .fetch_all(&self.pool)
        .await
        .map_err(handle_db_error)?;

        let categories: HashMap<Uuid, CategoryResponseDto> = categories
            .into_iter()
            .map(|c| (c.id, CategoryResponseDto::from(c)))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let category = categories.get(&item.category_id).cloned();
                let dto = ItemResponseDto::from(item);
                match category {
                    Some(category) => dto.with_category(category),
                    None => dto,
                }
            })
            .collect())
    }
}
