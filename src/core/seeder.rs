//! Demo data for an empty database.
//!
//! Rows are created through the resource services, so seeded data passes the
//! same validation as API input.

use chrono::{Duration, NaiveDate, Utc};
use fake::faker::boolean::en::Boolean;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::config::SeedConfig;
use crate::core::error::Result;
use crate::features::categories::dtos::CreateCategoryDto;
use crate::features::categories::CategoryService;
use crate::features::items::dtos::CreateItemDto;
use crate::features::items::ItemService;

const GENRES: [&str; 10] = [
    "Action",
    "Adventure",
    "RPG",
    "Strategy",
    "Simulation",
    "Sports",
    "Racing",
    "Puzzle",
    "Horror",
    "Platformer",
];

const TITLES: [&str; 10] = [
    "The Last Adventure",
    "Dragon Quest Chronicles",
    "Space Warriors",
    "Racing Legends",
    "Fantasy Kingdom",
    "Battle Royale Arena",
    "Mystery Island",
    "Cyber Revolution",
    "Ancient Legends",
    "Storm Riders",
];

/// Price range in cents: 9.99..=69.99
const MIN_PRICE_CENTS: i64 = 999;
const MAX_PRICE_CENTS: i64 = 6999;

const RELEASE_WINDOW_DAYS: i64 = 5 * 365;

/// Insert demo categories and items when enabled and no category exists yet.
///
/// Returns the number of categories created.
pub async fn seed_if_empty(pool: &PgPool, config: &SeedConfig) -> Result<usize> {
    if !config.enabled {
        return Ok(0);
    }

    let populated =
        sqlx::query_scalar!(r#"SELECT EXISTS(SELECT 1 FROM categories) as "populated!""#)
            .fetch_one(pool)
            .await?;
    if populated {
        tracing::info!("Seeding skipped: categories table is not empty");
        return Ok(0);
    }

    if config.category_count > GENRES.len() {
        tracing::warn!(
            "SEED_CATEGORY_COUNT={} exceeds the {} available genres, capping",
            config.category_count,
            GENRES.len()
        );
    }

    let categories = CategoryService::new(pool.clone());
    let items = ItemService::new(pool.clone());

    let names = genre_names(config.category_count);
    for name in &names {
        let category = categories.create(fake_category(name)).await?;
        for _ in 0..config.items_per_category {
            items.create(fake_item(category.id)).await?;
        }
    }

    tracing::info!(
        "Seeded {} categories with {} items each",
        names.len(),
        config.items_per_category
    );

    Ok(names.len())
}

/// Up to `count` distinct genre names, starting at a random offset
fn genre_names(count: usize) -> Vec<&'static str> {
    let start: usize = (0..GENRES.len()).fake();
    GENRES
        .iter()
        .cycle()
        .skip(start)
        .take(count.min(GENRES.len()))
        .copied()
        .collect()
}

fn fake_category(name: &str) -> CreateCategoryDto {
    CreateCategoryDto {
        name: Some(name.to_string()),
        description: Some(Sentence(10..16).fake()),
        is_active: Some(Boolean(90).fake()),
    }
}

fn fake_item(category_id: uuid::Uuid) -> CreateItemDto {
    let title = TITLES[(0..TITLES.len()).fake::<usize>()];
    let number: u8 = (1..=10).fake();
    let cents: i64 = (MIN_PRICE_CENTS..=MAX_PRICE_CENTS).fake();

    CreateItemDto {
        title: Some(format!("{} {}", title, number)),
        description: Some(Paragraph(3..4).fake()),
        price: Some(Decimal::new(cents, 2)),
        release_date: Some(fake_release_date()),
        developer: Some(CompanyName().fake()),
        publisher: Some(CompanyName().fake()),
        rating: Some((1..=10).fake()),
        is_available: Some(Boolean(85).fake()),
        category_id: Some(category_id),
    }
}

fn fake_release_date() -> NaiveDate {
    let days_ago: i64 = (0..=RELEASE_WINDOW_DAYS).fake();
    Utc::now().date_naive() - Duration::days(days_ago)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_genre_names_are_unique_and_capped() {
        let names = genre_names(4);
        assert_eq!(names.len(), 4);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 4);

        let all = genre_names(25);
        assert_eq!(all.len(), GENRES.len());
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), GENRES.len());
    }

    #[test]
    fn test_fake_category_passes_validation() {
        for name in GENRES {
            assert!(fake_category(name).validate().is_ok());
        }
    }

    #[test]
    fn test_fake_items_pass_validation_and_stay_in_range() {
        let category_id = uuid::Uuid::new_v4();
        let today = Utc::now().date_naive();
        let min_price = Decimal::new(MIN_PRICE_CENTS, 2);
        let max_price = Decimal::new(MAX_PRICE_CENTS, 2);

        for _ in 0..50 {
            let item = fake_item(category_id);
            assert!(item.validate().is_ok(), "{:?}", item);

            let price = item.price.unwrap();
            assert!(price >= min_price && price <= max_price);

            let rating = item.rating.unwrap();
            assert!((1..=10).contains(&rating));

            let released = item.release_date.unwrap();
            assert!(released <= today);
            assert!(released >= today - Duration::days(RELEASE_WINDOW_DAYS));
        }
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_seed_only_runs_on_empty_database(pool: PgPool) {
        let config = SeedConfig {
            enabled: true,
            category_count: 3,
            items_per_category: 2,
        };

        assert_eq!(seed_if_empty(&pool, &config).await.unwrap(), 3);
        assert_eq!(seed_if_empty(&pool, &config).await.unwrap(), 0);

        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 6);
    }

    #[sqlx::test(migrator = "crate::core::database::MIGRATOR")]
    #[ignore = "requires Postgres (set DATABASE_URL)"]
    async fn test_seed_disabled_is_noop(pool: PgPool) {
        let config = SeedConfig {
            enabled: false,
            category_count: 3,
            items_per_category: 2,
        };
        assert_eq!(seed_if_empty(&pool, &config).await.unwrap(), 0);
    }
}
