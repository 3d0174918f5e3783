use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{CategoryResponseDto, CreateCategoryDto};
use crate::features::categories::models::{Category, CategoryWithCount};

/// Service for category catalog operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories with their item counts, ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r#"
            SELECT c.id, c.name, c.slug, c.description, c.created_at,
                   COUNT(p.id) AS print_count
            FROM categories c
            LEFT JOIN print_items p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, description, created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Create a category. Duplicate name or slug is a conflict.
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description, created_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.slug)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_write(e, "A category with this name or slug already exists")
        })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }

    /// Delete a category. Owned print items and their images, comments,
    /// and likes go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seed_category, seed_print_item};
    use sqlx::PgPool;

    async fn count(pool: &PgPool, sql: &str, id: Uuid) -> i64 {
        sqlx::query_scalar(sql)
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn delete_cascades_to_owned_item_tree(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let item = seed_print_item(&pool, category, "Benchy", "published").await;

        sqlx::query(
            "INSERT INTO print_images (print_item_id, image_url) VALUES ($1, 'http://img/1')",
        )
        .bind(item)
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO print_comments (print_item_id, author_id, content) VALUES ($1, 'u', 'hi')",
        )
        .bind(item)
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO print_likes (print_item_id, user_id) VALUES ($1, 'u')")
            .bind(item)
            .execute(&pool)
            .await
            .unwrap();

        CategoryService::new(pool.clone())
            .delete(category)
            .await
            .unwrap();

        let items = count(
            &pool,
            "SELECT COUNT(*) FROM print_items WHERE category_id = $1",
            category,
        )
        .await;
        assert_eq!(items, 0);

        for sql in [
            "SELECT COUNT(*) FROM print_images WHERE print_item_id = $1",
            "SELECT COUNT(*) FROM print_comments WHERE print_item_id = $1",
            "SELECT COUNT(*) FROM print_likes WHERE print_item_id = $1",
        ] {
            assert_eq!(count(&pool, sql, item).await, 0);
        }
    }

    #[sqlx::test]
    async fn delete_missing_category_is_not_found(pool: PgPool) {
        let result = CategoryService::new(pool.clone())
            .delete(Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
