use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::prints::dtos::{CommentResponseDto, CreateCommentDto, LikeResponseDto};
use crate::features::prints::models::PrintComment;

/// Comment content after trimming; empty content is rejected upstream
fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Engagement engine: view counts, like toggles, comments.
///
/// These are the only counter mutation paths; counters are incremented and
/// decremented in place, never recomputed, so every write goes through here.
pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Increment the view counter for a visible item and return the new
    /// count. Missing or hidden items are a no-op (`None`); the detail
    /// handler resolves visibility before calling this.
    pub async fn record_view(&self, id: Uuid) -> Result<Option<i32>> {
        let count: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE print_items
            SET views_count = views_count + 1
            WHERE id = $1 AND status IN ('published', 'featured')
            RETURNING views_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record view: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(count)
    }

    /// Toggle the (item, user) like and return the new state.
    ///
    /// One transaction per toggle: the insert-or-nothing on the unique
    /// (print_item_id, user_id) key decides the direction, and the counter
    /// update is issued only for the write that actually affected a row, so
    /// concurrent toggles from the same user cannot double-count.
    pub async fn toggle_like(&self, id: Uuid, user_id: &str) -> Result<LikeResponseDto> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM print_items WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        if !exists {
            return Err(AppError::NotFound(format!("Print item {} not found", id)));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO print_likes (print_item_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (print_item_id, user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .rows_affected();

        let (liked, likes_count) = if inserted == 1 {
            let count: i32 = sqlx::query_scalar(
                "UPDATE print_items SET likes_count = likes_count + 1 \
                 WHERE id = $1 RETURNING likes_count",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
            (true, count)
        } else {
            let removed = sqlx::query(
                "DELETE FROM print_likes WHERE print_item_id = $1 AND user_id = $2",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .rows_affected();

            if removed == 1 {
                let count: i32 = sqlx::query_scalar(
                    "UPDATE print_items SET likes_count = GREATEST(likes_count - 1, 0) \
                     WHERE id = $1 RETURNING likes_count",
                )
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
                (false, count)
            } else {
                // A concurrent request removed the like between our insert
                // conflict and the delete; report the current state without
                // touching the counter.
                let count: i32 =
                    sqlx::query_scalar("SELECT likes_count FROM print_items WHERE id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(AppError::Database)?;
                (false, count)
            }
        };

        tx.commit().await.map_err(AppError::Database)?;

        tracing::debug!(
            "Like toggled: item={}, user={}, liked={}, count={}",
            id,
            user_id,
            liked,
            likes_count
        );

        Ok(LikeResponseDto { liked, likes_count })
    }

    /// Add a comment. Content that is empty after trimming is a validation
    /// error and nothing is persisted. Counters are untouched.
    pub async fn add_comment(
        &self,
        id: Uuid,
        author_id: &str,
        dto: CreateCommentDto,
    ) -> Result<CommentResponseDto> {
        let content = normalize_content(&dto.content)
            .ok_or_else(|| AppError::Validation("Comment cannot be empty".to_string()))?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM print_items WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !exists {
            return Err(AppError::NotFound(format!("Print item {} not found", id)));
        }

        let comment: PrintComment = sqlx::query_as(
            r#"
            INSERT INTO print_comments (print_item_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, print_item_id, author_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(&content)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        tracing::info!("Comment added: item={}, author={}", id, author_id);

        Ok(comment.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::prints::services::CatalogService;
    use crate::shared::test_helpers::{seed_category, seed_print_item};

    async fn like_records(pool: &PgPool, id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM print_likes WHERE print_item_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn toggle_like_round_trip(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let item = seed_print_item(&pool, category, "Benchy", "published").await;
        let service = EngagementService::new(pool.clone());

        let first = service.toggle_like(item, "user-1").await.unwrap();
        assert!(first.liked);
        assert_eq!(first.likes_count, 1);
        assert_eq!(like_records(&pool, item).await, 1);

        let second = service.toggle_like(item, "user-1").await.unwrap();
        assert!(!second.liked);
        assert_eq!(second.likes_count, 0);
        assert_eq!(like_records(&pool, item).await, 0);
    }

    #[sqlx::test]
    async fn toggle_like_missing_item_is_not_found(pool: PgPool) {
        let service = EngagementService::new(pool.clone());
        let result = service.toggle_like(Uuid::now_v7(), "user-1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test]
    async fn empty_comment_is_rejected_and_not_persisted(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let item = seed_print_item(&pool, category, "Benchy", "published").await;
        let service = EngagementService::new(pool.clone());

        let result = service
            .add_comment(
                item,
                "user-1",
                CreateCommentDto {
                    content: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM print_comments WHERE print_item_id = $1")
                .bind(item)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    async fn comment_is_persisted_and_listed_first(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let item = seed_print_item(&pool, category, "Benchy", "published").await;
        let service = EngagementService::new(pool.clone());

        let older = service
            .add_comment(
                item,
                "user-1",
                CreateCommentDto {
                    content: "first!".to_string(),
                },
            )
            .await
            .unwrap();

        // Push the earlier comment back so the ordering assertion does not
        // depend on sub-microsecond timestamp resolution.
        sqlx::query("UPDATE print_comments SET created_at = created_at - interval '1 hour' WHERE id = $1")
            .bind(older.id)
            .execute(&pool)
            .await
            .unwrap();

        let newest = service
            .add_comment(
                item,
                "user-2",
                CreateCommentDto {
                    content: "  nice print  ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(newest.content, "nice print");

        let detail = CatalogService::new(pool.clone())
            .get_detail(item, None)
            .await
            .unwrap();
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].id, newest.id);
        assert_eq!(detail.comments[1].id, older.id);
    }

    #[test]
    fn test_normalize_content_trims() {
        assert_eq!(normalize_content("  nice print  "), Some("nice print".to_string()));
        assert_eq!(normalize_content("ok"), Some("ok".to_string()));
    }

    #[test]
    fn test_normalize_content_rejects_whitespace_only() {
        assert_eq!(normalize_content(""), None);
        assert_eq!(normalize_content("   "), None);
        assert_eq!(normalize_content("\n\t "), None);
    }
}
