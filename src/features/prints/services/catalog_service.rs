use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::{Category, CategoryWithCount};
use crate::features::prints::dtos::{
    AddImageDto, CreatePrintDto, HomeResponseDto, PrintDetailDto, PrintImageDto, PrintListQuery,
    PrintSummaryDto, UpdateStatusDto,
};
use crate::features::prints::models::{
    Difficulty, PrintComment, PrintImage, PrintItem, PrintItemSummary, PrintStatus,
};
use crate::shared::constants::{
    HOME_CATEGORIES_LIMIT, HOME_FEATURED_LIMIT, HOME_RECENT_LIMIT, PRINTS_PAGE_SIZE,
    RELATED_PRINTS_LIMIT,
};
use crate::shared::types::PageMeta;

const SUMMARY_COLUMNS: &str = "p.id, p.title, p.description, p.author_id, p.difficulty, \
     p.status, p.main_image_url, p.views_count, p.likes_count, p.created_at, \
     c.name AS category_name, c.slug AS category_slug";

const ITEM_COLUMNS: &str = "id, title, description, category_id, author_id, difficulty, \
     print_time_hours, filament_type, filament_amount_grams, layer_height, infill_percentage, \
     main_image_url, model_file_url, status, views_count, likes_count, downloads_count, \
     created_at, updated_at, published_at";

/// Resolved listing filters with their SQL placeholders.
///
/// Only published items enter the base set; search is a case-insensitive
/// substring match across title, description, and category name, while
/// category and difficulty are exact matches. Placeholders are numbered in
/// the order the values are later bound: search, category, difficulty.
#[derive(Debug, Default)]
struct ListFilters {
    search_pattern: Option<String>,
    category_slug: Option<String>,
    difficulty: Option<Difficulty>,
}

impl ListFilters {
    fn from_query(params: &PrintListQuery) -> Self {
        Self {
            search_pattern: params
                .search
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| format!("%{}%", s)),
            category_slug: params.category.clone().filter(|s| !s.is_empty()),
            difficulty: params.difficulty_filter(),
        }
    }

    /// WHERE clause with numbered placeholders; `next_placeholder` is the
    /// index for the first bind after the filters (LIMIT/OFFSET).
    fn where_clause(&self) -> (String, usize) {
        let mut conditions = vec!["p.status = 'published'".to_string()];
        let mut next = 1;

        if self.search_pattern.is_some() {
            conditions.push(format!(
                "(p.title ILIKE ${n} OR p.description ILIKE ${n} OR c.name ILIKE ${n})",
                n = next
            ));
            next += 1;
        }
        if self.category_slug.is_some() {
            conditions.push(format!("c.slug = ${}", next));
            next += 1;
        }
        if self.difficulty.is_some() {
            conditions.push(format!("p.difficulty = ${}", next));
            next += 1;
        }

        (format!("WHERE {}", conditions.join(" AND ")), next)
    }
}

/// Catalog store and query/filter engine for print items
pub struct CatalogService {
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Filtered, sorted, paginated listing of published items.
    ///
    /// Bad query parameters never fail the request: unknown sort keys fall
    /// back to newest-first and out-of-range pages clamp to the last page.
    pub async fn list(
        &self,
        params: &PrintListQuery,
    ) -> Result<(Vec<PrintSummaryDto>, PageMeta, i64)> {
        let filters = ListFilters::from_query(params);
        let (where_clause, next_placeholder) = filters.where_clause();

        let count_sql = format!(
            "SELECT COUNT(*) FROM print_items p JOIN categories c ON c.id = p.category_id {}",
            where_clause
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref pattern) = filters.search_pattern {
            count_query = count_query.bind(pattern);
        }
        if let Some(ref slug) = filters.category_slug {
            count_query = count_query.bind(slug);
        }
        if let Some(difficulty) = filters.difficulty {
            count_query = count_query.bind(difficulty);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count print listing: {:?}", e);
            AppError::Database(e)
        })?;

        let page = PageMeta::clamped(params.requested_page(), total, PRINTS_PAGE_SIZE);

        let list_sql = format!(
            "SELECT {} FROM print_items p JOIN categories c ON c.id = p.category_id \
             {} ORDER BY {} LIMIT ${} OFFSET ${}",
            SUMMARY_COLUMNS,
            where_clause,
            params.sort_key().order_by_sql(),
            next_placeholder,
            next_placeholder + 1
        );

        let mut list_query = sqlx::query_as::<_, PrintItemSummary>(&list_sql);
        if let Some(ref pattern) = filters.search_pattern {
            list_query = list_query.bind(pattern);
        }
        if let Some(ref slug) = filters.category_slug {
            list_query = list_query.bind(slug);
        }
        if let Some(difficulty) = filters.difficulty {
            list_query = list_query.bind(difficulty);
        }
        let items: Vec<PrintItemSummary> = list_query
            .bind(page.page_size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch print listing: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items.into_iter().map(Into::into).collect(), page, total))
    }

    /// Home view: featured picks, recent published items, top categories
    pub async fn home(&self) -> Result<HomeResponseDto> {
        let featured = self
            .fetch_summaries_by_status(PrintStatus::Featured, HOME_FEATURED_LIMIT)
            .await?;
        let recent = self
            .fetch_summaries_by_status(PrintStatus::Published, HOME_RECENT_LIMIT)
            .await?;

        let categories: Vec<CategoryWithCount> = sqlx::query_as(
            r#"
            SELECT c.id, c.name, c.slug, c.description, c.created_at,
                   COUNT(p.id) AS print_count
            FROM categories c
            LEFT JOIN print_items p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY COUNT(p.id) DESC, c.name
            LIMIT $1
            "#,
        )
        .bind(HOME_CATEGORIES_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch home categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(HomeResponseDto {
            featured_prints: featured,
            recent_prints: recent,
            categories: categories.into_iter().map(Into::into).collect(),
        })
    }

    async fn fetch_summaries_by_status(
        &self,
        status: PrintStatus,
        limit: i64,
    ) -> Result<Vec<PrintSummaryDto>> {
        let sql = format!(
            "SELECT {} FROM print_items p JOIN categories c ON c.id = p.category_id \
             WHERE p.status = $1 ORDER BY p.created_at DESC LIMIT $2",
            SUMMARY_COLUMNS
        );

        let items: Vec<PrintItemSummary> = sqlx::query_as(&sql)
            .bind(status)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch {} prints: {:?}", status, e);
                AppError::Database(e)
            })?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Category detail: the category plus a page of its published items,
    /// newest first. Unknown slugs are NotFound.
    pub async fn category_prints(
        &self,
        slug: &str,
        page: Option<i64>,
    ) -> Result<(CategoryResponseDto, Vec<PrintSummaryDto>, PageMeta, i64)> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;

        let params = PrintListQuery {
            category: Some(slug.to_string()),
            page,
            ..Default::default()
        };
        let (items, page_meta, total) = self.list(&params).await?;

        Ok((category.into(), items, page_meta, total))
    }

    /// Read-only detail fetch for a visible item. Missing ids and drafts are
    /// NotFound; the view counter is a separate engagement step.
    pub async fn get_detail(&self, id: Uuid, viewer: Option<&str>) -> Result<PrintDetailDto> {
        let item = self.fetch_visible_item(id).await?;

        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE id = $1",
        )
        .bind(item.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let images: Vec<PrintImage> = sqlx::query_as(
            r#"
            SELECT id, print_item_id, image_url, caption, display_order
            FROM print_images
            WHERE print_item_id = $1
            ORDER BY display_order
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let comments: Vec<PrintComment> = sqlx::query_as(
            r#"
            SELECT id, print_item_id, author_id, content, created_at, updated_at
            FROM print_comments
            WHERE print_item_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let related_sql = format!(
            "SELECT {} FROM print_items p JOIN categories c ON c.id = p.category_id \
             WHERE p.category_id = $1 AND p.status = 'published' AND p.id <> $2 \
             ORDER BY p.created_at DESC LIMIT $3",
            SUMMARY_COLUMNS
        );
        let related: Vec<PrintItemSummary> = sqlx::query_as(&related_sql)
            .bind(item.category_id)
            .bind(id)
            .bind(RELATED_PRINTS_LIMIT)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let user_liked = match viewer {
            Some(user_id) => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM print_likes WHERE print_item_id = $1 AND user_id = $2)",
            )
            .bind(id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?,
            None => false,
        };

        Ok(PrintDetailDto::from_parts(
            item,
            category.into(),
            images,
            comments,
            related,
            user_liked,
        ))
    }

    async fn fetch_visible_item(&self, id: Uuid) -> Result<PrintItem> {
        let item = sqlx::query_as::<_, PrintItem>(&format!(
            "SELECT {} FROM print_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        match item {
            Some(item) if item.status.is_visible() => Ok(item),
            // Drafts are hidden from the public surface, indistinguishable
            // from missing items.
            _ => Err(AppError::NotFound(format!("Print item {} not found", id))),
        }
    }

    /// Create a draft print item owned by `author_id`.
    pub async fn create(&self, author_id: &str, dto: CreatePrintDto) -> Result<PrintDetailDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE id = $1",
        )
        .bind(dto.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", dto.category_id)))?;

        let sql = format!(
            r#"
            INSERT INTO print_items
                (title, description, category_id, author_id, difficulty,
                 print_time_hours, filament_type, filament_amount_grams,
                 layer_height, infill_percentage, main_image_url, model_file_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let item: PrintItem = sqlx::query_as(&sql)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.category_id)
            .bind(author_id)
            .bind(dto.difficulty.unwrap_or(Difficulty::Beginner))
            .bind(dto.print_time_hours)
            .bind(dto.filament_type.as_deref().unwrap_or("PLA"))
            .bind(dto.filament_amount_grams)
            // 0.20mm default layer height
            .bind(dto.layer_height.unwrap_or_else(|| Decimal::new(20, 2)))
            .bind(dto.infill_percentage.unwrap_or(20))
            .bind(&dto.main_image_url)
            .bind(&dto.model_file_url)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        tracing::info!(
            "Print item created: id={}, author={}, title={}",
            item.id,
            item.author_id,
            item.title
        );

        Ok(PrintDetailDto::from_parts(
            item,
            category.into(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            false,
        ))
    }

    /// Delete an item; images, comments, and likes cascade with it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM print_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Print item {} not found", id)));
        }

        tracing::info!("Print item deleted: id={}", id);

        Ok(())
    }

    /// Apply a lifecycle transition. The update is conditional on the status
    /// we validated against, so concurrent transitions conflict instead of
    /// silently overwriting each other.
    pub async fn set_status(&self, id: Uuid, dto: UpdateStatusDto) -> Result<PrintDetailDto> {
        let current: PrintStatus =
            sqlx::query_scalar("SELECT status FROM print_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::NotFound(format!("Print item {} not found", id)))?;

        if !current.can_transition_to(dto.status) {
            return Err(AppError::Validation(format!(
                "Cannot transition from {} to {}",
                current, dto.status
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE print_items
            SET status = $2,
                published_at = CASE
                    WHEN $2 = 'published'::print_status THEN COALESCE(published_at, now())
                    ELSE published_at
                END,
                updated_at = now()
            WHERE id = $1 AND status = $3
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(current)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Item status changed concurrently, retry".to_string(),
            ));
        }

        tracing::info!("Print item {} transitioned {} -> {}", id, current, dto.status);

        self.get_admin_detail(id).await
    }

    /// Detail fetch without the visibility filter, for curation responses
    async fn get_admin_detail(&self, id: Uuid) -> Result<PrintDetailDto> {
        let item = sqlx::query_as::<_, PrintItem>(&format!(
            "SELECT {} FROM print_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Print item {} not found", id)))?;

        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, description, created_at FROM categories WHERE id = $1",
        )
        .bind(item.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(PrintDetailDto::from_parts(
            item,
            category.into(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            false,
        ))
    }

    /// Append a gallery image. Only the item's author or an admin may add one.
    pub async fn add_image(
        &self,
        id: Uuid,
        requester: &crate::features::auth::model::AuthenticatedUser,
        dto: AddImageDto,
    ) -> Result<PrintImageDto> {
        let author_id: String =
            sqlx::query_scalar("SELECT author_id FROM print_items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::NotFound(format!("Print item {} not found", id)))?;

        if author_id != requester.sub && !requester.is_admin() {
            return Err(AppError::Forbidden(
                "Only the author or an admin may add images".to_string(),
            ));
        }

        let image: PrintImage = sqlx::query_as(
            r#"
            INSERT INTO print_images (print_item_id, image_url, caption, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id, print_item_id, image_url, caption, display_order
            "#,
        )
        .bind(id)
        .bind(&dto.image_url)
        .bind(&dto.caption)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(image.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seed_category, seed_print_item};

    #[sqlx::test]
    async fn listing_never_returns_drafts(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let published = seed_print_item(&pool, category, "Benchy", "published").await;
        let _draft = seed_print_item(&pool, category, "Secret WIP", "draft").await;
        let service = CatalogService::new(pool.clone());

        let (items, page, total) = service.list(&PrintListQuery::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, published);
        assert_eq!(page.page, 1);

        // Searching by the draft's own title still does not surface it
        let params = PrintListQuery {
            search: Some("Secret".to_string()),
            ..Default::default()
        };
        let (items, _, total) = service.list(&params).await.unwrap();
        assert_eq!(total, 0);
        assert!(items.is_empty());
    }

    #[sqlx::test]
    async fn draft_detail_is_not_found(pool: PgPool) {
        let category = seed_category(&pool, "Toys", "toys").await;
        let draft = seed_print_item(&pool, category, "Secret WIP", "draft").await;
        let service = CatalogService::new(pool.clone());

        let result = service.get_detail(draft, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let missing = service.get_detail(Uuid::now_v7(), None).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    fn query(
        search: Option<&str>,
        category: Option<&str>,
        difficulty: Option<&str>,
    ) -> PrintListQuery {
        PrintListQuery {
            search: search.map(str::to_string),
            category: category.map(str::to_string),
            difficulty: difficulty.map(str::to_string),
            sort: None,
            page: None,
        }
    }

    #[test]
    fn test_where_clause_base_set_only() {
        let filters = ListFilters::from_query(&query(None, None, None));
        let (clause, next) = filters.where_clause();
        assert_eq!(clause, "WHERE p.status = 'published'");
        assert_eq!(next, 1);
    }

    #[test]
    fn test_where_clause_search_reuses_placeholder() {
        let filters = ListFilters::from_query(&query(Some("dragon"), None, None));
        let (clause, next) = filters.where_clause();
        assert_eq!(
            clause,
            "WHERE p.status = 'published' AND \
             (p.title ILIKE $1 OR p.description ILIKE $1 OR c.name ILIKE $1)"
        );
        assert_eq!(next, 2);
        assert_eq!(filters.search_pattern.as_deref(), Some("%dragon%"));
    }

    #[test]
    fn test_where_clause_all_filters_numbered_in_order() {
        let filters = ListFilters::from_query(&query(Some("benchy"), Some("toys"), Some("expert")));
        let (clause, next) = filters.where_clause();
        assert!(clause.contains("ILIKE $1"));
        assert!(clause.contains("c.slug = $2"));
        assert!(clause.contains("p.difficulty = $3"));
        assert_eq!(next, 4);
    }

    #[test]
    fn test_where_clause_drops_empty_and_invalid_filters() {
        let filters = ListFilters::from_query(&query(Some(""), Some(""), Some("nope")));
        let (clause, next) = filters.where_clause();
        assert_eq!(clause, "WHERE p.status = 'published'");
        assert_eq!(next, 1);
    }
}
