use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::prints::models::{
    Difficulty, PrintComment, PrintImage, PrintItem, PrintItemSummary, PrintStatus,
};

/// Sort keys for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Newest,
    Oldest,
    Popular,
    Likes,
}

impl SortKey {
    /// Parse a sort parameter; unknown or missing values degrade to the
    /// default ordering instead of failing the request.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => SortKey::Oldest,
            Some("popular") => SortKey::Popular,
            Some("likes") => SortKey::Likes,
            _ => SortKey::Newest,
        }
    }

    /// ORDER BY clause for this key. Created-time descending breaks ties so
    /// pagination stays stable for equal counter values.
    pub fn order_by_sql(self) -> &'static str {
        match self {
            SortKey::Newest => "p.created_at DESC",
            SortKey::Oldest => "p.created_at ASC",
            SortKey::Popular => "p.views_count DESC, p.created_at DESC",
            SortKey::Likes => "p.likes_count DESC, p.created_at DESC",
        }
    }
}

/// Tolerant page-number parsing. Non-numeric values count as absent, so the
/// listing falls back to the first page instead of rejecting the request.
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Query params for the catalog listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PrintListQuery {
    /// Case-insensitive substring match on title, description, or category name
    pub search: Option<String>,
    /// Exact category slug
    pub category: Option<String>,
    /// Exact difficulty (`beginner|intermediate|advanced|expert`)
    pub difficulty: Option<String>,
    /// Sort key (`newest|oldest|popular|likes`, default `newest`)
    pub sort: Option<String>,
    /// Page number (1-indexed; malformed values default to 1, out-of-range
    /// values clamp)
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<i64>,
}

impl PrintListQuery {
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_param(self.sort.as_deref())
    }

    /// Difficulty filter, dropping unknown values
    pub fn difficulty_filter(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(Difficulty::from_param)
    }

    pub fn requested_page(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// Page query for category detail listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<i64>,
}

/// Summary DTO used on listing and home views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrintSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: String,
    pub difficulty: Difficulty,
    pub status: PrintStatus,
    pub main_image_url: Option<String>,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub category_name: String,
    pub category_slug: String,
}

impl From<PrintItemSummary> for PrintSummaryDto {
    fn from(p: PrintItemSummary) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            author_id: p.author_id,
            difficulty: p.difficulty,
            status: p.status,
            main_image_url: p.main_image_url,
            views_count: p.views_count,
            likes_count: p.likes_count,
            created_at: p.created_at,
            category_name: p.category_name,
            category_slug: p.category_slug,
        }
    }
}

/// Gallery image DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrintImageDto {
    pub id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub display_order: i32,
}

impl From<PrintImage> for PrintImageDto {
    fn from(i: PrintImage) -> Self {
        Self {
            id: i.id,
            image_url: i.image_url,
            caption: i.caption,
            display_order: i.display_order,
        }
    }
}

/// Comment DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<PrintComment> for CommentResponseDto {
    fn from(c: PrintComment) -> Self {
        Self {
            id: c.id,
            author_id: c.author_id,
            content: c.content,
            created_at: c.created_at,
        }
    }
}

/// Full detail DTO for a single print item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrintDetailDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CategoryResponseDto,
    pub author_id: String,
    pub difficulty: Difficulty,
    pub print_time_hours: i32,
    pub filament_type: String,
    pub filament_amount_grams: i32,
    #[schema(value_type = f64)]
    pub layer_height: Decimal,
    pub infill_percentage: i32,
    pub main_image_url: Option<String>,
    pub model_file_url: Option<String>,
    pub status: PrintStatus,
    pub views_count: i32,
    pub likes_count: i32,
    pub downloads_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub images: Vec<PrintImageDto>,
    pub comments: Vec<CommentResponseDto>,
    pub related: Vec<PrintSummaryDto>,
    /// Whether the requesting identity has liked this item (false when anonymous)
    pub user_liked: bool,
}

impl PrintDetailDto {
    pub fn from_parts(
        item: PrintItem,
        category: CategoryResponseDto,
        images: Vec<PrintImage>,
        comments: Vec<PrintComment>,
        related: Vec<PrintItemSummary>,
        user_liked: bool,
    ) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            category,
            author_id: item.author_id,
            difficulty: item.difficulty,
            print_time_hours: item.print_time_hours,
            filament_type: item.filament_type,
            filament_amount_grams: item.filament_amount_grams,
            layer_height: item.layer_height,
            infill_percentage: item.infill_percentage,
            main_image_url: item.main_image_url,
            model_file_url: item.model_file_url,
            status: item.status,
            views_count: item.views_count,
            likes_count: item.likes_count,
            downloads_count: item.downloads_count,
            created_at: item.created_at,
            updated_at: item.updated_at,
            published_at: item.published_at,
            images: images.into_iter().map(Into::into).collect(),
            comments: comments.into_iter().map(Into::into).collect(),
            related: related.into_iter().map(Into::into).collect(),
            user_liked,
        }
    }
}

/// Request DTO for creating a print item (starts as a draft)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePrintDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    pub category_id: Uuid,

    pub difficulty: Option<Difficulty>,

    #[validate(range(min = 0, message = "Print time must be non-negative"))]
    pub print_time_hours: i32,

    #[validate(length(max = 50, message = "Filament type must not exceed 50 characters"))]
    pub filament_type: Option<String>,

    #[validate(range(min = 0, message = "Filament amount must be non-negative"))]
    pub filament_amount_grams: i32,

    #[schema(value_type = f64)]
    pub layer_height: Option<Decimal>,

    #[validate(range(min = 0, max = 100, message = "Infill must be 0-100 percent"))]
    pub infill_percentage: Option<i32>,

    pub main_image_url: Option<String>,
    pub model_file_url: Option<String>,
}

/// Request DTO for adding a gallery image
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddImageDto {
    #[validate(length(min = 1, message = "Image URL must not be empty"))]
    pub image_url: String,

    #[validate(length(max = 200, message = "Caption must not exceed 200 characters"))]
    #[serde(default)]
    pub caption: String,

    #[validate(range(min = 0, message = "Display order must be non-negative"))]
    #[serde(default)]
    pub display_order: i32,
}

/// Request DTO for lifecycle transitions (admin)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: PrintStatus,
}

/// Request DTO for adding a comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentDto {
    pub content: String,
}

/// Result of a like toggle
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LikeResponseDto {
    pub liked: bool,
    pub likes_count: i32,
}

/// Home view: featured picks, recent arrivals, top categories
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HomeResponseDto {
    pub featured_prints: Vec<PrintSummaryDto>,
    pub recent_prints: Vec<PrintSummaryDto>,
    pub categories: Vec<CategoryResponseDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_known_values() {
        assert_eq!(SortKey::from_param(Some("newest")), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("oldest")), SortKey::Oldest);
        assert_eq!(SortKey::from_param(Some("popular")), SortKey::Popular);
        assert_eq!(SortKey::from_param(Some("likes")), SortKey::Likes);
    }

    #[test]
    fn test_sort_key_defaults_to_newest() {
        assert_eq!(SortKey::from_param(None), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("")), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("trending")), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("LIKES")), SortKey::Newest);
    }

    #[test]
    fn test_sort_key_order_by() {
        assert_eq!(SortKey::Newest.order_by_sql(), "p.created_at DESC");
        assert_eq!(SortKey::Oldest.order_by_sql(), "p.created_at ASC");
        assert!(SortKey::Popular.order_by_sql().starts_with("p.views_count DESC"));
        assert!(SortKey::Likes.order_by_sql().starts_with("p.likes_count DESC"));
    }

    #[test]
    fn test_malformed_page_param_defaults_to_first() {
        use axum::extract::Query;
        use axum::http::Uri;

        let uri: Uri = "/api/prints?page=abc".parse().unwrap();
        let Query(params) = Query::<PrintListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.requested_page(), 1);

        let uri: Uri = "/api/prints?page=".parse().unwrap();
        let Query(params) = Query::<PrintListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(params.requested_page(), 1);

        let uri: Uri = "/api/prints?page=3".parse().unwrap();
        let Query(params) = Query::<PrintListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(params.requested_page(), 3);

        let uri: Uri = "/api/categories/toys/prints?page=xyz".parse().unwrap();
        let Query(params) = Query::<PageQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(params.page, None);
    }

    #[test]
    fn test_list_query_degrades_bad_filters() {
        let query = PrintListQuery {
            search: None,
            category: None,
            difficulty: Some("impossible".to_string()),
            sort: Some("trending".to_string()),
            page: None,
        };

        assert_eq!(query.difficulty_filter(), None);
        assert_eq!(query.sort_key(), SortKey::Newest);
        assert_eq!(query.requested_page(), 1);
    }
}
