use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::validation::SLUG_REGEX;

/// Response DTO for a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Number of print items in the category (all statuses); present on list views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_count: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            print_count: None,
            created_at: c.created_at,
        }
    }
}

impl From<CategoryWithCount> for CategoryResponseDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            print_count: Some(c.print_count),
            created_at: c.created_at,
        }
    }
}

/// Request DTO for creating a category (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(
        length(min = 1, max = 100, message = "Slug must be 1-100 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase alphanumeric with hyphens")
    )]
    pub slug: String,

    #[serde(default)]
    pub description: String,
}
