use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Print difficulty enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "print_difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Parse a filter parameter. Unknown values yield `None`, which drops
    /// the filter instead of failing the request.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

/// Print item lifecycle status matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "print_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    Draft,
    Published,
    Featured,
}

impl PrintStatus {
    /// Allowed lifecycle transitions: draft items are published, published
    /// items are promoted to featured, featured items can be demoted back.
    /// There is no direct draft-to-featured jump.
    pub fn can_transition_to(self, next: PrintStatus) -> bool {
        matches!(
            (self, next),
            (PrintStatus::Draft, PrintStatus::Published)
                | (PrintStatus::Published, PrintStatus::Featured)
                | (PrintStatus::Featured, PrintStatus::Published)
        )
    }

    /// Whether items with this status appear on public detail views.
    /// Drafts are never visible.
    pub fn is_visible(self) -> bool {
        matches!(self, PrintStatus::Published | PrintStatus::Featured)
    }
}

impl std::fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintStatus::Draft => write!(f, "draft"),
            PrintStatus::Published => write!(f, "published"),
            PrintStatus::Featured => write!(f, "featured"),
        }
    }
}

/// Database model for a print item
#[derive(Debug, Clone, FromRow)]
pub struct PrintItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub author_id: String,
    pub difficulty: Difficulty,
    pub print_time_hours: i32,
    pub filament_type: String,
    pub filament_amount_grams: i32,
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
}

/// Listing row: print item joined with its category's name and slug
#[derive(Debug, Clone, FromRow)]
pub struct PrintItemSummary {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_param() {
        assert_eq!(Difficulty::from_param("beginner"), Some(Difficulty::Beginner));
        assert_eq!(Difficulty::from_param("expert"), Some(Difficulty::Expert));
        assert_eq!(Difficulty::from_param("impossible"), None);
        assert_eq!(Difficulty::from_param(""), None);
        // filters are exact, not case-insensitive
        assert_eq!(Difficulty::from_param("Beginner"), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(PrintStatus::Draft.can_transition_to(PrintStatus::Published));
        assert!(PrintStatus::Published.can_transition_to(PrintStatus::Featured));
        assert!(PrintStatus::Featured.can_transition_to(PrintStatus::Published));

        // no draft -> featured shortcut, no demotion to draft
        assert!(!PrintStatus::Draft.can_transition_to(PrintStatus::Featured));
        assert!(!PrintStatus::Published.can_transition_to(PrintStatus::Draft));
        assert!(!PrintStatus::Featured.can_transition_to(PrintStatus::Draft));
        assert!(!PrintStatus::Published.can_transition_to(PrintStatus::Published));
    }

    #[test]
    fn test_status_visibility() {
        assert!(!PrintStatus::Draft.is_visible());
        assert!(PrintStatus::Published.is_visible());
        assert!(PrintStatus::Featured.is_visible());
    }
}
