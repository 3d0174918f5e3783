use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment on a print item, displayed newest first
#[derive(Debug, Clone, FromRow)]
pub struct PrintComment {
    pub id: Uuid,
    pub print_item_id: Uuid,
    pub author_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
