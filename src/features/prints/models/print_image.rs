use sqlx::FromRow;
use uuid::Uuid;

/// Gallery image belonging to a print item, shown ascending by display_order
#[derive(Debug, Clone, FromRow)]
pub struct PrintImage {
    pub id: Uuid,
    pub print_item_id: Uuid,
    pub image_url: String,
    pub caption: String,
    pub display_order: i32,
}
