/// Fixed page size for catalog listings
pub const PRINTS_PAGE_SIZE: i64 = 12;

/// Home view limits
pub const HOME_FEATURED_LIMIT: i64 = 6;
pub const HOME_RECENT_LIMIT: i64 = 6;
pub const HOME_CATEGORIES_LIMIT: i64 = 8;

/// Related prints shown on the detail view
pub const RELATED_PRINTS_LIMIT: i64 = 4;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - manages categories and item lifecycle (publish/feature/delete)
pub const ROLE_ADMIN: &str = "admin";
