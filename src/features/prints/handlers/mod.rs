pub mod engagement_handler;
pub mod print_handler;

use std::sync::Arc;

use crate::features::prints::services::{CatalogService, EngagementService};

/// Shared state for the prints feature routers
#[derive(Clone)]
pub struct PrintsState {
    pub catalog: Arc<CatalogService>,
    pub engagement: Arc<EngagementService>,
}
