use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::prints::handlers::{self, PrintsState};
use crate::features::prints::services::{CatalogService, EngagementService};

/// Catalog and engagement routes.
///
/// Mounted behind the optional-auth middleware: reads work anonymously,
/// while the write handlers reject requests without an authenticated
/// identity through their extractors.
pub fn routes(catalog: Arc<CatalogService>, engagement: Arc<EngagementService>) -> Router {
    let state = PrintsState {
        catalog,
        engagement,
    };

    Router::new()
        // Public catalog views
        .route("/api/home", get(handlers::print_handler::home))
        .route(
            "/api/prints",
            get(handlers::print_handler::list_prints).post(handlers::print_handler::create_print),
        )
        .route("/api/prints/{id}", get(handlers::print_handler::get_print))
        .route(
            "/api/categories/{slug}/prints",
            get(handlers::print_handler::category_prints),
        )
        // Engagement writes (authenticated)
        .route(
            "/api/prints/{id}/like",
            post(handlers::engagement_handler::toggle_like),
        )
        .route(
            "/api/prints/{id}/comments",
            post(handlers::engagement_handler::add_comment),
        )
        .route(
            "/api/prints/{id}/images",
            post(handlers::print_handler::add_image),
        )
        .with_state(state)
}

/// Admin curation routes (mounted behind the strict auth middleware)
pub fn admin_routes(catalog: Arc<CatalogService>, engagement: Arc<EngagementService>) -> Router {
    let state = PrintsState {
        catalog,
        engagement,
    };

    Router::new()
        .route(
            "/api/admin/prints/{id}/status",
            patch(handlers::print_handler::set_print_status),
        )
        .route(
            "/api/admin/prints/{id}",
            delete(handlers::print_handler::delete_print),
        )
        .with_state(state)
}
