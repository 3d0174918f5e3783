mod catalog_service;
mod engagement_service;

pub use catalog_service::CatalogService;
pub use engagement_service::EngagementService;
