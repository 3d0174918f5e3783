use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::prints::{
    dtos as prints_dtos, handlers as prints_handlers, models as prints_models,
};
use crate::shared::types::{ApiResponse, Meta, PageMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Catalog (public)
        prints_handlers::print_handler::home,
        prints_handlers::print_handler::list_prints,
        prints_handlers::print_handler::get_print,
        prints_handlers::print_handler::category_prints,
        categories_handlers::category_handler::list_categories,
        categories_handlers::category_handler::get_category,
        // Authoring and engagement (authenticated)
        prints_handlers::print_handler::create_print,
        prints_handlers::print_handler::add_image,
        prints_handlers::engagement_handler::toggle_like,
        prints_handlers::engagement_handler::add_comment,
        // Curation (admin)
        prints_handlers::print_handler::set_print_status,
        prints_handlers::print_handler::delete_print,
        categories_handlers::category_handler::create_category,
        categories_handlers::category_handler::delete_category,
    ),
    components(
        schemas(
            Meta,
            PageMeta,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Prints
            prints_models::Difficulty,
            prints_models::PrintStatus,
            prints_dtos::SortKey,
            prints_dtos::PrintSummaryDto,
            prints_dtos::PrintDetailDto,
            prints_dtos::PrintImageDto,
            prints_dtos::CommentResponseDto,
            prints_dtos::CreatePrintDto,
            prints_dtos::AddImageDto,
            prints_dtos::UpdateStatusDto,
            prints_dtos::CreateCommentDto,
            prints_dtos::LikeResponseDto,
            prints_dtos::HomeResponseDto,
            prints_handlers::print_handler::CategoryPrintsDto,
            ApiResponse<Vec<prints_dtos::PrintSummaryDto>>,
            ApiResponse<prints_dtos::PrintDetailDto>,
            ApiResponse<prints_dtos::HomeResponseDto>,
            ApiResponse<prints_dtos::LikeResponseDto>,
            ApiResponse<prints_dtos::CommentResponseDto>,
            ApiResponse<prints_dtos::PrintImageDto>,
        )
    ),
    tags(
        (name = "prints", description = "Print item catalog (public browsing, authoring)"),
        (name = "categories", description = "Print categories"),
        (name = "engagement", description = "Likes and comments on print items"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Printshelf API",
        version = "0.1.0",
        description = "API documentation for Printshelf",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
