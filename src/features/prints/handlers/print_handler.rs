use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, MaybeUser};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::prints::dtos::{
    AddImageDto, CreatePrintDto, HomeResponseDto, PageQuery, PrintDetailDto, PrintImageDto,
    PrintListQuery, PrintSummaryDto, UpdateStatusDto,
};
use crate::features::prints::handlers::PrintsState;
use crate::shared::types::{ApiResponse, Meta};

/// Home view with featured prints, recent prints, and top categories
#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Home view", body = ApiResponse<HomeResponseDto>),
    ),
    tag = "prints"
)]
pub async fn home(
    State(state): State<PrintsState>,
) -> Result<Json<ApiResponse<HomeResponseDto>>> {
    let home = state.catalog.home().await?;
    Ok(Json(ApiResponse::success(Some(home), None, None)))
}

/// List published prints with search, filters, sorting, and pagination
///
/// Malformed filter and sort values degrade to defaults; out-of-range page
/// numbers return the last valid page.
#[utoipa::path(
    get,
    path = "/api/prints",
    params(PrintListQuery),
    responses(
        (status = 200, description = "Page of print summaries", body = ApiResponse<Vec<PrintSummaryDto>>),
    ),
    tag = "prints"
)]
pub async fn list_prints(
    State(state): State<PrintsState>,
    Query(params): Query<PrintListQuery>,
) -> Result<Json<ApiResponse<Vec<PrintSummaryDto>>>> {
    let (items, page, total) = state.catalog.list(&params).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta::paginated(total, page)),
    )))
}

/// Print item detail
///
/// Returns the full item with gallery images, comments (newest first), up to
/// four related prints, and whether the requesting identity has liked it.
/// Increments the view counter exactly once per request.
#[utoipa::path(
    get,
    path = "/api/prints/{id}",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    responses(
        (status = 200, description = "Print item detail", body = ApiResponse<PrintDetailDto>),
        (status = 404, description = "Item missing or not published")
    ),
    tag = "prints"
)]
pub async fn get_print(
    State(state): State<PrintsState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PrintDetailDto>>> {
    let viewer = user.as_ref().map(|u| u.sub.as_str());
    let mut detail = state.catalog.get_detail(id, viewer).await?;

    // The fetch above resolved visibility, so the increment only ever runs
    // against an existing, visible item.
    if let Some(views) = state.engagement.record_view(id).await? {
        detail.views_count = views;
    }

    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Category detail: the category plus a page of its published prints
#[utoipa::path(
    get,
    path = "/api/categories/{slug}/prints",
    params(
        ("slug" = String, Path, description = "Category slug"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Category with a page of prints", body = ApiResponse<CategoryPrintsDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "prints"
)]
pub async fn category_prints(
    State(state): State<PrintsState>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ApiResponse<CategoryPrintsDto>>> {
    let (category, items, page, total) =
        state.catalog.category_prints(&slug, params.page).await?;
    Ok(Json(ApiResponse::success(
        Some(CategoryPrintsDto {
            category,
            prints: items,
        }),
        None,
        Some(Meta::paginated(total, page)),
    )))
}

/// Category detail payload
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct CategoryPrintsDto {
    pub category: CategoryResponseDto,
    pub prints: Vec<PrintSummaryDto>,
}

/// Create a print item (authenticated; starts as a draft owned by the caller)
#[utoipa::path(
    post,
    path = "/api/prints",
    request_body = CreatePrintDto,
    responses(
        (status = 200, description = "Print item created", body = ApiResponse<PrintDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prints"
)]
pub async fn create_print(
    State(state): State<PrintsState>,
    user: AuthenticatedUser,
    AppJson(dto): AppJson<CreatePrintDto>,
) -> Result<Json<ApiResponse<PrintDetailDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let detail = state.catalog.create(&user.sub, dto).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Add a gallery image to a print item (author or admin)
#[utoipa::path(
    post,
    path = "/api/prints/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    request_body = AddImageDto,
    responses(
        (status = 200, description = "Image added", body = ApiResponse<PrintImageDto>),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prints"
)]
pub async fn add_image(
    State(state): State<PrintsState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddImageDto>,
) -> Result<Json<ApiResponse<PrintImageDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let image = state.catalog.add_image(id, &user, dto).await?;
    Ok(Json(ApiResponse::success(Some(image), None, None)))
}

/// Transition an item's lifecycle status (admin only)
///
/// Allowed: draft→published, published→featured, featured→published.
#[utoipa::path(
    patch,
    path = "/api/admin/prints/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<PrintDetailDto>),
        (status = 400, description = "Invalid transition"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prints"
)]
pub async fn set_print_status(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<PrintsState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<PrintDetailDto>>> {
    let detail = state.catalog.set_status(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Delete a print item and its children (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/prints/{id}",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    responses(
        (status = 200, description = "Print item deleted"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prints"
)]
pub async fn delete_print(
    RequireAdmin(_user): RequireAdmin,
    State(state): State<PrintsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.catalog.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Print item deleted".to_string()),
        None,
    )))
}
