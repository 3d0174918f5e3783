use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::prints::dtos::{CommentResponseDto, CreateCommentDto, LikeResponseDto};
use crate::features::prints::handlers::PrintsState;
use crate::shared::types::ApiResponse;

/// Toggle a like on a print item
///
/// Likes the item if the caller has not liked it yet, otherwise removes the
/// like. Repeated calls alternate state; the count always tracks the number
/// of existing like records.
#[utoipa::path(
    post,
    path = "/api/prints/{id}/like",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    responses(
        (status = 200, description = "New like state", body = ApiResponse<LikeResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "engagement"
)]
pub async fn toggle_like(
    State(state): State<PrintsState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LikeResponseDto>>> {
    let like = state.engagement.toggle_like(id, &user.sub).await?;
    Ok(Json(ApiResponse::success(Some(like), None, None)))
}

/// Add a comment to a print item
#[utoipa::path(
    post,
    path = "/api/prints/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Print item id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 200, description = "Comment added", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Empty comment"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Item not found")
    ),
    security(("bearer_auth" = [])),
    tag = "engagement"
)]
pub async fn add_comment(
    State(state): State<PrintsState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<Json<ApiResponse<CommentResponseDto>>> {
    let comment = state.engagement.add_comment(id, &user.sub, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(comment),
        Some("Your comment has been added".to_string()),
        None,
    )))
}
