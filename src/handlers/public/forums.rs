use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::{self, ForumAction, ForumPermissions, MemberContext, SecurityError};

#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadableForum {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
}

/// GET /api/public/forums/:forum_id/permissions - capability flags of the caller
pub async fn permissions(
    State(state): State<AppState>,
    Path(forum_id): Path<Uuid>,
    Extension(ctx): Extension<MemberContext>,
) -> ApiResult<ForumPermissions> {
    let permissions = resolve(&state, &ctx, forum_id).await?;

    if !permissions.can_read {
        return Err(deny(&ctx, forum_id, "read"));
    }

    Ok(ApiResponse::success(permissions))
}

/// POST /api/public/forums/:forum_id/authorize - gate a single action
///
/// Body is a tagged action, e.g. `{"action":"edit","owner_id":"...","locked":false}`.
pub async fn authorize(
    State(state): State<AppState>,
    Path(forum_id): Path<Uuid>,
    Extension(ctx): Extension<MemberContext>,
    Json(action): Json<ForumAction>,
) -> ApiResult<AuthorizeResponse> {
    let permissions = resolve(&state, &ctx, forum_id).await?;

    if !security::authorize(&permissions, &ctx, &action) {
        return Err(deny(&ctx, forum_id, action.name()));
    }

    Ok(ApiResponse::success(AuthorizeResponse { allowed: true }))
}

/// GET /api/public/forums/readable - forums the caller may read, in display order
pub async fn readable(
    State(state): State<AppState>,
    Extension(ctx): Extension<MemberContext>,
) -> ApiResult<Vec<ReadableForum>> {
    let models_by_forum = state.builder.build_permission_models_by_site(ctx.site_id).await?;
    let forums = state.repository.forums(ctx.site_id).await?;

    let readable = forums
        .into_iter()
        .filter(|forum| {
            models_by_forum
                .get(&forum.id)
                .is_some_and(|models| ForumPermissions::resolve(&ctx, models).can_read)
        })
        .map(|forum| ReadableForum {
            id: forum.id,
            category_id: forum.category_id,
            name: forum.name,
            slug: forum.slug,
        })
        .collect();

    Ok(ApiResponse::success(readable))
}

async fn resolve(
    state: &AppState,
    ctx: &MemberContext,
    forum_id: Uuid,
) -> Result<ForumPermissions, ApiError> {
    match state
        .builder
        .build_permission_models_by_forum_id(ctx.site_id, forum_id)
        .await
    {
        Ok(models) => Ok(ForumPermissions::resolve(ctx, &models)),
        Err(err @ SecurityError::ForumNotFound { .. }) => {
            tracing::warn!(site_id = %ctx.site_id, %forum_id, member = ctx.display_name(),
                "Forum not found while checking permissions");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn deny(ctx: &MemberContext, forum_id: Uuid, action: &str) -> ApiError {
    tracing::warn!(site_id = %ctx.site_id, %forum_id, member = ctx.display_name(),
        member_id = ?ctx.member_id(), action, "Forum access denied");
    ApiError::unauthorized(format!("Not allowed to {} in this forum", action))
}
