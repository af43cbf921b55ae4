use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::domain::PermissionSet;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::security::MemberContext;
use crate::services::{CreatePermissionSet, PermissionSetSummary, UpdatePermissionSet};

/// GET /api/admin/permission-sets - live permission sets of the site
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<MemberContext>,
) -> ApiResult<Vec<PermissionSetSummary>> {
    require_admin(&ctx)?;
    let sets = state.permission_sets.list(ctx.site_id).await?;
    Ok(ApiResponse::success(sets))
}

/// GET /api/admin/permission-sets/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(ctx): Extension<MemberContext>,
) -> ApiResult<PermissionSet> {
    require_admin(&ctx)?;
    let set = state.permission_sets.get(ctx.site_id, id).await?;
    Ok(ApiResponse::success(set))
}

/// POST /api/admin/permission-sets
pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<MemberContext>,
    Json(payload): Json<CreatePermissionSet>,
) -> ApiResult<PermissionSet> {
    require_admin(&ctx)?;
    let set = state
        .permission_sets
        .create(ctx.site_id, ctx.member_id(), payload)
        .await?;
    Ok(ApiResponse::created(set))
}

/// PUT /api/admin/permission-sets/:id - replace name and entries
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(ctx): Extension<MemberContext>,
    Json(payload): Json<UpdatePermissionSet>,
) -> ApiResult<PermissionSet> {
    require_admin(&ctx)?;
    let set = state
        .permission_sets
        .update(ctx.site_id, ctx.member_id(), id, payload)
        .await?;
    Ok(ApiResponse::success(set))
}

/// DELETE /api/admin/permission-sets/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(ctx): Extension<MemberContext>,
) -> ApiResult<()> {
    require_admin(&ctx)?;
    state
        .permission_sets
        .delete(ctx.site_id, ctx.member_id(), id)
        .await?;
    Ok(ApiResponse::no_content())
}

fn require_admin(ctx: &MemberContext) -> Result<(), ApiError> {
    if !ctx.is_authenticated() {
        return Err(ApiError::unauthorized("Authentication required"));
    }
    if !ctx.is_admin() || ctx.is_suspended() {
        tracing::warn!(site_id = %ctx.site_id, member = ctx.display_name(),
            member_id = ?ctx.member_id(), "Administration denied");
        return Err(ApiError::forbidden("Admin role required"));
    }
    Ok(())
}
