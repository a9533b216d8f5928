use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_admin_role;
use super::{AdminDto, AdminsDto, ApiError, ApiResponse, AppState, MessageResponse, guards};
use crate::db::Admin;
use crate::models::UserStatus;
use crate::services::AuthenticatedUser;

#[derive(Deserialize)]
pub struct SetAdminRequest {
    pub user_id: i32,
    pub role: String,
}

async fn admin_dto(state: &AppState, admin: Admin) -> Result<AdminDto, ApiError> {
    let user = state
        .store()
        .get_user(admin.id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", admin.id))?;
    let devices = state.store().count_devices_for_admin(admin.id).await?;

    Ok(AdminDto {
        id: admin.id,
        role: admin.role,
        fullname: user.fullname(),
        username: user.username,
        devices,
        time_created: admin.created_at,
    })
}

/// POST /api/admin
/// Grants a role to a user, or changes the role a user already holds.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SetAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminDto>>), ApiError> {
    guards::require_admin(&auth)?;

    let role = validate_admin_role(&payload.role)?;

    let user = state
        .store()
        .get_user(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", payload.user_id))?;

    // Only confirmed accounts may hold a role.
    if user.status != UserStatus::Confirmed.as_str() {
        return Err(ApiError::conflict(format!(
            "user: {} is not confirmed",
            user.id
        )));
    }

    let admin = state.store().upsert_admin(payload.user_id, role).await?;
    let dto = admin_dto(&state, admin).await?;

    tracing::info!(
        "user: {} upgraded user: {} to {}",
        auth.user.id,
        payload.user_id,
        role
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(dto))))
}

/// GET /api/admin/{id}
/// Own record, or any record for the admin role.
pub async fn get_admin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(admin_id): Path<i32>,
) -> Result<Json<ApiResponse<AdminDto>>, ApiError> {
    let caller = guards::require_moder(&auth)?;

    let admin = state
        .store()
        .get_admin(admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found("admin", admin_id))?;

    if admin.id != auth.user.id && !caller.is_admin() {
        return Err(ApiError::forbidden(format!(
            "admin: {} has no permission for admin: {admin_id}",
            auth.user.id
        )));
    }

    let dto = admin_dto(&state, admin).await?;

    Ok(Json(ApiResponse::success(dto)))
}

/// GET /api/admins
pub async fn list_admins(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<AdminsDto>>, ApiError> {
    guards::require_admin(&auth)?;

    let mut admins = Vec::new();
    for admin in state.store().list_admins().await? {
        admins.push(admin_dto(&state, admin).await?);
    }

    Ok(Json(ApiResponse::success(AdminsDto { admins })))
}

/// DELETE /api/admin/{id}
/// Deletes the role record and, transitively, every owned device with its
/// tokens.
pub async fn delete_admin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(admin_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let caller = guards::require_moder(&auth)?;

    let admin = state
        .store()
        .get_admin(admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found("admin", admin_id))?;

    if admin.id != auth.user.id && !caller.is_admin() {
        return Err(ApiError::forbidden(format!(
            "admin: {} has no permission for admin: {admin_id}",
            auth.user.id
        )));
    }

    state.store().delete_admin_cascading(admin_id).await?;

    tracing::info!("user: {} deleted admin: {admin_id}", auth.user.id);

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "admin: {admin_id} was deleted successfully"
    )))))
}
