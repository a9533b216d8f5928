use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_device_name, validate_device_status};
use super::{
    ApiError, ApiResponse, AppState, DeviceDto, DeviceSearchQuery, DevicesDto, MessageResponse,
    guards,
};
use crate::db::Device;
use crate::models::DeviceStatus;
use crate::services::AuthenticatedUser;

#[derive(Deserialize)]
pub struct NewDeviceRequest {
    pub admin_id: i32,
    pub name: String,
}

#[derive(Deserialize)]
pub struct SetDeviceRequest {
    pub id: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub refresh_key: bool,
}

fn check_device_permission(
    auth: &AuthenticatedUser,
    device: &Device,
) -> Result<(), ApiError> {
    let caller = guards::require_moder(auth)?;
    if device.admin_id != auth.user.id && !caller.is_admin() {
        return Err(ApiError::forbidden(format!(
            "admin: {} has no permission for device: {}",
            auth.user.id, device.id
        )));
    }
    Ok(())
}

/// POST /api/device
/// Registers a device under an admin. Names are unique store-wide,
/// case-insensitively.
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<NewDeviceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DeviceDto>>), ApiError> {
    guards::require_admin(&auth)?;

    let name = validate_device_name(&payload.name)?;

    if state.store().get_admin(payload.admin_id).await?.is_none() {
        return Err(ApiError::not_found("admin", payload.admin_id));
    }

    if state.store().get_device_by_name(&name).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "device name: {name} already exists"
        )));
    }

    let device = state.store().create_device(payload.admin_id, &name).await?;

    tracing::info!(
        "user: {} created device: {}:{}",
        auth.user.id,
        device.id,
        device.name
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(DeviceDto::from(device))),
    ))
}

/// PUT /api/device
/// Partial update: name, status and key regeneration.
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SetDeviceRequest>,
) -> Result<Json<ApiResponse<DeviceDto>>, ApiError> {
    guards::require_admin(&auth)?;

    let device = state
        .store()
        .get_device(payload.id)
        .await?
        .ok_or_else(|| ApiError::not_found("device", payload.id))?;

    let name = payload
        .name
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validate_device_name)
        .transpose()?;
    let status = payload
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validate_device_status)
        .transpose()?;

    if name.is_none() && status.is_none() && !payload.refresh_key {
        return Err(ApiError::validation("No fields to update"));
    }

    if let Some(status) = status
        && device.status == status.as_str()
    {
        return Err(ApiError::conflict(format!(
            "device: {} is already {status}",
            device.id
        )));
    }

    if let Some(ref name) = name
        && let Some(existing) = state.store().get_device_by_name(name).await?
        && existing.id != device.id
    {
        return Err(ApiError::conflict(format!(
            "device name: {name} already exists"
        )));
    }

    let updated = state
        .store()
        .update_device_fields(device.id, name.as_deref(), status, payload.refresh_key)
        .await?;

    tracing::info!("user: {} updated device: {}", auth.user.id, updated.id);

    Ok(Json(ApiResponse::success(DeviceDto::from(updated))))
}

/// GET /api/device/{id}
pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(device_id): Path<i32>,
) -> Result<Json<ApiResponse<DeviceDto>>, ApiError> {
    let device = state
        .store()
        .get_device(device_id)
        .await?
        .ok_or_else(|| ApiError::not_found("device", device_id))?;

    check_device_permission(&auth, &device)?;

    Ok(Json(ApiResponse::success(DeviceDto::from(device))))
}

/// GET /api/devices?name=
/// Substring search over device names.
pub async fn search_devices(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DeviceSearchQuery>,
) -> Result<Json<ApiResponse<DevicesDto>>, ApiError> {
    guards::require_moder(&auth)?;

    let devices = state
        .store()
        .search_devices_by_name(&query.name)
        .await?
        .into_iter()
        .map(DeviceDto::from)
        .collect();

    Ok(Json(ApiResponse::success(DevicesDto { devices })))
}

/// PATCH /api/device/{id}
/// Regenerates the device key. Only enabled devices qualify.
pub async fn regenerate_key(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(device_id): Path<i32>,
) -> Result<Json<ApiResponse<DeviceDto>>, ApiError> {
    let device = state
        .store()
        .get_device(device_id)
        .await?
        .ok_or_else(|| ApiError::not_found("device", device_id))?;

    check_device_permission(&auth, &device)?;

    if device.status != DeviceStatus::Enable.as_str() {
        return Err(ApiError::conflict(format!(
            "device: {device_id} is not enable"
        )));
    }

    let updated = state.store().regenerate_device_key(device_id).await?;

    tracing::info!("user: {} refreshed key of device: {device_id}", auth.user.id);

    Ok(Json(ApiResponse::success(DeviceDto::from(updated))))
}

/// DELETE /api/device/{id}
/// Deletes the device and its tokens.
pub async fn delete_device(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(device_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let device = state
        .store()
        .get_device(device_id)
        .await?
        .ok_or_else(|| ApiError::not_found("device", device_id))?;

    check_device_permission(&auth, &device)?;

    state.store().delete_device_cascading(device_id).await?;

    tracing::info!("user: {} deleted device: {device_id}", auth.user.id);

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "device: {device_id} was deleted successfully"
    )))))
}
