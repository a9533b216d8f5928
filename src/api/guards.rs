//! The authorization chain, applied innermost-first:
//! API key -> access token -> role.
//!
//! Each guard consumes what the previous one produced and adds exactly one
//! piece of context. The first two run as route middleware; the role checks
//! are plain functions handlers call on the resolved [`AuthenticatedUser`].

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::db::Admin;
use crate::services::{AuthenticatedUser, SessionError};

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Device established by the API-key guard, forwarded downstream through
/// request extensions.
#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub id: i32,
    pub name: String,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Guard 1: the caller must present the key of an enabled device.
/// Increments the device's request counter as a side effect and forwards
/// the device identity.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(key) = header_value(request.headers(), API_KEY_HEADER) else {
        return Err(ApiError::validation("There is no API key in the request"));
    };

    let device = state
        .store()
        .get_device_by_key(&key)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to resolve API key: {e}")))?;

    let Some(device) = device else {
        return Err(ApiError::unauthorized("API key is not valid"));
    };

    if !device.is_enabled() {
        return Err(ApiError::forbidden(format!(
            "device: {} is disabled",
            device.id
        )));
    }

    state
        .store()
        .add_device_request(device.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count device request: {e}")))?;

    request.extensions_mut().insert(DeviceIdentity {
        id: device.id,
        name: device.name,
    });

    Ok(next.run(request).await)
}

/// Guard 2: the caller must present a valid access token bound to the
/// device established by guard 1. Forwards the resolved user (with its
/// optional role).
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let device = current_device(&request)?;

    let Some(auth_key) = header_value(request.headers(), AUTH_KEY_HEADER) else {
        return Err(ApiError::validation("There is no auth key in the request"));
    };

    let auth = state
        .sessions()
        .authenticate(&auth_key, device.id)
        .await
        .map_err(map_access_error)?;

    request.extensions_mut().insert(auth);

    Ok(next.run(request).await)
}

/// The device identity a later guard or handler relies on. Its absence
/// means the chain was mis-wired, not that the client did anything wrong.
pub fn current_device(request: &Request) -> Result<DeviceIdentity, ApiError> {
    request
        .extensions()
        .get::<DeviceIdentity>()
        .cloned()
        .ok_or_else(|| ApiError::internal("API-key guard did not run before this point"))
}

/// Guard 3a: any administrative role.
pub fn require_moder(auth: &AuthenticatedUser) -> Result<Admin, ApiError> {
    auth.admin.clone().ok_or_else(|| {
        ApiError::forbidden(format!("user: {} has no permissions", auth.user.id))
    })
}

/// Guard 3b: the admin role specifically.
pub fn require_admin(auth: &AuthenticatedUser) -> Result<Admin, ApiError> {
    let admin = require_moder(auth)?;
    if !admin.is_admin() {
        return Err(ApiError::forbidden(format!(
            "user: {} has no permissions",
            auth.user.id
        )));
    }
    Ok(admin)
}

/// Status mapping for access-token resolution inside the guard chain.
pub fn map_access_error(err: SessionError) -> ApiError {
    match err {
        SessionError::UnknownAccessToken => ApiError::unauthorized("Auth key is not valid"),
        SessionError::DeviceMismatch => {
            ApiError::forbidden("Session was opened from another device")
        }
        SessionError::AccessExpired => ApiError::unauthorized("Access token is expired"),
        SessionError::UserNotFound => ApiError::NotFound("User not found".to_string()),
        SessionError::NotConfirmed => ApiError::conflict("User is not confirmed"),
        SessionError::Database(msg) => ApiError::DatabaseError(msg),
        other => ApiError::internal(other.to_string()),
    }
}
