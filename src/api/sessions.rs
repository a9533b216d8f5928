use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::guards::{self, DeviceIdentity};
use super::validation::{validate_password, validate_username};
use super::{ApiError, ApiResponse, AppState, TokenDto};
use crate::services::SessionError;

pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/token
/// Verifies credentials and opens (or overwrites) the session for this
/// (user, device) pair. The access token travels in the body, the refresh
/// token in an HttpOnly cookie scoped to the refresh window.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceIdentity>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let username = validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    let session = state
        .sessions()
        .login(&username, &payload.password, device.id)
        .await
        .map_err(|err| match err {
            SessionError::UnknownUsername => {
                ApiError::NotFound(format!("user: {username} not found"))
            }
            SessionError::InvalidCredentials => ApiError::unauthorized("Wrong password"),
            SessionError::NotConfirmed => {
                ApiError::forbidden(format!("user: {username} is not confirmed"))
            }
            SessionError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::internal(other.to_string()),
        })?;

    tracing::info!("user: {username} logged in on device: {}", device.id);

    let cookie = refresh_cookie(
        &session.refresh_token,
        session.refresh_max_age_seconds,
        state.config().server.secure_cookies,
    );

    let body = Json(ApiResponse::success(TokenDto {
        access_token: session.access_token,
    }));

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], body).into_response())
}

/// PATCH /api/refresh-token
/// Mints a fresh access token from the refresh cookie. The caller's access
/// token may already be expired; everything else about it must still hold.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(device): Extension<DeviceIdentity>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<TokenDto>>, ApiError> {
    let auth_key = headers
        .get(guards::AUTH_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("There is no auth key in the request"))?;

    let refresh_token = cookie_value(&headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::validation("There is no refresh token in cookies"))?;

    let auth = state
        .sessions()
        .resolve_for_refresh(auth_key, device.id)
        .await
        .map_err(guards::map_access_error)?;

    let refreshed = state
        .sessions()
        .refresh(auth.user.id, &refresh_token)
        .await
        .map_err(|err| match err {
            SessionError::UnknownRefreshToken => {
                ApiError::unauthorized("Refresh token is not valid")
            }
            SessionError::ForeignRefreshToken => ApiError::unauthorized(format!(
                "Refresh token does not belong to user: {}",
                auth.user.id
            )),
            SessionError::RefreshExpired => ApiError::unauthorized("Refresh token is expired"),
            SessionError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::internal(other.to_string()),
        })?;

    tracing::info!("user: {} refreshed access", auth.user.id);

    Ok(Json(ApiResponse::success(TokenDto {
        access_token: refreshed.access_token,
    })))
}

fn refresh_cookie(value: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{REFRESH_COOKIE}={value}; HttpOnly; Max-Age={max_age_seconds}; Path=/; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
