use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{
    validate_birth_date, validate_email, validate_password, validate_person_name, validate_sex,
    validate_username,
};
use super::{ApiError, ApiResponse, AppState, MessageResponse, PublicUserDto, UsersDto, guards};
use crate::db::NewUser;
use crate::models::UserStatus;
use crate::services::AuthenticatedUser;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(default)]
    pub sex: Option<String>,
    pub birth_date: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /api/user
/// Registers a user. Only the API-key guard applies.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PublicUserDto>>), ApiError> {
    let first_name = validate_person_name("first_name", &payload.first_name)?;
    let last_name = validate_person_name("last_name", &payload.last_name)?;
    let username = validate_username(&payload.username)?;
    let sex = validate_sex(payload.sex.as_deref())?;
    let birth_date = validate_birth_date(&payload.birth_date)?;
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    if state.store().get_user_by_username(&username).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "username: {username} already exists"
        )));
    }
    if state.store().get_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(format!("e-mail: {email} already exists")));
    }

    let require_confirmation = state.config().security.require_email_confirmation;
    let initial_status = if require_confirmation {
        UserStatus::Unconfirmed
    } else {
        UserStatus::Confirmed
    };

    let user = state
        .store()
        .create_user(
            NewUser {
                first_name,
                last_name,
                username,
                sex,
                birth_date,
                email,
                password: payload.password,
            },
            initial_status,
        )
        .await?;

    if require_confirmation {
        let confirm_token = state
            .sessions()
            .issue_confirm_token(&user.email)
            .map_err(|e| ApiError::internal(e.to_string()))?;

        state
            .mail()
            .send_confirmation(&user.email, &user.fullname(), &confirm_token)
            .await
            .map_err(|e| ApiError::validation(e.to_string()))?;
    }

    tracing::info!("user: {} signed up", user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PublicUserDto::from(user))),
    ))
}

/// PATCH /api/confirm-user/{token}
/// Completes registration from the mailed confirmation token.
pub async fn confirm_user(
    State(state): State<Arc<AppState>>,
    Path(confirm_token): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let Some(email) = state.sessions().decode_confirm_token(&confirm_token) else {
        return Err(ApiError::NotFound(
            "Confirmation token is not valid".to_string(),
        ));
    };

    let user = state
        .store()
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User with such e-mail does not exist".to_string()))?;

    if user.status != UserStatus::Unconfirmed.as_str() {
        return Err(ApiError::conflict(format!(
            "user: {} is not unconfirmed",
            user.id
        )));
    }

    state
        .store()
        .set_user_status(user.id, UserStatus::Confirmed)
        .await?;

    tracing::info!("user: {} confirmed itself", user.id);

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "user: {} has been confirmed",
        user.email
    )))))
}

/// GET /api/user/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<PublicUserDto>>, ApiError> {
    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user_id))?;

    Ok(Json(ApiResponse::success(PublicUserDto::from(user))))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<UsersDto>>, ApiError> {
    let users = state
        .store()
        .list_users()
        .await?
        .into_iter()
        .map(PublicUserDto::from)
        .collect();

    Ok(Json(ApiResponse::success(UsersDto { users })))
}

/// PUT /api/user/{id}
/// Partial update of username / e-mail / password, by the user itself or
/// an admin.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<PublicUserDto>>, ApiError> {
    if auth.user.id != user_id && guards::require_admin(&auth).is_err() {
        return Err(ApiError::forbidden(format!(
            "user: {} has no permission for user: {user_id}",
            auth.user.id
        )));
    }

    if state.store().get_user(user_id).await?.is_none() {
        return Err(ApiError::not_found("user", user_id));
    }

    let username = payload
        .username
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validate_username)
        .transpose()?;
    let email = payload
        .email
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validate_email)
        .transpose()?;
    let password = payload.password.as_deref().filter(|s| !s.is_empty());
    if let Some(password) = password {
        validate_password(password)?;
    }

    if username.is_none() && email.is_none() && password.is_none() {
        return Err(ApiError::validation("No fields to update"));
    }

    if let Some(ref username) = username
        && let Some(existing) = state.store().get_user_by_username(username).await?
        && existing.id != user_id
    {
        return Err(ApiError::conflict(format!(
            "username: {username} already exists"
        )));
    }

    if let Some(ref email) = email
        && let Some(existing) = state.store().get_user_by_email(email).await?
        && existing.id != user_id
    {
        return Err(ApiError::conflict(format!("e-mail: {email} already exists")));
    }

    let user = state
        .store()
        .update_user_details(user_id, username.as_deref(), email.as_deref(), password)
        .await?;

    tracing::info!("user: {} updated details of user: {user_id}", auth.user.id);

    Ok(Json(ApiResponse::success(PublicUserDto::from(user))))
}

/// DELETE /api/user/{id}
/// By the user itself or an admin. Drops the user's sessions too.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user_id))?;

    if user.id != auth.user.id && guards::require_admin(&auth).is_err() {
        return Err(ApiError::forbidden(format!(
            "user: {} has no permission for user: {user_id}",
            auth.user.id
        )));
    }

    state.store().delete_user(user_id).await?;

    tracing::info!("user: {} deleted user: {user_id}", auth.user.id);

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "user {} was deleted",
        user.username
    )))))
}
