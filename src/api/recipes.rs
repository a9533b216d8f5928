use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_complexity, validate_cooking_time, validate_recipe_title};
use super::{ApiError, ApiResponse, AppState, MessageResponse, RecipeDto, RecipesDto};
use crate::db::NewRecipe;
use crate::services::AuthenticatedUser;

#[derive(Deserialize)]
pub struct NewRecipeRequest {
    pub title: String,
    pub description: String,
    pub complexity: String,
    pub cooking_time: i32,
    pub instruction: String,
}

#[derive(Deserialize)]
pub struct UpdateRecipeRequest {
    pub id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub complexity: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub instruction: Option<String>,
}

/// POST /api/recipe
/// The authenticated user becomes the owner.
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<NewRecipeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RecipeDto>>), ApiError> {
    validate_recipe_title(&payload.title)?;
    let complexity = validate_complexity(&payload.complexity)?;
    let cooking_time = validate_cooking_time(payload.cooking_time)?;

    if payload.description.is_empty() || payload.instruction.is_empty() {
        return Err(ApiError::validation(
            "Description and instruction are required",
        ));
    }

    let recipe = state
        .store()
        .create_recipe(
            auth.user.id,
            NewRecipe {
                title: payload.title,
                description: payload.description,
                complexity,
                cooking_time,
                instruction: payload.instruction,
            },
        )
        .await?;

    tracing::info!("user: {} created recipe: {}", auth.user.id, recipe.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RecipeDto::from(recipe))),
    ))
}

/// PUT /api/recipe
/// Partial update: only the supplied, non-empty fields are applied.
pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    if state.store().get_recipe(payload.id).await?.is_none() {
        return Err(ApiError::not_found("recipe", payload.id));
    }

    let title = payload.title.as_deref().filter(|s| !s.is_empty());
    if let Some(title) = title {
        validate_recipe_title(title)?;
    }
    let description = payload.description.as_deref().filter(|s| !s.is_empty());
    let complexity = payload
        .complexity
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(validate_complexity)
        .transpose()?;
    let cooking_time = payload.cooking_time.map(validate_cooking_time).transpose()?;
    let instruction = payload.instruction.as_deref().filter(|s| !s.is_empty());

    if title.is_none()
        && description.is_none()
        && complexity.is_none()
        && cooking_time.is_none()
        && instruction.is_none()
    {
        return Err(ApiError::validation("No fields to update"));
    }

    let recipe = state
        .store()
        .update_recipe_fields(
            payload.id,
            title,
            description,
            complexity,
            cooking_time,
            instruction,
        )
        .await?;

    tracing::info!("user: {} updated recipe: {}", auth.user.id, recipe.id);

    Ok(Json(ApiResponse::success(RecipeDto::from(recipe))))
}

/// GET /api/recipe/{id}
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<ApiResponse<RecipeDto>>, ApiError> {
    let recipe = state
        .store()
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("recipe", recipe_id))?;

    Ok(Json(ApiResponse::success(RecipeDto::from(recipe))))
}

/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<RecipesDto>>, ApiError> {
    let recipes = state
        .store()
        .list_recipes()
        .await?
        .into_iter()
        .map(RecipeDto::from)
        .collect();

    Ok(Json(ApiResponse::success(RecipesDto { recipes })))
}

/// DELETE /api/recipe/{id}
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if state.store().get_recipe(recipe_id).await?.is_none() {
        return Err(ApiError::not_found("recipe", recipe_id));
    }

    state.store().delete_recipe(recipe_id).await?;

    tracing::info!("user: {} deleted recipe: {recipe_id}", auth.user.id);

    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "recipe: {recipe_id} was deleted"
    )))))
}
