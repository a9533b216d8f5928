use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod accounts;
mod admins;
mod devices;
mod error;
pub mod guards;
mod recipes;
pub mod sessions;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn crate::services::SessionService> {
        &self.shared.sessions
    }

    #[must_use]
    pub fn mail(&self) -> &Arc<crate::services::MailService> {
        &self.shared.mail
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState { shared }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let user_routes = create_user_router(state.clone());

    let api_router = Router::new()
        .merge(user_routes)
        .route("/user", post(accounts::signup))
        .route("/confirm-user/{confirm_token}", patch(accounts::confirm_user))
        .route("/token", post(sessions::login))
        .route("/refresh-token", patch(sessions::refresh))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_api_key,
        ))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Routes behind the full API-key + access-token guard chain. Role checks
/// happen inside the handlers, where the required role varies.
fn create_user_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user/{user_id}",
            get(accounts::get_user)
                .put(accounts::update_user)
                .delete(accounts::delete_user),
        )
        .route("/users", get(accounts::list_users))
        .route("/admin", post(admins::create_admin))
        .route(
            "/admin/{admin_id}",
            get(admins::get_admin).delete(admins::delete_admin),
        )
        .route("/admins", get(admins::list_admins))
        .route(
            "/device",
            post(devices::create_device).put(devices::update_device),
        )
        .route(
            "/device/{device_id}",
            get(devices::get_device)
                .patch(devices::regenerate_key)
                .delete(devices::delete_device),
        )
        .route("/devices", get(devices::search_devices))
        .route(
            "/recipe",
            post(recipes::create_recipe).put(recipes::update_recipe),
        )
        .route(
            "/recipe/{recipe_id}",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
        .route("/recipes", get(recipes::list_recipes))
        .route_layer(middleware::from_fn_with_state(state, guards::require_user))
}
