use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use platter::config::Config;
use tower::ServiceExt;

/// Bootstrap device key seeded by the initial migration
const DEFAULT_DEVICE_KEY: &str = "platter_default_device_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection: every in-memory connection is its own db.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = platter::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    platter::api::router(state)
}

struct RequestSpec<'a> {
    method: &'a str,
    uri: &'a str,
    api_key: Option<&'a str>,
    auth_key: Option<&'a str>,
    cookie: Option<&'a str>,
    body: Option<serde_json::Value>,
}

impl<'a> RequestSpec<'a> {
    fn new(method: &'a str, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            api_key: Some(DEFAULT_DEVICE_KEY),
            auth_key: None,
            cookie: None,
            body: None,
        }
    }

    fn api_key(mut self, key: Option<&'a str>) -> Self {
        self.api_key = key;
        self
    }

    fn auth_key(mut self, key: &'a str) -> Self {
        self.auth_key = Some(key);
        self
    }

    fn cookie(mut self, cookie: &'a str) -> Self {
        self.cookie = Some(cookie);
        self
    }

    fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

async fn send(app: &Router, spec: RequestSpec<'_>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(spec.method).uri(spec.uri);

    if let Some(key) = spec.api_key {
        builder = builder.header("X-Api-Key", key);
    }
    if let Some(key) = spec.auth_key {
        builder = builder.header("X-Auth-Key", key);
    }
    if let Some(cookie) = spec.cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = if let Some(body) = spec.body {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Logs in and returns (access token, refresh cookie pair).
async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/token")
                .header("X-Api-Key", DEFAULT_DEVICE_KEY)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"username": username, "password": password}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login failed for {username}");

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the refresh cookie")
        .to_str()
        .unwrap()
        .to_string();
    let refresh_cookie = set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let access_token = json["data"]["access_token"].as_str().unwrap().to_string();

    (access_token, refresh_cookie)
}

async fn signup(app: &Router, username: &str, email: &str) -> serde_json::Value {
    let (status, body) = send(
        app,
        RequestSpec::new("POST", "/api/user").json(serde_json::json!({
            "first_name": "Test",
            "last_name": "User",
            "username": username,
            "sex": "female",
            "birth_date": "1990-05-01",
            "email": email,
            "password": "secret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["data"].clone()
}

// ============================================================================
// Guard chain
// ============================================================================

#[tokio::test]
async fn test_api_key_guard() {
    let app = spawn_app().await;

    let (status, _) = send(&app, RequestSpec::new("GET", "/api/users").api_key(None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").api_key(Some("wrong-key")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid key but no auth key: the next guard rejects
    let (status, _) = send(&app, RequestSpec::new("GET", "/api/users")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_access_token_guard() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").auth_key("made-up-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (token, _) = login(&app, "root", "password").await;
    let (status, body) = send(&app, RequestSpec::new("GET", "/api/users").auth_key(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["users"].is_array());
}

#[tokio::test]
async fn test_disabled_device_rejected_before_token_check() {
    let app = spawn_app().await;
    let (token, _) = login(&app, "root", "password").await;

    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"admin_id": 1, "name": "legacy-box"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let device_id = body["data"]["id"].as_i64().unwrap();
    let device_key = body["data"]["key"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"id": device_id, "status": "disable"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No auth key supplied: a disabled device must fail on the key guard
    // (403), not on the missing token (400).
    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").api_key(Some(&device_key)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_bound_to_device() {
    let app = spawn_app().await;
    let (token, _) = login(&app, "root", "password").await;

    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"admin_id": 1, "name": "second-device"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_key = body["data"]["key"].as_str().unwrap().to_string();

    // The session was opened through the bootstrap device; presenting it
    // through another device's key is a mismatch.
    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users")
            .api_key(Some(&other_key))
            .auth_key(&token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_guard() {
    let app = spawn_app().await;
    signup(&app, "plainuser", "plain@example.com").await;
    let (token, _) = login(&app, "plainuser", "secret123").await;

    // No role at all
    let (status, _) = send(&app, RequestSpec::new("GET", "/api/admins").auth_key(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Moder is not enough for the admin variant
    let (root_token, _) = login(&app, "root", "password").await;
    let user = signup(&app, "modonly", "mod@example.com").await;
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": user["id"], "role": "moder"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (mod_token, _) = login(&app, "modonly", "secret123").await;
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&mod_token)
            .json(serde_json::json!({"user_id": user["id"], "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_signup_and_duplicate_conflict() {
    let app = spawn_app().await;

    let profile = signup(&app, "alice", "a@x.com").await;
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["fullname"], "Test User");
    assert!(profile.get("password").is_none());
    assert!(profile.get("password_hash").is_none());

    // Same username again
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/user").json(serde_json::json!({
            "first_name": "Other",
            "last_name": "Person",
            "username": "alice",
            "birth_date": "1985-01-01",
            "email": "other@x.com",
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Original record is unchanged
    let (root_token, _) = login(&app, "root", "password").await;
    let uri = format!("/api/user/{}", profile["id"]);
    let (status, body) = send(&app, RequestSpec::new("GET", &uri).auth_key(&root_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;

    // Password below 7 characters
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/user").json(serde_json::json!({
            "first_name": "Short",
            "last_name": "Pass",
            "username": "shorty",
            "birth_date": "1990-01-01",
            "email": "short@x.com",
            "password": "abc12"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed email
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/user").json(serde_json::json!({
            "first_name": "Bad",
            "last_name": "Mail",
            "username": "badmail",
            "birth_date": "1990-01-01",
            "email": "not-an-email",
            "password": "secret123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_update_permissions_and_conflicts() {
    let app = spawn_app().await;
    let alice = signup(&app, "alice", "a@x.com").await;
    let bob = signup(&app, "bob", "b@x.com").await;
    let (alice_token, _) = login(&app, "alice", "secret123").await;

    // Alice cannot edit Bob
    let uri = format!("/api/user/{}", bob["id"]);
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", &uri)
            .auth_key(&alice_token)
            .json(serde_json::json!({"username": "hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Taking Bob's username is a conflict
    let uri = format!("/api/user/{}", alice["id"]);
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", &uri)
            .auth_key(&alice_token)
            .json(serde_json::json!({"username": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Empty update is malformed
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", &uri)
            .auth_key(&alice_token)
            .json(serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A real update goes through
    let (status, body) = send(
        &app,
        RequestSpec::new("PUT", &uri)
            .auth_key(&alice_token)
            .json(serde_json::json!({"username": "alice_cooks"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice_cooks");
}

#[tokio::test]
async fn test_confirm_already_confirmed_user() {
    let app = spawn_app().await;
    signup(&app, "eve", "e@x.com").await; // confirmed right away by default config

    let now = chrono::Utc::now();
    let claims = serde_json::json!({
        "sub": "e@x.com",
        "kind": "confirm",
        "jti": "test-confirm-token",
        "iat": now.timestamp(),
        "exp": (now + chrono::Duration::hours(1)).timestamp(),
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"change-me"),
    )
    .unwrap();

    let uri = format!("/api/confirm-user/{token}");
    let (status, _) = send(&app, RequestSpec::new("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_confirm_with_invalid_token() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        RequestSpec::new("PATCH", "/api/confirm-user/not-a-real-token"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/token")
            .json(serde_json::json!({"username": "nobody", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/token")
            .json(serde_json::json!({"username": "root", "password": "wrongpass1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_second_login_replaces_session() {
    let app = spawn_app().await;

    let (first_token, _) = login(&app, "root", "password").await;
    let (second_token, _) = login(&app, "root", "password").await;

    // The (user, device) row was overwritten in place: the first access
    // token is gone, the second works.
    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").auth_key(&first_token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").auth_key(&second_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_flow() {
    let app = spawn_app().await;
    let (token, refresh_cookie) = login(&app, "root", "password").await;

    // Missing cookie
    let (status, _) = send(
        &app,
        RequestSpec::new("PATCH", "/api/refresh-token").auth_key(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Real refresh mints a working access token
    let (status, body) = send(
        &app,
        RequestSpec::new("PATCH", "/api/refresh-token")
            .auth_key(&token)
            .cookie(&refresh_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").auth_key(&new_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_token_is_bound_to_user() {
    let app = spawn_app().await;
    signup(&app, "alice", "a@x.com").await;

    let (root_token, _) = login(&app, "root", "password").await;
    let (_, alice_cookie) = login(&app, "alice", "secret123").await;

    // Root's identity with Alice's refresh token must be rejected even
    // though the cookie itself is valid.
    let (status, _) = send(
        &app,
        RequestSpec::new("PATCH", "/api/refresh-token")
            .auth_key(&root_token)
            .cookie(&alice_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Admins & devices
// ============================================================================

#[tokio::test]
async fn test_device_name_conflict_is_case_insensitive() {
    let app = spawn_app().await;
    let (token, _) = login(&app, "root", "password").await;

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"admin_id": 1, "name": "kitchen-tablet"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"admin_id": 1, "name": "KITCHEN-TABLET"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_device_update_and_key_regeneration() {
    let app = spawn_app().await;
    let (token, _) = login(&app, "root", "password").await;

    let (_, body) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"admin_id": 1, "name": "spare"})),
    )
    .await;
    let device_id = body["data"]["id"].as_i64().unwrap();
    let old_key = body["data"]["key"].as_str().unwrap().to_string();

    // Empty update is malformed
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"id": device_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Setting the status it already has is a conflict
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", "/api/device")
            .auth_key(&token)
            .json(serde_json::json!({"id": device_id, "status": "enable"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Key regeneration produces a different key
    let uri = format!("/api/device/{device_id}");
    let (status, body) = send(&app, RequestSpec::new("PATCH", &uri).auth_key(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["data"]["key"].as_str().unwrap(), old_key);
}

#[tokio::test]
async fn test_admin_delete_cascades_to_devices_and_tokens() {
    let app = spawn_app().await;
    let carol = signup(&app, "carol", "c@x.com").await;
    let (root_token, _) = login(&app, "root", "password").await;

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": carol["id"], "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/device")
            .auth_key(&root_token)
            .json(serde_json::json!({"admin_id": carol["id"], "name": "carol-phone"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let carol_key = body["data"]["key"].as_str().unwrap().to_string();

    // The new device key works
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/token")
            .api_key(Some(&carol_key))
            .json(serde_json::json!({"username": "root", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deleting the admin takes the device (and its tokens) with it
    let uri = format!("/api/admin/{}", carol["id"]);
    let (status, _) = send(&app, RequestSpec::new("DELETE", &uri).auth_key(&root_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        RequestSpec::new("GET", "/api/users").api_key(Some(&carol_key)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_role_upsert_and_listing() {
    let app = spawn_app().await;
    let dave = signup(&app, "dave", "d@x.com").await;
    let (root_token, _) = login(&app, "root", "password").await;

    // Granting to an unknown user
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": 9999, "role": "moder"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown role value
    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": dave["id"], "role": "superuser"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Grant, then re-grant with a different role updates in place
    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": dave["id"], "role": "moder"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "moder");

    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/admin")
            .auth_key(&root_token)
            .json(serde_json::json!({"user_id": dave["id"], "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "admin");

    let (status, body) = send(
        &app,
        RequestSpec::new("GET", "/api/admins").auth_key(&root_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let admins = body["data"]["admins"].as_array().unwrap();
    assert_eq!(admins.len(), 2); // root + dave
}

// ============================================================================
// Recipes
// ============================================================================

#[tokio::test]
async fn test_recipe_crud() {
    let app = spawn_app().await;
    signup(&app, "alice", "a@x.com").await;
    let (token, _) = login(&app, "alice", "secret123").await;

    let (status, body) = send(
        &app,
        RequestSpec::new("POST", "/api/recipe")
            .auth_key(&token)
            .json(serde_json::json!({
                "title": "Beef Stew",
                "description": "Hearty winter stew",
                "complexity": "medium",
                "cooking_time": 120,
                "instruction": "Brown the beef, then simmer."
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let recipe_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["complexity"], "medium");

    // Partial update touches only the supplied fields
    let (status, body) = send(
        &app,
        RequestSpec::new("PUT", "/api/recipe")
            .auth_key(&token)
            .json(serde_json::json!({"id": recipe_id, "cooking_time": 90})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cooking_time"], 90);
    assert_eq!(body["data"]["title"], "Beef Stew");

    // Update with no fields is malformed
    let (status, _) = send(
        &app,
        RequestSpec::new("PUT", "/api/recipe")
            .auth_key(&token)
            .json(serde_json::json!({"id": recipe_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        RequestSpec::new("GET", "/api/recipes").auth_key(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recipes"].as_array().unwrap().len(), 1);

    let uri = format!("/api/recipe/{recipe_id}");
    let (status, _) = send(&app, RequestSpec::new("DELETE", &uri).auth_key(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, RequestSpec::new("GET", &uri).auth_key(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipe_validation() {
    let app = spawn_app().await;
    signup(&app, "alice", "a@x.com").await;
    let (token, _) = login(&app, "alice", "secret123").await;

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/recipe")
            .auth_key(&token)
            .json(serde_json::json!({
                "title": "Beef Stew",
                "description": "desc",
                "complexity": "impossible",
                "cooking_time": 30,
                "instruction": "steps"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        RequestSpec::new("POST", "/api/recipe")
            .auth_key(&token)
            .json(serde_json::json!({
                "title": "Beef Stew",
                "description": "desc",
                "complexity": "easy",
                "cooking_time": 0,
                "instruction": "steps"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
