//! `SeaORM` implementation of the [`SessionService`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::db::{IssuedTokens, Store};
use crate::models::UserStatus;
use crate::services::session_service::{
    AccessState, AuthenticatedUser, IssuedSession, RefreshedAccess, SessionError, SessionService,
    access_state, refresh_expired,
};

/// HS256 claims. `exp` mirrors the row column and is never read back for
/// validity decisions; `jti` keeps two same-second tokens distinct.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    kind: String,
    jti: String,
    iat: i64,
    exp: i64,
}

const KIND_ACCESS: &str = "access";
const KIND_REFRESH: &str = "refresh";
const KIND_CONFIRM: &str = "confirm";

pub struct SeaOrmSessionService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmSessionService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn mint(&self, sub: String, kind: &str, expires: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = Claims {
            sub,
            kind: kind.to_string(),
            jti: uuid::Uuid::new_v4().simple().to_string(),
            iat: Utc::now().timestamp(),
            exp: expires.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.security.jwt_secret.as_bytes()),
        )
        .map_err(|e| SessionError::Internal(format!("Failed to sign token: {e}")))
    }

    fn issue_pair(&self, user_id: i32) -> Result<IssuedTokens, SessionError> {
        let now = Utc::now();
        let access_expires = now + Duration::minutes(self.security.access_ttl_minutes);
        let refresh_expires = now + Duration::hours(self.security.refresh_ttl_hours);

        Ok(IssuedTokens {
            access_token: self.mint(user_id.to_string(), KIND_ACCESS, access_expires)?,
            refresh_token: self.mint(user_id.to_string(), KIND_REFRESH, refresh_expires)?,
            access_expires: access_expires.to_rfc3339(),
            refresh_expires: refresh_expires.to_rfc3339(),
        })
    }

    /// Common resolution for both strict and refresh-tolerant access checks.
    async fn resolve(
        &self,
        access_token: &str,
        device_id: i32,
        allow_expired: bool,
    ) -> Result<AuthenticatedUser, SessionError> {
        let token = self
            .store
            .get_token_by_access(access_token)
            .await?
            .ok_or(SessionError::UnknownAccessToken)?;

        if token.device_id != device_id {
            return Err(SessionError::DeviceMismatch);
        }

        if let AccessState::Expired { newly_detected } = access_state(&token, Utc::now()) {
            if newly_detected {
                self.store.mark_token_expired(token.id).await?;
            }
            if !allow_expired {
                return Err(SessionError::AccessExpired);
            }
        }

        let user = self
            .store
            .get_user(token.user_id)
            .await?
            .ok_or(SessionError::UserNotFound)?;

        if user.status != UserStatus::Confirmed.as_str() {
            return Err(SessionError::NotConfirmed);
        }

        let admin = self.store.get_admin(user.id).await?;

        Ok(AuthenticatedUser { user, admin })
    }
}

#[async_trait]
impl SessionService for SeaOrmSessionService {
    async fn login(
        &self,
        username: &str,
        password: &str,
        device_id: i32,
    ) -> Result<IssuedSession, SessionError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(SessionError::UnknownUsername)?;

        let is_valid = self.store.verify_user_password(username, password).await?;
        if !is_valid {
            return Err(SessionError::InvalidCredentials);
        }

        if user.status != UserStatus::Confirmed.as_str() {
            return Err(SessionError::NotConfirmed);
        }

        let issued = self.issue_pair(user.id)?;
        self.store.upsert_session(user.id, device_id, &issued).await?;

        Ok(IssuedSession {
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
            refresh_max_age_seconds: self.security.refresh_ttl_hours * 3600,
        })
    }

    async fn authenticate(
        &self,
        access_token: &str,
        device_id: i32,
    ) -> Result<AuthenticatedUser, SessionError> {
        self.resolve(access_token, device_id, false).await
    }

    async fn resolve_for_refresh(
        &self,
        access_token: &str,
        device_id: i32,
    ) -> Result<AuthenticatedUser, SessionError> {
        self.resolve(access_token, device_id, true).await
    }

    async fn refresh(
        &self,
        user_id: i32,
        refresh_token: &str,
    ) -> Result<RefreshedAccess, SessionError> {
        let token = self
            .store
            .get_token_by_refresh(refresh_token)
            .await?
            .ok_or(SessionError::UnknownRefreshToken)?;

        if token.user_id != user_id {
            return Err(SessionError::ForeignRefreshToken);
        }

        if refresh_expired(&token, Utc::now()) {
            // Session forfeit: both credentials are gone.
            self.store.delete_token(token.id).await?;
            return Err(SessionError::RefreshExpired);
        }

        let now = Utc::now();
        let access_expires = now + Duration::minutes(self.security.access_ttl_minutes);
        let access_token = self.mint(user_id.to_string(), KIND_ACCESS, access_expires)?;

        self.store
            .update_token_access(token.id, &access_token, &access_expires.to_rfc3339())
            .await?;

        Ok(RefreshedAccess { access_token })
    }

    fn issue_confirm_token(&self, email: &str) -> Result<String, SessionError> {
        let expires = Utc::now() + Duration::minutes(self.security.confirm_ttl_minutes);
        self.mint(email.to_string(), KIND_CONFIRM, expires)
    }

    fn decode_confirm_token(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.security.jwt_secret.as_bytes()),
            &validation,
        )
        .ok()?;

        if data.claims.kind != KIND_CONFIRM {
            return None;
        }

        Some(data.claims.sub)
    }
}
