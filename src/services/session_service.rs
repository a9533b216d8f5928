//! Domain service for session issuance and checking.
//!
//! A session is one token row per (user, device) pair. The row's expiry
//! columns are the single source of truth; the JWT payload carries the same
//! instants but is never consulted for validity.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::{Admin, Token, User};

/// Errors specific to session operations. Each maps to one HTTP status at
/// the boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown username")]
    UnknownUsername,

    #[error("Wrong password")]
    InvalidCredentials,

    #[error("User is not confirmed")]
    NotConfirmed,

    #[error("Auth key is not valid")]
    UnknownAccessToken,

    #[error("Session belongs to another device")]
    DeviceMismatch,

    #[error("Access token is expired")]
    AccessExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Refresh token is not valid")]
    UnknownRefreshToken,

    #[error("Refresh token belongs to another user")]
    ForeignRefreshToken,

    #[error("Refresh token is expired")]
    RefreshExpired,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SessionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The user resolved by a successful access check, with its optional
/// administrative role.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub admin: Option<Admin>,
}

/// A freshly issued session: the access token goes into the response body,
/// the refresh token into an HttpOnly cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_max_age_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
}

/// Access-token state, computed lazily at check time. Detection of a fresh
/// expiry is reported to the caller, which persists the transition — the
/// check itself never mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Active,
    Expired { newly_detected: bool },
}

/// Classifies a token row's access credential against `now`.
#[must_use]
pub fn access_state(token: &Token, now: DateTime<Utc>) -> AccessState {
    if token.status == crate::models::TokenStatus::Expired.as_str() {
        return AccessState::Expired {
            newly_detected: false,
        };
    }

    match DateTime::parse_from_rfc3339(&token.access_expires) {
        Ok(expires) if now < expires => AccessState::Active,
        // An unparseable expiry is treated as expired rather than valid forever.
        _ => AccessState::Expired {
            newly_detected: true,
        },
    }
}

/// Whether the row's refresh credential is past its window.
#[must_use]
pub fn refresh_expired(token: &Token, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(&token.refresh_expires) {
        Ok(expires) => now >= expires,
        Err(_) => true,
    }
}

/// Domain service trait for session issuance.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Verifies credentials and issues (or overwrites in place) the session
    /// for this (user, device) pair.
    ///
    /// # Errors
    ///
    /// [`SessionError::UnknownUsername`], [`SessionError::InvalidCredentials`]
    /// or [`SessionError::NotConfirmed`] on a failed login.
    async fn login(
        &self,
        username: &str,
        password: &str,
        device_id: i32,
    ) -> Result<IssuedSession, SessionError>;

    /// Resolves an access token into a user, enforcing device binding,
    /// expiry (marking the row expired when first detected) and the
    /// confirmed-status requirement.
    async fn authenticate(
        &self,
        access_token: &str,
        device_id: i32,
    ) -> Result<AuthenticatedUser, SessionError>;

    /// Same resolution as [`SessionService::authenticate`] but tolerates an
    /// expired access credential, so a session past its access window can
    /// still be refreshed.
    async fn resolve_for_refresh(
        &self,
        access_token: &str,
        device_id: i32,
    ) -> Result<AuthenticatedUser, SessionError>;

    /// Mints a fresh access token against an unexpired refresh token bound
    /// to `user_id`. A refresh token past its window forfeits the session:
    /// the row is deleted and the call fails.
    async fn refresh(
        &self,
        user_id: i32,
        refresh_token: &str,
    ) -> Result<RefreshedAccess, SessionError>;

    /// Signed e-mail confirmation token for signup.
    fn issue_confirm_token(&self, email: &str) -> Result<String, SessionError>;

    /// Decodes a confirmation token back into the email, `None` when the
    /// token is invalid or past its window.
    fn decode_confirm_token(&self, token: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_row(status: &str, access_offset: Duration, refresh_offset: Duration) -> Token {
        let now = Utc::now();
        Token {
            id: 1,
            device_id: 7,
            user_id: 3,
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            access_expires: (now + access_offset).to_rfc3339(),
            refresh_expires: (now + refresh_offset).to_rfc3339(),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_access_state_active() {
        let token = token_row("active", Duration::minutes(10), Duration::hours(2));
        assert_eq!(access_state(&token, Utc::now()), AccessState::Active);
    }

    #[test]
    fn test_access_state_newly_expired() {
        let token = token_row("active", Duration::minutes(-1), Duration::hours(2));
        assert_eq!(
            access_state(&token, Utc::now()),
            AccessState::Expired {
                newly_detected: true
            }
        );
    }

    #[test]
    fn test_access_state_already_marked() {
        let token = token_row("expired", Duration::minutes(-1), Duration::hours(2));
        assert_eq!(
            access_state(&token, Utc::now()),
            AccessState::Expired {
                newly_detected: false
            }
        );
    }

    #[test]
    fn test_access_state_garbage_expiry_is_expired() {
        let mut token = token_row("active", Duration::minutes(10), Duration::hours(2));
        token.access_expires = "not-a-date".to_string();
        assert_eq!(
            access_state(&token, Utc::now()),
            AccessState::Expired {
                newly_detected: true
            }
        );
    }

    #[test]
    fn test_refresh_expiry() {
        let valid = token_row("active", Duration::minutes(-5), Duration::hours(1));
        assert!(!refresh_expired(&valid, Utc::now()));

        let forfeit = token_row("active", Duration::minutes(-5), Duration::minutes(-1));
        assert!(refresh_expired(&forfeit, Utc::now()));
    }
}
