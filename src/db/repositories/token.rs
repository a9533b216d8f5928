use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::tokens;
use crate::models::TokenStatus;

#[derive(Debug, Clone)]
pub struct Token {
    pub id: i32,
    pub device_id: i32,
    pub user_id: i32,
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires: String,
    pub refresh_expires: String,
    pub status: String,
}

impl From<tokens::Model> for Token {
    fn from(model: tokens::Model) -> Self {
        Self {
            id: model.id,
            device_id: model.device_id,
            user_id: model.user_id,
            access_token: model.access_token,
            refresh_token: model.refresh_token,
            access_expires: model.access_expires,
            refresh_expires: model.refresh_expires,
            status: model.status,
        }
    }
}

/// Freshly minted credential pair with its expiry instants.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires: String,
    pub refresh_expires: String,
}

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_access_token(&self, access_token: &str) -> Result<Option<Token>> {
        let token = tokens::Entity::find()
            .filter(tokens::Column::AccessToken.eq(access_token))
            .one(&self.conn)
            .await
            .context("Failed to query token by access value")?;

        Ok(token.map(Token::from))
    }

    pub async fn get_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Token>> {
        let token = tokens::Entity::find()
            .filter(tokens::Column::RefreshToken.eq(refresh_token))
            .one(&self.conn)
            .await
            .context("Failed to query token by refresh value")?;

        Ok(token.map(Token::from))
    }

    pub async fn get_by_user_and_device(
        &self,
        user_id: i32,
        device_id: i32,
    ) -> Result<Option<Token>> {
        let token = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id))
            .filter(tokens::Column::DeviceId.eq(device_id))
            .one(&self.conn)
            .await
            .context("Failed to query token by user and device")?;

        Ok(token.map(Token::from))
    }

    /// At most one row exists per (user, device): an existing row is
    /// overwritten in place, never duplicated.
    pub async fn upsert_session(
        &self,
        user_id: i32,
        device_id: i32,
        issued: &IssuedTokens,
    ) -> Result<Token> {
        let model = if let Some(existing) = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id))
            .filter(tokens::Column::DeviceId.eq(device_id))
            .one(&self.conn)
            .await
            .context("Failed to query token for session upsert")?
        {
            let mut active: tokens::ActiveModel = existing.into();
            active.access_token = Set(issued.access_token.clone());
            active.refresh_token = Set(issued.refresh_token.clone());
            active.access_expires = Set(issued.access_expires.clone());
            active.refresh_expires = Set(issued.refresh_expires.clone());
            active.status = Set(TokenStatus::Active.as_str().to_string());
            active.update(&self.conn).await?
        } else {
            let active = tokens::ActiveModel {
                user_id: Set(user_id),
                device_id: Set(device_id),
                access_token: Set(issued.access_token.clone()),
                refresh_token: Set(issued.refresh_token.clone()),
                access_expires: Set(issued.access_expires.clone()),
                refresh_expires: Set(issued.refresh_expires.clone()),
                status: Set(TokenStatus::Active.as_str().to_string()),
                ..Default::default()
            };
            active.insert(&self.conn).await?
        };

        Ok(Token::from(model))
    }

    /// Replaces the access token on an existing row, preserving the refresh
    /// token, and brings the session back to active.
    pub async fn update_access(
        &self,
        id: i32,
        access_token: &str,
        access_expires: &str,
    ) -> Result<Token> {
        let token = tokens::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query token for access update")?
            .ok_or_else(|| anyhow::anyhow!("Token not found: {id}"))?;

        let mut active: tokens::ActiveModel = token.into();
        active.access_token = Set(access_token.to_string());
        active.access_expires = Set(access_expires.to_string());
        active.status = Set(TokenStatus::Active.as_str().to_string());
        let model = active.update(&self.conn).await?;

        Ok(Token::from(model))
    }

    pub async fn mark_expired(&self, id: i32) -> Result<()> {
        tokens::Entity::update_many()
            .col_expr(
                tokens::Column::Status,
                sea_orm::sea_query::Expr::value(TokenStatus::Expired.as_str()),
            )
            .filter(tokens::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to mark token expired")?;

        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = tokens::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete token")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_for_user(&self, user_id: i32) -> Result<u64> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete tokens for user")?;

        Ok(result.rows_affected)
    }

    pub async fn delete_for_device(&self, device_id: i32) -> Result<u64> {
        let result = tokens::Entity::delete_many()
            .filter(tokens::Column::DeviceId.eq(device_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete tokens for device")?;

        Ok(result.rows_affected)
    }
}
