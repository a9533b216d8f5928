use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::admins;
use crate::models::AdminRole;

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i32,
    pub role: String,
    pub created_at: String,
}

impl Admin {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == AdminRole::Admin.as_str()
    }
}

impl From<admins::Model> for Admin {
    fn from(model: admins::Model) -> Self {
        Self {
            id: model.id,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

pub struct AdminRepository {
    conn: DatabaseConnection,
}

impl AdminRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Admin>> {
        let admin = admins::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query admin by ID")?;

        Ok(admin.map(Admin::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Admin>> {
        let rows = admins::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list admins")?;

        Ok(rows.into_iter().map(Admin::from).collect())
    }

    /// Grants or changes a role. The row id is the user id, so granting a
    /// role to a user who already holds one updates the existing record.
    pub async fn upsert(&self, user_id: i32, role: AdminRole) -> Result<Admin> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = if let Some(existing) = admins::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query admin for upsert")?
        {
            let mut active: admins::ActiveModel = existing.into();
            active.role = Set(role.as_str().to_string());
            active.updated_at = Set(now);
            active.update(&self.conn).await?
        } else {
            let active = admins::ActiveModel {
                id: Set(user_id),
                role: Set(role.as_str().to_string()),
                created_at: Set(now.clone()),
                updated_at: Set(now),
            };
            active.insert(&self.conn).await?
        };

        Ok(Admin::from(model))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = admins::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete admin")?;

        Ok(result.rows_affected > 0)
    }
}
