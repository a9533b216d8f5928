use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::entities::devices;
use crate::models::DeviceStatus;

#[derive(Debug, Clone)]
pub struct Device {
    pub id: i32,
    pub admin_id: i32,
    pub name: String,
    pub key: String,
    pub status: String,
    pub requests: i32,
}

impl Device {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.status == DeviceStatus::Enable.as_str()
    }
}

impl From<devices::Model> for Device {
    fn from(model: devices::Model) -> Self {
        Self {
            id: model.id,
            admin_id: model.admin_id,
            name: model.name,
            key: model.key,
            status: model.status,
            requests: model.requests,
        }
    }
}

pub struct DeviceRepository {
    conn: DatabaseConnection,
}

impl DeviceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Registers a device for an admin with a fresh random key.
    pub async fn create(&self, admin_id: i32, name: &str) -> Result<Device> {
        let active = devices::ActiveModel {
            admin_id: Set(admin_id),
            name: Set(name.to_string()),
            key: Set(generate_device_key()),
            status: Set(DeviceStatus::Enable.as_str().to_string()),
            requests: Set(0),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert device")?;

        Ok(Device::from(model))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Device>> {
        let device = devices::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query device by ID")?;

        Ok(device.map(Device::from))
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Option<Device>> {
        let device = devices::Entity::find()
            .filter(devices::Column::Key.eq(key))
            .one(&self.conn)
            .await
            .context("Failed to query device by key")?;

        Ok(device.map(Device::from))
    }

    /// Name lookup is case-insensitive; stored names are lowercase.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Device>> {
        let device = devices::Entity::find()
            .filter(devices::Column::Name.eq(name.to_lowercase()))
            .one(&self.conn)
            .await
            .context("Failed to query device by name")?;

        Ok(device.map(Device::from))
    }

    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Device>> {
        let rows = devices::Entity::find()
            .filter(devices::Column::Name.contains(name.to_lowercase()))
            .all(&self.conn)
            .await
            .context("Failed to search devices by name")?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    pub async fn list_for_admin(&self, admin_id: i32) -> Result<Vec<Device>> {
        let rows = devices::Entity::find()
            .filter(devices::Column::AdminId.eq(admin_id))
            .all(&self.conn)
            .await
            .context("Failed to list devices for admin")?;

        Ok(rows.into_iter().map(Device::from).collect())
    }

    pub async fn count_for_admin(&self, admin_id: i32) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        let count = devices::Entity::find()
            .filter(devices::Column::AdminId.eq(admin_id))
            .count(&self.conn)
            .await
            .context("Failed to count devices for admin")?;

        Ok(count)
    }

    /// Records one request served through this device's key.
    /// Last write wins under concurrent increments.
    pub async fn increment_requests(&self, id: i32) -> Result<()> {
        let device = devices::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query device for request count")?
            .ok_or_else(|| anyhow::anyhow!("Device not found: {id}"))?;

        let requests = device.requests + 1;
        let mut active: devices::ActiveModel = device.into();
        active.requests = Set(requests);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Partial update: name, status and key regeneration, each optional.
    /// Returns the updated device.
    pub async fn update_fields(
        &self,
        id: i32,
        name: Option<&str>,
        status: Option<DeviceStatus>,
        refresh_key: bool,
    ) -> Result<Device> {
        let device = devices::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query device for update")?
            .ok_or_else(|| anyhow::anyhow!("Device not found: {id}"))?;

        let mut active: devices::ActiveModel = device.into();

        if let Some(name) = name {
            active.name = Set(name.to_string());
        }
        if let Some(status) = status {
            active.status = Set(status.as_str().to_string());
        }
        if refresh_key {
            active.key = Set(generate_device_key());
        }

        let model = active.update(&self.conn).await?;
        Ok(Device::from(model))
    }

    pub async fn regenerate_key(&self, id: i32) -> Result<Device> {
        self.update_fields(id, None, None, true).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = devices::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete device")?;

        Ok(result.rows_affected > 0)
    }
}

/// Opaque device key: UUID v4 as 32 hex chars.
#[must_use]
pub fn generate_device_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
