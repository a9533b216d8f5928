use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::{AdminRole, DeviceStatus, RecipeComplexity, UserStatus};

pub mod migrator;
pub mod repositories;

pub use repositories::admin::Admin;
pub use repositories::device::Device;
pub use repositories::recipe::{NewRecipe, Recipe};
pub use repositories::token::{IssuedTokens, Token};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn device_repo(&self) -> repositories::device::DeviceRepository {
        repositories::device::DeviceRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    fn recipe_repo(&self) -> repositories::recipe::RecipeRepository {
        repositories::recipe::RecipeRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(&self, new_user: NewUser, status: UserStatus) -> Result<User> {
        self.user_repo().create(new_user, status).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_details(
        &self,
        user_id: i32,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<User> {
        self.user_repo()
            .update_details(user_id, username, email, password)
            .await
    }

    pub async fn set_user_status(&self, user_id: i32, status: UserStatus) -> Result<()> {
        self.user_repo().set_status(user_id, status).await
    }

    /// Freezes an account pending recovery. Returns the user, or `None`
    /// when no account matches the e-mail.
    pub async fn freeze_account(&self, email: &str) -> Result<Option<User>> {
        let Some(user) = self.get_user_by_email(email).await? else {
            return Ok(None);
        };
        self.user_repo()
            .set_status(user.id, UserStatus::Frozen)
            .await?;
        self.get_user(user.id).await
    }

    /// Recovers a frozen account with a new password. The only transition
    /// back towards `confirmed`.
    pub async fn recover_account(&self, email: &str, new_password: &str) -> Result<Option<User>> {
        let Some(user) = self.get_user_by_email(email).await? else {
            return Ok(None);
        };
        self.user_repo()
            .update_details(user.id, None, None, Some(new_password))
            .await?;
        self.user_repo()
            .set_status(user.id, UserStatus::Confirmed)
            .await?;
        self.get_user(user.id).await
    }

    /// Removes a user together with its sessions. When the user holds an
    /// administrative role, the role's device/token chain goes first.
    pub async fn delete_user(&self, user_id: i32) -> Result<bool> {
        if self.get_admin(user_id).await?.is_some() {
            self.delete_admin_cascading(user_id).await?;
        }
        self.token_repo().delete_for_user(user_id).await?;
        self.user_repo().delete(user_id).await
    }

    // ========== Admins ==========

    pub async fn get_admin(&self, id: i32) -> Result<Option<Admin>> {
        self.admin_repo().get_by_id(id).await
    }

    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.admin_repo().list_all().await
    }

    pub async fn upsert_admin(&self, user_id: i32, role: AdminRole) -> Result<Admin> {
        self.admin_repo().upsert(user_id, role).await
    }

    /// Deletes an admin with its full chain: every owned device first drops
    /// its tokens, then the device, then the admin row. No orphans remain.
    pub async fn delete_admin_cascading(&self, admin_id: i32) -> Result<bool> {
        for device in self.device_repo().list_for_admin(admin_id).await? {
            self.delete_device_cascading(device.id).await?;
        }
        self.admin_repo().delete(admin_id).await
    }

    // ========== Devices ==========

    pub async fn create_device(&self, admin_id: i32, name: &str) -> Result<Device> {
        self.device_repo().create(admin_id, name).await
    }

    pub async fn get_device(&self, id: i32) -> Result<Option<Device>> {
        self.device_repo().get_by_id(id).await
    }

    pub async fn get_device_by_key(&self, key: &str) -> Result<Option<Device>> {
        self.device_repo().get_by_key(key).await
    }

    pub async fn get_device_by_name(&self, name: &str) -> Result<Option<Device>> {
        self.device_repo().get_by_name(name).await
    }

    pub async fn search_devices_by_name(&self, name: &str) -> Result<Vec<Device>> {
        self.device_repo().search_by_name(name).await
    }

    pub async fn count_devices_for_admin(&self, admin_id: i32) -> Result<u64> {
        self.device_repo().count_for_admin(admin_id).await
    }

    pub async fn add_device_request(&self, device_id: i32) -> Result<()> {
        self.device_repo().increment_requests(device_id).await
    }

    pub async fn update_device_fields(
        &self,
        device_id: i32,
        name: Option<&str>,
        status: Option<DeviceStatus>,
        refresh_key: bool,
    ) -> Result<Device> {
        self.device_repo()
            .update_fields(device_id, name, status, refresh_key)
            .await
    }

    pub async fn regenerate_device_key(&self, device_id: i32) -> Result<Device> {
        self.device_repo().regenerate_key(device_id).await
    }

    /// Deletes a device, dropping its tokens first.
    pub async fn delete_device_cascading(&self, device_id: i32) -> Result<bool> {
        self.token_repo().delete_for_device(device_id).await?;
        self.device_repo().delete(device_id).await
    }

    // ========== Tokens ==========

    pub async fn get_token_by_access(&self, access_token: &str) -> Result<Option<Token>> {
        self.token_repo().get_by_access_token(access_token).await
    }

    pub async fn get_token_by_refresh(&self, refresh_token: &str) -> Result<Option<Token>> {
        self.token_repo().get_by_refresh_token(refresh_token).await
    }

    pub async fn get_token_by_user_and_device(
        &self,
        user_id: i32,
        device_id: i32,
    ) -> Result<Option<Token>> {
        self.token_repo()
            .get_by_user_and_device(user_id, device_id)
            .await
    }

    pub async fn upsert_session(
        &self,
        user_id: i32,
        device_id: i32,
        issued: &IssuedTokens,
    ) -> Result<Token> {
        self.token_repo()
            .upsert_session(user_id, device_id, issued)
            .await
    }

    pub async fn update_token_access(
        &self,
        token_id: i32,
        access_token: &str,
        access_expires: &str,
    ) -> Result<Token> {
        self.token_repo()
            .update_access(token_id, access_token, access_expires)
            .await
    }

    pub async fn mark_token_expired(&self, token_id: i32) -> Result<()> {
        self.token_repo().mark_expired(token_id).await
    }

    pub async fn delete_token(&self, token_id: i32) -> Result<bool> {
        self.token_repo().delete(token_id).await
    }

    // ========== Recipes ==========

    pub async fn create_recipe(&self, user_id: i32, recipe: NewRecipe) -> Result<Recipe> {
        self.recipe_repo().create(user_id, recipe).await
    }

    pub async fn get_recipe(&self, id: i32) -> Result<Option<Recipe>> {
        self.recipe_repo().get_by_id(id).await
    }

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.recipe_repo().list_all().await
    }

    pub async fn update_recipe_fields(
        &self,
        id: i32,
        title: Option<&str>,
        description: Option<&str>,
        complexity: Option<RecipeComplexity>,
        cooking_time: Option<i32>,
        instruction: Option<&str>,
    ) -> Result<Recipe> {
        self.recipe_repo()
            .update_fields(id, title, description, complexity, cooking_time, instruction)
            .await
    }

    pub async fn delete_recipe(&self, id: i32) -> Result<bool> {
        self.recipe_repo().delete(id).await
    }
}
