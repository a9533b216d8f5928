use serde::{Deserialize, Serialize};

use crate::db::{Recipe, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public profile: everything but the credentials.
#[derive(Debug, Serialize)]
pub struct PublicUserDto {
    pub id: i32,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub time_created: String,
}

impl From<User> for PublicUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname(),
            username: user.username,
            email: user.email,
            time_created: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersDto {
    pub users: Vec<PublicUserDto>,
}

#[derive(Debug, Serialize)]
pub struct AdminDto {
    pub id: i32,
    pub role: String,
    pub fullname: String,
    pub username: String,
    pub devices: u64,
    pub time_created: String,
}

#[derive(Debug, Serialize)]
pub struct AdminsDto {
    pub admins: Vec<AdminDto>,
}

#[derive(Debug, Serialize)]
pub struct DeviceDto {
    pub id: i32,
    pub admin_id: i32,
    pub name: String,
    pub status: String,
    pub key: String,
    pub requests: i32,
}

impl From<crate::db::Device> for DeviceDto {
    fn from(device: crate::db::Device) -> Self {
        Self {
            id: device.id,
            admin_id: device.admin_id,
            name: device.name,
            status: device.status,
            key: device.key,
            requests: device.requests,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DevicesDto {
    pub devices: Vec<DeviceDto>,
}

#[derive(Debug, Serialize)]
pub struct TokenDto {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeDto {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub complexity: String,
    pub cooking_time: i32,
    pub instruction: String,
    pub time_created: String,
}

impl From<Recipe> for RecipeDto {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title,
            description: recipe.description,
            complexity: recipe.complexity,
            cooking_time: recipe.cooking_time,
            instruction: recipe.instruction,
            time_created: recipe.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipesDto {
    pub recipes: Vec<RecipeDto>,
}

/// Query parameters for the device search endpoint.
#[derive(Debug, Deserialize)]
pub struct DeviceSearchQuery {
    #[serde(default)]
    pub name: String,
}
