pub mod admin;
pub mod device;
pub mod recipe;
pub mod token;
pub mod user;
