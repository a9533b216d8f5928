pub use super::admins::Entity as Admins;
pub use super::devices::Entity as Devices;
pub use super::recipes::Entity as Recipes;
pub use super::tokens::Entity as Tokens;
pub use super::users::Entity as Users;
