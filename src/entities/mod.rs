pub mod prelude;

pub mod admins;
pub mod devices;
pub mod recipes;
pub mod tokens;
pub mod users;
