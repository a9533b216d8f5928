pub mod status;

pub use status::{AdminRole, DeviceStatus, Gender, RecipeComplexity, TokenStatus, UserStatus};
