use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;
use crate::models::{AdminRole, DeviceStatus, Gender, RecipeComplexity};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{1,50}$").expect("valid regex"));
static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{7,50}$").expect("valid regex"));
static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{1,50}$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));
static DEVICE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]{2,80}$").expect("valid regex"));
static RECIPE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\- ]{1,80}$").expect("valid regex"));

/// Normalizes to lowercase; letters, digits and underscores only.
pub fn validate_username(username: &str) -> Result<String, ApiError> {
    if !USERNAME_RE.is_match(username) {
        return Err(ApiError::validation(
            "Username must be 1-50 characters of letters, digits and underscores",
        ));
    }
    Ok(username.to_lowercase())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if !PASSWORD_RE.is_match(password) {
        return Err(ApiError::validation(
            "Password must be 7-50 alphanumeric characters",
        ));
    }
    Ok(())
}

/// Normalizes to "Firstletter" capitalization.
pub fn validate_person_name(field: &str, value: &str) -> Result<String, ApiError> {
    if !PERSON_NAME_RE.is_match(value) {
        return Err(ApiError::validation(format!(
            "{field} must be 1-50 alphabetic characters"
        )));
    }

    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    let capitalized = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    });

    Ok(capitalized)
}

pub fn validate_email(email: &str) -> Result<String, ApiError> {
    if email.len() > 100 || !EMAIL_RE.is_match(email) {
        return Err(ApiError::validation("Invalid e-mail address"));
    }
    Ok(email.to_lowercase())
}

pub fn validate_sex(sex: Option<&str>) -> Result<Option<String>, ApiError> {
    match sex {
        None => Ok(None),
        Some(value) => Gender::parse(value)
            .map(|g| Some(g.as_str().to_string()))
            .ok_or_else(|| ApiError::validation("Sex must be one of: male, female")),
    }
}

pub fn validate_birth_date(birth_date: &str) -> Result<String, ApiError> {
    chrono::NaiveDate::parse_from_str(birth_date, "%Y-%m-%d")
        .map(|d| d.to_string())
        .map_err(|_| ApiError::validation("Birth date must be an ISO-8601 date (YYYY-MM-DD)"))
}

/// Normalizes to lowercase; letters, digits and hyphens only.
pub fn validate_device_name(name: &str) -> Result<String, ApiError> {
    let lowered = name.to_lowercase();
    if !DEVICE_NAME_RE.is_match(&lowered) {
        return Err(ApiError::validation(
            "Device name must be 2-80 characters of lowercase letters, digits and hyphens",
        ));
    }
    Ok(lowered)
}

pub fn validate_device_status(status: &str) -> Result<DeviceStatus, ApiError> {
    DeviceStatus::parse(status).ok_or_else(|| {
        ApiError::validation(format!(
            "Device status must be one of: {}",
            DeviceStatus::values().join(", ")
        ))
    })
}

pub fn validate_admin_role(role: &str) -> Result<AdminRole, ApiError> {
    AdminRole::parse(role).ok_or_else(|| {
        ApiError::validation(format!(
            "Role must be one of: {}",
            AdminRole::values().join(", ")
        ))
    })
}

pub fn validate_recipe_title(title: &str) -> Result<&str, ApiError> {
    if !RECIPE_TITLE_RE.is_match(title) {
        return Err(ApiError::validation(
            "Title must be 1-80 characters of letters, spaces and hyphens",
        ));
    }
    Ok(title)
}

pub fn validate_complexity(complexity: &str) -> Result<RecipeComplexity, ApiError> {
    RecipeComplexity::parse(complexity).ok_or_else(|| {
        ApiError::validation(format!(
            "Complexity must be one of: {}",
            RecipeComplexity::values().join(", ")
        ))
    })
}

pub fn validate_cooking_time(minutes: i32) -> Result<i32, ApiError> {
    if minutes <= 0 {
        return Err(ApiError::validation(
            "Cooking time must be a positive number of minutes",
        ));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("Alice_01").unwrap(), "alice_01");
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("secret").is_err());
        assert!(validate_password("has space1").is_err());
    }

    #[test]
    fn test_validate_person_name() {
        assert_eq!(validate_person_name("first_name", "aLiCe").unwrap(), "Alice");
        assert!(validate_person_name("first_name", "al1ce").is_err());
        assert!(validate_person_name("first_name", "").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("A@x.Com").unwrap(), "a@x.com");
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email(&format!("{}@x.com", "a".repeat(100))).is_err());
    }

    #[test]
    fn test_validate_device_name() {
        assert_eq!(validate_device_name("Kitchen-Tablet").unwrap(), "kitchen-tablet");
        assert!(validate_device_name("a").is_err());
        assert!(validate_device_name("no spaces").is_err());
    }

    #[test]
    fn test_validate_recipe_fields() {
        assert!(validate_recipe_title("Beef Stew").is_ok());
        assert!(validate_recipe_title("Stew #2").is_err());
        assert!(validate_complexity("medium").is_ok());
        assert!(validate_complexity("extreme").is_err());
        assert!(validate_cooking_time(45).is_ok());
        assert!(validate_cooking_time(0).is_err());
    }
}
