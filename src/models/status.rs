//! Closed status and role vocabularies shared by entities, validation and
//! the API layer. Stored in the database as their lowercase string form.

use serde::{Deserialize, Serialize};

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            /// Parses the stored string form. Returns `None` for anything
            /// outside the closed set.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            #[must_use]
            pub const fn values() -> &'static [&'static str] {
                &[$($value),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(Gender {
    Male => "male",
    Female => "female",
});

string_enum!(UserStatus {
    Unconfirmed => "unconfirmed",
    Confirmed => "confirmed",
    Frozen => "frozen",
    Deleted => "deleted",
});

string_enum!(AdminRole {
    Admin => "admin",
    Moder => "moder",
});

string_enum!(DeviceStatus {
    Enable => "enable",
    Disable => "disable",
});

string_enum!(TokenStatus {
    Active => "active",
    Expired => "expired",
});

string_enum!(RecipeComplexity {
    Easy => "easy",
    Medium => "medium",
    Hard => "hard",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for value in UserStatus::values() {
            assert_eq!(UserStatus::parse(value).unwrap().as_str(), *value);
        }
        for value in DeviceStatus::values() {
            assert_eq!(DeviceStatus::parse(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(UserStatus::parse("banned").is_none());
        assert!(AdminRole::parse("root").is_none());
        assert!(AdminRole::parse("Admin").is_none());
        assert!(RecipeComplexity::parse("impossible").is_none());
    }
}
