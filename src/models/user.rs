use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    #[default]
    Player,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Player => "player",
        }
    }

    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role strings are matched exactly; `Manager` is not a manager.
impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "player" => Ok(Self::Player),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub age: Option<i32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub position: Option<String>,
    pub county: Option<String>,
}

/// Account as exposed outside the store. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_info: ProfileInfo,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Replacement values for a profile update. Every field is written,
/// including the `None`s.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub profile_info: ProfileInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("player".parse::<Role>(), Ok(Role::Player));
        assert!("Manager".parse::<Role>().is_err());
        assert!("coach".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
        let role: Role = serde_json::from_str("\"player\"").unwrap();
        assert_eq!(role, Role::Player);
    }

    #[test]
    fn test_profile_update_omitted_fields_are_none() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"name":"Aoife"}"#).unwrap();
        assert_eq!(update.name, "Aoife");
        assert!(update.image_url.is_none());
        assert_eq!(update.profile_info, ProfileInfo::default());
    }
}
