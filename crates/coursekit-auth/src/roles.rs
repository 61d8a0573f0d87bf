//! Roles carried in access tokens and the permissions they grant.

use std::fmt;
use std::str::FromStr;

use coursekit_core::permissions;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Course authors: every permission, including draft visibility.
    Admin,
    /// Signed-in learners: read-only access to published content.
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Self::Admin => permissions::ALL,
            Self::User => &[],
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_permission() {
        for permission in permissions::ALL {
            assert!(UserRole::Admin.has_permission(permission));
        }
    }

    #[test]
    fn test_user_has_none() {
        assert!(UserRole::User.permissions().is_empty());
        assert!(!UserRole::User.has_permission(permissions::PAGES_MANAGE));
        assert!(!UserRole::User.has_permission(permissions::DRAFTS_READ));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("editor".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), r#""admin""#);
        let role: UserRole = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, UserRole::User);
    }
}
