//! JWT claims for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::roles::UserRole;

/// Claims embedded in access tokens.
///
/// Permissions are not carried in the token; they are derived from `role`
/// so that changing a role's grants does not require reissuing tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.role.has_permission(permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","role":"admin","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.has_permission("pages:manage"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"sub":"u","email":"u@test.com","role":"editor","exp":1,"iat":1}"#;
        assert!(serde_json::from_str::<Claims>(json).is_err());
    }
}
