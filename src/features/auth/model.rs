use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity attached to a request after token validation. The subject is the
/// external identity provider's user id; this service keeps no user table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user may manage categories and item lifecycle
    pub fn is_admin(&self) -> bool {
        self.has_role(crate::shared::constants::ROLE_ADMIN)
    }
}

/// JWT claims expected from the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: u64,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{create_admin_user, create_regular_user};

    #[test]
    fn admin_role_grants_admin() {
        let user = create_admin_user();
        assert!(user.is_admin());
        assert!(user.has_role("admin"));
    }

    #[test]
    fn regular_user_is_not_admin() {
        let user = create_regular_user("user-123");
        assert!(!user.is_admin());
        assert!(!user.has_role("admin"));
        assert_eq!(user.sub, "user-123");
    }
}
