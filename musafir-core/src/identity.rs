use serde::{Deserialize, Serialize};

/// Roles a caller can present. Hosts (hotel managers, guides, agencies) and
/// admins may view bookings they do not own; tourists only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tourist,
    Guide,
    Agency,
    Hotel,
    Admin,
}

impl Role {
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Hotel | Role::Guide | Role::Agency)
    }
}

/// The authenticated caller, as established by the identity layer.
/// The booking core trusts these facts fully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_privileges() {
        assert!(!Role::Tourist.is_privileged());
        assert!(Role::Admin.is_privileged());
        assert!(Role::Hotel.is_privileged());
        assert!(Role::Guide.is_privileged());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tourist).unwrap(), "\"tourist\"");
        let role: Role = serde_json::from_str("\"guide\"").unwrap();
        assert_eq!(role, Role::Guide);
    }
}
