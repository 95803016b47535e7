//! User accounts.

use crate::domain::identity::{Identity, Role};

/// A directory account. The email is the primary key; `role` is fixed at
/// creation. Profile fields are role-specific: `phone` for carers and family,
/// `department` for managers, `family_id` for family members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub family_id: Option<String>,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        match user.role {
            Role::Admin => Identity::Admin {
                email: user.email,
                name: user.name,
            },
            Role::Manager => Identity::Manager {
                email: user.email,
                name: user.name,
                department: user.department,
            },
            Role::Carer => Identity::Carer {
                email: user.email,
                name: user.name,
                phone: user.phone,
            },
            Role::Family => Identity::Family {
                email: user.email,
                name: user.name,
                family_id: user.family_id,
                phone: user.phone,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: Role) -> User {
        User {
            email: "person@carehome.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            role,
            name: Some("Sam Pickering".to_string()),
            phone: Some("07700 900001".to_string()),
            department: Some("East Wing".to_string()),
            family_id: Some("FAM001".to_string()),
        }
    }

    #[test]
    fn identity_keeps_only_role_relevant_fields() {
        let carer: Identity = sample_user(Role::Carer).into();
        assert_eq!(carer.role(), Role::Carer);
        assert_eq!(carer.phone(), Some("07700 900001"));

        let manager: Identity = sample_user(Role::Manager).into();
        assert_eq!(manager.phone(), None);
        match manager {
            Identity::Manager { department, .. } => {
                assert_eq!(department.as_deref(), Some("East Wing"))
            }
            other => panic!("expected manager identity, got {other:?}"),
        }
    }
}
