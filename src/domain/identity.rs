//! Authenticated identities and roles.
//!
//! [`Identity`] is the tag handed to every service call after token
//! resolution. The variant carries exactly the profile fields that exist for
//! that role, so downstream code matches on the tag instead of inspecting
//! optional columns. Roles are fixed at account creation and never change
//! for the lifetime of the account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CareError;

/// Account role. Determines authority, never carries profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Carer,
    Family,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Carer => "carer",
            Role::Family => "family",
        }
    }

    /// Admin and manager see every client; carer and family only assigned ones.
    pub fn is_management(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Account administration matrix: who may create/update/delete whom.
    /// Admins administer managers, carers and family; managers administer
    /// carers and family. Nobody administers admins in-band.
    pub fn administers(&self, target: Role) -> bool {
        match self {
            Role::Admin => target != Role::Admin,
            Role::Manager => matches!(target, Role::Carer | Role::Family),
            Role::Carer | Role::Family => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "carer" => Ok(Role::Carer),
            "family" => Ok(Role::Family),
            other => Err(CareError::Validation(format!(
                "unknown role '{other}', expected one of: admin, manager, carer, family"
            ))),
        }
    }
}

/// An authenticated account, tagged by role with role-specific profile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Admin {
        email: String,
        name: Option<String>,
    },
    Manager {
        email: String,
        name: Option<String>,
        department: Option<String>,
    },
    Carer {
        email: String,
        name: Option<String>,
        phone: Option<String>,
    },
    Family {
        email: String,
        name: Option<String>,
        family_id: Option<String>,
        phone: Option<String>,
    },
}

impl Identity {
    pub fn email(&self) -> &str {
        match self {
            Identity::Admin { email, .. }
            | Identity::Manager { email, .. }
            | Identity::Carer { email, .. }
            | Identity::Family { email, .. } => email,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Identity::Admin { .. } => Role::Admin,
            Identity::Manager { .. } => Role::Manager,
            Identity::Carer { .. } => Role::Carer,
            Identity::Family { .. } => Role::Family,
        }
    }

    pub fn is_management(&self) -> bool {
        self.role().is_management()
    }

    /// Profile name, falling back to the email for accounts created without one.
    pub fn display_name(&self) -> &str {
        let name = match self {
            Identity::Admin { name, .. }
            | Identity::Manager { name, .. }
            | Identity::Carer { name, .. }
            | Identity::Family { name, .. } => name,
        };
        name.as_deref().unwrap_or_else(|| self.email())
    }

    /// Contact number, present only on carer and family identities.
    pub fn phone(&self) -> Option<&str> {
        match self {
            Identity::Carer { phone, .. } | Identity::Family { phone, .. } => phone.as_deref(),
            Identity::Admin { .. } | Identity::Manager { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Manager, Role::Carer, Role::Family] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_lists_legal_values() {
        let err = "supervisor".parse::<Role>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("admin"));
        assert!(msg.contains("family"));
    }

    #[test]
    fn administration_matrix() {
        assert!(Role::Admin.administers(Role::Manager));
        assert!(Role::Admin.administers(Role::Carer));
        assert!(!Role::Admin.administers(Role::Admin));
        assert!(Role::Manager.administers(Role::Carer));
        assert!(Role::Manager.administers(Role::Family));
        assert!(!Role::Manager.administers(Role::Manager));
        assert!(!Role::Carer.administers(Role::Family));
        assert!(!Role::Family.administers(Role::Family));
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let anon = Identity::Admin {
            email: "admin@carehome.com".to_string(),
            name: None,
        };
        assert_eq!(anon.display_name(), "admin@carehome.com");

        let named = Identity::Carer {
            email: "jo@carehome.com".to_string(),
            name: Some("Jo Daniels".to_string()),
            phone: Some("07700 900123".to_string()),
        };
        assert_eq!(named.display_name(), "Jo Daniels");
        assert_eq!(named.phone(), Some("07700 900123"));
    }

    #[test]
    fn management_tags() {
        let manager = Identity::Manager {
            email: "m@carehome.com".to_string(),
            name: None,
            department: Some("Dementia Ward".to_string()),
        };
        assert!(manager.is_management());
        assert_eq!(manager.role(), Role::Manager);

        let family = Identity::Family {
            email: "f@example.com".to_string(),
            name: None,
            family_id: Some("FAM100".to_string()),
            phone: None,
        };
        assert!(!family.is_management());
    }
}
