//! Client-scope gating and role guards.
//!
//! Assignment edges are the only scoping signal for carer and family
//! accounts. Every client-keyed operation calls the gate BEFORE looking up
//! the target, so an out-of-scope caller learns nothing about whether the
//! target exists.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{CareError, CareResult, Identity, Role, RepositoryProvider};

/// Which client ids one identity may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientScope {
    /// Manager and admin: every client.
    Unrestricted,
    /// Carer and family: exactly the assigned set.
    Assigned(HashSet<String>),
}

impl ClientScope {
    pub fn permits(&self, client_id: &str) -> bool {
        match self {
            ClientScope::Unrestricted => true,
            ClientScope::Assigned(ids) => ids.contains(client_id),
        }
    }
}

/// Computes scopes and enforces the gate.
#[derive(Clone)]
pub struct AccessPolicy {
    repos: Arc<dyn RepositoryProvider>,
}

impl AccessPolicy {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Resolve the caller's client scope from their role and edges.
    pub async fn scope(&self, identity: &Identity) -> CareResult<ClientScope> {
        if identity.is_management() {
            return Ok(ClientScope::Unrestricted);
        }
        let ids = self
            .repos
            .assignments()
            .client_ids_for(identity.email())
            .await?;
        Ok(ClientScope::Assigned(ids))
    }

    /// The gate. Runs before any target-entity lookup; the denial message
    /// is identical whether or not the client exists.
    pub async fn require_client_access(
        &self,
        identity: &Identity,
        client_id: &str,
    ) -> CareResult<()> {
        let scope = self.scope(identity).await?;
        if scope.permits(client_id) {
            Ok(())
        } else {
            tracing::warn!(
                caller = identity.email(),
                client_id,
                "client access denied: not in assignment scope"
            );
            Err(CareError::Authorization(
                "you are not assigned to this client".to_string(),
            ))
        }
    }
}

// ── Role guards ─────────────────────────────────────────────────
//
// Pure functions over the identity tag; no storage access.

/// Manager or admin.
pub fn require_management(identity: &Identity) -> CareResult<()> {
    if identity.is_management() {
        Ok(())
    } else {
        Err(CareError::Authorization(
            "this operation requires a manager or admin account".to_string(),
        ))
    }
}

/// Manager strictly; admin does not run day-to-day care operations.
pub fn require_manager(identity: &Identity) -> CareResult<()> {
    if identity.role() == Role::Manager {
        Ok(())
    } else {
        Err(CareError::Authorization(
            "this operation requires a manager account".to_string(),
        ))
    }
}

/// Admin strictly.
pub fn require_admin(identity: &Identity) -> CareResult<()> {
    if identity.role() == Role::Admin {
        Ok(())
    } else {
        Err(CareError::Authorization(
            "this operation requires an admin account".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryRepositoryProvider;

    fn manager() -> Identity {
        Identity::Manager {
            email: "manager@carehome.com".to_string(),
            name: Some("Morgan Lee".to_string()),
            department: None,
        }
    }

    fn carer(email: &str) -> Identity {
        Identity::Carer {
            email: email.to_string(),
            name: None,
            phone: None,
        }
    }

    #[test]
    fn scope_permits() {
        assert!(ClientScope::Unrestricted.permits("C1"));

        let assigned = ClientScope::Assigned(HashSet::from(["C1".to_string()]));
        assert!(assigned.permits("C1"));
        assert!(!assigned.permits("C2"));
    }

    #[test]
    fn role_guards() {
        assert!(require_management(&manager()).is_ok());
        assert!(require_manager(&manager()).is_ok());
        assert!(require_admin(&manager()).is_err());
        assert!(require_management(&carer("c@carehome.com")).is_err());
    }

    #[tokio::test]
    async fn management_scope_is_unrestricted() {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        let policy = AccessPolicy::new(repos);
        let scope = policy.scope(&manager()).await.unwrap();
        assert_eq!(scope, ClientScope::Unrestricted);
    }

    #[tokio::test]
    async fn carer_scope_comes_from_edges() {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        repos.seed_assignment("carer@carehome.com", "C1");
        let policy = AccessPolicy::new(repos);

        let scope = policy.scope(&carer("carer@carehome.com")).await.unwrap();
        assert!(scope.permits("C1"));
        assert!(!scope.permits("C2"));

        let denied = policy
            .require_client_access(&carer("carer@carehome.com"), "C2")
            .await
            .unwrap_err();
        assert!(matches!(denied, CareError::Authorization(_)));
    }
}
