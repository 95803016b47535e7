//! Assignment management: linking carers and family members to clients.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::domain::assignment::{AssignOutcome, Assignment, CareTeam, UnassignOutcome};
use crate::domain::audit::AuditEntry;
use crate::domain::{CareError, CareResult, Identity, Role, RepositoryProvider};

use super::access::require_management;

pub struct AssignmentService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AssignmentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Link a carer or family member to a client. Idempotent: an existing
    /// edge reports `AlreadyAssigned` and writes no second edge and no
    /// second audit entry.
    pub async fn assign(
        &self,
        caller: &Identity,
        user_email: &str,
        client_id: &str,
    ) -> CareResult<AssignOutcome> {
        require_management(caller)?;

        let Some(user) = self.repos.users().find_by_email(user_email).await? else {
            return Err(CareError::not_found("user", "email", user_email));
        };
        if !matches!(user.role, Role::Carer | Role::Family) {
            return Err(CareError::Validation(format!(
                "only carers and family members can be assigned, {} is a {}",
                user_email, user.role
            )));
        }
        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }

        let audit = AuditEntry::assigned(caller.email(), &Assignment::edge_id(user_email, client_id));
        let outcome = self.repos.assignments().link(user_email, client_id, audit).await?;

        match outcome {
            AssignOutcome::Assigned => {
                info!(user_email, client_id, by = caller.email(), "assignment created")
            }
            AssignOutcome::AlreadyAssigned => {
                info!(user_email, client_id, "assignment already present")
            }
        }
        Ok(outcome)
    }

    /// Remove an edge. Removing an edge that is not there is a no-op result.
    pub async fn unassign(
        &self,
        caller: &Identity,
        user_email: &str,
        client_id: &str,
    ) -> CareResult<UnassignOutcome> {
        require_management(caller)?;

        if self.repos.users().find_by_email(user_email).await?.is_none() {
            return Err(CareError::not_found("user", "email", user_email));
        }
        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }

        let audit =
            AuditEntry::unassigned(caller.email(), &Assignment::edge_id(user_email, client_id));
        let outcome = self.repos.assignments().unlink(user_email, client_id, audit).await?;

        if outcome == UnassignOutcome::Unassigned {
            info!(user_email, client_id, by = caller.email(), "assignment removed");
        }
        Ok(outcome)
    }

    /// Client ids a user is assigned to. Readable by the user themselves and
    /// by management.
    pub async fn assigned_clients(
        &self,
        caller: &Identity,
        user_email: &str,
    ) -> CareResult<HashSet<String>> {
        if caller.email() != user_email {
            require_management(caller)?;
        }
        self.repos.assignments().client_ids_for(user_email).await
    }

    /// Everyone assigned to a client, split into carers and family.
    pub async fn care_team(&self, caller: &Identity, client_id: &str) -> CareResult<CareTeam> {
        require_management(caller)?;

        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }
        let users = self.repos.assignments().users_for_client(client_id).await?;
        Ok(CareTeam::from_users(&users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Client;
    use crate::domain::user::User;
    use crate::infrastructure::memory::MemoryRepositoryProvider;
    use chrono::NaiveDate;

    fn manager() -> Identity {
        Identity::Manager {
            email: "manager@carehome.com".to_string(),
            name: None,
            department: None,
        }
    }

    fn seeded() -> (Arc<MemoryRepositoryProvider>, AssignmentService) {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        repos.seed_user(User {
            email: "carer@carehome.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Carer,
            name: Some("Jo Daniels".to_string()),
            phone: Some("07700 900123".to_string()),
            department: None,
            family_id: None,
        });
        repos.seed_user(User {
            email: "family@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Family,
            name: Some("Pat Daniels".to_string()),
            phone: None,
            department: None,
            family_id: Some("FAM001".to_string()),
        });
        repos.seed_client(Client {
            id: "C1".to_string(),
            name: "Edith Hale".to_string(),
            age: 88,
            room: "12".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1937, 5, 2).unwrap(),
            support_needs: None,
        });
        let service = AssignmentService::new(repos.clone());
        (repos, service)
    }

    #[tokio::test]
    async fn assign_is_idempotent_with_single_audit_entry() {
        let (repos, service) = seeded();
        let caller = manager();

        let first = service.assign(&caller, "carer@carehome.com", "C1").await.unwrap();
        assert_eq!(first, AssignOutcome::Assigned);

        let second = service.assign(&caller, "carer@carehome.com", "C1").await.unwrap();
        assert_eq!(second, AssignOutcome::AlreadyAssigned);

        let edges = repos.assignments().client_ids_for("carer@carehome.com").await.unwrap();
        assert_eq!(edges.len(), 1);

        let trail = repos.audit().recent(10).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "assigned");
        assert_eq!(trail[0].entity_id, "carer@carehome.com:C1");
    }

    #[tokio::test]
    async fn unassign_missing_edge_is_a_noop() {
        let (repos, service) = seeded();
        let caller = manager();

        let outcome = service.unassign(&caller, "carer@carehome.com", "C1").await.unwrap();
        assert_eq!(outcome, UnassignOutcome::NotAssigned);
        assert!(repos.audit().recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unassign_removes_edge_and_audits_once() {
        let (repos, service) = seeded();
        let caller = manager();
        service.assign(&caller, "carer@carehome.com", "C1").await.unwrap();

        let outcome = service.unassign(&caller, "carer@carehome.com", "C1").await.unwrap();
        assert_eq!(outcome, UnassignOutcome::Unassigned);

        let edges = repos.assignments().client_ids_for("carer@carehome.com").await.unwrap();
        assert!(edges.is_empty());

        let trail = repos.audit().recent(10).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].action, "unassigned");
    }

    #[tokio::test]
    async fn only_carer_and_family_roles_can_be_assigned() {
        let (repos, service) = seeded();
        repos.seed_user(User {
            email: "boss@carehome.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Manager,
            name: None,
            phone: None,
            department: None,
            family_id: None,
        });

        let err = service.assign(&manager(), "boss@carehome.com", "C1").await.unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));
    }

    #[tokio::test]
    async fn assign_rejects_unknown_user_or_client() {
        let (_repos, service) = seeded();

        let err = service.assign(&manager(), "ghost@carehome.com", "C1").await.unwrap_err();
        assert!(matches!(err, CareError::NotFound { entity: "user", .. }));

        let err = service.assign(&manager(), "carer@carehome.com", "C999").await.unwrap_err();
        assert!(matches!(err, CareError::NotFound { entity: "client", .. }));
    }

    #[tokio::test]
    async fn non_management_cannot_touch_assignments() {
        let (_repos, service) = seeded();
        let carer = Identity::Carer {
            email: "carer@carehome.com".to_string(),
            name: None,
            phone: None,
        };

        let err = service.assign(&carer, "family@example.com", "C1").await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn care_team_splits_by_role() {
        let (_repos, service) = seeded();
        let caller = manager();
        service.assign(&caller, "carer@carehome.com", "C1").await.unwrap();
        service.assign(&caller, "family@example.com", "C1").await.unwrap();

        let team = service.care_team(&caller, "C1").await.unwrap();
        assert_eq!(team.carers.len(), 1);
        assert_eq!(team.family.len(), 1);
        assert_eq!(team.carers[0].phone.as_deref(), Some("07700 900123"));
        assert_eq!(team.family[0].family_id.as_deref(), Some("FAM001"));
    }

    #[tokio::test]
    async fn assigned_clients_is_self_or_management() {
        let (_repos, service) = seeded();
        service.assign(&manager(), "carer@carehome.com", "C1").await.unwrap();

        let own = Identity::Carer {
            email: "carer@carehome.com".to_string(),
            name: None,
            phone: None,
        };
        let ids = service.assigned_clients(&own, "carer@carehome.com").await.unwrap();
        assert!(ids.contains("C1"));

        let other = Identity::Carer {
            email: "other@carehome.com".to_string(),
            name: None,
            phone: None,
        };
        let err = service
            .assigned_clients(&other, "carer@carehome.com")
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }
}
