//! Resident (client) management and scoped views.

use std::sync::Arc;

use tracing::info;

use crate::domain::audit::AuditEntry;
use crate::domain::client::{Client, ClientView, CreateClientDto, UpdateClientDto};
use crate::domain::{CareError, CareResult, Identity, RepositoryProvider};

use super::access::{require_manager, AccessPolicy, ClientScope};
use super::new_entity_id;

pub struct ClientService {
    repos: Arc<dyn RepositoryProvider>,
    policy: AccessPolicy,
}

impl ClientService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            policy: AccessPolicy::new(repos.clone()),
            repos,
        }
    }

    /// Register a resident. Manager-only.
    pub async fn create(&self, caller: &Identity, dto: CreateClientDto) -> CareResult<Client> {
        require_manager(caller)?;

        let mut id = new_entity_id("C");
        while self.repos.clients().exists(&id).await? {
            id = new_entity_id("C");
        }

        let client = Client {
            id: id.clone(),
            name: dto.name,
            age: dto.age,
            room: dto.room,
            date_of_birth: dto.date_of_birth,
            support_needs: dto.support_needs,
        };

        let audit = AuditEntry::created(caller.email(), "client", &id);
        self.repos.clients().insert(client.clone(), audit).await?;

        info!(client_id = id.as_str(), by = caller.email(), "client registered");
        Ok(client)
    }

    /// One resident, shaped by who is asking: management gets the full
    /// record, assigned carers and family the demographic subset.
    pub async fn get(&self, caller: &Identity, client_id: &str) -> CareResult<ClientView> {
        self.policy.require_client_access(caller, client_id).await?;

        let Some(client) = self.repos.clients().find_by_id(client_id).await? else {
            return Err(CareError::not_found("client", "id", client_id));
        };

        if caller.is_management() {
            Ok(ClientView::Full(client))
        } else {
            Ok(ClientView::Limited(client.summary()))
        }
    }

    /// Residents visible to the caller: all of them for management, the
    /// assigned set for carers and family.
    pub async fn list(&self, caller: &Identity) -> CareResult<Vec<ClientView>> {
        match self.policy.scope(caller).await? {
            ClientScope::Unrestricted => {
                let clients = self.repos.clients().list().await?;
                Ok(clients.into_iter().map(ClientView::Full).collect())
            }
            ClientScope::Assigned(ids) => {
                let mut sorted_ids: Vec<String> = ids.into_iter().collect();
                sorted_ids.sort();
                let mut views = Vec::with_capacity(sorted_ids.len());
                for id in sorted_ids {
                    // edges can momentarily outlive a deleted client
                    if let Some(client) = self.repos.clients().find_by_id(&id).await? {
                        views.push(ClientView::Limited(client.summary()));
                    }
                }
                Ok(views)
            }
        }
    }

    /// Manager-only edit.
    pub async fn update(
        &self,
        caller: &Identity,
        client_id: &str,
        dto: UpdateClientDto,
    ) -> CareResult<Client> {
        require_manager(caller)?;

        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }

        let audit = AuditEntry::updated(caller.email(), "client", client_id);
        let updated = self.repos.clients().update(client_id, dto, audit).await?;

        info!(client_id, by = caller.email(), "client updated");
        Ok(updated)
    }

    /// Manager-only removal. Takes the resident's assignment edges,
    /// schedules and visit logs with it.
    pub async fn delete(&self, caller: &Identity, client_id: &str) -> CareResult<()> {
        require_manager(caller)?;

        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }

        let audit = AuditEntry::deleted(caller.email(), "client", client_id);
        self.repos.clients().delete_cascading(client_id, audit).await?;

        info!(client_id, by = caller.email(), "client deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{Schedule, ScheduleFilter, ScheduleStatus};
    use crate::domain::user::User;
    use crate::domain::Role;
    use crate::infrastructure::memory::MemoryRepositoryProvider;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn manager() -> Identity {
        Identity::Manager {
            email: "manager@carehome.com".to_string(),
            name: None,
            department: None,
        }
    }

    fn carer() -> Identity {
        Identity::Carer {
            email: "carer@carehome.com".to_string(),
            name: None,
            phone: None,
        }
    }

    fn new_client() -> CreateClientDto {
        CreateClientDto {
            name: "Edith Hale".to_string(),
            age: 88,
            room: "12".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1937, 5, 2).unwrap(),
            support_needs: Some("mobility assistance, morning meds".to_string()),
        }
    }

    fn service() -> (Arc<MemoryRepositoryProvider>, ClientService) {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        repos.seed_user(User {
            email: "carer@carehome.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Carer,
            name: None,
            phone: None,
            department: None,
            family_id: None,
        });
        (repos.clone(), ClientService::new(repos))
    }

    #[tokio::test]
    async fn created_ids_use_the_client_prefix() {
        let (_repos, service) = service();
        let client = service.create(&manager(), new_client()).await.unwrap();
        assert!(client.id.starts_with('C'));
        assert_eq!(client.id.len(), 9);
    }

    #[tokio::test]
    async fn views_depend_on_role() {
        let (repos, service) = service();
        let client = service.create(&manager(), new_client()).await.unwrap();
        repos.seed_assignment("carer@carehome.com", &client.id);

        match service.get(&manager(), &client.id).await.unwrap() {
            ClientView::Full(full) => {
                assert_eq!(full.support_needs.as_deref(), Some("mobility assistance, morning meds"))
            }
            other => panic!("manager should get the full view, got {other:?}"),
        }

        match service.get(&carer(), &client.id).await.unwrap() {
            ClientView::Limited(summary) => {
                assert_eq!(summary.name, "Edith Hale");
                assert_eq!(summary.room, "12");
            }
            other => panic!("carer should get the limited view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unassigned_carer_is_denied_before_lookup() {
        let (_repos, service) = service();
        let client = service.create(&manager(), new_client()).await.unwrap();

        let real = service.get(&carer(), &client.id).await.unwrap_err();
        let ghost = service.get(&carer(), "C0FFEE00").await.unwrap_err();
        assert!(matches!(real, CareError::Authorization(_)));
        assert_eq!(real.to_string(), ghost.to_string());
    }

    #[tokio::test]
    async fn list_is_scope_shaped() {
        let (repos, service) = service();
        let first = service.create(&manager(), new_client()).await.unwrap();
        let mut second_dto = new_client();
        second_dto.name = "Arthur Penn".to_string();
        service.create(&manager(), second_dto).await.unwrap();

        let all = service.list(&manager()).await.unwrap();
        assert_eq!(all.len(), 2);

        repos.seed_assignment("carer@carehome.com", &first.id);
        let mine = service.list(&carer()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(matches!(&mine[0], ClientView::Limited(s) if s.id == first.id));
    }

    #[tokio::test]
    async fn mutations_are_manager_only() {
        let (_repos, service) = service();
        let err = service.create(&carer(), new_client()).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));

        let admin = Identity::Admin {
            email: "admin@carehome.com".to_string(),
            name: None,
        };
        let err = service.create(&admin, new_client()).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let (repos, service) = service();
        let client = service.create(&manager(), new_client()).await.unwrap();

        let updated = service
            .update(
                &manager(),
                &client.id,
                UpdateClientDto {
                    room: Some("14".to_string()),
                    ..UpdateClientDto::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.room, "14");
        assert_eq!(updated.name, "Edith Hale");

        let trail = repos.audit().recent(10).await.unwrap();
        assert_eq!(trail[0].action, "updated");
        assert_eq!(trail[0].entity_type, "client");
    }

    #[tokio::test]
    async fn delete_takes_edges_schedules_and_logs_along() {
        let (repos, service) = service();
        let client = service.create(&manager(), new_client()).await.unwrap();
        repos.seed_assignment("carer@carehome.com", &client.id);
        repos.seed_schedule(Schedule {
            id: "SCH000001".to_string(),
            carer_email: "carer@carehome.com".to_string(),
            client_id: client.id.clone(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            shift_type: "morning".to_string(),
            status: ScheduleStatus::Scheduled,
            notes: None,
            created_by: "manager@carehome.com".to_string(),
            created_at: Utc::now(),
            completed_at: None,
        });

        service.delete(&manager(), &client.id).await.unwrap();

        assert!(!repos.clients().exists(&client.id).await.unwrap());
        let edges = repos.assignments().client_ids_for("carer@carehome.com").await.unwrap();
        assert!(edges.is_empty());
        let schedules = repos.schedules().list(ScheduleFilter::default()).await.unwrap();
        assert!(schedules.is_empty());
    }
}
