//! Visit log recording.
//!
//! Every operation is keyed by client id and gated on assignment scope
//! before any record is looked up, so out-of-scope callers cannot tell
//! whether a client or a log exists.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::audit::AuditEntry;
use crate::domain::visit_log::{CreateVisitLogDto, UpdateVisitLogDto, VisitLog};
use crate::domain::{CareError, CareResult, Identity, RepositoryProvider};

use super::access::{require_manager, AccessPolicy};
use super::new_entity_id;

pub struct VisitLogService {
    repos: Arc<dyn RepositoryProvider>,
    policy: AccessPolicy,
}

impl VisitLogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            policy: AccessPolicy::new(repos.clone()),
            repos,
        }
    }

    /// Record a visit. Assigned carers and management write records; family
    /// members read them but never write, assigned or not. The author's
    /// name and contact number are snapshotted from the caller at creation.
    pub async fn create(
        &self,
        caller: &Identity,
        client_id: &str,
        dto: CreateVisitLogDto,
    ) -> CareResult<VisitLog> {
        self.policy.require_client_access(caller, client_id).await?;
        if matches!(caller, Identity::Family { .. }) {
            return Err(CareError::Authorization(
                "family accounts cannot create visit logs".to_string(),
            ));
        }

        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }

        let id = match dto.id {
            Some(requested) => {
                if self.repos.visit_logs().exists(&requested).await? {
                    return Err(CareError::Validation(format!(
                        "visit log id {requested} already exists"
                    )));
                }
                requested
            }
            None => {
                let mut id = new_entity_id("VL");
                while self.repos.visit_logs().exists(&id).await? {
                    id = new_entity_id("VL");
                }
                id
            }
        };

        let log = VisitLog {
            id: id.clone(),
            client_id: client_id.to_string(),
            carer_name: caller.display_name().to_string(),
            carer_number: caller.phone().map(String::from),
            date: dto.date,
            personal_care_completed: dto.personal_care_completed,
            care_reminders_provided: dto.care_reminders_provided,
            toilet: dto.toilet,
            changed_clothes: dto.changed_clothes,
            ate_food: dto.ate_food,
            notes: dto.notes,
            mood: dto.mood,
            last_updated_by: None,
            last_updated_at: None,
        };

        let audit = AuditEntry::created(caller.email(), "visit_log", &id);
        self.repos.visit_logs().insert(log.clone(), audit).await?;

        info!(
            visit_log_id = id.as_str(),
            client_id,
            author = caller.email(),
            "visit log recorded"
        );
        Ok(log)
    }

    /// All records for one client, newest first.
    pub async fn list_for_client(
        &self,
        caller: &Identity,
        client_id: &str,
    ) -> CareResult<Vec<VisitLog>> {
        self.policy.require_client_access(caller, client_id).await?;

        if !self.repos.clients().exists(client_id).await? {
            return Err(CareError::not_found("client", "id", client_id));
        }
        self.repos.visit_logs().list_for_client(client_id).await
    }

    pub async fn get(
        &self,
        caller: &Identity,
        client_id: &str,
        log_id: &str,
    ) -> CareResult<VisitLog> {
        self.policy.require_client_access(caller, client_id).await?;

        let Some(log) = self.repos.visit_logs().find(client_id, log_id).await? else {
            return Err(CareError::not_found("visit log", "id", log_id));
        };
        Ok(log)
    }

    /// Merge changed fields into a record and stamp who touched it. Carers
    /// must be assigned to the client; family may not update.
    pub async fn update(
        &self,
        caller: &Identity,
        client_id: &str,
        log_id: &str,
        dto: UpdateVisitLogDto,
    ) -> CareResult<VisitLog> {
        self.policy.require_client_access(caller, client_id).await?;
        if matches!(caller, Identity::Family { .. }) {
            return Err(CareError::Authorization(
                "family accounts cannot update visit logs".to_string(),
            ));
        }

        if self.repos.visit_logs().find(client_id, log_id).await?.is_none() {
            return Err(CareError::not_found("visit log", "id", log_id));
        }

        let audit = AuditEntry::updated(caller.email(), "visit_log", log_id);
        let updated = self
            .repos
            .visit_logs()
            .update(client_id, log_id, dto, audit)
            .await?;

        info!(
            visit_log_id = log_id,
            client_id,
            by = caller.email(),
            "visit log updated"
        );
        Ok(updated)
    }

    /// Corrective removal, manager-only. The removed payload goes into the
    /// server log so the record stays recoverable outside the audit trail.
    pub async fn delete(
        &self,
        caller: &Identity,
        client_id: &str,
        log_id: &str,
    ) -> CareResult<()> {
        require_manager(caller)?;

        if self.repos.visit_logs().find(client_id, log_id).await?.is_none() {
            return Err(CareError::not_found("visit log", "id", log_id));
        }

        let audit = AuditEntry::deleted(caller.email(), "visit_log", log_id);
        let removed = self.repos.visit_logs().delete(client_id, log_id, audit).await?;

        let payload = serde_json::to_string(&removed)
            .unwrap_or_else(|_| format!("visit log {log_id} (unserializable)"));
        warn!(
            visit_log_id = log_id,
            client_id,
            by = caller.email(),
            removed = payload.as_str(),
            "visit log deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Client;
    use crate::domain::user::{User, UserPatch};
    use crate::domain::Role;
    use crate::infrastructure::memory::MemoryRepositoryProvider;
    use chrono::NaiveDate;

    fn manager() -> Identity {
        Identity::Manager {
            email: "manager@carehome.com".to_string(),
            name: Some("Morgan Lee".to_string()),
            department: None,
        }
    }

    fn carer() -> Identity {
        Identity::Carer {
            email: "carer@carehome.com".to_string(),
            name: Some("Jo Daniels".to_string()),
            phone: Some("07700 900123".to_string()),
        }
    }

    fn family() -> Identity {
        Identity::Family {
            email: "family@example.com".to_string(),
            name: Some("Pat Daniels".to_string()),
            family_id: Some("FAM001".to_string()),
            phone: None,
        }
    }

    fn visit() -> CreateVisitLogDto {
        CreateVisitLogDto {
            id: None,
            date: Utc::now(),
            personal_care_completed: true,
            care_reminders_provided: "Yes".to_string(),
            toilet: true,
            changed_clothes: false,
            ate_food: "most of lunch".to_string(),
            notes: "settled afternoon".to_string(),
            mood: vec!["calm".to_string(), "chatty".to_string()],
        }
    }

    fn seeded() -> (Arc<MemoryRepositoryProvider>, VisitLogService) {
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
        repos.seed_client(Client {
            id: "CL1".to_string(),
            name: "Edith Hale".to_string(),
            age: 88,
            room: "12".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1937, 5, 2).unwrap(),
            support_needs: None,
        });
        repos.seed_assignment("carer@carehome.com", "CL1");
        let service = VisitLogService::new(repos.clone());
        (repos, service)
    }

    #[tokio::test]
    async fn assigned_carer_records_a_visit_with_author_snapshot() {
        let (repos, service) = seeded();

        let log = service.create(&carer(), "CL1", visit()).await.unwrap();
        assert!(log.id.starts_with("VL"));
        assert_eq!(log.carer_name, "Jo Daniels");
        assert_eq!(log.carer_number.as_deref(), Some("07700 900123"));

        let trail = repos.audit().recent(10).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "created");
        assert_eq!(trail[0].entity_type, "visit_log");
    }

    #[tokio::test]
    async fn snapshot_survives_author_profile_edits() {
        let (repos, service) = seeded();
        let log = service.create(&carer(), "CL1", visit()).await.unwrap();

        repos
            .users()
            .update(
                "carer@carehome.com",
                UserPatch {
                    name: Some("Jo Renamed".to_string()),
                    phone: Some("07700 000000".to_string()),
                    ..UserPatch::default()
                },
                AuditEntry::updated("manager@carehome.com", "user", "carer@carehome.com"),
            )
            .await
            .unwrap();

        let fetched = service.get(&manager(), "CL1", &log.id).await.unwrap();
        assert_eq!(fetched.carer_name, "Jo Daniels");
        assert_eq!(fetched.carer_number.as_deref(), Some("07700 900123"));
    }

    #[tokio::test]
    async fn unassigned_family_learns_nothing() {
        let (_repos, service) = seeded();

        let real = service.list_for_client(&family(), "CL1").await.unwrap_err();
        let ghost = service.list_for_client(&family(), "NO-SUCH-CLIENT").await.unwrap_err();

        assert!(matches!(real, CareError::Authorization(_)));
        assert!(matches!(ghost, CareError::Authorization(_)));
        // identical text: existence cannot be probed
        assert_eq!(real.to_string(), ghost.to_string());
    }

    #[tokio::test]
    async fn assigned_family_reads_but_never_writes() {
        let (repos, service) = seeded();
        repos.seed_assignment("family@example.com", "CL1");
        service.create(&carer(), "CL1", visit()).await.unwrap();

        let logs = service.list_for_client(&family(), "CL1").await.unwrap();
        assert_eq!(logs.len(), 1);

        let err = service.create(&family(), "CL1", visit()).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn caller_supplied_duplicate_id_is_rejected_and_original_kept() {
        let (_repos, service) = seeded();

        let mut first = visit();
        first.id = Some("VLCUSTOM1".to_string());
        let original = service.create(&carer(), "CL1", first).await.unwrap();

        let mut second = visit();
        second.id = Some("VLCUSTOM1".to_string());
        second.notes = "overwrite attempt".to_string();
        let err = service.create(&carer(), "CL1", second).await.unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));

        let kept = service.get(&carer(), "CL1", "VLCUSTOM1").await.unwrap();
        assert_eq!(kept.notes, original.notes);
    }

    #[tokio::test]
    async fn update_merges_and_stamps_editor() {
        let (_repos, service) = seeded();
        let log = service.create(&carer(), "CL1", visit()).await.unwrap();

        let updated = service
            .update(
                &manager(),
                "CL1",
                &log.id,
                UpdateVisitLogDto {
                    notes: Some("amended after family call".to_string()),
                    mood: Some(vec!["tired".to_string()]),
                    ..UpdateVisitLogDto::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.notes, "amended after family call");
        assert_eq!(updated.mood, vec!["tired".to_string()]);
        // untouched fields survive the merge
        assert_eq!(updated.ate_food, "most of lunch");
        assert_eq!(updated.last_updated_by.as_deref(), Some("manager@carehome.com"));
        assert!(updated.last_updated_at.is_some());
    }

    #[tokio::test]
    async fn delete_is_manager_only() {
        let (repos, service) = seeded();
        let log = service.create(&carer(), "CL1", visit()).await.unwrap();

        let err = service.delete(&carer(), "CL1", &log.id).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));

        service.delete(&manager(), "CL1", &log.id).await.unwrap();
        let err = service.get(&manager(), "CL1", &log.id).await.unwrap_err();
        assert!(matches!(err, CareError::NotFound { .. }));

        let trail = repos.audit().recent(10).await.unwrap();
        assert_eq!(trail[0].action, "deleted");
        assert_eq!(trail[0].entity_id, log.id);
    }

    #[tokio::test]
    async fn unassigned_carer_cannot_record() {
        let (repos, service) = seeded();
        repos.seed_user(User {
            email: "other@carehome.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Carer,
            name: None,
            phone: None,
            department: None,
            family_id: None,
        });
        let outsider = Identity::Carer {
            email: "other@carehome.com".to_string(),
            name: None,
            phone: None,
        };

        let err = service.create(&outsider, "CL1", visit()).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }
}
