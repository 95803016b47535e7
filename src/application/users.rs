//! Account administration.
//!
//! Who may create whom follows `Role::administers`: admins provision
//! managers, managers provision carers and family members. Admin accounts
//! themselves are created only by `careview-setup`, never in-band. Roles are
//! fixed at creation; there is no role change operation.

use std::sync::Arc;

use tracing::info;

use crate::auth::hash_password;
use crate::domain::audit::AuditEntry;
use crate::domain::user::{CreateUserDto, UpdateUserDto, User, UserPatch};
use crate::domain::{CareError, CareResult, Identity, Role, RepositoryProvider};

use super::access::require_management;

/// Outcome of deleting an account: the clients left without this user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDeletion {
    pub email: String,
    pub needs_reassignment: Vec<String>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create an account with the given role. Fields irrelevant to the role
    /// (a carer's `department`, a manager's `phone`) are dropped rather
    /// than stored.
    pub async fn create(
        &self,
        caller: &Identity,
        role: Role,
        dto: CreateUserDto,
    ) -> CareResult<User> {
        if role == Role::Admin {
            return Err(CareError::Authorization(
                "admin accounts are provisioned at setup, not created here".to_string(),
            ));
        }
        if !caller.role().administers(role) {
            return Err(CareError::Authorization(format!(
                "a {} account cannot create {} accounts",
                caller.role(),
                role
            )));
        }

        if self.repos.users().find_by_email(&dto.email).await?.is_some() {
            return Err(CareError::Validation(format!(
                "email {} is already registered",
                dto.email
            )));
        }

        let password_hash = hash_password(&dto.password).map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            CareError::Store(e.to_string())
        })?;

        let user = User {
            email: dto.email.clone(),
            password_hash,
            role,
            name: Some(dto.name),
            phone: match role {
                Role::Carer | Role::Family => dto.phone,
                _ => None,
            },
            department: match role {
                Role::Manager => dto.department,
                _ => None,
            },
            family_id: match role {
                Role::Family => dto.family_id,
                _ => None,
            },
        };

        let audit = AuditEntry::created(caller.email(), "user", &dto.email);
        self.repos.users().insert(user.clone(), audit).await?;

        info!(email = dto.email.as_str(), %role, by = caller.email(), "account created");
        Ok(user)
    }

    /// Profile fetch: your own account, or one you administer.
    pub async fn get(&self, caller: &Identity, email: &str) -> CareResult<User> {
        if caller.email() != email {
            require_management(caller)?;
        }
        let Some(user) = self.repos.users().find_by_email(email).await? else {
            return Err(CareError::not_found("user", "email", email));
        };
        if caller.email() != email && !caller.role().administers(user.role) {
            return Err(CareError::Authorization(format!(
                "a {} account cannot view {} accounts",
                caller.role(),
                user.role
            )));
        }
        Ok(user)
    }

    /// Directory listing by role, for callers who administer that role.
    pub async fn list(&self, caller: &Identity, role: Role) -> CareResult<Vec<User>> {
        if !caller.role().administers(role) {
            return Err(CareError::Authorization(format!(
                "a {} account cannot list {} accounts",
                caller.role(),
                role
            )));
        }
        self.repos.users().list_by_role(role).await
    }

    /// Update a profile: your own, or one you administer. A provided
    /// password is re-hashed; the role never changes.
    pub async fn update(
        &self,
        caller: &Identity,
        email: &str,
        dto: UpdateUserDto,
    ) -> CareResult<User> {
        if caller.email() != email {
            require_management(caller)?;
        }
        let Some(target) = self.repos.users().find_by_email(email).await? else {
            return Err(CareError::not_found("user", "email", email));
        };
        if caller.email() != email && !caller.role().administers(target.role) {
            return Err(CareError::Authorization(format!(
                "a {} account cannot update {} accounts",
                caller.role(),
                target.role
            )));
        }

        let password_hash = match dto.password {
            Some(password) => Some(hash_password(&password).map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                CareError::Store(e.to_string())
            })?),
            None => None,
        };

        let patch = UserPatch {
            name: dto.name,
            phone: match target.role {
                Role::Carer | Role::Family => dto.phone,
                _ => None,
            },
            department: match target.role {
                Role::Manager => dto.department,
                _ => None,
            },
            family_id: match target.role {
                Role::Family => dto.family_id,
                _ => None,
            },
            password_hash,
        };

        let audit = AuditEntry::updated(caller.email(), "user", email);
        let updated = self.repos.users().update(email, patch, audit).await?;

        info!(email, by = caller.email(), "account updated");
        Ok(updated)
    }

    /// Delete an account you administer. Everything hanging off the account
    /// goes with it in one transaction: schedules owned by a carer and all
    /// assignment edges. The returned client ids need a replacement carer
    /// or family contact.
    pub async fn delete(&self, caller: &Identity, email: &str) -> CareResult<UserDeletion> {
        require_management(caller)?;

        let Some(target) = self.repos.users().find_by_email(email).await? else {
            return Err(CareError::not_found("user", "email", email));
        };
        if !caller.role().administers(target.role) {
            return Err(CareError::Authorization(format!(
                "a {} account cannot delete {} accounts",
                caller.role(),
                target.role
            )));
        }

        let audit = AuditEntry::deleted(caller.email(), "user", email);
        let mut needs_reassignment = self.repos.users().delete_cascading(email, audit).await?;
        needs_reassignment.sort();

        info!(
            email,
            by = caller.email(),
            orphaned_clients = needs_reassignment.len(),
            "account deleted"
        );
        Ok(UserDeletion {
            email: email.to_string(),
            needs_reassignment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::Client;
    use crate::domain::schedule::{Schedule, ScheduleFilter, ScheduleStatus};
    use crate::infrastructure::memory::MemoryRepositoryProvider;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn admin() -> Identity {
        Identity::Admin {
            email: "admin@carehome.com".to_string(),
            name: None,
        }
    }

    fn manager() -> Identity {
        Identity::Manager {
            email: "manager@carehome.com".to_string(),
            name: None,
            department: None,
        }
    }

    fn new_account(email: &str) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            name: "Jo Daniels".to_string(),
            password: "first-day-password".to_string(),
            phone: Some("07700 900123".to_string()),
            department: Some("East Wing".to_string()),
            family_id: Some("FAM001".to_string()),
        }
    }

    fn service() -> (Arc<MemoryRepositoryProvider>, UserService) {
        let repos = Arc::new(MemoryRepositoryProvider::new());
        (repos.clone(), UserService::new(repos))
    }

    #[tokio::test]
    async fn creation_authority_follows_the_matrix() {
        let (_repos, service) = service();

        service.create(&admin(), Role::Manager, new_account("m2@carehome.com")).await.unwrap();
        service.create(&manager(), Role::Carer, new_account("c1@carehome.com")).await.unwrap();
        service.create(&manager(), Role::Family, new_account("f1@example.com")).await.unwrap();

        let err = service
            .create(&manager(), Role::Manager, new_account("m3@carehome.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));

        let err = service
            .create(&admin(), Role::Admin, new_account("root@carehome.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn role_irrelevant_fields_are_dropped() {
        let (_repos, service) = service();

        let carer = service
            .create(&manager(), Role::Carer, new_account("c1@carehome.com"))
            .await
            .unwrap();
        assert_eq!(carer.phone.as_deref(), Some("07700 900123"));
        assert!(carer.department.is_none());
        assert!(carer.family_id.is_none());

        let boss = service
            .create(&admin(), Role::Manager, new_account("m2@carehome.com"))
            .await
            .unwrap();
        assert_eq!(boss.department.as_deref(), Some("East Wing"));
        assert!(boss.phone.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let (_repos, service) = service();
        service.create(&manager(), Role::Carer, new_account("c1@carehome.com")).await.unwrap();

        let err = service
            .create(&manager(), Role::Family, new_account("c1@carehome.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));
    }

    #[tokio::test]
    async fn passwords_are_stored_hashed() {
        let (_repos, service) = service();
        let user = service
            .create(&manager(), Role::Carer, new_account("c1@carehome.com"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "first-day-password");
        assert!(crate::auth::verify_password("first-day-password", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn self_update_is_allowed_but_not_for_strangers() {
        let (_repos, service) = service();
        service.create(&manager(), Role::Carer, new_account("c1@carehome.com")).await.unwrap();
        service.create(&manager(), Role::Carer, new_account("c2@carehome.com")).await.unwrap();

        let own = Identity::Carer {
            email: "c1@carehome.com".to_string(),
            name: None,
            phone: None,
        };
        let updated = service
            .update(
                &own,
                "c1@carehome.com",
                UpdateUserDto {
                    phone: Some("07700 111222".to_string()),
                    ..UpdateUserDto::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("07700 111222"));

        let err = service
            .update(
                &own,
                "c2@carehome.com",
                UpdateUserDto {
                    phone: Some("07700 999999".to_string()),
                    ..UpdateUserDto::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn manager_cannot_touch_other_managers() {
        let (_repos, service) = service();
        service.create(&admin(), Role::Manager, new_account("m2@carehome.com")).await.unwrap();

        let err = service
            .update(
                &manager(),
                "m2@carehome.com",
                UpdateUserDto {
                    name: Some("Renamed".to_string()),
                    ..UpdateUserDto::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));

        let err = service.delete(&manager(), "m2@carehome.com").await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }

    #[tokio::test]
    async fn deleting_a_carer_reports_clients_needing_reassignment() {
        let (repos, service) = service();
        service.create(&manager(), Role::Carer, new_account("c1@carehome.com")).await.unwrap();
        repos.seed_client(Client {
            id: "CL1".to_string(),
            name: "Edith Hale".to_string(),
            age: 88,
            room: "12".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1937, 5, 2).unwrap(),
            support_needs: None,
        });
        repos.seed_assignment("c1@carehome.com", "CL1");
        repos.seed_schedule(Schedule {
            id: "SCH000001".to_string(),
            carer_email: "c1@carehome.com".to_string(),
            client_id: "CL1".to_string(),
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
        let audits_before = repos.audit().recent(50).await.unwrap().len();

        let outcome = service.delete(&manager(), "c1@carehome.com").await.unwrap();
        assert_eq!(outcome.needs_reassignment, vec!["CL1".to_string()]);

        assert!(repos.users().find_by_email("c1@carehome.com").await.unwrap().is_none());
        assert!(repos
            .schedules()
            .list(ScheduleFilter::default())
            .await
            .unwrap()
            .is_empty());
        let edges = repos.assignments().client_ids_for("c1@carehome.com").await.unwrap();
        assert!(edges.is_empty());

        // one deletion, one audit entry
        let trail = repos.audit().recent(50).await.unwrap();
        assert_eq!(trail.len(), audits_before + 1);
        assert_eq!(trail[0].action, "deleted");
        assert_eq!(trail[0].entity_type, "user");
        assert_eq!(trail[0].entity_id, "c1@carehome.com");
    }

    #[tokio::test]
    async fn get_and_list_respect_the_matrix() {
        let (_repos, service) = service();
        service.create(&manager(), Role::Carer, new_account("c1@carehome.com")).await.unwrap();

        let fetched = service.get(&manager(), "c1@carehome.com").await.unwrap();
        assert_eq!(fetched.role, Role::Carer);

        let carers = service.list(&manager(), Role::Carer).await.unwrap();
        assert_eq!(carers.len(), 1);

        let err = service.list(&manager(), Role::Manager).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));

        let own = Identity::Carer {
            email: "c1@carehome.com".to_string(),
            name: None,
            phone: None,
        };
        assert!(service.get(&own, "c1@carehome.com").await.is_ok());
        let err = service.list(&own, Role::Carer).await.unwrap_err();
        assert!(matches!(err, CareError::Authorization(_)));
    }
}
