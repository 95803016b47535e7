//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::assignment::AssignmentRepository;
use crate::domain::audit::AuditRepository;
use crate::domain::client::ClientRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::schedule::ScheduleRepository;
use crate::domain::user::UserRepository;
use crate::domain::visit_log::VisitLogRepository;

use super::assignment_repository::SeaOrmAssignmentRepository;
use super::audit_repository::SeaOrmAuditRepository;
use super::client_repository::SeaOrmClientRepository;
use super::schedule_repository::SeaOrmScheduleRepository;
use super::user_repository::SeaOrmUserRepository;
use super::visit_log_repository::SeaOrmVisitLogRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
/// let user = repos.users().find_by_email("carer@carehome.com").await?;
/// let trail = repos.audit().recent(50).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    clients: SeaOrmClientRepository,
    assignments: SeaOrmAssignmentRepository,
    schedules: SeaOrmScheduleRepository,
    visit_logs: SeaOrmVisitLogRepository,
    audit: SeaOrmAuditRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            clients: SeaOrmClientRepository::new(db.clone()),
            assignments: SeaOrmAssignmentRepository::new(db.clone()),
            schedules: SeaOrmScheduleRepository::new(db.clone()),
            visit_logs: SeaOrmVisitLogRepository::new(db.clone()),
            audit: SeaOrmAuditRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn clients(&self) -> &dyn ClientRepository {
        &self.clients
    }

    fn assignments(&self) -> &dyn AssignmentRepository {
        &self.assignments
    }

    fn schedules(&self) -> &dyn ScheduleRepository {
        &self.schedules
    }

    fn visit_logs(&self) -> &dyn VisitLogRepository {
        &self.visit_logs
    }

    fn audit(&self) -> &dyn AuditRepository {
        &self.audit
    }
}
