//! Unified access to all per-aggregate repositories.

use super::assignment::AssignmentRepository;
use super::audit::AuditRepository;
use super::client::ClientRepository;
use super::schedule::ScheduleRepository;
use super::user::UserRepository;
use super::visit_log::VisitLogRepository;

/// Provides access to all domain repositories.
///
/// Services hold an `Arc<dyn RepositoryProvider>` and request only the
/// repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) -> CareResult<()> {
///     let user = repos.users().find_by_email("carer@carehome.com").await?;
///     let clients = repos.assignments().client_ids_for("carer@carehome.com").await?;
///     Ok(())
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn clients(&self) -> &dyn ClientRepository;
    fn assignments(&self) -> &dyn AssignmentRepository;
    fn schedules(&self) -> &dyn ScheduleRepository;
    fn visit_logs(&self) -> &dyn VisitLogRepository;
    fn audit(&self) -> &dyn AuditRepository;
}
