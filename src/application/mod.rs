//! Application services: one per use-case cluster.
//!
//! Services take an authenticated [`Identity`](crate::domain::Identity) as
//! their first argument and enforce role and scope rules themselves; the
//! embedding layer only authenticates and forwards.

pub mod access;
pub mod assignments;
pub mod audit;
pub mod clients;
pub mod directory;
pub mod schedules;
pub mod users;
pub mod visit_logs;

pub use access::{AccessPolicy, ClientScope};
pub use assignments::AssignmentService;
pub use audit::AuditTrail;
pub use clients::ClientService;
pub use directory::{AuthSession, IssuedToken, UserDirectory};
pub use schedules::ScheduleService;
pub use users::{UserDeletion, UserService};
pub use visit_logs::VisitLogService;

/// Generated entity ids: a short prefix plus the first eight hex characters
/// of a v4 uuid, uppercased (`SCH3F2A9B1C`, `VL7D0E4F21`, `C1A2B3C4`).
pub(crate) fn new_entity_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, uuid[..8].to_uppercase())
}
