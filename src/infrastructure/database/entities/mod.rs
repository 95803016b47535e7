//! Database entities module

pub mod assignment;
pub mod audit_log;
pub mod client;
pub mod schedule;
pub mod user;
pub mod visit_log;

pub use assignment::Entity as Assignment;
pub use audit_log::Entity as AuditLog;
pub use client::Entity as Client;
pub use schedule::Entity as Schedule;
pub use user::Entity as User;
pub use visit_log::Entity as VisitLog;
