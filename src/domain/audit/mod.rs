mod model;
mod repository;

pub use model::AuditEntry;
pub use repository::AuditRepository;
