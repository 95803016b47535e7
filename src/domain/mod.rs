//! Domain layer: models, DTOs, repository traits, identity, errors.

pub mod assignment;
pub mod audit;
pub mod client;
pub mod error;
pub mod identity;
pub mod repositories;
pub mod schedule;
pub mod user;
pub mod visit_log;

pub use error::{CareError, CareResult};
pub use identity::{Identity, Role};
pub use repositories::RepositoryProvider;
