//! # CareView Core
//!
//! Management core for a residential care home: staff directory, resident
//! records, carer/family assignments, shift scheduling with conflict
//! detection, care visit logging and an append-only audit trail.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **domain**: Entities, repository traits and the error taxonomy
//! - **application**: Role- and scope-checked services, one per use case
//! - **infrastructure**: SeaORM persistence, migrations, in-memory provider
//! - **auth**: Token signing/verification and password hashing
//!
//! Every service takes the authenticated caller as an [`Identity`] value and
//! performs its own authorization; embedding layers (HTTP, CLI, tests) only
//! authenticate and forward.

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

pub use domain::{CareError, CareResult, Identity, RepositoryProvider, Role};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export the application services
pub use application::{
    AccessPolicy, AssignmentService, AuditTrail, ClientService, ScheduleService, UserDirectory,
    UserService, VisitLogService,
};
