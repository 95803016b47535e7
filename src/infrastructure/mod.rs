pub mod database;
pub mod memory;
pub mod seed;

pub use database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use memory::MemoryRepositoryProvider;
