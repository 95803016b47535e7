//! CareView setup tool
//!
//! Provisions the care home database: runs migrations, creates the
//! configured admin account and optionally loads demo data.
//! Reads configuration from TOML file (~/.config/careview/config.toml).
//!
//! ```sh
//! # Provision with default config
//! careview-setup
//!
//! # Custom config path
//! CAREVIEW_CONFIG=/etc/careview/config.toml careview-setup
//!
//! # Also load the demo care home
//! careview-setup --demo
//! ```

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use careview_core::infrastructure::database::migrator::Migrator;
use careview_core::infrastructure::seed::{create_default_admin, seed_demo_data};
use careview_core::{
    default_config_path, init_database, AppConfig, DatabaseConfig, SeaOrmRepositoryProvider,
};

fn init_tracing(cfg: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    match cfg.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("CAREVIEW_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    let demo = std::env::args().any(|arg| arg == "--demo");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = init_database(&db_config).await?;

    info!("Running database migrations...");
    Migrator::up(&db, None).await?;
    info!("Migrations complete");

    // ── Provisioning ───────────────────────────────────────────
    let repos = SeaOrmRepositoryProvider::new(db.clone());
    create_default_admin(&repos, &app_cfg).await;

    if demo {
        seed_demo_data(&repos).await?;
    }

    info!("Setup finished");
    Ok(())
}
