//! # Storefront App Library
//!
//! Wires configuration, storage and the three stores together and exposes
//! the commands the pages call.
//!
//! ## Module Organization
//! ```text
//! storefront_app/
//! ├── lib.rs          ◄─── You are here (startup & wiring)
//! ├── auth.rs         ◄─── CredentialVerifier seam + timeout
//! ├── catalog.rs      ◄─── Fixed demo catalog
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart ledger + persistence
//! │   ├── session.rs  ◄─── Session + login flow + persistence
//! │   ├── dashboard.rs◄─── Dashboard metrics (memory only)
//! │   └── config.rs   ◄─── Layered configuration
//! ├── commands/
//! │   ├── cart.rs     ◄─── Cart manipulation + checkout
//! │   ├── catalog.rs  ◄─── Product listing
//! │   ├── session.rs  ◄─── Login / logout
//! │   ├── dashboard.rs◄─── Stats and recent orders
//! │   └── config.rs   ◄─── Read-only config
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = ConfigState::load(None)?;
//! init_tracing(&config);
//! let app = Storefront::open(config).await?;
//!
//! commands::catalog::add_product_to_cart(&app.db, &app.cart, "1").await?;
//! commands::session::login(&app.db, &app.session, credentials).await;
//! let receipt = commands::cart::checkout(&app.db, &app.cart, &app.session, &app.dashboard).await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{CredentialVerifier, StaticCredentialVerifier};
use state::{CartState, ConfigState, DashboardState, DbState, SessionState};
use storefront_db::{Database, DbConfig, DbError, DbResult};

/// File name of the database inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "storefront.db";

const IN_MEMORY_PATH: &str = ":memory:";

/// Every managed state, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub config: ConfigState,
    pub db: DbState,
    pub cart: CartState,
    pub session: SessionState,
    pub dashboard: DashboardState,
}

impl Storefront {
    /// Opens storage and rehydrates the stores, checking logins against the
    /// demo account.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Determine Database Path                                            │
    /// │     • config.database_path, or                                         │
    /// │     • Linux: ~/.local/share/storefront/storefront.db                   │
    /// │     • macOS: ~/Library/Application Support/com.storefront.storefront/  │
    /// │                                                                         │
    /// │  2. Connect to Database (WAL, pending migrations)                      │
    /// │                                                                         │
    /// │  3. Rehydrate State                                                    │
    /// │     • CartState     ◄── cart-storage                                   │
    /// │     • SessionState  ◄── auth-storage                                   │
    /// │     • DashboardState    (seeded figures)                               │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn open(config: ConfigState) -> DbResult<Self> {
        Self::open_with_verifier(config, Arc::new(StaticCredentialVerifier)).await
    }

    /// [`open`](Self::open) with a custom credential verifier.
    pub async fn open_with_verifier(
        config: ConfigState,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> DbResult<Self> {
        let db_path = resolve_database_path(&config)?;
        info!(?db_path, "Database path determined");

        let db = Database::new(db_config(&db_path)).await?;
        info!("Database connected and migrations applied");

        let cart = CartState::load(&db).await;
        let session = SessionState::load(&db, verifier, config.login_timeout()).await;
        let dashboard = DashboardState::new();

        info!(store = %config.store_name, "State initialized");

        Ok(Storefront {
            config,
            db: DbState::new(db),
            cart,
            session,
            dashboard,
        })
    }

    /// Fresh storefront on a private in-memory database.
    pub async fn in_memory() -> DbResult<Self> {
        Self::open(ConfigState {
            database_path: Some(PathBuf::from(IN_MEMORY_PATH)),
            ..ConfigState::default()
        })
        .await
    }

    /// Writes both persisted stores and closes the pool.
    pub async fn shutdown(&self) {
        info!("Shutting down storefront");
        self.cart.save(self.db.inner()).await;
        self.session.save(self.db.inner()).await;
        self.db.inner().close().await;
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over `config.log_filter`. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_tracing(config: &ConfigState) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Where the database lives.
///
/// ## Resolution
/// - `config.database_path` when set (its parent directory is created)
/// - otherwise `storefront.db` in the platform data directory
pub fn resolve_database_path(config: &ConfigState) -> DbResult<PathBuf> {
    if let Some(path) = &config.database_path {
        if path.as_os_str() != IN_MEMORY_PATH {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir(parent)?;
            }
        }
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "storefront", "storefront").ok_or_else(|| {
        DbError::ConnectionFailed("Could not determine app data directory".to_string())
    })?;

    let data_dir = proj_dirs.data_dir();
    create_dir(data_dir)?;

    Ok(data_dir.join(DATABASE_FILE_NAME))
}

fn create_dir(dir: &Path) -> DbResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        DbError::ConnectionFailed(format!("Cannot create {}: {}", dir.display(), e))
    })
}

fn db_config(path: &Path) -> DbConfig {
    if path.as_os_str() == IN_MEMORY_PATH {
        DbConfig::in_memory()
    } else {
        DbConfig::new(path)
    }
}
