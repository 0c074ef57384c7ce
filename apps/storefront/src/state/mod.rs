//! # State Module
//!
//! One managed state type per store. Commands take only the states they
//! touch.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront::open(config)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┴────┬────────────────┬──────────────┐    │
//! │     ▼              ▼              ▼                ▼              ▼     │
//! │  ┌────────┐  ┌────────────┐  ┌──────────────┐ ┌──────────────┐ ┌──────┐│
//! │  │DbState │  │ CartState  │  │ SessionState │ │DashboardState│ │Config││
//! │  │        │  │ Arc<Mutex< │  │ Arc<Mutex<   │ │ Arc<Mutex<   │ │State ││
//! │  │Database│  │ CartLedger │  │  Session>>   │ │  Dashboard   │ │      ││
//! │  │ (pool) │  │ >>         │  │ + verifier   │ │  Metrics>>   │ │      ││
//! │  └────────┘  └────────────┘  └──────────────┘ └──────────────┘ └──────┘│
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: pool is internally synchronized                            │
//! │  • Cart/Session/Dashboard: one Mutex each, never held across .await   │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod dashboard;
mod db;
mod session;

pub use cart::CartState;
pub use config::{ConfigError, ConfigResult, ConfigState, CONFIG_FILE_NAME, DEFAULT_LOG_FILTER};
pub use dashboard::DashboardState;
pub use db::DbState;
pub use session::SessionState;
