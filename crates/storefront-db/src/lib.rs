//! # storefront-db: Snapshot Persistence for the Storefront
//!
//! Durable storage for the cart and session stores. Each store is written as
//! one JSON snapshot under a fixed key in a local SQLite database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  CartState::save / SessionState::save (apps/storefront)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storefront-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │ SnapshotRepository │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  get / put / json  │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   storefront.db     snapshots(key, payload, updated_at)         │   │
//! │  │                     "cart-storage" │ {"items":[...],...}        │   │
//! │  │                     "auth-storage" │ {"user":{...},...}         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{keys, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! db.snapshots().save_json(keys::CART, &cart).await?;
//! let cart: Option<CartLedger> = db.snapshots().load_json(keys::CART).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{keys, SnapshotRepository};
