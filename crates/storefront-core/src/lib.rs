//! # storefront-core: Pure State Logic for the Storefront
//!
//! This crate holds the stores that the storefront pages read from and write
//! to. Everything here is deterministic and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Pages (product list, cart, dashboard)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          apps/storefront (managed state + commands)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │  session  │  │ dashboard │  │   │
//! │  │   │   Money   │  │CartLedger │  │  Session  │  │  Metrics  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                storefront-db (snapshot storage)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Shared domain types (Identity, ProductCandidate, CatalogProduct)
//! - [`cart`] - The cart ledger and its persisted snapshot
//! - [`session`] - The session state machine and credential matching
//! - [`dashboard`] - Dashboard counters and the recent-orders buffer
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart::CartLedger;
//! use storefront_core::money::Money;
//! use storefront_core::types::ProductCandidate;
//!
//! let mut cart = CartLedger::new();
//! let headphones = ProductCandidate::new("1", "Headphones", Money::from_cents(9999));
//!
//! cart.add_item(headphones.clone());
//! cart.add_item(headphones);
//!
//! assert_eq!(cart.total_item_count(), 2);
//! assert_eq!(cart.total_price().cents(), 19998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod session;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLedger, CartLineItem, CartSnapshot};
pub use dashboard::{DashboardMetrics, DashboardStats, OrderRecord, OrderStatus};
pub use error::{CoreError, CoreResult, LoginError};
pub use money::Money;
pub use session::{Credentials, Session, SessionSnapshot, SessionStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of orders kept in the dashboard's recent-orders list.
pub const RECENT_ORDERS_LIMIT: usize = 10;
