//! # Commands Module
//!
//! The operations the pages invoke. Each command declares only the state it
//! needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn get_cart(cart: &CartState) -> CartResponse
//!
//! // Cart plus write-back
//! async fn add_to_cart(db: &DbState, cart: &CartState, candidate: ProductCandidate)
//!
//! // Everything checkout touches
//! async fn checkout(db: &DbState, cart: &CartState, session: &SessionState, dashboard: &DashboardState)
//! ```
//!
//! Responses and errors are `Serialize` and carry `ts-rs` bindings.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod session;
