//! # Cart State
//!
//! The managed cart ledger.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Page Action              Command                 Ledger Change         │
//! │  ───────────              ───────                 ─────────────         │
//! │                                                                         │
//! │  Click "Add to Cart" ────► add_to_cart() ───────► add_item(candidate)  │
//! │                                                                         │
//! │  Click + / − ────────────► update_cart_item() ──► update_quantity()    │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► remove_item()        │
//! │                                                                         │
//! │  View Cart ──────────────► get_cart() ──────────► (read only)          │
//! │                                                                         │
//! │  Every write: mutate under the lock, release, then save(&db).          │
//! │  save() snapshots and writes under one write guard, in arrival order.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use storefront_core::{CartLedger, CartSnapshot};
use storefront_db::{keys, Database, DbResult};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

/// Thread-safe handle to the cart ledger.
///
/// Clones share the same ledger.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartLedger>>,
    /// Held from snapshot to write so saves land in the order they snapshot.
    write_guard: Arc<AsyncMutex<()>>,
}

impl CartState {
    /// Creates a state holding an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ledger(ledger: CartLedger) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(ledger)),
            write_guard: Arc::default(),
        }
    }

    /// Rehydrates the cart from `cart-storage`.
    ///
    /// A missing record yields an empty cart. An unreadable one is logged
    /// and also yields an empty cart.
    pub async fn load(db: &Database) -> Self {
        match db.snapshots().load_json::<CartLedger>(keys::CART).await {
            Ok(Some(ledger)) => {
                debug!(
                    lines = ledger.line_count(),
                    items = ledger.total_item_count(),
                    "Cart restored"
                );
                Self::from_ledger(ledger)
            }
            Ok(None) => Self::new(),
            Err(e) => {
                warn!(error = %e, "Stored cart unreadable, starting empty");
                Self::new()
            }
        }
    }

    /// Writes the current cart to `cart-storage`.
    ///
    /// The snapshot is taken after the write guard is acquired, so the last
    /// write always carries the newest cart.
    pub async fn try_save(&self, db: &Database) -> DbResult<()> {
        let _guard = self.write_guard.lock().await;
        let snapshot: CartSnapshot = self.with_cart(CartLedger::snapshot);
        db.snapshots().save_json(keys::CART, &snapshot).await
    }

    /// [`try_save`](Self::try_save), logging instead of returning a failure.
    pub async fn save(&self, db: &Database) {
        if let Err(e) = self.try_save(db).await {
            warn!(error = %e, "Failed to persist cart");
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ```rust,ignore
    /// let total = cart_state.with_cart(|cart| cart.total_price());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartLedger) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.remove_item("1"));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartLedger) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
