//! # Cart Commands
//!
//! Commands for cart manipulation and checkout.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────────────┐            │
//! │  │  Empty   │────►│ In Cart  │────►│  Order on Dashboard  │            │
//! │  │  Cart    │     │          │     │  (receipt returned)  │            │
//! │  └──────────┘     └──────────┘     └──────────────────────┘            │
//! │       ▲                │                     │                          │
//! │       │           add_to_cart           checkout                       │
//! │       │           update_cart_item           │                          │
//! │       │           remove_from_cart           │                          │
//! │       │                │                     │                          │
//! │       └──── clear_cart ┴─────────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutations never fail. The write-back to storage after each one is
//! best-effort and only logged when it fails.

use chrono::Local;
use serde::{Deserialize, Serialize};
use storefront_core::{
    CartLedger, CartLineItem, CoreError, Money, OrderRecord, OrderStatus, ProductCandidate,
};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::{CartState, DashboardState, DbState, SessionState};

/// Customer name recorded for orders placed without a login.
pub const GUEST_CUSTOMER: &str = "Guest";

/// Cart contents with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartResponse {
    pub items: Vec<CartLineItem>,
    pub total_items: i64,
    pub total_price: Money,
}

impl From<&CartLedger> for CartResponse {
    fn from(cart: &CartLedger) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            total_items: cart.total_item_count(),
            total_price: cart.total_price(),
        }
    }
}

/// What checkout hands back to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutReceipt {
    pub order: OrderRecord,
    pub item_count: i64,
    pub lines: Vec<CartLineItem>,
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds one unit of `candidate`.
///
/// ## Behavior
/// - Already in cart: quantity + 1, stored name and price kept
/// - Not in cart: appended with quantity 1
/// - No catalog check
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    candidate: ProductCandidate,
) -> CartResponse {
    debug!(product_id = %candidate.id, "add_to_cart command");

    let response = cart.with_cart_mut(|c| {
        c.add_item(candidate);
        CartResponse::from(&*c)
    });

    cart.save(db.inner()).await;
    response
}

/// Sets the quantity of a line.
///
/// ## Behavior
/// - `quantity <= 0`: removes the line
/// - Unknown id: no change
pub async fn update_cart_item(
    db: &DbState,
    cart: &CartState,
    product_id: &str,
    quantity: i64,
) -> CartResponse {
    debug!(product_id = %product_id, quantity, "update_cart_item command");

    let response = cart.with_cart_mut(|c| {
        c.update_quantity(product_id, quantity);
        CartResponse::from(&*c)
    });

    cart.save(db.inner()).await;
    response
}

/// Removes a line. Unknown ids are ignored.
pub async fn remove_from_cart(db: &DbState, cart: &CartState, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");

    let response = cart.with_cart_mut(|c| {
        c.remove_item(product_id);
        CartResponse::from(&*c)
    });

    cart.save(db.inner()).await;
    response
}

/// Empties the cart.
pub async fn clear_cart(db: &DbState, cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    let response = cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    });

    cart.save(db.inner()).await;
    response
}

/// Turns the cart into a pending order on the dashboard.
///
/// ## Flow
/// ```text
/// cart (non-empty) ──► take lines + totals, clear cart   (cart lock)
///        │
///        ▼
/// OrderRecord { uuid, customer, total, pending, today }
///        │
///        ▼
/// totalOrders + 1, totalRevenue + total (saturating), add_order   (dashboard lock)
///        │
///        ▼
/// save cart ──► CheckoutReceipt
/// ```
///
/// ## Returns
/// * `Ok(CheckoutReceipt)` - Order recorded, cart empty
/// * `Err(ApiError)` with `CART_ERROR` - Cart was empty; nothing changed
pub async fn checkout(
    db: &DbState,
    cart: &CartState,
    session: &SessionState,
    dashboard: &DashboardState,
) -> Result<CheckoutReceipt, ApiError> {
    debug!("checkout command");

    let taken = cart.with_cart_mut(|c| {
        if c.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let snapshot = c.snapshot();
        c.clear();
        Ok(snapshot)
    })?;

    let customer = session
        .with_session(|s| s.identity().map(|i| i.display_name.clone()))
        .unwrap_or_else(|| GUEST_CUSTOMER.to_string());

    let order = OrderRecord {
        id: Uuid::new_v4().to_string(),
        customer,
        amount: taken.total_price,
        status: OrderStatus::Pending,
        date: Local::now().date_naive(),
    };

    dashboard.with_metrics_mut(|m| {
        let mut stats = *m.stats();
        stats.total_orders = stats.total_orders.saturating_add(1);
        stats.total_revenue += order.amount;
        m.update_stats(stats);
        m.add_order(order.clone());
    });

    cart.save(db.inner()).await;

    info!(
        order_id = %order.id,
        customer = %order.customer,
        amount = %order.amount,
        items = taken.total_items,
        "Checkout completed"
    );

    Ok(CheckoutReceipt {
        order,
        item_count: taken.total_items,
        lines: taken.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConfigState;
    use crate::Storefront;
    use storefront_core::{Credentials, DashboardStats, Identity};

    fn headphones() -> ProductCandidate {
        ProductCandidate::new("1", "Wireless Headphones", Money::from_cents(9999))
    }

    #[tokio::test]
    async fn test_headphones_scenario() {
        let app = Storefront::in_memory().await.unwrap();

        add_to_cart(&app.db, &app.cart, headphones()).await;
        let cart = add_to_cart(&app.db, &app.cart, headphones()).await;
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total_items, 2);
        assert_eq!(cart.total_price, Money::from_cents(19998));

        let cart = update_cart_item(&app.db, &app.cart, "1", 5).await;
        assert_eq!(cart.total_price, Money::from_cents(49995));

        let cart = remove_from_cart(&app.db, &app.cart, "1").await;
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.total_price, Money::zero());
    }

    #[tokio::test]
    async fn test_non_positive_quantity_removes() {
        let app = Storefront::in_memory().await.unwrap();
        add_to_cart(&app.db, &app.cart, headphones()).await;
        assert!(update_cart_item(&app.db, &app.cart, "1", 0).await.items.is_empty());

        add_to_cart(&app.db, &app.cart, headphones()).await;
        assert!(update_cart_item(&app.db, &app.cart, "1", -5).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_cart_unchanged() {
        let app = Storefront::in_memory().await.unwrap();
        let before = add_to_cart(&app.db, &app.cart, headphones()).await;

        assert_eq!(remove_from_cart(&app.db, &app.cart, "nope").await, before);
        assert_eq!(update_cart_item(&app.db, &app.cart, "nope", 3).await, before);
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let app = Storefront::in_memory().await.unwrap();
        add_to_cart(&app.db, &app.cart, headphones()).await;

        let restored = CartState::load(app.db.inner()).await;
        assert_eq!(restored.with_cart(CartLedger::total_item_count), 1);

        clear_cart(&app.db, &app.cart).await;
        let restored = CartState::load(app.db.inner()).await;
        assert!(restored.with_cart(CartLedger::is_empty));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_persist_the_latest_cart() {
        let path = std::env::temp_dir()
            .join(format!("storefront-concurrent-{}", std::process::id()))
            .join(crate::DATABASE_FILE_NAME);
        let app = Storefront::open(ConfigState {
            database_path: Some(path.clone()),
            ..ConfigState::default()
        })
        .await
        .unwrap();

        let tasks: Vec<_> = (0..32)
            .map(|n| {
                let app = app.clone();
                tokio::spawn(async move {
                    let candidate = ProductCandidate::new(
                        n.to_string(),
                        format!("Product {}", n),
                        Money::from_cents(100),
                    );
                    add_to_cart(&app.db, &app.cart, candidate).await;
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let persisted = CartState::load(app.db.inner()).await;
        assert_eq!(persisted.with_cart(CartLedger::line_count), 32);
        assert_eq!(persisted.with_cart(|c| c.clone()), app.cart.with_cart(|c| c.clone()));

        app.db.inner().close().await;
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[tokio::test]
    async fn test_overflowing_quantity_leaves_cart_unchanged() {
        let app = Storefront::in_memory().await.unwrap();
        let before = add_to_cart(&app.db, &app.cart, headphones()).await;

        assert_eq!(update_cart_item(&app.db, &app.cart, "1", i64::MAX / 2).await, before);
        assert_eq!(CartState::load(app.db.inner()).await.with_cart(CartLedger::total_item_count), 1);
    }

    #[tokio::test]
    async fn test_checkout_with_counters_at_max() {
        let app = Storefront::in_memory().await.unwrap();
        app.dashboard.with_metrics_mut(|m| {
            m.update_stats(DashboardStats {
                total_orders: u64::MAX,
                total_revenue: Money::from_cents(i64::MAX),
                total_customers: 0,
                total_products: 0,
            })
        });

        add_to_cart(&app.db, &app.cart, headphones()).await;
        checkout(&app.db, &app.cart, &app.session, &app.dashboard)
            .await
            .unwrap();

        let stats = app.dashboard.with_metrics(|m| *m.stats());
        assert_eq!(stats.total_orders, u64::MAX);
        assert_eq!(stats.total_revenue, Money::from_cents(i64::MAX));
        assert_eq!(app.dashboard.with_metrics(|m| m.recent_orders().len()), 1);
    }

    #[tokio::test]
    async fn test_checkout_as_guest() {
        let app = Storefront::in_memory().await.unwrap();
        let before = app.dashboard.with_metrics(|m| *m.stats());

        add_to_cart(&app.db, &app.cart, headphones()).await;
        add_to_cart(&app.db, &app.cart, headphones()).await;
        let receipt = checkout(&app.db, &app.cart, &app.session, &app.dashboard)
            .await
            .unwrap();

        assert_eq!(receipt.order.customer, GUEST_CUSTOMER);
        assert_eq!(receipt.order.amount, Money::from_cents(19998));
        assert_eq!(receipt.order.status, OrderStatus::Pending);
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.lines.len(), 1);

        assert!(get_cart(&app.cart).items.is_empty());
        let after = app.dashboard.with_metrics(|m| *m.stats());
        assert_eq!(after.total_orders, before.total_orders + 1);
        assert_eq!(after.total_revenue, before.total_revenue + Money::from_cents(19998));
        let newest = app.dashboard.with_metrics(|m| m.recent_orders()[0].clone());
        assert_eq!(newest, receipt.order);
    }

    #[tokio::test]
    async fn test_checkout_uses_display_name() {
        let app = Storefront::in_memory().await.unwrap();
        app.session
            .login(&Credentials::new("admin@example.com", "password"))
            .await
            .unwrap();
        add_to_cart(&app.db, &app.cart, headphones()).await;

        let receipt = checkout(&app.db, &app.cart, &app.session, &app.dashboard)
            .await
            .unwrap();
        assert_eq!(receipt.order.customer, "Admin User");

        app.session.set_identity(Identity::new("9", "j@example.com", "Jane"));
        add_to_cart(&app.db, &app.cart, headphones()).await;
        let receipt = checkout(&app.db, &app.cart, &app.session, &app.dashboard)
            .await
            .unwrap();
        assert_eq!(receipt.order.customer, "Jane");
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_changes_nothing() {
        let app = Storefront::in_memory().await.unwrap();
        let before = app.dashboard.with_metrics(|m| m.clone());

        let err = checkout(&app.db, &app.cart, &app.session, &app.dashboard)
            .await
            .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::CartError);
        assert_eq!(app.dashboard.with_metrics(|m| m.clone()), before);
    }
}
