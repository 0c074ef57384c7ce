//! # Dashboard Metrics
//!
//! Display counters and the recent-orders list shown on the dashboard.
//!
//! Nothing here is validated: negative revenue, duplicate order ids and
//! arbitrary counters are all accepted as given. The only rule is the
//! [`RECENT_ORDERS_LIMIT`] cap on the recent-orders list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::RECENT_ORDERS_LIMIT;

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

// =============================================================================
// Order Record
// =============================================================================

/// One row of the recent-orders table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRecord {
    pub id: String,
    pub customer: String,
    pub amount: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// The four headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_revenue: Money,
    pub total_customers: u64,
    pub total_products: u64,
}

// =============================================================================
// Dashboard Metrics
// =============================================================================

/// Counters plus the most-recent-first order list (at most
/// [`RECENT_ORDERS_LIMIT`] entries).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardMetrics {
    stats: DashboardStats,
    recent_orders: Vec<OrderRecord>,
}

impl DashboardMetrics {
    /// Creates metrics with zeroed counters and no orders.
    pub fn empty() -> Self {
        DashboardMetrics {
            stats: DashboardStats::default(),
            recent_orders: Vec::new(),
        }
    }

    /// The figures the dashboard shows on first load.
    pub fn seeded() -> Self {
        let seed_orders = [
            ("3", "Bob Johnson", 8999, OrderStatus::Shipped, (2024, 1, 13)),
            ("2", "Jane Smith", 15950, OrderStatus::Pending, (2024, 1, 14)),
            ("1", "John Doe", 29999, OrderStatus::Completed, (2024, 1, 15)),
        ];

        let mut metrics = DashboardMetrics {
            stats: DashboardStats {
                total_orders: 150,
                total_revenue: Money::from_cents(2_500_000),
                total_customers: 75,
                total_products: 200,
            },
            recent_orders: Vec::with_capacity(RECENT_ORDERS_LIMIT),
        };

        // Oldest first so add_order leaves the newest on top.
        for (id, customer, cents, status, (y, m, d)) in seed_orders {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                metrics.add_order(OrderRecord {
                    id: id.to_string(),
                    customer: customer.to_string(),
                    amount: Money::from_cents(cents),
                    status,
                    date,
                });
            }
        }

        metrics
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Most recent first.
    pub fn recent_orders(&self) -> &[OrderRecord] {
        &self.recent_orders
    }

    /// Replaces all four counters.
    pub fn update_stats(&mut self, stats: DashboardStats) {
        self.stats = stats;
    }

    /// Puts `order` at the front, dropping the oldest entries beyond the cap.
    pub fn add_order(&mut self, order: OrderRecord) {
        self.recent_orders.insert(0, order);
        self.recent_orders.truncate(RECENT_ORDERS_LIMIT);
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::seeded()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
