//! # Dashboard Commands
//!
//! Read and update the dashboard figures. All of them require a logged-in
//! session.

use serde::Serialize;
use storefront_core::{DashboardMetrics, DashboardStats, OrderRecord, Session};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::ApiError;
use crate::state::{DashboardState, SessionState};

/// Counters plus recent orders, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_orders: Vec<OrderRecord>,
}

impl From<&DashboardMetrics> for DashboardResponse {
    fn from(metrics: &DashboardMetrics) -> Self {
        DashboardResponse {
            stats: *metrics.stats(),
            recent_orders: metrics.recent_orders().to_vec(),
        }
    }
}

fn require_login(session: &SessionState) -> Result<(), ApiError> {
    if session.with_session(Session::is_authenticated) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Please log in to access the dashboard."))
    }
}

/// Gets the dashboard figures.
pub fn get_dashboard(
    session: &SessionState,
    dashboard: &DashboardState,
) -> Result<DashboardResponse, ApiError> {
    debug!("get_dashboard command");
    require_login(session)?;
    Ok(dashboard.with_metrics(|m| DashboardResponse::from(m)))
}

/// Replaces the four counters. Values are not validated.
pub fn update_stats(
    session: &SessionState,
    dashboard: &DashboardState,
    stats: DashboardStats,
) -> Result<DashboardResponse, ApiError> {
    debug!(?stats, "update_stats command");
    require_login(session)?;
    Ok(dashboard.with_metrics_mut(|m| {
        m.update_stats(stats);
        DashboardResponse::from(&*m)
    }))
}

/// Prepends an order, keeping only the most recent ones.
pub fn add_order(
    session: &SessionState,
    dashboard: &DashboardState,
    order: OrderRecord,
) -> Result<DashboardResponse, ApiError> {
    debug!(order_id = %order.id, "add_order command");
    require_login(session)?;
    info!(order_id = %order.id, amount = %order.amount, "Order added to dashboard");
    Ok(dashboard.with_metrics_mut(|m| {
        m.add_order(order);
        DashboardResponse::from(&*m)
    }))
}
