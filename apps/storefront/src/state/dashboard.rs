//! # Dashboard State
//!
//! The managed dashboard metrics. Kept in memory only; a restart shows the
//! seeded figures again.

use std::sync::{Arc, Mutex, PoisonError};

use storefront_core::DashboardMetrics;

/// Thread-safe handle to the dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardState {
    metrics: Arc<Mutex<DashboardMetrics>>,
}

impl DashboardState {
    /// Starts from the seeded figures.
    pub fn new() -> Self {
        Self::from_metrics(DashboardMetrics::seeded())
    }

    pub fn from_metrics(metrics: DashboardMetrics) -> Self {
        DashboardState {
            metrics: Arc::new(Mutex::new(metrics)),
        }
    }

    pub fn with_metrics<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DashboardMetrics) -> R,
    {
        let metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        f(&metrics)
    }

    pub fn with_metrics_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DashboardMetrics) -> R,
    {
        let mut metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut metrics)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
