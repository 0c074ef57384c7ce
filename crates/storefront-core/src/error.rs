//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── LoginError   - Why a login attempt did not authenticate           │
//! │  └── CoreError    - Catalog/checkout/snapshot failures                 │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError      - Database operation failures                        │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError     - What the pages see (serialized)                    │
//! │                                                                         │
//! │  Flow: CoreError / DbError → ApiError → Page                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations, logout and stats updates have no error type at all: they
//! are total. Login is the only fallible store operation, and it reports its
//! failure as a value (see [`LoginError`]).

use thiserror::Error;

// =============================================================================
// Login Error
// =============================================================================

/// Why a login attempt did not authenticate.
///
/// `InvalidCredentials` deliberately carries no detail: a wrong email and a
/// wrong password are the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// The email/password pair does not match any account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The credential check could not be performed.
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),

    /// The credential check did not answer in time.
    #[error("Authentication timed out after {after_ms} ms")]
    TimedOut { after_ms: u64 },
}

impl LoginError {
    /// True when retrying the same credentials later could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LoginError::InvalidCredentials)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised around the stores (never by the cart mutations
/// themselves).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart totals would not fit in the money range.
    #[error("Cart totals overflow")]
    CartOverflow,

    /// A persisted snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
