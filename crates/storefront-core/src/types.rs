//! # Domain Types
//!
//! Types shared between the stores and the pages that drive them.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │  CatalogProduct  │   │ ProductCandidate │   │     Identity     │    │
//! │  │  ──────────────  │──►│  ──────────────  │   │  ──────────────  │    │
//! │  │  id              │   │  id              │   │  id              │    │
//! │  │  name            │   │  name            │   │  email           │    │
//! │  │  price           │   │  unit_price      │   │  display_name    │    │
//! │  │  image           │   │  image?          │   │                  │    │
//! │  │  description     │   │                  │   │                  │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! │                          what add_item takes    who is logged in       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identity
// =============================================================================

/// The authenticated user carried by a [`Session`](crate::session::Session).
///
/// Persisted with the field name `name` for `display_name`, which is the
/// shape the pages already read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub id: String,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Identity {
            id: id.into(),
            email: email.into(),
            display_name: display_name.into(),
        }
    }
}

// =============================================================================
// Product Candidate
// =============================================================================

/// What the product listing hands to the cart: a line item without quantity.
///
/// The ledger never checks a candidate against any catalog. It does refuse a
/// negative `unit_price`: see [`CartLedger::add_item`](crate::cart::CartLedger::add_item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCandidate {
    pub id: String,
    pub name: String,
    /// Serialized as `price` (cents).
    #[serde(rename = "price")]
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductCandidate {
    /// Creates a candidate without an image.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        ProductCandidate {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: None,
        }
    }

    /// Attaches a display glyph or image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// An entry of the read-only product catalog shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub description: String,
}

impl From<&CatalogProduct> for ProductCandidate {
    fn from(product: &CatalogProduct) -> Self {
        ProductCandidate {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image: Some(product.image.clone()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
