//! # Catalog Commands
//!
//! Product listing and the "Add to Cart" button on each product card.

use storefront_core::{CatalogProduct, CoreError, ProductCandidate};
use tracing::debug;

use crate::catalog;
use crate::commands::cart::{add_to_cart, CartResponse};
use crate::error::ApiError;
use crate::state::{CartState, DbState};

/// Lists every catalog product.
pub fn list_products() -> Vec<CatalogProduct> {
    debug!("list_products command");
    catalog::products()
}

/// Gets one catalog product.
pub fn get_product(id: &str) -> Result<CatalogProduct, ApiError> {
    debug!(product_id = %id, "get_product command");
    catalog::find(id).ok_or_else(|| CoreError::ProductNotFound(id.to_string()).into())
}

/// Looks `id` up in the catalog and adds one unit of it.
pub async fn add_product_to_cart(
    db: &DbState,
    cart: &CartState,
    id: &str,
) -> Result<CartResponse, ApiError> {
    let product = get_product(id)?;
    Ok(add_to_cart(db, cart, ProductCandidate::from(&product)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::Storefront;
    use storefront_core::Money;

    #[test]
    fn test_list_products() {
        let products = list_products();
        assert_eq!(products.len(), 6);
        assert_eq!(products[0].name, "Wireless Headphones");
        assert_eq!(products[0].price, Money::from_cents(9999));
        assert_eq!(products[0].image, "🎧");
    }

    #[test]
    fn test_get_unknown_product() {
        let err = get_product("42").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 42");
    }

    #[tokio::test]
    async fn test_add_product_to_cart() {
        let app = Storefront::in_memory().await.unwrap();

        add_product_to_cart(&app.db, &app.cart, "2").await.unwrap();
        let cart = add_product_to_cart(&app.db, &app.cart, "4").await.unwrap();

        assert_eq!(cart.total_items, 2);
        assert_eq!(cart.total_price, Money::from_cents(29999 + 1999));
        assert_eq!(cart.items[0].image.as_deref(), Some("⌚"));
    }

    #[tokio::test]
    async fn test_add_unknown_product_leaves_cart_alone() {
        let app = Storefront::in_memory().await.unwrap();
        assert!(add_product_to_cart(&app.db, &app.cart, "99").await.is_err());
        assert!(crate::commands::cart::get_cart(&app.cart).items.is_empty());
    }
}
