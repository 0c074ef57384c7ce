//! # Demo Catalog
//!
//! The fixed product list shown on the products page. Read-only; the cart
//! never consults it.

use storefront_core::{CatalogProduct, Money};

/// `(id, name, cents, image, description)`
const PRODUCTS: [(&str, &str, i64, &str, &str); 6] = [
    ("1", "Wireless Headphones", 9999, "🎧", "High-quality wireless headphones"),
    ("2", "Smart Watch", 29999, "⌚", "Feature-rich smartwatch"),
    ("3", "Laptop Stand", 4999, "💻", "Ergonomic laptop stand"),
    ("4", "Coffee Mug", 1999, "☕", "Premium ceramic mug"),
    ("5", "Desk Lamp", 7999, "💡", "LED desk lamp with adjustable brightness"),
    ("6", "Mechanical Keyboard", 14999, "⌨️", "RGB mechanical keyboard"),
];

/// All catalog products, in display order.
pub fn products() -> Vec<CatalogProduct> {
    PRODUCTS.iter().map(to_product).collect()
}

/// Looks up a product by id.
pub fn find(id: &str) -> Option<CatalogProduct> {
    PRODUCTS.iter().find(|p| p.0 == id).map(to_product)
}

fn to_product(&(id, name, cents, image, description): &(&str, &str, i64, &str, &str)) -> CatalogProduct {
    CatalogProduct {
        id: id.to_string(),
        name: name.to_string(),
        price: Money::from_cents(cents),
        image: image.to_string(),
        description: description.to_string(),
    }
}
