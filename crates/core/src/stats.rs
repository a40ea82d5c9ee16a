//! Derived views over a catalog.
//!
//! Pure, side-effect-free computations consumed by presentation layers.
//! Nothing here caches its own result: the catalog is the single source of
//! truth and may change between calls.

use rust_decimal::Decimal;

use crate::types::Product;

/// All products at or below their low-stock threshold, in catalog order.
#[must_use]
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_low_stock()).collect()
}

/// Total inventory value: the sum of `price * quantity` over the catalog.
#[must_use]
pub fn total_value(products: &[Product]) -> Decimal {
    products
        .iter()
        .map(|p| p.price * Decimal::from(p.quantity))
        .sum()
}

/// Total units on hand across all products.
#[must_use]
pub fn total_units(products: &[Product]) -> u64 {
    products.iter().map(|p| u64::from(p.quantity)).sum()
}
