//! Cart store
//!
//! An ordered, non-deduplicated collection of line items. Each line item
//! copies the variant it was created from, so later catalog selection
//! changes never affect what is already in the cart.
//!
//! Identifiers come from a monotonic counter owned by the cart. They are
//! unique for the cart's whole lifetime, including across `remove` and
//! `clear`, so no two adds can ever collide.

use crate::catalog::{Product, Variant};
use serde::Serialize;
use std::fmt;

/// Identifier of a single line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineItemId(u64);

impl From<u64> for LineItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One unit of a variant placed into the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub name: String,
    pub size: String,
    pub price: u32,
    pub image: String,
}

impl LineItem {
    /// Order-summary line, e.g. `- <name> (250 ml): ₹450`
    pub fn summary_line(&self) -> String {
        format!("- {} ({}): ₹{}", self.name, self.size, self.price)
    }
}

/// Shopping cart
///
/// # Examples
///
/// ```
/// use ecopure::cart::Cart;
/// use ecopure::catalog::PRODUCT;
///
/// let mut cart = Cart::new();
/// let id = cart.add(&PRODUCT.variants[0], &PRODUCT);
/// cart.add(&PRODUCT.variants[0], &PRODUCT);
/// assert_eq!(cart.len(), 2);
/// assert_eq!(cart.total(), 500);
///
/// assert!(cart.remove(id));
/// assert_eq!(cart.total(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
    next_id: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new line item for `variant`
    ///
    /// Returns the identifier of the new item.
    pub fn add(&mut self, variant: &Variant, product: &Product) -> LineItemId {
        self.next_id += 1;
        let id = LineItemId(self.next_id);
        self.items.push(LineItem {
            id,
            name: product.name.to_string(),
            size: variant.size.to_string(),
            price: variant.price,
            image: product.cart_image().to_string(),
        });
        tracing::debug!(item_id = %id, size = variant.size, total = self.total(), "Added line item");
        id
    }

    /// Remove the line item with `id`
    ///
    /// Returns `false` and leaves the cart untouched when no item matches.
    pub fn remove(&mut self, id: LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            tracing::debug!(item_id = %id, total = self.total(), "Removed line item");
        }
        removed
    }

    /// Sum of all item prices, recomputed on every call
    pub fn total(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.price)).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PRODUCT;
    use std::collections::HashSet;

    fn variant(size: &str) -> &'static Variant {
        PRODUCT.variant(size).unwrap()
    }

    #[test]
    fn test_add_copies_variant_and_product_fields() {
        let mut cart = Cart::new();
        let id = cart.add(variant("250 ml"), &PRODUCT);
        let item = &cart.items()[0];
        assert_eq!(item.id, id);
        assert_eq!(item.name, PRODUCT.name);
        assert_eq!(item.size, "250 ml");
        assert_eq!(item.price, 450);
        assert_eq!(item.image, "1000262838.jpg");
    }

    #[test]
    fn test_repeated_adds_are_not_consolidated() {
        let mut cart = Cart::new();
        cart.add(variant("100 ml"), &PRODUCT);
        cart.add(variant("100 ml"), &PRODUCT);
        assert_eq!(cart.len(), 2);
        assert_ne!(cart.items()[0].id, cart.items()[1].id);
    }

    #[test]
    fn test_total_tracks_adds_and_removes() {
        let mut cart = Cart::new();
        let sizes = ["100 ml", "500 ml", "250 ml", "500 ml", "100 ml"];
        let ids: Vec<_> = sizes.iter().map(|s| cart.add(variant(s), &PRODUCT)).collect();
        assert_eq!(cart.total(), 250 + 750 + 450 + 750 + 250);

        cart.remove(ids[1]);
        cart.remove(ids[4]);
        assert_eq!(cart.total(), 250 + 450 + 750);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(variant("250 ml"), &PRODUCT);
        let (len, total) = (cart.len(), cart.total());

        assert!(!cart.remove(LineItemId::from(999)));
        assert_eq!(cart.len(), len);
        assert_eq!(cart.total(), total);
    }

    #[test]
    fn test_rapid_adds_yield_unique_ids() {
        let mut cart = Cart::new();
        let ids: HashSet<_> = (0..10_000)
            .map(|_| cart.add(variant("250 ml"), &PRODUCT))
            .collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut cart = Cart::new();
        let first = cart.add(variant("250 ml"), &PRODUCT);
        cart.clear();
        assert!(cart.is_empty());
        let second = cart.add(variant("250 ml"), &PRODUCT);
        assert!(second > first);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(variant("500 ml"), &PRODUCT);
        cart.add(variant("100 ml"), &PRODUCT);
        let sizes: Vec<_> = cart.items().iter().map(|i| i.size.as_str()).collect();
        assert_eq!(sizes, vec!["500 ml", "100 ml"]);
    }

    #[test]
    fn test_summary_line_format() {
        let mut cart = Cart::new();
        cart.add(variant("250 ml"), &PRODUCT);
        assert_eq!(
            cart.items()[0].summary_line(),
            "- SUCHI’S ECO PURE Infused Organic Hair Oil (250 ml): ₹450"
        );
    }
}
