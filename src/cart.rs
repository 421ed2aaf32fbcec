//! Shopping cart of site snapshots.
//!
//! There is deliberately no way to take a single site back out of the cart;
//! it only empties through checkout.

use crate::error::{MarketError, Result};
use crate::models::Site;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<Site>,
}

impl Cart {
    pub fn from_items(items: Vec<Site>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Site] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    /// Returns the cart with `site` appended.
    ///
    /// Fails with `AlreadyInCart` if a site with the same URL is present.
    pub fn with_added(&self, site: &Site) -> Result<Cart> {
        if self.contains(&site.url) {
            return Err(MarketError::AlreadyInCart(site.url.clone()));
        }
        let mut items = self.items.clone();
        items.push(site.clone());
        Ok(Cart { items })
    }

    /// Sum of all prices; non-finite prices count as 0.
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| if item.price.is_finite() { item.price } else { 0.0 })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_in_order() {
        let cart = Cart::default()
            .with_added(&Site::new("a.com", 10.0, 0.0, 0.0))
            .unwrap()
            .with_added(&Site::new("b.com", 20.0, 0.0, 0.0))
            .unwrap();

        let urls: Vec<&str> = cart.items().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["a.com", "b.com"]);
    }

    #[test]
    fn add_rejects_duplicate_url() {
        let site = Site::new("a.com", 10.0, 0.0, 0.0);
        let cart = Cart::default().with_added(&site).unwrap();

        // Same URL with a different price is still a duplicate
        let repriced = Site::new("a.com", 5.0, 0.0, 0.0);
        let result = cart.with_added(&repriced);

        assert!(matches!(result, Err(MarketError::AlreadyInCart(url)) if url == "a.com"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn total_sums_prices() {
        let cart = Cart::from_items(vec![
            Site::new("a.com", 10.0, 0.0, 0.0),
            Site::new("b.com", 20.5, 0.0, 0.0),
        ]);
        assert_eq!(cart.total(), 30.5);
    }

    #[test]
    fn total_treats_nan_as_zero() {
        let cart = Cart::from_items(vec![
            Site::new("a.com", f64::NAN, 0.0, 0.0),
            Site::new("b.com", 7.0, 0.0, 0.0),
        ]);
        assert_eq!(cart.total(), 7.0);
    }

    #[test]
    fn empty_cart_total_is_zero() {
        assert_eq!(Cart::default().total(), 0.0);
    }
}
