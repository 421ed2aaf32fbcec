//! Application state: catalog, cart and wallet bound to a key-value store.
//!
//! Every mutation builds the next state, writes it, and only then swaps it in.
//! If the write fails the in-memory state is untouched, so memory and storage
//! never disagree.

use crate::cart::Cart;
use crate::catalog::{parse_sites, Catalog};
use crate::checkout::settle;
use crate::error::{MarketError, Result, StoreError};
use crate::filter::{visible, SiteFilter};
use crate::models::{ImportSummary, Receipt, Site};
use crate::store::{KeyValueStore, StoreWrite, CART_KEY, CATALOG_KEY, WALLET_KEY};
use crate::wallet::Wallet;
use serde::de::DeserializeOwned;
use std::path::Path;

pub struct Market<S: KeyValueStore> {
    store: S,
    catalog: Catalog,
    cart: Cart,
    wallet: Wallet,
}

impl<S: KeyValueStore> Market<S> {
    /// Rehydrates catalog, cart and wallet from `store`.
    ///
    /// Missing keys start empty. A stored value that cannot be decoded is
    /// logged and treated as missing; only a failing store read is an error.
    pub fn load(store: S) -> Result<Self> {
        let catalog = Catalog::from_sites(load_sites(&store, CATALOG_KEY)?);
        let cart = Cart::from_items(load_sites(&store, CART_KEY)?);
        let wallet = store
            .get(WALLET_KEY)?
            .map(|raw| Wallet::decode(&raw))
            .unwrap_or_default();

        log::info!(
            "Loaded market: {} sites, {} in cart, wallet {}",
            catalog.len(),
            cart.len(),
            wallet.balance()
        );

        Ok(Self {
            store,
            catalog,
            cart,
            wallet,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.total()
    }

    pub fn balance(&self) -> f64 {
        self.wallet.balance()
    }

    /// Sites matching `filter`, in catalog order
    pub fn visible(&self, filter: &SiteFilter) -> Vec<&Site> {
        visible(self.catalog.sites(), filter)
    }

    /// Site detail by exact URL
    pub fn site(&self, url: &str) -> Option<&Site> {
        self.catalog.get(url)
    }

    /// Replaces the catalog with the sites in a CSV payload.
    ///
    /// On a parse or write failure the previous catalog stays in place.
    pub fn import_csv(&mut self, data: &[u8]) -> Result<ImportSummary> {
        let parsed = parse_sites(data)?;
        let encoded = encode_sites(&parsed.sites)?;
        self.store.set(CATALOG_KEY, &encoded)?;

        let summary = ImportSummary {
            count: parsed.sites.len(),
            skipped: parsed.skipped,
        };
        self.catalog = Catalog::from_sites(parsed.sites);

        log::info!(
            "Imported {} sites ({} rows without URL skipped)",
            summary.count,
            summary.skipped
        );
        Ok(summary)
    }

    /// Reads `path` and imports it.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportSummary> {
        log::info!("Importing catalog from {}", path.display());
        let data = std::fs::read(path)?;
        self.import_csv(&data)
    }

    /// Adds the catalog site with this URL to the cart and returns the snapshot added.
    pub fn add_to_cart(&mut self, url: &str) -> Result<Site> {
        let site = self
            .catalog
            .get(url)
            .ok_or_else(|| MarketError::SiteNotFound(url.to_string()))?
            .clone();
        let next = self.cart.with_added(&site)?;

        self.store.set(CART_KEY, &encode_sites(next.items())?)?;
        self.cart = next;

        log::info!("Added {} to cart ({} items)", url, self.cart.len());
        Ok(site)
    }

    /// Adds `amount` to the wallet and returns the new balance.
    ///
    /// Fails with `InvalidAmount` for a negative amount or an overflowing balance.
    pub fn top_up(&mut self, amount: f64) -> Result<f64> {
        let next = self
            .wallet
            .topped_up(amount)
            .ok_or(MarketError::InvalidAmount(amount))?;
        self.store.set(WALLET_KEY, &next.encode())?;
        self.wallet = next;

        log::info!("Wallet topped up by {}, balance {}", amount, next.balance());
        Ok(next.balance())
    }

    /// Pays for the whole cart from the wallet and empties the cart.
    ///
    /// Wallet and cart are written in one batch. On `InsufficientFunds` or a
    /// failed write nothing changes.
    pub fn checkout(&mut self) -> Result<Receipt> {
        let settlement = settle(&self.cart, &self.wallet)?;

        self.store.apply(&[
            StoreWrite::set(WALLET_KEY, settlement.wallet.encode()),
            StoreWrite::remove(CART_KEY),
        ])?;
        self.wallet = settlement.wallet;
        self.cart = Cart::default();

        log::info!(
            "Purchase complete: spent {}, new balance {}",
            settlement.receipt.amount_spent,
            settlement.receipt.new_balance
        );
        Ok(settlement.receipt)
    }
}

fn load_sites<S: KeyValueStore>(store: &S, key: &str) -> Result<Vec<Site>> {
    Ok(store
        .get(key)?
        .and_then(|raw| decode_or_warn(key, &raw))
        .unwrap_or_default())
}

fn decode_or_warn<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Stored value for '{}' is unreadable, starting empty: {}", key, e);
            None
        }
    }
}

fn encode_sites(sites: &[Site]) -> Result<String> {
    serde_json::to_string(sites).map_err(|e| MarketError::Persistence(StoreError::Encode(e)))
}

#[cfg(test)]
#[path = "market_tests.rs"]
mod tests;
