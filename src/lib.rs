//! Site Market - local site marketplace
//!
//! Imports website listings from CSV, filters and searches them, and buys
//! carts of sites from a wallet balance. Catalog, cart and wallet persist in a
//! local key-value store.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod field_parsers;
pub mod filter;
pub mod formatters;
pub mod market;
pub mod models;
pub mod store;
pub mod wallet;
pub mod web;

pub use cart::Cart;
pub use catalog::{parse_sites, Catalog};
pub use error::{MarketError, Result, StoreError};
pub use filter::{visible, SiteFilter};
pub use market::Market;
pub use models::{ImportSummary, Receipt, Site};
pub use store::{default_db_path, KeyValueStore, MemoryStore, SqliteStore};
pub use wallet::{Wallet, DEFAULT_TOP_UP};
