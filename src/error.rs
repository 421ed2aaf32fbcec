//! Error types for site_market

use thiserror::Error;

/// Failure of the underlying key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite read or write failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Persisted value could not be encoded
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    /// Write rejected by the store (used by in-memory stores to simulate failure)
    #[error("Write rejected for key '{0}'")]
    WriteRejected(String),
}

/// Unified error type for marketplace operations
///
/// Every variant is recoverable at the operation level: the operation that
/// returned it left catalog, cart and wallet exactly as they were.
#[derive(Debug, Error)]
pub enum MarketError {
    /// CSV payload could not be parsed; the previous catalog is kept
    #[error("Could not parse CSV: {0}")]
    ImportParse(#[from] csv::Error),
    /// Import file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The site is already in the cart
    #[error("Already in cart: {0}")]
    AlreadyInCart(String),
    /// No site with this URL in the catalog
    #[error("Site not found: {0}")]
    SiteNotFound(String),
    /// Top-up amount is negative or would overflow the balance
    #[error("Invalid top-up amount: {0}")]
    InvalidAmount(f64),
    /// Cart total exceeds the wallet balance
    #[error("Insufficient funds: total {total} > wallet {balance}")]
    InsufficientFunds { total: f64, balance: f64 },
    /// Reading or writing the persistent store failed
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Result alias for site_market operations
pub type Result<T> = std::result::Result<T, MarketError>;
