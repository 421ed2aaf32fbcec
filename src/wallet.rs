//! Wallet balance and its string encoding.

use crate::field_parsers::parse_leading_number;

/// Increment used by the quick top-up action
pub const DEFAULT_TOP_UP: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Wallet {
    balance: f64,
}

impl Wallet {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }

    /// Decodes a persisted balance; anything non-numeric is 0.
    pub fn decode(raw: &str) -> Self {
        let balance = parse_leading_number(raw).unwrap_or_else(|| {
            log::warn!("Stored wallet balance '{raw}' is not a number, using 0");
            0.0
        });
        Self { balance }
    }

    /// Encodes the balance as a decimal string ("25", "12.5").
    pub fn encode(&self) -> String {
        self.balance.to_string()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Returns the wallet after adding `amount`.
    ///
    /// A non-finite amount contributes nothing. Returns `None` for a negative
    /// amount or when the new balance would not be finite.
    pub fn topped_up(&self, amount: f64) -> Option<Self> {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        if amount < 0.0 {
            return None;
        }
        let balance = self.balance + amount;
        balance.is_finite().then_some(Self { balance })
    }

    /// Returns the wallet after spending `amount`, or `None` if it does not cover it.
    pub fn debited(&self, amount: f64) -> Option<Self> {
        if amount > self.balance {
            return None;
        }
        Some(Self {
            balance: self.balance - amount,
        })
    }
}
