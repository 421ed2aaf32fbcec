//! Checkout: pays the whole cart from the wallet.

use crate::cart::Cart;
use crate::error::{MarketError, Result};
use crate::models::Receipt;
use crate::wallet::Wallet;

/// Settled checkout, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub wallet: Wallet,
    pub receipt: Receipt,
}

/// Works out the wallet after paying for `cart`.
///
/// Fails with `InsufficientFunds` when the cart total exceeds the balance.
/// A total equal to the balance is allowed and leaves 0.
pub fn settle(cart: &Cart, wallet: &Wallet) -> Result<Settlement> {
    let total = cart.total();
    let paid = wallet
        .debited(total)
        .ok_or(MarketError::InsufficientFunds {
            total,
            balance: wallet.balance(),
        })?;

    Ok(Settlement {
        wallet: paid,
        receipt: Receipt {
            amount_spent: total,
            new_balance: paid.balance(),
            items: cart.len(),
        },
    })
}
