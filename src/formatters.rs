//! Plain-text rendering for the command line.

use crate::cart::Cart;
use crate::models::{Receipt, Site};

/// One line per site, in the order given.
pub fn format_site_list(sites: &[&Site]) -> String {
    if sites.is_empty() {
        return "No sites match.\n".to_string();
    }

    let mut output = String::new();
    for site in sites {
        output.push_str(&format!(
            "{}  DA: {}  Traffic: {}  Price: ${}",
            site.url, site.da, site.traffic, site.price
        ));
        if !site.email.is_empty() {
            output.push_str(&format!("  Email: {}", site.email));
        }
        output.push('\n');
    }
    output.push_str(&format!("{} site(s)\n", sites.len()));
    output
}

pub fn format_site_detail(site: &Site) -> String {
    format!(
        "{}\nPrice: ${}\nTraffic: {}\nDA: {}\nEmail: {}\n",
        site.url, site.price, site.traffic, site.da, site.email
    )
}

pub fn format_cart(cart: &Cart) -> String {
    let mut output = format!("Cart ({})\n", cart.len());
    for item in cart.items() {
        output.push_str(&format!("{} - ${}\n", item.url, item.price));
    }
    output.push_str(&format!("Total: ${}\n", cart.total()));
    output
}

pub fn format_wallet(balance: f64) -> String {
    format!("Wallet: {balance:.2}\n")
}

pub fn format_receipt(receipt: &Receipt) -> String {
    format!(
        "Purchase complete. Spent {}. New balance: {}\n",
        receipt.amount_spent, receipt.new_balance
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_list_includes_email_only_when_present() {
        let with_email = Site::new("a.com", 10.0, 500.0, 40.0).with_email("me@a.com");
        let without = Site::new("b.com", 7.5, 0.0, 0.0);
        let output = format_site_list(&[&with_email, &without]);

        assert_eq!(
            output,
            "a.com  DA: 40  Traffic: 500  Price: $10  Email: me@a.com\n\
             b.com  DA: 0  Traffic: 0  Price: $7.5\n\
             2 site(s)\n"
        );
    }

    #[test]
    fn empty_site_list() {
        assert_eq!(format_site_list(&[]), "No sites match.\n");
    }

    #[test]
    fn cart_lists_items_and_total() {
        let cart = Cart::from_items(vec![
            Site::new("a.com", 10.0, 0.0, 0.0),
            Site::new("b.com", 20.0, 0.0, 0.0),
        ]);
        assert_eq!(
            format_cart(&cart),
            "Cart (2)\na.com - $10\nb.com - $20\nTotal: $30\n"
        );
    }

    #[test]
    fn wallet_shows_two_decimals() {
        assert_eq!(format_wallet(50.0), "Wallet: 50.00\n");
    }

    #[test]
    fn receipt_message() {
        let receipt = Receipt {
            amount_spent: 30.0,
            new_balance: 0.0,
            items: 2,
        };
        assert_eq!(
            format_receipt(&receipt),
            "Purchase complete. Spent 30. New balance: 0\n"
        );
    }
}
