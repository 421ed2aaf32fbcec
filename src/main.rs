//! Site Market - command line front end
//!
//! Each invocation loads the market from the local database, runs one
//! operation and exits. `serve` keeps running and exposes the HTTP API.

use clap::{Parser, Subcommand};
use site_market::formatters::{
    format_cart, format_receipt, format_site_detail, format_site_list, format_wallet,
};
use site_market::{
    default_db_path, web, Market, MarketError, SiteFilter, SqliteStore, DEFAULT_TOP_UP,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Site marketplace - import site listings, filter them and buy them from a local wallet
#[derive(Parser, Debug)]
#[command(name = "site_market")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_os_t = default_db_path())]
    database: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the catalog with a CSV file (URL,Price,Traffic,DA,Email, no header)
    Import { file: PathBuf },
    /// List sites, optionally filtered
    List {
        /// Case-sensitive URL substring
        #[arg(short, long, default_value = "")]
        query: String,
        /// Minimum domain authority
        #[arg(long, default_value = "")]
        min_da: String,
        /// Maximum price
        #[arg(long, default_value = "")]
        max_price: String,
        /// Minimum traffic
        #[arg(long, default_value = "")]
        min_traffic: String,
    },
    /// Show one site
    Show { url: String },
    /// Add a site to the cart
    Add { url: String },
    /// Show the cart and its total
    Cart,
    /// Buy everything in the cart with the wallet
    Checkout,
    /// Show the wallet balance
    Wallet,
    /// Add funds to the wallet
    TopUp {
        #[arg(short, long, default_value_t = DEFAULT_TOP_UP)]
        amount: f64,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=site_market=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("Database path: {}", args.database.display());

    let store = match SqliteStore::open(&args.database) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let market = match Market::load(store) {
        Ok(market) => market,
        Err(e) => {
            log::error!("Failed to load market: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(market, args.command).await {
        log::error!("{}", e);
        eprintln!("{}", user_message(&e));
        std::process::exit(1);
    }
}

async fn run(mut market: Market<SqliteStore>, command: Command) -> Result<(), MarketError> {
    match command {
        Command::Import { file } => {
            let summary = market.import_file(&file)?;
            println!("CSV loaded: {} sites imported.", summary.count);
        }
        Command::List {
            query,
            min_da,
            max_price,
            min_traffic,
        } => {
            let filter = SiteFilter {
                query,
                min_da,
                max_price,
                min_traffic,
            };
            print!("{}", format_site_list(&market.visible(&filter)));
        }
        Command::Show { url } => {
            let site = market
                .site(&url)
                .ok_or_else(|| MarketError::SiteNotFound(url.clone()))?;
            print!("{}", format_site_detail(site));
        }
        Command::Add { url } => {
            let site = market.add_to_cart(&url)?;
            println!("Added to cart: {}", site.url);
        }
        Command::Cart => print!("{}", format_cart(market.cart())),
        Command::Checkout => {
            let receipt = market.checkout()?;
            print!("{}", format_receipt(&receipt));
        }
        Command::Wallet => print!("{}", format_wallet(market.balance())),
        Command::TopUp { amount } => {
            let balance = market.top_up(amount)?;
            print!("{}", format_wallet(balance));
        }
        Command::Serve { port } => {
            let shared = Arc::new(Mutex::new(market));
            web::serve(shared, port).await?;
        }
    }
    Ok(())
}

/// Short message for the terminal
fn user_message(err: &MarketError) -> String {
    match err {
        MarketError::AlreadyInCart(_) => "Already in cart".to_string(),
        MarketError::InsufficientFunds { total, balance } => {
            format!("Insufficient funds: Total {} > Wallet {}", total, balance)
        }
        other => format!("Error: {}", other),
    }
}
