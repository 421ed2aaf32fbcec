//! HTTP API for the marketplace
//!
//! Exposes the same operations as the CLI as JSON endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::MarketError;
use crate::filter::SiteFilter;
use crate::market::Market;
use crate::models::{ImportSummary, Receipt, Site};
use crate::store::KeyValueStore;
use crate::wallet::DEFAULT_TOP_UP;

/// Market shared between request handlers
pub type SharedMarket<S> = Arc<Mutex<Market<S>>>;

struct AppState<S: KeyValueStore> {
    market: SharedMarket<S>,
}

impl<S: KeyValueStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            market: Arc::clone(&self.market),
        }
    }
}

impl<S: KeyValueStore> AppState<S> {
    fn market(&self) -> MutexGuard<'_, Market<S>> {
        self.market.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, MarketError>;

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = match &self {
            MarketError::ImportParse(_) | MarketError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            MarketError::SiteNotFound(_) => StatusCode::NOT_FOUND,
            MarketError::AlreadyInCart(_) => StatusCode::CONFLICT,
            MarketError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            MarketError::Io(_) | MarketError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct CartView {
    items: Vec<Site>,
    total: f64,
}

#[derive(Serialize)]
struct WalletView {
    balance: f64,
}

#[derive(Deserialize)]
struct AddToCartRequest {
    url: String,
}

#[derive(Deserialize)]
struct TopUpRequest {
    #[serde(default)]
    amount: Option<f64>,
}

/// GET /api/sites?q=&min_da=&max_price=&min_traffic=
async fn list_sites_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Query(filter): Query<SiteFilter>,
) -> ApiResult<Vec<Site>> {
    let market = state.market();
    let sites: Vec<Site> = market.visible(&filter).into_iter().cloned().collect();
    Ok(ApiResponse::ok(sites))
}

/// GET /api/sites/{url}
async fn site_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Path(url): Path<String>,
) -> ApiResult<Site> {
    let market = state.market();
    let site = market
        .site(&url)
        .cloned()
        .ok_or(MarketError::SiteNotFound(url))?;
    Ok(ApiResponse::ok(site))
}

/// POST /api/import (body: CSV text)
async fn import_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> ApiResult<ImportSummary> {
    let summary = state.market().import_csv(&body)?;
    Ok(ApiResponse::ok(summary))
}

/// GET /api/cart
async fn cart_handler<S: KeyValueStore>(State(state): State<AppState<S>>) -> ApiResult<CartView> {
    let market = state.market();
    Ok(ApiResponse::ok(CartView {
        items: market.cart().items().to_vec(),
        total: market.cart_total(),
    }))
}

/// POST /api/cart {"url": "..."}
async fn add_to_cart_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<AddToCartRequest>,
) -> ApiResult<Site> {
    let site = state.market().add_to_cart(&request.url)?;
    Ok(ApiResponse::ok(site))
}

/// GET /api/wallet
async fn wallet_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
) -> ApiResult<WalletView> {
    let balance = state.market().balance();
    Ok(ApiResponse::ok(WalletView { balance }))
}

/// POST /api/wallet/top-up {"amount": 50}
async fn top_up_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<TopUpRequest>,
) -> ApiResult<WalletView> {
    let amount = request.amount.unwrap_or(DEFAULT_TOP_UP);
    let balance = state.market().top_up(amount)?;
    Ok(ApiResponse::ok(WalletView { balance }))
}

/// POST /api/checkout
async fn checkout_handler<S: KeyValueStore>(
    State(state): State<AppState<S>>,
) -> ApiResult<Receipt> {
    let receipt = state.market().checkout()?;
    Ok(ApiResponse::ok(receipt))
}

/// Build the web server router
pub fn create_router<S>(market: SharedMarket<S>) -> Router
where
    S: KeyValueStore + Send + 'static,
{
    let state = AppState { market };

    Router::new()
        .route("/api/sites", get(list_sites_handler::<S>))
        .route("/api/sites/{url}", get(site_handler::<S>))
        .route("/api/import", post(import_handler::<S>))
        .route("/api/cart", get(cart_handler::<S>).post(add_to_cart_handler::<S>))
        .route("/api/wallet", get(wallet_handler::<S>))
        .route("/api/wallet/top-up", post(top_up_handler::<S>))
        .route("/api/checkout", post(checkout_handler::<S>))
        .with_state(state)
}

/// Start the web server (async), stopping on Ctrl-C
pub async fn serve<S>(market: SharedMarket<S>, port: u16) -> std::io::Result<()>
where
    S: KeyValueStore + Send + 'static,
{
    let app = create_router(market);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Market API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
            log::info!("Shutting down");
        })
        .await
}

#[cfg(test)]
#[path = "web_tests.rs"]
mod tests;
