//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{MatchedPath, Path, Request, State, rejection::JsonRejection},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::dto::{TransferCommand, TransferReceiptDto};
use crate::application::ports::{LendingOperation, LendingPort};
use crate::application::use_cases::{QueryRatesUseCase, TransferUseCase};
use crate::domain::markets::{TokenAllowList, TokenAmount};
use crate::domain::rates::BlockCadence;
use crate::infrastructure::compound::{
    LEGACY_BORROW_TOKEN, LEGACY_RATES_TOKEN, LEGACY_SUPPLY_TOKEN,
};
use crate::observability::record_http_request;

use super::error::ApiError;
use super::request::{LegacyTransferRequest, TransferRequest};
use super::response::{
    HealthResponse, LegacyRatesResponse, LegacyTransferResponse, RatesResponse,
    SupportedTokensResponse, TransferResponse,
};

/// Application state shared across handlers.
pub struct AppState<L>
where
    L: LendingPort,
{
    /// Use case for rate quotes.
    pub query_rates: Arc<QueryRatesUseCase<L>>,
    /// Use case for supply / borrow / repay.
    pub transfer: Arc<TransferUseCase<L>>,
    /// Supported markets.
    pub allow_list: Arc<TokenAllowList>,
    /// Application version.
    pub version: String,
}

impl<L> AppState<L>
where
    L: LendingPort,
{
    /// Wire the use cases around one lending protocol client.
    pub fn new(
        lending: Arc<L>,
        allow_list: Arc<TokenAllowList>,
        cadence: BlockCadence,
        version: impl Into<String>,
    ) -> Self {
        Self {
            query_rates: Arc::new(QueryRatesUseCase::new(
                Arc::clone(&lending),
                Arc::clone(&allow_list),
                cadence,
            )),
            transfer: Arc::new(TransferUseCase::new(lending, Arc::clone(&allow_list))),
            allow_list,
            version: version.into(),
        }
    }
}

impl<L> Clone for AppState<L>
where
    L: LendingPort,
{
    fn clone(&self) -> Self {
        Self {
            query_rates: Arc::clone(&self.query_rates),
            transfer: Arc::clone(&self.transfer),
            allow_list: Arc::clone(&self.allow_list),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<L>(state: AppState<L>) -> Router
where
    L: LendingPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        // Fixed-token endpoints
        .route("/compound_rates", get(legacy_rates))
        .route("/supply_usdc", post(legacy_supply))
        .route("/borrow_dai", post(legacy_borrow))
        .route("/repay_dai", post(legacy_repay))
        // Multi-token endpoints
        .route("/compound/supported-tokens", get(supported_tokens))
        .route("/compound/supply", post(supply))
        .route("/compound/borrow", post(borrow))
        .route("/compound/repay", post(repay))
        .route("/compound/rates/{token}", get(market_rates))
        .with_state(state)
        .layer(middleware::from_fn(track_requests))
}

/// Count requests by matched route and response status. Requests that match
/// no route are counted as `unmatched`.
async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let method = request.method().clone();
    let response = next.run(request).await;

    tracing::debug!(
        %method,
        route = %route,
        status = response.status().as_u16(),
        "Request handled"
    );
    record_http_request(&route, response.status().as_u16());
    response
}

/// Health check endpoint.
async fn health_check<L>(State(state): State<AppState<L>>) -> impl IntoResponse
where
    L: LendingPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// USDC supply and borrow APYs.
async fn legacy_rates<L>(
    State(state): State<AppState<L>>,
) -> Result<Json<LegacyRatesResponse>, ApiError>
where
    L: LendingPort,
{
    tracing::info!(token = LEGACY_RATES_TOKEN, "Fetching Compound rates");

    let rates = state.query_rates.execute(LEGACY_RATES_TOKEN).await?;
    Ok(Json(LegacyRatesResponse {
        usdc_supply_apy: rates.quote.supply_apy_display(),
        usdc_borrow_apy: rates.quote.borrow_apy_display(),
    }))
}

async fn legacy_supply<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<LegacyTransferRequest>, JsonRejection>,
) -> Result<Json<LegacyTransferResponse>, ApiError>
where
    L: LendingPort,
{
    legacy_transfer(&state, LendingOperation::Supply, LEGACY_SUPPLY_TOKEN, payload).await
}

async fn legacy_borrow<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<LegacyTransferRequest>, JsonRejection>,
) -> Result<Json<LegacyTransferResponse>, ApiError>
where
    L: LendingPort,
{
    legacy_transfer(&state, LendingOperation::Borrow, LEGACY_BORROW_TOKEN, payload).await
}

async fn legacy_repay<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<LegacyTransferRequest>, JsonRejection>,
) -> Result<Json<LegacyTransferResponse>, ApiError>
where
    L: LendingPort,
{
    legacy_transfer(&state, LendingOperation::Repay, LEGACY_BORROW_TOKEN, payload).await
}

/// Shared body of the fixed-token transfer endpoints.
async fn legacy_transfer<L>(
    state: &AppState<L>,
    operation: LendingOperation,
    token: &str,
    payload: Result<Json<LegacyTransferRequest>, JsonRejection>,
) -> Result<Json<LegacyTransferResponse>, ApiError>
where
    L: LendingPort,
{
    let Json(request) = payload?;
    let receipt = execute_transfer(state, operation, token, request.amount).await?;

    Ok(Json(LegacyTransferResponse {
        message: receipt.message,
        tx: receipt.outcome,
    }))
}

/// Supported token symbols.
async fn supported_tokens<L>(State(state): State<AppState<L>>) -> impl IntoResponse
where
    L: LendingPort,
{
    Json(SupportedTokensResponse {
        supported_tokens: state.allow_list.symbols(),
    })
}

async fn supply<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError>
where
    L: LendingPort,
{
    token_transfer(&state, LendingOperation::Supply, payload).await
}

async fn borrow<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError>
where
    L: LendingPort,
{
    token_transfer(&state, LendingOperation::Borrow, payload).await
}

async fn repay<L>(
    State(state): State<AppState<L>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError>
where
    L: LendingPort,
{
    token_transfer(&state, LendingOperation::Repay, payload).await
}

/// Shared body of the multi-token transfer endpoints.
async fn token_transfer<L>(
    state: &AppState<L>,
    operation: LendingOperation,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError>
where
    L: LendingPort,
{
    let Json(request) = payload?;
    let receipt = execute_transfer(state, operation, &request.token, request.amount).await?;

    Ok(Json(TransferResponse {
        message: receipt.message,
        tx_hash: receipt.outcome.tx_hash,
    }))
}

async fn execute_transfer<L>(
    state: &AppState<L>,
    operation: LendingOperation,
    token: &str,
    amount: TokenAmount,
) -> Result<TransferReceiptDto, ApiError>
where
    L: LendingPort,
{
    tracing::info!(
        operation = operation.as_str(),
        token,
        amount = %amount,
        "Transfer requested"
    );

    state
        .transfer
        .execute(TransferCommand::new(operation, token, amount))
        .await
        .map_err(|e| {
            let api_error = ApiError::from(e);
            tracing::warn!(
                operation = operation.as_str(),
                token,
                status = api_error.status().as_u16(),
                error = %api_error,
                "Transfer rejected"
            );
            api_error
        })
}

/// Supply and borrow APYs for any supported token.
async fn market_rates<L>(
    State(state): State<AppState<L>>,
    Path(token): Path<String>,
) -> Result<Json<RatesResponse>, ApiError>
where
    L: LendingPort,
{
    tracing::info!(token = %token, "Fetching market rates");

    let rates = state.query_rates.execute(&token).await?;
    Ok(Json(RatesResponse {
        token: rates.token,
        supply_apy: rates.quote.supply_apy_display(),
        borrow_apy: rates.quote.borrow_apy_display(),
    }))
}
