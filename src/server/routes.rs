use crate::errors::EngineError;
use crate::pricing::{MarketInputs, OptionType, ValuationSheet};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

type ApiResponse = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

#[derive(serde::Deserialize)]
pub struct SymbolsQuery {
    pub q: String,
}

#[derive(serde::Deserialize)]
pub struct QuoteQuery {
    pub symbol: String,
}

#[derive(serde::Deserialize)]
pub struct PriceQuery {
    pub symbol: String,
    pub strike: f64,
    pub maturity: f64,
    pub volatility: f64,
    /// Decimal fraction. When absent the treasury yield is fetched.
    pub rate: Option<f64>,
}

#[derive(serde::Deserialize)]
pub struct ValueQuery {
    pub spot: f64,
    pub strike: f64,
    pub maturity: f64,
    pub volatility: f64,
    pub rate: f64,
    pub option_type: String,
}

/// GET /api/symbols?q=... -- ticker directory search for the dropdown
pub async fn get_symbols(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SymbolsQuery>,
) -> ApiResponse {
    state.counters.symbol_searches.fetch_add(1, Relaxed);
    let matches = state
        .feed
        .search_symbols(&params.q)
        .await
        .map_err(|e| reject(&state, e))?;
    Ok(Json(serde_json::json!({ "matches": matches })))
}

/// GET /api/quote?symbol=... -- latest spot price
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteQuery>,
) -> ApiResponse {
    state.counters.quotes_fetched.fetch_add(1, Relaxed);
    let quote = state
        .feed
        .latest_quote(&params.symbol)
        .await
        .map_err(|e| reject(&state, e))?;
    Ok(Json(serde_json::json!(quote)))
}

/// GET /api/rate -- risk-free rate at the configured treasury maturity
pub async fn get_rate(State(state): State<Arc<AppState>>) -> ApiResponse {
    state.counters.rate_fetches.fetch_add(1, Relaxed);
    let rate = state
        .feed
        .risk_free_rate(&state.config.treasury_maturity, &state.config.treasury_interval)
        .await
        .map_err(|e| reject(&state, e))?;
    Ok(Json(serde_json::json!(rate)))
}

/// GET /api/price -- the dashboard "Calculate" action: fetch the spot
/// price (and the rate when the form leaves it blank), validate, price
/// both sides.
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PriceQuery>,
) -> ApiResponse {
    state.counters.quotes_fetched.fetch_add(1, Relaxed);
    let quote = state
        .feed
        .latest_quote(&params.symbol)
        .await
        .map_err(|e| reject(&state, e))?;

    let rate = match params.rate {
        Some(r) => r,
        None => {
            state.counters.rate_fetches.fetch_add(1, Relaxed);
            state
                .feed
                .risk_free_rate(&state.config.treasury_maturity, &state.config.treasury_interval)
                .await
                .map_err(|e| reject(&state, e))?
                .rate
        }
    };

    let inputs = MarketInputs::new(quote.price, params.strike, params.maturity, rate, params.volatility)
        .map_err(|e| reject(&state, e))?;
    let sheet = state.engine.sheet(&inputs);
    state.counters.valuations_computed.fetch_add(1, Relaxed);

    Ok(Json(serde_json::json!({
        "symbol": quote.symbol,
        "as_of": quote.as_of,
        "fetched_at": quote.fetched_at,
        "sheet": sheet,
        "display": display_sheet(&sheet),
    })))
}

/// GET /api/value -- direct engine access with caller-supplied scalars,
/// one option side per call. No upstream fetches.
pub async fn get_value(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ValueQuery>,
) -> ApiResponse {
    let side: OptionType = params.option_type.parse().map_err(|e| reject(&state, e))?;
    let inputs = MarketInputs::new(
        params.spot,
        params.strike,
        params.maturity,
        params.rate,
        params.volatility,
    )
    .map_err(|e| reject(&state, e))?;

    let price = state.engine.price(&inputs, side);
    let greeks = state.engine.greeks(&inputs, side);
    state.counters.valuations_computed.fetch_add(1, Relaxed);

    Ok(Json(serde_json::json!({
        "option_type": side,
        "inputs": inputs,
        "price": price,
        "greeks": greeks,
    })))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "symbol_searches": state.counters.symbol_searches.load(Relaxed),
        "quotes_fetched": state.counters.quotes_fetched.load(Relaxed),
        "rate_fetches": state.counters.rate_fetches.load(Relaxed),
        "valuations_computed": state.counters.valuations_computed.load(Relaxed),
        "invalid_inputs": state.counters.invalid_inputs.load(Relaxed),
        "upstream_errors": state.counters.upstream_errors.load(Relaxed),
    }))
}

/// Map an error to an HTTP status + JSON body, counting it on the way out.
fn reject(state: &AppState, e: EngineError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &e {
        EngineError::InvalidInput(_) | EngineError::UnsupportedOptionType(_) => {
            state.counters.invalid_inputs.fetch_add(1, Relaxed);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::DataUnavailable(_)
        | EngineError::UpstreamApi { .. }
        | EngineError::Network(_)
        | EngineError::Parse(_) => {
            state.counters.upstream_errors.fetch_add(1, Relaxed);
            StatusCode::BAD_GATEWAY
        }
        EngineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::warn!(kind = e.kind(), error = %e, "request rejected");
    (
        status,
        Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
    )
}

/// Two-decimal strings for the results panel. Display only: the numbers in
/// the `sheet` object keep full precision.
fn display_sheet(sheet: &ValuationSheet) -> serde_json::Value {
    serde_json::json!({
        "spot": two_dp(sheet.spot),
        "call_price": two_dp(sheet.call.price),
        "put_price": two_dp(sheet.put.price),
        "delta_call": two_dp(sheet.call.greeks.delta),
        "delta_put": two_dp(sheet.put.greeks.delta),
        "gamma": two_dp(sheet.call.greeks.gamma),
        "theta_call": two_dp(sheet.call.greeks.theta),
        "theta_put": two_dp(sheet.put.greeks.theta),
        "vega": two_dp(sheet.call.greeks.vega),
        "rho_call": two_dp(sheet.call.greeks.rho),
        "rho_put": two_dp(sheet.put.greeks.rho),
    })
}

fn two_dp(x: f64) -> String {
    format!("{x:.2}")
}
