use serde::{Deserialize, Serialize};

// Alpha Vantage wire types. The numbered field names are the provider's
// actual JSON keys. Any endpoint may answer HTTP 200 with a throttle
// "Note" or an "Error Message" instead of the payload, so every response
// struct carries both.

// {
//   "bestMatches": [
//     {
//       "1. symbol": "AAPL",
//       "2. name": "Apple Inc",
//       "3. type": "Equity",
//       "4. region": "United States",
//       "8. currency": "USD",
//       "9. matchScore": "1.0000"
//     }
//   ]
// }
#[derive(Deserialize)]
pub struct SymbolSearchResponse {
    #[serde(rename = "bestMatches")]
    pub best_matches: Option<Vec<SymbolMatchRaw>>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

#[derive(Deserialize)]
pub struct SymbolMatchRaw {
    #[serde(rename = "1. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "2. name")]
    pub name: Option<String>,
    #[serde(rename = "4. region")]
    pub region: Option<String>,
    #[serde(rename = "8. currency")]
    pub currency: Option<String>,
}

/// A tradable ticker as listed in the dashboard dropdown.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub region: Option<String>,
    pub currency: Option<String>,
}

// {
//   "Global Quote": {
//     "01. symbol": "AAPL",
//     "05. price": "226.0500",
//     "07. latest trading day": "2026-08-05"
//   }
// }
// An unknown ticker comes back as an EMPTY "Global Quote" object, not an
// error status.
#[derive(Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    pub global_quote: Option<GlobalQuoteRaw>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

#[derive(Deserialize)]
pub struct GlobalQuoteRaw {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: Option<String>,
}

/// Latest traded price for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    /// Trading day the price belongs to, as reported by the provider.
    pub as_of: Option<String>,
    /// When this process fetched it (RFC3339).
    pub fetched_at: String,
}

// {
//   "name": "10-Year Treasury Constant Maturity Rate",
//   "interval": "daily",
//   "unit": "percent",
//   "data": [
//     { "date": "2026-08-05", "value": "4.23" },
//     { "date": "2026-08-04", "value": "4.21" }
//   ]
// }
// Points are newest-first; days without an observation carry the
// placeholder value ".".
#[derive(Deserialize)]
pub struct TreasuryYieldResponse {
    pub data: Option<Vec<TreasuryPoint>>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

#[derive(Deserialize)]
pub struct TreasuryPoint {
    pub date: Option<String>,
    pub value: Option<String>,
}

/// Annualized risk-free rate as a decimal fraction (0.0423 = 4.23%).
#[derive(Debug, Clone, Serialize)]
pub struct RiskFreeRate {
    pub rate: f64,
    pub maturity: String,
    pub as_of: Option<String>,
}
