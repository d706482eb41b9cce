use super::types::*;
use crate::errors::{EngineError, EngineResult};
use reqwest::Client;

/// Alpha Vantage REST client. All methods return Result, never panic.
/// One request per call: retry and caching policy, if any, belong to the
/// caller, and a missing datum is surfaced instead of defaulted.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        function: &str,
        params: &[(&str, &str)],
    ) -> EngineResult<T> {
        let url = format!("{}/query", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("function", function)])
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::UpstreamApi {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| EngineError::Parse(format!("{function}: {e}")))
    }

    /// Ticker directory lookup for the dashboard dropdown. An empty match
    /// list is a valid answer.
    pub async fn search_symbols(&self, keywords: &str) -> EngineResult<Vec<SymbolMatch>> {
        let resp: SymbolSearchResponse = self
            .get_json("SYMBOL_SEARCH", &[("keywords", keywords)])
            .await?;
        let matches = matches_from_response(resp)?;
        tracing::debug!(keywords, count = matches.len(), "symbol search complete");
        Ok(matches)
    }

    /// Latest traded price for one ticker.
    pub async fn latest_quote(&self, symbol: &str) -> EngineResult<SpotQuote> {
        let resp: GlobalQuoteResponse = self.get_json("GLOBAL_QUOTE", &[("symbol", symbol)]).await?;
        let quote = quote_from_response(symbol, resp)?;
        tracing::debug!(symbol, price = quote.price, "spot quote fetched");
        Ok(quote)
    }

    /// Latest treasury yield as a decimal fraction (4.23% -> 0.0423).
    pub async fn risk_free_rate(&self, maturity: &str, interval: &str) -> EngineResult<RiskFreeRate> {
        let resp: TreasuryYieldResponse = self
            .get_json("TREASURY_YIELD", &[("maturity", maturity), ("interval", interval)])
            .await?;
        let rate = rate_from_response(maturity, resp)?;
        tracing::debug!(maturity, rate = rate.rate, "risk-free rate fetched");
        Ok(rate)
    }
}

/// A 200 body may carry a throttle note or an error message instead of the
/// payload. Both mean: no data for this request.
fn provider_gate(note: Option<&str>, error_message: Option<&str>) -> EngineResult<()> {
    if let Some(msg) = error_message {
        return Err(EngineError::DataUnavailable(format!(
            "provider rejected request: {msg}"
        )));
    }
    if let Some(msg) = note {
        return Err(EngineError::DataUnavailable(format!(
            "provider throttled: {msg}"
        )));
    }
    Ok(())
}

fn matches_from_response(resp: SymbolSearchResponse) -> EngineResult<Vec<SymbolMatch>> {
    provider_gate(resp.note.as_deref(), resp.error_message.as_deref())?;

    Ok(resp
        .best_matches
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| {
            Some(SymbolMatch {
                symbol: m.symbol?,
                name: m.name?,
                region: m.region,
                currency: m.currency,
            })
        })
        .collect())
}

fn quote_from_response(symbol: &str, resp: GlobalQuoteResponse) -> EngineResult<SpotQuote> {
    provider_gate(resp.note.as_deref(), resp.error_message.as_deref())?;

    let raw = resp
        .global_quote
        .ok_or_else(|| EngineError::DataUnavailable(format!("no quote data for {symbol}")))?;

    // Empty "Global Quote" object means the ticker is unknown
    let price_str = raw
        .price
        .ok_or_else(|| EngineError::DataUnavailable(format!("no quote data for {symbol}")))?;

    let price: f64 = price_str
        .parse()
        .map_err(|_| EngineError::Parse(format!("invalid price string: {price_str}")))?;

    if price <= 0.0 || !price.is_finite() {
        return Err(EngineError::Parse(format!("invalid price: {price}")));
    }

    Ok(SpotQuote {
        symbol: raw.symbol.unwrap_or_else(|| symbol.to_string()),
        price,
        as_of: raw.latest_trading_day,
        fetched_at: chrono::Utc::now().to_rfc3339(),
    })
}

fn rate_from_response(maturity: &str, resp: TreasuryYieldResponse) -> EngineResult<RiskFreeRate> {
    provider_gate(resp.note.as_deref(), resp.error_message.as_deref())?;

    let points = resp
        .data
        .ok_or_else(|| EngineError::DataUnavailable(format!("no yield data for {maturity}")))?;

    // Newest first; skip "." placeholders for days without an observation
    for point in points {
        let Some(value) = point.value else { continue };
        if value == "." {
            continue;
        }

        let percent: f64 = value
            .parse()
            .map_err(|_| EngineError::Parse(format!("invalid yield value: {value}")))?;
        if !percent.is_finite() {
            return Err(EngineError::Parse(format!("invalid yield: {percent}")));
        }

        return Ok(RiskFreeRate {
            rate: percent / 100.0,
            maturity: maturity.to_string(),
            as_of: point.date,
        });
    }

    Err(EngineError::DataUnavailable(format!(
        "no usable yield observation for {maturity}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_parses_provider_body() {
        let resp: GlobalQuoteResponse = serde_json::from_str(
            r#"{
                "Global Quote": {
                    "01. symbol": "AAPL",
                    "05. price": "226.0500",
                    "07. latest trading day": "2026-08-05"
                }
            }"#,
        )
        .expect("fixture parses");

        let quote = quote_from_response("AAPL", resp).expect("quote");
        assert!((quote.price - 226.05).abs() < 1e-9, "price={}", quote.price);
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.as_of.as_deref(), Some("2026-08-05"));
    }

    #[test]
    fn test_empty_quote_is_data_unavailable() {
        let resp: GlobalQuoteResponse = serde_json::from_str(r#"{"Global Quote": {}}"#).unwrap();
        let err = quote_from_response("NOPE", resp).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)), "got {err}");
    }

    #[test]
    fn test_unparseable_price_is_parse_error() {
        let resp: GlobalQuoteResponse =
            serde_json::from_str(r#"{"Global Quote": {"05. price": "n/a"}}"#).unwrap();
        let err = quote_from_response("AAPL", resp).unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_throttle_note_is_data_unavailable() {
        let resp: GlobalQuoteResponse = serde_json::from_str(
            r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#,
        )
        .unwrap();
        let err = quote_from_response("AAPL", resp).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)), "got {err}");
    }

    #[test]
    fn test_rate_skips_placeholder_values() {
        let resp: TreasuryYieldResponse = serde_json::from_str(
            r#"{
                "unit": "percent",
                "data": [
                    { "date": "2026-08-05", "value": "." },
                    { "date": "2026-08-04", "value": "4.23" }
                ]
            }"#,
        )
        .unwrap();

        let rate = rate_from_response("10year", resp).expect("rate");
        assert!((rate.rate - 0.0423).abs() < 1e-9, "rate={}", rate.rate);
        assert_eq!(rate.as_of.as_deref(), Some("2026-08-04"));
        assert_eq!(rate.maturity, "10year");
    }

    #[test]
    fn test_rate_without_observations_is_data_unavailable() {
        let resp: TreasuryYieldResponse =
            serde_json::from_str(r#"{"data": [{ "date": "2026-08-05", "value": "." }]}"#).unwrap();
        let err = rate_from_response("10year", resp).unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)), "got {err}");
    }

    #[test]
    fn test_symbol_matches_mapped() {
        let resp: SymbolSearchResponse = serde_json::from_str(
            r#"{
                "bestMatches": [
                    {
                        "1. symbol": "AAPL",
                        "2. name": "Apple Inc",
                        "4. region": "United States",
                        "8. currency": "USD"
                    },
                    { "2. name": "missing symbol, dropped" }
                ]
            }"#,
        )
        .unwrap();

        let matches = matches_from_response(resp).expect("matches");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[0].name, "Apple Inc");
        assert_eq!(matches[0].currency.as_deref(), Some("USD"));
    }
}
