use crate::config::AppConfig;
use crate::feeds::alpha_vantage::AlphaVantageClient;
use crate::pricing::black_scholes::BlackScholes;
use portable_atomic::AtomicU64;
use std::sync::Arc;

/// Performance counters. Lock-free, relaxed ordering -- observability only.
#[derive(Default)]
pub struct Counters {
    pub symbol_searches: AtomicU64,
    pub quotes_fetched: AtomicU64,
    pub rate_fetches: AtomicU64,
    pub valuations_computed: AtomicU64,
    pub invalid_inputs: AtomicU64,
    pub upstream_errors: AtomicU64,
}

/// Shared application state. One instance behind an Arc; everything inside
/// is immutable after startup or atomic, so handlers never take a lock.
pub struct AppState {
    pub config: AppConfig,
    pub feed: AlphaVantageClient,
    /// Pricing engine instance (created once, reused)
    pub engine: BlackScholes,
    pub counters: Counters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        let feed = AlphaVantageClient::new(
            &config.alpha_vantage_base_url,
            &config.alpha_vantage_api_key,
            config.http_timeout_secs,
        );

        Arc::new(Self {
            feed,
            engine: BlackScholes::new(),
            counters: Counters::default(),
            config,
        })
    }
}
