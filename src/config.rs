use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub alpha_vantage_api_key: String,
    pub alpha_vantage_base_url: String,
    pub treasury_maturity: String,
    pub treasury_interval: String,
    pub http_timeout_secs: u64,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let http_timeout_secs = env_var_or("HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("HTTP_TIMEOUT_SECS: {e}")))?;

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            alpha_vantage_api_key: env_var("ALPHA_VANTAGE_API_KEY")?,
            alpha_vantage_base_url: env_var_or(
                "ALPHA_VANTAGE_BASE_URL",
                "https://www.alphavantage.co",
            ),
            treasury_maturity: env_var_or("TREASURY_MATURITY", "10year"),
            treasury_interval: env_var_or("TREASURY_INTERVAL", "daily"),
            http_timeout_secs,
            server_port,
        })
    }
}

fn env_var(key: &str) -> EngineResult<String> {
    std::env::var(key).map_err(|_| EngineError::Config(format!("missing env var: {key}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
