pub mod black_scholes;

use crate::errors::{EngineError, EngineResult};

/// European option side. A two-variant enum instead of a string
/// discriminator: an unsupported value cannot reach the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl std::str::FromStr for OptionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(EngineError::UnsupportedOptionType(other.to_string())),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// The five market inputs every pricing operation consumes.
/// Constructed only through `new`, which rejects inputs the formulas are
/// undefined for, so the engine itself never sees a degenerate value.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MarketInputs {
    /// Current price of the underlying.
    pub spot: f64,
    /// Strike price, same currency/unit as spot.
    pub strike: f64,
    /// Time to maturity in years.
    pub maturity: f64,
    /// Annualized risk-free rate as a decimal fraction. May be <= 0.
    pub rate: f64,
    /// Annualized volatility of the underlying's log-returns.
    pub volatility: f64,
}

impl MarketInputs {
    /// Validate and bundle the five scalars. Spot, strike, maturity and
    /// volatility must be finite and > 0; rate must be finite, either sign.
    /// No clamping, no substitution: a bad input is rejected, never repaired.
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
    ) -> EngineResult<Self> {
        require_positive("spot", spot)?;
        require_positive("strike", strike)?;
        require_positive("maturity", maturity)?;
        require_finite("rate", rate)?;
        require_positive("volatility", volatility)?;

        Ok(Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
        })
    }
}

fn require_finite(name: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> EngineResult<()> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "{name} must be > 0, got {value}"
        )));
    }
    Ok(())
}

/// First and second-order price sensitivities.
/// Theta is annualized (price change per year of maturity); vega and rho
/// are per whole unit of volatility and rate, not per 1% move.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

/// Theoretical fair value plus sensitivities for one option side.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct OptionQuote {
    pub price: f64,
    pub greeks: Greeks,
}

/// Everything the dashboard shows for one (S, K, T, r, sigma): the inputs
/// echoed back plus both sides fully priced. Full f64 precision; display
/// rounding happens at the presentation layer only.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ValuationSheet {
    pub spot: f64,
    pub rate: f64,
    pub call: OptionQuote,
    pub put: OptionQuote,
}
