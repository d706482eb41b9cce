use crate::pricing::{Greeks, MarketInputs, OptionQuote, OptionType, ValuationSheet};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Black-Scholes pricing for European calls and puts.
///
/// C = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// P = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// where d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma*sqrt(T))
/// and d2 = d1 - sigma*sqrt(T).
///
/// Inputs are validated at `MarketInputs` construction, so every method
/// here is total: no NaN can be produced from a value that got this far.
/// Pure functions, no allocations, safe under concurrent use.
pub struct BlackScholes {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

/// The intermediate normalization variables every formula shares.
/// d2 is always derived as d1 - sigma*sqrt(T), never set independently.
#[derive(Debug, Clone, Copy)]
pub struct NormVars {
    pub d1: f64,
    pub d2: f64,
}

impl BlackScholes {
    pub fn new() -> Self {
        // Normal::new(0, 1) only fails if std_dev <= 0; this is safe.
        let normal = Normal::new(0.0, 1.0).unwrap_or_else(|_| {
            tracing::error!("failed to create standard normal -- using fallback");
            Normal::standard()
        });
        Self { normal }
    }

    /// Derive (d1, d2) from the five market inputs. Pure numeric transform.
    #[inline]
    pub fn norm_vars(&self, inp: &MarketInputs) -> NormVars {
        let sqrt_t = inp.maturity.sqrt();
        let d1 = ((inp.spot / inp.strike).ln()
            + (inp.rate + 0.5 * inp.volatility * inp.volatility) * inp.maturity)
            / (inp.volatility * sqrt_t);
        let d2 = d1 - inp.volatility * sqrt_t;
        NormVars { d1, d2 }
    }

    /// Theoretical fair value for one side.
    #[inline]
    pub fn price(&self, inp: &MarketInputs, side: OptionType) -> f64 {
        match side {
            OptionType::Call => self.call_price(inp),
            OptionType::Put => self.put_price(inp),
        }
    }

    #[inline]
    pub fn call_price(&self, inp: &MarketInputs) -> f64 {
        let NormVars { d1, d2 } = self.norm_vars(inp);
        let discounted_strike = inp.strike * (-inp.rate * inp.maturity).exp();
        inp.spot * self.normal.cdf(d1) - discounted_strike * self.normal.cdf(d2)
    }

    #[inline]
    pub fn put_price(&self, inp: &MarketInputs) -> f64 {
        let NormVars { d1, d2 } = self.norm_vars(inp);
        let discounted_strike = inp.strike * (-inp.rate * inp.maturity).exp();
        discounted_strike * self.normal.cdf(-d2) - inp.spot * self.normal.cdf(-d1)
    }

    /// dPrice/dSpot. In [0, 1] for calls, [-1, 0] for puts.
    #[inline]
    pub fn delta(&self, inp: &MarketInputs, side: OptionType) -> f64 {
        let nd1 = self.normal.cdf(self.norm_vars(inp).d1);
        match side {
            OptionType::Call => nd1,
            OptionType::Put => nd1 - 1.0,
        }
    }

    /// d2Price/dSpot2. Identical for call and put. Never negative.
    #[inline]
    pub fn gamma(&self, inp: &MarketInputs) -> f64 {
        let NormVars { d1, .. } = self.norm_vars(inp);
        self.normal.pdf(d1) / (inp.spot * inp.volatility * inp.maturity.sqrt())
    }

    /// dPrice/dT, annualized: price change per year of maturity.
    /// Callers wanting the commonly-quoted per-calendar-day figure divide
    /// by 365 themselves.
    #[inline]
    pub fn theta(&self, inp: &MarketInputs, side: OptionType) -> f64 {
        let NormVars { d1, d2 } = self.norm_vars(inp);
        let sqrt_t = inp.maturity.sqrt();
        let decay = -inp.spot * self.normal.pdf(d1) * inp.volatility / (2.0 * sqrt_t);
        let carry = inp.rate * inp.strike * (-inp.rate * inp.maturity).exp();
        match side {
            OptionType::Call => decay - carry * self.normal.cdf(d2),
            OptionType::Put => decay + carry * self.normal.cdf(-d2),
        }
    }

    /// dPrice/dSigma, per whole unit of volatility. Identical for call and
    /// put. Never negative.
    #[inline]
    pub fn vega(&self, inp: &MarketInputs) -> f64 {
        let NormVars { d1, .. } = self.norm_vars(inp);
        inp.spot * self.normal.pdf(d1) * inp.maturity.sqrt()
    }

    /// dPrice/dRate, per whole unit of rate.
    #[inline]
    pub fn rho(&self, inp: &MarketInputs, side: OptionType) -> f64 {
        let NormVars { d2, .. } = self.norm_vars(inp);
        let discounted = inp.strike * inp.maturity * (-inp.rate * inp.maturity).exp();
        match side {
            OptionType::Call => discounted * self.normal.cdf(d2),
            OptionType::Put => -discounted * self.normal.cdf(-d2),
        }
    }

    /// The five sensitivities for one side.
    pub fn greeks(&self, inp: &MarketInputs, side: OptionType) -> Greeks {
        Greeks {
            delta: self.delta(inp, side),
            gamma: self.gamma(inp),
            theta: self.theta(inp, side),
            vega: self.vega(inp),
            rho: self.rho(inp, side),
        }
    }

    /// Both sides fully priced for the dashboard.
    pub fn sheet(&self, inp: &MarketInputs) -> ValuationSheet {
        ValuationSheet {
            spot: inp.spot,
            rate: inp.rate,
            call: OptionQuote {
                price: self.call_price(inp),
                greeks: self.greeks(inp, OptionType::Call),
            },
            put: OptionQuote {
                price: self.put_price(inp),
                greeks: self.greeks(inp, OptionType::Put),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(spot: f64, strike: f64, maturity: f64, rate: f64, volatility: f64) -> MarketInputs {
        MarketInputs::new(spot, strike, maturity, rate, volatility).expect("valid test inputs")
    }

    #[test]
    fn test_norm_vars() {
        let engine = BlackScholes::new();
        let nv = engine.norm_vars(&inputs(100.0, 100.0, 1.0, 0.05, 0.2));
        // d1 = (0 + (0.05 + 0.02)) / 0.2 = 0.35, d2 = d1 - 0.2
        assert!((nv.d1 - 0.35).abs() < 1e-12, "d1={}", nv.d1);
        assert!((nv.d2 - 0.15).abs() < 1e-12, "d2={}", nv.d2);
    }

    #[test]
    fn test_reference_scenario() {
        // S=100, K=100, T=1, r=5%, sigma=20% -- standard reference values
        let engine = BlackScholes::new();
        let inp = inputs(100.0, 100.0, 1.0, 0.05, 0.2);

        let call = engine.call_price(&inp);
        let put = engine.put_price(&inp);
        assert!((call - 10.4506).abs() < 1e-3, "call={call}");
        assert!((put - 5.5735).abs() < 1e-3, "put={put}");

        assert!((engine.delta(&inp, OptionType::Call) - 0.6368).abs() < 1e-3);
        assert!((engine.delta(&inp, OptionType::Put) + 0.3632).abs() < 1e-3);
        assert!((engine.gamma(&inp) - 0.0188).abs() < 1e-3);
        assert!((engine.theta(&inp, OptionType::Call) + 6.4140).abs() < 1e-3);
        assert!((engine.theta(&inp, OptionType::Put) + 1.6579).abs() < 1e-3);
        assert!((engine.vega(&inp) - 37.524).abs() < 1e-3);
        assert!((engine.rho(&inp, OptionType::Call) - 53.232).abs() < 1e-3);
        assert!((engine.rho(&inp, OptionType::Put) + 41.890).abs() < 1e-3);
    }

    #[test]
    fn test_put_call_parity() {
        // C - P = S - K*e^(-rT), including a negative-rate case
        let engine = BlackScholes::new();
        for (s, k, t, r, v) in [
            (100.0, 100.0, 1.0, 0.05, 0.2),
            (110.0, 95.0, 0.5, 0.03, 0.35),
            (42.0, 60.0, 2.0, -0.01, 0.15),
            (250.0, 180.0, 0.25, 0.07, 0.6),
            (15.0, 15.0, 0.1, 0.0, 0.9),
        ] {
            let inp = inputs(s, k, t, r, v);
            let parity = engine.call_price(&inp) - engine.put_price(&inp);
            let expected = s - k * (-r * t).exp();
            assert!(
                (parity - expected).abs() < 1e-6,
                "parity violated for S={s} K={k} T={t} r={r} v={v}: {parity} vs {expected}"
            );
        }
    }

    #[test]
    fn test_bounds() {
        let engine = BlackScholes::new();
        for (s, k, t, r, v) in [
            (100.0, 100.0, 1.0, 0.05, 0.2),
            (150.0, 100.0, 0.25, 0.05, 0.2),
            (50.0, 100.0, 0.25, 0.05, 0.2),
            (100.0, 100.0, 5.0, -0.02, 0.8),
            (1.0, 1000.0, 0.01, 0.1, 0.05),
        ] {
            let inp = inputs(s, k, t, r, v);

            let dc = engine.delta(&inp, OptionType::Call);
            let dp = engine.delta(&inp, OptionType::Put);
            assert!((0.0..=1.0).contains(&dc), "call delta out of range: {dc}");
            assert!((-1.0..=0.0).contains(&dp), "put delta out of range: {dp}");

            assert!(engine.gamma(&inp) >= 0.0);
            assert!(engine.vega(&inp) >= 0.0);
            assert!(engine.call_price(&inp) >= 0.0);
            assert!(engine.put_price(&inp) >= 0.0);
        }
    }

    #[test]
    fn test_gamma_vega_match_across_sides() {
        let engine = BlackScholes::new();
        let sheet = engine.sheet(&inputs(120.0, 100.0, 0.75, 0.04, 0.3));
        assert_eq!(sheet.call.greeks.gamma, sheet.put.greeks.gamma);
        assert_eq!(sheet.call.greeks.vega, sheet.put.greeks.vega);
    }

    #[test]
    fn test_expiry_limits() {
        // As T -> 0+, the call converges to intrinsic value
        let engine = BlackScholes::new();
        let t = 1e-6;

        let itm = engine.call_price(&inputs(110.0, 100.0, t, 0.05, 0.2));
        assert!((itm - 10.0).abs() < 1e-3, "deep ITM call={itm}");

        let otm = engine.call_price(&inputs(90.0, 100.0, t, 0.05, 0.2));
        assert!(otm < 1e-6, "deep OTM call={otm}");
    }

    #[test]
    fn test_price_strictly_increases_with_volatility() {
        let engine = BlackScholes::new();
        let mut prev_call = 0.0;
        let mut prev_put = 0.0;
        for v in [0.05, 0.1, 0.2, 0.4, 0.8] {
            let inp = inputs(100.0, 105.0, 0.5, 0.05, v);
            let call = engine.call_price(&inp);
            let put = engine.put_price(&inp);
            assert!(call > prev_call, "call not increasing at sigma={v}: {call}");
            assert!(put > prev_put, "put not increasing at sigma={v}: {put}");
            prev_call = call;
            prev_put = put;
        }
    }

    #[test]
    fn test_degenerate_inputs_rejected_before_pricing() {
        // T=0 and sigma=0 must fail validation, never reach the formulas
        assert!(MarketInputs::new(100.0, 100.0, 0.0, 0.05, 0.2).is_err());
        assert!(MarketInputs::new(100.0, 100.0, 1.0, 0.05, 0.0).is_err());
    }
}
