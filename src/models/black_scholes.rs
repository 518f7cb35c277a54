use crate::errors::EngineResult;
use crate::models::normal::norm_cdf;
use crate::types::{OptionContract, OptionType};

/// Closed-form European option pricing.
///
/// call = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// put  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// where d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma*sqrt(T))
/// and d2 = d1 - sigma*sqrt(T).
///
/// Inputs are validated up front; sigma <= 0 or T <= 0 is a typed error,
/// never a NaN that leaks into downstream scoring.

/// Precomputed intermediates shared by both option types.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct PricingParams {
    pub ttm_years: f64,
    pub ln_s_k: f64,
    pub sqrt_t: f64,
    pub sigma_sqrt_t: f64,
    pub half_sigma_sq: f64,
    pub discount: f64,
}

impl PricingParams {
    #[inline]
    pub fn from_contract(contract: &OptionContract) -> Self {
        let ttm_years = contract.ttm_years();
        let sqrt_t = ttm_years.sqrt();
        Self {
            ttm_years,
            ln_s_k: (contract.spot / contract.strike).ln(),
            sqrt_t,
            sigma_sqrt_t: contract.sigma * sqrt_t,
            half_sigma_sq: 0.5 * contract.sigma * contract.sigma,
            discount: (-contract.rate * ttm_years).exp(),
        }
    }
}

/// Model price of the contract. Non-negative for all valid inputs.
pub fn price(contract: &OptionContract) -> EngineResult<f64> {
    contract.validate()?;

    let p = PricingParams::from_contract(contract);
    let d1 = (p.ln_s_k + (contract.rate + p.half_sigma_sq) * p.ttm_years) / p.sigma_sqrt_t;
    let d2 = d1 - p.sigma_sqrt_t;

    let value = match contract.option_type {
        OptionType::Call => {
            contract.spot * norm_cdf(d1) - contract.strike * p.discount * norm_cdf(d2)
        }
        OptionType::Put => {
            contract.strike * p.discount * norm_cdf(-d2) - contract.spot * norm_cdf(-d1)
        }
    };

    Ok(value.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_contract(option_type: OptionType) -> OptionContract {
        // 126 trading days = exactly half a year
        OptionContract {
            option_type,
            spot: 100.0,
            strike: 100.0,
            sigma: 0.2,
            rate: 0.05,
            days_to_expiry: 126.0,
        }
    }

    #[test]
    fn test_atm_reference_values() {
        let call = price(&atm_contract(OptionType::Call)).unwrap();
        let put = price(&atm_contract(OptionType::Put)).unwrap();
        assert!((call - 6.888).abs() < 1e-2, "call = {call}");
        assert!((put - 4.421).abs() < 1e-2, "put = {put}");
    }

    #[test]
    fn test_put_call_parity() {
        let c = atm_contract(OptionType::Call);
        let call = price(&c).unwrap();
        let put = price(&atm_contract(OptionType::Put)).unwrap();
        let forward = c.spot - c.strike * (-c.rate * c.ttm_years()).exp();
        assert!(
            (call - put - forward).abs() < 1e-6,
            "parity violated: {} vs {}",
            call - put,
            forward
        );
    }

    #[test]
    fn test_deep_otm_non_negative() {
        let mut c = atm_contract(OptionType::Call);
        c.strike = 500.0;
        let v = price(&c).unwrap();
        assert!(v >= 0.0, "deep OTM call priced negative: {v}");
        assert!(v < 1e-3, "deep OTM call should be near zero: {v}");
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        let mut c = atm_contract(OptionType::Call);
        c.sigma = 0.0;
        assert!(price(&c).is_err(), "sigma=0 must not price");

        let mut c = atm_contract(OptionType::Put);
        c.days_to_expiry = 0.0;
        assert!(price(&c).is_err(), "T=0 must not price");

        let mut c = atm_contract(OptionType::Call);
        c.spot = f64::INFINITY;
        assert!(price(&c).is_err(), "non-finite spot must not price");
    }

    #[test]
    fn test_pure_function() {
        let c = atm_contract(OptionType::Call);
        let a = price(&c).unwrap();
        let b = price(&c).unwrap();
        assert_eq!(a.to_bits(), b.to_bits(), "identical inputs, identical output");
    }
}
