use crate::errors::{EngineError, EngineResult};
use crate::models::black_scholes;
use crate::sim::gbm::simulate_path;
use crate::types::{OptionContract, OptionType, TradeEdgeSnapshot};
use rand::Rng;

/// Batch runners over the pricer and the path generator. These evaluate
/// raw terminal payoffs against the model price as cost basis; the
/// exit-rule walk lives in `sim::strategy`.

/// Standard equity-option contract multiplier.
const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Cumulative P&L across `num_trades` buy-and-hold trials: each trial
/// simulates a full path from the contract's spot, realizes the terminal
/// intrinsic payoff, and pays the model price as cost. The returned curve
/// has exactly `num_trades` points.
pub fn run_equity_curve_by_payoff<R: Rng + ?Sized>(
    contract: &OptionContract,
    mu: f64,
    dt: f64,
    steps: usize,
    num_trades: usize,
    rng: &mut R,
) -> EngineResult<Vec<f64>> {
    if steps == 0 {
        return Err(EngineError::InvalidInput("steps must be >= 1".into()));
    }
    if num_trades == 0 {
        return Err(EngineError::InvalidInput("num_trades must be >= 1".into()));
    }
    if !mu.is_finite() || !dt.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "mu and dt must be finite, got mu={mu} dt={dt}"
        )));
    }

    // Same contract every trial, so the cost basis is fixed up front.
    let model_price = black_scholes::price(contract)?;
    let cost_basis = model_price * CONTRACT_MULTIPLIER;

    let mut curve = Vec::with_capacity(num_trades);
    let mut cumulative = 0.0;
    for _ in 0..num_trades {
        let path = simulate_path(rng, contract.spot, mu, contract.sigma, dt, steps);
        let terminal = path[steps];
        let payoff = match contract.option_type {
            OptionType::Call => (terminal - contract.strike).max(0.0) * CONTRACT_MULTIPLIER,
            OptionType::Put => (contract.strike - terminal).max(0.0) * CONTRACT_MULTIPLIER,
        };
        cumulative += payoff - cost_basis;
        curve.push(cumulative);
    }

    Ok(curve)
}

/// Single-shot model-vs-market comparison. The edge sign flips with the
/// option type here (model minus market for calls, market minus model for
/// puts), unlike the scorer's trading edge which keeps one sign for both.
/// Both conventions are long-observed behavior; do not unify them.
pub fn snapshot_trade_edge(
    contract: &OptionContract,
    market_price: f64,
) -> EngineResult<TradeEdgeSnapshot> {
    if !market_price.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "market_price must be finite, got {market_price}"
        )));
    }

    let model_price = black_scholes::price(contract)?;
    let trade_edge = match contract.option_type {
        OptionType::Call => model_price - market_price,
        OptionType::Put => market_price - model_price,
    };

    Ok(TradeEdgeSnapshot {
        model_price,
        market_price,
        trade_edge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn contract(option_type: OptionType) -> OptionContract {
        OptionContract {
            option_type,
            spot: 100.0,
            strike: 90.0,
            sigma: 0.2,
            rate: 0.05,
            days_to_expiry: 126.0,
        }
    }

    #[test]
    fn test_curve_length() {
        let mut rng = StdRng::seed_from_u64(21);
        for n in [1usize, 5, 50] {
            let curve = run_equity_curve_by_payoff(
                &contract(OptionType::Call),
                0.05,
                1.0 / 252.0,
                32,
                n,
                &mut rng,
            )
            .unwrap();
            assert_eq!(curve.len(), n);
        }
    }

    #[test]
    fn test_near_zero_vol_curve_is_arithmetic() {
        // Vanishing diffusion pins the terminal price at the spot, so each
        // trial adds the same P&L and the curve grows linearly.
        let mut c = contract(OptionType::Call);
        c.sigma = 1e-9;
        let mut rng = StdRng::seed_from_u64(17);
        let curve = run_equity_curve_by_payoff(&c, 0.0, 0.01, 10, 8, &mut rng).unwrap();

        let model_price = black_scholes::price(&c).unwrap();
        let per_trial = (c.spot - c.strike) * CONTRACT_MULTIPLIER - model_price * CONTRACT_MULTIPLIER;
        for (i, point) in curve.iter().enumerate() {
            let expected = per_trial * (i + 1) as f64;
            assert!(
                (point - expected).abs() < 1e-3,
                "trial {i}: {point} vs {expected}"
            );
        }
    }

    #[test]
    fn test_degenerate_counts_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let c = contract(OptionType::Call);
        assert!(run_equity_curve_by_payoff(&c, 0.0, 0.01, 0, 5, &mut rng).is_err());
        assert!(run_equity_curve_by_payoff(&c, 0.0, 0.01, 5, 0, &mut rng).is_err());
        assert!(run_equity_curve_by_payoff(&c, f64::NAN, 0.01, 5, 5, &mut rng).is_err());
    }

    #[test]
    fn test_snapshot_sign_convention_flips_by_type() {
        let call = contract(OptionType::Call);
        let put = contract(OptionType::Put);
        let market = 5.0;

        let call_snap = snapshot_trade_edge(&call, market).unwrap();
        let put_snap = snapshot_trade_edge(&put, market).unwrap();

        assert!(
            (call_snap.trade_edge - (call_snap.model_price - market)).abs() < 1e-12,
            "call edge is model minus market"
        );
        assert!(
            (put_snap.trade_edge - (market - put_snap.model_price)).abs() < 1e-12,
            "put edge is market minus model"
        );
    }

    #[test]
    fn test_snapshot_rejects_bad_inputs() {
        let mut c = contract(OptionType::Call);
        assert!(snapshot_trade_edge(&c, f64::NAN).is_err());
        c.sigma = 0.0;
        assert!(snapshot_trade_edge(&c, 5.0).is_err());
    }
}
