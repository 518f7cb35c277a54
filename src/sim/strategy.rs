use crate::errors::EngineResult;
use crate::sim::gbm::gbm_step;
use crate::types::{ExitLevels, SimConfig, StrategyRunResult, TrialOutcome};
use rand::Rng;

// ═══════════════════════════════════════════════════════════════════════════
// EXIT-RULE STRATEGY SIMULATION
//
// Each trial models one trade entered AT THE STRIKE and walked forward one
// GBM step at a time against three exit thresholds.
//
// RULES, checked in priority order every step:
// 1. STOP-LOSS: price at or below K*(1-sl) ends the trial at the raw loss
//    (price - K), even after the primary target was reached.
// 2. PRIMARY TARGET: first touch of K*(1+tp) arms the profit-lock rules.
//    No payoff is realized at that moment; the same step immediately falls
//    through to rule 3, so a single step that jumps past the secondary
//    level exits at once.
// 3. ARMED EXITS: at or above the secondary level, realize the secondary
//    gain scaled by the extraction fraction; back below the primary level,
//    lock the primary gain scaled the same way.
// 4. EXPIRY: out of steps. Armed trials lock the primary gain; unarmed
//    trials mark to market at the final price.
// ═══════════════════════════════════════════════════════════════════════════

const EXIT_STOP_LOSS: &str = "stop_loss";
const EXIT_SECONDARY_TARGET: &str = "secondary_target";
const EXIT_PROFIT_LOCK: &str = "profit_lock";
const EXIT_EXPIRY: &str = "expiry";

#[inline]
fn close_trial(realized_pl: f64, reached_primary_tp: bool, reason: &'static str) -> TrialOutcome {
    tracing::debug!(pl = realized_pl, reached_tp = reached_primary_tp, reason, "trial exit");
    TrialOutcome {
        realized_pl,
        reached_primary_tp,
    }
}

/// Walk one simulated trade. Entry price is the strike.
fn run_trial<R: Rng + ?Sized>(cfg: &SimConfig, levels: &ExitLevels, rng: &mut R) -> TrialOutcome {
    let k = cfg.strike;
    let mut price = k;
    let mut reached_primary = false;

    for _ in 0..cfg.steps {
        price *= gbm_step(rng, cfg.mu, cfg.sigma, cfg.dt);

        if price <= levels.stop {
            return close_trial(price - k, reached_primary, EXIT_STOP_LOSS);
        }

        if !reached_primary && price >= levels.primary_tp {
            reached_primary = true;
        }

        if reached_primary {
            if price >= levels.secondary_tp {
                return close_trial(
                    (levels.secondary_tp - k) * cfg.extraction_pct,
                    true,
                    EXIT_SECONDARY_TARGET,
                );
            }
            if price < levels.primary_tp {
                return close_trial(
                    (levels.primary_tp - k) * cfg.extraction_pct,
                    true,
                    EXIT_PROFIT_LOCK,
                );
            }
        }
    }

    let realized = if reached_primary {
        (levels.primary_tp - k) * cfg.extraction_pct
    } else {
        price - k
    };
    close_trial(realized, reached_primary, EXIT_EXPIRY)
}

/// Run `num_trades` independent trials and aggregate equity + win rate.
/// Trial i's equity lands at index i of the curve.
pub fn run_strategy_simulation<R: Rng + ?Sized>(
    cfg: &SimConfig,
    rng: &mut R,
) -> EngineResult<StrategyRunResult> {
    cfg.validate()?;

    let levels = ExitLevels::from_config(cfg);
    let mut equity = cfg.initial_equity;
    let mut equity_curve = Vec::with_capacity(cfg.num_trades);
    let mut wins: usize = 0;

    for _ in 0..cfg.num_trades {
        let outcome = run_trial(cfg, &levels, rng);
        if outcome.realized_pl > 0.0 {
            wins += 1;
        }
        equity += outcome.realized_pl;
        equity_curve.push(equity);
    }

    let win_rate = wins as f64 / cfg.num_trades as f64 * 100.0;
    tracing::debug!(win_rate, final_equity = equity, trades = cfg.num_trades, "strategy run done");

    Ok(StrategyRunResult {
        equity_curve,
        win_rate,
        final_equity: equity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base_config() -> SimConfig {
        SimConfig {
            s0: 100.0,
            mu: 0.05,
            sigma: 0.2,
            dt: 1.0 / 252.0,
            steps: 50,
            num_trades: 100,
            strike: 100.0,
            tp_pct: 0.15,
            sl_pct: 0.10,
            secondary_tp_pct: 0.10,
            extraction_pct: 0.75,
            initial_equity: 10_000.0,
        }
    }

    #[test]
    fn test_curve_length_and_win_rate_bounds() {
        let cfg = base_config();
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_strategy_simulation(&cfg, &mut rng).unwrap();
        assert_eq!(result.equity_curve.len(), cfg.num_trades);
        assert!((0.0..=100.0).contains(&result.win_rate), "win rate {}", result.win_rate);
        assert_eq!(
            result.final_equity,
            *result.equity_curve.last().unwrap(),
            "final equity is the last curve point"
        );
    }

    #[test]
    fn test_zero_stop_loss_stops_at_first_touch() {
        // Deterministic downward drift: every step shrinks the price, so
        // with the stop at the strike itself the first step stops out.
        let mut cfg = base_config();
        cfg.mu = -5.0;
        cfg.sigma = 0.0;
        cfg.sl_pct = 0.0;
        cfg.dt = 0.01;
        cfg.num_trades = 20;
        let mut rng = StdRng::seed_from_u64(3);
        let result = run_strategy_simulation(&cfg, &mut rng).unwrap();
        assert_eq!(result.win_rate, 0.0, "every trial stops out at a loss");

        let per_trial = cfg.strike * ((-5.0_f64 * 0.01).exp() - 1.0);
        for (i, eq) in result.equity_curve.iter().enumerate() {
            let expected = cfg.initial_equity + per_trial * (i + 1) as f64;
            assert!(
                (eq - expected).abs() < 1e-9,
                "trial {i}: equity {eq} vs expected {expected}"
            );
        }
    }

    #[test]
    fn test_jump_past_both_targets_exits_secondary_same_step() {
        // One deterministic step multiplier of e^0.3 ≈ 1.3499 clears the
        // 5% primary and the compounded 10.25% secondary at once; the
        // arming step must fall through to the secondary exit.
        let mut cfg = base_config();
        cfg.mu = 30.0;
        cfg.sigma = 0.0;
        cfg.dt = 0.01;
        cfg.tp_pct = 0.05;
        cfg.secondary_tp_pct = 0.05;
        cfg.num_trades = 4;
        let mut rng = StdRng::seed_from_u64(5);
        let result = run_strategy_simulation(&cfg, &mut rng).unwrap();

        let secondary = cfg.strike * 1.05 * 1.05;
        let per_trial = (secondary - cfg.strike) * cfg.extraction_pct;
        assert_eq!(result.win_rate, 100.0);
        assert!(
            (result.final_equity - (cfg.initial_equity + 4.0 * per_trial)).abs() < 1e-9,
            "final equity {}",
            result.final_equity
        );
    }

    #[test]
    fn test_expiry_after_primary_locks_extraction() {
        // Price climbs past the primary target but the secondary sits far
        // away; the monotone path never falls back, so expiry locks the
        // primary gain times the extraction fraction.
        let mut cfg = base_config();
        cfg.mu = 2.0;
        cfg.sigma = 0.0;
        cfg.dt = 0.01;
        cfg.steps = 10;
        cfg.tp_pct = 0.05;
        cfg.secondary_tp_pct = 10.0;
        cfg.num_trades = 3;
        let mut rng = StdRng::seed_from_u64(8);
        let result = run_strategy_simulation(&cfg, &mut rng).unwrap();

        let per_trial = (cfg.strike * 1.05 - cfg.strike) * cfg.extraction_pct;
        assert_eq!(result.win_rate, 100.0);
        assert!(
            (result.final_equity - (cfg.initial_equity + 3.0 * per_trial)).abs() < 1e-9,
            "final equity {}",
            result.final_equity
        );
    }

    #[test]
    fn test_unarmed_expiry_marks_to_market() {
        // Mild deterministic drift that never reaches the 15% target:
        // expiry realizes final price minus strike.
        let mut cfg = base_config();
        cfg.mu = 0.5;
        cfg.sigma = 0.0;
        cfg.dt = 0.01;
        cfg.steps = 10;
        cfg.num_trades = 1;
        let mut rng = StdRng::seed_from_u64(13);
        let result = run_strategy_simulation(&cfg, &mut rng).unwrap();

        let final_price = cfg.strike * (0.5_f64 * 0.01 * 10.0).exp();
        let expected = cfg.initial_equity + (final_price - cfg.strike);
        assert!(
            (result.final_equity - expected).abs() < 1e-9,
            "final equity {} vs {expected}",
            result.final_equity
        );
        assert_eq!(result.win_rate, 100.0, "positive mark-to-market counts as a win");
    }

    #[test]
    fn test_degenerate_configs_rejected() {
        let mut cfg = base_config();
        cfg.num_trades = 0;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run_strategy_simulation(&cfg, &mut rng).is_err());

        let mut cfg = base_config();
        cfg.steps = 0;
        assert!(run_strategy_simulation(&cfg, &mut rng).is_err());

        let mut cfg = base_config();
        cfg.mu = f64::NAN;
        assert!(run_strategy_simulation(&cfg, &mut rng).is_err());
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let cfg = base_config();
        let mut a = StdRng::seed_from_u64(2024);
        let mut b = StdRng::seed_from_u64(2024);
        let ra = run_strategy_simulation(&cfg, &mut a).unwrap();
        let rb = run_strategy_simulation(&cfg, &mut b).unwrap();
        assert_eq!(ra.equity_curve, rb.equity_curve);
        assert_eq!(ra.win_rate, rb.win_rate);
    }
}
