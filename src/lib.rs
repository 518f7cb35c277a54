//! Options valuation and scenario-simulation engine.
//!
//! Two pipelines share the closed-form pricer:
//! - one-shot: contract + market context -> model price -> composite
//!   adjustment, letter grade, and recommendation;
//! - repeated-trial: GBM price paths walked against exit rules
//!   (stop-loss, primary/secondary targets, extraction) or evaluated as
//!   terminal payoffs, aggregated into equity curves and win rates.
//!
//! Everything is synchronous and runs to completion; all randomness comes
//! from a caller-injected `rand::Rng`, so a seeded generator reproduces a
//! run exactly.

pub mod config;
pub mod errors;
pub mod models;
pub mod sim;
pub mod types;
pub mod valuation;

pub use errors::{EngineError, EngineResult};
pub use models::black_scholes::price as price_option;
pub use models::normal::norm_cdf;
pub use sim::batch::{run_equity_curve_by_payoff, snapshot_trade_edge};
pub use sim::gbm::{gaussian_sample, simulate_path};
pub use sim::strategy::run_strategy_simulation;
pub use types::{
    ExitLevels, Grade, MarketContext, MarketRegime, OptionContract, OptionType, SimConfig,
    StrategyRunResult, TradeEdgeSnapshot, TrialOutcome, ValuationResult,
};
pub use valuation::score_valuation;
