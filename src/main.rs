use optionslab::config::AppConfig;
use optionslab::models::black_scholes;
use optionslab::sim::batch::{run_equity_curve_by_payoff, snapshot_trade_edge};
use optionslab::sim::gbm::simulate_path;
use optionslab::sim::strategy::run_strategy_simulation;
use optionslab::types::ExitLevels;
use optionslab::valuation::score_valuation;
use optionslab::EngineResult;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    // Structured logging on stderr; results go to stdout as JSON lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("optionslab starting");

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cfg) {
        tracing::error!("run error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: &AppConfig) -> EngineResult<()> {
    let mut rng = match cfg.seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // One-shot valuation: price, score, grade.
    let model_price = black_scholes::price(&cfg.contract)?;
    let valuation = score_valuation(model_price, &cfg.contract, &cfg.market);
    tracing::info!(
        grade = %valuation.grade,
        model_price,
        edge = valuation.trading_edge,
        "valuation complete"
    );
    emit("valuation", &valuation);

    // Single path preview with its exit thresholds.
    let path = simulate_path(
        &mut rng,
        cfg.sim.s0,
        cfg.sim.mu,
        cfg.sim.sigma,
        cfg.sim.dt,
        cfg.sim.steps,
    );
    let levels = ExitLevels::from_config(&cfg.sim);
    let terminal = path[cfg.sim.steps];
    tracing::info!(terminal, steps = cfg.sim.steps, "price path simulated");
    emit(
        "price_path",
        &serde_json::json!({ "terminal_price": terminal, "levels": levels, "path": path }),
    );

    // Exit-rule strategy across trials.
    let strategy = run_strategy_simulation(&cfg.sim, &mut rng)?;
    tracing::info!(
        win_rate = strategy.win_rate,
        final_equity = strategy.final_equity,
        "strategy simulation complete"
    );
    emit("strategy_run", &strategy);

    // Buy-and-hold terminal-payoff curve.
    let curve = run_equity_curve_by_payoff(
        &cfg.contract,
        cfg.sim.mu,
        cfg.sim.dt,
        cfg.sim.steps,
        cfg.sim.num_trades,
        &mut rng,
    )?;
    tracing::info!(
        final_pl = curve[curve.len() - 1],
        trades = curve.len(),
        "payoff equity curve complete"
    );
    emit("equity_curve", &curve);

    // Model-vs-market snapshot.
    let snapshot = snapshot_trade_edge(&cfg.contract, cfg.market.market_option_price)?;
    tracing::info!(trade_edge = snapshot.trade_edge, "edge snapshot complete");
    emit("trade_edge", &snapshot);

    Ok(())
}

fn emit<T: serde::Serialize>(kind: &str, data: &T) {
    let line = serde_json::json!({ "type": kind, "data": data });
    println!("{line}");
}
