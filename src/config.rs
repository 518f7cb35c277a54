use crate::errors::{EngineError, EngineResult};
use crate::types::{MarketContext, MarketRegime, OptionContract, OptionType, SimConfig};

/// Runner configuration, read from the environment (with `.env` support).
/// Every knob has a default so the binary runs out of the box; the
/// optional SIM_SEED makes all stochastic output reproducible.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub contract: OptionContract,
    pub market: MarketContext,
    pub sim: SimConfig,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let option_type = OptionType::from_label(&env_var_or("OPTION_TYPE", "call"))
            .map_err(|e| EngineError::Config(format!("OPTION_TYPE: {e}")))?;
        let regime = MarketRegime::from_label(&env_var_or("MARKET_REGIME", "bull"))
            .map_err(|e| EngineError::Config(format!("MARKET_REGIME: {e}")))?;

        let contract = OptionContract {
            option_type,
            spot: parse_f64("SPOT", "100.0")?,
            strike: parse_f64("STRIKE", "100.0")?,
            sigma: parse_f64("SIGMA", "0.2")?,
            rate: parse_f64("RATE", "0.05")?,
            days_to_expiry: parse_f64("DAYS_TO_EXPIRY", "30")?,
        };

        let market = MarketContext {
            regime,
            theta: parse_f64("THETA", "0.05")?,
            delta: parse_f64("DELTA", "0.5")?,
            atr: parse_f64("ATR", "1.5")?,
            open_interest: parse_f64("OPEN_INTEREST", "1000")?,
            market_option_price: parse_f64("MARKET_OPTION_PRICE", "4.0")?,
        };

        let sim = SimConfig {
            s0: contract.spot,
            mu: parse_f64("SIM_MU", "0.05")?,
            sigma: contract.sigma,
            dt: parse_f64("SIM_DT", "0.01")?,
            steps: parse_usize("SIM_STEPS", "100")?,
            num_trades: parse_usize("NUM_TRADES", "200")?,
            strike: contract.strike,
            tp_pct: parse_f64("TP_PCT", "0.15")?,
            sl_pct: parse_f64("SL_PCT", "0.10")?,
            secondary_tp_pct: parse_f64("SECONDARY_TP_PCT", "0.10")?,
            extraction_pct: parse_f64("EXTRACTION_PCT", "0.75")?,
            initial_equity: parse_f64("INITIAL_EQUITY", "10000")?,
        };

        let seed = match std::env::var("SIM_SEED") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| EngineError::Config(format!("SIM_SEED: {e}")))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            contract,
            market,
            sim,
            seed,
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_f64(key: &str, default: &str) -> EngineResult<f64> {
    env_var_or(key, default)
        .parse::<f64>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}

fn parse_usize(key: &str, default: &str) -> EngineResult<usize> {
    env_var_or(key, default)
        .parse::<usize>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))
}
