use crate::errors::{EngineError, EngineResult};

/// Day-count convention: maturities are entered in trading days and
/// converted to a year fraction before any pricing formula sees them.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

// ── Contract & market inputs ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn from_label(label: &str) -> EngineResult<Self> {
        match label.to_ascii_lowercase().as_str() {
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            other => Err(EngineError::InvalidInput(format!(
                "unknown option type: {other}"
            ))),
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

/// Categorical market-trend label. Closed set; labels that fail to parse
/// stop at the config boundary and never reach the scoring code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketRegime {
    Bull,
    Bear,
    Consolidating,
}

impl MarketRegime {
    pub fn from_label(label: &str) -> EngineResult<Self> {
        match label.to_ascii_lowercase().as_str() {
            "bull" => Ok(Self::Bull),
            "bear" => Ok(Self::Bear),
            "consolidating" => Ok(Self::Consolidating),
            other => Err(EngineError::InvalidInput(format!(
                "unknown market regime: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bull => write!(f, "bull"),
            Self::Bear => write!(f, "bear"),
            Self::Consolidating => write!(f, "consolidating"),
        }
    }
}

/// One European option contract. Immutable per valuation call.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct OptionContract {
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    /// Annualized volatility as a decimal (0.2 = 20%)
    pub sigma: f64,
    /// Annualized risk-free rate as a decimal
    pub rate: f64,
    /// Time to maturity in trading days (raw day count; the scorer's
    /// liquidity-style log term consumes this directly)
    pub days_to_expiry: f64,
}

impl OptionContract {
    /// Year-fraction maturity. Every pricing formula consumes this, never
    /// the raw day count.
    #[inline]
    pub fn ttm_years(&self) -> f64 {
        self.days_to_expiry / TRADING_DAYS_PER_YEAR
    }

    /// Check the numeric preconditions the closed-form pricer relies on.
    pub fn validate(&self) -> EngineResult<()> {
        for (name, v) in [
            ("spot", self.spot),
            ("strike", self.strike),
            ("sigma", self.sigma),
            ("rate", self.rate),
            ("days_to_expiry", self.days_to_expiry),
        ] {
            if !v.is_finite() {
                return Err(EngineError::InvalidInput(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        if self.spot <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "spot must be > 0, got {}",
                self.spot
            )));
        }
        if self.strike <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "strike must be > 0, got {}",
                self.strike
            )));
        }
        if self.sigma <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "sigma must be > 0, got {}",
                self.sigma
            )));
        }
        if self.days_to_expiry <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "days_to_expiry must be > 0, got {}",
                self.days_to_expiry
            )));
        }
        Ok(())
    }
}

/// Market context supplied alongside a contract when scoring.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct MarketContext {
    pub regime: MarketRegime,
    pub theta: f64,
    pub delta: f64,
    pub atr: f64,
    pub open_interest: f64,
    pub market_option_price: f64,
}

// ── Valuation output ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Grade {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "A")]
    A,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aaa => write!(f, "AAA"),
            Self::Aa => write!(f, "AA"),
            Self::A => write!(f, "A"),
        }
    }
}

/// Everything the scorer derives from one priced contract. Constructed
/// once, never mutated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValuationResult {
    pub model_price: f64,
    pub implied_vol_pct: f64,
    pub adjustment: f64,
    pub composite_valuation: f64,
    pub trading_edge: f64,
    pub edge_ratio: f64,
    pub volatility_score: f64,
    pub liquidity_score: f64,
    pub composite_grade_score: f64,
    pub grade: Grade,
    pub recommendation: String,
}

// ── Simulation inputs & outputs ──

/// One strategy-simulation run. Percent fields are fractions (0.15 = 15%).
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct SimConfig {
    pub s0: f64,
    /// Annualized drift
    pub mu: f64,
    /// Annualized volatility (0 is valid: degenerate deterministic path)
    pub sigma: f64,
    /// Time step in years
    pub dt: f64,
    pub steps: usize,
    pub num_trades: usize,
    pub strike: f64,
    pub tp_pct: f64,
    pub sl_pct: f64,
    pub secondary_tp_pct: f64,
    pub extraction_pct: f64,
    pub initial_equity: f64,
}

impl SimConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.steps == 0 {
            return Err(EngineError::InvalidInput("steps must be >= 1".into()));
        }
        if self.num_trades == 0 {
            return Err(EngineError::InvalidInput("num_trades must be >= 1".into()));
        }
        for (name, v) in [
            ("s0", self.s0),
            ("mu", self.mu),
            ("sigma", self.sigma),
            ("dt", self.dt),
            ("strike", self.strike),
            ("tp_pct", self.tp_pct),
            ("sl_pct", self.sl_pct),
            ("secondary_tp_pct", self.secondary_tp_pct),
            ("extraction_pct", self.extraction_pct),
            ("initial_equity", self.initial_equity),
        ] {
            if !v.is_finite() {
                return Err(EngineError::InvalidInput(format!(
                    "{name} must be finite, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Exit thresholds derived once per run from the strike and the configured
/// percents. The simulated trade always enters at the strike.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct ExitLevels {
    pub stop: f64,
    pub primary_tp: f64,
    pub secondary_tp: f64,
}

impl ExitLevels {
    #[inline]
    pub fn from_config(cfg: &SimConfig) -> Self {
        let primary_tp = cfg.strike * (1.0 + cfg.tp_pct);
        Self {
            stop: cfg.strike * (1.0 - cfg.sl_pct),
            primary_tp,
            secondary_tp: primary_tp * (1.0 + cfg.secondary_tp_pct),
        }
    }
}

/// Outcome of a single simulated trade.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct TrialOutcome {
    pub realized_pl: f64,
    pub reached_primary_tp: bool,
}

/// Aggregate over all trials of one strategy run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StrategyRunResult {
    /// Cumulative equity after each trial, in trial order (len == num_trades)
    pub equity_curve: Vec<f64>,
    /// Winning trials as a percentage in [0, 100]
    pub win_rate: f64,
    pub final_equity: f64,
}

/// Single-shot model-vs-market comparison.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[repr(C)]
pub struct TradeEdgeSnapshot {
    pub model_price: f64,
    pub market_price: f64,
    pub trade_edge: f64,
}
