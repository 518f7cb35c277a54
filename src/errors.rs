/// Domain-specific error types for the valuation engine.
/// Numeric preconditions (sigma > 0, positive day counts, finite inputs)
/// surface as typed errors at validated boundaries instead of propagating
/// as NaN into downstream formulas.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
