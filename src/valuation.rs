use crate::types::{Grade, MarketContext, MarketRegime, OptionContract, OptionType, ValuationResult};

/// Composite valuation scoring.
///
/// Q = (P * theta * e^(IV/100)) / (delta * ATR * (P/S) * (OI+1) * ln(days+1))
///
/// where:
///   P    = model price
///   IV   = sigma * 100 (report-only, reuses the input volatility)
///   days = raw trading-day count (not the year fraction)
///
/// The regime factor scales the adjustment and the final grade score.
/// Pure function, no side effects, no allocations beyond the
/// recommendation string.

/// Volatility above this baseline starts eroding the volatility score.
const BASELINE_SIGMA: f64 = 0.2;
/// Open interest at which the liquidity score reaches 1.0.
const IDEAL_OPEN_INTEREST: f64 = 1000.0;

const EDGE_WEIGHT: f64 = 0.6;
const VOLATILITY_WEIGHT: f64 = 0.2;
const LIQUIDITY_WEIGHT: f64 = 0.2;

const AAA_THRESHOLD: f64 = 0.5;
const AA_THRESHOLD: f64 = 0.3;

/// A-grade exit parameters, interpolated into the recommendation text.
const A_STOP_LOSS: f64 = 0.10;
const A_TAKE_PROFIT: f64 = 0.20;
const A_HOLDING_PERIOD: &str = "intraday/short-term";

/// Option-type-dependent regime factor. Market sentiment dominates: an
/// option fighting the trend gets a heavy penalty, a consolidating market
/// a moderate one. The wildcard arms are the neutral case.
#[inline]
pub fn regime_factor(option_type: OptionType, regime: MarketRegime) -> f64 {
    match option_type {
        OptionType::Call => match regime {
            MarketRegime::Bear => 0.5,
            MarketRegime::Consolidating => 0.7,
            _ => 1.0,
        },
        OptionType::Put => match regime {
            MarketRegime::Bull => 0.5,
            MarketRegime::Consolidating => 0.7,
            _ => 1.0,
        },
    }
}

/// Grade from the composite score. First match wins, thresholds inclusive.
#[inline]
pub fn grade_for(score: f64) -> Grade {
    if score >= AAA_THRESHOLD {
        Grade::Aaa
    } else if score >= AA_THRESHOLD {
        Grade::Aa
    } else {
        Grade::A
    }
}

fn recommendation_for(grade: Grade) -> String {
    match grade {
        Grade::Aaa => {
            "This option is clearly undervalued. Consider a longer holding period \
             with dual take-profit targets."
                .to_string()
        }
        Grade::Aa => {
            "Moderate edge detected. Recommended stop loss: 30% below entry, \
             take profit: 15% above entry (1-3 day trade)."
                .to_string()
        }
        Grade::A => format!(
            "Low edge detected. Recommended stop loss: {:.0}% below entry, \
             take profit: {:.0}% above entry ({}).",
            A_STOP_LOSS * 100.0,
            A_TAKE_PROFIT * 100.0,
            A_HOLDING_PERIOD
        ),
    }
}

/// Score a priced contract against its market context.
///
/// The two divisions here are zero-guarded by definition: a zero
/// adjustment denominator yields adjustment 0, a zero market price yields
/// edge ratio 0. Neither is an error.
pub fn score_valuation(
    model_price: f64,
    contract: &OptionContract,
    market: &MarketContext,
) -> ValuationResult {
    let implied_vol_pct = contract.sigma * 100.0;

    let numerator = model_price * market.theta * (implied_vol_pct / 100.0).exp();
    let denominator = market.delta
        * market.atr
        * (model_price / contract.spot)
        * (market.open_interest + 1.0)
        * (contract.days_to_expiry + 1.0).ln();
    let mut adjustment = if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    };

    let factor = regime_factor(contract.option_type, market.regime);
    adjustment *= factor;

    let composite_valuation = model_price + adjustment;
    let trading_edge = composite_valuation - market.market_option_price;
    let edge_ratio = if market.market_option_price != 0.0 {
        trading_edge / market.market_option_price
    } else {
        0.0
    };

    let volatility_score = if contract.sigma <= BASELINE_SIGMA {
        1.0
    } else {
        (1.0 - (contract.sigma - BASELINE_SIGMA) / BASELINE_SIGMA).max(0.0)
    };

    let liquidity_score =
        (market.open_interest + 1.0).ln() / (IDEAL_OPEN_INTEREST + 1.0).ln();

    let composite_grade_score = factor
        * (EDGE_WEIGHT * edge_ratio
            + VOLATILITY_WEIGHT * volatility_score
            + LIQUIDITY_WEIGHT * liquidity_score);

    let grade = grade_for(composite_grade_score);

    ValuationResult {
        model_price,
        implied_vol_pct,
        adjustment,
        composite_valuation,
        trading_edge,
        edge_ratio,
        volatility_score,
        liquidity_score,
        composite_grade_score,
        grade,
        recommendation: recommendation_for(grade),
    }
}
