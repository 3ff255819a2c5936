//! Progressive prop-bet laddering.
//!
//! Models a counting stat as LogNormal(ln(avg), sigma), prices each
//! rung of an over ladder as American odds, and sizes a decaying wager
//! ladder against the rungs.

/// Error-function approximation (Abramowitz & Stegun 7.1.26),
/// max absolute error ~1.5e-7 - plenty for pricing display.
fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const P: f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// P(X >= k) for X ~ LogNormal(mu, sigma). Zero/negative thresholds are
/// certain.
pub fn prob_at_least(k: f64, mu: f64, sigma: f64) -> f64 {
    if k <= 0.0 {
        return 1.0;
    }
    1.0 - normal_cdf((k.ln() - mu) / sigma)
}

/// Convert a probability to American odds (favorites negative).
pub fn american_odds(probability: f64) -> i32 {
    // Pin degenerate tails so the conversion stays finite.
    let p = probability.clamp(1e-6, 1.0 - 1e-6);
    let odds = if p > 0.5 {
        -(p / (1.0 - p)) * 100.0
    } else {
        ((1.0 - p) / p) * 100.0
    };
    odds.round() as i32
}

/// Decaying wager ladder: opens 10 / 7.50 / 5.00, then 0.75x the
/// previous rung (floored at 0.10), rounded to cents.
pub fn wager_ladder(num_bets: usize) -> Vec<f64> {
    let mut values: Vec<f64> = vec![10.0, 7.5, 5.0];
    while values.len() < num_bets {
        let next = (values.last().unwrap() * 0.75 * 100.0).round() / 100.0;
        values.push(next.max(0.1));
    }
    values.truncate(num_bets);
    values
}

/// Payout on a winning wager at the given American odds, rounded to
/// cents.
pub fn winnings(odds: i32, wager: f64) -> f64 {
    let raw = if odds > 0 {
        wager * (odds as f64 / 100.0)
    } else {
        wager * (100.0 / odds.abs() as f64)
    };
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct LadderRung {
    pub threshold: f64,
    pub prob: f64,
    pub odds: i32,
    pub wager: f64,
    pub to_win: f64,
}

/// Default rung thresholds for a per-game average: just-under, the
/// average itself, then the standard over milestones.
pub fn default_thresholds(stat_per_game: f64) -> Vec<f64> {
    let mut thresholds = vec![stat_per_game - 2.0, stat_per_game];
    thresholds.extend([12.0, 13.0, 15.0, 18.0, 20.0, 25.0]);
    thresholds
}

/// Price a full ladder for a player averaging `stat_per_game`.
pub fn build_ladder(stat_per_game: f64, sigma: f64, thresholds: &[f64]) -> Vec<LadderRung> {
    let mu = stat_per_game.ln();
    let wagers = wager_ladder(thresholds.len());

    thresholds
        .iter()
        .zip(wagers)
        .map(|(&threshold, wager)| {
            let prob = prob_at_least(threshold, mu, sigma);
            let odds = american_odds(prob);
            LadderRung {
                threshold,
                prob,
                odds,
                wager,
                to_win: winnings(odds, wager),
            }
        })
        .collect()
}
