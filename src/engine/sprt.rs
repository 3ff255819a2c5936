//! Sequential Probability Ratio Test (SPRT) slump detector.
//!
//! Classifies an ordered sequence of at-bat outcomes (1 = hit, 0 = out)
//! as more consistent with a "low" (`p0`) or "high" (`p1`) true batting
//! average, accumulating a log-likelihood ratio against Wald's decision
//! bounds. The decision is evaluated once over the final cumulative
//! value; the per-step trace is kept for charting.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SprtError {
    #[error("invalid hypothesis pair: require 0 < p0 < p1 < 1, got p0={p0}, p1={p1}")]
    InvalidHypothesis { p0: f64, p1: f64 },
    #[error("invalid error rate: alpha and beta must be in (0, 1), got alpha={alpha}, beta={beta}")]
    InvalidErrorRate { alpha: f64, beta: f64 },
}

/// Hypothesis pair and error budget for one test run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SprtParams {
    /// Null hypothesis batting average.
    pub p0: f64,
    /// Alternative hypothesis batting average.
    pub p1: f64,
    /// Type I error rate (accepting H1 when H0 is true).
    pub alpha: f64,
    /// Type II error rate (accepting H0 when H1 is true).
    pub beta: f64,
}

impl SprtParams {
    /// Reject parameter sets the log terms are undefined for.
    ///
    /// Probabilities exactly 0 or 1 and error rates at the interval
    /// edges (where a threshold goes infinite) all fail here instead of
    /// leaking inf/NaN into the trace.
    pub fn validate(&self) -> Result<(), SprtError> {
        if !(self.p0 > 0.0 && self.p0 < 1.0 && self.p1 > 0.0 && self.p1 < 1.0 && self.p1 > self.p0)
        {
            return Err(SprtError::InvalidHypothesis {
                p0: self.p0,
                p1: self.p1,
            });
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0 && self.beta > 0.0 && self.beta < 1.0) {
            return Err(SprtError::InvalidErrorRate {
                alpha: self.alpha,
                beta: self.beta,
            });
        }
        Ok(())
    }

    /// Wald's decision bounds in log space: `(ln_b, ln_a)`.
    ///
    /// `ln_a = ln((1-beta)/alpha)` - accept H1 at or above.
    /// `ln_b = ln(beta/(1-alpha))` - accept H0 at or below.
    /// `ln_b < ln_a` strictly for any valid parameters.
    pub fn bounds(&self) -> (f64, f64) {
        let ln_a = ((1.0 - self.beta) / self.alpha).ln();
        let ln_b = (self.beta / (1.0 - self.alpha)).ln();
        (ln_b, ln_a)
    }

    /// Per-observation LLR increments: `(on_hit, on_out)`.
    ///
    /// A hit adds `ln(p1/p0)`; an out adds `ln((1-p1)/(1-p0))`. Both are
    /// constants for a run.
    pub fn increments(&self) -> (f64, f64) {
        let on_hit = (self.p1 / self.p0).ln();
        let on_out = ((1.0 - self.p1) / (1.0 - self.p0)).ln();
        (on_hit, on_out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprtDecision {
    /// Evidence favors the `p0` hitter.
    AcceptH0,
    /// Evidence favors the `p1` hitter.
    AcceptH1,
    /// Neither bound reached; more at-bats required.
    Continue,
}

impl std::fmt::Display for SprtDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SprtDecision::AcceptH0 => write!(f, "Accept H0"),
            SprtDecision::AcceptH1 => write!(f, "Accept H1"),
            SprtDecision::Continue => write!(f, "Continue"),
        }
    }
}

/// Result of one SPRT run.
#[derive(Debug, Clone, PartialEq)]
pub struct SprtOutcome {
    pub decision: SprtDecision,
    pub final_llr: f64,
    /// Cumulative LLR after each observation; same length as the input.
    pub trace: Vec<f64>,
    /// 1-based at-bat number where the trace first touched either bound.
    ///
    /// Informational only: the decision above is evaluated over the final
    /// cumulative value, so a trace that crosses a bound and drifts back
    /// still ends `Continue`.
    pub first_crossing: Option<usize>,
    /// Upper bound `ln((1-beta)/alpha)`, kept for charting.
    pub ln_a: f64,
    /// Lower bound `ln(beta/(1-alpha))`, kept for charting.
    pub ln_b: f64,
}

/// Run the test over a full outcome sequence.
///
/// `sequence` entries: 1 is a hit, any other value is an out (walks and
/// other non-at-bats are excluded upstream, see [`crate::engine::classify`]).
/// An empty sequence is valid and yields `Continue` with LLR 0.
pub fn run(sequence: &[u8], params: &SprtParams) -> Result<SprtOutcome, SprtError> {
    params.validate()?;

    let (ln_b, ln_a) = params.bounds();
    let (on_hit, on_out) = params.increments();

    let mut llr = 0.0_f64;
    let mut trace = Vec::with_capacity(sequence.len());
    let mut first_crossing = None;

    for (i, &ab) in sequence.iter().enumerate() {
        llr += if ab == 1 { on_hit } else { on_out };
        trace.push(llr);
        if first_crossing.is_none() && (llr >= ln_a || llr <= ln_b) {
            first_crossing = Some(i + 1);
        }
    }

    let decision = if llr >= ln_a {
        SprtDecision::AcceptH1
    } else if llr <= ln_b {
        SprtDecision::AcceptH0
    } else {
        SprtDecision::Continue
    };

    Ok(SprtOutcome {
        decision,
        final_llr: llr,
        trace,
        first_crossing,
        ln_a,
        ln_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params() -> SprtParams {
        SprtParams {
            p0: 0.300,
            p1: 0.330,
            alpha: 0.01,
            beta: 0.10,
        }
    }

    #[test]
    fn test_bounds_ordering_holds_for_valid_params() {
        let cases = [
            (0.01, 0.10),
            (0.05, 0.05),
            (0.10, 0.20),
            (0.49, 0.49),
            (0.90, 0.05),
            (0.05, 0.90),
        ];
        for (alpha, beta) in cases {
            let params = SprtParams {
                p0: 0.3,
                p1: 0.4,
                alpha,
                beta,
            };
            params.validate().unwrap();
            let (ln_b, ln_a) = params.bounds();
            assert!(
                ln_b < ln_a,
                "ln_b must be strictly below ln_a: alpha={alpha}, beta={beta}, ln_b={ln_b}, ln_a={ln_a}"
            );
        }
    }

    #[test]
    fn test_default_param_bounds_and_increments() {
        let params = default_params();
        let (ln_b, ln_a) = params.bounds();
        assert!((ln_a - 4.4998).abs() < 1e-3, "got ln_a={ln_a}");
        assert!((ln_b - -2.2925).abs() < 1e-3, "got ln_b={ln_b}");
        let (on_hit, on_out) = params.increments();
        assert!((on_hit - 0.09531).abs() < 1e-4, "got on_hit={on_hit}");
        assert!((on_out - -0.04380).abs() < 1e-4, "got on_out={on_out}");
    }

    #[test]
    fn test_empty_sequence_continues_at_zero() {
        let outcome = run(&[], &default_params()).unwrap();
        assert_eq!(outcome.decision, SprtDecision::Continue);
        assert_eq!(outcome.final_llr, 0.0);
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.first_crossing, None);
    }

    #[test]
    fn test_twenty_straight_hits_still_inconclusive() {
        // 20 * ln(0.330/0.300) ~= 1.906, between the bounds.
        let outcome = run(&[1; 20], &default_params()).unwrap();
        assert_eq!(outcome.decision, SprtDecision::Continue);
        assert!(
            (outcome.final_llr - 1.906).abs() < 1e-3,
            "got {}",
            outcome.final_llr
        );
    }

    #[test]
    fn test_sixty_straight_hits_accepts_h1() {
        // 60 * 0.09531 ~= 5.72 >= ln(90) ~= 4.4998.
        let outcome = run(&[1; 60], &default_params()).unwrap();
        assert_eq!(outcome.decision, SprtDecision::AcceptH1);
        assert!(
            (outcome.final_llr - 5.719).abs() < 1e-2,
            "got {}",
            outcome.final_llr
        );
    }

    #[test]
    fn test_long_hitless_stretch_accepts_h0() {
        // Each out contributes ~-0.0438; the lower bound sits at ~-2.2925,
        // so ~53 straight outs cross it.
        let outcome = run(&[0; 60], &default_params()).unwrap();
        assert_eq!(outcome.decision, SprtDecision::AcceptH0);
        assert!(outcome.final_llr <= outcome.ln_b);
    }

    #[test]
    fn test_trace_is_prefix_sum_of_increments() {
        let params = default_params();
        let sequence = [1, 0, 0, 1, 1, 0, 1, 0, 0, 0];
        let outcome = run(&sequence, &params).unwrap();
        assert_eq!(outcome.trace.len(), sequence.len());

        let (on_hit, on_out) = params.increments();
        let mut expect = 0.0;
        for (i, &ab) in sequence.iter().enumerate() {
            expect += if ab == 1 { on_hit } else { on_out };
            assert_eq!(outcome.trace[i], expect, "mismatch at step {}", i + 1);
        }
        assert_eq!(outcome.final_llr, *outcome.trace.last().unwrap());
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let params = default_params();
        let sequence: Vec<u8> = (0..200).map(|i| u8::from(i % 3 == 0)).collect();
        let a = run(&sequence, &params).unwrap();
        let b = run(&sequence, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nonbinary_values_count_as_outs() {
        // The source treats anything that is not exactly 1 as an out.
        let params = default_params();
        let with_twos = run(&[2, 3, 0], &params).unwrap();
        let all_outs = run(&[0, 0, 0], &params).unwrap();
        assert_eq!(with_twos.trace, all_outs.trace);
    }

    #[test]
    fn test_reversed_hypotheses_rejected() {
        let params = SprtParams {
            p0: 0.33,
            p1: 0.30,
            alpha: 0.01,
            beta: 0.10,
        };
        let err = run(&[1, 0, 1], &params).unwrap_err();
        assert!(matches!(err, SprtError::InvalidHypothesis { .. }), "got {err:?}");
    }

    #[test]
    fn test_equal_hypotheses_rejected() {
        let params = SprtParams {
            p0: 0.3,
            p1: 0.3,
            alpha: 0.01,
            beta: 0.10,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_probabilities_at_interval_edges_rejected() {
        for (p0, p1) in [(0.0, 0.3), (0.3, 1.0), (-0.1, 0.3), (0.3, 1.1)] {
            let params = SprtParams {
                p0,
                p1,
                alpha: 0.01,
                beta: 0.10,
            };
            let err = params.validate().unwrap_err();
            assert!(
                matches!(err, SprtError::InvalidHypothesis { .. }),
                "p0={p0}, p1={p1}: got {err:?}"
            );
        }
    }

    #[test]
    fn test_error_rates_at_interval_edges_rejected() {
        for (alpha, beta) in [(0.0, 0.1), (1.0, 0.1), (0.01, 0.0), (0.01, 1.0)] {
            let params = SprtParams {
                p0: 0.3,
                p1: 0.4,
                alpha,
                beta,
            };
            let err = params.validate().unwrap_err();
            assert!(
                matches!(err, SprtError::InvalidErrorRate { .. }),
                "alpha={alpha}, beta={beta}: got {err:?}"
            );
        }
    }

    #[test]
    fn test_first_crossing_does_not_change_decision() {
        // Wide error budget pulls the upper bound down to ln(0.7/0.3) ~= 0.847,
        // so a single hit with a big p1/p0 ratio crosses it immediately. A run
        // of outs then drags the final value back between the bounds: the
        // decision stays Continue while first_crossing records the touch.
        let params = SprtParams {
            p0: 0.2,
            p1: 0.8,
            alpha: 0.3,
            beta: 0.3,
        };
        let outcome = run(&[1, 0], &params).unwrap();
        assert_eq!(outcome.first_crossing, Some(1));
        assert_eq!(outcome.decision, SprtDecision::Continue);
        assert!(outcome.final_llr < outcome.ln_a && outcome.final_llr > outcome.ln_b);
    }

    #[test]
    fn test_first_crossing_matches_terminal_decision_when_monotone() {
        let outcome = run(&[1; 60], &default_params()).unwrap();
        // 4.4998 / 0.09531 ~= 47.2 -> crossing on at-bat 48.
        assert_eq!(outcome.first_crossing, Some(48));
        assert_eq!(outcome.decision, SprtDecision::AcceptH1);
    }
}
