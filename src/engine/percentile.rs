//! League-wide percentile ranking (average-rank method).
//!
//! Each value's rank is the average of its 1-based positions among
//! equals, scaled to 0-100 and rounded to whole numbers. Columns where
//! lower is better are reversed so 100 always reads "good".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherBetter,
    /// Reversed columns (BB%, Ball%, P/PA): a low raw value ranks high.
    LowerBetter,
}

/// Average 1-based ranks, ties sharing the mean of their positions.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j (0-based) share the average of ranks i+1..=j+1.
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

/// Percentile (0-100, whole numbers) for every value in the slice.
///
/// Fewer than two values has no meaningful rank spread; every entry
/// gets 50.
pub fn percentile_ranks(values: &[f64], direction: Direction) -> Vec<u8> {
    let n = values.len();
    if n < 2 {
        return vec![50; n];
    }
    let denom = (n - 1) as f64;
    average_ranks(values)
        .into_iter()
        .map(|rank| {
            let frac = (rank - 1.0) / denom;
            let pct = match direction {
                Direction::HigherBetter => frac * 100.0,
                Direction::LowerBetter => (1.0 - frac) * 100.0,
            };
            pct.round() as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_values_span_full_scale() {
        let pcts = percentile_ranks(&[1.0, 2.0, 3.0, 4.0, 5.0], Direction::HigherBetter);
        assert_eq!(pcts, vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn test_reversed_direction() {
        let pcts = percentile_ranks(&[1.0, 2.0, 3.0, 4.0, 5.0], Direction::LowerBetter);
        assert_eq!(pcts, vec![100, 75, 50, 25, 0]);
    }

    #[test]
    fn test_ties_share_average_rank() {
        // Ranks: 1, (2+3)/2=2.5, 2.5, 4 -> 0, 50, 50, 100.
        let pcts = percentile_ranks(&[1.0, 2.0, 2.0, 3.0], Direction::HigherBetter);
        assert_eq!(pcts, vec![0, 50, 50, 100]);
    }

    #[test]
    fn test_all_equal_values_center() {
        let pcts = percentile_ranks(&[7.0, 7.0, 7.0], Direction::HigherBetter);
        assert_eq!(pcts, vec![50, 50, 50]);
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let pcts = percentile_ranks(&[5.0, 1.0, 3.0], Direction::HigherBetter);
        assert_eq!(pcts, vec![100, 0, 50]);
    }

    #[test]
    fn test_single_value_and_empty() {
        assert_eq!(percentile_ranks(&[42.0], Direction::HigherBetter), vec![50]);
        assert!(percentile_ranks(&[], Direction::HigherBetter).is_empty());
    }
}
