//! Historical betting-system tallies.
//!
//! For each completed game with a closing spread and total, derives
//! cover/outright flags for the favorite and the underdog, maps flag
//! combinations to result labels, and counts label frequencies over a
//! spread-filtered population.

use std::collections::HashMap;

/// One completed game joined with its closing line.
/// `home_spread` follows sportsbook convention: negative = home favored.
#[derive(Debug, Clone)]
pub struct GameOdds {
    pub date: chrono::NaiveDate,
    pub home: String,
    pub away: String,
    pub home_score: i32,
    pub away_score: i32,
    pub home_spread: f64,
    pub total: f64,
}

impl GameOdds {
    pub fn score_diff(&self) -> i32 {
        self.home_score - self.away_score
    }
}

/// Per-game betting flags. 1 = yes, 0 = no, -1 = pick-em (no favorite).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameFlags {
    pub favorite_covered: i8,
    pub favorite_outright: i8,
    pub underdog_covered: i8,
    pub underdog_outright: i8,
    pub total_over: u8,
}

/// Derive all flags for one game.
///
/// Boundary behavior is inherited from the source tables: a push lands
/// on the `else` branch of each comparison, which is why `[0,1,0,0]`
/// exists as its own label downstream.
pub fn game_flags(game: &GameOdds) -> GameFlags {
    let spread = game.home_spread;
    // A home favorite of -1 must win by more than 1, so comparisons run
    // against the sign-flipped spread.
    let corrected = -spread;
    let diff = game.score_diff() as f64;

    let favorite_covered = if spread > 0.0 {
        if diff > corrected {
            0
        } else {
            1
        }
    } else if spread < 0.0 {
        if diff > corrected {
            1
        } else {
            0
        }
    } else {
        -1
    };

    let favorite_outright = if spread > 0.0 {
        if diff < 0.0 {
            1
        } else {
            0
        }
    } else if spread < 0.0 {
        if diff < 0.0 {
            0
        } else {
            1
        }
    } else {
        -1
    };

    let underdog_covered = if spread < 0.0 {
        if diff < corrected {
            1
        } else {
            0
        }
    } else if spread > 0.0 {
        if diff > corrected {
            1
        } else {
            0
        }
    } else {
        -1
    };

    let underdog_outright = if spread < 0.0 {
        if diff < 0.0 {
            1
        } else {
            0
        }
    } else if spread > 0.0 {
        if diff > 0.0 {
            1
        } else {
            0
        }
    } else {
        -1
    };

    let total_over = u8::from((game.home_score + game.away_score) as f64 > game.total);

    GameFlags {
        favorite_covered,
        favorite_outright,
        underdog_covered,
        underdog_outright,
        total_over,
    }
}

/// Spread-magnitude filter applied to |home_spread|.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpreadFilter {
    AtMost(f64),
    Exactly(f64),
    Between(f64, f64),
}

impl SpreadFilter {
    pub fn matches(&self, spread_abs: f64) -> bool {
        match *self {
            SpreadFilter::AtMost(max) => spread_abs <= max,
            SpreadFilter::Exactly(value) => spread_abs == value,
            SpreadFilter::Between(lo, hi) => spread_abs >= lo && spread_abs <= hi,
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            SpreadFilter::AtMost(max) => format!("spreads <= {max}"),
            SpreadFilter::Exactly(value) => format!("spreads = {value}"),
            SpreadFilter::Between(lo, hi) => format!("spreads between {lo} and {hi}"),
        }
    }
}

/// Map a flag combination to its display label.
pub fn result_label(flags: &GameFlags) -> String {
    let vals = (
        flags.favorite_covered,
        flags.favorite_outright,
        flags.underdog_covered,
        flags.underdog_outright,
    );
    match vals {
        (1, 1, 0, 0) => "Favorite Covered".to_string(),
        (0, 0, 1, 1) => "Underdog Won".to_string(),
        (0, 1, 1, 0) => "Favorite Won, Dog Covered".to_string(),
        (-1, -1, -1, -1) => "Pick-Em".to_string(),
        (0, 1, 0, 0) => "Push".to_string(),
        (a, b, c, d) => format!("[{a}, {b}, {c}, {d}]"),
    }
}

/// One row of the frequency table.
#[derive(Debug, Clone)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
    /// Share of the filtered population, percent rounded to 2 decimals.
    pub pct: f64,
}

/// Tally result labels over the games that pass the spread filter.
/// Rows come back most-frequent first; total is the filtered game count.
pub fn tally(games: &[GameOdds], filter: SpreadFilter) -> (Vec<LabelCount>, usize) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for game in games {
        if !filter.matches(game.home_spread.abs()) {
            continue;
        }
        total += 1;
        let label = result_label(&game_flags(game));
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut rows: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label,
            count,
            pct: (count as f64 / total as f64 * 10_000.0).round() / 100.0,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));

    (rows, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home_score: i32, away_score: i32, home_spread: f64, total: f64) -> GameOdds {
        GameOdds {
            date: chrono::NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            home: "BOS".to_string(),
            away: "LAL".to_string(),
            home_score,
            away_score,
            home_spread,
            total,
        }
    }

    #[test]
    fn test_home_favorite_covers() {
        // Home -5, wins by 8.
        let flags = game_flags(&game(110, 102, -5.0, 220.0));
        assert_eq!(flags.favorite_covered, 1);
        assert_eq!(flags.favorite_outright, 1);
        assert_eq!(flags.underdog_covered, 0);
        assert_eq!(flags.underdog_outright, 0);
        assert_eq!(result_label(&flags), "Favorite Covered");
    }

    #[test]
    fn test_home_favorite_wins_but_dog_covers() {
        // Home -5, wins by 3.
        let flags = game_flags(&game(105, 102, -5.0, 220.0));
        assert_eq!(flags.favorite_covered, 0);
        assert_eq!(flags.favorite_outright, 1);
        assert_eq!(flags.underdog_covered, 1);
        assert_eq!(flags.underdog_outright, 0);
        assert_eq!(result_label(&flags), "Favorite Won, Dog Covered");
    }

    #[test]
    fn test_away_favorite_covers() {
        // Home +7 (away favored), home loses by 10.
        let flags = game_flags(&game(95, 105, 7.0, 210.0));
        assert_eq!(flags.favorite_covered, 1);
        assert_eq!(flags.favorite_outright, 1);
        assert_eq!(flags.underdog_covered, 0);
        assert_eq!(flags.underdog_outright, 0);
    }

    #[test]
    fn test_underdog_wins_outright() {
        // Home -6 favorite loses outright.
        let flags = game_flags(&game(100, 104, -6.0, 210.0));
        assert_eq!(flags.favorite_covered, 0);
        assert_eq!(flags.favorite_outright, 0);
        assert_eq!(flags.underdog_covered, 1);
        assert_eq!(flags.underdog_outright, 1);
        assert_eq!(result_label(&flags), "Underdog Won");
    }

    #[test]
    fn test_push_flag_combination() {
        // Home -5 wins by exactly 5: the source's comparisons put this on
        // [0, 1, 0, 0].
        let flags = game_flags(&game(105, 100, -5.0, 210.0));
        assert_eq!(
            (
                flags.favorite_covered,
                flags.favorite_outright,
                flags.underdog_covered,
                flags.underdog_outright
            ),
            (0, 1, 0, 0)
        );
        assert_eq!(result_label(&flags), "Push");
    }

    #[test]
    fn test_pick_em() {
        let flags = game_flags(&game(101, 99, 0.0, 210.0));
        assert_eq!(result_label(&flags), "Pick-Em");
    }

    #[test]
    fn test_total_over_boundary() {
        // Landing exactly on the total is not an over.
        assert_eq!(game_flags(&game(110, 100, -5.0, 210.0)).total_over, 0);
        assert_eq!(game_flags(&game(111, 100, -5.0, 210.0)).total_over, 1);
    }

    #[test]
    fn test_spread_filters() {
        assert!(SpreadFilter::AtMost(4.0).matches(4.0));
        assert!(!SpreadFilter::AtMost(4.0).matches(4.5));
        assert!(SpreadFilter::Exactly(3.0).matches(3.0));
        assert!(!SpreadFilter::Exactly(3.0).matches(3.5));
        assert!(SpreadFilter::Between(2.0, 6.0).matches(2.0));
        assert!(SpreadFilter::Between(2.0, 6.0).matches(6.0));
        assert!(!SpreadFilter::Between(2.0, 6.0).matches(6.5));
    }

    #[test]
    fn test_tally_counts_and_percentages() {
        let games = vec![
            game(110, 102, -5.0, 220.0), // favorite covered
            game(112, 100, -5.0, 220.0), // favorite covered
            game(105, 102, -5.0, 220.0), // fav won, dog covered
            game(100, 104, -12.0, 210.0), // filtered out by spread
        ];
        let (rows, total) = tally(&games, SpreadFilter::AtMost(8.0));
        assert_eq!(total, 3);
        assert_eq!(rows[0].label, "Favorite Covered");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].pct - 66.67).abs() < 0.01, "got {}", rows[0].pct);
        assert_eq!(rows[1].label, "Favorite Won, Dog Covered");
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_tally_empty_population() {
        let (rows, total) = tally(&[], SpreadFilter::AtMost(4.0));
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }
}
