//! Synthetic data for `--simulate` runs.
//!
//! Generates plausible stand-ins for every feed so the dashboard works
//! offline: an at-bat log drawn from a true batting average, league
//! stat pools, a day of probable starters, a season of spreads, and an
//! NBA scoreboard.

use crate::engine::classify::PlateAppearanceRow;
use crate::engine::props::{PitcherLine, ProbableStart, TeamBattingLine};
use crate::engine::runs_pool::TeamRunsAllowed;
use crate::engine::systems::GameOdds;
use crate::feed::espn::{GameStatus, ScoreboardGame};
use crate::feed::ScoreboardFeed;
use crate::teams;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// At-bat event log for a batter whose true average is `true_avg`.
pub fn event_log(seed: u64, true_avg: f64, at_bats: u32) -> Vec<PlateAppearanceRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(at_bats as usize);
    for i in 0..at_bats {
        let event = if rng.gen_bool(true_avg) {
            match rng.gen_range(0..4) {
                0 => "home_run",
                1 => "double",
                _ => "single",
            }
        } else {
            match rng.gen_range(0..3) {
                0 => "strikeout",
                1 => "grounded_into_double_play",
                _ => "field_out",
            }
        };
        rows.push(PlateAppearanceRow {
            game_pk: 900_000 + u64::from(i / 4),
            at_bat_number: i % 4 + 1,
            event: event.to_string(),
        });
    }
    rows
}

/// Two starters per club with rates spread across the league range.
pub fn pitcher_pool(seed: u64) -> Vec<PitcherLine> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut lines = Vec::new();
    for team in teams::MLB_TEAMS {
        for slot in 1..=2 {
            lines.push(PitcherLine {
                name: format!("{team} SP{slot}"),
                k_pct: rng.gen_range(0.12..0.36),
                bb_pct: rng.gen_range(0.04..0.14),
                strike_pct: rng.gen_range(0.58..0.70),
                ball_pct: rng.gen_range(0.30..0.42),
                outs_per_game: rng.gen_range(12.0..19.5),
                pitches_per_pa: rng.gen_range(3.4..4.3),
                hr_per_nine: rng.gen_range(0.5..2.3),
            });
        }
    }
    lines
}

pub fn team_batting_pool(seed: u64) -> Vec<TeamBattingLine> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
    teams::MLB_TEAMS
        .iter()
        .map(|&team| TeamBattingLine {
            team: team.to_string(),
            k_pct: rng.gen_range(0.17..0.27),
            bb_pct: rng.gen_range(0.06..0.11),
            hr_pct: rng.gen_range(0.02..0.05),
        })
        .collect()
}

/// Pair the league off into 15 games, each club's SP1 starting.
pub fn probable_starts(seed: u64) -> Vec<ProbableStart> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(3));
    let mut order: Vec<&str> = teams::MLB_TEAMS.to_vec();
    // Fisher-Yates so matchups vary by seed.
    for i in (1..order.len()).rev() {
        order.swap(i, rng.gen_range(0..=i));
    }

    let mut starts = Vec::new();
    for pair in order.chunks(2) {
        let [home, away] = [pair[0], pair[1]];
        starts.push(ProbableStart {
            pitcher: format!("{home} SP1"),
            team: home.to_string(),
            opponent: away.to_string(),
        });
        starts.push(ProbableStart {
            pitcher: format!("{away} SP1"),
            team: away.to_string(),
            opponent: home.to_string(),
        });
    }
    starts
}

/// A season's worth of NBA games with closing lines.
pub fn game_odds(seed: u64, games: usize) -> Vec<GameOdds> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(4));
    let clubs = ["BOS", "NYK", "MIA", "CLE", "MIL", "DEN", "LAL", "PHX", "OKC", "DAL"];
    let start = chrono::NaiveDate::from_ymd_opt(2025, 10, 21).unwrap();

    (0..games)
        .map(|i| {
            let home = clubs[rng.gen_range(0..clubs.len())];
            let mut away = clubs[rng.gen_range(0..clubs.len())];
            while away == home {
                away = clubs[rng.gen_range(0..clubs.len())];
            }
            GameOdds {
                date: start + chrono::Days::new(i as u64 / 5),
                home: home.to_string(),
                away: away.to_string(),
                home_score: rng.gen_range(92..132),
                away_score: rng.gen_range(92..132),
                // Half-point lines in the usual NBA range.
                home_spread: f64::from(rng.gen_range(-24..=24)) / 2.0,
                total: f64::from(rng.gen_range(420..470)) / 2.0,
            }
        })
        .collect()
}

pub fn runs_allowed(seed: u64, games_per_team: u32) -> Vec<TeamRunsAllowed> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(5));
    let mut rows = Vec::new();
    for team in teams::MLB_TEAMS {
        for _ in 0..games_per_team {
            // Skewed low like real run-scoring.
            let runs = match rng.gen_range(0..10) {
                0 => rng.gen_range(9..16),
                1 | 2 => rng.gen_range(6..9),
                _ => rng.gen_range(0..6),
            };
            rows.push(TeamRunsAllowed {
                team: team.to_string(),
                runs_allowed: runs,
            });
        }
    }
    rows
}

/// Scoreboard provider that fabricates a finished slate per date.
pub struct SimScoreboard {
    seed: u64,
}

impl SimScoreboard {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl ScoreboardFeed for SimScoreboard {
    async fn fetch_scoreboard(&self, date: chrono::NaiveDate) -> Result<Vec<ScoreboardGame>> {
        // Per-date stream so every refresh of the same day agrees.
        let mut rng = StdRng::seed_from_u64(self.seed ^ date.num_days_from_ce() as u64);
        let slate = [
            ("Boston Celtics", "BOS", "New York Knicks", "NYK"),
            ("Denver Nuggets", "DEN", "Los Angeles Lakers", "LAL"),
            ("Oklahoma City Thunder", "OKC", "Dallas Mavericks", "DAL"),
            ("Milwaukee Bucks", "MIL", "Miami Heat", "MIA"),
        ];

        let games = slate
            .iter()
            .map(|&(home_team, home_abbr, away_team, away_abbr)| {
                let home_quarters: [u32; 4] = std::array::from_fn(|_| rng.gen_range(20..36));
                let away_quarters: [u32; 4] = std::array::from_fn(|_| rng.gen_range(20..36));
                ScoreboardGame {
                    date,
                    home_team: home_team.to_string(),
                    home_abbr: home_abbr.to_string(),
                    away_team: away_team.to_string(),
                    away_abbr: away_abbr.to_string(),
                    home_score: home_quarters.iter().sum(),
                    away_score: away_quarters.iter().sum(),
                    home_quarters: Some(home_quarters),
                    away_quarters: Some(away_quarters),
                    status: GameStatus::Finished,
                }
            })
            .collect();
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::build_sequence;

    #[test]
    fn test_event_log_deterministic_per_seed() {
        let a = build_sequence(&event_log(7, 0.300, 100));
        let b = build_sequence(&event_log(7, 0.300, 100));
        assert_eq!(a, b);
        assert_eq!(a.len(), 100, "every sim row is a pitch-result event");
    }

    #[test]
    fn test_event_log_tracks_true_average() {
        let seq = build_sequence(&event_log(11, 0.900, 200));
        let hits: usize = seq.iter().map(|&x| x as usize).sum();
        assert!(hits > 150, "got {hits}/200 hits at a .900 true average");
    }

    #[test]
    fn test_probable_starts_cover_league() {
        let starts = probable_starts(3);
        assert_eq!(starts.len(), 30);
        // Every start's pitcher exists in the pitcher pool.
        let pool = pitcher_pool(3);
        for start in &starts {
            assert!(
                pool.iter().any(|p| p.name == start.pitcher),
                "missing {}",
                start.pitcher
            );
        }
    }

    #[test]
    fn test_game_odds_spreads_are_half_points() {
        for game in game_odds(5, 50) {
            assert_eq!((game.home_spread * 2.0).fract(), 0.0);
            assert_ne!(game.home, game.away);
        }
    }

    #[tokio::test]
    async fn test_sim_scoreboard_stable_for_date() {
        let feed = SimScoreboard::new(9);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        let a = feed.fetch_scoreboard(date).await.unwrap();
        let b = feed.fetch_scoreboard(date).await.unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(a[0].home_score, b[0].home_score);
    }
}
