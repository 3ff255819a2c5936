//! Reverse Run-Your-Pool: runs-allowed distribution per team.
//!
//! Tracks how many times each MLB team has given up each run total from
//! 0 to 13 this season. The pool is won by the first team to hit every
//! total at least once, so the table reports distinct totals reached
//! ("matches") alongside the full distribution.

use crate::teams;

/// One completed game from a team's perspective.
#[derive(Debug, Clone)]
pub struct TeamRunsAllowed {
    /// Team abbreviation.
    pub team: String,
    pub runs_allowed: u32,
}

/// Runs-allowed buckets run 0..=13; higher totals still count as games
/// played but land in no bucket.
pub const MAX_TRACKED_RUNS: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunsPoolRow {
    pub team: String,
    pub buckets: [u32; MAX_TRACKED_RUNS + 1],
    /// Distinct 0-13 totals hit at least once.
    pub matches: u32,
    /// Total completed games, including blowouts above 13.
    pub games: u32,
}

/// Build the full 30-team table, every team present even with no games
/// yet, sorted by matches descending (ties broken by abbreviation).
pub fn runs_pool_table(games: &[TeamRunsAllowed]) -> Vec<RunsPoolRow> {
    let mut rows: Vec<RunsPoolRow> = teams::MLB_TEAMS
        .iter()
        .map(|&team| RunsPoolRow {
            team: team.to_string(),
            buckets: [0; MAX_TRACKED_RUNS + 1],
            matches: 0,
            games: 0,
        })
        .collect();

    for game in games {
        let Some(row) = rows.iter_mut().find(|r| r.team == game.team) else {
            continue;
        };
        row.games += 1;
        if game.runs_allowed as usize <= MAX_TRACKED_RUNS {
            row.buckets[game.runs_allowed as usize] += 1;
        }
    }

    for row in &mut rows {
        row.matches = row.buckets.iter().filter(|&&c| c > 0).count() as u32;
    }

    rows.sort_by(|a, b| b.matches.cmp(&a.matches).then(a.team.cmp(&b.team)));
    rows
}
