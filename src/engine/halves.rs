//! NBA half-time splits and rolling form.
//!
//! Works off quarter line scores: first-half vs second-half scoring,
//! whether the half-time leader held on, and per-team rolling win rates
//! over a recent-game window.

/// One completed game with quarter line scores, in chronological order.
/// Totals include overtime; quarters cover regulation only.
#[derive(Debug, Clone)]
pub struct QuarterScores {
    pub date: chrono::NaiveDate,
    pub home: String,
    pub away: String,
    pub home_total: u32,
    pub away_total: u32,
    pub home_quarters: [u32; 4],
    pub away_quarters: [u32; 4],
}

#[derive(Debug, Clone)]
pub struct HalfSplit {
    pub date: chrono::NaiveDate,
    pub home: String,
    pub away: String,
    pub home_first_half: u32,
    pub away_first_half: u32,
    pub home_second_half: u32,
    pub away_second_half: u32,
    /// Home margin at the break.
    pub half_margin: i32,
    /// Final home margin, overtime included.
    pub final_margin: i32,
    /// Did the half-time leader win? `None` when tied at the break.
    pub leader_held: Option<bool>,
}

pub fn half_splits(games: &[QuarterScores]) -> Vec<HalfSplit> {
    games
        .iter()
        .map(|g| {
            let home_first_half = g.home_quarters[0] + g.home_quarters[1];
            let away_first_half = g.away_quarters[0] + g.away_quarters[1];
            let home_second_half = g.home_quarters[2] + g.home_quarters[3];
            let away_second_half = g.away_quarters[2] + g.away_quarters[3];
            let half_margin = home_first_half as i32 - away_first_half as i32;
            let final_margin = g.home_total as i32 - g.away_total as i32;

            let leader_held = if half_margin == 0 {
                None
            } else {
                Some(half_margin.signum() == final_margin.signum())
            };

            HalfSplit {
                date: g.date,
                home: g.home.clone(),
                away: g.away.clone(),
                home_first_half,
                away_first_half,
                home_second_half,
                away_second_half,
                half_margin,
                final_margin,
                leader_held,
            }
        })
        .collect()
}

/// Share of half-time leaders that went on to win, over games with a
/// leader at the break.
pub fn leader_hold_rate(splits: &[HalfSplit]) -> Option<f64> {
    let decided: Vec<bool> = splits.iter().filter_map(|s| s.leader_held).collect();
    if decided.is_empty() {
        return None;
    }
    Some(decided.iter().filter(|&&held| held).count() as f64 / decided.len() as f64)
}

/// Rolling win rate for one team across its games in chronological
/// order. Entry `i` averages the most recent `window` results through
/// game `i` (or all games played when fewer).
pub fn rolling_win_rate(games: &[QuarterScores], team: &str, window: usize) -> Vec<f64> {
    let results: Vec<f64> = games
        .iter()
        .filter_map(|g| {
            if g.home == team {
                Some(f64::from(u8::from(g.home_total > g.away_total)))
            } else if g.away == team {
                Some(f64::from(u8::from(g.away_total > g.home_total)))
            } else {
                None
            }
        })
        .collect();

    results
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window.max(1));
            let slice = &results[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Current rolling rate for every team in the sample, best first.
pub fn latest_win_rates(games: &[QuarterScores], window: usize) -> Vec<(String, f64, usize)> {
    let mut teams: Vec<String> = games
        .iter()
        .flat_map(|g| [g.home.clone(), g.away.clone()])
        .collect();
    teams.sort();
    teams.dedup();

    let mut rates: Vec<(String, f64, usize)> = teams
        .into_iter()
        .filter_map(|team| {
            let series = rolling_win_rate(games, &team, window);
            series.last().map(|&rate| (team, rate, series.len()))
        })
        .collect();
    rates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    rates
}
