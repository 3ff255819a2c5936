//! Daily pitcher prop guides.
//!
//! Joins today's probable starters with league percentile tables and
//! filters each market (strikeouts, walks, outs, home runs) into
//! OVER/UNDER candidates.

use super::percentile::{percentile_ranks, Direction};

/// Season rate line for one qualified pitcher.
#[derive(Debug, Clone)]
pub struct PitcherLine {
    pub name: String,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub strike_pct: f64,
    pub ball_pct: f64,
    pub outs_per_game: f64,
    pub pitches_per_pa: f64,
    pub hr_per_nine: f64,
}

/// Season batting line for one team (opponent side of the join).
#[derive(Debug, Clone)]
pub struct TeamBattingLine {
    /// Team abbreviation.
    pub team: String,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub hr_pct: f64,
}

/// A probable starter for today, teams as abbreviations.
#[derive(Debug, Clone)]
pub struct ProbableStart {
    pub pitcher: String,
    pub team: String,
    pub opponent: String,
}

/// Pitcher percentile columns (0-100). BB%, Ball%, and P/PA are
/// reversed so high always means favorable; HR/9 stays raw.
#[derive(Debug, Clone)]
pub struct PitcherPercentiles {
    pub name: String,
    pub k_pct: u8,
    pub bb_pct: u8,
    pub strike_pct: u8,
    pub ball_pct: u8,
    pub outs_per_game: u8,
    pub pitches_per_pa: u8,
    pub hr_per_nine: f64,
}

#[derive(Debug, Clone)]
pub struct TeamPercentiles {
    pub team: String,
    pub k_pct: u8,
    pub bb_pct: u8,
    pub hr_pct: u8,
}

/// One joined row of the daily board: starter percentiles plus the
/// opposing lineup's percentiles.
#[derive(Debug, Clone)]
pub struct DailyRow {
    pub pitcher: String,
    pub team: String,
    pub opponent: String,
    pub k_pct: u8,
    pub bb_pct: u8,
    pub strike_pct: u8,
    pub ball_pct: u8,
    pub outs_per_game: u8,
    pub pitches_per_pa: u8,
    pub hr_per_nine: f64,
    pub opp_k_pct: u8,
    pub opp_bb_pct: u8,
    pub opp_hr_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bet {
    Over,
    Under,
}

impl std::fmt::Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bet::Over => write!(f, "OVER"),
            Bet::Under => write!(f, "UNDER"),
        }
    }
}

/// One filtered guide row; `metrics` holds the three displayed
/// percentile columns for the guide it came from.
#[derive(Debug, Clone)]
pub struct GuideRow {
    pub pitcher: String,
    pub opponent: String,
    pub metrics: [u8; 3],
    pub bet: Bet,
}

/// Home-run target row (raw HR/9 plus opponent power percentile).
#[derive(Debug, Clone)]
pub struct HrTargetRow {
    pub pitcher: String,
    pub opponent: String,
    pub hr_per_nine: f64,
    pub opp_hr_pct: u8,
}

pub fn pitcher_percentiles(lines: &[PitcherLine]) -> Vec<PitcherPercentiles> {
    let col = |f: fn(&PitcherLine) -> f64| -> Vec<f64> { lines.iter().map(f).collect() };

    let k = percentile_ranks(&col(|l| l.k_pct), Direction::HigherBetter);
    let bb = percentile_ranks(&col(|l| l.bb_pct), Direction::LowerBetter);
    let strike = percentile_ranks(&col(|l| l.strike_pct), Direction::HigherBetter);
    let ball = percentile_ranks(&col(|l| l.ball_pct), Direction::LowerBetter);
    let outs = percentile_ranks(&col(|l| l.outs_per_game), Direction::HigherBetter);
    let ppa = percentile_ranks(&col(|l| l.pitches_per_pa), Direction::LowerBetter);

    lines
        .iter()
        .enumerate()
        .map(|(i, l)| PitcherPercentiles {
            name: l.name.clone(),
            k_pct: k[i],
            bb_pct: bb[i],
            strike_pct: strike[i],
            ball_pct: ball[i],
            outs_per_game: outs[i],
            pitches_per_pa: ppa[i],
            hr_per_nine: l.hr_per_nine,
        })
        .collect()
}

pub fn team_percentiles(lines: &[TeamBattingLine]) -> Vec<TeamPercentiles> {
    let col = |f: fn(&TeamBattingLine) -> f64| -> Vec<f64> { lines.iter().map(f).collect() };

    let k = percentile_ranks(&col(|l| l.k_pct), Direction::HigherBetter);
    let bb = percentile_ranks(&col(|l| l.bb_pct), Direction::HigherBetter);
    let hr = percentile_ranks(&col(|l| l.hr_pct), Direction::HigherBetter);

    lines
        .iter()
        .enumerate()
        .map(|(i, l)| TeamPercentiles {
            team: l.team.clone(),
            k_pct: k[i],
            bb_pct: bb[i],
            hr_pct: hr[i],
        })
        .collect()
}

/// Join probable starters against both percentile tables. Rows missing
/// either side of the join are dropped, matching how the original board
/// drops unmatched pitchers.
pub fn daily_board(
    starts: &[ProbableStart],
    pitchers: &[PitcherPercentiles],
    teams: &[TeamPercentiles],
) -> Vec<DailyRow> {
    starts
        .iter()
        .filter_map(|start| {
            let p = pitchers.iter().find(|p| p.name == start.pitcher)?;
            let t = teams.iter().find(|t| t.team == start.opponent)?;
            Some(DailyRow {
                pitcher: start.pitcher.clone(),
                team: start.team.clone(),
                opponent: start.opponent.clone(),
                k_pct: p.k_pct,
                bb_pct: p.bb_pct,
                strike_pct: p.strike_pct,
                ball_pct: p.ball_pct,
                outs_per_game: p.outs_per_game,
                pitches_per_pa: p.pitches_per_pa,
                hr_per_nine: p.hr_per_nine,
                opp_k_pct: t.k_pct,
                opp_bb_pct: t.bb_pct,
                opp_hr_pct: t.hr_pct,
            })
        })
        .collect()
}

/// Strikeout guide: dominant pitcher vs whiff-prone lineup -> OVER;
/// the mirror image -> UNDER. Overs first, both sorted best-first.
pub fn strikeouts_guide(board: &[DailyRow]) -> Vec<GuideRow> {
    let mut overs: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.k_pct >= 50 && r.strike_pct >= 50 && r.opp_k_pct >= 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.k_pct, r.strike_pct, r.opp_k_pct],
            bet: Bet::Over,
        })
        .collect();
    overs.sort_by(|a, b| b.metrics.cmp(&a.metrics));

    let mut unders: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.k_pct < 50 && r.strike_pct < 50 && r.opp_k_pct < 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.k_pct, r.strike_pct, r.opp_k_pct],
            bet: Bet::Under,
        })
        .collect();
    unders.sort_by(|a, b| b.metrics.cmp(&a.metrics));

    overs.extend(unders);
    overs
}

/// Walk guide. Percentile columns are already reversed (high = few
/// walks issued), so OVER wants a wild pitcher: low reversed BB%/Ball%
/// against a patient lineup.
pub fn walks_guide(board: &[DailyRow]) -> Vec<GuideRow> {
    let mut overs: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.bb_pct <= 50 && r.ball_pct <= 75 && r.opp_bb_pct >= 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.bb_pct, r.ball_pct, r.opp_bb_pct],
            bet: Bet::Over,
        })
        .collect();
    overs.sort_by(|a, b| a.metrics.cmp(&b.metrics));

    let mut unders: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.bb_pct > 50 && r.ball_pct > 75 && r.opp_bb_pct < 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.bb_pct, r.ball_pct, r.opp_bb_pct],
            bet: Bet::Under,
        })
        .collect();
    unders.sort_by(|a, b| a.metrics.cmp(&b.metrics));

    overs.extend(unders);
    overs
}

/// Outs guide: workhorse starters against free-swinging lineups.
pub fn outs_guide(board: &[DailyRow]) -> Vec<GuideRow> {
    let mut overs: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.outs_per_game >= 75 && r.pitches_per_pa >= 50 && r.opp_k_pct >= 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.outs_per_game, r.pitches_per_pa, r.opp_k_pct],
            bet: Bet::Over,
        })
        .collect();
    overs.sort_by(|a, b| b.metrics.cmp(&a.metrics));

    let mut unders: Vec<GuideRow> = board
        .iter()
        .filter(|r| r.outs_per_game <= 67 && r.pitches_per_pa < 50 && r.opp_k_pct < 50)
        .map(|r| GuideRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            metrics: [r.outs_per_game, r.pitches_per_pa, r.opp_k_pct],
            bet: Bet::Under,
        })
        .collect();
    unders.sort_by(|a, b| b.metrics.cmp(&a.metrics));

    overs.extend(unders);
    overs
}

/// Home-run-prone starters facing power lineups, sorted worst-first.
pub fn hr_targets(board: &[DailyRow]) -> Vec<HrTargetRow> {
    let mut rows: Vec<HrTargetRow> = board
        .iter()
        .filter(|r| r.hr_per_nine >= 1.8 && r.opp_hr_pct >= 50)
        .map(|r| HrTargetRow {
            pitcher: r.pitcher.clone(),
            opponent: r.opponent.clone(),
            hr_per_nine: r.hr_per_nine,
            opp_hr_pct: r.opp_hr_pct,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.hr_per_nine
            .partial_cmp(&a.hr_per_nine)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
