use crate::engine::props::{DailyRow, GuideRow, HrTargetRow};
use crate::engine::runs_pool::RunsPoolRow;
use crate::engine::systems::{LabelCount, SpreadFilter};
use crate::engine::{ladder::LadderRung, SprtDecision, SprtOutcome, SprtParams};
use crate::feed::espn::ScoreboardGame;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Slump,
    Props,
    Systems,
    RunsPool,
    Ladder,
    NbaDaily,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Slump,
        Tab::Props,
        Tab::Systems,
        Tab::RunsPool,
        Tab::Ladder,
        Tab::NbaDaily,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Slump => "Slump Detector",
            Tab::Props => "Pitcher Props",
            Tab::Systems => "Betting Systems",
            Tab::RunsPool => "Runs Pool",
            Tab::Ladder => "Ladder",
            Tab::NbaDaily => "NBA Daily",
        }
    }

    pub fn next(&self) -> Tab {
        let i = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(i + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        let i = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(i + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which prop guide the props tab is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    Strikeouts,
    Walks,
    Outs,
    HomeRuns,
}

impl GuideKind {
    pub const ALL: [GuideKind; 4] = [
        GuideKind::Strikeouts,
        GuideKind::Walks,
        GuideKind::Outs,
        GuideKind::HomeRuns,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            GuideKind::Strikeouts => "Daily Strikeouts Guide",
            GuideKind::Walks => "Daily Walks Guide",
            GuideKind::Outs => "Daily Outs Guide",
            GuideKind::HomeRuns => "Daily HR Targets",
        }
    }

    /// Column headers for the three metric cells of this guide.
    pub fn metric_headers(&self) -> [&'static str; 3] {
        match self {
            GuideKind::Strikeouts => ["K%", "Strike%", "Opp K%"],
            GuideKind::Walks => ["BB%", "Ball%", "Opp BB%"],
            GuideKind::Outs => ["Out/G", "P/PA", "Opp K%"],
            GuideKind::HomeRuns => ["HR/9", "Opp HR%", ""],
        }
    }

    pub fn next(&self) -> GuideKind {
        let i = GuideKind::ALL.iter().position(|g| g == self).unwrap_or(0);
        GuideKind::ALL[(i + 1) % GuideKind::ALL.len()]
    }
}

/// Slump-detector page state: the operator's parameters plus the last
/// engine run over the loaded at-bat log.
#[derive(Debug, Clone)]
pub struct SlumpView {
    pub player: String,
    pub params: SprtParams,
    pub outcome: Option<SprtOutcome>,
    pub at_bats: usize,
    pub hits: usize,
}

impl SlumpView {
    /// One-line verdict, in the operator's terms.
    pub fn decision_sentence(&self) -> String {
        let Some(outcome) = &self.outcome else {
            return "No at-bat data loaded yet.".to_string();
        };
        match outcome.decision {
            SprtDecision::AcceptH1 => format!(
                "Evidence strongly supports {} being closer to a {:.3} hitter.",
                self.player, self.params.p1
            ),
            SprtDecision::AcceptH0 => format!(
                "Evidence supports {} being closer to a {:.3} hitter.",
                self.player, self.params.p0
            ),
            SprtDecision::Continue => format!("Not enough evidence yet for {}.", self.player),
        }
    }

    /// Longer explanation quoting the statistic and the bound it did or
    /// did not reach.
    pub fn explanation(&self) -> String {
        let Some(outcome) = &self.outcome else {
            return String::new();
        };
        match outcome.decision {
            SprtDecision::AcceptH1 => format!(
                "{}'s log-likelihood ratio is {:.2}, above the upper threshold {:.2}. \
                 That classifies him as a {:.3}-level hitter rather than {:.3}.",
                self.player, outcome.final_llr, outcome.ln_a, self.params.p1, self.params.p0
            ),
            SprtDecision::AcceptH0 => format!(
                "{}'s log-likelihood ratio is {:.2}, below the lower threshold {:.2}. \
                 That classifies him as a {:.3}-level hitter.",
                self.player, outcome.final_llr, outcome.ln_b, self.params.p0
            ),
            SprtDecision::Continue => format!(
                "{}'s log-likelihood ratio is {:.2}, between thresholds {:.2} and {:.2}. \
                 More at-bats are needed before a confident call.",
                self.player, outcome.final_llr, outcome.ln_b, outcome.ln_a
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub sim_mode: bool,
    pub refreshing: bool,
    pub last_refresh: Option<String>,
    pub scroll_offset: usize,

    pub slump: SlumpView,

    pub guide_kind: GuideKind,
    pub strikeouts: Vec<GuideRow>,
    pub walks: Vec<GuideRow>,
    pub outs: Vec<GuideRow>,
    pub hr_targets: Vec<HrTargetRow>,
    pub board: Vec<DailyRow>,

    pub spread_filter: SpreadFilter,
    pub system_rows: Vec<LabelCount>,
    pub system_total: usize,

    pub runs_pool: Vec<RunsPoolRow>,
    pub runs_pool_updated: Option<String>,

    pub ladder: Vec<LadderRung>,
    pub ladder_stat: f64,

    pub scoreboard: Vec<ScoreboardGame>,
    pub win_rates: Vec<(String, f64, usize)>,
    pub leader_hold_rate: Option<f64>,

    pub logs: VecDeque<LogEntry>,
}

impl AppState {
    pub fn new(player: String, params: SprtParams) -> Self {
        Self {
            tab: Tab::Slump,
            sim_mode: false,
            refreshing: false,
            last_refresh: None,
            scroll_offset: 0,
            slump: SlumpView {
                player,
                params,
                outcome: None,
                at_bats: 0,
                hits: 0,
            },
            guide_kind: GuideKind::Strikeouts,
            strikeouts: Vec::new(),
            walks: Vec::new(),
            outs: Vec::new(),
            hr_targets: Vec::new(),
            board: Vec::new(),
            spread_filter: SpreadFilter::AtMost(4.0),
            system_rows: Vec::new(),
            system_total: 0,
            runs_pool: Vec::new(),
            runs_pool_updated: None,
            ladder: Vec::new(),
            ladder_stat: 0.0,
            scoreboard: Vec::new(),
            win_rates: Vec::new(),
            leader_hold_rate: None,
            logs: VecDeque::with_capacity(200),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= 200 {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sprt;

    fn view_with(sequence: &[u8]) -> SlumpView {
        let params = SprtParams {
            p0: 0.300,
            p1: 0.330,
            alpha: 0.01,
            beta: 0.10,
        };
        let outcome = sprt::run(sequence, &params).unwrap();
        SlumpView {
            player: "Aaron Judge".to_string(),
            params,
            outcome: Some(outcome),
            at_bats: sequence.len(),
            hits: sequence.iter().filter(|&&x| x == 1).count(),
        }
    }

    #[test]
    fn test_tab_cycle_round_trips() {
        let mut tab = Tab::Slump;
        for _ in 0..Tab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Slump);
        assert_eq!(Tab::Slump.prev(), Tab::NbaDaily);
    }

    #[test]
    fn test_continue_sentence() {
        let view = view_with(&[1; 20]);
        assert_eq!(
            view.decision_sentence(),
            "Not enough evidence yet for Aaron Judge."
        );
        assert!(view.explanation().contains("between thresholds"));
    }

    #[test]
    fn test_accept_h1_sentence_quotes_p1() {
        let view = view_with(&[1; 60]);
        assert!(view.decision_sentence().contains("0.330"), "{}", view.decision_sentence());
        assert!(view.explanation().contains("above the upper threshold"));
    }

    #[test]
    fn test_no_data_sentence() {
        let view = SlumpView {
            player: "Nobody".to_string(),
            params: SprtParams {
                p0: 0.3,
                p1: 0.33,
                alpha: 0.01,
                beta: 0.1,
            },
            outcome: None,
            at_bats: 0,
            hits: 0,
        };
        assert_eq!(view.decision_sentence(), "No at-bat data loaded yet.");
        assert!(view.explanation().is_empty());
    }
}
