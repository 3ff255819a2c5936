use anyhow::{Context, Result};
use pressbox::cache;
use pressbox::config::Config;
use pressbox::engine::classify;
use pressbox::engine::halves::{self, QuarterScores};
use pressbox::engine::ladder;
use pressbox::engine::props::{self, DailyRow};
use pressbox::engine::runs_pool::{self, RunsPoolRow};
use pressbox::engine::sprt;
use pressbox::engine::systems::{self, GameOdds, SpreadFilter};
use pressbox::engine::SprtParams;
use pressbox::feed::espn::{EspnFeed, ScoreboardGame};
use pressbox::feed::savant::SavantFeed;
use pressbox::feed::statsapi::StatsApi;
use pressbox::feed::ScoreboardFeed;
use pressbox::sim;
use pressbox::tui::state::AppState;
use pressbox::tui::{self, TuiCommand};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};

const ERROR_RATE_PRESETS: [f64; 6] = [0.001, 0.005, 0.01, 0.05, 0.10, 0.20];

const SPREAD_FILTER_PRESETS: [SpreadFilter; 5] = [
    SpreadFilter::AtMost(4.0),
    SpreadFilter::AtMost(8.0),
    SpreadFilter::AtMost(20.0),
    SpreadFilter::Exactly(4.0),
    SpreadFilter::Between(2.0, 6.0),
];

/// Everything the refresh pass fetches; retained so parameter tweaks
/// recompute locally without another network pass.
#[derive(Default)]
struct DataStore {
    sequence: Vec<u8>,
    board: Vec<DailyRow>,
    odds: Vec<GameOdds>,
    quarter_history: Vec<QuarterScores>,
    scoreboard: Vec<ScoreboardGame>,
    runs_pool: Vec<RunsPoolRow>,
    runs_pool_updated: Option<chrono::NaiveDateTime>,
}

/// Live clients, or the simulator when `--simulate` is set.
struct Sources {
    mlb: Option<(StatsApi, SavantFeed)>,
    scoreboard: Box<dyn ScoreboardFeed>,
    sim_seed: Option<u64>,
}

impl Sources {
    fn live(config: &Config) -> Result<Self> {
        Ok(Self {
            mlb: Some((
                StatsApi::new(&config.statsapi.base_url, config.statsapi.request_timeout_ms)?,
                SavantFeed::new(&config.savant.base_url, config.savant.request_timeout_ms)?,
            )),
            scoreboard: Box::new(EspnFeed::new(
                &config.espn.base_url,
                config.espn.request_timeout_ms,
            )?),
            sim_seed: None,
        })
    }

    fn simulated(seed: u64) -> Self {
        Self {
            mlb: None,
            scoreboard: Box::new(sim::SimScoreboard::new(seed)),
            sim_seed: Some(seed),
        }
    }

    async fn fetch_sequence(&self, config: &Config) -> Result<Vec<u8>> {
        if let Some(seed) = self.sim_seed {
            // A batter quietly outperforming the null hypothesis.
            return Ok(classify::build_sequence(&sim::event_log(seed, 0.320, 450)));
        }
        let (statsapi, savant) = self.mlb.as_ref().expect("live mode has MLB clients");

        let matches = statsapi.search_player(&config.sprt.player).await?;
        let player = matches
            .first()
            .with_context(|| format!("no MLBAM id found for {}", config.sprt.player))?;

        let start = parse_date(&config.sprt.start_date)?;
        let end = parse_date(&config.sprt.end_date)?;
        let rows = savant.batter_event_log(player.id, start, end).await?;
        Ok(classify::build_sequence(&rows))
    }

    async fn fetch_board(&self, config: &Config) -> Result<Vec<DailyRow>> {
        let (pitchers, batting, starts) = if let Some(seed) = self.sim_seed {
            (
                sim::pitcher_pool(seed),
                sim::team_batting_pool(seed),
                sim::probable_starts(seed),
            )
        } else {
            let (statsapi, _) = self.mlb.as_ref().expect("live mode has MLB clients");
            let season = config.statsapi.season;
            let today = chrono::Local::now().date_naive();
            (
                statsapi
                    .pitching_stats(season, config.statsapi.min_innings)
                    .await?,
                statsapi.team_batting(season).await?,
                statsapi.probable_starts(today).await?,
            )
        };

        let pitcher_pcts = props::pitcher_percentiles(&pitchers);
        let team_pcts = props::team_percentiles(&batting);
        Ok(props::daily_board(&starts, &pitcher_pcts, &team_pcts))
    }

    /// Runs-allowed table, via the CSV snapshot unless it is stale.
    async fn fetch_runs_pool(
        &self,
        config: &Config,
        now: chrono::NaiveDateTime,
    ) -> Result<(Vec<RunsPoolRow>, chrono::NaiveDateTime)> {
        // The simulator never touches the on-disk snapshot: a sim run
        // must not serve fabricated numbers to the next live session.
        if let Some(seed) = self.sim_seed {
            let table = runs_pool::runs_pool_table(&sim::runs_allowed(seed, 40));
            return Ok((table, now));
        }

        let path = runs_pool_path(config);
        if let Some(snapshot) = cache::load_runs_pool(&path) {
            if !cache::is_stale(snapshot.last_updated, now, config.cache.refresh_hour) {
                return Ok((snapshot.rows, snapshot.last_updated));
            }
        }

        let (statsapi, _) = self.mlb.as_ref().expect("live mode has MLB clients");
        let games = statsapi.season_runs_allowed(config.statsapi.season).await?;
        let table = runs_pool::runs_pool_table(&games);
        if let Err(e) = cache::save_runs_pool(&path, &table, now) {
            tracing::warn!(error = %e, "failed to write runs-pool snapshot");
        }
        Ok((table, now))
    }

    /// Today's scoreboard for display plus the lookback window of
    /// completed games for the halves table.
    async fn fetch_scoreboards(
        &self,
        config: &Config,
        today: chrono::NaiveDate,
    ) -> Result<(Vec<ScoreboardGame>, Vec<QuarterScores>)> {
        let todays = self.scoreboard.fetch_scoreboard(today).await?;

        let mut history = Vec::new();
        for days_back in 0..=config.espn.lookback_days {
            let date = today - chrono::Days::new(u64::from(days_back));
            let games = if days_back == 0 {
                todays.clone()
            } else {
                match self.scoreboard.fetch_scoreboard(date).await {
                    Ok(games) => games,
                    Err(e) => {
                        tracing::warn!(date = %date, error = %e, "scoreboard fetch failed");
                        continue;
                    }
                }
            };
            history.extend(pressbox::feed::espn::completed_quarter_scores(&games));
        }
        // Oldest first so rolling windows read chronologically.
        history.sort_by_key(|g| g.date);

        Ok((todays, history))
    }

    /// Betting-systems population: a local snapshot when one exists,
    /// otherwise a simulated sample.
    fn fetch_odds(&self, config: &Config) -> (Vec<GameOdds>, bool) {
        let path = Path::new(&config.cache.data_dir).join("nba_odds.csv");
        if let Some(games) = cache::load_game_odds(&path) {
            if !games.is_empty() {
                return (games, false);
            }
        }
        (sim::game_odds(self.sim_seed.unwrap_or(7), 600), true)
    }
}

fn runs_pool_path(config: &Config) -> PathBuf {
    Path::new(&config.cache.data_dir).join("runs_given_up.csv")
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date in config: {s}"))
}

fn next_error_rate(current: f64) -> f64 {
    let idx = ERROR_RATE_PRESETS
        .iter()
        .position(|&p| (p - current).abs() < 1e-12);
    match idx {
        Some(i) => ERROR_RATE_PRESETS[(i + 1) % ERROR_RATE_PRESETS.len()],
        None => ERROR_RATE_PRESETS[0],
    }
}

fn next_spread_filter(current: SpreadFilter) -> SpreadFilter {
    let idx = SPREAD_FILTER_PRESETS.iter().position(|&f| f == current);
    match idx {
        Some(i) => SPREAD_FILTER_PRESETS[(i + 1) % SPREAD_FILTER_PRESETS.len()],
        None => SPREAD_FILTER_PRESETS[0],
    }
}

/// Re-derive every view from the retained data and current controls.
fn recompute(state: &mut AppState, data: &DataStore, config: &Config) {
    recompute_slump(state, data);

    state.board = data.board.clone();
    state.strikeouts = props::strikeouts_guide(&data.board);
    state.walks = props::walks_guide(&data.board);
    state.outs = props::outs_guide(&data.board);
    state.hr_targets = props::hr_targets(&data.board);

    let (rows, total) = systems::tally(&data.odds, state.spread_filter);
    state.system_rows = rows;
    state.system_total = total;

    state.runs_pool = data.runs_pool.clone();
    state.runs_pool_updated = data
        .runs_pool_updated
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string());

    state.scoreboard = data.scoreboard.clone();
    let splits = halves::half_splits(&data.quarter_history);
    state.leader_hold_rate = halves::leader_hold_rate(&splits);
    state.win_rates = halves::latest_win_rates(&data.quarter_history, config.halves.rolling_window);
}

fn recompute_slump(state: &mut AppState, data: &DataStore) {
    state.slump.at_bats = data.sequence.len();
    state.slump.hits = data.sequence.iter().filter(|&&ab| ab == 1).count();
    match sprt::run(&data.sequence, &state.slump.params) {
        Ok(outcome) => state.slump.outcome = Some(outcome),
        Err(e) => {
            // Nudge clamps keep parameters valid, so this only fires on a
            // bad config; surface it instead of showing stale output.
            state.slump.outcome = None;
            state.push_log("ERROR", format!("SPRT rejected parameters: {e}"));
        }
    }
}

async fn do_refresh(
    sources: &Sources,
    config: &Config,
    data: &mut DataStore,
    state: &mut AppState,
) {
    let today = chrono::Local::now().date_naive();
    let now = chrono::Local::now().naive_local();

    match sources.fetch_sequence(config).await {
        Ok(sequence) => {
            state.push_log("INFO", format!("loaded {} at-bats", sequence.len()));
            data.sequence = sequence;
        }
        Err(e) => {
            tracing::warn!(error = %e, "at-bat log fetch failed");
            state.push_log("WARN", format!("at-bat log fetch failed: {e:#}"));
        }
    }

    match sources.fetch_board(config).await {
        Ok(board) => {
            state.push_log("INFO", format!("{} matchups on the props board", board.len()));
            data.board = board;
        }
        Err(e) => {
            tracing::warn!(error = %e, "props board fetch failed");
            state.push_log("WARN", format!("props board fetch failed: {e:#}"));
        }
    }

    match sources.fetch_runs_pool(config, now).await {
        Ok((table, updated)) => {
            data.runs_pool = table;
            data.runs_pool_updated = Some(updated);
        }
        Err(e) => {
            tracing::warn!(error = %e, "runs-pool fetch failed");
            state.push_log("WARN", format!("runs-pool fetch failed: {e:#}"));
        }
    }

    match sources.fetch_scoreboards(config, today).await {
        Ok((scoreboard, history)) => {
            state.push_log(
                "INFO",
                format!(
                    "{} games today, {} completed in window",
                    scoreboard.len(),
                    history.len()
                ),
            );
            data.scoreboard = scoreboard;
            data.quarter_history = history;
        }
        Err(e) => {
            tracing::warn!(error = %e, "scoreboard fetch failed");
            state.push_log("WARN", format!("scoreboard fetch failed: {e:#}"));
        }
    }

    let (odds, sampled) = sources.fetch_odds(config);
    if sampled && data.odds.is_empty() {
        state.push_log(
            "INFO",
            "no data/nba_odds.csv snapshot; betting systems use a simulated sample".to_string(),
        );
    }
    data.odds = odds;
}

async fn orchestrate(
    sources: Sources,
    config: Config,
    state_tx: watch::Sender<AppState>,
    mut cmd_rx: mpsc::Receiver<TuiCommand>,
    mut state: AppState,
) {
    let mut data = DataStore::default();

    state.ladder_stat = config.ladder.stat_per_game;
    state.ladder = ladder::build_ladder(
        config.ladder.stat_per_game,
        config.ladder.sigma,
        &ladder::default_thresholds(config.ladder.stat_per_game),
    );

    // Initial load before the first command arrives.
    state.refreshing = true;
    let _ = state_tx.send(state.clone());
    do_refresh(&sources, &config, &mut data, &mut state).await;
    state.refreshing = false;
    state.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
    recompute(&mut state, &data, &config);
    let _ = state_tx.send(state.clone());

    while let Some(command) = cmd_rx.recv().await {
        match command {
            TuiCommand::Quit => break,
            TuiCommand::Refresh => {
                state.refreshing = true;
                let _ = state_tx.send(state.clone());
                do_refresh(&sources, &config, &mut data, &mut state).await;
                state.refreshing = false;
                state.last_refresh = Some(chrono::Local::now().format("%H:%M:%S").to_string());
                recompute(&mut state, &data, &config);
            }
            TuiCommand::NextTab => {
                state.tab = state.tab.next();
                state.scroll_offset = 0;
            }
            TuiCommand::PrevTab => {
                state.tab = state.tab.prev();
                state.scroll_offset = 0;
            }
            TuiCommand::ScrollUp => {
                state.scroll_offset = state.scroll_offset.saturating_sub(1);
            }
            TuiCommand::ScrollDown => {
                state.scroll_offset = state.scroll_offset.saturating_add(1);
            }
            TuiCommand::CycleGuide => {
                state.guide_kind = state.guide_kind.next();
                state.scroll_offset = 0;
            }
            TuiCommand::CycleSpreadFilter => {
                state.spread_filter = next_spread_filter(state.spread_filter);
                let (rows, total) = systems::tally(&data.odds, state.spread_filter);
                state.system_rows = rows;
                state.system_total = total;
            }
            TuiCommand::NudgeP0(delta) => {
                let p1 = state.slump.params.p1;
                state.slump.params.p0 = (state.slump.params.p0 + delta).clamp(0.001, p1 - 0.001);
                recompute_slump(&mut state, &data);
            }
            TuiCommand::NudgeP1(delta) => {
                let p0 = state.slump.params.p0;
                state.slump.params.p1 = (state.slump.params.p1 + delta).clamp(p0 + 0.001, 0.999);
                recompute_slump(&mut state, &data);
            }
            TuiCommand::CycleAlpha => {
                state.slump.params.alpha = next_error_rate(state.slump.params.alpha);
                recompute_slump(&mut state, &data);
            }
            TuiCommand::CycleBeta => {
                state.slump.params.beta = next_error_rate(state.slump.params.beta);
                recompute_slump(&mut state, &data);
            }
        }
        let _ = state_tx.send(state.clone());
    }

    tracing::debug!("orchestrator shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("pressbox.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("pressbox=info")
        .with_writer(log_file)
        .init();

    let sim_mode = std::env::args().any(|arg| arg == "--simulate");

    let config = Config::load(Path::new("config.toml"))?;

    println!();
    println!("  pressbox v0.1.0");
    println!("  ===============");
    println!();
    if sim_mode {
        println!("  ** SIMULATION MODE ** (synthetic data, no network)");
        println!();
    }

    let params = SprtParams {
        p0: config.sprt.p0,
        p1: config.sprt.p1,
        alpha: config.sprt.alpha,
        beta: config.sprt.beta,
    };
    params
        .validate()
        .context("invalid [sprt] section in config.toml")?;

    let sources = if sim_mode {
        let seed = config.simulation.as_ref().map(|s| s.seed).unwrap_or(7);
        Sources::simulated(seed)
    } else {
        Sources::live(&config)?
    };

    let mut initial = AppState::new(config.sprt.player.clone(), params);
    initial.sim_mode = sim_mode;

    let (state_tx, state_rx) = watch::channel(initial.clone());
    let (cmd_tx, cmd_rx) = mpsc::channel::<TuiCommand>(16);

    let orchestrator = tokio::spawn(orchestrate(sources, config, state_tx, cmd_rx, initial));

    tui::run_tui(state_rx, cmd_tx).await?;

    orchestrator.abort();
    tracing::debug!("shutting down");
    Ok(())
}
