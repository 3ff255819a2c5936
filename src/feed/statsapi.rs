//! MLB statsapi client (statsapi.mlb.com).
//!
//! One client covers the four endpoints the dashboard needs: the daily
//! schedule with probable pitchers, the full-season completed schedule
//! (runs-allowed source), season pitching / team batting stats, and
//! player search for the slump-detector picker.

use super::types::{strip_accents, PlayerMatch};
use crate::engine::props::{PitcherLine, ProbableStart, TeamBattingLine};
use crate::engine::runs_pool::TeamRunsAllowed;
use crate::teams;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub struct StatsApi {
    client: Client,
    base_url: String,
}

impl StatsApi {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build statsapi HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Probable starters for one date, two rows per game.
    pub async fn probable_starts(&self, date: chrono::NaiveDate) -> Result<Vec<ProbableStart>> {
        let url = format!(
            "{}/api/v1/schedule?sportId=1&date={}&hydrate=probablePitcher",
            self.base_url,
            date.format("%Y-%m-%d"),
        );
        let body = self.get_text(&url).await?;
        parse_probable_starts(&body)
    }

    /// Runs allowed in every completed regular-season game, two rows per
    /// game (one per defense).
    pub async fn season_runs_allowed(&self, season: u16) -> Result<Vec<TeamRunsAllowed>> {
        let url = format!(
            "{}/api/v1/schedule?sportId=1&season={}&gameType=R",
            self.base_url, season,
        );
        let body = self.get_text(&url).await?;
        parse_season_runs_allowed(&body)
    }

    /// Season rate lines for qualified pitchers (minimum innings pitched).
    pub async fn pitching_stats(&self, season: u16, min_innings: f64) -> Result<Vec<PitcherLine>> {
        let url = format!(
            "{}/api/v1/stats?stats=season&group=pitching&season={}&sportId=1&playerPool=all&limit=2000",
            self.base_url, season,
        );
        let body = self.get_text(&url).await?;
        parse_pitching_stats(&body, min_innings)
    }

    /// Season batting rates for all 30 teams.
    pub async fn team_batting(&self, season: u16) -> Result<Vec<TeamBattingLine>> {
        let url = format!(
            "{}/api/v1/teams/stats?sportId=1&season={}&group=hitting&stats=season",
            self.base_url, season,
        );
        let body = self.get_text(&url).await?;
        parse_team_batting(&body)
    }

    /// Look up MLBAM ids by (partial) player name.
    pub async fn search_player(&self, name: &str) -> Result<Vec<PlayerMatch>> {
        let url = format!("{}/api/v1/people/search?names={}", self.base_url, name);
        let body = self.get_text(&url).await?;
        parse_player_search(&body)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("statsapi request failed: {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("statsapi {status}: {body}");
        }
        resp.text().await.context("failed to read statsapi body")
    }
}

// ── Schedule deserialization ─────────────────────────────────────────

#[derive(Deserialize)]
struct Schedule {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<ScheduleGame>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleGame {
    status: GameState,
    teams: GameTeams,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameState {
    #[serde(default)]
    abstract_game_state: String,
}

#[derive(Deserialize)]
struct GameTeams {
    home: GameSide,
    away: GameSide,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameSide {
    team: TeamRef,
    score: Option<u32>,
    probable_pitcher: Option<PersonRef>,
}

#[derive(Deserialize)]
struct TeamRef {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonRef {
    #[serde(default)]
    full_name: String,
}

pub fn parse_probable_starts(json: &str) -> Result<Vec<ProbableStart>> {
    let schedule: Schedule =
        serde_json::from_str(json).context("failed to parse statsapi schedule")?;

    let mut starts = Vec::new();
    for date in schedule.dates {
        for game in date.games {
            let home = teams::abbreviation(&game.teams.home.team.name);
            let away = teams::abbreviation(&game.teams.away.team.name);
            let (Some(home), Some(away)) = (home, away) else { continue };

            if let Some(p) = &game.teams.home.probable_pitcher {
                starts.push(ProbableStart {
                    pitcher: strip_accents(&p.full_name),
                    team: home.to_string(),
                    opponent: away.to_string(),
                });
            }
            if let Some(p) = &game.teams.away.probable_pitcher {
                starts.push(ProbableStart {
                    pitcher: strip_accents(&p.full_name),
                    team: away.to_string(),
                    opponent: home.to_string(),
                });
            }
        }
    }
    Ok(starts)
}

pub fn parse_season_runs_allowed(json: &str) -> Result<Vec<TeamRunsAllowed>> {
    let schedule: Schedule =
        serde_json::from_str(json).context("failed to parse statsapi season schedule")?;

    let mut rows = Vec::new();
    for date in schedule.dates {
        for game in date.games {
            if game.status.abstract_game_state != "Final" {
                continue;
            }
            let home = teams::abbreviation(&game.teams.home.team.name);
            let away = teams::abbreviation(&game.teams.away.team.name);
            let (Some(home), Some(away)) = (home, away) else { continue };
            let (Some(home_score), Some(away_score)) =
                (game.teams.home.score, game.teams.away.score)
            else {
                continue;
            };

            rows.push(TeamRunsAllowed {
                team: home.to_string(),
                runs_allowed: away_score,
            });
            rows.push(TeamRunsAllowed {
                team: away.to_string(),
                runs_allowed: home_score,
            });
        }
    }
    Ok(rows)
}

// ── Stats deserialization ────────────────────────────────────────────

#[derive(Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: Vec<StatsGroup>,
}

#[derive(Deserialize)]
struct StatsGroup {
    #[serde(default)]
    splits: Vec<StatSplit>,
}

#[derive(Deserialize)]
struct StatSplit {
    player: Option<PlayerRef>,
    team: Option<TeamRef>,
    stat: StatLine,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRef {
    #[serde(default)]
    full_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatLine {
    #[serde(default)]
    innings_pitched: String,
    #[serde(default)]
    games_played: u32,
    #[serde(default)]
    batters_faced: u32,
    #[serde(default)]
    strike_outs: u32,
    #[serde(default)]
    base_on_balls: u32,
    #[serde(default)]
    number_of_pitches: u32,
    #[serde(default)]
    strikes: u32,
    #[serde(default)]
    home_runs: u32,
    #[serde(default)]
    plate_appearances: u32,
}

/// statsapi reports innings as "123.1" meaning 123 and one out.
fn innings_to_outs(innings: &str) -> Option<u32> {
    let (whole, frac) = match innings.split_once('.') {
        Some((w, f)) => (w, f),
        None => (innings, "0"),
    };
    let whole: u32 = whole.parse().ok()?;
    let frac: u32 = frac.parse().ok()?;
    if frac > 2 {
        return None;
    }
    Some(whole * 3 + frac)
}

pub fn parse_pitching_stats(json: &str, min_innings: f64) -> Result<Vec<PitcherLine>> {
    let response: StatsResponse =
        serde_json::from_str(json).context("failed to parse statsapi pitching stats")?;
    let min_outs = (min_innings * 3.0).round() as u32;

    let mut lines = Vec::new();
    for group in response.stats {
        for split in group.splits {
            let Some(player) = &split.player else { continue };
            let s = &split.stat;
            let Some(outs) = innings_to_outs(&s.innings_pitched) else { continue };
            if outs < min_outs
                || s.games_played == 0
                || s.batters_faced == 0
                || s.number_of_pitches == 0
            {
                continue;
            }

            let balls = s.number_of_pitches.saturating_sub(s.strikes);
            lines.push(PitcherLine {
                name: strip_accents(&player.full_name),
                k_pct: s.strike_outs as f64 / s.batters_faced as f64,
                bb_pct: s.base_on_balls as f64 / s.batters_faced as f64,
                strike_pct: s.strikes as f64 / s.number_of_pitches as f64,
                ball_pct: balls as f64 / s.number_of_pitches as f64,
                outs_per_game: outs as f64 / s.games_played as f64,
                pitches_per_pa: s.number_of_pitches as f64 / s.batters_faced as f64,
                hr_per_nine: s.home_runs as f64 * 27.0 / outs as f64,
            });
        }
    }
    Ok(lines)
}

pub fn parse_team_batting(json: &str) -> Result<Vec<TeamBattingLine>> {
    let response: StatsResponse =
        serde_json::from_str(json).context("failed to parse statsapi team batting")?;

    let mut lines = Vec::new();
    for group in response.stats {
        for split in group.splits {
            let Some(team) = &split.team else { continue };
            let Some(abbr) = teams::abbreviation(&team.name) else { continue };
            let s = &split.stat;
            if s.plate_appearances == 0 {
                continue;
            }
            let pa = s.plate_appearances as f64;
            lines.push(TeamBattingLine {
                team: abbr.to_string(),
                k_pct: s.strike_outs as f64 / pa,
                bb_pct: s.base_on_balls as f64 / pa,
                hr_pct: s.home_runs as f64 / pa,
            });
        }
    }
    Ok(lines)
}

// ── Player search ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PeopleResponse {
    #[serde(default)]
    people: Vec<Person>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    id: u64,
    #[serde(default)]
    full_name: String,
}

pub fn parse_player_search(json: &str) -> Result<Vec<PlayerMatch>> {
    let response: PeopleResponse =
        serde_json::from_str(json).context("failed to parse statsapi player search")?;
    Ok(response
        .people
        .into_iter()
        .map(|p| PlayerMatch {
            id: p.id,
            full_name: p.full_name,
        })
        .collect())
}
