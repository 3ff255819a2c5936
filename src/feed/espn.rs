//! ESPN NBA scoreboard client.
//!
//! Daily scoreboard with quarter line scores; completed games feed the
//! half-time split engine, live ones just display.

use crate::engine::halves::QuarterScores;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum GameStatus {
    PreGame,
    Live,
    Finished,
}

/// One normalized scoreboard row.
#[derive(Debug, Clone)]
pub struct ScoreboardGame {
    pub date: chrono::NaiveDate,
    pub home_team: String,
    pub home_abbr: String,
    pub away_team: String,
    pub away_abbr: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_quarters: Option<[u32; 4]>,
    pub away_quarters: Option<[u32; 4]>,
    pub status: GameStatus,
}

pub struct EspnFeed {
    client: Client,
    base_url: String,
}

impl EspnFeed {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build ESPN HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn scoreboard(&self, date: chrono::NaiveDate) -> Result<Vec<ScoreboardGame>> {
        let url = format!("{}/scoreboard?dates={}", self.base_url, date.format("%Y%m%d"));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("ESPN scoreboard request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("ESPN scoreboard {status}: {body}");
        }
        let body = resp.text().await.context("failed to read ESPN body")?;
        parse_scoreboard(&body, date)
    }
}

/// Keep only finished games with full line scores, shaped for the
/// halves engine.
pub fn completed_quarter_scores(games: &[ScoreboardGame]) -> Vec<QuarterScores> {
    games
        .iter()
        .filter(|g| g.status == GameStatus::Finished)
        .filter_map(|g| {
            Some(QuarterScores {
                date: g.date,
                home: g.home_abbr.clone(),
                away: g.away_abbr.clone(),
                home_total: g.home_score,
                away_total: g.away_score,
                home_quarters: g.home_quarters?,
                away_quarters: g.away_quarters?,
            })
        })
        .collect()
}

// ── ESPN API deserialization ─────────────────────────────────────────

#[derive(Deserialize)]
struct EspnScoreboard {
    #[serde(default)]
    events: Vec<EspnEvent>,
}

#[derive(Deserialize)]
struct EspnEvent {
    competitions: Vec<EspnCompetition>,
}

#[derive(Deserialize)]
struct EspnCompetition {
    competitors: Vec<EspnCompetitor>,
    status: EspnStatus,
}

#[derive(Deserialize)]
struct EspnCompetitor {
    #[serde(rename = "homeAway")]
    home_away: String,
    team: EspnTeam,
    #[serde(default)]
    score: String,
    #[serde(default)]
    linescores: Vec<EspnLineScore>,
}

#[derive(Deserialize)]
struct EspnTeam {
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(default)]
    abbreviation: String,
}

#[derive(Deserialize)]
struct EspnLineScore {
    value: f64,
}

#[derive(Deserialize)]
struct EspnStatus {
    #[serde(rename = "type")]
    status_type: EspnStatusType,
}

#[derive(Deserialize)]
struct EspnStatusType {
    id: String,
}

/// First four line-score periods, if the feed has them all yet.
fn quarters(competitor: &EspnCompetitor) -> Option<[u32; 4]> {
    if competitor.linescores.len() < 4 {
        return None;
    }
    let mut q = [0u32; 4];
    for (slot, ls) in q.iter_mut().zip(&competitor.linescores) {
        *slot = ls.value as u32;
    }
    Some(q)
}

pub fn parse_scoreboard(json: &str, date: chrono::NaiveDate) -> Result<Vec<ScoreboardGame>> {
    let scoreboard: EspnScoreboard =
        serde_json::from_str(json).context("failed to parse ESPN scoreboard")?;

    let mut games = Vec::new();
    for event in scoreboard.events {
        let Some(comp) = event.competitions.first() else { continue };
        let home = comp.competitors.iter().find(|c| c.home_away == "home");
        let away = comp.competitors.iter().find(|c| c.home_away == "away");
        let (Some(home), Some(away)) = (home, away) else { continue };

        let status = match comp.status.status_type.id.as_str() {
            "1" => GameStatus::PreGame,
            "2" => GameStatus::Live,
            "3" => GameStatus::Finished,
            _ => GameStatus::PreGame,
        };

        games.push(ScoreboardGame {
            date,
            home_team: home.team.display_name.clone(),
            home_abbr: home.team.abbreviation.clone(),
            away_team: away.team.display_name.clone(),
            away_abbr: away.team.abbreviation.clone(),
            home_score: home.score.parse().unwrap_or(0),
            away_score: away.score.parse().unwrap_or(0),
            home_quarters: quarters(home),
            away_quarters: quarters(away),
            status,
        });
    }
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        r#"{
            "events": [
                {
                    "competitions": [
                        {
                            "competitors": [
                                {
                                    "homeAway": "home",
                                    "team": {"displayName": "Boston Celtics", "abbreviation": "BOS"},
                                    "score": "110",
                                    "linescores": [
                                        {"value": 30.0}, {"value": 25.0}, {"value": 28.0}, {"value": 27.0}
                                    ]
                                },
                                {
                                    "homeAway": "away",
                                    "team": {"displayName": "Los Angeles Lakers", "abbreviation": "LAL"},
                                    "score": "104",
                                    "linescores": [
                                        {"value": 20.0}, {"value": 30.0}, {"value": 29.0}, {"value": 25.0}
                                    ]
                                }
                            ],
                            "status": {"type": {"id": "3", "name": "STATUS_FINAL"}}
                        }
                    ]
                },
                {
                    "competitions": [
                        {
                            "competitors": [
                                {
                                    "homeAway": "home",
                                    "team": {"displayName": "New York Knicks", "abbreviation": "NYK"},
                                    "score": "55",
                                    "linescores": [{"value": 30.0}, {"value": 25.0}]
                                },
                                {
                                    "homeAway": "away",
                                    "team": {"displayName": "Miami Heat", "abbreviation": "MIA"},
                                    "score": "50",
                                    "linescores": [{"value": 28.0}, {"value": 22.0}]
                                }
                            ],
                            "status": {"type": {"id": "2", "name": "STATUS_IN_PROGRESS"}}
                        }
                    ]
                }
            ]
        }"#
        .to_string()
    }

    fn date() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 1, 8).unwrap()
    }

    #[test]
    fn test_parse_scoreboard() {
        let games = parse_scoreboard(&fixture(), date()).unwrap();
        assert_eq!(games.len(), 2);

        let final_game = &games[0];
        assert_eq!(final_game.home_abbr, "BOS");
        assert_eq!(final_game.away_abbr, "LAL");
        assert_eq!(final_game.home_score, 110);
        assert_eq!(final_game.status, GameStatus::Finished);
        assert_eq!(final_game.home_quarters, Some([30, 25, 28, 27]));

        let live_game = &games[1];
        assert_eq!(live_game.status, GameStatus::Live);
        // Only two periods played: no full line score yet.
        assert_eq!(live_game.home_quarters, None);
    }

    #[test]
    fn test_completed_quarter_scores_filters_live_games() {
        let games = parse_scoreboard(&fixture(), date()).unwrap();
        let completed = completed_quarter_scores(&games);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].home, "BOS");
        assert_eq!(completed[0].home_total, 110);
        assert_eq!(completed[0].away_quarters, [20, 30, 29, 25]);
    }

    #[test]
    fn test_parse_scoreboard_empty() {
        let games = parse_scoreboard(r#"{"events": []}"#, date()).unwrap();
        assert!(games.is_empty());
    }
}
