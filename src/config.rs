use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub sprt: SprtConfig,
    pub statsapi: StatsApiConfig,
    pub savant: SavantConfig,
    pub espn: EspnConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ladder: LadderConfig,
    #[serde(default)]
    pub halves: HalvesConfig,
    pub simulation: Option<SimulationConfig>,
}

/// Slump-detector defaults; all four map straight onto
/// [`crate::engine::SprtParams`] and the player picker.
#[derive(Debug, Deserialize, Clone)]
pub struct SprtConfig {
    pub p0: f64,
    pub p1: f64,
    pub alpha: f64,
    pub beta: f64,
    pub player: String,
    /// Season window for the event log, YYYY-MM-DD.
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsApiConfig {
    pub base_url: String,
    pub season: u16,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Innings-pitched qualifier for the percentile pool.
    #[serde(default = "default_min_innings")]
    pub min_innings: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavantConfig {
    pub base_url: String,
    #[serde(default = "default_savant_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// How many past days of scoreboards feed the halves table.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub data_dir: String,
    pub refresh_hour: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            refresh_hour: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LadderConfig {
    pub stat_per_game: f64,
    pub sigma: f64,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            stat_per_game: 10.2,
            sigma: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HalvesConfig {
    pub rolling_window: usize,
}

impl Default for HalvesConfig {
    fn default() -> Self {
        Self { rolling_window: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_savant_timeout_ms() -> u64 {
    // Full-season CSV exports run big.
    30_000
}

fn default_min_innings() -> f64 {
    10.0
}

fn default_lookback_days() -> u32 {
    14
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_config_parses() {
        let config = Config::load(Path::new("config.toml")).unwrap();
        assert_eq!(config.sprt.p0, 0.300);
        assert_eq!(config.sprt.p1, 0.330);
        assert_eq!(config.sprt.alpha, 0.01);
        assert_eq!(config.sprt.beta, 0.10);
        assert_eq!(config.cache.refresh_hour, 3);
        assert!(config.statsapi.base_url.starts_with("https://"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml = r#"
            [sprt]
            p0 = 0.25
            p1 = 0.28
            alpha = 0.05
            beta = 0.05
            player = "Aaron Judge"
            start_date = "2025-04-01"
            end_date = "2025-09-30"

            [statsapi]
            base_url = "https://statsapi.mlb.com"
            season = 2025

            [savant]
            base_url = "https://baseballsavant.mlb.com"

            [espn]
            base_url = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.statsapi.request_timeout_ms, 5000);
        assert_eq!(config.statsapi.min_innings, 10.0);
        assert_eq!(config.savant.request_timeout_ms, 30_000);
        assert_eq!(config.espn.lookback_days, 14);
        assert_eq!(config.cache.data_dir, "data");
        assert_eq!(config.ladder.stat_per_game, 10.2);
        assert_eq!(config.halves.rolling_window, 10);
        assert!(config.simulation.is_none());
    }
}
