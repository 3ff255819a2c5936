pub mod espn;
pub mod savant;
pub mod statsapi;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use espn::ScoreboardGame;

/// Provider seam for the NBA scoreboard so the dashboard can swap the
/// live client for the simulator.
#[async_trait]
pub trait ScoreboardFeed: Send + Sync {
    async fn fetch_scoreboard(&self, date: chrono::NaiveDate) -> Result<Vec<ScoreboardGame>>;
}

#[async_trait]
impl ScoreboardFeed for espn::EspnFeed {
    async fn fetch_scoreboard(&self, date: chrono::NaiveDate) -> Result<Vec<ScoreboardGame>> {
        self.scoreboard(date).await
    }
}
