//! CSV snapshot cache for slow-to-build tables.
//!
//! The runs-allowed table costs a full-season schedule pull, so it is
//! persisted under the data directory with a `Last Updated` stamp and
//! reused until it predates today's refresh cutoff (03:00 local by
//! default - box scores from last night are all final by then).

use crate::engine::runs_pool::{RunsPoolRow, MAX_TRACKED_RUNS};
use anyhow::{Context, Result};
use chrono::{NaiveDateTime, NaiveTime};
use std::path::Path;

const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct RunsPoolSnapshot {
    pub rows: Vec<RunsPoolRow>,
    pub last_updated: NaiveDateTime,
}

/// A snapshot is stale once it predates today's refresh cutoff.
pub fn is_stale(last_updated: NaiveDateTime, now: NaiveDateTime, refresh_hour: u32) -> bool {
    let cutoff = now
        .date()
        .and_time(NaiveTime::from_hms_opt(refresh_hour, 0, 0).unwrap_or(NaiveTime::MIN));
    last_updated < cutoff
}

/// Load a snapshot. Missing or unreadable files come back as `None`
/// (treated as stale), never an error.
pub fn load_runs_pool(path: &Path) -> Option<RunsPoolSnapshot> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_runs_pool_csv(&content)
}

fn parse_runs_pool_csv(content: &str) -> Option<RunsPoolSnapshot> {
    let mut lines = content.lines();
    let header = lines.next()?;
    let expected_cols = MAX_TRACKED_RUNS + 1 + 4; // Tm + buckets + Matches + Games + stamp
    if header.split(',').count() != expected_cols {
        return None;
    }

    let mut rows = Vec::new();
    let mut last_updated = None;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != expected_cols {
            return None;
        }

        let mut buckets = [0u32; MAX_TRACKED_RUNS + 1];
        for (slot, field) in buckets.iter_mut().zip(&fields[1..=MAX_TRACKED_RUNS + 1]) {
            *slot = field.parse().ok()?;
        }

        rows.push(RunsPoolRow {
            team: fields[0].to_string(),
            buckets,
            matches: fields[MAX_TRACKED_RUNS + 2].parse().ok()?,
            games: fields[MAX_TRACKED_RUNS + 3].parse().ok()?,
        });
        last_updated =
            Some(NaiveDateTime::parse_from_str(fields[MAX_TRACKED_RUNS + 4], STAMP_FORMAT).ok()?);
    }

    Some(RunsPoolSnapshot {
        rows,
        last_updated: last_updated?,
    })
}

/// Write the table with a fresh stamp, creating the data dir if needed.
pub fn save_runs_pool(path: &Path, rows: &[RunsPoolRow], now: NaiveDateTime) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create cache dir: {}", dir.display()))?;
    }

    let stamp = now.format(STAMP_FORMAT).to_string();
    let mut out = String::from("Tm");
    for runs in 0..=MAX_TRACKED_RUNS {
        out.push_str(&format!(",{runs}"));
    }
    out.push_str(",Matches,Games,Last Updated\n");

    for row in rows {
        out.push_str(&row.team);
        for bucket in row.buckets {
            out.push_str(&format!(",{bucket}"));
        }
        out.push_str(&format!(",{},{},{stamp}\n", row.matches, row.games));
    }

    std::fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a historical odds snapshot
/// (`date,home,away,home_score,away_score,home_spread,total` per line).
/// Unparseable lines are skipped; a missing file is `None` so the
/// caller can fall back to sample data.
pub fn load_game_odds(path: &Path) -> Option<Vec<crate::engine::systems::GameOdds>> {
    let content = std::fs::read_to_string(path).ok()?;
    let mut games = Vec::new();
    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 7 {
            continue;
        }
        let Ok(date) = chrono::NaiveDate::parse_from_str(fields[0], "%Y-%m-%d") else {
            continue;
        };
        let (Ok(home_score), Ok(away_score), Ok(home_spread), Ok(total)) = (
            fields[3].parse::<i32>(),
            fields[4].parse::<i32>(),
            fields[5].parse::<f64>(),
            fields[6].parse::<f64>(),
        ) else {
            continue;
        };
        games.push(crate::engine::systems::GameOdds {
            date,
            home: fields[1].to_string(),
            away: fields[2].to_string(),
            home_score,
            away_score,
            home_spread,
            total,
        });
    }
    Some(games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::runs_pool::{runs_pool_table, TeamRunsAllowed};

    fn tmp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pressbox-{}-{name}", std::process::id()))
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, STAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_staleness_rule() {
        let now = dt("2025-08-07 14:00:00");
        // Yesterday evening predates today's 3am cutoff.
        assert!(is_stale(dt("2025-08-06 22:00:00"), now, 3));
        // This morning after the cutoff is fresh.
        assert!(!is_stale(dt("2025-08-07 09:30:00"), now, 3));
        // Exactly at the cutoff counts as fresh.
        assert!(!is_stale(dt("2025-08-07 03:00:00"), now, 3));
    }

    #[test]
    fn test_round_trip() {
        let path = tmp_path("roundtrip.csv");
        let table = runs_pool_table(&[
            TeamRunsAllowed {
                team: "NYY".to_string(),
                runs_allowed: 3,
            },
            TeamRunsAllowed {
                team: "NYY".to_string(),
                runs_allowed: 7,
            },
            TeamRunsAllowed {
                team: "BOS".to_string(),
                runs_allowed: 0,
            },
        ]);
        let stamp = dt("2025-08-07 09:30:00");

        save_runs_pool(&path, &table, stamp).unwrap();
        let snapshot = load_runs_pool(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(snapshot.last_updated, stamp);
        assert_eq!(snapshot.rows, table);
    }

    #[test]
    fn test_missing_file_is_none() {
        assert!(load_runs_pool(Path::new("/nonexistent/pressbox.csv")).is_none());
    }

    #[test]
    fn test_load_game_odds_skips_bad_lines() {
        let path = tmp_path("odds.csv");
        std::fs::write(
            &path,
            "date,home,away,home_score,away_score,home_spread,total\n\
             2023-01-15,BOS,LAL,110,102,-5.0,220.5\n\
             not-a-date,BOS,LAL,1,2,3,4\n\
             2023-01-16,MIA,NYK,98,101,2.5,208.0\n",
        )
        .unwrap();
        let games = load_game_odds(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(games.len(), 2);
        assert_eq!(games[0].home, "BOS");
        assert_eq!(games[0].home_spread, -5.0);
        assert_eq!(games[1].away, "NYK");
    }

    #[test]
    fn test_corrupt_file_is_none() {
        let path = tmp_path("corrupt.csv");
        std::fs::write(&path, "not,a,real,header\njunk\n").unwrap();
        assert!(load_runs_pool(&path).is_none());
        std::fs::remove_file(&path).ok();
    }
}
