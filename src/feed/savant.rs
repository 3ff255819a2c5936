//! Baseball Savant Statcast search (CSV export).
//!
//! Pulls the pitch-level event log for one batter over a date range and
//! reduces it to chronological plate-appearance rows for the slump
//! detector. Only rows carrying a pitch-result `events` label survive;
//! within an at-bat the lowest pitch number is the record of truth.

use crate::engine::classify::PlateAppearanceRow;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub struct SavantFeed {
    client: Client,
    base_url: String,
}

impl SavantFeed {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build savant HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Event log for one batter, already reduced and ordered for
    /// [`crate::engine::classify::build_sequence`].
    pub async fn batter_event_log(
        &self,
        batter_id: u64,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<PlateAppearanceRow>> {
        let url = format!(
            "{}/statcast_search/csv?all=true&player_type=batter&batters_lookup%5B%5D={}&game_date_gt={}&game_date_lt={}&type=details",
            self.base_url,
            batter_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("savant statcast search failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("savant {status}: {body}");
        }
        let csv = resp.text().await.context("failed to read savant CSV")?;
        parse_event_log(&csv)
    }
}

/// Split one CSV record, honoring quoted fields and doubled quotes.
/// Savant keeps every field on one line, so a line is a record.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

struct RawPitchRow {
    game_date: String,
    game_pk: u64,
    at_bat_number: u32,
    pitch_number: u32,
    event: String,
}

pub fn parse_event_log(csv: &str) -> Result<Vec<PlateAppearanceRow>> {
    let mut lines = csv.lines();
    let header = lines.next().context("savant CSV is empty")?;
    let columns = split_csv_line(header);

    let col = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("savant CSV missing column: {name}"))
    };
    let date_idx = col("game_date")?;
    let pk_idx = col("game_pk")?;
    let ab_idx = col("at_bat_number")?;
    let pitch_idx = col("pitch_number")?;
    let events_idx = col("events")?;

    let mut rows: Vec<RawPitchRow> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(line);
        let get = |idx: usize| fields.get(idx).map(String::as_str).unwrap_or("");

        // Only the pitch that ends the at-bat carries an events label.
        let event = get(events_idx).trim();
        if event.is_empty() || event == "null" {
            continue;
        }

        let (Ok(game_pk), Ok(at_bat_number)) =
            (get(pk_idx).parse::<u64>(), get(ab_idx).parse::<u32>())
        else {
            continue;
        };
        let pitch_number = get(pitch_idx).parse().unwrap_or(0);

        rows.push(RawPitchRow {
            game_date: get(date_idx).to_string(),
            game_pk,
            at_bat_number,
            pitch_number,
            event: event.to_string(),
        });
    }

    // Savant exports newest-first; the test needs chronological at-bat
    // order with the first result pitch leading each at-bat.
    rows.sort_by(|a, b| {
        a.game_date
            .cmp(&b.game_date)
            .then(a.game_pk.cmp(&b.game_pk))
            .then(a.at_bat_number.cmp(&b.at_bat_number))
            .then(a.pitch_number.cmp(&b.pitch_number))
    });

    Ok(rows
        .into_iter()
        .map(|r| PlateAppearanceRow {
            game_pk: r.game_pk,
            at_bat_number: r.at_bat_number,
            event: r.event,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::build_sequence;

    const HEADER: &str = "pitch_type,game_date,events,description,game_pk,at_bat_number,pitch_number";

    #[test]
    fn test_split_csv_line_quotes() {
        let fields = split_csv_line(r#"FF,2025-06-01,"single, sharp","he said ""ow""",776001,12,3"#);
        assert_eq!(fields[2], "single, sharp");
        assert_eq!(fields[3], r#"he said "ow""#);
        assert_eq!(fields[4], "776001");
    }

    #[test]
    fn test_parse_event_log_orders_chronologically() {
        // Newest-first export, pitch rows without events interleaved.
        let csv = format!(
            "{HEADER}\n\
             FF,2025-06-02,strikeout,swinging,776002,5,4\n\
             SL,2025-06-02,,ball,776002,5,3\n\
             FF,2025-06-01,single,line drive,776001,20,2\n\
             CH,2025-06-01,walk,ball four,776001,8,6\n"
        );
        let rows = parse_event_log(&csv).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].event, "walk");
        assert_eq!(rows[1].event, "single");
        assert_eq!(rows[2].event, "strikeout");
    }

    #[test]
    fn test_parse_event_log_feeds_classifier() {
        let csv = format!(
            "{HEADER}\n\
             FF,2025-06-01,single,liner,776001,3,2\n\
             FF,2025-06-01,strikeout,whiff,776001,10,5\n\
             FF,2025-06-01,walk,ball four,776001,15,6\n"
        );
        let rows = parse_event_log(&csv).unwrap();
        assert_eq!(build_sequence(&rows), vec![1, 0]);
    }

    #[test]
    fn test_parse_event_log_missing_column() {
        let err = parse_event_log("pitch_type,game_date\n").unwrap_err();
        assert!(err.to_string().contains("missing column"), "got {err:#}");
    }

    #[test]
    fn test_parse_event_log_empty_body() {
        let rows = parse_event_log(&format!("{HEADER}\n")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_event_log_skips_malformed_rows() {
        let csv = format!(
            "{HEADER}\n\
             FF,2025-06-01,single,liner,notanumber,3,2\n\
             FF,2025-06-01,double,gapper,776001,4,1\n"
        );
        let rows = parse_event_log(&csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event, "double");
    }
}
