//! Plate-appearance outcome classification.
//!
//! Reduces a raw Statcast event log to the ordered {0,1} sequence the
//! slump detector consumes: one entry per at-bat, hit = 1, out = 0,
//! everything else (walks, HBP, sacrifices, ...) excluded.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtBatOutcome {
    Hit,
    Out,
    /// Not an at-bat for batting-average purposes.
    Excluded,
}

/// One row of the Statcast event log, already in chronological order.
#[derive(Debug, Clone)]
pub struct PlateAppearanceRow {
    pub game_pk: u64,
    pub at_bat_number: u32,
    /// Statcast `events` label; empty on non-terminal pitches.
    pub event: String,
}

/// Map a Statcast `events` label to an at-bat outcome.
pub fn classify_event(event: &str) -> AtBatOutcome {
    match event {
        "single" | "double" | "triple" | "home_run" => AtBatOutcome::Hit,
        "field_out"
        | "strikeout"
        | "force_out"
        | "field_error"
        | "grounded_into_double_play"
        | "double_play"
        | "fielders_choice"
        | "strikeout_double_play" => AtBatOutcome::Out,
        _ => AtBatOutcome::Excluded,
    }
}

/// Build the binary at-bat sequence from raw event-log rows.
///
/// Rows must already be in chronological order. Multiple rows for the
/// same `(game_pk, at_bat_number)` collapse to the first one seen (the
/// first pitch-result row is the record of truth); excluded outcomes are
/// dropped entirely.
pub fn build_sequence(rows: &[PlateAppearanceRow]) -> Vec<u8> {
    let mut seen: HashSet<(u64, u32)> = HashSet::new();
    let mut sequence = Vec::new();

    for row in rows {
        if !seen.insert((row.game_pk, row.at_bat_number)) {
            continue;
        }
        match classify_event(&row.event) {
            AtBatOutcome::Hit => sequence.push(1),
            AtBatOutcome::Out => sequence.push(0),
            AtBatOutcome::Excluded => {}
        }
    }

    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(game_pk: u64, at_bat: u32, event: &str) -> PlateAppearanceRow {
        PlateAppearanceRow {
            game_pk,
            at_bat_number: at_bat,
            event: event.to_string(),
        }
    }

    #[test]
    fn test_hit_events() {
        for event in ["single", "double", "triple", "home_run"] {
            assert_eq!(classify_event(event), AtBatOutcome::Hit, "event={event}");
        }
    }

    #[test]
    fn test_out_events() {
        for event in [
            "field_out",
            "strikeout",
            "force_out",
            "field_error",
            "grounded_into_double_play",
            "double_play",
            "fielders_choice",
            "strikeout_double_play",
        ] {
            assert_eq!(classify_event(event), AtBatOutcome::Out, "event={event}");
        }
    }

    #[test]
    fn test_non_at_bats_excluded() {
        for event in ["walk", "hit_by_pitch", "sac_fly", "sac_bunt", "catcher_interf", ""] {
            assert_eq!(classify_event(event), AtBatOutcome::Excluded, "event={event}");
        }
    }

    #[test]
    fn test_sequence_preserves_order() {
        let rows = vec![
            row(1, 1, "single"),
            row(1, 2, "strikeout"),
            row(1, 3, "walk"),
            row(1, 4, "home_run"),
            row(2, 1, "field_out"),
        ];
        assert_eq!(build_sequence(&rows), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_duplicate_at_bat_rows_collapse_to_first() {
        // Pitch-level exports repeat the at-bat; only the first row counts.
        let rows = vec![
            row(1, 1, "double"),
            row(1, 1, "strikeout"),
            row(1, 1, "strikeout"),
            row(1, 2, "strikeout"),
        ];
        assert_eq!(build_sequence(&rows), vec![1, 0]);
    }

    #[test]
    fn test_same_at_bat_number_across_games_not_deduped() {
        let rows = vec![row(1, 1, "single"), row(2, 1, "strikeout")];
        assert_eq!(build_sequence(&rows), vec![1, 0]);
    }

    #[test]
    fn test_empty_log() {
        assert!(build_sequence(&[]).is_empty());
    }
}
