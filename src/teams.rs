//! Shared MLB team lookups.
//!
//! One canonical table for full-name <-> abbreviation mapping and the
//! 30-team list, used by every feed and report instead of per-page
//! copies.

/// Canonical abbreviations for all 30 MLB clubs.
pub const MLB_TEAMS: [&str; 30] = [
    "ARI", "ATL", "BAL", "BOS", "CHC", "CHW", "CIN", "CLE", "COL", "DET", "HOU", "KCR", "LAA",
    "LAD", "MIA", "MIL", "MIN", "NYM", "NYY", "ATH", "PHI", "PIT", "SDP", "SFG", "SEA", "STL",
    "TBR", "TEX", "TOR", "WSN",
];

/// Map a full club name to its abbreviation. Covers both Athletics
/// identities (pre- and post-Oakland).
pub fn abbreviation(full_name: &str) -> Option<&'static str> {
    let abbr = match full_name {
        "Arizona Diamondbacks" => "ARI",
        "Atlanta Braves" => "ATL",
        "Baltimore Orioles" => "BAL",
        "Boston Red Sox" => "BOS",
        "Chicago Cubs" => "CHC",
        "Chicago White Sox" => "CHW",
        "Cincinnati Reds" => "CIN",
        "Cleveland Guardians" => "CLE",
        "Colorado Rockies" => "COL",
        "Detroit Tigers" => "DET",
        "Houston Astros" => "HOU",
        "Kansas City Royals" => "KCR",
        "Los Angeles Angels" => "LAA",
        "Los Angeles Dodgers" => "LAD",
        "Miami Marlins" => "MIA",
        "Milwaukee Brewers" => "MIL",
        "Minnesota Twins" => "MIN",
        "New York Mets" => "NYM",
        "New York Yankees" => "NYY",
        "Oakland Athletics" => "OAK",
        "Athletics" => "ATH",
        "Philadelphia Phillies" => "PHI",
        "Pittsburgh Pirates" => "PIT",
        "San Diego Padres" => "SDP",
        "San Francisco Giants" => "SFG",
        "Seattle Mariners" => "SEA",
        "St. Louis Cardinals" => "STL",
        "Tampa Bay Rays" => "TBR",
        "Texas Rangers" => "TEX",
        "Toronto Blue Jays" => "TOR",
        "Washington Nationals" => "WSN",
        _ => return None,
    };
    Some(abbr)
}

/// Reverse lookup for display.
pub fn full_name(abbr: &str) -> Option<&'static str> {
    let name = match abbr {
        "ARI" => "Arizona Diamondbacks",
        "ATL" => "Atlanta Braves",
        "BAL" => "Baltimore Orioles",
        "BOS" => "Boston Red Sox",
        "CHC" => "Chicago Cubs",
        "CHW" => "Chicago White Sox",
        "CIN" => "Cincinnati Reds",
        "CLE" => "Cleveland Guardians",
        "COL" => "Colorado Rockies",
        "DET" => "Detroit Tigers",
        "HOU" => "Houston Astros",
        "KCR" => "Kansas City Royals",
        "LAA" => "Los Angeles Angels",
        "LAD" => "Los Angeles Dodgers",
        "MIA" => "Miami Marlins",
        "MIL" => "Milwaukee Brewers",
        "MIN" => "Minnesota Twins",
        "NYM" => "New York Mets",
        "NYY" => "New York Yankees",
        "OAK" => "Oakland Athletics",
        "ATH" => "Athletics",
        "PHI" => "Philadelphia Phillies",
        "PIT" => "Pittsburgh Pirates",
        "SDP" => "San Diego Padres",
        "SFG" => "San Francisco Giants",
        "SEA" => "Seattle Mariners",
        "STL" => "St. Louis Cardinals",
        "TBR" => "Tampa Bay Rays",
        "TEX" => "Texas Rangers",
        "TOR" => "Toronto Blue Jays",
        "WSN" => "Washington Nationals",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_canonical_teams() {
        assert_eq!(MLB_TEAMS.len(), 30);
        // Every canonical abbreviation resolves to a display name.
        for team in MLB_TEAMS {
            assert!(full_name(team).is_some(), "missing full name for {team}");
        }
    }

    #[test]
    fn test_round_trip_for_canonical_names() {
        for team in MLB_TEAMS {
            let name = full_name(team).unwrap();
            assert_eq!(abbreviation(name), Some(team), "round trip for {name}");
        }
    }

    #[test]
    fn test_both_athletics_identities() {
        assert_eq!(abbreviation("Oakland Athletics"), Some("OAK"));
        assert_eq!(abbreviation("Athletics"), Some("ATH"));
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(abbreviation("Montreal Expos"), None);
        assert_eq!(full_name("MON"), None);
    }
}
