//! # Group scheduling boundary
//!
//! The plan generator produces one capacity number per group covering the whole
//! round-robin; laying the matches out over matchdays belongs to the match-entry
//! screens. These helpers define that boundary: slot counts per matchday and the
//! matchday count, for the circle-method round-robin the group stage uses.

/// Returns the number of fixture slots a matchday holds for a group of
/// `team_count`.
///
/// Groups of one or two teams still render a single slot.
pub fn matches_per_matchday(team_count: u32) -> u32 {
    if team_count <= 2 {
        1
    } else {
        team_count / 2
    }
}

/// Returns the number of matchdays a single round-robin takes.
pub fn matchdays_needed(team_count: u32) -> u32 {
    team_count.saturating_sub(1)
}

/// Returns the number of matchdays a double round-robin takes.
pub fn matchdays_needed_double(team_count: u32) -> u32 {
    matchdays_needed(team_count) * 2
}

/// Recovers the team count of a group from its single round-robin match total:
/// the inverse of `n * (n - 1) / 2`, rounded to the nearest integer.
///
/// Counts that are not exact round-robin totals resolve to the closest plausible
/// team count.
pub fn team_count_from_matches(matches: u32) -> u32 {
    let discriminant = (1.0 + 8.0 * matches as f64).sqrt();

    ((1.0 + discriminant) / 2.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::{
        matchdays_needed, matchdays_needed_double, matches_per_matchday,
        team_count_from_matches,
    };

    #[test]
    fn test_matches_per_matchday() {
        assert_eq!(matches_per_matchday(0), 1);
        assert_eq!(matches_per_matchday(2), 1);
        assert_eq!(matches_per_matchday(4), 2);
        assert_eq!(matches_per_matchday(5), 2);
        assert_eq!(matches_per_matchday(6), 3);
    }

    #[test]
    fn test_matchdays_needed() {
        assert_eq!(matchdays_needed(0), 0);
        assert_eq!(matchdays_needed(4), 3);
        assert_eq!(matchdays_needed_double(4), 6);
    }

    #[test]
    fn test_team_count_from_matches_inverts_round_robin() {
        use crate::plan::round_robin_matches;
        use crate::LegFormat;

        for teams in 2..=20 {
            let matches = round_robin_matches(teams, LegFormat::Single);
            assert_eq!(team_count_from_matches(matches), teams);
        }
    }

    #[test]
    fn test_team_count_from_matches_rounds() {
        // 12 matches is no single round-robin total; 5 teams (10) is closest.
        assert_eq!(team_count_from_matches(12), 5);
        assert_eq!(team_count_from_matches(1), 2);
    }
}
