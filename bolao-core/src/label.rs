//! # Phase labels
//!
//! Labels are a deterministic projection of the structured phase fields
//! (`phase_kind`, `leg_index`, `group_key`), never the source of truth. Legacy rows
//! predate the structured fields though, so every projection stays recognizable by
//! pattern: [`detect`] classifies persisted rows purely from their labels.
//!
//! [`detect`]: crate::detect

use crate::{LegIndex, PhaseKind};

const FIRST_LEG_SUFFIX: &str = " (first leg)";
const SECOND_LEG_SUFFIX: &str = " (second leg)";

/// Returns the letter key of the group at `index`: `A`, `B`, .., `Z`, `AA`, `AB`, ..
pub fn group_letter(index: usize) -> String {
    let letter = |i: usize| (b'A' + (i % 26) as u8) as char;

    if index < 26 {
        letter(index).to_string()
    } else {
        let mut key = String::with_capacity(2);
        key.push(letter(index / 26 - 1));
        key.push(letter(index));
        key
    }
}

/// Renders the label of a phase from its structured fields.
///
/// `ordinal` is only used for [`StandardRound`] phases, which are labelled by their
/// position in the plan.
///
/// [`StandardRound`]: PhaseKind::StandardRound
pub fn project(
    kind: PhaseKind,
    leg_index: LegIndex,
    group_key: Option<&str>,
    ordinal: u32,
) -> String {
    let base = match kind {
        PhaseKind::GroupStage => format!("Group {}", group_key.unwrap_or("A")),
        PhaseKind::StandardRound => format!("Round {}", ordinal),
        PhaseKind::RoundOf64 => String::from("Round of 64"),
        PhaseKind::RoundOf32 => String::from("Round of 32"),
        PhaseKind::RoundOf16 => String::from("Round of 16"),
        PhaseKind::QuarterFinal => String::from("Quarter-finals"),
        PhaseKind::SemiFinal => String::from("Semi-finals"),
        PhaseKind::ThirdPlace => String::from("Third place"),
        PhaseKind::Final => String::from("Final"),
    };

    match leg_index {
        LegIndex::Single => base,
        LegIndex::FirstLeg => base + FIRST_LEG_SUFFIX,
        LegIndex::SecondLeg => base + SECOND_LEG_SUFFIX,
    }
}

/// Returns the group key of a group-stage label, or `None` if the label does not
/// match the reserved `"Group <letter>"` pattern.
pub fn group_key_of(label: &str) -> Option<&str> {
    let key = label.strip_prefix("Group ")?;

    if key.is_empty() || key.len() > 2 || !key.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }

    Some(key)
}

/// Returns `true` if the label carries any of the reserved knockout markers.
pub fn has_knockout_marker(label: &str) -> bool {
    let label = label.to_ascii_lowercase();

    ["round of", "quarter", "semi", "final"]
        .iter()
        .any(|marker| label.contains(marker))
}

/// Returns the number of teams entering the knockout tier named by this label, or
/// `None` if the label names no tier.
///
/// The markers are scanned from the largest tier downwards, so a label naming
/// multiple tiers resolves to the largest.
pub fn tier_entrants(label: &str) -> Option<u32> {
    let label = label.to_ascii_lowercase();

    const MARKERS: [(&str, u32); 5] = [
        ("round of 64", 64),
        ("round of 32", 32),
        ("round of 16", 16),
        ("quarter", 8),
        ("semi", 4),
    ];

    MARKERS
        .iter()
        .find(|(marker, _)| label.contains(marker))
        .map(|&(_, teams)| teams)
}

/// Returns `true` if the label names the final itself, not a phase whose name merely
/// contains "final" (semi-finals, quarter-finals).
pub fn is_final_label(label: &str) -> bool {
    strip_leg_suffix(label).eq_ignore_ascii_case("final")
}

/// Returns `true` if the label names the third place match.
pub fn is_third_place_label(label: &str) -> bool {
    label.to_ascii_lowercase().contains("third place")
}

/// Returns `true` if the label carries the second leg suffix.
pub fn is_second_leg_label(label: &str) -> bool {
    label.to_ascii_lowercase().ends_with("(second leg)")
}

fn strip_leg_suffix(label: &str) -> &str {
    label
        .strip_suffix(FIRST_LEG_SUFFIX)
        .or_else(|| label.strip_suffix(SECOND_LEG_SUFFIX))
        .unwrap_or(label)
}

/// Recovers the structured fields of a label produced by [`project`].
///
/// Returns `None` for labels that match no reserved pattern.
pub fn recognize(label: &str) -> Option<(PhaseKind, LegIndex, Option<String>)> {
    if let Some(key) = group_key_of(label) {
        return Some((PhaseKind::GroupStage, LegIndex::Single, Some(key.to_owned())));
    }

    let leg_index = if label.ends_with(FIRST_LEG_SUFFIX) {
        LegIndex::FirstLeg
    } else if label.ends_with(SECOND_LEG_SUFFIX) {
        LegIndex::SecondLeg
    } else {
        LegIndex::Single
    };

    let base = strip_leg_suffix(label);

    if is_third_place_label(base) {
        return Some((PhaseKind::ThirdPlace, leg_index, None));
    }

    if is_final_label(base) {
        return Some((PhaseKind::Final, leg_index, None));
    }

    let kind = match tier_entrants(base) {
        Some(64) => PhaseKind::RoundOf64,
        Some(32) => PhaseKind::RoundOf32,
        Some(16) => PhaseKind::RoundOf16,
        Some(8) => PhaseKind::QuarterFinal,
        Some(4) => PhaseKind::SemiFinal,
        _ => {
            let base = base.to_ascii_lowercase();
            let ordinal = base.strip_prefix("round ")?;

            if ordinal.bytes().all(|b| b.is_ascii_digit()) && !ordinal.is_empty() {
                PhaseKind::StandardRound
            } else {
                return None;
            }
        }
    };

    Some((kind, leg_index, None))
}
