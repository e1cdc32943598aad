use bolao_core::aggregate::{self, StructureTotals};
use bolao_core::{plan, CompetitionConfig};

use serde::{Deserialize, Serialize};

/// The live summary a configuration wizard renders next to the form.
///
/// Built in one call from the current configuration; cheap enough to recompute on
/// every input change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructurePreview {
    /// Per-phase labels, in plan order.
    pub phase_labels: Vec<String>,
    pub total_rounds: u32,
    pub total_matches: u32,
    /// Teams qualifying for the elimination portion; `None` for the Standard
    /// format.
    pub qualifying_teams: Option<u32>,
}

impl StructurePreview {
    pub fn for_config(config: &CompetitionConfig) -> Self {
        let plan = plan::generate(config);
        let totals = StructureTotals::from_config(config);

        Self {
            phase_labels: plan.into_iter().map(|round| round.label).collect(),
            total_rounds: totals.total_rounds,
            total_matches: totals.total_matches,
            qualifying_teams: aggregate::qualifying_teams(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StructurePreview;

    use bolao_core::{CupConfig, StandardConfig};

    #[test]
    fn test_cup_preview() {
        let config = CupConfig {
            total_teams: 32,
            total_groups: 8,
            classified_per_group: 2,
            ..CupConfig::default()
        };

        let preview = StructurePreview::for_config(&config.into());

        assert_eq!(preview.phase_labels.len(), 12);
        assert_eq!(preview.phase_labels[8], "Round of 16");
        assert_eq!(preview.total_rounds, 12);
        assert_eq!(preview.total_matches, 63);
        assert_eq!(preview.qualifying_teams, Some(16));
    }

    #[test]
    fn test_standard_preview_has_no_qualifiers() {
        let config = StandardConfig {
            total_rounds: 2,
            matches_per_round: 7,
        };

        let preview = StructurePreview::for_config(&config.into());

        assert_eq!(preview.phase_labels, ["Round 1", "Round 2"]);
        assert_eq!(preview.total_matches, 14);
        assert_eq!(preview.qualifying_teams, None);
    }
}
