//! # Structure totals
//!
//! Round and match totals for previews and for the persisted pool header. The totals
//! can be derived from a materialized [`RoundPlan`] or straight from a
//! [`CompetitionConfig`]; both paths share the tier walk of [`plan`] and must agree
//! for every valid configuration.
//!
//! [`plan`]: crate::plan

use crate::plan::{round_robin_matches, KNOCKOUT_TIERS};
use crate::{CompetitionConfig, LegFormat, RoundPlan};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The aggregate numbers of a plan.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructureTotals {
    pub total_rounds: u32,
    pub total_matches: u32,
}

impl StructureTotals {
    /// Derives the totals from a materialized plan.
    pub fn from_plan(plan: &RoundPlan) -> Self {
        Self {
            total_rounds: plan.len() as u32,
            total_matches: plan.iter().map(|round| round.match_capacity).sum(),
        }
    }

    /// Derives the totals directly from a configuration, without materializing the
    /// plan. Cheap enough to run on every input change.
    pub fn from_config(config: &CompetitionConfig) -> Self {
        match config {
            CompetitionConfig::Standard(config) => Self {
                total_rounds: config.total_rounds,
                total_matches: config.total_rounds * config.matches_per_round.max(1),
            },
            CompetitionConfig::Knockout(config) => bracket_totals(
                config.total_teams,
                config.leg_format,
                config.final_leg_format,
                config.has_third_place,
            ),
            CompetitionConfig::Cup(config) => {
                // The per-group capacity covers one whole group, so the grand total
                // multiplies by the group count.
                let per_group =
                    round_robin_matches(config.teams_per_group(), config.group_leg_format).max(1);

                let groups = Self {
                    total_rounds: config.total_groups,
                    total_matches: config.total_groups * per_group,
                };

                let knockout = bracket_totals(
                    config.teams_in_knockout(),
                    config.knockout_leg_format,
                    config.final_leg_format,
                    config.has_third_place,
                );

                Self {
                    total_rounds: groups.total_rounds + knockout.total_rounds,
                    total_matches: groups.total_matches + knockout.total_matches,
                }
            }
        }
    }
}

fn bracket_totals(
    entrants: u32,
    leg_format: LegFormat,
    final_leg_format: LegFormat,
    has_third_place: bool,
) -> StructureTotals {
    let mut totals = StructureTotals::default();

    for (_, capacity) in KNOCKOUT_TIERS {
        if entrants >= capacity * 2 {
            totals.total_rounds += leg_format.legs();
            totals.total_matches += capacity * leg_format.legs();
        }
    }

    if has_third_place {
        totals.total_rounds += 1;
        totals.total_matches += 1;
    }

    totals.total_rounds += final_leg_format.legs();
    totals.total_matches += final_leg_format.legs();

    totals
}

/// Returns the number of teams qualifying for the elimination portion, for preview
/// display. `None` for the [`Standard`] format, which has no qualification.
///
/// [`Standard`]: crate::CompetitionFormat::Standard
pub fn qualifying_teams(config: &CompetitionConfig) -> Option<u32> {
    match config {
        CompetitionConfig::Standard(_) => None,
        CompetitionConfig::Knockout(config) => Some(config.total_teams),
        CompetitionConfig::Cup(config) => Some(config.teams_in_knockout()),
    }
}
