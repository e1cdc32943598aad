//! # Plan generation
//!
//! [`generate`] maps a [`CompetitionConfig`] to its ordered [`RoundPlan`]. The three
//! format strategies share one descending tier walk for the elimination portion:
//! a tier is included while the entrant count is at least twice the tier's winner
//! count, so non-power-of-two entrant counts enter at the nearest smaller tier.

use crate::{
    label, CompetitionConfig, CupConfig, KnockoutConfig, LegFormat, LegIndex, PhaseKind,
    RoundPlan, RoundSpec, StandardConfig,
};

/// The elimination tiers a bracket can enter at, largest first, with the match
/// capacity of one leg. A tier holds twice as many teams as matches.
pub(crate) const KNOCKOUT_TIERS: [(PhaseKind, u32); 5] = [
    (PhaseKind::RoundOf64, 32),
    (PhaseKind::RoundOf32, 16),
    (PhaseKind::RoundOf16, 8),
    (PhaseKind::QuarterFinal, 4),
    (PhaseKind::SemiFinal, 2),
];

/// Returns the whole round-robin match count of a group of `teams`.
pub(crate) fn round_robin_matches(teams: u32, leg_format: LegFormat) -> u32 {
    let single = teams * teams.saturating_sub(1) / 2;

    match leg_format {
        LegFormat::Single => single,
        LegFormat::DoubleLeg => single * 2,
    }
}

/// Generates the complete phase plan of `config`.
///
/// Generation is pure and total over the validated domain: it never fails, and two
/// calls with an unchanged configuration yield identical plans. Callers are expected
/// to run [`validate`] first; out-of-domain values degrade into degenerate (but still
/// well-formed) plans rather than panics.
///
/// [`validate`]: crate::validate::validate
pub fn generate(config: &CompetitionConfig) -> RoundPlan {
    let mut builder = PlanBuilder::new();

    match config {
        CompetitionConfig::Standard(config) => standard(config, &mut builder),
        CompetitionConfig::Knockout(config) => knockout(config, &mut builder),
        CompetitionConfig::Cup(config) => cup(config, &mut builder),
    }

    let plan = builder.finish();

    log::debug!(
        "Generated {:?} plan with {} rounds",
        config.format(),
        plan.len()
    );

    plan
}

fn standard(config: &StandardConfig, builder: &mut PlanBuilder) {
    for _ in 0..config.total_rounds {
        builder.push(
            PhaseKind::StandardRound,
            LegIndex::Single,
            config.matches_per_round.max(1),
            None,
        );
    }
}

fn knockout(config: &KnockoutConfig, builder: &mut PlanBuilder) {
    bracket(
        config.total_teams,
        config.leg_format,
        config.final_leg_format,
        config.has_third_place,
        builder,
    );
}

fn cup(config: &CupConfig, builder: &mut PlanBuilder) {
    let capacity = round_robin_matches(config.teams_per_group(), config.group_leg_format).max(1);

    for group in 0..config.total_groups {
        let key = label::group_letter(group as usize);
        builder.push(PhaseKind::GroupStage, LegIndex::Single, capacity, Some(key));
    }

    bracket(
        config.teams_in_knockout(),
        config.knockout_leg_format,
        config.final_leg_format,
        config.has_third_place,
        builder,
    );
}

/// Emits the elimination phases for `entrants` teams: the included tiers, the
/// optional third place match and the final.
///
/// The third place match is always a single match, whatever the leg formats.
fn bracket(
    entrants: u32,
    leg_format: LegFormat,
    final_leg_format: LegFormat,
    has_third_place: bool,
    builder: &mut PlanBuilder,
) {
    for (kind, capacity) in KNOCKOUT_TIERS {
        if entrants >= capacity * 2 {
            builder.push_legs(kind, leg_format, capacity);
        }
    }

    if has_third_place {
        builder.push(PhaseKind::ThirdPlace, LegIndex::Single, 1, None);
    }

    builder.push_legs(PhaseKind::Final, final_leg_format, 1);
}

struct PlanBuilder {
    rounds: Vec<RoundSpec>,
}

impl PlanBuilder {
    fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    fn push(
        &mut self,
        phase_kind: PhaseKind,
        leg_index: LegIndex,
        match_capacity: u32,
        group_key: Option<String>,
    ) {
        let sequence_number = self.rounds.len() as u32 + 1;
        let label = label::project(phase_kind, leg_index, group_key.as_deref(), sequence_number);

        self.rounds.push(RoundSpec {
            sequence_number,
            label,
            match_capacity,
            phase_kind,
            leg_index,
            group_key,
        });
    }

    fn push_legs(&mut self, kind: PhaseKind, leg_format: LegFormat, capacity: u32) {
        match leg_format {
            LegFormat::Single => self.push(kind, LegIndex::Single, capacity, None),
            LegFormat::DoubleLeg => {
                self.push(kind, LegIndex::FirstLeg, capacity, None);
                self.push(kind, LegIndex::SecondLeg, capacity, None);
            }
        }
    }

    fn finish(self) -> RoundPlan {
        debug_assert!(self
            .rounds
            .iter()
            .enumerate()
            .all(|(index, round)| round.sequence_number == index as u32 + 1));

        self.rounds.into()
    }
}
