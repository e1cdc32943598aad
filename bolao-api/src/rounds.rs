use std::collections::BTreeMap;

use crate::PoolId;

use bolao_core::detect::{self, Detection, PersistedRound};
use bolao_core::{label, schedule, LegIndex, PhaseKind, RoundPlan, RoundSpec};

use serde::{Deserialize, Serialize};

/// One persisted round of a pool.
///
/// `phase_kind`, `leg_index` and `group_key` are persisted first-class; `label` is
/// the readable projection kept alongside them. Rows written before the structured
/// fields existed are still classified from the label alone via [`detect_rounds`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRow {
    pub pool_id: PoolId,
    /// Contiguous, starting at 1, unique within the pool.
    pub sequence_number: u32,
    pub label: String,
    pub match_capacity: u32,
    pub phase_kind: PhaseKind,
    pub leg_index: LegIndex,
    pub group_key: Option<String>,
}

impl RoundRow {
    /// Materializes one generated [`RoundSpec`] into its persisted row.
    pub fn from_spec(pool_id: PoolId, spec: &RoundSpec) -> Self {
        Self {
            pool_id,
            sequence_number: spec.sequence_number,
            label: spec.label.clone(),
            match_capacity: spec.match_capacity,
            phase_kind: spec.phase_kind,
            leg_index: spec.leg_index,
            group_key: spec.group_key.clone(),
        }
    }

    /// Materializes a whole plan into its persisted rows, in plan order.
    pub fn from_plan(pool_id: PoolId, plan: &RoundPlan) -> Vec<Self> {
        plan.iter()
            .map(|spec| Self::from_spec(pool_id, spec))
            .collect()
    }

    /// Returns the detector's view of this row.
    #[inline]
    pub fn as_persisted(&self) -> PersistedRound<'_> {
        PersistedRound::new(&self.label, self.match_capacity)
    }

    /// Returns the group key of this row, falling back to the label pattern for
    /// legacy rows persisted without the structured field.
    pub fn group_key(&self) -> Option<&str> {
        self.group_key
            .as_deref()
            .or_else(|| label::group_key_of(&self.label))
    }
}

/// Recovers the format and approximate configuration of a persisted round list.
pub fn detect_rounds(rows: &[RoundRow]) -> Detection {
    let rounds: Vec<PersistedRound<'_>> = rows.iter().map(RoundRow::as_persisted).collect();

    detect::detect(&rounds)
}

/// The fixture layout of one group, for match-entry screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupFixturePlan {
    pub group_key: String,
    /// Match slots in the group across all its rounds.
    pub total_matches: u32,
    /// Team count recovered from the match total (single round-robin assumed).
    pub team_count: u32,
    pub matchdays: u32,
    pub matches_per_matchday: u32,
}

/// Clusters the group-stage rows of a pool by group letter and derives each
/// cluster's matchday layout, in letter order. Rows of other phases are ignored.
pub fn group_fixture_plans(rows: &[RoundRow]) -> Vec<GroupFixturePlan> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();

    for row in rows {
        if let Some(key) = row.group_key() {
            *totals.entry(key).or_default() += row.match_capacity;
        }
    }

    totals
        .into_iter()
        .map(|(group_key, total_matches)| {
            let team_count = schedule::team_count_from_matches(total_matches);

            GroupFixturePlan {
                group_key: group_key.to_owned(),
                total_matches,
                team_count,
                matchdays: schedule::matchdays_needed(team_count),
                matches_per_matchday: schedule::matches_per_matchday(team_count),
            }
        })
        .collect()
}
