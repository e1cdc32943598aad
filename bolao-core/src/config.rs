use crate::CompetitionFormat;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether ties in a phase are played as one match or as two legs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LegFormat {
    Single,
    DoubleLeg,
}

impl LegFormat {
    /// Returns the number of matches a tie takes under this format.
    #[inline]
    pub fn legs(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::DoubleLeg => 2,
        }
    }

    /// Returns `true` if this is [`DoubleLeg`].
    ///
    /// [`DoubleLeg`]: Self::DoubleLeg
    #[inline]
    pub fn is_double(self) -> bool {
        matches!(self, Self::DoubleLeg)
    }
}

/// Configuration of a [`Standard`] competition: a flat sequence of rounds.
///
/// [`Standard`]: CompetitionFormat::Standard
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandardConfig {
    pub total_rounds: u32,
    pub matches_per_round: u32,
}

impl Default for StandardConfig {
    fn default() -> Self {
        Self {
            total_rounds: 1,
            matches_per_round: 1,
        }
    }
}

/// Configuration of a [`Knockout`] competition: a single elimination bracket.
///
/// [`Knockout`]: CompetitionFormat::Knockout
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnockoutConfig {
    /// Number of teams entering the bracket. Must be one of
    /// [`validate::BRACKET_SIZES`].
    ///
    /// [`validate::BRACKET_SIZES`]: crate::validate::BRACKET_SIZES
    pub total_teams: u32,
    /// Format of every bracket round except the final.
    pub leg_format: LegFormat,
    pub final_leg_format: LegFormat,
    pub has_third_place: bool,
}

impl Default for KnockoutConfig {
    fn default() -> Self {
        Self {
            total_teams: 8,
            leg_format: LegFormat::Single,
            final_leg_format: LegFormat::Single,
            has_third_place: false,
        }
    }
}

/// Configuration of a [`Cup`] competition: a group stage followed by a knockout
/// bracket.
///
/// [`Cup`]: CompetitionFormat::Cup
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CupConfig {
    pub total_teams: u32,
    pub total_groups: u32,
    /// Teams qualifying from each group by rank.
    pub classified_per_group: u32,
    pub group_leg_format: LegFormat,
    /// Format of every bracket round except the final.
    pub knockout_leg_format: LegFormat,
    pub final_leg_format: LegFormat,
    pub has_third_place: bool,
    /// Additionally qualify the best third-placed teams across all groups.
    pub enable_best_third_place: bool,
    pub best_third_place_count: u32,
}

impl Default for CupConfig {
    fn default() -> Self {
        Self {
            total_teams: 32,
            total_groups: 8,
            classified_per_group: 2,
            group_leg_format: LegFormat::Single,
            knockout_leg_format: LegFormat::Single,
            final_leg_format: LegFormat::Single,
            has_third_place: false,
            enable_best_third_place: false,
            best_third_place_count: 1,
        }
    }
}

impl CupConfig {
    /// Returns the team count of a single group.
    ///
    /// Groups are filled evenly; a remainder is ignored, matching how the group draw
    /// distributes teams.
    #[inline]
    pub fn teams_per_group(&self) -> u32 {
        match self.total_groups {
            0 => 0,
            n => self.total_teams / n,
        }
    }

    /// Returns the number of teams entering the knockout portion: group qualifiers
    /// plus best-third wildcards.
    ///
    /// The result is not required to be a power of two. See [`plan`] for how such
    /// counts map onto bracket tiers.
    ///
    /// [`plan`]: crate::plan
    #[inline]
    pub fn teams_in_knockout(&self) -> u32 {
        let wildcards = if self.enable_best_third_place {
            self.best_third_place_count
        } else {
            0
        };

        self.total_groups * self.classified_per_group + wildcards
    }
}

/// The configuration of a competition in one of the three supported formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompetitionConfig {
    Standard(StandardConfig),
    Knockout(KnockoutConfig),
    Cup(CupConfig),
}

impl CompetitionConfig {
    /// Returns the [`CompetitionFormat`] this configuration describes.
    #[inline]
    pub fn format(&self) -> CompetitionFormat {
        match self {
            Self::Standard(_) => CompetitionFormat::Standard,
            Self::Knockout(_) => CompetitionFormat::Knockout,
            Self::Cup(_) => CompetitionFormat::Cup,
        }
    }
}

impl From<StandardConfig> for CompetitionConfig {
    #[inline]
    fn from(config: StandardConfig) -> Self {
        Self::Standard(config)
    }
}

impl From<KnockoutConfig> for CompetitionConfig {
    #[inline]
    fn from(config: KnockoutConfig) -> Self {
        Self::Knockout(config)
    }
}

impl From<CupConfig> for CompetitionConfig {
    #[inline]
    fn from(config: CupConfig) -> Self {
        Self::Cup(config)
    }
}

/// Size caps applied to unprivileged configurations.
///
/// The caps are supplied by the entitlement system once per session; the engine only
/// enforces the numbers it is given. Privileged sessions pass no policy at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TierPolicy {
    pub max_teams: u32,
    pub max_groups: u32,
    pub max_matches: u32,
}
