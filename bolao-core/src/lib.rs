//! # bolao-core
//!
//! This crate contains the structure engine for prediction pool competitions. It turns a
//! small configuration into a complete, ordered phase plan and performs the inverse
//! operation on persisted phase rows.
//!
//! Important items:
//! - [`CompetitionConfig`]: The configuration of a competition in one of the three
//! supported formats.
//! - [`plan::generate`]: Maps a configuration to an ordered [`RoundPlan`] of
//! [`RoundSpec`]s.
//! - [`aggregate::StructureTotals`]: Round/match totals derived from a plan or directly
//! from a configuration.
//! - [`detect::detect`]: Best-effort recovery of a format and configuration from
//! persisted phase rows.
//! - [`validate::validate`]: Field-scoped domain checks on a configuration.
//!
//! Everything in this crate is pure and synchronous. Generation is deterministic: the
//! same configuration always yields an identical plan, so callers may regenerate on
//! every input change.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all public types.
//!
pub mod aggregate;
pub mod detect;
pub mod label;
pub mod plan;
pub mod schedule;
pub mod validate;

mod config;

pub use config::{
    CompetitionConfig, CupConfig, KnockoutConfig, LegFormat, StandardConfig, TierPolicy,
};

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::vec::IntoIter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The competition topology of a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompetitionFormat {
    /// A flat sequence of rounds with a fixed number of matches each.
    Standard,
    /// A single elimination bracket.
    Knockout,
    /// A group stage followed by a knockout bracket.
    Cup,
}

impl Display for CompetitionFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Standard => "Standard",
                Self::Knockout => "Knockout",
                Self::Cup => "Cup",
            }
        )
    }
}

/// The kind of a single phase within a plan.
///
/// Knockout kinds are named after the number of teams entering the round: a
/// [`RoundOf16`] holds 16 teams and 8 matches per leg.
///
/// [`RoundOf16`]: Self::RoundOf16
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseKind {
    GroupStage,
    RoundOf64,
    RoundOf32,
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    ThirdPlace,
    Final,
    StandardRound,
}

impl PhaseKind {
    /// Returns `true` if this kind is part of an elimination bracket, including the
    /// third place match and the final.
    pub fn is_knockout(self) -> bool {
        !matches!(self, Self::GroupStage | Self::StandardRound)
    }
}

/// Whether a phase is a standalone match or one leg of a two-match tie.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LegIndex {
    Single,
    FirstLeg,
    SecondLeg,
}

/// One phase of a competition plan.
///
/// The structured fields (`phase_kind`, `leg_index`, `group_key`) are the source of
/// truth; `label` is a deterministic projection of them produced by [`label::project`]
/// and is what legacy rows are matched against.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundSpec {
    /// Position in the plan, contiguous starting at 1.
    pub sequence_number: u32,
    pub label: String,
    /// Number of match slots in this phase. For a [`PhaseKind::GroupStage`] phase this
    /// is the whole group's match count, not a single matchday.
    pub match_capacity: u32,
    pub phase_kind: PhaseKind,
    pub leg_index: LegIndex,
    pub group_key: Option<String>,
}

/// An ordered list of [`RoundSpec`]s making up a complete plan.
///
/// This is a wrapper around a `Vec<RoundSpec>` and has the same layout as a
/// `Vec<RoundSpec>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoundPlan {
    rounds: Vec<RoundSpec>,
}

impl RoundPlan {
    /// Creates a new empty `RoundPlan`.
    #[inline]
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    /// Creates a new empty `RoundPlan` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rounds: Vec::with_capacity(capacity),
        }
    }
}

impl FromIterator<RoundSpec> for RoundPlan {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = RoundSpec>,
    {
        let rounds = iter.into_iter().collect();

        Self { rounds }
    }
}

impl IntoIterator for RoundPlan {
    type Item = RoundSpec;
    type IntoIter = IntoIter<RoundSpec>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.rounds.into_iter()
    }
}

impl Deref for RoundPlan {
    type Target = Vec<RoundSpec>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.rounds
    }
}

impl DerefMut for RoundPlan {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.rounds
    }
}

impl<U> PartialEq<U> for RoundPlan
where
    U: AsRef<[RoundSpec]>,
{
    #[inline]
    fn eq(&self, other: &U) -> bool {
        self.rounds == other.as_ref()
    }
}

impl From<Vec<RoundSpec>> for RoundPlan {
    #[inline]
    fn from(rounds: Vec<RoundSpec>) -> Self {
        Self { rounds }
    }
}
