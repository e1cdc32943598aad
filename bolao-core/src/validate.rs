//! # Configuration validation
//!
//! Domain checks on a candidate configuration before plan generation. Every check
//! runs independently and every failure is reported; the caller decides whether to
//! block confirmation. Validation itself never fails.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::aggregate::StructureTotals;
use crate::{CompetitionConfig, CupConfig, KnockoutConfig, StandardConfig, TierPolicy};

/// The bracket sizes a knockout competition accepts.
pub const BRACKET_SIZES: [u32; 5] = [4, 8, 16, 32, 64];

/// The largest number of best-third wildcards a cup may qualify, before the group
/// count caps it further.
pub const MAX_BEST_THIRD_PLACE: u32 = 8;

/// A single failed check, scoped to the configuration field it concerns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub error: ValidationError,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("must be at least {min}, found {found}")]
    BelowMinimum { min: u32, found: u32 },
    #[error("must be one of 4, 8, 16, 32 or 64, found {found}")]
    NotABracketSize { found: u32 },
    #[error("must be between {min} and {max}, found {found}")]
    OutOfRange { min: u32, max: u32, found: u32 },
    #[error("exceeds the plan limit of {limit}, found {found}")]
    AboveTierLimit { limit: u32, found: u32 },
}

/// Checks `config` against the domain constraints and, when a [`TierPolicy`] is
/// given, against its caps. Privileged callers pass no policy.
///
/// Returns every violation found; an empty list means the configuration is
/// acceptable.
pub fn validate(config: &CompetitionConfig, policy: Option<&TierPolicy>) -> Vec<Violation> {
    let mut violations = Vec::new();

    match config {
        CompetitionConfig::Standard(config) => standard(config, &mut violations),
        CompetitionConfig::Knockout(config) => knockout(config, policy, &mut violations),
        CompetitionConfig::Cup(config) => cup(config, policy, &mut violations),
    }

    if let Some(policy) = policy {
        let total_matches = StructureTotals::from_config(config).total_matches;

        if total_matches > policy.max_matches {
            violations.push(Violation {
                field: "total_matches",
                error: ValidationError::AboveTierLimit {
                    limit: policy.max_matches,
                    found: total_matches,
                },
            });
        }
    }

    violations
}

fn standard(config: &StandardConfig, violations: &mut Vec<Violation>) {
    require_min(violations, "total_rounds", config.total_rounds, 1);
    require_min(violations, "matches_per_round", config.matches_per_round, 1);
}

fn knockout(
    config: &KnockoutConfig,
    policy: Option<&TierPolicy>,
    violations: &mut Vec<Violation>,
) {
    if !BRACKET_SIZES.contains(&config.total_teams) {
        violations.push(Violation {
            field: "total_teams",
            error: ValidationError::NotABracketSize {
                found: config.total_teams,
            },
        });
    }

    if let Some(policy) = policy {
        require_cap(violations, "total_teams", config.total_teams, policy.max_teams);
    }
}

fn cup(config: &CupConfig, policy: Option<&TierPolicy>, violations: &mut Vec<Violation>) {
    require_min(violations, "total_teams", config.total_teams, 4);
    require_min(violations, "total_groups", config.total_groups, 1);

    if config.classified_per_group < 1 || config.classified_per_group > 4 {
        violations.push(Violation {
            field: "classified_per_group",
            error: ValidationError::OutOfRange {
                min: 1,
                max: 4,
                found: config.classified_per_group,
            },
        });
    }

    if config.enable_best_third_place {
        let max = MAX_BEST_THIRD_PLACE.min(config.total_groups);

        if config.best_third_place_count < 1 || config.best_third_place_count > max {
            violations.push(Violation {
                field: "best_third_place_count",
                error: ValidationError::OutOfRange {
                    min: 1,
                    max,
                    found: config.best_third_place_count,
                },
            });
        }
    }

    if let Some(policy) = policy {
        require_cap(violations, "total_teams", config.total_teams, policy.max_teams);
        require_cap(
            violations,
            "total_groups",
            config.total_groups,
            policy.max_groups,
        );
    }
}

fn require_min(violations: &mut Vec<Violation>, field: &'static str, found: u32, min: u32) {
    if found < min {
        violations.push(Violation {
            field,
            error: ValidationError::BelowMinimum { min, found },
        });
    }
}

fn require_cap(violations: &mut Vec<Violation>, field: &'static str, found: u32, limit: u32) {
    if found > limit {
        violations.push(Violation {
            field,
            error: ValidationError::AboveTierLimit { limit, found },
        });
    }
}
