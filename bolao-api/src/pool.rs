use crate::PoolId;

use bolao_core::CompetitionFormat;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The visibility state of a pool.
///
/// A pool is created as [`Draft`] and only becomes [`Confirmed`] once its complete
/// round list has been persisted. End users never see a draft, so a failure between
/// the two persistence steps cannot leave a half-built competition visible.
///
/// [`Draft`]: Self::Draft
/// [`Confirmed`]: Self::Confirmed
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Draft,
    Confirmed,
}

/// The persisted header record of a pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub name: String,
    /// RFC3339
    pub date: DateTime<Utc>,
    pub format: CompetitionFormat,
    pub total_rounds: u32,
    /// Sum of the match capacities over the whole plan. The legacy schema named this
    /// column "matches per round", which is only accurate for the Standard format;
    /// the alias keeps old records readable.
    #[serde(alias = "matches_per_round")]
    pub total_match_capacity: u32,
    pub lifecycle: Lifecycle,
}

/// The fields a caller supplies when creating a pool; the store assigns the id and
/// the lifecycle starts at [`Lifecycle::Draft`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPool {
    pub name: String,
    pub date: DateTime<Utc>,
    pub format: CompetitionFormat,
}
