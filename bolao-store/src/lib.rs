//! # bolao-store
//!
//! The commit boundary between the structure engine and pool persistence. Plan
//! generation is pure, but confirming a competition is a multi-step persistence
//! sequence (header, then rounds) that is not atomic by itself. This crate owns
//! that discipline:
//!
//! - [`PoolStore`] is the contract an actual storage adapter implements.
//! - [`commit`] wraps the create and reconfigure sequences so a partial failure
//! never leaves a half-built pool visible: steps are retried idempotently or the
//! header is rolled back into (or left in) its draft state.
//! - [`MemoryStore`] is the reference implementation, used by this crate's tests
//! and by consumers that need a store without a database.
//!
//! [`MemoryStore`]: memory::MemoryStore

pub mod commit;
pub mod memory;

use bolao_api::{Lifecycle, NewPool, Pool, PoolId, RoundRow};
use bolao_core::CompetitionFormat;

use thiserror::Error;

/// An error raised by a [`PoolStore`] implementation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("pool {0} does not exist")]
    PoolNotFound(PoolId),
    #[error("{0}")]
    Backend(String),
}

/// What currently blocks a structural edit of a pool.
///
/// Reconfiguring deletes every persisted round; that is only safe while nothing
/// has been played. Both counters must be zero before any deletion starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EditLocks {
    pub finalized_rounds: u32,
    pub recorded_results: u32,
}

impl EditLocks {
    /// Returns `true` if any round is finalized or any result is recorded.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.finalized_rounds > 0 || self.recorded_results > 0
    }
}

/// The persistence contract the commit sequences run against.
///
/// Implementations are expected to be cheap to call repeatedly; the commit layer
/// re-runs individual steps on failure.
pub trait PoolStore {
    /// Creates the header record in the [`Draft`] state and returns its id.
    ///
    /// [`Draft`]: Lifecycle::Draft
    fn create_pool(&self, pool: &NewPool) -> Result<PoolId, StoreError>;

    /// Deletes the header record and any rounds stored for it.
    fn delete_pool(&self, id: PoolId) -> Result<(), StoreError>;

    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError>;

    fn set_lifecycle(&self, id: PoolId, lifecycle: Lifecycle) -> Result<(), StoreError>;

    /// Updates the header's summary fields after a (re)generation.
    fn update_structure(
        &self,
        id: PoolId,
        format: CompetitionFormat,
        total_rounds: u32,
        total_match_capacity: u32,
    ) -> Result<(), StoreError>;

    /// Bulk-inserts rounds for the pool.
    ///
    /// Implementations must upsert on `(pool, sequence_number)`: re-running the
    /// same insert never duplicates rows. The commit layer relies on this for its
    /// retries.
    fn insert_rounds(&self, id: PoolId, rounds: &[RoundRow]) -> Result<(), StoreError>;

    /// Deletes every round of the pool.
    fn delete_rounds(&self, id: PoolId) -> Result<(), StoreError>;

    /// Returns the pool's rounds ordered by sequence number.
    fn rounds(&self, id: PoolId) -> Result<Vec<RoundRow>, StoreError>;

    /// Returns what blocks a structural edit of the pool right now.
    fn edit_locks(&self, id: PoolId) -> Result<EditLocks, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::EditLocks;

    #[test]
    fn test_edit_locks() {
        assert!(!EditLocks::default().is_locked());
        assert!(EditLocks {
            finalized_rounds: 1,
            recorded_results: 0,
        }
        .is_locked());
        assert!(EditLocks {
            finalized_rounds: 0,
            recorded_results: 3,
        }
        .is_locked());
    }
}
