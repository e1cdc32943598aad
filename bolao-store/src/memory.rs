//! In-memory [`PoolStore`] implementation.
//!
//! The reference store for tests and for consumers that need pool persistence
//! without a database. All state lives behind one lock; ids come from a process-wide
//! snowflake generator so two stores never hand out the same id.

use std::collections::{BTreeMap, HashMap};

use crate::{EditLocks, PoolStore, StoreError};

use bolao_api::{Lifecycle, NewPool, Pool, PoolId, RoundRow};
use bolao_core::CompetitionFormat;

use parking_lot::RwLock;
use snowflaked::sync::Generator;

static POOL_ID: Generator = Generator::new_unchecked(0);

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    pools: HashMap<PoolId, Pool>,
    rounds: HashMap<PoolId, BTreeMap<u32, RoundRow>>,
    locks: HashMap<PoolId, EditLocks>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no pool is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.read().pools.is_empty()
    }

    /// Marks rounds/results of the pool as played, for exercising the edit
    /// precondition.
    pub fn set_edit_locks(&self, id: PoolId, locks: EditLocks) {
        self.inner.write().locks.insert(id, locks);
    }
}

impl PoolStore for MemoryStore {
    fn create_pool(&self, pool: &NewPool) -> Result<PoolId, StoreError> {
        let id = PoolId(POOL_ID.generate());

        self.inner.write().pools.insert(
            id,
            Pool {
                id,
                name: pool.name.clone(),
                date: pool.date,
                format: pool.format,
                total_rounds: 0,
                total_match_capacity: 0,
                lifecycle: Lifecycle::Draft,
            },
        );

        Ok(id)
    }

    fn delete_pool(&self, id: PoolId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        inner.pools.remove(&id).ok_or(StoreError::PoolNotFound(id))?;
        inner.rounds.remove(&id);
        inner.locks.remove(&id);

        Ok(())
    }

    fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError> {
        Ok(self.inner.read().pools.get(&id).cloned())
    }

    fn set_lifecycle(&self, id: PoolId, lifecycle: Lifecycle) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let pool = inner
            .pools
            .get_mut(&id)
            .ok_or(StoreError::PoolNotFound(id))?;
        pool.lifecycle = lifecycle;

        Ok(())
    }

    fn update_structure(
        &self,
        id: PoolId,
        format: CompetitionFormat,
        total_rounds: u32,
        total_match_capacity: u32,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let pool = inner
            .pools
            .get_mut(&id)
            .ok_or(StoreError::PoolNotFound(id))?;
        pool.format = format;
        pool.total_rounds = total_rounds;
        pool.total_match_capacity = total_match_capacity;

        Ok(())
    }

    fn insert_rounds(&self, id: PoolId, rounds: &[RoundRow]) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        if !inner.pools.contains_key(&id) {
            return Err(StoreError::PoolNotFound(id));
        }

        let stored = inner.rounds.entry(id).or_default();

        // Upsert on sequence number keeps repeated inserts idempotent.
        for round in rounds {
            stored.insert(round.sequence_number, round.clone());
        }

        Ok(())
    }

    fn delete_rounds(&self, id: PoolId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        if !inner.pools.contains_key(&id) {
            return Err(StoreError::PoolNotFound(id));
        }

        inner.rounds.remove(&id);

        Ok(())
    }

    fn rounds(&self, id: PoolId) -> Result<Vec<RoundRow>, StoreError> {
        let inner = self.inner.read();

        if !inner.pools.contains_key(&id) {
            return Err(StoreError::PoolNotFound(id));
        }

        Ok(inner
            .rounds
            .get(&id)
            .map(|rounds| rounds.values().cloned().collect())
            .unwrap_or_default())
    }

    fn edit_locks(&self, id: PoolId) -> Result<EditLocks, StoreError> {
        let inner = self.inner.read();

        if !inner.pools.contains_key(&id) {
            return Err(StoreError::PoolNotFound(id));
        }

        Ok(inner.locks.get(&id).copied().unwrap_or_default())
    }
}
