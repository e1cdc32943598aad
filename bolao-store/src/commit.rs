//! # Commit sequences
//!
//! Confirming a competition writes the header and the round rows as two separate
//! persistence steps; reconfiguring one deletes and rewrites the rounds wholesale.
//! Neither sequence is atomic at the storage level, so both are run as a
//! compensating transaction here: a failed step is retried (inserts are idempotent
//! by the [`PoolStore`] contract), and when a step keeps failing the header is
//! rolled back or left in its explicit [`Draft`] state.
//!
//! [`Draft`]: Lifecycle::Draft

use crate::{EditLocks, PoolStore, StoreError};

use bolao_api::{Lifecycle, NewPool, PoolId, RoundRow};
use bolao_core::aggregate::StructureTotals;
use bolao_core::validate::{self, Violation};
use bolao_core::{plan, CompetitionConfig, TierPolicy};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// How often an idempotent step is attempted before the sequence gives up.
const STEP_ATTEMPTS: u32 = 3;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The configuration failed validation; nothing was written.
    #[error("configuration rejected with {} violation(s)", .0.len())]
    Rejected(Vec<Violation>),
    /// A finalized round or recorded result blocks the structural edit; nothing
    /// was deleted.
    #[error(
        "structure is locked: {} finalized round(s), {} recorded result(s)",
        .0.finalized_rounds,
        .0.recorded_results
    )]
    EditLocked(EditLocks),
    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Validates `config`, generates its plan and persists the new pool.
///
/// The header is created as [`Lifecycle::Draft`] and only confirmed once every
/// round row is stored. If the rounds cannot be stored even after retries, the
/// header is deleted again so no orphaned pool survives.
pub fn create_pool_with_plan<S>(
    store: &S,
    name: String,
    date: DateTime<Utc>,
    config: &CompetitionConfig,
    policy: Option<&TierPolicy>,
) -> Result<PoolId, CommitError>
where
    S: PoolStore + ?Sized,
{
    let violations = validate::validate(config, policy);
    if !violations.is_empty() {
        return Err(CommitError::Rejected(violations));
    }

    let plan = plan::generate(config);
    let totals = StructureTotals::from_plan(&plan);

    let id = store.create_pool(&NewPool {
        name,
        date,
        format: config.format(),
    })?;
    log::info!("created pool {} as draft with {} rounds pending", id, plan.len());

    let rounds = RoundRow::from_plan(id, &plan);

    if let Err(err) = with_retry(|| store.insert_rounds(id, &rounds)) {
        log::error!("storing rounds for pool {} failed, rolling back header", id);

        if let Err(rollback) = store.delete_pool(id) {
            // The original failure is the one worth surfacing.
            log::error!("rollback of pool {} failed: {}", id, rollback);
        }

        return Err(err.into());
    }

    store.update_structure(id, config.format(), totals.total_rounds, totals.total_matches)?;
    store.set_lifecycle(id, Lifecycle::Confirmed)?;
    log::info!("confirmed pool {}", id);

    Ok(id)
}

/// Replaces the structure of an existing pool with the plan of `config`.
///
/// The edit precondition is evaluated before anything is deleted: a pool with a
/// finalized round or a recorded result is rejected untouched. The pool is demoted
/// to [`Lifecycle::Draft`] for the duration of the rewrite; a persistent storage
/// failure leaves it in that state rather than half-confirmed.
pub fn reconfigure_pool<S>(
    store: &S,
    id: PoolId,
    config: &CompetitionConfig,
    policy: Option<&TierPolicy>,
) -> Result<(), CommitError>
where
    S: PoolStore + ?Sized,
{
    let violations = validate::validate(config, policy);
    if !violations.is_empty() {
        return Err(CommitError::Rejected(violations));
    }

    let locks = store.edit_locks(id)?;
    if locks.is_locked() {
        log::debug!("rejecting reconfiguration of pool {}: {:?}", id, locks);
        return Err(CommitError::EditLocked(locks));
    }

    let plan = plan::generate(config);
    let totals = StructureTotals::from_plan(&plan);
    let rounds = RoundRow::from_plan(id, &plan);

    store.set_lifecycle(id, Lifecycle::Draft)?;
    with_retry(|| store.delete_rounds(id))?;
    with_retry(|| store.insert_rounds(id, &rounds))?;
    store.update_structure(id, config.format(), totals.total_rounds, totals.total_matches)?;
    store.set_lifecycle(id, Lifecycle::Confirmed)?;
    log::info!("reconfigured pool {} with {} rounds", id, rounds.len());

    Ok(())
}

fn with_retry<F>(mut step: F) -> Result<(), StoreError>
where
    F: FnMut() -> Result<(), StoreError>,
{
    let mut attempt = 1;

    loop {
        match step() {
            Ok(()) => return Ok(()),
            Err(err) if attempt < STEP_ATTEMPTS => {
                log::warn!("store step failed (attempt {}): {}", attempt, err);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{create_pool_with_plan, reconfigure_pool, CommitError, STEP_ATTEMPTS};
    use crate::memory::MemoryStore;
    use crate::{EditLocks, PoolStore, StoreError};

    use bolao_api::{Lifecycle, NewPool, Pool, PoolId, RoundRow};
    use bolao_core::{
        CompetitionConfig, CompetitionFormat, CupConfig, KnockoutConfig, StandardConfig,
    };

    use std::cell::Cell;

    use chrono::{TimeZone, Utc};

    fn date() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 18, 0, 0).unwrap()
    }

    fn knockout_config() -> CompetitionConfig {
        KnockoutConfig {
            total_teams: 8,
            ..KnockoutConfig::default()
        }
        .into()
    }

    /// Delegates to a [`MemoryStore`] but fails the next `failures` round inserts.
    struct FlakyStore {
        inner: MemoryStore,
        failures: Cell<u32>,
    }

    impl FlakyStore {
        fn failing(failures: u32) -> Self {
            Self {
                inner: MemoryStore::new(),
                failures: Cell::new(failures),
            }
        }
    }

    impl PoolStore for FlakyStore {
        fn create_pool(&self, pool: &NewPool) -> Result<PoolId, StoreError> {
            self.inner.create_pool(pool)
        }

        fn delete_pool(&self, id: PoolId) -> Result<(), StoreError> {
            self.inner.delete_pool(id)
        }

        fn get_pool(&self, id: PoolId) -> Result<Option<Pool>, StoreError> {
            self.inner.get_pool(id)
        }

        fn set_lifecycle(&self, id: PoolId, lifecycle: Lifecycle) -> Result<(), StoreError> {
            self.inner.set_lifecycle(id, lifecycle)
        }

        fn update_structure(
            &self,
            id: PoolId,
            format: CompetitionFormat,
            total_rounds: u32,
            total_match_capacity: u32,
        ) -> Result<(), StoreError> {
            self.inner
                .update_structure(id, format, total_rounds, total_match_capacity)
        }

        fn insert_rounds(&self, id: PoolId, rounds: &[RoundRow]) -> Result<(), StoreError> {
            let failures = self.failures.get();

            if failures > 0 {
                self.failures.set(failures - 1);
                return Err(StoreError::Backend(String::from("connection reset")));
            }

            self.inner.insert_rounds(id, rounds)
        }

        fn delete_rounds(&self, id: PoolId) -> Result<(), StoreError> {
            self.inner.delete_rounds(id)
        }

        fn rounds(&self, id: PoolId) -> Result<Vec<RoundRow>, StoreError> {
            self.inner.rounds(id)
        }

        fn edit_locks(&self, id: PoolId) -> Result<EditLocks, StoreError> {
            self.inner.edit_locks(id)
        }
    }

    #[test]
    fn test_create_confirms_pool() {
        let store = MemoryStore::new();

        let id = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap();

        let pool = store.get_pool(id).unwrap().unwrap();
        assert_eq!(pool.lifecycle, Lifecycle::Confirmed);
        assert_eq!(pool.format, CompetitionFormat::Knockout);
        assert_eq!(pool.total_rounds, 3);
        assert_eq!(pool.total_match_capacity, 7);

        let rounds = store.rounds(id).unwrap();
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0].label, "Quarter-finals");
        assert_eq!(rounds[2].label, "Final");
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let store = MemoryStore::new();
        let config: CompetitionConfig = KnockoutConfig {
            total_teams: 12,
            ..KnockoutConfig::default()
        }
        .into();

        let err =
            create_pool_with_plan(&store, String::from("Bad"), date(), &config, None).unwrap_err();

        assert!(matches!(err, CommitError::Rejected(ref violations) if violations.len() == 1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_retries_transient_insert_failure() {
        let store = FlakyStore::failing(STEP_ATTEMPTS - 1);

        let id = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap();

        let pool = store.get_pool(id).unwrap().unwrap();
        assert_eq!(pool.lifecycle, Lifecycle::Confirmed);
        assert_eq!(store.rounds(id).unwrap().len(), 3);
    }

    #[test]
    fn test_create_rolls_back_header_on_persistent_failure() {
        let store = FlakyStore::failing(STEP_ATTEMPTS);

        let err = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, CommitError::Store(_)));
        // No orphaned draft pool survives the rollback.
        assert!(store.inner.is_empty());
    }

    #[test]
    fn test_reconfigure_replaces_rounds() {
        let store = MemoryStore::new();
        let id = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap();

        let config: CompetitionConfig = CupConfig {
            total_teams: 32,
            total_groups: 8,
            classified_per_group: 2,
            ..CupConfig::default()
        }
        .into();

        reconfigure_pool(&store, id, &config, None).unwrap();

        let pool = store.get_pool(id).unwrap().unwrap();
        assert_eq!(pool.lifecycle, Lifecycle::Confirmed);
        assert_eq!(pool.format, CompetitionFormat::Cup);
        assert_eq!(pool.total_rounds, 12);
        assert_eq!(pool.total_match_capacity, 63);

        let rounds = store.rounds(id).unwrap();
        assert_eq!(rounds.len(), 12);
        assert_eq!(rounds[0].label, "Group A");
        // Nothing of the old three-round knockout plan survives at its old spot.
        assert_eq!(rounds[1].label, "Group B");
        assert_eq!(rounds[2].label, "Group C");
        assert_eq!(
            rounds
                .iter()
                .map(|round| round.sequence_number)
                .collect::<Vec<_>>(),
            (1..=12).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_reconfigure_rejected_while_locked() {
        let store = MemoryStore::new();
        let id = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap();

        store.set_edit_locks(
            id,
            EditLocks {
                finalized_rounds: 1,
                recorded_results: 2,
            },
        );

        let before = store.rounds(id).unwrap();
        let err = reconfigure_pool(
            &store,
            id,
            &CompetitionConfig::Standard(StandardConfig::default()),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, CommitError::EditLocked(locks) if locks.finalized_rounds == 1));
        // The precondition ran before any deletion: every round row survives.
        assert_eq!(store.rounds(id).unwrap(), before);
        assert_eq!(
            store.get_pool(id).unwrap().unwrap().lifecycle,
            Lifecycle::Confirmed
        );
    }

    #[test]
    fn test_reconfigure_leaves_draft_on_persistent_failure() {
        let store = FlakyStore::failing(0);
        let id = create_pool_with_plan(
            &store,
            String::from("Copa 2024"),
            date(),
            &knockout_config(),
            None,
        )
        .unwrap();

        store.failures.set(STEP_ATTEMPTS);

        let err = reconfigure_pool(&store, id, &knockout_config(), None).unwrap_err();

        assert!(matches!(err, CommitError::Store(_)));
        // The pool stays an explicit draft instead of a half-written confirmed one.
        assert_eq!(
            store.get_pool(id).unwrap().unwrap().lifecycle,
            Lifecycle::Draft
        );
    }

    #[test]
    fn test_create_applies_tier_policy() {
        let store = MemoryStore::new();
        let policy = bolao_core::TierPolicy {
            max_teams: 4,
            max_groups: 1,
            max_matches: 10,
        };

        let err = create_pool_with_plan(
            &store,
            String::from("Too big"),
            date(),
            &knockout_config(),
            Some(&policy),
        )
        .unwrap_err();

        assert!(matches!(err, CommitError::Rejected(_)));
        assert!(store.is_empty());
    }
}
