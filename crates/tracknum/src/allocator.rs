use tracing::debug;

use crate::{
    config::{AllocStrategy, AllocatorConfig},
    error::{Error, Result},
    rand::RandSource,
    random_native::ThreadRandom,
    request::{Request, Status, TrackingId},
    store::{RequestStore, StoreError},
    time::{TimeSource, WallClock},
};

/// Assigns a unique tracking number and durably records the request under it.
///
/// Concurrent callers race for the same identifier namespace without a
/// central sequencer; the only synchronization is the store's uniqueness
/// constraint. The allocator never holds a lock: it proposes candidates,
/// attempts a constraint-backed insert, and treats [`StoreError::DuplicateId`]
/// as "lost the race, draw again" up to a bounded budget. Any other store
/// failure aborts immediately.
///
/// All effects are injected: the store, the RNG, and the clock are trait
/// parameters, so the whole component runs against [`MemoryStore`] in tests.
///
/// # Example
///
/// ```
/// use tracknum::{Allocator, AllocatorConfig, MemoryStore, Status};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = MemoryStore::new();
/// let allocator = Allocator::new(store.clone(), AllocatorConfig::default());
///
/// let request = allocator.allocate("Jane Doe", None).await.unwrap();
/// assert_eq!(request.status, Status::InProgress);
/// assert!((1000..=9999).contains(&request.id.value()));
/// # });
/// ```
///
/// [`MemoryStore`]: crate::MemoryStore
pub struct Allocator<S, R = ThreadRandom, C = WallClock> {
    store: S,
    rand: R,
    clock: C,
    config: AllocatorConfig,
}

impl<S> Allocator<S>
where
    S: RequestStore,
{
    /// Creates an allocator with the thread-local RNG and the system clock.
    pub fn new(store: S, config: AllocatorConfig) -> Self {
        Self::with_parts(store, ThreadRandom, WallClock, config)
    }
}

impl<S, R, C> Allocator<S, R, C>
where
    S: RequestStore,
    R: RandSource,
    C: TimeSource,
{
    /// Creates an allocator with an explicit RNG and clock, for tests that
    /// script candidate sequences or pin timestamps.
    pub fn with_parts(store: S, rand: R, clock: C, config: AllocatorConfig) -> Self {
        Self {
            store,
            rand,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates a fresh tracking number and stores the request under it.
    ///
    /// The name is validated before any remote call; the new request always
    /// starts as [`Status::InProgress`].
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyName`] for an empty or whitespace-only name.
    /// - [`Error::InvalidConfig`] for an unusable identifier range.
    /// - [`Error::CollisionExhausted`] when every attempt in the budget lost
    ///   its race or landed on a taken identifier. No request was created.
    /// - [`Error::Store`] for any non-collision store failure, surfaced
    ///   verbatim after aborting the loop.
    pub async fn allocate(&self, display_name: &str, notes: Option<String>) -> Result<Request> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        self.config.validate()?;

        let budget = self.config.max_attempts.get();
        for attempt in 1..=budget {
            let candidate = match self.propose(attempt).await? {
                Some(candidate) => candidate,
                // Probe hit an existing row: the attempt is spent.
                None => continue,
            };

            let request = Request {
                id: candidate,
                display_name: name.to_owned(),
                status: Status::InProgress,
                notes: notes.clone(),
                created_at_ms: self.clock.current_millis(),
            };

            match self.store.insert(&request).await {
                Ok(()) => {
                    debug!(id = %candidate, attempt, "allocated tracking number");
                    return Ok(request);
                }
                Err(StoreError::DuplicateId(id)) => {
                    // Lost the probe-to-insert race; only the constraint
                    // violation is trusted as a collision signal.
                    debug!(id = %id, attempt, "tracking number taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(Error::CollisionExhausted { attempts: budget })
    }

    /// Proposes the next candidate, or `None` when the optimistic probe found
    /// the row already taken.
    async fn propose(&self, attempt: u32) -> Result<Option<TrackingId>> {
        match self.config.strategy {
            AllocStrategy::RandomProbe { floor, ceiling } => {
                let candidate = TrackingId::new(self.rand.random_in(floor, ceiling));
                if self.store.find(candidate).await?.is_some() {
                    debug!(id = %candidate, attempt, "probe found existing row");
                    return Ok(None);
                }
                Ok(Some(candidate))
            }
            AllocStrategy::MonotonicNext { floor } => {
                let candidate = match self.store.find_max_id().await? {
                    Some(max) => max.next(),
                    None => TrackingId::new(floor),
                };
                Ok(Some(candidate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use core::num::NonZeroU32;
    use std::collections::VecDeque;

    use super::*;
    use crate::memory::MemoryStore;

    /// Replays a scripted candidate sequence, then falls back to the floor.
    struct ScriptedRand {
        values: RefCell<VecDeque<u32>>,
    }

    impl ScriptedRand {
        fn new(values: impl IntoIterator<Item = u32>) -> Self {
            Self {
                values: RefCell::new(values.into_iter().collect()),
            }
        }
    }

    impl RandSource for ScriptedRand {
        fn random_in(&self, floor: u32, _ceiling: u32) -> u32 {
            self.values.borrow_mut().pop_front().unwrap_or(floor)
        }
    }

    struct FixedTime(u64);

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    fn config(floor: u32, ceiling: u32, attempts: u32) -> AllocatorConfig {
        AllocatorConfig {
            strategy: AllocStrategy::RandomProbe { floor, ceiling },
            max_attempts: NonZeroU32::new(attempts).unwrap(),
        }
    }

    #[tokio::test]
    async fn rejects_blank_name_before_any_store_call() {
        let store = MemoryStore::new();
        store.set_offline(true); // any remote call would fail loudly
        let allocator = Allocator::new(store, AllocatorConfig::default());

        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                allocator.allocate(name, None).await,
                Err(Error::EmptyName)
            ));
        }
    }

    #[tokio::test]
    async fn retries_past_taken_candidates() {
        let store = MemoryStore::new();
        let seeded = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([1700]),
            FixedTime(10),
            config(1000, 9999, 5),
        );
        seeded.allocate("First", None).await.unwrap();

        // 1700 is taken, 1701 is taken, 1702 is free.
        let seeded2 = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([1701]),
            FixedTime(20),
            config(1000, 9999, 5),
        );
        seeded2.allocate("Second", None).await.unwrap();

        let allocator = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([1700, 1701, 1702]),
            FixedTime(30),
            config(1000, 9999, 5),
        );
        let request = allocator.allocate("Third", None).await.unwrap();

        assert_eq!(request.id, TrackingId::new(1702));
        assert_eq!(store.row_count(), 3);
    }

    #[tokio::test]
    async fn saturated_space_exhausts_exact_budget_with_no_inserts() {
        let store = MemoryStore::new();
        // Saturate a tiny 3-slot space.
        let seeder = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([100, 101, 102]),
            FixedTime(0),
            config(100, 102, 3),
        );
        for name in ["a", "b", "c"] {
            seeder.allocate(name, None).await.unwrap();
        }
        assert_eq!(store.row_count(), 3);

        let allocator = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([100, 101, 102, 100, 101, 102, 100]),
            FixedTime(0),
            config(100, 102, 7),
        );
        let err = allocator.allocate("late", None).await.unwrap_err();

        assert!(matches!(err, Error::CollisionExhausted { attempts: 7 }));
        assert_eq!(store.row_count(), 3);
    }

    #[tokio::test]
    async fn monotonic_starts_at_floor_then_increments() {
        let store = MemoryStore::new();
        let allocator = Allocator::new(
            store.clone(),
            AllocatorConfig {
                strategy: AllocStrategy::MonotonicNext { floor: 1000 },
                max_attempts: NonZeroU32::new(5).unwrap(),
            },
        );

        let first = allocator.allocate("First", None).await.unwrap();
        let second = allocator.allocate("Second", None).await.unwrap();
        let third = allocator.allocate("Third", None).await.unwrap();

        assert_eq!(first.id, TrackingId::new(1000));
        assert_eq!(second.id, TrackingId::new(1001));
        assert_eq!(third.id, TrackingId::new(1002));
    }

    #[tokio::test]
    async fn store_failure_aborts_without_retrying() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let allocator = Allocator::new(store, AllocatorConfig::default());

        let err = allocator.allocate("Jane Doe", None).await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Unreachable { .. })));
    }

    #[tokio::test]
    async fn invalid_range_is_rejected_up_front() {
        let allocator = Allocator::new(MemoryStore::new(), config(9999, 1000, 5));
        assert!(matches!(
            allocator.allocate("Jane Doe", None).await,
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[tokio::test]
    async fn allocated_request_carries_clock_and_notes() {
        let store = MemoryStore::new();
        let allocator = Allocator::with_parts(
            store.clone(),
            ScriptedRand::new([4821]),
            FixedTime(1_735_689_600_000),
            config(1000, 9999, 5),
        );

        let request = allocator
            .allocate("  Jane Doe  ", Some("passport copy attached".to_owned()))
            .await
            .unwrap();

        assert_eq!(request.display_name, "Jane Doe");
        assert_eq!(request.created_at_ms, 1_735_689_600_000);
        assert_eq!(request.notes.as_deref(), Some("passport copy attached"));

        let stored = store.find(request.id).await.unwrap().unwrap();
        assert_eq!(stored, request);
    }
}
