//! Recycling pool for game-state objects.
//!
//! A deep recursive search materialises one child state per visited node.
//! Allocating those afresh is pure churn, so the searchers draw them from a
//! [`StatePool`]: a free list plus a checked-out set behind a single lock.
//! Every state object is in exactly one of the two collections at any time;
//! a checkout moves it out (constructing one only when the free list is
//! empty and capacity allows) and a checkin moves it back.
//!
//! The pool is never resized: it is either unbounded or capped at
//! construction, and checking out past the cap fails with
//! [`SearchError::PoolExhausted`].

use crate::error::SearchError;
use crate::game::GameState;
use log::trace;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

// Checkout ids are unique across every pool in the process, so a state
// checked out of one pool can never pass another pool's checkin test.
static NEXT_CHECKOUT_ID: AtomicU64 = AtomicU64::new(0);

/// Factory used to construct pool slots on demand.
pub type StateFactory<S> = Box<dyn Fn() -> Result<S, SearchError> + Send + Sync>;

/// A state checked out of a [`StatePool`].
///
/// Carries the pool-issued id that proves provenance on checkin. Dropping a
/// `Pooled` without checking it back in permanently leaks one unit of pool
/// capacity, so searchers release children on every path, including error
/// unwinds.
#[derive(Debug)]
pub struct Pooled<S> {
    id: u64,
    state: S,
}

impl<S> Pooled<S> {
    /// The pool-issued checkout id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<S> Deref for Pooled<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

impl<S> DerefMut for Pooled<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

struct PoolInner<S> {
    available: Vec<S>,
    checked_out: HashSet<u64>,
    created: usize,
}

/// Recycling pool of [`GameState`] objects.
///
/// Checkout and checkin are mutually exclusive critical sections guarded by
/// one lock; the operations are O(1) list moves, so the coarse region is
/// cheap and keeps the invariant simple even when a watchdog thread shares
/// the pool with the search thread.
///
/// Lifecycle hooks run with the lock held: `on_checkout`/`on_recycle`/
/// `on_checkin` must not call back into the pool.
pub struct StatePool<S: GameState> {
    inner: Mutex<PoolInner<S>>,
    factory: StateFactory<S>,
    max_objects: Option<usize>,
}

impl<S: GameState> StatePool<S> {
    /// Pool constructing states through `factory`, holding at most
    /// `max_objects` of them (`None` = unbounded).
    pub fn with_factory<F>(max_objects: Option<usize>, factory: F) -> Self
    where
        F: Fn() -> Result<S, SearchError> + Send + Sync + 'static,
    {
        StatePool {
            inner: Mutex::new(PoolInner {
                available: Vec::new(),
                checked_out: HashSet::new(),
                created: 0,
            }),
            factory: Box::new(factory),
            max_objects,
        }
    }

    /// Pool over a `Default`-constructible state type.
    pub fn new(max_objects: Option<usize>) -> Self
    where
        S: Default,
    {
        Self::with_factory(max_objects, || Ok(S::default()))
    }

    /// Check a ready-to-use state out of the pool.
    ///
    /// A recycled state gets `on_recycle(params)`; a freshly constructed one
    /// gets `initialise()` followed by `on_checkout(params)`.
    pub fn checkout(&self, params: &S::Params) -> Result<Pooled<S>, SearchError> {
        let mut inner = self.lock()?;

        // Every checkout yields a start-of-game state: recycled objects are
        // re-initialised, fresh ones initialised once after construction.
        let state = match inner.available.pop() {
            Some(mut state) => {
                state.initialise();
                state.on_recycle(params);
                state
            }
            None => {
                if let Some(max) = self.max_objects {
                    if inner.created >= max {
                        return Err(SearchError::PoolExhausted { capacity: max });
                    }
                }
                let mut state = (self.factory)()
                    .map_err(|e| SearchError::Pool(format!("state construction failed: {e}")))?;
                inner.created += 1;
                trace!("state pool grew to {} objects", inner.created);
                state.initialise();
                state.on_checkout(params);
                state
            }
        };

        let id = NEXT_CHECKOUT_ID.fetch_add(1, Ordering::Relaxed);
        inner.checked_out.insert(id);
        Ok(Pooled { id, state })
    }

    /// Return a state to the free list after running its `on_checkin` hook.
    ///
    /// Returns `false` (and drops the state) if it was not checked out from
    /// this pool.
    pub fn checkin(&self, mut pooled: Pooled<S>) -> bool {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(_) => return false,
        };
        if !inner.checked_out.remove(&pooled.id) {
            return false;
        }
        pooled.state.on_checkin();
        inner.available.push(pooled.state);
        true
    }

    /// Number of states currently checked out.
    pub fn checked_out_count(&self) -> usize {
        self.lock().map(|inner| inner.checked_out.len()).unwrap_or(0)
    }

    /// Number of states sitting on the free list.
    pub fn available_count(&self) -> usize {
        self.lock().map(|inner| inner.available.len()).unwrap_or(0)
    }

    /// Capacity bound given at construction, if any.
    pub fn max_objects(&self) -> Option<usize> {
        self.max_objects
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, PoolInner<S>>, SearchError> {
        self.inner
            .lock()
            .map_err(|_| SearchError::Pool("state pool lock poisoned".into()))
    }
}

impl<S: GameState> std::fmt::Debug for StatePool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatePool")
            .field("available", &self.available_count())
            .field("checked_out", &self.checked_out_count())
            .field("max_objects", &self.max_objects)
            .finish()
    }
}
