#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, CounterStore, Error, IdAllocator, Result, SequentialId, StoreError, SystemClock,
    TimeSource, fallback_id,
};

/// An allocator backed by an atomic per-prefix counter in the store.
///
/// Every call increments the prefix's counter and renders the returned value,
/// so concurrent callers can never observe the same number. There is no
/// probing and no retry loop.
///
/// Store failures are handled exactly like [`crate::ProbingAllocator`] does:
/// a timestamp-derived [`Allocation::Fallback`] is returned instead.
///
/// ## Recommended When
/// - Several processes allocate for the same prefix concurrently.
/// - The store offers an atomic increment (e.g. `$inc` with
///   `findOneAndUpdate`, `INCR`, `UPDATE ... RETURNING`).
#[derive(Debug, Clone)]
pub struct CounterAllocator<S, T = SystemClock> {
    store: S,
    clock: T,
}

impl<S> CounterAllocator<S>
where
    S: CounterStore,
{
    /// Creates an allocator over `store` using the system clock for fallback
    /// identifiers.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, T> CounterAllocator<S, T>
where
    S: CounterStore,
    T: TimeSource<u64>,
{
    /// Creates an allocator with an explicit [`TimeSource`].
    pub fn with_clock(store: S, clock: T) -> Self {
        Self { store, clock }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocates the next identifier for `prefix`.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedSuffix`] if the store cannot seed the counter because
    /// the highest stored identifier has an unparsable suffix. Every other
    /// store failure is absorbed into [`Allocation::Fallback`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn try_allocate(&self, prefix: &str) -> Result<Allocation> {
        match self.store.increment(prefix).await {
            Ok(sequence) => Ok(Allocation::Issued {
                id: SequentialId::new(prefix, sequence).to_string(),
            }),
            Err(StoreError::Malformed { id }) => Err(Error::MalformedSuffix { id }),
            Err(_err) => {
                let id = fallback_id(prefix, self.clock.current_millis());
                #[cfg(feature = "tracing")]
                tracing::warn!(prefix, %id, error = %_err, "counter unavailable, issuing fallback identifier");
                Ok(Allocation::Fallback { id })
            }
        }
    }
}

impl<S, T> IdAllocator for CounterAllocator<S, T>
where
    S: CounterStore,
    T: TimeSource<u64> + Send + Sync,
{
    async fn allocate(&self, prefix: &str) -> Result<String> {
        self.try_allocate(prefix).await.map(Allocation::into_id)
    }
}
