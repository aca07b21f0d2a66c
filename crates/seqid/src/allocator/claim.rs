#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdAllocator, RecordSink, Result, StoreError};

/// Default number of allocate-then-write rounds before giving up.
pub const DEFAULT_CLAIM_ATTEMPTS: u32 = 5;

/// Couples an allocator with the write that confirms its identifier.
///
/// An allocator only proposes a candidate; the identifier is confirmed once a
/// record carrying it is persisted. When the store enforces uniqueness, a
/// concurrent caller may win that write. `ClaimingAllocator` treats
/// allocation and write as one unit and repeats both whenever the write is
/// rejected with [`StoreError::Duplicate`].
///
/// # Example
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> seqid::Result<()> {
/// use std::sync::Arc;
/// use seqid::{ClaimingAllocator, MemoryStore, ProbingAllocator};
///
/// let store = Arc::new(MemoryStore::new());
/// let claims = ClaimingAllocator::new(ProbingAllocator::new(store.clone()), store.clone());
///
/// assert_eq!(claims.claim("RA-PG").await?, "RA-PG0001");
/// assert_eq!(claims.claim("RA-PG").await?, "RA-PG0002");
/// assert!(store.contains("RA-PG0002"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClaimingAllocator<A, K> {
    allocator: A,
    sink: K,
    max_attempts: u32,
}

impl<A, K> ClaimingAllocator<A, K>
where
    A: IdAllocator,
    K: RecordSink,
{
    /// Creates a claiming allocator that allocates with `allocator` and
    /// persists into `sink`.
    pub fn new(allocator: A, sink: K) -> Self {
        Self {
            allocator,
            sink,
            max_attempts: DEFAULT_CLAIM_ATTEMPTS,
        }
    }

    /// Sets the number of allocate-then-write rounds. Values below 1 are
    /// raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The wrapped allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// The sink records are written to.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Allocates an identifier for `prefix` and persists the record built by
    /// `make_record`, retrying both on a duplicate-key rejection.
    ///
    /// # Errors
    ///
    /// - Any error from [`IdAllocator::allocate`].
    /// - [`Error::Contention`] if every round's write was rejected as a
    ///   duplicate.
    /// - [`Error::Store`] if the write failed for another reason.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, make_record)))]
    pub async fn claim_with<F>(&self, prefix: &str, make_record: F) -> Result<String>
    where
        F: Fn(&str) -> K::Record + Send,
    {
        for _attempt in 1..=self.max_attempts {
            let id = self.allocator.allocate(prefix).await?;
            match self.sink.insert(make_record(&id)).await {
                Ok(()) => return Ok(id),
                Err(StoreError::Duplicate { .. }) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(prefix, %id, attempt = _attempt, "write lost the race, reallocating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(Error::Contention {
            prefix: prefix.to_owned(),
            attempts: self.max_attempts,
        })
    }
}

impl<A, K> ClaimingAllocator<A, K>
where
    A: IdAllocator,
    K: RecordSink<Record = String>,
{
    /// [`Self::claim_with`] for sinks whose records are bare identifiers.
    ///
    /// # Errors
    ///
    /// See [`Self::claim_with`].
    pub async fn claim(&self, prefix: &str) -> Result<String> {
        self.claim_with(prefix, str::to_owned).await
    }
}
