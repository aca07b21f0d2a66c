#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, Error, IdAllocator, IdRecord, IdStore, Result, SequentialId, StoreError,
    SystemClock, TimeSource, fallback_id, split_suffix,
};

/// Default number of probing rounds before giving up with
/// [`Error::Contention`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// An allocator that derives the next identifier from the highest one already
/// stored, then probes the store to confirm the candidate is free.
///
/// Each round:
///
/// 1. Looks up the stored identifier with the greatest numeric suffix for the
///    prefix, and takes `suffix + 1` (or `1` if nothing is stored).
/// 2. Probes that candidate. If free, it is returned as
///    [`Allocation::Issued`].
/// 3. Otherwise probes the candidate after it. If free, it is returned as
///    [`Allocation::Forced`].
/// 4. Otherwise starts a new round from step 1, up to `max_attempts` rounds.
///
/// If any store query fails, the allocator stops probing and returns
/// [`Allocation::Fallback`] with `prefix` followed by the last 8 digits of the
/// current Unix time in milliseconds.
///
/// ## Concurrency
///
/// Nothing is reserved. Two callers may observe the same highest record and
/// both return the same free candidate; the final probe and the caller's write
/// are not atomic. A unique index on the identifier field, combined with
/// [`crate::ClaimingAllocator`], closes the gap at the caller. For a race-free
/// scheme use [`crate::CounterAllocator`].
///
/// ## See Also
/// - [`CounterAllocator`]
/// - [`ClaimingAllocator`]
///
/// [`CounterAllocator`]: crate::CounterAllocator
/// [`ClaimingAllocator`]: crate::ClaimingAllocator
#[derive(Debug, Clone)]
pub struct ProbingAllocator<S, T = SystemClock> {
    store: S,
    clock: T,
    max_attempts: u32,
}

impl<S> ProbingAllocator<S>
where
    S: IdStore,
{
    /// Creates an allocator over `store` using the system clock for fallback
    /// identifiers.
    ///
    /// # Example
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> seqid::Result<()> {
    /// use seqid::{MemoryStore, ProbingAllocator};
    ///
    /// let allocator = ProbingAllocator::new(MemoryStore::with_ids(["RA-COMRESH0001"]));
    /// let id = allocator.try_allocate("RA-COMRESH").await?;
    /// assert_eq!(id.id(), "RA-COMRESH0002");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S, T> ProbingAllocator<S, T>
where
    S: IdStore,
    T: TimeSource<u64>,
{
    /// Creates an allocator with an explicit [`TimeSource`] for fallback
    /// identifiers.
    pub fn with_clock(store: S, clock: T) -> Self {
        Self {
            store,
            clock,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Sets the number of probing rounds. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configured number of probing rounds.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Allocates the next identifier for `prefix`, reporting how it was
    /// obtained.
    ///
    /// # Errors
    ///
    /// - [`Error::Contention`] if every round found both candidates taken.
    /// - [`Error::MalformedSuffix`] if the highest stored identifier does not
    ///   end in a decimal number that fits a `u64`.
    /// - [`Error::SequenceExhausted`] if the next number would overflow.
    ///
    /// Store failures are never returned; they produce
    /// [`Allocation::Fallback`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn try_allocate(&self, prefix: &str) -> Result<Allocation> {
        match self.probe(prefix).await {
            Err(Error::Store(StoreError::Malformed { id })) => Err(Error::MalformedSuffix { id }),
            Err(Error::Store(_err)) => {
                let id = fallback_id(prefix, self.clock.current_millis());
                #[cfg(feature = "tracing")]
                tracing::warn!(prefix, %id, error = %_err, "store unavailable, issuing fallback identifier");
                Ok(Allocation::Fallback { id })
            }
            other => other,
        }
    }

    async fn probe(&self, prefix: &str) -> Result<Allocation> {
        for _attempt in 1..=self.max_attempts {
            let candidate = self.next_candidate(prefix).await?;
            let id = candidate.to_string();
            if self.store.find_exact(&id).await?.is_none() {
                return Ok(Allocation::Issued { id });
            }

            let forced = candidate
                .successor()
                .ok_or_else(|| Error::SequenceExhausted { id: id.clone() })?
                .to_string();
            #[cfg(feature = "tracing")]
            tracing::debug!(prefix, taken = %id, %forced, attempt = _attempt, "candidate taken, forcing next");
            if self.store.find_exact(&forced).await?.is_none() {
                return Ok(Allocation::Forced { id: forced });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::error!(prefix, attempts = self.max_attempts, "allocator contention");
        Err(Error::Contention {
            prefix: prefix.to_owned(),
            attempts: self.max_attempts,
        })
    }

    async fn next_candidate(&self, prefix: &str) -> Result<SequentialId> {
        let Some(record) = self.store.find_highest_matching(prefix).await? else {
            return Ok(SequentialId::new(prefix, 1));
        };
        let id = record.id();
        let sequence: u64 = split_suffix(id)
            .and_then(|(_, digits)| digits.parse().ok())
            .ok_or_else(|| Error::MalformedSuffix { id: id.to_owned() })?;
        let next = sequence
            .checked_add(1)
            .ok_or_else(|| Error::SequenceExhausted { id: id.to_owned() })?;
        Ok(SequentialId::new(prefix, next))
    }
}

impl<S, T> IdAllocator for ProbingAllocator<S, T>
where
    S: IdStore,
    T: TimeSource<u64> + Send + Sync,
{
    async fn allocate(&self, prefix: &str) -> Result<String> {
        self.try_allocate(prefix).await.map(Allocation::into_id)
    }
}
