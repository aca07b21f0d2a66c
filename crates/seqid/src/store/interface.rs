use std::sync::Arc;

use crate::StoreError;

/// A persisted record carrying a string identifier.
pub trait IdRecord {
    /// The identifier field of this record.
    fn id(&self) -> &str;
}

impl IdRecord for String {
    fn id(&self) -> &str {
        self
    }
}

/// The read-only query surface an allocator needs from a document store.
///
/// Implementations are free to return richer records than a bare identifier;
/// the allocators only ever look at [`IdRecord::id`].
pub trait IdStore: Send + Sync {
    /// The record type returned by queries.
    type Record: IdRecord + Send;

    /// Returns the stored record whose identifier matches `^<prefix>\d+$` and
    /// carries the numerically greatest suffix, or `None` if no record
    /// matches.
    ///
    /// Stores should compare suffixes numerically (see
    /// [`crate::compare_suffix`]) rather than relying on string order, which is
    /// only equivalent while every stored suffix has the same width.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    fn find_highest_matching(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<Self::Record>, StoreError>> + Send;

    /// Returns the record whose identifier is exactly `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend cannot be queried.
    fn find_exact(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Self::Record>, StoreError>> + Send;
}

/// A store able to atomically increment and fetch a per-prefix counter.
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter for `prefix` and returns the new
    /// value. The first call for a prefix returns `1` unless the store seeds
    /// the counter from existing data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the backend cannot be reached
    /// or the counter cannot advance, and [`StoreError::Malformed`] when the
    /// counter would be seeded from an identifier whose suffix cannot be
    /// parsed.
    fn increment(&self, prefix: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// The write side used by callers to confirm an allocated identifier.
pub trait RecordSink: Send + Sync {
    /// The record type written.
    type Record: IdRecord + Send;

    /// Persists `record`.
    ///
    /// # Errors
    ///
    /// Must return [`StoreError::Duplicate`] when a record with the same
    /// identifier already exists, and [`StoreError::Unavailable`] on backend
    /// failure.
    fn insert(&self, record: Self::Record) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: IdStore> IdStore for Arc<S> {
    type Record = S::Record;

    fn find_highest_matching(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<Self::Record>, StoreError>> + Send {
        (**self).find_highest_matching(prefix)
    }

    fn find_exact(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Self::Record>, StoreError>> + Send {
        (**self).find_exact(id)
    }
}

impl<S: CounterStore> CounterStore for Arc<S> {
    fn increment(&self, prefix: &str) -> impl Future<Output = Result<u64, StoreError>> + Send {
        (**self).increment(prefix)
    }
}

impl<S: RecordSink> RecordSink for Arc<S> {
    type Record = S::Record;

    fn insert(&self, record: Self::Record) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert(record)
    }
}
