use std::sync::Arc;

use crate::Result;

/// A minimal interface for allocating prefixed identifiers.
///
/// Allocation only reads from the backing store. The returned identifier is a
/// candidate until the caller persists a record carrying it; see
/// [`crate::ClaimingAllocator`] for doing both as one unit.
///
/// Allocation is deliberately not idempotent: two calls for the same prefix
/// with a write in between yield two different identifiers.
pub trait IdAllocator: Send + Sync {
    /// Returns the next identifier for `prefix`.
    ///
    /// Store connectivity failures are absorbed: the allocator issues a
    /// timestamp-derived fallback identifier instead of failing.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Contention`] when every candidate within the retry
    ///   bound was taken.
    /// - [`crate::Error::MalformedSuffix`] or
    ///   [`crate::Error::SequenceExhausted`] when the stored data cannot yield a
    ///   next number.
    fn allocate(&self, prefix: &str) -> impl Future<Output = Result<String>> + Send;
}

impl<A: IdAllocator> IdAllocator for Arc<A> {
    fn allocate(&self, prefix: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).allocate(prefix)
    }
}
