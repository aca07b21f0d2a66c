/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by a persistence collaborator.
///
/// Stores translate their backend failures into one of these variants. The
/// allocators treat [`StoreError::Unavailable`] as transient and recover from
/// it by issuing a fallback identifier, while [`StoreError::Duplicate`] is the
/// signal a [`crate::ClaimingAllocator`] retries on. [`StoreError::Malformed`]
/// surfaces as [`Error::MalformedSuffix`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend could not be reached or failed to answer the query.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Backend-specific description of the failure.
        reason: String,
    },

    /// A write was rejected because the identifier is already stored.
    #[error("identifier `{id}` already exists")]
    Duplicate {
        /// The identifier that collided.
        id: String,
    },

    /// A stored identifier matches the prefix but its numeric suffix does not
    /// fit a `u64`, so no sequence can be derived from it.
    #[error("stored identifier `{id}` has no parsable numeric suffix")]
    Malformed {
        /// The offending stored identifier.
        id: String,
    },
}

impl StoreError {
    /// Shorthand for [`StoreError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// All errors that `seqid` can surface to callers.
///
/// Store connectivity failures never show up here from
/// [`crate::IdAllocator::allocate`]; they are absorbed into the fallback path.
/// The only store errors a caller sees come from the write side of a
/// [`crate::ClaimingAllocator`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Every candidate examined within the retry bound was already taken.
    ///
    /// The caller may retry the whole operation later or report the failure
    /// upstream.
    #[error("allocator contention on prefix `{prefix}` after {attempts} attempts")]
    Contention {
        /// The prefix being allocated.
        prefix: String,
        /// How many rounds were attempted before giving up.
        attempts: u32,
    },

    /// The highest stored identifier for a prefix does not end in a parsable
    /// decimal number.
    #[error("identifier `{id}` has no parsable numeric suffix")]
    MalformedSuffix {
        /// The offending stored identifier.
        id: String,
    },

    /// The next sequence number does not fit in a `u64`.
    #[error("sequence space exhausted after `{id}`")]
    SequenceExhausted {
        /// The stored identifier carrying the maximum sequence number.
        id: String,
    },

    /// A store error surfaced by a write.
    #[error(transparent)]
    Store(#[from] StoreError),
}
