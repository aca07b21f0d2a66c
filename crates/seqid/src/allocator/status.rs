/// The outcome of a single allocation.
///
/// - [`Allocation::Issued`] is the first candidate computed from the highest
///   stored identifier.
/// - [`Allocation::Forced`] means the first candidate was already taken and
///   the one after it was free.
/// - [`Allocation::Fallback`] means the store could not be consulted and the
///   identifier was derived from the clock instead. It was never checked for
///   uniqueness.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "source", rename_all = "snake_case"))]
pub enum Allocation {
    /// The computed candidate was free.
    Issued {
        /// The allocated identifier.
        id: String,
    },
    /// The computed candidate was taken; the next one was free.
    Forced {
        /// The allocated identifier.
        id: String,
    },
    /// The store was unavailable; a timestamp-derived identifier was issued.
    Fallback {
        /// The allocated identifier.
        id: String,
    },
}

impl Allocation {
    /// The allocated identifier.
    pub fn id(&self) -> &str {
        match self {
            Self::Issued { id } | Self::Forced { id } | Self::Fallback { id } => id,
        }
    }

    /// Consumes the outcome, returning the identifier.
    pub fn into_id(self) -> String {
        match self {
            Self::Issued { id } | Self::Forced { id } | Self::Fallback { id } => id,
        }
    }

    /// Returns `true` if the identifier came from the fallback path.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
