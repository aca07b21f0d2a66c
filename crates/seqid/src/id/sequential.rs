use core::fmt;

use super::suffix::matches_prefix;

/// Minimum number of digits in a rendered sequence number.
pub const SEQUENCE_WIDTH: usize = 4;

/// A prefixed, zero-padded sequential identifier such as `RA-COMRESH0042`.
///
/// The rendered form is the prefix followed by the sequence number padded with
/// leading zeros to [`SEQUENCE_WIDTH`] digits. Numbers that need more digits
/// simply widen; nothing is ever truncated.
///
/// Ordering is by prefix, then by sequence number, which matches the numeric
/// order of the rendered identifiers within one prefix.
///
/// # Example
///
/// ```
/// use seqid::SequentialId;
///
/// let id = SequentialId::new("RA-COMRESH", 1);
/// assert_eq!(id.to_string(), "RA-COMRESH0001");
/// assert_eq!(SequentialId::new("RA-TEST", 10_000).to_string(), "RA-TEST10000");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequentialId {
    prefix: String,
    sequence: u64,
}

impl SequentialId {
    /// Creates an identifier from its components.
    pub fn new(prefix: impl Into<String>, sequence: u64) -> Self {
        Self {
            prefix: prefix.into(),
            sequence,
        }
    }

    /// Parses `s` as an identifier in the `prefix` namespace.
    ///
    /// Returns `None` unless `s` is exactly `prefix` followed by one or more
    /// ASCII digits whose value fits in a `u64`. Non-canonical widths such as
    /// `A1` or `A00012` are accepted; they render canonically afterwards.
    pub fn parse(prefix: &str, s: &str) -> Option<Self> {
        if !matches_prefix(s, prefix) {
            return None;
        }
        let sequence = s[prefix.len()..].parse().ok()?;
        Some(Self::new(prefix, sequence))
    }

    /// The category prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The numeric part.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The identifier following this one in the same prefix, or `None` if
    /// the sequence number would overflow.
    #[must_use]
    pub fn successor(&self) -> Option<Self> {
        self.sequence
            .checked_add(1)
            .map(|sequence| Self::new(self.prefix.clone(), sequence))
    }
}

impl fmt::Display for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.prefix,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl From<SequentialId> for String {
    fn from(id: SequentialId) -> Self {
        id.to_string()
    }
}
