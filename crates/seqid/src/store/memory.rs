use std::{
    collections::{BTreeSet, HashMap},
    ops::Bound,
};

use parking_lot::Mutex;

use crate::{
    CounterStore, IdStore, RecordSink, SequentialId, StoreError, compare_suffix, matches_prefix,
};

/// An in-process store of issued identifiers.
///
/// Holds a sorted set of identifiers plus one counter per prefix. It enforces
/// identifier uniqueness on [`RecordSink::insert`], which makes it a faithful
/// stand-in for a document collection with a unique index on the identifier
/// field.
///
/// Counters are seeded lazily: the first [`CounterStore::increment`] for a
/// prefix starts from the highest identifier already stored under it, so
/// switching from probing to counter allocation never reissues a number. If
/// that identifier's suffix does not fit a `u64`, seeding fails with
/// [`StoreError::Malformed`] and the counter stays unseeded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    ids: BTreeSet<String>,
    counters: HashMap<String, u64>,
}

impl Inner {
    fn highest_matching(&self, prefix: &str) -> Option<&String> {
        self.ids
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|id| id.starts_with(prefix))
            .filter(|id| matches_prefix(id, prefix))
            .max_by(|a, b| compare_suffix(a, b))
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `ids`. Duplicates collapse.
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            inner: Mutex::new(Inner {
                ids: ids.into_iter().map(Into::into).collect(),
                counters: HashMap::new(),
            }),
        }
    }

    /// Inserts `id`, rejecting it if already present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if `id` is already stored.
    pub fn insert_id(&self, id: impl Into<String>) -> Result<(), StoreError> {
        let id = id.into();
        let mut inner = self.inner.lock();
        if inner.ids.contains(&id) {
            return Err(StoreError::Duplicate { id });
        }
        inner.ids.insert(id);
        Ok(())
    }

    /// Returns `true` if `id` is stored.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().ids.contains(id)
    }

    /// Number of stored identifiers.
    pub fn len(&self) -> usize {
        self.inner.lock().ids.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().ids.is_empty()
    }

    /// A sorted snapshot of every stored identifier.
    pub fn ids(&self) -> Vec<String> {
        self.inner.lock().ids.iter().cloned().collect()
    }
}

impl IdStore for MemoryStore {
    type Record = String;

    async fn find_highest_matching(&self, prefix: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().highest_matching(prefix).cloned())
    }

    async fn find_exact(&self, id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().ids.get(id).cloned())
    }
}

impl CounterStore for MemoryStore {
    async fn increment(&self, prefix: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock();
        let current = match inner.counters.get(prefix) {
            Some(&value) => value,
            None => match inner.highest_matching(prefix) {
                Some(id) => SequentialId::parse(prefix, id)
                    .ok_or_else(|| StoreError::Malformed { id: id.clone() })?
                    .sequence(),
                None => 0,
            },
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::unavailable(format!("counter for `{prefix}` exhausted")))?;
        inner.counters.insert(prefix.to_owned(), next);
        Ok(next)
    }
}

impl RecordSink for MemoryStore {
    type Record = String;

    async fn insert(&self, record: String) -> Result<(), StoreError> {
        self.insert_id(record)
    }
}
