use crate::{
    Allocation, ClaimingAllocator, CounterAllocator, CounterStore, Error, IdAllocator, IdStore,
    MemoryStore, ProbingAllocator, RecordSink, StoreError, TimeSource,
};
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

const NOW: u64 = 1_718_000_123_456;

struct FixedTime;

impl TimeSource<u64> for FixedTime {
    fn current_millis(&self) -> u64 {
        NOW
    }
}

/// Every query fails, as if the database were unreachable.
struct UnavailableStore;

impl IdStore for UnavailableStore {
    type Record = String;

    async fn find_highest_matching(&self, _prefix: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn find_exact(&self, _id: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

impl CounterStore for UnavailableStore {
    async fn increment(&self, _prefix: &str) -> Result<u64, StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

impl RecordSink for UnavailableStore {
    type Record = String;

    async fn insert(&self, _record: String) -> Result<(), StoreError> {
        Err(StoreError::unavailable("connection refused"))
    }
}

/// Answers the highest-matching query, then lets queued ids land before the
/// allocator gets to probe, like a concurrent writer would.
struct RacingStore {
    inner: MemoryStore,
    late: Mutex<Vec<String>>,
}

impl RacingStore {
    fn new(existing: &[&str], late: &[&str]) -> Self {
        Self {
            inner: MemoryStore::with_ids(existing.iter().copied()),
            late: Mutex::new(late.iter().map(|s| (*s).to_owned()).collect()),
        }
    }
}

impl IdStore for RacingStore {
    type Record = String;

    async fn find_highest_matching(&self, prefix: &str) -> Result<Option<String>, StoreError> {
        let highest = self.inner.find_highest_matching(prefix).await;
        for id in self.late.lock().drain(..) {
            self.inner.insert_id(id)?;
        }
        highest
    }

    async fn find_exact(&self, id: &str) -> Result<Option<String>, StoreError> {
        self.inner.find_exact(id).await
    }
}

/// Serves a fixed highest record and reports ids as taken per `taken`.
struct ScriptedStore {
    highest: Option<String>,
    taken: fn(&str) -> bool,
    exact_fails: bool,
    highest_queries: AtomicU32,
}

impl ScriptedStore {
    fn new(highest: Option<&str>, taken: fn(&str) -> bool) -> Self {
        Self {
            highest: highest.map(str::to_owned),
            taken,
            exact_fails: false,
            highest_queries: AtomicU32::new(0),
        }
    }
}

impl IdStore for ScriptedStore {
    type Record = String;

    async fn find_highest_matching(&self, _prefix: &str) -> Result<Option<String>, StoreError> {
        self.highest_queries.fetch_add(1, Ordering::Relaxed);
        Ok(self.highest.clone())
    }

    async fn find_exact(&self, id: &str) -> Result<Option<String>, StoreError> {
        if self.exact_fails {
            return Err(StoreError::unavailable("socket closed"));
        }
        Ok((self.taken)(id).then(|| id.to_owned()))
    }
}

/// Rejects the first `rejections` writes as duplicates.
struct RejectingSink {
    rejections: AtomicU32,
    accepted: Mutex<Vec<String>>,
}

impl RejectingSink {
    fn new(rejections: u32) -> Self {
        Self {
            rejections: AtomicU32::new(rejections),
            accepted: Mutex::new(Vec::new()),
        }
    }
}

impl RecordSink for RejectingSink {
    type Record = String;

    async fn insert(&self, record: String) -> Result<(), StoreError> {
        let remaining = self.rejections.load(Ordering::Relaxed);
        if remaining > 0 {
            self.rejections.store(remaining - 1, Ordering::Relaxed);
            return Err(StoreError::Duplicate { id: record });
        }
        self.accepted.lock().push(record);
        Ok(())
    }
}

fn suffix(id: &str, prefix: &str) -> u64 {
    id.strip_prefix(prefix).unwrap().parse().unwrap()
}

#[tokio::test]
async fn empty_store_starts_at_one() {
    let allocator = ProbingAllocator::new(MemoryStore::new());
    assert_eq!(allocator.allocate("RA-TEST").await.unwrap(), "RA-TEST0001");
    assert_eq!(
        allocator.allocate("RA-COMRESH").await.unwrap(),
        "RA-COMRESH0001"
    );
}

#[tokio::test]
async fn continues_after_highest_existing() {
    let allocator = ProbingAllocator::new(MemoryStore::with_ids(["RA-COMRESH0001"]));
    let allocation = allocator.try_allocate("RA-COMRESH").await.unwrap();
    assert_eq!(
        allocation,
        Allocation::Issued {
            id: "RA-COMRESH0002".into()
        }
    );
}

#[tokio::test]
async fn widens_past_four_digits() {
    let allocator = ProbingAllocator::new(MemoryStore::with_ids(["RA-TEST9999"]));
    assert_eq!(allocator.allocate("RA-TEST").await.unwrap(), "RA-TEST10000");
}

#[tokio::test]
async fn does_not_reissue_without_a_write() {
    let allocator = ProbingAllocator::new(MemoryStore::with_ids(["A0004"]));
    assert_eq!(allocator.allocate("A").await.unwrap(), "A0005");
    assert_eq!(allocator.allocate("A").await.unwrap(), "A0005");
}

#[tokio::test]
async fn sequential_allocations_increase_by_one() {
    let store = Arc::new(MemoryStore::with_ids(["RA-PG0017", "RA-PG0003"]));
    let allocator = ProbingAllocator::new(store.clone());

    let mut previous = 17;
    for _ in 0..25 {
        let id = allocator.allocate("RA-PG").await.unwrap();
        let n = suffix(&id, "RA-PG");
        assert_eq!(n, previous + 1);
        store.insert_id(id).unwrap();
        previous = n;
    }
}

#[tokio::test]
async fn legacy_narrow_suffixes_sort_numerically() {
    let allocator = ProbingAllocator::new(MemoryStore::with_ids(["A9", "A10"]));
    assert_eq!(allocator.allocate("A").await.unwrap(), "A0011");
}

#[tokio::test]
async fn forces_next_candidate_after_a_race() {
    let store = RacingStore::new(&["RA-COMRESH0001"], &["RA-COMRESH0002"]);
    let allocator = ProbingAllocator::new(store);
    let allocation = allocator.try_allocate("RA-COMRESH").await.unwrap();
    assert_eq!(
        allocation,
        Allocation::Forced {
            id: "RA-COMRESH0003".into()
        }
    );
}

#[tokio::test]
async fn restarts_when_forced_candidate_is_also_taken() {
    let store = RacingStore::new(&["A0001"], &["A0002", "A0003"]);
    let allocator = ProbingAllocator::new(store);
    // Second round sees A0003 as highest and issues A0004 directly.
    let allocation = allocator.try_allocate("A").await.unwrap();
    assert_eq!(allocation, Allocation::Issued { id: "A0004".into() });
}

#[tokio::test]
async fn falls_back_when_store_is_unreachable() {
    let allocator = ProbingAllocator::with_clock(UnavailableStore, FixedTime);
    let allocation = allocator.try_allocate("RA-COMSESH").await.unwrap();
    assert_eq!(
        allocation,
        Allocation::Fallback {
            id: "RA-COMSESH00123456".into()
        }
    );
}

#[tokio::test]
async fn fallback_with_system_clock_has_eight_digits() {
    let allocator = ProbingAllocator::new(UnavailableStore);
    let id = allocator.allocate("RA-COMSESH").await.unwrap();
    let digits = id.strip_prefix("RA-COMSESH").unwrap();
    assert_eq!(digits.len(), 8);
    assert!(digits.bytes().all(|b| b.is_ascii_digit()));
}

#[tokio::test]
async fn falls_back_when_probe_fails() {
    let mut store = ScriptedStore::new(Some("A0001"), |_| false);
    store.exact_fails = true;
    let allocator = ProbingAllocator::with_clock(store, FixedTime);
    let allocation = allocator.try_allocate("A").await.unwrap();
    assert!(allocation.is_fallback());
    assert_eq!(allocation.id(), "A00123456");
}

#[tokio::test]
async fn contention_is_bounded() {
    let store = ScriptedStore::new(Some("P0001"), |_| true);
    let allocator = ProbingAllocator::new(store).with_max_attempts(4);
    let err = allocator.allocate("P").await.unwrap_err();
    assert_eq!(
        err,
        Error::Contention {
            prefix: "P".into(),
            attempts: 4
        }
    );
    assert_eq!(allocator.store().highest_queries.load(Ordering::Relaxed), 4);
}

#[tokio::test]
async fn default_bound_is_ten_rounds() {
    let allocator = ProbingAllocator::new(ScriptedStore::new(Some("P0001"), |_| true));
    assert!(matches!(
        allocator.allocate("P").await,
        Err(Error::Contention { attempts: 10, .. })
    ));
    assert_eq!(allocator.store().highest_queries.load(Ordering::Relaxed), 10);
}

#[tokio::test]
async fn zero_attempts_still_probes_once() {
    let allocator = ProbingAllocator::new(MemoryStore::new()).with_max_attempts(0);
    assert_eq!(allocator.max_attempts(), 1);
    assert_eq!(allocator.allocate("Z").await.unwrap(), "Z0001");
}

#[tokio::test]
async fn malformed_suffix_fails_fast() {
    let allocator = ProbingAllocator::new(ScriptedStore::new(Some("RA-LEGACY"), |_| false));
    assert_eq!(
        allocator.allocate("RA-LEGACY").await.unwrap_err(),
        Error::MalformedSuffix {
            id: "RA-LEGACY".into()
        }
    );

    let too_wide = "A99999999999999999999999";
    let allocator = ProbingAllocator::new(ScriptedStore::new(Some(too_wide), |_| false));
    assert!(matches!(
        allocator.allocate("A").await,
        Err(Error::MalformedSuffix { .. })
    ));
}

#[tokio::test]
async fn sequence_exhaustion_is_reported() {
    let max = format!("A{}", u64::MAX);
    let allocator = ProbingAllocator::new(MemoryStore::with_ids([max.clone()]));
    assert_eq!(
        allocator.allocate("A").await.unwrap_err(),
        Error::SequenceExhausted { id: max }
    );
}

#[tokio::test]
async fn prefixes_are_isolated() {
    let store = Arc::new(MemoryStore::new());
    let allocator = ProbingAllocator::new(store.clone());

    for round in 1..=5u64 {
        for prefix in ["A", "B"] {
            let id = allocator.allocate(prefix).await.unwrap();
            assert_eq!(suffix(&id, prefix), round);
            store.insert_id(id).unwrap();
        }
    }
    // Longer prefixes sharing a head do not bleed into each other either.
    assert_eq!(allocator.allocate("AB").await.unwrap(), "AB0001");
}

#[tokio::test]
async fn counter_allocates_strictly_increasing_without_writes() {
    let allocator = CounterAllocator::new(MemoryStore::with_ids(["RA-COMRESH0009"]));
    assert_eq!(
        allocator.allocate("RA-COMRESH").await.unwrap(),
        "RA-COMRESH0010"
    );
    assert_eq!(
        allocator.allocate("RA-COMRESH").await.unwrap(),
        "RA-COMRESH0011"
    );
    assert_eq!(allocator.allocate("RA-PG").await.unwrap(), "RA-PG0001");
}

#[tokio::test]
async fn strategies_agree_on_unparsable_suffix() {
    let wide = "A99999999999999999999999";
    let store = Arc::new(MemoryStore::with_ids(["A0001", wide]));
    let expected = Error::MalformedSuffix { id: wide.into() };

    let probing = ProbingAllocator::new(store.clone());
    assert_eq!(probing.allocate("A").await.unwrap_err(), expected);

    let counter = CounterAllocator::with_clock(store.clone(), FixedTime);
    assert_eq!(counter.try_allocate("A").await.unwrap_err(), expected);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn counter_falls_back_when_store_is_unreachable() {
    let allocator = CounterAllocator::with_clock(UnavailableStore, FixedTime);
    assert_eq!(
        allocator.try_allocate("RA-PG").await.unwrap(),
        Allocation::Fallback {
            id: "RA-PG00123456".into()
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn counter_never_duplicates_under_concurrency() {
    const TASKS: u64 = 256;
    let allocator = Arc::new(CounterAllocator::new(MemoryStore::new()));

    let handles = (0..TASKS).map(|_| {
        let allocator = Arc::clone(&allocator);
        tokio::spawn(async move { allocator.allocate("C").await })
    });
    let ids: HashSet<String> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let expected: HashSet<String> = (1..=TASKS).map(|n| format!("C{n:04}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn claims_are_unique_under_concurrency() {
    const TASKS: u32 = 64;
    let store = Arc::new(MemoryStore::new());
    let claims = Arc::new(
        ClaimingAllocator::new(ProbingAllocator::new(store.clone()), store.clone())
            .with_max_attempts(TASKS),
    );

    let handles = (0..TASKS).map(|_| {
        let claims = Arc::clone(&claims);
        tokio::spawn(async move { claims.claim("RA-COMRESH").await })
    });
    let ids: HashSet<String> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(ids.len(), TASKS as usize);
    assert_eq!(store.len(), TASKS as usize);
}

#[tokio::test]
async fn claim_retries_duplicate_writes() {
    let claims = ClaimingAllocator::new(
        ProbingAllocator::new(MemoryStore::new()),
        RejectingSink::new(2),
    );
    assert_eq!(claims.claim("A").await.unwrap(), "A0001");
    assert_eq!(claims.sink().rejections.load(Ordering::Relaxed), 0);
    assert_eq!(*claims.sink().accepted.lock(), vec!["A0001".to_owned()]);
}

#[tokio::test]
async fn claim_gives_up_after_bound() {
    let claims = ClaimingAllocator::new(
        ProbingAllocator::new(MemoryStore::new()),
        RejectingSink::new(u32::MAX),
    )
    .with_max_attempts(3);
    assert_eq!(
        claims.claim("A").await.unwrap_err(),
        Error::Contention {
            prefix: "A".into(),
            attempts: 3
        }
    );
    assert_eq!(claims.sink().rejections.load(Ordering::Relaxed), u32::MAX - 3);
}

#[tokio::test]
async fn claim_surfaces_write_failures() {
    let claims = ClaimingAllocator::new(ProbingAllocator::new(MemoryStore::new()), UnavailableStore);
    assert!(matches!(
        claims.claim("A").await,
        Err(Error::Store(StoreError::Unavailable { .. }))
    ));
}

#[tokio::test]
async fn claim_with_builds_custom_records() {
    #[derive(Debug, PartialEq)]
    struct Listing {
        id: String,
        title: &'static str,
    }

    impl crate::IdRecord for Listing {
        fn id(&self) -> &str {
            &self.id
        }
    }

    struct ListingSink(Mutex<Vec<Listing>>);

    impl RecordSink for ListingSink {
        type Record = Listing;

        async fn insert(&self, record: Listing) -> Result<(), StoreError> {
            self.0.lock().push(record);
            Ok(())
        }
    }

    let claims = ClaimingAllocator::new(
        ProbingAllocator::new(MemoryStore::with_ids(["RA-COMLEWH0041"])),
        ListingSink(Mutex::new(Vec::new())),
    );
    let id = claims
        .claim_with("RA-COMLEWH", |id| Listing {
            id: id.to_owned(),
            title: "Warehouse near ring road",
        })
        .await
        .unwrap();

    assert_eq!(id, "RA-COMLEWH0042");
    assert_eq!(
        claims.sink().0.lock()[0],
        Listing {
            id: "RA-COMLEWH0042".into(),
            title: "Warehouse near ring road",
        }
    );
}
