use std::{path::Path, sync::Arc};

use anyhow::Context;
use seqid::{
    Allocation, ClaimingAllocator, CounterAllocator, IdAllocator, MemoryStore, ProbingAllocator,
};

use super::config::{ServerConfig, Strategy};

/// The allocation strategy selected at startup.
pub enum Allocator {
    /// Scan for the highest identifier and probe its successors.
    Probing(ProbingAllocator<Arc<MemoryStore>>),
    /// Per-prefix counter in the store.
    Counter(CounterAllocator<Arc<MemoryStore>>),
}

impl Allocator {
    /// Builds the allocator for `strategy` over `store`. `max_attempts` only
    /// applies to probing.
    pub fn new(strategy: Strategy, store: Arc<MemoryStore>, max_attempts: u32) -> Self {
        match strategy {
            Strategy::Probing => {
                Self::Probing(ProbingAllocator::new(store).with_max_attempts(max_attempts))
            }
            Strategy::Counter => Self::Counter(CounterAllocator::new(store)),
        }
    }

    /// Allocates without writing, reporting how the identifier was obtained.
    pub async fn try_allocate(&self, prefix: &str) -> seqid::Result<Allocation> {
        match self {
            Self::Probing(allocator) => allocator.try_allocate(prefix).await,
            Self::Counter(allocator) => allocator.try_allocate(prefix).await,
        }
    }
}

impl IdAllocator for Allocator {
    async fn allocate(&self, prefix: &str) -> seqid::Result<String> {
        self.try_allocate(prefix).await.map(Allocation::into_id)
    }
}

/// Allocate-then-write over the shared store.
pub type Claims = ClaimingAllocator<Allocator, Arc<MemoryStore>>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<MemoryStore>,
    claims: Arc<Claims>,
}

impl AppState {
    /// Wires the configured allocator and claim bound to `store`.
    pub fn new(config: &ServerConfig, store: Arc<MemoryStore>) -> Self {
        let allocator = Allocator::new(config.strategy, store.clone(), config.max_attempts);
        let claims = ClaimingAllocator::new(allocator, store.clone())
            .with_max_attempts(config.claim_attempts);
        Self {
            store,
            claims: Arc::new(claims),
        }
    }

    /// Builds the state, loading the seed file first if one is configured.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store = match &config.seed_file {
            Some(path) => load_seed(path).await?,
            None => MemoryStore::new(),
        };
        Ok(Self::new(config, Arc::new(store)))
    }

    /// The shared identifier store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// The allocator selected at startup.
    pub fn allocator(&self) -> &Allocator {
        self.claims.allocator()
    }

    /// The claiming wrapper that persists into [`Self::store`].
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Reads a JSON array of previously issued identifiers into a fresh store.
async fn load_seed(path: &Path) -> anyhow::Result<MemoryStore> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let ids: Vec<String> = serde_json::from_slice(&raw)
        .with_context(|| format!("seed file {} is not a JSON array of strings", path.display()))?;
    let store = MemoryStore::with_ids(ids);
    tracing::info!(path = %path.display(), ids = store.len(), "loaded seed identifiers");
    Ok(store)
}
