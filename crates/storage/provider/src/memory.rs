use crate::{BlockProvider, ForkchoiceProvider, HeaderProvider, ProviderResult};
use alloy_primitives::{B256, U256};
use ember_primitives::{Block, Header, SealedBlock, SealedHeader};
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// A hashmap-backed chain store.
///
/// Serves as the store for stand-alone (dev) wiring and as the mock in tests;
/// the write methods model what the importer would persist.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChainStore {
    inner: Arc<RwLock<ChainStoreInner>>,
}

#[derive(Debug, Default)]
struct ChainStoreInner {
    headers: HashMap<B256, Header>,
    bodies: HashMap<B256, Block>,
    total_difficulty: HashMap<B256, U256>,
    canonical: BTreeMap<u64, B256>,
    head: Option<B256>,
    forkchoice_head: Option<B256>,
    forkchoice_safe: Option<B256>,
    forkchoice_finalized: Option<B256>,
}

impl InMemoryChainStore {
    /// Inserts a header, keyed by its hash.
    pub fn insert_header(&self, header: SealedHeader) {
        let mut inner = self.inner.write();
        inner.headers.insert(header.hash(), header.unseal());
    }

    /// Inserts a full block, together with its header.
    pub fn insert_block(&self, block: SealedBlock) {
        let hash = block.hash();
        let block = block.unseal();
        let mut inner = self.inner.write();
        inner.headers.insert(hash, block.header.clone());
        inner.bodies.insert(hash, block);
    }

    /// Records the total difficulty of the block with the given hash.
    pub fn set_total_difficulty(&self, hash: B256, td: U256) {
        self.inner.write().total_difficulty.insert(hash, td);
    }

    /// Marks a hash canonical at the given height.
    pub fn set_canonical_hash(&self, number: u64, hash: B256) {
        self.inner.write().canonical.insert(number, hash);
    }

    /// Sets the current chain head.
    pub fn set_head_block_hash(&self, hash: B256) {
        self.inner.write().head = Some(hash);
    }

    /// Persists the forkchoice markers.
    pub fn set_forkchoice(&self, head: B256, safe: B256, finalized: B256) {
        let mut inner = self.inner.write();
        inner.forkchoice_head = Some(head);
        inner.forkchoice_safe = Some(safe);
        inner.forkchoice_finalized = Some(finalized);
    }
}

impl HeaderProvider for InMemoryChainStore {
    fn header_by_hash(&self, hash: B256) -> ProviderResult<Option<Header>> {
        Ok(self.inner.read().headers.get(&hash).cloned())
    }

    fn total_difficulty_by_hash(&self, hash: B256) -> ProviderResult<Option<U256>> {
        Ok(self.inner.read().total_difficulty.get(&hash).copied())
    }

    fn canonical_hash(&self, number: u64) -> ProviderResult<Option<B256>> {
        Ok(self.inner.read().canonical.get(&number).copied())
    }

    fn head_block_hash(&self) -> ProviderResult<Option<B256>> {
        Ok(self.inner.read().head)
    }
}

impl BlockProvider for InMemoryChainStore {
    fn block_by_hash(&self, hash: B256) -> ProviderResult<Option<Block>> {
        Ok(self.inner.read().bodies.get(&hash).cloned())
    }
}

impl ForkchoiceProvider for InMemoryChainStore {
    fn forkchoice_head(&self) -> ProviderResult<Option<B256>> {
        Ok(self.inner.read().forkchoice_head)
    }

    fn forkchoice_safe(&self) -> ProviderResult<Option<B256>> {
        Ok(self.inner.read().forkchoice_safe)
    }

    fn forkchoice_finalized(&self) -> ProviderResult<Option<B256>> {
        Ok(self.inner.read().forkchoice_finalized)
    }
}
