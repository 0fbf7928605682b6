use crate::ProviderResult;
use alloy_primitives::{B256, U256};
use ember_primitives::{Block, Header};

/// Client trait for fetching headers and their chain metadata.
pub trait HeaderProvider: Send + Sync {
    /// The header with the given hash, if known.
    fn header_by_hash(&self, hash: B256) -> ProviderResult<Option<Header>>;

    /// The total difficulty accumulated up to and including the block with
    /// the given hash.
    fn total_difficulty_by_hash(&self, hash: B256) -> ProviderResult<Option<U256>>;

    /// The hash of the canonical block at the given height. `None` past the
    /// end of the known canonical chain.
    fn canonical_hash(&self, number: u64) -> ProviderResult<Option<B256>>;

    /// The hash of the current chain head.
    fn head_block_hash(&self) -> ProviderResult<Option<B256>>;
}

/// Client trait for fetching full blocks.
pub trait BlockProvider: Send + Sync {
    /// The block with the given hash, if its header and body are both known.
    fn block_by_hash(&self, hash: B256) -> ProviderResult<Option<Block>>;
}

/// Client trait for reading the persisted forkchoice markers.
pub trait ForkchoiceProvider: Send + Sync {
    /// The last head hash written by the importer.
    fn forkchoice_head(&self) -> ProviderResult<Option<B256>>;

    /// The last safe-block hash written by the importer.
    fn forkchoice_safe(&self) -> ProviderResult<Option<B256>>;

    /// The last finalized-block hash written by the importer.
    fn forkchoice_finalized(&self) -> ProviderResult<Option<B256>>;
}
