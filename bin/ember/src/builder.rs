//! A development block builder: assembles empty successor blocks without
//! executing anything.

use ember_payload_builder::{BlockBuilderFunc, PayloadBuilderError};
use ember_primitives::{
    constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH},
    proofs, Block, BlockWithReceipts, ChainSpec, Header,
};
use ember_provider::{HeaderProvider, InMemoryChainStore};
use std::sync::Arc;

/// Builds an empty block on top of the requested parent, carrying the
/// parent's state root forward. Good enough for wiring tests; a real node
/// injects its executing builder here instead.
pub(crate) fn dev_builder_func(
    store: InMemoryChainStore,
    chain_spec: Arc<ChainSpec>,
) -> BlockBuilderFunc {
    Arc::new(move |params, _interrupt| {
        let parent = store
            .header_by_hash(params.parent_hash)
            .map_err(|err| PayloadBuilderError::Build(err.to_string()))?
            .ok_or_else(|| {
                PayloadBuilderError::Build(format!("unknown parent {}", params.parent_hash))
            })?;

        let cancun = chain_spec.is_cancun_active_at_timestamp(params.timestamp);
        let header = Header {
            parent_hash: params.parent_hash,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: params.suggested_fee_recipient,
            state_root: parent.state_root,
            transactions_root: proofs::calculate_transaction_root(&[]),
            receipts_root: EMPTY_ROOT_HASH,
            number: parent.number + 1,
            gas_limit: parent.gas_limit,
            timestamp: params.timestamp,
            mix_hash: params.prev_randao,
            base_fee_per_gas: parent.base_fee_per_gas,
            withdrawals_root: params
                .withdrawals
                .as_ref()
                .map(|withdrawals| proofs::calculate_withdrawals_root(withdrawals)),
            data_gas_used: cancun.then_some(0),
            excess_data_gas: cancun.then_some(0),
            ..Default::default()
        };

        let block = Block { header, body: Vec::new(), withdrawals: params.withdrawals };
        Ok(BlockWithReceipts { block: block.seal_slow(), receipts: Vec::new() })
    })
}
