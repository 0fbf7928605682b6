//! Conversion functions between execution payloads and blocks.

use alloy_primitives::B256;
use ember_primitives::{
    constants::{EMPTY_OMMER_ROOT_HASH, MAXIMUM_EXTRA_DATA_SIZE, MIN_PROTOCOL_BASE_FEE},
    decode_transactions, proofs, typed_transaction_marshalled_as_rlp_string, Block, Header,
    SealedBlock, Withdrawal, Withdrawals, U256,
};
use ember_rpc_types::engine::{ExecutionPayload, ExecutionPayloadBodyV1, PayloadError};

/// Reconstructs a [`SealedBlock`] from an [`ExecutionPayload`].
///
/// The header is rebuilt with the post-merge synthetic fields (empty ommers
/// hash, zero difficulty, zero nonce) and a transactions root computed over
/// the raw transaction byte list, then checked against the stated block hash.
/// Only after the hash matches are the transactions themselves decoded, so a
/// mis-hashed payload is reported as a hash mismatch regardless of its
/// contents.
///
/// Fork gating of the optional fields is the caller's responsibility; here a
/// field that is present is included, a field that is absent is omitted.
pub fn try_payload_to_block(payload: ExecutionPayload) -> Result<SealedBlock, PayloadError> {
    if payload.extra_data.len() > MAXIMUM_EXTRA_DATA_SIZE {
        return Err(PayloadError::ExtraData(payload.extra_data))
    }

    if payload.base_fee_per_gas < U256::from(MIN_PROTOCOL_BASE_FEE) {
        return Err(PayloadError::BaseFee(payload.base_fee_per_gas))
    }

    let withdrawals: Option<Withdrawals> = payload.withdrawals.as_ref().map(|withdrawals| {
        withdrawals.iter().map(convert_standalone_withdraw_to_withdrawal).collect()
    });
    let withdrawals_root =
        withdrawals.as_ref().map(|withdrawals| proofs::calculate_withdrawals_root(withdrawals));

    let header = Header {
        parent_hash: payload.parent_hash,
        ommers_hash: EMPTY_OMMER_ROOT_HASH,
        beneficiary: payload.fee_recipient,
        state_root: payload.state_root,
        transactions_root: proofs::calculate_transaction_root(&payload.transactions),
        receipts_root: payload.receipts_root,
        logs_bloom: payload.logs_bloom,
        difficulty: U256::ZERO,
        number: payload.block_number,
        gas_limit: payload.gas_limit,
        gas_used: payload.gas_used,
        timestamp: payload.timestamp,
        extra_data: payload.extra_data,
        mix_hash: payload.prev_randao,
        nonce: Default::default(),
        base_fee_per_gas: Some(
            payload
                .base_fee_per_gas
                .try_into()
                .map_err(|_| PayloadError::BaseFee(payload.base_fee_per_gas))?,
        ),
        withdrawals_root,
        data_gas_used: payload.data_gas_used,
        excess_data_gas: payload.excess_data_gas,
    };

    let sealed_header = validate_block_hash(payload.block_hash, header)?;

    for transaction in &payload.transactions {
        if typed_transaction_marshalled_as_rlp_string(transaction) {
            return Err(PayloadError::TypedTransactionRlpString)
        }
    }
    let body = decode_transactions(&payload.transactions)?;

    Ok(SealedBlock { header: sealed_header, body, withdrawals })
}

/// Hashes the reconstructed header and checks it against the block hash the
/// payload stated, sealing the header on success.
#[inline]
pub fn validate_block_hash(
    expected_block_hash: B256,
    header: Header,
) -> Result<ember_primitives::SealedHeader, PayloadError> {
    let sealed = header.seal_slow();
    if expected_block_hash != sealed.hash() {
        return Err(PayloadError::BlockHash {
            execution: sealed.hash(),
            consensus: expected_block_hash,
        })
    }
    Ok(sealed)
}

/// Converts a [`SealedBlock`] into its wire envelope.
pub fn block_to_payload(block: &SealedBlock) -> ExecutionPayload {
    ExecutionPayload {
        parent_hash: block.header.parent_hash,
        fee_recipient: block.header.beneficiary,
        state_root: block.header.state_root,
        receipts_root: block.header.receipts_root,
        logs_bloom: block.header.logs_bloom,
        prev_randao: block.header.mix_hash,
        block_number: block.header.number,
        gas_limit: block.header.gas_limit,
        gas_used: block.header.gas_used,
        timestamp: block.header.timestamp,
        extra_data: block.header.extra_data.clone(),
        base_fee_per_gas: U256::from(block.header.base_fee_per_gas.unwrap_or_default()),
        block_hash: block.hash(),
        transactions: block.raw_transactions(),
        withdrawals: block.withdrawals.as_ref().map(|withdrawals| {
            withdrawals.iter().map(convert_withdrawal_to_standalone_withdraw).collect()
        }),
        data_gas_used: block.header.data_gas_used,
        excess_data_gas: block.header.excess_data_gas,
    }
}

/// Extracts the payload body of a stored block.
pub fn convert_block_to_payload_body(block: Block) -> ExecutionPayloadBodyV1 {
    ExecutionPayloadBodyV1 {
        transactions: block.body.iter().map(|tx| tx.envelope_encoded()).collect(),
        withdrawals: block.withdrawals.map(|withdrawals| {
            withdrawals.iter().map(convert_withdrawal_to_standalone_withdraw).collect()
        }),
    }
}

/// Converts a primitive [`Withdrawal`] into its wire form.
pub fn convert_withdrawal_to_standalone_withdraw(
    withdrawal: &Withdrawal,
) -> ember_rpc_types::Withdrawal {
    ember_rpc_types::Withdrawal {
        index: withdrawal.index,
        validator_index: withdrawal.validator_index,
        address: withdrawal.address,
        amount: withdrawal.amount,
    }
}

/// Converts a wire withdrawal into its primitive form.
pub fn convert_standalone_withdraw_to_withdrawal(
    standalone: &ember_rpc_types::Withdrawal,
) -> Withdrawal {
    Withdrawal {
        index: standalone.index,
        validator_index: standalone.validator_index,
        address: standalone.address,
        amount: standalone.amount,
    }
}
