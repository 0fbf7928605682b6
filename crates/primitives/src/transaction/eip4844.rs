use crate::transaction::AccessList;
use alloy_primitives::{Address, Bytes, ChainId, B256, U256};
use alloy_rlp::Encodable;

/// An EIP-4844 blob transaction.
///
/// The canonical (block) form carries only the versioned hashes of the blobs.
/// A transaction obtained from the block builder additionally carries the
/// sidecar with the blob payloads; the sidecar is never part of the canonical
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip4844 {
    /// EIP-155 chain id.
    pub chain_id: ChainId,
    /// Sender nonce.
    pub nonce: u64,
    /// Maximum priority fee (tip) per unit of gas, in wei.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee per unit of gas, in wei.
    pub max_fee_per_gas: u128,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Recipient. Blob transactions cannot create contracts.
    pub to: Address,
    /// Wei transferred to the recipient.
    pub value: U256,
    /// Accounts and storage slots the transaction plans to access.
    pub access_list: AccessList,
    /// Maximum fee per unit of data gas, in wei.
    pub max_fee_per_data_gas: u128,
    /// Versioned hashes committing to the transaction's blobs.
    pub blob_versioned_hashes: Vec<B256>,
    /// Call data.
    pub input: Bytes,
    /// Blob payloads, present only on transactions handed over by the block
    /// builder. Excluded from the canonical encoding and hash.
    pub sidecar: Option<BlobSidecar>,
}

impl TxEip4844 {
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length() +
            self.nonce.length() +
            self.max_priority_fee_per_gas.length() +
            self.max_fee_per_gas.length() +
            self.gas_limit.length() +
            self.to.length() +
            self.value.length() +
            self.input.length() +
            self.access_list.length() +
            self.max_fee_per_data_gas.length() +
            self.blob_versioned_hashes.length()
    }

    pub(crate) fn encode_fields(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.max_priority_fee_per_gas.encode(out);
        self.max_fee_per_gas.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.encode(out);
        self.access_list.encode(out);
        self.max_fee_per_data_gas.encode(out);
        self.blob_versioned_hashes.encode(out);
    }
}

/// The blob payloads of an EIP-4844 transaction, as produced by the block
/// builder: one `(blob, commitment, proof)` triple per versioned hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BlobSidecar {
    /// The raw blobs.
    pub blobs: Vec<Bytes>,
    /// KZG commitments, one per blob.
    pub commitments: Vec<Bytes>,
    /// KZG proofs, one per blob.
    pub proofs: Vec<Bytes>,
}
