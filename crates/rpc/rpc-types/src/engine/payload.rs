use crate::{serde_helpers::quantity, Withdrawal};
use alloy_primitives::{Address, Bloom, Bytes, B256, B64, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The consensus client's wire view of a block.
///
/// One envelope serves every `newPayload` version: the fork-gated fields are
/// optional, and the versioned entry points decide which of them may appear.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayload {
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// The proposer's fee recipient.
    pub fee_recipient: Address,
    /// State root after executing the block.
    pub state_root: B256,
    /// Receipts root of the block.
    pub receipts_root: B256,
    /// Union of the receipts' log blooms.
    pub logs_bloom: Bloom,
    /// Previous RANDAO value.
    pub prev_randao: B256,
    /// Block height.
    #[serde(with = "quantity")]
    pub block_number: u64,
    /// Gas limit of the block.
    #[serde(with = "quantity")]
    pub gas_limit: u64,
    /// Gas used by the block.
    #[serde(with = "quantity")]
    pub gas_used: u64,
    /// Block timestamp.
    #[serde(with = "quantity")]
    pub timestamp: u64,
    /// Proposer-supplied extra data.
    pub extra_data: Bytes,
    /// EIP-1559 base fee.
    pub base_fee_per_gas: U256,
    /// The block hash the consensus client claims this payload hashes to.
    pub block_hash: B256,
    /// Enveloped transactions, opaque at this layer.
    pub transactions: Vec<Bytes>,
    /// Validator withdrawals. Present from Capella.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<Vec<Withdrawal>>,
    /// Data gas used by the block's blob transactions. Present from Deneb.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "quantity::opt")]
    pub data_gas_used: Option<u64>,
    /// Running excess data gas. Present from Deneb.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "quantity::opt")]
    pub excess_data_gas: Option<u64>,
}

/// A block's body in the form returned by the payload-bodies queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadBodyV1 {
    /// Enveloped transactions.
    pub transactions: Vec<Bytes>,
    /// Withdrawals; `null` for pre-Capella blocks.
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// The response of `engine_getPayloadV2` and `V3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPayloadResponse {
    /// The assembled payload.
    pub execution_payload: ExecutionPayload,
    /// Expected revenue of the fee recipient, in wei.
    pub block_value: U256,
    /// Blob payloads of the block's blob transactions. V3 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blobs_bundle: Option<BlobsBundleV1>,
}

/// The `(commitment, proof, blob)` columns of every blob in a payload, in
/// transaction order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobsBundleV1 {
    /// KZG commitments.
    pub commitments: Vec<Bytes>,
    /// KZG proofs.
    pub proofs: Vec<Bytes>,
    /// Raw blobs.
    pub blobs: Vec<Bytes>,
}

/// Identifier of an in-flight block build. On the wire it is the big-endian
/// encoding of a process-local counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PayloadId(B64);

impl PayloadId {
    /// Encodes a counter value.
    pub fn new(id: u64) -> Self {
        Self(B64::from(id.to_be_bytes()))
    }

    /// Decodes the counter value.
    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0 .0)
    }
}

impl fmt::Display for PayloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The status taxonomy of payload and forkchoice responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadStatusEnum {
    /// The payload extends the canonical chain and is fully validated.
    Valid,
    /// The payload (or one of its ancestors) is invalid.
    Invalid {
        /// Why validation failed, when a reason is known.
        #[serde(rename = "validationError", default, skip_serializing_if = "Option::is_none")]
        validation_error: Option<String>,
    },
    /// The node cannot judge the payload yet; it is still syncing.
    Syncing,
    /// The payload was stored as a side-chain extension without validation.
    Accepted,
    /// The payload's stated block hash does not match its contents.
    InvalidBlockHash {
        /// Why validation failed.
        #[serde(rename = "validationError")]
        validation_error: String,
    },
}

impl PayloadStatusEnum {
    /// Returns `true` for `VALID`.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` for `SYNCING`.
    pub const fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing)
    }

    /// The validation error message, if the status carries one.
    pub fn validation_error(&self) -> Option<&str> {
        match self {
            Self::Invalid { validation_error } => validation_error.as_deref(),
            Self::InvalidBlockHash { validation_error } => Some(validation_error),
            _ => None,
        }
    }
}

/// A payload status together with the most recent valid ancestor hash, when
/// known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatus {
    /// The status of the payload.
    #[serde(flatten)]
    pub status: PayloadStatusEnum,
    /// Hash of the most recent valid block in the branch defined by the
    /// payload and its ancestors.
    pub latest_valid_hash: Option<B256>,
}

impl PayloadStatus {
    /// A status with a latest valid hash.
    pub fn new(status: PayloadStatusEnum, latest_valid_hash: B256) -> Self {
        Self { status, latest_valid_hash: Some(latest_valid_hash) }
    }

    /// A status without a latest valid hash.
    pub fn from_status(status: PayloadStatusEnum) -> Self {
        Self { status, latest_valid_hash: None }
    }

    /// Returns `true` for `VALID`.
    pub const fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// Returns `true` for `SYNCING`.
    pub const fn is_syncing(&self) -> bool {
        self.status.is_syncing()
    }
}

/// Failure to reconstruct a block from an [`ExecutionPayload`].
///
/// These reject the payload as a *status*, not as a transport error.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The extra data field exceeds the protocol maximum.
    #[error("invalid extra data length: {}", .0.len())]
    ExtraData(Bytes),
    /// The base fee is below the protocol minimum.
    #[error("invalid base fee: {0}")]
    BaseFee(U256),
    /// A typed transaction was double-encoded as an RLP string.
    #[error("typed txn marshalled as RLP string")]
    TypedTransactionRlpString,
    /// The reconstructed header does not hash to the stated block hash.
    #[error("block hash mismatch: execution {execution}, consensus {consensus}")]
    BlockHash {
        /// The hash of the reconstructed header.
        execution: B256,
        /// The hash the payload stated.
        consensus: B256,
    },
    /// A transaction failed to decode.
    #[error(transparent)]
    Decode(#[from] alloy_rlp::Error),
}
