use crate::{
    engine::{PayloadId, PayloadStatus, PayloadStatusEnum},
    serde_helpers::quantity,
    Withdrawal,
};
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// The chain tips the consensus client declares canonical: head, safe and
/// finalized block hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceState {
    /// Hash of the head of the canonical chain.
    pub head_block_hash: B256,
    /// Hash of the most recent "safe" block.
    pub safe_block_hash: B256,
    /// Hash of the most recent finalized block.
    pub finalized_block_hash: B256,
}

/// A request to assemble a successor block on top of the declared head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadAttributes {
    /// Timestamp of the block to build.
    #[serde(with = "quantity")]
    pub timestamp: u64,
    /// RANDAO value to place in the built block.
    pub prev_randao: B256,
    /// Fee recipient of the built block.
    pub suggested_fee_recipient: Address,
    /// Withdrawals to include. Present from Capella.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<Vec<Withdrawal>>,
}

/// The response of `engine_forkchoiceUpdated`: the status of the head
/// declaration, and the id of the initiated build when one was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceUpdated {
    /// Status of the declared head.
    pub payload_status: PayloadStatus,
    /// Identifier of the initiated build, `null` when none was started.
    pub payload_id: Option<PayloadId>,
}

impl ForkchoiceUpdated {
    /// A response without a payload id.
    pub fn new(payload_status: PayloadStatus) -> Self {
        Self { payload_status, payload_id: None }
    }

    /// A response from a bare status, without a payload id.
    pub fn from_status(status: PayloadStatusEnum) -> Self {
        Self { payload_status: PayloadStatus::from_status(status), payload_id: None }
    }

    /// Sets the latest valid hash.
    pub fn with_latest_valid_hash(mut self, hash: B256) -> Self {
        self.payload_status.latest_valid_hash = Some(hash);
        self
    }

    /// Sets the payload id.
    pub fn with_payload_id(mut self, id: PayloadId) -> Self {
        self.payload_id = Some(id);
        self
    }
}
