use crate::serde_helpers::quantity;
use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Configurable settings of the proof-of-stake transition, exchanged as a
/// liveness probe between the consensus and execution layers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfiguration {
    /// The TERMINAL_TOTAL_DIFFICULTY parameter of EIP-3675.
    pub terminal_total_difficulty: U256,
    /// The TERMINAL_BLOCK_HASH parameter of EIP-3675.
    pub terminal_block_hash: B256,
    /// The TERMINAL_BLOCK_NUMBER parameter of EIP-3675.
    #[serde(with = "quantity")]
    pub terminal_block_number: u64,
}
