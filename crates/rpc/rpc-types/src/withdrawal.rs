use crate::serde_helpers::quantity;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A validator withdrawal in its JSON-RPC form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonically increasing identifier issued by the consensus layer.
    #[serde(with = "quantity")]
    pub index: u64,
    /// Index of the validator the withdrawal belongs to.
    #[serde(with = "quantity")]
    pub validator_index: u64,
    /// Target address for the withdrawn ether.
    pub address: Address,
    /// Value of the withdrawal, in gwei.
    #[serde(with = "quantity")]
    pub amount: u64,
}
