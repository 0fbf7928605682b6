use crate::transaction::AccessList;
use alloy_primitives::{Bytes, ChainId, TxKind, U256};
use alloy_rlp::Encodable;

/// An EIP-1559 dynamic-fee transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TxEip1559 {
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
    /// Recipient, or create.
    pub to: TxKind,
    /// Wei transferred to the recipient.
    pub value: U256,
    /// Accounts and storage slots the transaction plans to access.
    pub access_list: AccessList,
    /// Call data or init code.
    pub input: Bytes,
}

impl TxEip1559 {
    pub(crate) fn fields_len(&self) -> usize {
        self.chain_id.length() +
            self.nonce.length() +
            self.max_priority_fee_per_gas.length() +
            self.max_fee_per_gas.length() +
            self.gas_limit.length() +
            self.to.length() +
            self.value.length() +
            self.input.length() +
            self.access_list.length()
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
    }
}
