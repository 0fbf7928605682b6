use alloy_primitives::{Address, B256};
use alloy_rlp::{RlpDecodable, RlpDecodableWrapper, RlpEncodable, RlpEncodableWrapper};

/// A single EIP-2930 access-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, RlpEncodable, RlpDecodable)]
pub struct AccessListItem {
    /// The account the transaction plans to touch.
    pub address: Address,
    /// The storage slots of that account the transaction plans to touch.
    pub storage_keys: Vec<B256>,
}

/// An EIP-2930 access list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, RlpEncodableWrapper, RlpDecodableWrapper)]
pub struct AccessList(pub Vec<AccessListItem>);
