//! Commonly used types for the ember engine server.
//!
//! This crate contains the execution-layer primitives the proof-of-stake
//! handshake operates on: headers, blocks, signed transactions, withdrawals,
//! the chain spec with its fork schedule, and the trie-root helpers needed to
//! reconstruct a header from a consensus-layer payload.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod block;
mod chain;
pub mod constants;
mod header;
pub mod proofs;
mod receipt;
pub mod transaction;
mod withdrawal;

pub use block::{Block, BlockWithReceipts, SealedBlock};
pub use chain::{ChainSpec, DEV, MAINNET};
pub use header::{Header, SealedHeader};
pub use receipt::Receipt;
pub use transaction::{
    decode_transactions, typed_transaction_marshalled_as_rlp_string, AccessList, AccessListItem,
    BlobSidecar, Signature, Transaction, TransactionSigned, TxEip1559, TxEip2930, TxEip4844,
    TxLegacy, TxType,
};
pub use withdrawal::{Withdrawal, Withdrawals};

// Commonly used in conjunction with the types above.
pub use alloy_primitives::{keccak256, Address, Bloom, Bytes, ChainId, TxKind, B256, B64, U256};
