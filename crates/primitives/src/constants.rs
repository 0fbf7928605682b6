//! Ethereum protocol-related constants.

use alloy_primitives::{b256, B256, B64, U256};

/// Multiplier for converting gwei to wei.
pub const GWEI_TO_WEI: u64 = 1_000_000_000;

/// Keccak-256 hash of the RLP of an empty list; the ommers hash of every
/// proof-of-stake block.
pub const EMPTY_OMMER_ROOT_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Root hash of an empty trie.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// The header nonce of every proof-of-stake block.
pub const PROOF_OF_STAKE_NONCE: B64 = B64::ZERO;

/// The header difficulty of every proof-of-stake block.
pub const PROOF_OF_STAKE_DIFFICULTY: U256 = U256::ZERO;

/// Maximum allowed size of the header `extra_data` field, in bytes.
pub const MAXIMUM_EXTRA_DATA_SIZE: usize = 32;

/// Minimum base fee enforced by the protocol.
pub const MIN_PROTOCOL_BASE_FEE: u64 = 7;
