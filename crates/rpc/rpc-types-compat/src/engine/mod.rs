//! Engine API conversions.

pub mod payload;

pub use payload::{
    block_to_payload, convert_block_to_payload_body, convert_standalone_withdraw_to_withdrawal,
    convert_withdrawal_to_standalone_withdraw, try_payload_to_block, validate_block_hash,
};
