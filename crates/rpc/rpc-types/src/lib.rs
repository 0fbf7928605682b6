//! Wire types of the `engine_` JSON-RPC namespace.
//!
//! These are the serde representations exchanged with the consensus client.
//! Conversions to and from the execution-layer primitives live in
//! `ember-rpc-types-compat`.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod engine;
pub mod serde_helpers;
mod withdrawal;

pub use engine::{
    BlobsBundleV1, ExecutionPayload, ExecutionPayloadBodyV1, ForkchoiceState, ForkchoiceUpdated,
    GetPayloadResponse, PayloadAttributes, PayloadError, PayloadId, PayloadStatus,
    PayloadStatusEnum, TransitionConfiguration,
};
pub use withdrawal::Withdrawal;
