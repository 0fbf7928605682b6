//! Types of the `engine_` namespace.

mod forkchoice;
mod payload;
mod transition;

pub use forkchoice::{ForkchoiceState, ForkchoiceUpdated, PayloadAttributes};
pub use payload::{
    BlobsBundleV1, ExecutionPayload, ExecutionPayloadBodyV1, GetPayloadResponse, PayloadError,
    PayloadId, PayloadStatus, PayloadStatusEnum,
};
pub use transition::TransitionConfiguration;
