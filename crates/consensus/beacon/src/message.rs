use ember_primitives::SealedBlock;
use ember_rpc_types::engine::{ForkchoiceState, PayloadStatus};

/// A unit of work for the importer.
#[derive(Debug, Clone)]
pub enum BeaconRequest {
    /// Validate and import the block reconstructed from a payload.
    NewPayload(SealedBlock),
    /// Apply the declared forkchoice state.
    ForkChoice(ForkchoiceState),
}

/// The importer's answer to a [`BeaconRequest`].
#[derive(Debug, Clone)]
pub enum BeaconReply {
    /// A verdict to relay to the consensus client.
    Status(PayloadStatus),
    /// The stage loop failed; no verdict can be attributed to the request.
    Critical(CriticalImportError),
}

/// An unrecoverable importer failure, surfaced to the consensus client as a
/// JSON-RPC error with the underlying message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CriticalImportError {
    /// What went wrong inside the stage loop.
    pub message: String,
}

impl CriticalImportError {
    /// Wraps an importer failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
