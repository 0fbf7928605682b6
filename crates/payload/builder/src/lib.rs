//! Block builder job lifecycle.
//!
//! The actual assembly of a block (transaction selection, execution, state
//! root) is the node's business and is injected as a [`BlockBuilderFunc`].
//! This crate owns what the engine server needs around it: the normalized
//! build parameters used for request deduplication, and the job wrapper that
//! starts building immediately, can be interrupted, and yields the best block
//! so far when stopped.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use alloy_primitives::{Address, B256};
use ember_primitives::{BlockWithReceipts, Withdrawals};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::oneshot;

/// The normalized parameters of a build request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBuilderParams {
    /// Parent of the block to build: the declared head.
    pub parent_hash: B256,
    /// Timestamp of the block to build.
    pub timestamp: u64,
    /// RANDAO value to place in the block.
    pub prev_randao: B256,
    /// Fee recipient of the block.
    pub suggested_fee_recipient: Address,
    /// Withdrawals to include. Capella onwards.
    pub withdrawals: Option<Withdrawals>,
    /// The id the registry assigned to this build.
    pub payload_id: u64,
}

impl BlockBuilderParams {
    /// Structural equality ignoring the payload id, which is assigned after
    /// the comparison that uses this.
    pub fn matches(&self, other: &Self) -> bool {
        self.parent_hash == other.parent_hash &&
            self.timestamp == other.timestamp &&
            self.prev_randao == other.prev_randao &&
            self.suggested_fee_recipient == other.suggested_fee_recipient &&
            self.withdrawals == other.withdrawals
    }
}

/// Failure of a build job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadBuilderError {
    /// The injected build function failed.
    #[error("failed to build payload: {0}")]
    Build(String),
    /// The build task disappeared without reporting a result.
    #[error("payload build task dropped without a result")]
    ChannelClosed,
}

/// Cooperative interruption flag handed to the build function. The builder
/// polls it between iterations and finalizes its best candidate once set.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Requests the build to wrap up.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether wrap-up was requested.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The injected build function. Runs on a blocking task until done or
/// interrupted, returning the best block assembled so far.
pub type BlockBuilderFunc = Arc<
    dyn Fn(BlockBuilderParams, Interrupt) -> Result<BlockWithReceipts, PayloadBuilderError>
        + Send
        + Sync,
>;

/// A running build job.
///
/// Building starts on creation. [`BlockBuilder::stop`] interrupts the job and
/// returns its result; the result is cached, so stopping again returns the
/// same block.
#[derive(Debug)]
pub struct BlockBuilder {
    interrupt: Interrupt,
    pending: Option<oneshot::Receiver<Result<BlockWithReceipts, PayloadBuilderError>>>,
    result: Option<Result<BlockWithReceipts, PayloadBuilderError>>,
}

impl BlockBuilder {
    /// Spawns the build job for the given parameters.
    pub fn new(build: BlockBuilderFunc, params: BlockBuilderParams) -> Self {
        let interrupt = Interrupt::default();
        let (result_tx, result_rx) = oneshot::channel();
        let task_interrupt = interrupt.clone();
        let payload_id = params.payload_id;
        tokio::task::spawn_blocking(move || {
            let result = build(params, task_interrupt);
            if result_tx.send(result).is_err() {
                tracing::debug!(target: "payload::builder", payload_id, "Build result dropped");
            }
        });
        Self { interrupt, pending: Some(result_rx), result: None }
    }

    /// Interrupts the job and returns the best block built so far.
    pub async fn stop(&mut self) -> Result<BlockWithReceipts, PayloadBuilderError> {
        if let Some(pending) = self.pending.take() {
            self.interrupt.set();
            let result = pending.await.unwrap_or(Err(PayloadBuilderError::ChannelClosed));
            self.result = Some(result);
        }
        self.result.clone().unwrap_or(Err(PayloadBuilderError::ChannelClosed))
    }
}
