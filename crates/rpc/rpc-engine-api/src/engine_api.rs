use crate::{
    capabilities::EngineCapabilities, metrics::EngineApiMetrics, EngineApiError,
    EngineApiMessageVersion, EngineApiResult,
};
use alloy_primitives::{B256, U256};
use ember_beacon_consensus::{BeaconEngineHandle, BeaconReply, PosStatus};
use ember_payload_builder::{BlockBuilder, BlockBuilderFunc, BlockBuilderParams};
use ember_primitives::{BlockWithReceipts, ChainSpec, SealedBlock, Withdrawals};
use ember_provider::{BlockProvider, ForkchoiceProvider, HeaderProvider};
use ember_rpc_types::engine::{
    BlobsBundleV1, ExecutionPayload, ExecutionPayloadBodyV1, ForkchoiceState, ForkchoiceUpdated,
    GetPayloadResponse, PayloadAttributes, PayloadError, PayloadId, PayloadStatus,
    PayloadStatusEnum, TransitionConfiguration,
};
use ember_rpc_types_compat::engine::{
    block_to_payload, convert_block_to_payload_body, convert_standalone_withdraw_to_withdrawal,
    try_payload_to_block,
};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// How many in-flight block builders the server retains; the oldest payload
/// ids are evicted first.
pub const MAX_BUILDERS: usize = 128;

/// Cap on the number of entries a payload-bodies query may request.
pub const MAX_PAYLOAD_BODIES_LIMIT: u64 = 1024;

/// How long the stage-loop busy probe waits for the importer to park on its
/// request queue.
const STAGE_LOOP_BUSY_PROBE: Duration = Duration::from_secs(1);

/// The Engine API server.
///
/// Validates incoming payloads and forkchoice declarations, answers what it
/// can from chain-store snapshots, and forwards the rest to the importer one
/// request at a time. Also owns the registry of in-flight block builders.
pub struct EngineServer<Provider> {
    inner: Arc<EngineServerInner<Provider>>,
}

impl<Provider> Clone for EngineServer<Provider> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

struct EngineServerInner<Provider> {
    chain_spec: Arc<ChainSpec>,
    provider: Provider,
    beacon: BeaconEngineHandle,
    builder_func: BlockBuilderFunc,
    proposing: bool,
    capabilities: EngineCapabilities,
    /// The server mutex: guards the builder registry and serializes every
    /// round-trip through the importer, keeping the single-slot reply channel
    /// paired with its request.
    registry: Mutex<PayloadBuilderRegistry>,
    metrics: EngineApiMetrics,
}

#[derive(Debug, Default)]
struct PayloadBuilderRegistry {
    builders: BTreeMap<u64, BlockBuilder>,
    payload_id: u64,
    last_parameters: Option<BlockBuilderParams>,
}

impl PayloadBuilderRegistry {
    /// Drops the numerically oldest builders until at most `MAX_BUILDERS - 1`
    /// remain.
    fn evict_old_builders(&mut self) {
        while self.builders.len() >= MAX_BUILDERS {
            if let Some((payload_id, _)) = self.builders.pop_first() {
                debug!(target: "rpc::engine", payload_id, "Evicting old block builder");
            }
        }
    }
}

impl<Provider> EngineServer<Provider>
where
    Provider: HeaderProvider + BlockProvider + ForkchoiceProvider,
{
    /// Creates the server.
    pub fn new(
        chain_spec: Arc<ChainSpec>,
        provider: Provider,
        beacon: BeaconEngineHandle,
        builder_func: BlockBuilderFunc,
        proposing: bool,
    ) -> Self {
        Self {
            inner: Arc::new(EngineServerInner {
                chain_spec,
                provider,
                beacon,
                builder_func,
                proposing,
                capabilities: EngineCapabilities::default(),
                registry: Mutex::new(PayloadBuilderRegistry::default()),
                metrics: EngineApiMetrics::default(),
            }),
        }
    }

    /// Probes whether the stage loop is free to take a request, waiting at
    /// most one second for it to park on the queue.
    async fn stage_loop_is_busy(&self) -> bool {
        !self.inner.beacon.wait_for_waiting(STAGE_LOOP_BUSY_PROBE).await
    }

    /// The fast path: tries to settle a `newPayload` or `forkchoiceUpdated`
    /// from chain-store snapshots and downloader state without engaging the
    /// importer. Returns `None` when the request has to go to the importer.
    async fn quick_payload_status(
        &self,
        block_hash: B256,
        block_number: u64,
        parent_hash: B256,
        forkchoice: Option<&ForkchoiceState>,
        is_new_payload: bool,
    ) -> EngineApiResult<Option<PayloadStatus>> {
        let prefix = if is_new_payload { "NewPayload" } else { "ForkChoiceUpdated" };
        let inner = &self.inner;

        let Some(terminal_total_difficulty) = inner.chain_spec.terminal_total_difficulty else {
            error!(target: "rpc::engine", "[{prefix}] not a proof-of-stake chain");
            return Err(EngineApiError::NotPostMergeChain)
        };

        // Some consensus clients repeat the same forkchoice state many times
        // over; answer those without another head update.
        if let Some(state) = forkchoice {
            let finalized = inner.provider.forkchoice_finalized()?.unwrap_or_default();
            let head = inner.provider.forkchoice_head()?.unwrap_or_default();
            let safe = inner.provider.forkchoice_safe()?.unwrap_or_default();
            if state.finalized_block_hash == finalized &&
                state.head_block_hash == head &&
                state.safe_block_hash == safe
            {
                return Ok(Some(PayloadStatus::new(PayloadStatusEnum::Valid, block_hash)))
            }
        }

        let header = inner.provider.header_by_hash(block_hash)?;
        let (parent, total_difficulty) = if is_new_payload {
            (
                inner.provider.header_by_hash(parent_hash)?,
                inner.provider.total_difficulty_by_hash(parent_hash)?,
            )
        } else {
            (None, inner.provider.total_difficulty_by_hash(block_hash)?)
        };

        if let Some(total_difficulty) = total_difficulty {
            if total_difficulty < terminal_total_difficulty {
                warn!(target: "rpc::engine", %block_hash, "[{prefix}] beacon chain request before TTD");
                return Ok(Some(PayloadStatus::new(
                    PayloadStatusEnum::Invalid { validation_error: None },
                    B256::ZERO,
                )))
            }
        }

        if !inner.beacon.pos_sync() {
            info!(target: "rpc::engine", %block_hash, "[{prefix}] still in PoW sync");
            return Ok(Some(PayloadStatus::from_status(PayloadStatusEnum::Syncing)))
        }

        // only meaningful when the header itself is known
        let canonical_hash = match &header {
            Some(header) => inner.provider.canonical_hash(header.number)?,
            None => None,
        };

        if is_new_payload {
            if let Some(parent) = &parent {
                if block_number != parent.number + 1 {
                    warn!(
                        target: "rpc::engine",
                        header_number = block_number,
                        parent_number = parent.number,
                        "[{prefix}] invalid block number"
                    );
                    inner.beacon.report_bad_header(block_hash, parent_hash);
                    return Ok(Some(PayloadStatus {
                        status: PayloadStatusEnum::Invalid {
                            validation_error: Some("invalid block number".to_string()),
                        },
                        latest_valid_hash: Some(parent_hash),
                    }))
                }
            }
        }

        // Check whether the hash is attributed to a previously received
        // invalid header; for payloads a bad parent condemns the child too.
        let mut bad = inner.beacon.is_bad_header(block_hash);
        if bad.is_some() {
            warn!(target: "rpc::engine", %block_hash, "[{prefix}] previously known bad block");
        } else if is_new_payload {
            bad = inner.beacon.is_bad_header(parent_hash);
            if bad.is_some() {
                warn!(target: "rpc::engine", %block_hash, %parent_hash, "[{prefix}] previously known bad block");
            }
        }
        if let Some(latest_valid_hash) = bad {
            inner.beacon.report_bad_header(block_hash, latest_valid_hash);
            return Ok(Some(PayloadStatus {
                status: PayloadStatusEnum::Invalid { validation_error: None },
                latest_valid_hash: Some(latest_valid_hash),
            }))
        }

        if is_new_payload {
            // already validated and canonical
            if header.is_some() && canonical_hash == Some(block_hash) {
                return Ok(Some(PayloadStatus::new(PayloadStatusEnum::Valid, block_hash)))
            }

            if parent.is_none() && inner.beacon.pos_status() != PosStatus::Idle {
                debug!(target: "rpc::engine", %block_hash, "[{prefix}] downloading other PoS blocks");
                return Ok(Some(PayloadStatus::from_status(PayloadStatusEnum::Syncing)))
            }
        } else {
            if header.is_none() && inner.beacon.pos_status() != PosStatus::Idle {
                debug!(target: "rpc::engine", %block_hash, "[{prefix}] downloading other PoS blocks");
                return Ok(Some(PayloadStatus::from_status(PayloadStatusEnum::Syncing)))
            }

            // A forkchoice head that is canonical but not the current head
            // references an ancestor; it must not re-trigger a head update.
            // When it *is* the current head we fall through, so the importer
            // still writes the forkchoice markers.
            let head_hash = inner.provider.head_block_hash()?.unwrap_or_default();
            if block_hash != head_hash && canonical_hash == Some(block_hash) {
                return Ok(Some(PayloadStatus::new(PayloadStatusEnum::Valid, block_hash)))
            }
        }

        // another payload is already being processed
        if self.stage_loop_is_busy().await {
            debug!(target: "rpc::engine", "[{prefix}] stage loop is busy");
            return Ok(Some(PayloadStatus::from_status(PayloadStatusEnum::Syncing)))
        }

        Ok(None)
    }

    fn check_withdrawals_presence(
        &self,
        timestamp: u64,
        withdrawals: Option<&Withdrawals>,
    ) -> EngineApiResult<()> {
        let shanghai = self.inner.chain_spec.is_shanghai_active_at_timestamp(timestamp);
        if !shanghai && withdrawals.is_some() {
            return Err(EngineApiError::WithdrawalsBeforeShanghai)
        }
        if shanghai && withdrawals.is_none() {
            return Err(EngineApiError::MissingWithdrawals)
        }
        Ok(())
    }

    fn check_data_gas_presence(&self, payload: &ExecutionPayload) -> EngineApiResult<()> {
        let cancun = self.inner.chain_spec.is_cancun_active_at_timestamp(payload.timestamp);
        if !cancun && (payload.data_gas_used.is_some() || payload.excess_data_gas.is_some()) {
            return Err(EngineApiError::DataGasFieldsBeforeCancun)
        }
        if cancun && (payload.data_gas_used.is_none() || payload.excess_data_gas.is_none()) {
            return Err(EngineApiError::MissingDataGasFields)
        }
        Ok(())
    }

    /// Validates a payload and, when the fast path cannot settle it, runs it
    /// through the importer.
    async fn new_payload(
        &self,
        payload: ExecutionPayload,
        version: EngineApiMessageVersion,
    ) -> EngineApiResult<PayloadStatus> {
        let inner = &self.inner;

        if version == EngineApiMessageVersion::V1 && payload.withdrawals.is_some() {
            return Err(EngineApiError::WithdrawalsNotSupportedInV1)
        }
        if version < EngineApiMessageVersion::V3 &&
            (payload.data_gas_used.is_some() || payload.excess_data_gas.is_some())
        {
            return Err(EngineApiError::DataGasFieldsNotSupported)
        }

        let withdrawals: Option<Withdrawals> = payload.withdrawals.as_ref().map(|withdrawals| {
            withdrawals.iter().map(convert_standalone_withdraw_to_withdrawal).collect()
        });
        self.check_withdrawals_presence(payload.timestamp, withdrawals.as_ref())?;
        self.check_data_gas_presence(&payload)?;

        let block_hash = payload.block_hash;
        let block = match try_payload_to_block(payload) {
            Ok(block) => block,
            Err(PayloadError::BlockHash { execution, consensus }) => {
                error!(
                    target: "rpc::engine",
                    stated = %consensus,
                    actual = %execution,
                    "[NewPayload] invalid block hash"
                );
                return Ok(PayloadStatus::from_status(PayloadStatusEnum::InvalidBlockHash {
                    validation_error: "invalid block hash".to_string(),
                }))
            }
            Err(error) => {
                warn!(target: "rpc::engine", %error, "[NewPayload] payload rejected");
                return Ok(PayloadStatus::from_status(PayloadStatusEnum::Invalid {
                    validation_error: Some(error.to_string()),
                }))
            }
        };

        let block_number = block.header.number;
        let parent_hash = block.header.parent_hash;
        if let Some(status) =
            self.quick_payload_status(block_hash, block_number, parent_hash, None, true).await?
        {
            return Ok(status)
        }

        // serialize the importer round-trip
        let _registry = inner.registry.lock().await;

        debug!(target: "rpc::engine", number = block_number, %block_hash, "[NewPayload] sending block");
        inner.beacon.add_payload_request(block);

        let reply =
            inner.beacon.recv_reply().await.ok_or(EngineApiError::ImporterUnavailable)?;
        match reply {
            BeaconReply::Status(status) => {
                debug!(target: "rpc::engine", ?status, "[NewPayload] got reply");
                Ok(status)
            }
            BeaconReply::Critical(error) => Err(error.into()),
        }
    }

    /// Applies a forkchoice declaration and optionally kicks off a block
    /// build.
    async fn fork_choice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
        version: EngineApiMessageVersion,
    ) -> EngineApiResult<ForkchoiceUpdated> {
        let inner = &self.inner;

        let quick = self
            .quick_payload_status(state.head_block_hash, 0, B256::ZERO, Some(&state), false)
            .await?;

        let mut registry = inner.registry.lock().await;

        let status = match quick {
            Some(status) => status,
            None => {
                debug!(target: "rpc::engine", head = %state.head_block_hash, "[ForkChoiceUpdated] sending forkchoice");
                inner.beacon.add_fork_choice_request(state);

                let reply =
                    inner.beacon.recv_reply().await.ok_or(EngineApiError::ImporterUnavailable)?;
                match reply {
                    BeaconReply::Status(status) => {
                        debug!(target: "rpc::engine", ?status, "[ForkChoiceUpdated] got reply");
                        status
                    }
                    BeaconReply::Critical(error) => return Err(error.into()),
                }
            }
        };

        // no build requested, or nothing to build on
        let Some(attributes) = payload_attributes else {
            return Ok(ForkchoiceUpdated::new(status))
        };
        if !status.is_valid() {
            return Ok(ForkchoiceUpdated::new(status))
        }

        if !inner.proposing {
            return Err(EngineApiError::ProposerDisabled)
        }

        let head_hash = inner.provider.head_block_hash()?.unwrap_or_default();
        if head_hash != state.head_block_hash {
            // The head of a side branch. The Engine API forbids starting a
            // build there; the declaration itself stays VALID.
            warn!(
                target: "rpc::engine",
                forkchoice_head = %state.head_block_hash,
                %head_hash,
                "Skipping payload building: forkchoiceState.headBlockHash is not the head of the canonical chain"
            );
            return Ok(ForkchoiceUpdated::new(status))
        }
        let head_header = inner
            .provider
            .header_by_hash(head_hash)?
            .ok_or(EngineApiError::MissingHeadHeader(head_hash))?;

        if head_header.timestamp >= attributes.timestamp {
            return Err(EngineApiError::InvalidPayloadAttributes)
        }

        if version == EngineApiMessageVersion::V1 && attributes.withdrawals.is_some() {
            return Err(EngineApiError::WithdrawalsNotSupportedInV1)
        }
        let withdrawals: Option<Withdrawals> = attributes.withdrawals.as_ref().map(|withdrawals| {
            withdrawals.iter().map(convert_standalone_withdraw_to_withdrawal).collect()
        });
        self.check_withdrawals_presence(attributes.timestamp, withdrawals.as_ref())?;

        let mut params = BlockBuilderParams {
            parent_hash: state.head_block_hash,
            timestamp: attributes.timestamp,
            prev_randao: attributes.prev_randao,
            suggested_fee_recipient: attributes.suggested_fee_recipient,
            withdrawals,
            payload_id: 0,
        };

        // already building a block with these parameters
        if registry.last_parameters.as_ref().is_some_and(|last| last.matches(&params)) {
            info!(target: "rpc::engine", "[ForkChoiceUpdated] duplicate build request");
            return Ok(ForkchoiceUpdated::new(PayloadStatus::new(
                PayloadStatusEnum::Valid,
                head_hash,
            ))
            .with_payload_id(PayloadId::new(registry.payload_id)))
        }

        registry.evict_old_builders();

        registry.payload_id += 1;
        let payload_id = registry.payload_id;
        params.payload_id = payload_id;
        registry.last_parameters = Some(params.clone());

        let builder = BlockBuilder::new(inner.builder_func.clone(), params);
        registry.builders.insert(payload_id, builder);
        info!(target: "rpc::engine", payload_id, "[ForkChoiceUpdated] block builder added");

        Ok(ForkchoiceUpdated::new(PayloadStatus::new(PayloadStatusEnum::Valid, head_hash))
            .with_payload_id(PayloadId::new(payload_id)))
    }

    /// Stops the builder registered under the id and converts its best block
    /// into the response envelope.
    async fn get_payload(&self, payload_id: u64) -> EngineApiResult<GetPayloadResponse> {
        let inner = &self.inner;

        if !inner.proposing {
            return Err(EngineApiError::ProposerDisabled)
        }
        if inner.chain_spec.terminal_total_difficulty.is_none() {
            return Err(EngineApiError::NotPostMergeChain)
        }

        let mut registry = inner.registry.lock().await;
        let Some(builder) = registry.builders.get_mut(&payload_id) else {
            warn!(target: "rpc::engine", payload_id, "Payload not stored");
            return Err(EngineApiError::UnknownPayload)
        };

        let block_with_receipts = match builder.stop().await {
            Ok(block) => block,
            Err(error) => {
                error!(target: "rpc::engine", %error, "Failed to build PoS block");
                return Err(error.into())
            }
        };
        let block = &block_with_receipts.block;

        let execution_payload = block_to_payload(block);
        let block_value = block_value(&block_with_receipts);
        let blobs_bundle = blobs_bundle(block)?;

        Ok(GetPayloadResponse { execution_payload, block_value, blobs_bundle: Some(blobs_bundle) })
    }

    async fn get_payload_bodies_by_hash(
        &self,
        hashes: Vec<B256>,
    ) -> EngineApiResult<Vec<Option<ExecutionPayloadBodyV1>>> {
        if hashes.len() as u64 > MAX_PAYLOAD_BODIES_LIMIT {
            return Err(EngineApiError::TooLargeRequest)
        }

        let mut bodies = Vec::with_capacity(hashes.len());
        for hash in hashes {
            bodies.push(self.inner.provider.block_by_hash(hash)?.map(convert_block_to_payload_body));
        }
        Ok(bodies)
    }

    async fn get_payload_bodies_by_range(
        &self,
        start: u64,
        count: u64,
    ) -> EngineApiResult<Vec<Option<ExecutionPayloadBodyV1>>> {
        if start == 0 || count == 0 {
            return Err(EngineApiError::InvalidBodiesRange { start, count })
        }
        if count > MAX_PAYLOAD_BODIES_LIMIT {
            return Err(EngineApiError::TooLargeRequest)
        }

        let mut bodies = Vec::new();
        for number in start..start + count {
            // stop at the first gap in canonical history
            let Some(hash) = self.inner.provider.canonical_hash(number)? else { break };
            bodies.push(self.inner.provider.block_by_hash(hash)?.map(convert_block_to_payload_body));
        }
        Ok(bodies)
    }

    /// Verifies that both layers agree on the terminal total difficulty.
    async fn exchange_transition_configuration(
        &self,
        config: TransitionConfiguration,
    ) -> EngineApiResult<TransitionConfiguration> {
        let terminal_total_difficulty = self
            .inner
            .chain_spec
            .terminal_total_difficulty
            .ok_or(EngineApiError::NoTerminalTotalDifficulty)?;

        if terminal_total_difficulty != config.terminal_total_difficulty {
            return Err(EngineApiError::TerminalTotalDifficultyMismatch {
                execution: terminal_total_difficulty,
                consensus: config.terminal_total_difficulty,
            })
        }

        Ok(TransitionConfiguration {
            terminal_total_difficulty,
            terminal_block_hash: B256::ZERO,
            terminal_block_number: 0,
        })
    }
}

/// The expected revenue of the fee recipient: Σ gas×tip over the block's
/// transactions, in receipt order.
fn block_value(block: &BlockWithReceipts) -> U256 {
    let base_fee = block.block.header.base_fee_per_gas;
    let mut total = U256::ZERO;
    for (transaction, receipt) in block.block.body.iter().zip(&block.receipts) {
        if let Some(tip) = transaction.transaction.effective_gas_tip(base_fee) {
            total += U256::from(tip) * U256::from(receipt.gas_used);
        }
    }
    total
}

/// Collects the sidecars of the block's blob transactions into a bundle,
/// requiring every sidecar column to line up with the versioned hashes.
fn blobs_bundle(block: &SealedBlock) -> EngineApiResult<BlobsBundleV1> {
    let mut bundle = BlobsBundleV1::default();
    for (index, transaction) in block.body.iter().enumerate() {
        if !transaction.tx_type().is_eip4844() {
            continue
        }
        let Some(sidecar) = transaction.blob_sidecar() else {
            return Err(EngineApiError::MissingBlobSidecar { index, block: block.hash() })
        };
        let hashes = transaction.blob_versioned_hashes().unwrap_or_default().len();
        if hashes != sidecar.commitments.len() ||
            hashes != sidecar.proofs.len() ||
            hashes != sidecar.blobs.len()
        {
            return Err(EngineApiError::InconsistentBlobSidecar {
                index,
                block: block.hash(),
                commitments: sidecar.commitments.len(),
                proofs: sidecar.proofs.len(),
                blobs: sidecar.blobs.len(),
                hashes,
            })
        }
        bundle.commitments.extend_from_slice(&sidecar.commitments);
        bundle.proofs.extend_from_slice(&sidecar.proofs);
        bundle.blobs.extend_from_slice(&sidecar.blobs);
    }
    Ok(bundle)
}

#[async_trait::async_trait]
impl<Provider> ember_rpc_api::EngineApiServer for EngineServer<Provider>
where
    Provider: HeaderProvider + BlockProvider + ForkchoiceProvider + 'static,
{
    async fn new_payload_v1(
        &self,
        payload: ExecutionPayload,
    ) -> jsonrpsee_core::RpcResult<PayloadStatus> {
        tracing::trace!(target: "rpc::engine", "Serving engine_newPayloadV1");
        let started_at = std::time::Instant::now();
        let result = self.new_payload(payload, EngineApiMessageVersion::V1).await;
        self.inner.metrics.latency.new_payload_v1.record(started_at.elapsed().as_secs_f64());
        self.inner.metrics.new_payload_response.update_response_metrics(&result);
        Ok(result?)
    }

    async fn new_payload_v2(
        &self,
        payload: ExecutionPayload,
    ) -> jsonrpsee_core::RpcResult<PayloadStatus> {
        tracing::trace!(target: "rpc::engine", "Serving engine_newPayloadV2");
        let started_at = std::time::Instant::now();
        let result = self.new_payload(payload, EngineApiMessageVersion::V2).await;
        self.inner.metrics.latency.new_payload_v2.record(started_at.elapsed().as_secs_f64());
        self.inner.metrics.new_payload_response.update_response_metrics(&result);
        Ok(result?)
    }

    async fn new_payload_v3(
        &self,
        payload: ExecutionPayload,
    ) -> jsonrpsee_core::RpcResult<PayloadStatus> {
        tracing::trace!(target: "rpc::engine", "Serving engine_newPayloadV3");
        let started_at = std::time::Instant::now();
        let result = self.new_payload(payload, EngineApiMessageVersion::V3).await;
        self.inner.metrics.latency.new_payload_v3.record(started_at.elapsed().as_secs_f64());
        self.inner.metrics.new_payload_response.update_response_metrics(&result);
        Ok(result?)
    }

    async fn fork_choice_updated_v1(
        &self,
        fork_choice_state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> jsonrpsee_core::RpcResult<ForkchoiceUpdated> {
        tracing::trace!(target: "rpc::engine", "Serving engine_forkchoiceUpdatedV1");
        let started_at = std::time::Instant::now();
        let result = self
            .fork_choice_updated(fork_choice_state, payload_attributes, EngineApiMessageVersion::V1)
            .await;
        self.inner
            .metrics
            .latency
            .fork_choice_updated_v1
            .record(started_at.elapsed().as_secs_f64());
        self.inner.metrics.fcu_response.update_response_metrics(&result);
        Ok(result?)
    }

    async fn fork_choice_updated_v2(
        &self,
        fork_choice_state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> jsonrpsee_core::RpcResult<ForkchoiceUpdated> {
        tracing::trace!(target: "rpc::engine", "Serving engine_forkchoiceUpdatedV2");
        let started_at = std::time::Instant::now();
        let result = self
            .fork_choice_updated(fork_choice_state, payload_attributes, EngineApiMessageVersion::V2)
            .await;
        self.inner
            .metrics
            .latency
            .fork_choice_updated_v2
            .record(started_at.elapsed().as_secs_f64());
        self.inner.metrics.fcu_response.update_response_metrics(&result);
        Ok(result?)
    }

    async fn get_payload_v1(
        &self,
        payload_id: PayloadId,
    ) -> jsonrpsee_core::RpcResult<ExecutionPayload> {
        tracing::trace!(target: "rpc::engine", %payload_id, "Serving engine_getPayloadV1");
        let started_at = std::time::Instant::now();
        let result = self.get_payload(payload_id.as_u64()).await;
        self.inner.metrics.latency.get_payload_v1.record(started_at.elapsed().as_secs_f64());
        Ok(result?.execution_payload)
    }

    async fn get_payload_v2(
        &self,
        payload_id: PayloadId,
    ) -> jsonrpsee_core::RpcResult<GetPayloadResponse> {
        tracing::trace!(target: "rpc::engine", %payload_id, "Serving engine_getPayloadV2");
        let started_at = std::time::Instant::now();
        let result = self.get_payload(payload_id.as_u64()).await;
        self.inner.metrics.latency.get_payload_v2.record(started_at.elapsed().as_secs_f64());
        let mut response = result?;
        // the blobs bundle is a V3 field
        response.blobs_bundle = None;
        Ok(response)
    }

    async fn get_payload_v3(
        &self,
        payload_id: PayloadId,
    ) -> jsonrpsee_core::RpcResult<GetPayloadResponse> {
        tracing::trace!(target: "rpc::engine", %payload_id, "Serving engine_getPayloadV3");
        let started_at = std::time::Instant::now();
        let result = self.get_payload(payload_id.as_u64()).await;
        self.inner.metrics.latency.get_payload_v3.record(started_at.elapsed().as_secs_f64());
        Ok(result?)
    }

    async fn get_payload_bodies_by_hash_v1(
        &self,
        block_hashes: Vec<B256>,
    ) -> jsonrpsee_core::RpcResult<Vec<Option<ExecutionPayloadBodyV1>>> {
        tracing::trace!(target: "rpc::engine", "Serving engine_getPayloadBodiesByHashV1");
        let started_at = std::time::Instant::now();
        let result = self.get_payload_bodies_by_hash(block_hashes).await;
        self.inner
            .metrics
            .latency
            .get_payload_bodies_by_hash_v1
            .record(started_at.elapsed().as_secs_f64());
        Ok(result?)
    }

    async fn get_payload_bodies_by_range_v1(
        &self,
        start: alloy_primitives::U64,
        count: alloy_primitives::U64,
    ) -> jsonrpsee_core::RpcResult<Vec<Option<ExecutionPayloadBodyV1>>> {
        tracing::trace!(target: "rpc::engine", "Serving engine_getPayloadBodiesByRangeV1");
        let started_at = std::time::Instant::now();
        let result = self.get_payload_bodies_by_range(start.to(), count.to()).await;
        self.inner
            .metrics
            .latency
            .get_payload_bodies_by_range_v1
            .record(started_at.elapsed().as_secs_f64());
        Ok(result?)
    }

    async fn exchange_transition_configuration_v1(
        &self,
        transition_configuration: TransitionConfiguration,
    ) -> jsonrpsee_core::RpcResult<TransitionConfiguration> {
        tracing::trace!(target: "rpc::engine", "Serving engine_exchangeTransitionConfigurationV1");
        let started_at = std::time::Instant::now();
        let result = self.exchange_transition_configuration(transition_configuration).await;
        self.inner
            .metrics
            .latency
            .exchange_transition_configuration
            .record(started_at.elapsed().as_secs_f64());
        Ok(result?)
    }

    async fn exchange_capabilities(
        &self,
        capabilities: Vec<String>,
    ) -> jsonrpsee_core::RpcResult<Vec<String>> {
        tracing::trace!(target: "rpc::engine", "Serving engine_exchangeCapabilities");
        Ok(self.inner.capabilities.exchange(&capabilities))
    }
}
