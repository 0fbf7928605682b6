use alloy_primitives::B256;
use ember_rpc_types::engine::{
    ExecutionPayload, ExecutionPayloadBodyV1, ForkchoiceState, ForkchoiceUpdated,
    GetPayloadResponse, PayloadAttributes, PayloadId, PayloadStatus, TransitionConfiguration,
};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// The Engine API: the interface a consensus client drives an execution node
/// through. One method per versioned endpoint; the version determines which
/// fork-gated payload fields may appear.
#[rpc(server, namespace = "engine")]
pub trait EngineApi {
    /// Validates a pre-Shanghai payload.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md#engine_newpayloadv1>
    #[method(name = "newPayloadV1")]
    async fn new_payload_v1(&self, payload: ExecutionPayload) -> RpcResult<PayloadStatus>;

    /// Validates a payload that may carry withdrawals.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/shanghai.md#engine_newpayloadv2>
    #[method(name = "newPayloadV2")]
    async fn new_payload_v2(&self, payload: ExecutionPayload) -> RpcResult<PayloadStatus>;

    /// Validates a payload that may carry withdrawals and data-gas fields.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/cancun.md#engine_newpayloadv3>
    #[method(name = "newPayloadV3")]
    async fn new_payload_v3(&self, payload: ExecutionPayload) -> RpcResult<PayloadStatus>;

    /// Declares the canonical chain tips and optionally requests a block
    /// build (pre-Shanghai attributes).
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md#engine_forkchoiceupdatedv1>
    #[method(name = "forkchoiceUpdatedV1")]
    async fn fork_choice_updated_v1(
        &self,
        fork_choice_state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> RpcResult<ForkchoiceUpdated>;

    /// Declares the canonical chain tips and optionally requests a block
    /// build; attributes may carry withdrawals.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/shanghai.md#engine_forkchoiceupdatedv2>
    #[method(name = "forkchoiceUpdatedV2")]
    async fn fork_choice_updated_v2(
        &self,
        fork_choice_state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> RpcResult<ForkchoiceUpdated>;

    /// Retrieves a previously assembled payload.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md#engine_getpayloadv1>
    #[method(name = "getPayloadV1")]
    async fn get_payload_v1(&self, payload_id: PayloadId) -> RpcResult<ExecutionPayload>;

    /// Retrieves a previously assembled payload along with its value.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/shanghai.md#engine_getpayloadv2>
    #[method(name = "getPayloadV2")]
    async fn get_payload_v2(&self, payload_id: PayloadId) -> RpcResult<GetPayloadResponse>;

    /// Retrieves a previously assembled payload along with its value and
    /// blobs bundle.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/cancun.md#engine_getpayloadv3>
    #[method(name = "getPayloadV3")]
    async fn get_payload_v3(&self, payload_id: PayloadId) -> RpcResult<GetPayloadResponse>;

    /// Returns the bodies of the blocks with the given hashes, with `null`
    /// entries for unknown blocks.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/shanghai.md#engine_getpayloadbodiesbyhashv1>
    #[method(name = "getPayloadBodiesByHashV1")]
    async fn get_payload_bodies_by_hash_v1(
        &self,
        block_hashes: Vec<B256>,
    ) -> RpcResult<Vec<Option<ExecutionPayloadBodyV1>>>;

    /// Returns the bodies of the canonical blocks in `[start, start + count)`,
    /// truncated at the first gap.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/shanghai.md#engine_getpayloadbodiesbyrangev1>
    #[method(name = "getPayloadBodiesByRangeV1")]
    async fn get_payload_bodies_by_range_v1(
        &self,
        start: alloy_primitives::U64,
        count: alloy_primitives::U64,
    ) -> RpcResult<Vec<Option<ExecutionPayloadBodyV1>>>;

    /// Compares the consensus client's view of the transition configuration
    /// with the local one. Doubles as a liveness probe.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/paris.md#engine_exchangetransitionconfigurationv1>
    #[method(name = "exchangeTransitionConfigurationV1")]
    async fn exchange_transition_configuration_v1(
        &self,
        transition_configuration: TransitionConfiguration,
    ) -> RpcResult<TransitionConfiguration>;

    /// Returns the list of Engine API methods this node advertises.
    ///
    /// See also <https://github.com/ethereum/execution-apis/blob/main/src/engine/common.md#engine_exchangecapabilities>
    #[method(name = "exchangeCapabilities")]
    async fn exchange_capabilities(&self, capabilities: Vec<String>) -> RpcResult<Vec<String>>;
}
