use crate::EngineApiError;
use ember_rpc_types::engine::{ForkchoiceUpdated, PayloadStatus, PayloadStatusEnum};
use metrics::{counter, histogram, Counter, Histogram};

/// RPC-surface metrics of the engine server.
pub(crate) struct EngineApiMetrics {
    pub(crate) latency: EngineApiLatencyMetrics,
    pub(crate) fcu_response: ForkchoiceUpdatedResponseMetrics,
    pub(crate) new_payload_response: NewPayloadStatusResponseMetrics,
}

impl Default for EngineApiMetrics {
    fn default() -> Self {
        Self {
            latency: EngineApiLatencyMetrics::default(),
            fcu_response: ForkchoiceUpdatedResponseMetrics::default(),
            new_payload_response: NewPayloadStatusResponseMetrics::default(),
        }
    }
}

/// Per-method latency histograms, in the `engine.rpc` scope.
pub(crate) struct EngineApiLatencyMetrics {
    pub(crate) new_payload_v1: Histogram,
    pub(crate) new_payload_v2: Histogram,
    pub(crate) new_payload_v3: Histogram,
    pub(crate) fork_choice_updated_v1: Histogram,
    pub(crate) fork_choice_updated_v2: Histogram,
    pub(crate) get_payload_v1: Histogram,
    pub(crate) get_payload_v2: Histogram,
    pub(crate) get_payload_v3: Histogram,
    pub(crate) get_payload_bodies_by_hash_v1: Histogram,
    pub(crate) get_payload_bodies_by_range_v1: Histogram,
    pub(crate) exchange_transition_configuration: Histogram,
}

impl Default for EngineApiLatencyMetrics {
    fn default() -> Self {
        Self {
            new_payload_v1: histogram!("engine.rpc.new_payload_v1"),
            new_payload_v2: histogram!("engine.rpc.new_payload_v2"),
            new_payload_v3: histogram!("engine.rpc.new_payload_v3"),
            fork_choice_updated_v1: histogram!("engine.rpc.fork_choice_updated_v1"),
            fork_choice_updated_v2: histogram!("engine.rpc.fork_choice_updated_v2"),
            get_payload_v1: histogram!("engine.rpc.get_payload_v1"),
            get_payload_v2: histogram!("engine.rpc.get_payload_v2"),
            get_payload_v3: histogram!("engine.rpc.get_payload_v3"),
            get_payload_bodies_by_hash_v1: histogram!("engine.rpc.get_payload_bodies_by_hash_v1"),
            get_payload_bodies_by_range_v1: histogram!("engine.rpc.get_payload_bodies_by_range_v1"),
            exchange_transition_configuration: histogram!(
                "engine.rpc.exchange_transition_configuration"
            ),
        }
    }
}

/// Counters over `forkchoiceUpdated` response statuses.
pub(crate) struct ForkchoiceUpdatedResponseMetrics {
    pub(crate) forkchoice_updated_messages: Counter,
    pub(crate) forkchoice_updated_valid: Counter,
    pub(crate) forkchoice_updated_invalid: Counter,
    pub(crate) forkchoice_updated_syncing: Counter,
    pub(crate) forkchoice_updated_accepted: Counter,
    pub(crate) forkchoice_updated_error: Counter,
}

impl Default for ForkchoiceUpdatedResponseMetrics {
    fn default() -> Self {
        Self {
            forkchoice_updated_messages: counter!("engine.rpc.forkchoice_updated_messages"),
            forkchoice_updated_valid: counter!("engine.rpc.forkchoice_updated_valid"),
            forkchoice_updated_invalid: counter!("engine.rpc.forkchoice_updated_invalid"),
            forkchoice_updated_syncing: counter!("engine.rpc.forkchoice_updated_syncing"),
            forkchoice_updated_accepted: counter!("engine.rpc.forkchoice_updated_accepted"),
            forkchoice_updated_error: counter!("engine.rpc.forkchoice_updated_error"),
        }
    }
}

impl ForkchoiceUpdatedResponseMetrics {
    pub(crate) fn update_response_metrics(
        &self,
        result: &Result<ForkchoiceUpdated, EngineApiError>,
    ) {
        match result {
            Ok(response) => match response.payload_status.status {
                PayloadStatusEnum::Valid => self.forkchoice_updated_valid.increment(1),
                PayloadStatusEnum::Syncing => self.forkchoice_updated_syncing.increment(1),
                PayloadStatusEnum::Accepted => self.forkchoice_updated_accepted.increment(1),
                PayloadStatusEnum::Invalid { .. } | PayloadStatusEnum::InvalidBlockHash { .. } => {
                    self.forkchoice_updated_invalid.increment(1)
                }
            },
            Err(_) => self.forkchoice_updated_error.increment(1),
        }
        self.forkchoice_updated_messages.increment(1);
    }
}

/// Counters over `newPayload` response statuses.
pub(crate) struct NewPayloadStatusResponseMetrics {
    pub(crate) new_payload_messages: Counter,
    pub(crate) new_payload_valid: Counter,
    pub(crate) new_payload_invalid: Counter,
    pub(crate) new_payload_syncing: Counter,
    pub(crate) new_payload_accepted: Counter,
    pub(crate) new_payload_error: Counter,
}

impl Default for NewPayloadStatusResponseMetrics {
    fn default() -> Self {
        Self {
            new_payload_messages: counter!("engine.rpc.new_payload_messages"),
            new_payload_valid: counter!("engine.rpc.new_payload_valid"),
            new_payload_invalid: counter!("engine.rpc.new_payload_invalid"),
            new_payload_syncing: counter!("engine.rpc.new_payload_syncing"),
            new_payload_accepted: counter!("engine.rpc.new_payload_accepted"),
            new_payload_error: counter!("engine.rpc.new_payload_error"),
        }
    }
}

impl NewPayloadStatusResponseMetrics {
    pub(crate) fn update_response_metrics(&self, result: &Result<PayloadStatus, EngineApiError>) {
        match result {
            Ok(status) => match status.status {
                PayloadStatusEnum::Valid => self.new_payload_valid.increment(1),
                PayloadStatusEnum::Syncing => self.new_payload_syncing.increment(1),
                PayloadStatusEnum::Accepted => self.new_payload_accepted.increment(1),
                PayloadStatusEnum::Invalid { .. } | PayloadStatusEnum::InvalidBlockHash { .. } => {
                    self.new_payload_invalid.increment(1)
                }
            },
            Err(_) => self.new_payload_error.increment(1),
        }
        self.new_payload_messages.increment(1);
    }
}
