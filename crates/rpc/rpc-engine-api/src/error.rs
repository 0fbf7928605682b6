use alloy_primitives::{B256, U256};
use ember_beacon_consensus::CriticalImportError;
use ember_payload_builder::PayloadBuilderError;
use ember_provider::ProviderError;
use jsonrpsee_types::error::{ErrorObject, INVALID_PARAMS_CODE};

/// The Engine API error code of `UNKNOWN_PAYLOAD`.
pub const UNKNOWN_PAYLOAD_CODE: i32 = -38001;
/// The Engine API error code of `INVALID_PAYLOAD_ATTRIBUTES`.
pub const INVALID_PAYLOAD_ATTRIBUTES_CODE: i32 = -38003;
/// The Engine API error code of `TOO_LARGE_REQUEST`.
pub const TOO_LARGE_REQUEST_CODE: i32 = -38004;
/// Generic server error code for infrastructure failures.
pub const SERVER_ERROR_CODE: i32 = -32000;

/// Alias for results of engine operations.
pub type EngineApiResult<T> = Result<T, EngineApiError>;

/// A protocol-level or infrastructure failure of an engine operation.
///
/// These surface to the consensus client as JSON-RPC *errors*. Validation
/// verdicts about a payload's contents are not errors; they travel as
/// `PayloadStatus` results instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineApiError {
    /// The queried payload id maps to no known build.
    #[error("Unknown payload")]
    UnknownPayload,
    /// The build attributes are unusable, e.g. the timestamp does not advance
    /// the chain.
    #[error("Invalid payload attributes")]
    InvalidPayloadAttributes,
    /// A payload-bodies query exceeded the size cap.
    #[error("Too large request")]
    TooLargeRequest,
    /// A payload-bodies range query with a zero start or count.
    #[error("invalid start or count, start: {start} count: {count}")]
    InvalidBodiesRange {
        /// Requested start of the range.
        start: u64,
        /// Requested length of the range.
        count: u64,
    },
    /// A V1 message carried withdrawals.
    #[error("withdrawals not supported in V1")]
    WithdrawalsNotSupportedInV1,
    /// Withdrawals appeared although Shanghai is not active at the message's
    /// timestamp.
    #[error("withdrawals before shanghai")]
    WithdrawalsBeforeShanghai,
    /// Shanghai is active but the withdrawals list is missing.
    #[error("missing withdrawals list")]
    MissingWithdrawals,
    /// A pre-V3 message carried the data-gas fields.
    #[error("dataGasUsed/excessDataGas not supported before V3")]
    DataGasFieldsNotSupported,
    /// The data-gas fields appeared although Cancun is not active at the
    /// payload's timestamp.
    #[error("dataGasUsed/excessDataGas present before Cancun")]
    DataGasFieldsBeforeCancun,
    /// Cancun is active but the data-gas fields are missing.
    #[error("dataGasUsed/excessDataGas missing")]
    MissingDataGasFields,
    /// The chain has no terminal total difficulty configured.
    #[error("not a proof-of-stake chain")]
    NotPostMergeChain,
    /// The consensus client asked for block building while proposing is
    /// disabled.
    #[error("execution layer not running as a proposer. enable proposer by taking out the --proposer.disable flag on startup")]
    ProposerDisabled,
    /// The chain has a TTD but no value to compare it against.
    #[error("the execution layer doesn't have a terminal total difficulty")]
    NoTerminalTotalDifficulty,
    /// The consensus client's terminal total difficulty disagrees with ours.
    #[error("the execution layer has a wrong terminal total difficulty. expected {consensus}, but instead got: {execution}")]
    TerminalTotalDifficultyMismatch {
        /// Our configured TTD.
        execution: U256,
        /// The TTD the consensus client claimed.
        consensus: U256,
    },
    /// The chain head has no stored header.
    #[error("head header missing for hash {0}")]
    MissingHeadHeader(B256),
    /// A built blob transaction came without its sidecar.
    #[error("blob transaction {index} in block {block} has no sidecar")]
    MissingBlobSidecar {
        /// Position of the transaction in the block.
        index: usize,
        /// Hash of the built block.
        block: B256,
    },
    /// A built blob transaction's sidecar columns have diverging lengths.
    #[error("tx {index} in block {block} has inconsistent commitments ({commitments}) / proofs ({proofs}) / blobs ({blobs}) / versioned hashes ({hashes})")]
    InconsistentBlobSidecar {
        /// Position of the transaction in the block.
        index: usize,
        /// Hash of the built block.
        block: B256,
        /// Number of commitments in the sidecar.
        commitments: usize,
        /// Number of proofs in the sidecar.
        proofs: usize,
        /// Number of blobs in the sidecar.
        blobs: usize,
        /// Number of versioned hashes in the transaction.
        hashes: usize,
    },
    /// The importer hung up its end of the request channel.
    #[error("beacon importer is unavailable")]
    ImporterUnavailable,
    /// The importer reported an unrecoverable failure.
    #[error(transparent)]
    Critical(#[from] CriticalImportError),
    /// A chain store read failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Stopping the block builder failed.
    #[error(transparent)]
    Builder(#[from] PayloadBuilderError),
}

impl From<EngineApiError> for ErrorObject<'static> {
    fn from(error: EngineApiError) -> Self {
        let code = match error {
            EngineApiError::UnknownPayload => UNKNOWN_PAYLOAD_CODE,
            EngineApiError::InvalidPayloadAttributes => INVALID_PAYLOAD_ATTRIBUTES_CODE,
            EngineApiError::TooLargeRequest => TOO_LARGE_REQUEST_CODE,
            EngineApiError::InvalidBodiesRange { .. } |
            EngineApiError::WithdrawalsNotSupportedInV1 |
            EngineApiError::WithdrawalsBeforeShanghai |
            EngineApiError::MissingWithdrawals |
            EngineApiError::DataGasFieldsNotSupported |
            EngineApiError::DataGasFieldsBeforeCancun |
            EngineApiError::MissingDataGasFields => INVALID_PARAMS_CODE,
            EngineApiError::NotPostMergeChain |
            EngineApiError::ProposerDisabled |
            EngineApiError::NoTerminalTotalDifficulty |
            EngineApiError::TerminalTotalDifficultyMismatch { .. } |
            EngineApiError::MissingHeadHeader(_) |
            EngineApiError::MissingBlobSidecar { .. } |
            EngineApiError::InconsistentBlobSidecar { .. } |
            EngineApiError::ImporterUnavailable |
            EngineApiError::Critical(_) |
            EngineApiError::Provider(_) |
            EngineApiError::Builder(_) => SERVER_ERROR_CODE,
        };
        ErrorObject::owned(code, error.to_string(), None::<()>)
    }
}
