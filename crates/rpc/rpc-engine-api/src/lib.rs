//! The server side of the Engine API: the validation and dispatch layer
//! between a consensus client and the execution node's importer, builder and
//! chain store.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod capabilities;
mod engine_api;
mod error;
mod metrics;

pub use capabilities::{EngineCapabilities, CAPABILITIES};
pub use engine_api::{EngineServer, MAX_BUILDERS, MAX_PAYLOAD_BODIES_LIMIT};
pub use error::{EngineApiError, EngineApiResult};

/// The version of the engine method a request arrived through. Determines
/// which fork-gated payload fields may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EngineApiMessageVersion {
    /// Bellatrix-era methods.
    V1,
    /// Capella-era methods: withdrawals.
    V2,
    /// Deneb-era methods: withdrawals and data-gas fields.
    V3,
}
