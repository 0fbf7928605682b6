//! Channel plumbing between the engine server and the block importer.
//!
//! The importer (the staged-sync loop that validates and persists blocks) is
//! an external component with a narrow protocol: it consumes one request at a
//! time from a queue, and answers each on a capacity-one reply slot. This
//! crate owns that protocol and the importer-adjacent state the engine
//! server's fast path consults: the PoS sync flags and the bad-header memory.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod handle;
mod message;

pub use handle::{engine_channel, BeaconEngineHandle, BeaconImportQueue, PosStatus};
pub use message::{BeaconRequest, BeaconReply, CriticalImportError};
