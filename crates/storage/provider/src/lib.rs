//! Read-only chain store interfaces for the engine server.
//!
//! The engine server never writes to the chain store; all mutation happens in
//! the importer. These traits cover exactly the queries the proof-of-stake
//! handshake needs, and [`InMemoryChainStore`] provides a hashmap-backed
//! implementation for stand-alone and test wiring.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
mod memory;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ProviderError, ProviderResult};
pub use memory::InMemoryChainStore;
pub use traits::{BlockProvider, ForkchoiceProvider, HeaderProvider};
