//! The `engine_` JSON-RPC interface served to the consensus client.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod engine;

pub use engine::EngineApiServer;
