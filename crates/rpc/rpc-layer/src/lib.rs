//! HTTP layers for the authenticated engine endpoint.
//!
//! The engine port only talks to the consensus client, authenticated with a
//! JWT signed by a shared 32-byte secret. [`AuthLayer`] rejects requests
//! before they reach RPC dispatch.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use http::HeaderMap;
use jsonrpsee_http_client::HttpResponse;

mod auth_layer;
mod jwt_validator;

pub use auth_layer::{AuthLayer, AuthService};

// Export alloy JWT types
pub use alloy_rpc_types_engine::{Claims, JwtError, JwtSecret};

pub use jwt_validator::JwtAuthValidator;

/// General purpose trait to validate HTTP authorization headers. It's
/// supposed to be integrated as a validator trait into an [`AuthLayer`].
pub trait AuthValidator {
    /// Performs validation on the headers of an incoming request. An error
    /// carries the HTTP response to refuse the request with.
    fn validate(&self, headers: &HeaderMap) -> Result<(), HttpResponse>;
}
