//! Engine API capability negotiation.

use std::collections::HashSet;
use tracing::debug;

/// The Engine API methods this node advertises.
///
/// The V3 methods are implemented but intentionally left out while the Deneb
/// surface is being rolled out; the list is the advertised surface, not the
/// implementation envelope.
pub const CAPABILITIES: &[&str] = &[
    "engine_forkchoiceUpdatedV1",
    "engine_forkchoiceUpdatedV2",
    "engine_newPayloadV1",
    "engine_newPayloadV2",
    "engine_getPayloadV1",
    "engine_getPayloadV2",
    "engine_exchangeTransitionConfigurationV1",
    "engine_getPayloadBodiesByHashV1",
    "engine_getPayloadBodiesByRangeV1",
];

/// The capability set advertised by the server.
#[derive(Debug, Clone)]
pub struct EngineCapabilities {
    inner: HashSet<String>,
}

impl EngineCapabilities {
    /// Creates a capability set from an iterator of method names.
    pub fn new(capabilities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { inner: capabilities.into_iter().map(Into::into).collect() }
    }

    /// The advertised methods, as a list.
    pub fn list(&self) -> Vec<String> {
        let mut list: Vec<_> = self.inner.iter().cloned().collect();
        list.sort_unstable();
        list
    }

    /// Compares the consensus client's capability list with ours, logs the
    /// differences in both directions, and returns our full list.
    pub fn exchange(&self, cl_capabilities: &[String]) -> Vec<String> {
        let cl_set: HashSet<&str> = cl_capabilities.iter().map(String::as_str).collect();

        let mut missing_ours: Vec<&str> = cl_set
            .iter()
            .copied()
            .filter(|capability| !self.inner.contains(*capability))
            .collect();
        missing_ours.sort_unstable();

        let mut missing_cl: Vec<&str> = self
            .inner
            .iter()
            .map(String::as_str)
            .filter(|capability| !cl_set.contains(*capability))
            .collect();
        missing_cl.sort_unstable();

        if !missing_ours.is_empty() || !missing_cl.is_empty() {
            debug!(
                target: "rpc::engine",
                cl_unsupported = ?missing_cl,
                el_unsupported = ?missing_ours,
                "ExchangeCapabilities mismatches"
            );
        }

        self.list()
    }
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self::new(CAPABILITIES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_always_returns_own_list() {
        let capabilities = EngineCapabilities::default();
        let own = capabilities.list();

        assert_eq!(capabilities.exchange(&[]), own);
        assert_eq!(capabilities.exchange(&["engine_newPayloadV9".to_string()]), own);
        assert_eq!(capabilities.exchange(&own), own);
    }

    #[test]
    fn v3_methods_are_not_advertised() {
        let list = EngineCapabilities::default().list();
        assert!(list.iter().all(|method| !method.ends_with("V3")));
        assert!(list.contains(&"engine_newPayloadV2".to_string()));
    }
}
