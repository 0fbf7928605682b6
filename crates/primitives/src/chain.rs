use alloy_primitives::U256;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// The subset of the chain configuration the engine server consults: the
/// terminal total difficulty that marks the transition to proof of stake, and
/// the timestamps of the timestamp-scheduled hard forks that gate payload
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSpec {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Cumulative proof-of-work difficulty at which the chain switched to
    /// proof of stake. `None` on chains that never merge.
    pub terminal_total_difficulty: Option<U256>,
    /// Shanghai (Capella) activation timestamp. Gates withdrawals.
    pub shanghai_time: Option<u64>,
    /// Cancun (Deneb) activation timestamp. Gates the data-gas fields.
    pub cancun_time: Option<u64>,
}

impl ChainSpec {
    /// Returns `true` if Shanghai is active at the given block timestamp.
    pub fn is_shanghai_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.shanghai_time.is_some_and(|shanghai| timestamp >= shanghai)
    }

    /// Returns `true` if Cancun is active at the given block timestamp.
    pub fn is_cancun_active_at_timestamp(&self, timestamp: u64) -> bool {
        self.cancun_time.is_some_and(|cancun| timestamp >= cancun)
    }
}

/// The Ethereum mainnet spec.
pub static MAINNET: Lazy<Arc<ChainSpec>> = Lazy::new(|| {
    Arc::new(ChainSpec {
        chain_id: 1,
        terminal_total_difficulty: Some(U256::from(58_750_000_000_000_000_000_000u128)),
        shanghai_time: Some(1_681_338_455),
        cancun_time: None,
    })
});

/// A local development spec: merged at genesis with every fork active.
pub static DEV: Lazy<Arc<ChainSpec>> = Lazy::new(|| {
    Arc::new(ChainSpec {
        chain_id: 1337,
        terminal_total_difficulty: Some(U256::ZERO),
        shanghai_time: Some(0),
        cancun_time: Some(0),
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shanghai_activation_by_timestamp() {
        let spec = &*MAINNET;
        assert!(!spec.is_shanghai_active_at_timestamp(1_681_338_454));
        assert!(spec.is_shanghai_active_at_timestamp(1_681_338_455));
        assert!(!spec.is_cancun_active_at_timestamp(u64::MAX));
    }

    #[test]
    fn dev_spec_is_post_merge() {
        assert_eq!(DEV.terminal_total_difficulty, Some(U256::ZERO));
        assert!(DEV.is_shanghai_active_at_timestamp(0));
        assert!(DEV.is_cancun_active_at_timestamp(0));
    }
}
