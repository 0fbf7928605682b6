//! Ordered trie-root helpers for header reconstruction.

use crate::Withdrawal;
use alloy_primitives::{Bytes, B256};
use alloy_trie::root::{ordered_trie_root, ordered_trie_root_with_encoder};

/// Calculates the transactions root over the raw (enveloped) transaction byte
/// list, as carried by an execution payload. Each envelope is the trie value
/// as-is.
pub fn calculate_transaction_root(transactions: &[Bytes]) -> B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| buf.extend_from_slice(tx))
}

/// Calculates the withdrawals root.
pub fn calculate_withdrawals_root(withdrawals: &[Withdrawal]) -> B256 {
    ordered_trie_root(withdrawals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EMPTY_ROOT_HASH;

    #[test]
    fn empty_roots() {
        assert_eq!(calculate_transaction_root(&[]), EMPTY_ROOT_HASH);
        assert_eq!(calculate_withdrawals_root(&[]), EMPTY_ROOT_HASH);
    }

    #[test]
    fn transaction_root_is_order_sensitive() {
        let a = Bytes::from_static(b"\x01\x02\x03");
        let b = Bytes::from_static(b"\x04\x05\x06");
        assert_ne!(
            calculate_transaction_root(&[a.clone(), b.clone()]),
            calculate_transaction_root(&[b, a])
        );
    }
}
