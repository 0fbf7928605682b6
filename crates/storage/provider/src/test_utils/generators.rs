//! Generators for random (but internally consistent) chain data.

use alloy_primitives::{Address, B256, U256};
use ember_primitives::{
    constants::EMPTY_OMMER_ROOT_HASH, proofs, Block, Header, SealedBlock, SealedHeader, Signature,
    Transaction, TransactionSigned, TxKind, TxLegacy,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A fresh rng for test data.
pub fn rng() -> StdRng {
    StdRng::from_entropy()
}

fn random_b256(rng: &mut impl Rng) -> B256 {
    B256::from(rng.gen::<[u8; 32]>())
}

/// Generates a random post-merge header at the given height. The parent hash
/// is random unless supplied.
pub fn random_header(rng: &mut impl Rng, number: u64, parent: Option<B256>) -> SealedHeader {
    let header = Header {
        parent_hash: parent.unwrap_or_else(|| random_b256(rng)),
        ommers_hash: EMPTY_OMMER_ROOT_HASH,
        beneficiary: Address::from(rng.gen::<[u8; 20]>()),
        state_root: random_b256(rng),
        transactions_root: random_b256(rng),
        receipts_root: random_b256(rng),
        number,
        gas_limit: 30_000_000,
        gas_used: rng.gen_range(0..30_000_000),
        timestamp: rng.gen_range(1_600_000_000..1_700_000_000),
        mix_hash: random_b256(rng),
        base_fee_per_gas: Some(rng.gen_range(7..1_000)),
        ..Default::default()
    };
    header.seal_slow()
}

/// Generates a random signed legacy transaction.
pub fn random_tx(rng: &mut impl Rng) -> TransactionSigned {
    let tx = Transaction::Legacy(TxLegacy {
        chain_id: Some(1),
        nonce: rng.gen::<u32>() as u64,
        gas_price: rng.gen_range(7u128..10_000),
        gas_limit: 21_000,
        to: TxKind::Call(Address::from(rng.gen::<[u8; 20]>())),
        value: U256::from(rng.gen::<u64>()),
        input: Default::default(),
    });
    let signature = Signature {
        odd_y_parity: rng.gen(),
        r: U256::from_be_bytes(rng.gen::<[u8; 32]>()),
        s: U256::from_be_bytes(rng.gen::<[u8; 32]>()),
    };
    TransactionSigned::from_transaction_and_signature(tx, signature)
}

/// Generates a random block whose transactions root is consistent with its
/// body, so the reconstruction of the block from its payload form rehashes to
/// the same block hash.
pub fn random_block(
    rng: &mut impl Rng,
    number: u64,
    parent: Option<B256>,
    tx_count: usize,
) -> SealedBlock {
    let body: Vec<_> = (0..tx_count).map(|_| random_tx(rng)).collect();
    let raw: Vec<_> = body.iter().map(|tx| tx.envelope_encoded()).collect();

    let mut header = random_header(rng, number, parent).unseal();
    header.transactions_root = proofs::calculate_transaction_root(&raw);
    header.gas_used = 21_000 * tx_count as u64;

    Block { header, body, withdrawals: None }.seal_slow()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_block_is_consistent() {
        let mut rng = rng();
        let block = random_block(&mut rng, 10, None, 3);
        let raw = block.raw_transactions();
        assert_eq!(block.header.transactions_root, proofs::calculate_transaction_root(&raw));

        let reparsed = ember_primitives::decode_transactions(&raw).unwrap();
        assert_eq!(reparsed, block.body);
    }
}
