use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{length_of_length, Decodable, Encodable, Header as RlpHeader};
use std::ops::Deref;

/// An execution-layer block header.
///
/// The trailing fields are fork-conditional: `base_fee_per_gas` exists from
/// London, `withdrawals_root` from Shanghai, and the data-gas pair from
/// Cancun. A field that is `None` is omitted from the RLP entirely, which is
/// why encoding is implemented by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    /// The hash of the parent block's header.
    pub parent_hash: B256,
    /// The hash of the ommers list. Always the empty-list hash after the
    /// merge.
    pub ommers_hash: B256,
    /// The address that receives the priority fees.
    pub beneficiary: Address,
    /// The root of the state trie after executing this block.
    pub state_root: B256,
    /// The root of the trie over the block's transactions.
    pub transactions_root: B256,
    /// The root of the trie over the block's receipts.
    pub receipts_root: B256,
    /// The union of the receipts' log blooms.
    pub logs_bloom: Bloom,
    /// Block difficulty. Always zero after the merge.
    pub difficulty: U256,
    /// Block height.
    pub number: u64,
    /// Maximum gas the block may consume.
    pub gas_limit: u64,
    /// Gas consumed by the block.
    pub gas_used: u64,
    /// Block timestamp, seconds since the unix epoch.
    pub timestamp: u64,
    /// Arbitrary proposer-supplied data, at most 32 bytes.
    pub extra_data: Bytes,
    /// Pre-merge the mix hash, post-merge the previous RANDAO value.
    pub mix_hash: B256,
    /// Proof-of-work nonce. Always zero after the merge.
    pub nonce: B64,
    /// EIP-1559 base fee.
    pub base_fee_per_gas: Option<u64>,
    /// Root of the trie over the block's withdrawals. Shanghai onwards.
    pub withdrawals_root: Option<B256>,
    /// Total data gas consumed by the block's blob transactions. Cancun
    /// onwards.
    pub data_gas_used: Option<u64>,
    /// Running total of excess data gas. Cancun onwards.
    pub excess_data_gas: Option<u64>,
}

impl Header {
    /// Computes the block hash: keccak of the RLP encoding.
    pub fn hash_slow(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }

    /// Seals the header, memoizing its hash.
    pub fn seal_slow(self) -> SealedHeader {
        let hash = self.hash_slow();
        SealedHeader { header: self, hash }
    }

    fn rlp_payload_length(&self) -> usize {
        let mut length = 0;
        length += self.parent_hash.length();
        length += self.ommers_hash.length();
        length += self.beneficiary.length();
        length += self.state_root.length();
        length += self.transactions_root.length();
        length += self.receipts_root.length();
        length += self.logs_bloom.length();
        length += self.difficulty.length();
        length += self.number.length();
        length += self.gas_limit.length();
        length += self.gas_used.length();
        length += self.timestamp.length();
        length += self.extra_data.length();
        length += self.mix_hash.length();
        length += self.nonce.length();
        if let Some(base_fee) = self.base_fee_per_gas {
            length += base_fee.length();
        }
        if let Some(root) = self.withdrawals_root {
            length += root.length();
        }
        if let Some(data_gas_used) = self.data_gas_used {
            length += data_gas_used.length();
        }
        if let Some(excess_data_gas) = self.excess_data_gas {
            length += excess_data_gas.length();
        }
        length
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        RlpHeader { list: true, payload_length: self.rlp_payload_length() }.encode(out);
        self.parent_hash.encode(out);
        self.ommers_hash.encode(out);
        self.beneficiary.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        self.number.encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        self.extra_data.encode(out);
        self.mix_hash.encode(out);
        self.nonce.encode(out);
        // The optional tail is emitted in activation order; a later field is
        // never present without the earlier ones on a well-formed chain.
        if let Some(base_fee) = self.base_fee_per_gas {
            base_fee.encode(out);
        }
        if let Some(root) = self.withdrawals_root {
            root.encode(out);
        }
        if let Some(data_gas_used) = self.data_gas_used {
            data_gas_used.encode(out);
        }
        if let Some(excess_data_gas) = self.excess_data_gas {
            excess_data_gas.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        payload_length + length_of_length(payload_length)
    }
}

impl Decodable for Header {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let rlp_head = RlpHeader::decode(buf)?;
        if !rlp_head.list {
            return Err(alloy_rlp::Error::UnexpectedString)
        }
        let started_len = buf.len();
        let mut this = Self {
            parent_hash: Decodable::decode(buf)?,
            ommers_hash: Decodable::decode(buf)?,
            beneficiary: Decodable::decode(buf)?,
            state_root: Decodable::decode(buf)?,
            transactions_root: Decodable::decode(buf)?,
            receipts_root: Decodable::decode(buf)?,
            logs_bloom: Decodable::decode(buf)?,
            difficulty: Decodable::decode(buf)?,
            number: Decodable::decode(buf)?,
            gas_limit: Decodable::decode(buf)?,
            gas_used: Decodable::decode(buf)?,
            timestamp: Decodable::decode(buf)?,
            extra_data: Decodable::decode(buf)?,
            mix_hash: Decodable::decode(buf)?,
            nonce: Decodable::decode(buf)?,
            base_fee_per_gas: None,
            withdrawals_root: None,
            data_gas_used: None,
            excess_data_gas: None,
        };
        if started_len - buf.len() < rlp_head.payload_length {
            this.base_fee_per_gas = Some(Decodable::decode(buf)?);
        }
        if started_len - buf.len() < rlp_head.payload_length {
            this.withdrawals_root = Some(Decodable::decode(buf)?);
        }
        if started_len - buf.len() < rlp_head.payload_length {
            this.data_gas_used = Some(Decodable::decode(buf)?);
        }
        if started_len - buf.len() < rlp_head.payload_length {
            this.excess_data_gas = Some(Decodable::decode(buf)?);
        }
        let consumed = started_len - buf.len();
        if consumed != rlp_head.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: rlp_head.payload_length,
                got: consumed,
            })
        }
        Ok(this)
    }
}

/// A [`Header`] together with its memoized block hash.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SealedHeader {
    header: Header,
    hash: B256,
}

impl SealedHeader {
    /// Seals the header with the given, already computed hash.
    ///
    /// The hash is trusted; use [`Header::seal_slow`] to compute it.
    pub fn new(header: Header, hash: B256) -> Self {
        Self { header, hash }
    }

    /// The memoized block hash.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// A reference to the sealed header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Discards the hash and returns the plain header.
    pub fn unseal(self) -> Header {
        self.header
    }
}

impl Deref for SealedHeader {
    type Target = Header;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    fn post_shanghai_header() -> Header {
        Header {
            parent_hash: b256!("ae8315ee86002e6269a17dd1e9516a6cf13223e9d4544d0c32daff826fb31acc"),
            ommers_hash: crate::constants::EMPTY_OMMER_ROOT_HASH,
            beneficiary: Address::repeat_byte(0x42),
            number: 0x6a784,
            gas_limit: 0x1c9c380,
            gas_used: 0x5208,
            timestamp: 0x65bc1d60,
            extra_data: Bytes::from_static(b"ember"),
            base_fee_per_gas: Some(8),
            withdrawals_root: Some(crate::constants::EMPTY_ROOT_HASH),
            ..Default::default()
        }
    }

    #[test]
    fn header_rlp_roundtrip() {
        for header in [
            Header::default(),
            post_shanghai_header(),
            Header {
                data_gas_used: Some(0xc0000),
                excess_data_gas: Some(0x580000),
                ..post_shanghai_header()
            },
        ] {
            let encoded = alloy_rlp::encode(&header);
            let decoded = Header::decode(&mut encoded.as_slice()).unwrap();
            assert_eq!(header, decoded);
            assert_eq!(encoded.len(), header.length());
        }
    }

    #[test]
    fn any_field_mutation_changes_hash() {
        let base = post_shanghai_header();
        let base_hash = base.hash_slow();

        let mutations: Vec<Header> = vec![
            Header { gas_used: base.gas_used + 1, ..base.clone() },
            Header { timestamp: base.timestamp ^ 1, ..base.clone() },
            Header { base_fee_per_gas: Some(9), ..base.clone() },
            Header { withdrawals_root: None, ..base.clone() },
            Header { nonce: B64::from([0, 0, 0, 0, 0, 0, 0, 1]), ..base.clone() },
            Header { data_gas_used: Some(0), excess_data_gas: Some(0), ..base.clone() },
        ];
        for mutated in mutations {
            assert_ne!(mutated.hash_slow(), base_hash);
        }
    }

    #[test]
    fn sealed_header_matches_slow_hash() {
        let header = post_shanghai_header();
        let sealed = header.clone().seal_slow();
        assert_eq!(sealed.hash(), header.hash_slow());
        assert_eq!(sealed.unseal(), header);
    }
}
