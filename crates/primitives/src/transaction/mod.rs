//! Signed transaction types and their enveloped (binary) encoding.

use alloy_primitives::{keccak256, Bytes, B256};
use alloy_rlp::{Decodable, Header as RlpHeader};

mod access_list;
mod eip1559;
mod eip2930;
mod eip4844;
mod legacy;
mod signature;
mod tx_type;

pub use access_list::{AccessList, AccessListItem};
pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use eip4844::{BlobSidecar, TxEip4844};
pub use legacy::TxLegacy;
pub use signature::Signature;
pub use tx_type::TxType;

use signature::extract_chain_id;

/// A transaction, typed by its fee market.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transaction {
    /// Legacy transaction.
    Legacy(TxLegacy),
    /// EIP-2930 access-list transaction.
    Eip2930(TxEip2930),
    /// EIP-1559 dynamic-fee transaction.
    Eip1559(TxEip1559),
    /// EIP-4844 blob transaction.
    Eip4844(TxEip4844),
}

impl Transaction {
    /// The transaction type discriminant.
    pub const fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
        }
    }

    /// The maximum total fee per unit of gas the sender is willing to pay.
    /// For pre-1559 transactions this is the gas price.
    pub const fn max_fee_per_gas(&self) -> u128 {
        match self {
            Self::Legacy(tx) => tx.gas_price,
            Self::Eip2930(tx) => tx.gas_price,
            Self::Eip1559(tx) => tx.max_fee_per_gas,
            Self::Eip4844(tx) => tx.max_fee_per_gas,
        }
    }

    /// The maximum priority fee per unit of gas, where the fee market defines
    /// one.
    pub const fn max_priority_fee_per_gas(&self) -> Option<u128> {
        match self {
            Self::Legacy(_) | Self::Eip2930(_) => None,
            Self::Eip1559(tx) => Some(tx.max_priority_fee_per_gas),
            Self::Eip4844(tx) => Some(tx.max_priority_fee_per_gas),
        }
    }

    /// The priority fee if the fee market defines one, the gas price
    /// otherwise.
    pub const fn priority_fee_or_price(&self) -> u128 {
        match self.max_priority_fee_per_gas() {
            Some(fee) => fee,
            None => self.max_fee_per_gas(),
        }
    }

    /// The tip per unit of gas that actually accrues to the fee recipient
    /// under the given base fee.
    ///
    /// Returns `None` when the transaction cannot cover the base fee at all.
    pub fn effective_gas_tip(&self, base_fee: Option<u64>) -> Option<u128> {
        let Some(base_fee) = base_fee else { return Some(self.priority_fee_or_price()) };
        let max_fee_per_gas = self.max_fee_per_gas();
        if max_fee_per_gas < base_fee as u128 {
            return None
        }
        let tip = max_fee_per_gas - base_fee as u128;
        match self.max_priority_fee_per_gas() {
            Some(max_tip) => Some(tip.min(max_tip)),
            None => Some(tip),
        }
    }
}

/// A [`Transaction`] with its signature and memoized envelope hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionSigned {
    /// keccak of the enveloped encoding.
    pub hash: B256,
    /// The transaction's signature.
    pub signature: Signature,
    /// The transaction itself.
    pub transaction: Transaction,
}

impl TransactionSigned {
    /// Creates a signed transaction, computing its envelope hash.
    pub fn from_transaction_and_signature(transaction: Transaction, signature: Signature) -> Self {
        let mut this = Self { hash: B256::ZERO, signature, transaction };
        this.hash = keccak256(this.envelope_encoded());
        this
    }

    /// The transaction type discriminant.
    pub const fn tx_type(&self) -> TxType {
        self.transaction.tx_type()
    }

    /// Returns the blob sidecar for builder-sourced blob transactions.
    pub const fn blob_sidecar(&self) -> Option<&BlobSidecar> {
        match &self.transaction {
            Transaction::Eip4844(tx) => tx.sidecar.as_ref(),
            _ => None,
        }
    }

    /// Returns the blob versioned hashes of a blob transaction.
    pub fn blob_versioned_hashes(&self) -> Option<&[B256]> {
        match &self.transaction {
            Transaction::Eip4844(tx) => Some(&tx.blob_versioned_hashes),
            _ => None,
        }
    }

    /// Writes the enveloped (binary) encoding: the plain RLP list for legacy
    /// transactions, `type || rlp(fields..., signature)` for typed ones.
    pub fn encode_enveloped(&self, out: &mut dyn alloy_rlp::BufMut) {
        match &self.transaction {
            Transaction::Legacy(tx) => {
                let payload_length = tx.fields_len() +
                    self.signature.payload_len_with_eip155_chain_id(tx.chain_id);
                RlpHeader { list: true, payload_length }.encode(out);
                tx.encode_fields(out);
                self.signature.encode_with_eip155_chain_id(out, tx.chain_id);
            }
            Transaction::Eip2930(tx) => {
                out.put_u8(TxType::Eip2930 as u8);
                let payload_length = tx.fields_len() + self.signature.payload_len();
                RlpHeader { list: true, payload_length }.encode(out);
                tx.encode_fields(out);
                self.signature.encode(out);
            }
            Transaction::Eip1559(tx) => {
                out.put_u8(TxType::Eip1559 as u8);
                let payload_length = tx.fields_len() + self.signature.payload_len();
                RlpHeader { list: true, payload_length }.encode(out);
                tx.encode_fields(out);
                self.signature.encode(out);
            }
            Transaction::Eip4844(tx) => {
                out.put_u8(TxType::Eip4844 as u8);
                let payload_length = tx.fields_len() + self.signature.payload_len();
                RlpHeader { list: true, payload_length }.encode(out);
                tx.encode_fields(out);
                self.signature.encode(out);
            }
        }
    }

    /// The enveloped encoding as owned bytes.
    pub fn envelope_encoded(&self) -> Bytes {
        let mut buf = Vec::new();
        self.encode_enveloped(&mut buf);
        buf.into()
    }

    /// Decodes a transaction from its enveloped encoding, advancing the
    /// buffer past the consumed bytes.
    pub fn decode_enveloped(data: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let original = *data;
        let first = *data.first().ok_or(alloy_rlp::Error::InputTooShort)?;
        let (transaction, signature) = if first >= 0xc0 {
            Self::decode_legacy_parts(data)?
        } else {
            Self::decode_typed_parts(data)?
        };
        let consumed = original.len() - data.len();
        let hash = keccak256(&original[..consumed]);
        Ok(Self { hash, signature, transaction })
    }

    fn decode_legacy_parts(data: &mut &[u8]) -> alloy_rlp::Result<(Transaction, Signature)> {
        let header = RlpHeader::decode(data)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString)
        }
        let started_len = data.len();
        let mut tx = TxLegacy {
            chain_id: None,
            nonce: Decodable::decode(data)?,
            gas_price: Decodable::decode(data)?,
            gas_limit: Decodable::decode(data)?,
            to: Decodable::decode(data)?,
            value: Decodable::decode(data)?,
            input: Decodable::decode(data)?,
        };
        let v = u64::decode(data)?;
        let r = Decodable::decode(data)?;
        let s = Decodable::decode(data)?;
        let (odd_y_parity, chain_id) = extract_chain_id(v)?;
        tx.chain_id = chain_id;

        let consumed = started_len - data.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            })
        }
        Ok((Transaction::Legacy(tx), Signature { odd_y_parity, r, s }))
    }

    fn decode_typed_parts(data: &mut &[u8]) -> alloy_rlp::Result<(Transaction, Signature)> {
        let tx_type = *data.first().ok_or(alloy_rlp::Error::InputTooShort)?;
        *data = &data[1..];

        let header = RlpHeader::decode(data)?;
        if !header.list {
            return Err(alloy_rlp::Error::Custom("typed tx fields must be encoded as a list"))
        }
        let started_len = data.len();
        let transaction = match tx_type {
            1 => Transaction::Eip2930(TxEip2930 {
                chain_id: Decodable::decode(data)?,
                nonce: Decodable::decode(data)?,
                gas_price: Decodable::decode(data)?,
                gas_limit: Decodable::decode(data)?,
                to: Decodable::decode(data)?,
                value: Decodable::decode(data)?,
                input: Decodable::decode(data)?,
                access_list: Decodable::decode(data)?,
            }),
            2 => Transaction::Eip1559(TxEip1559 {
                chain_id: Decodable::decode(data)?,
                nonce: Decodable::decode(data)?,
                max_priority_fee_per_gas: Decodable::decode(data)?,
                max_fee_per_gas: Decodable::decode(data)?,
                gas_limit: Decodable::decode(data)?,
                to: Decodable::decode(data)?,
                value: Decodable::decode(data)?,
                input: Decodable::decode(data)?,
                access_list: Decodable::decode(data)?,
            }),
            3 => Transaction::Eip4844(TxEip4844 {
                chain_id: Decodable::decode(data)?,
                nonce: Decodable::decode(data)?,
                max_priority_fee_per_gas: Decodable::decode(data)?,
                max_fee_per_gas: Decodable::decode(data)?,
                gas_limit: Decodable::decode(data)?,
                to: Decodable::decode(data)?,
                value: Decodable::decode(data)?,
                input: Decodable::decode(data)?,
                access_list: Decodable::decode(data)?,
                max_fee_per_data_gas: Decodable::decode(data)?,
                blob_versioned_hashes: Decodable::decode(data)?,
                sidecar: None,
            }),
            _ => return Err(alloy_rlp::Error::Custom("unsupported typed transaction type")),
        };
        let signature = Signature::decode(data)?;

        let consumed = started_len - data.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            })
        }
        Ok((transaction, signature))
    }
}

/// Returns `true` when a typed transaction was double-encoded as an RLP
/// string instead of raw typed-transaction bytes: the first byte is then a
/// string prefix rather than a list prefix or a transaction type.
pub fn typed_transaction_marshalled_as_rlp_string(data: &[u8]) -> bool {
    matches!(data.first(), Some(0x80..=0xbf))
}

/// Decodes a list of enveloped transactions, requiring each envelope to be
/// fully consumed.
pub fn decode_transactions(txs: &[Bytes]) -> alloy_rlp::Result<Vec<TransactionSigned>> {
    txs.iter()
        .map(|tx| {
            let mut buf = tx.as_ref();
            let decoded = TransactionSigned::decode_enveloped(&mut buf)?;
            if !buf.is_empty() {
                return Err(alloy_rlp::Error::UnexpectedLength)
            }
            Ok(decoded)
        })
        .collect()
}
