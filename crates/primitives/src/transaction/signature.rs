use alloy_primitives::{ChainId, U256};
use alloy_rlp::{Decodable, Encodable};

/// An ECDSA signature over a transaction.
///
/// The signature is carried verbatim; this crate never recovers signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    /// The parity of the y-coordinate of the public key.
    pub odd_y_parity: bool,
    /// Signature r value.
    pub r: U256,
    /// Signature s value.
    pub s: U256,
}

impl Signature {
    /// The `v` value of a legacy transaction: EIP-155 encoded when a chain id
    /// is present, 27/28 otherwise.
    pub fn v(&self, chain_id: Option<ChainId>) -> u64 {
        if let Some(chain_id) = chain_id {
            self.odd_y_parity as u64 + chain_id * 2 + 35
        } else {
            self.odd_y_parity as u64 + 27
        }
    }

    pub(crate) fn payload_len_with_eip155_chain_id(&self, chain_id: Option<ChainId>) -> usize {
        self.v(chain_id).length() + self.r.length() + self.s.length()
    }

    pub(crate) fn encode_with_eip155_chain_id(
        &self,
        out: &mut dyn alloy_rlp::BufMut,
        chain_id: Option<ChainId>,
    ) {
        self.v(chain_id).encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    pub(crate) fn payload_len(&self) -> usize {
        self.odd_y_parity.length() + self.r.length() + self.s.length()
    }

    pub(crate) fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.odd_y_parity.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }

    pub(crate) fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Ok(Self {
            odd_y_parity: Decodable::decode(buf)?,
            r: Decodable::decode(buf)?,
            s: Decodable::decode(buf)?,
        })
    }
}

/// Splits a legacy `v` value into its parity and optional EIP-155 chain id.
pub(crate) fn extract_chain_id(v: u64) -> alloy_rlp::Result<(bool, Option<ChainId>)> {
    if v < 35 {
        // non-EIP-155 legacy scheme
        if v != 27 && v != 28 {
            return Err(alloy_rlp::Error::Custom("invalid ethereum signature (V is not 27 or 28)"))
        }
        Ok((v == 28, None))
    } else {
        let odd_y_parity = ((v - 35) % 2) != 0;
        let chain_id = (v - 35) >> 1;
        Ok((odd_y_parity, Some(chain_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_roundtrips_through_extract_chain_id() {
        for chain_id in [None, Some(1), Some(1337)] {
            for odd_y_parity in [false, true] {
                let sig = Signature { odd_y_parity, ..Default::default() };
                let (parity, extracted) = extract_chain_id(sig.v(chain_id)).unwrap();
                assert_eq!(parity, odd_y_parity);
                assert_eq!(extracted, chain_id);
            }
        }
    }

    #[test]
    fn rejects_bogus_v() {
        assert!(extract_chain_id(26).is_err());
        assert!(extract_chain_id(29).is_err());
        assert!(extract_chain_id(0).is_err());
    }
}
