use crate::{Header, Receipt, SealedHeader, TransactionSigned, Withdrawals};
use alloy_primitives::{Bytes, B256};

/// An execution-layer block: header plus body.
///
/// Post-merge blocks carry no ommers, so none are modeled; the header's
/// ommers hash is pinned to the empty-list hash instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// The block's transactions.
    pub body: Vec<TransactionSigned>,
    /// The block's withdrawals, present from Shanghai.
    pub withdrawals: Option<Withdrawals>,
}

impl Block {
    /// Seals the block, computing the header hash.
    pub fn seal_slow(self) -> SealedBlock {
        SealedBlock {
            header: self.header.seal_slow(),
            body: self.body,
            withdrawals: self.withdrawals,
        }
    }

    /// Seals the block with an externally validated hash.
    pub fn seal(self, hash: B256) -> SealedBlock {
        SealedBlock {
            header: SealedHeader::new(self.header, hash),
            body: self.body,
            withdrawals: self.withdrawals,
        }
    }
}

/// A [`Block`] whose header hash has been computed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SealedBlock {
    /// The sealed header.
    pub header: SealedHeader,
    /// The block's transactions.
    pub body: Vec<TransactionSigned>,
    /// The block's withdrawals, present from Shanghai.
    pub withdrawals: Option<Withdrawals>,
}

impl SealedBlock {
    /// The block hash.
    pub fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// The enveloped encodings of the block's transactions, in order.
    pub fn raw_transactions(&self) -> Vec<Bytes> {
        self.body.iter().map(|tx| tx.envelope_encoded()).collect()
    }

    /// Unseals the block.
    pub fn unseal(self) -> Block {
        Block { header: self.header.unseal(), body: self.body, withdrawals: self.withdrawals }
    }
}

/// A sealed block along with its execution receipts, as handed over by the
/// block builder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockWithReceipts {
    /// The built block.
    pub block: SealedBlock,
    /// One receipt per transaction, in transaction order.
    pub receipts: Vec<Receipt>,
}
