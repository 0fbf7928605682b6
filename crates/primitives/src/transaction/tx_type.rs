/// Transaction type discriminant, as it appears as the first byte of a typed
/// transaction envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum TxType {
    /// Pre-EIP-2718 transaction.
    #[default]
    Legacy = 0,
    /// EIP-2930 access-list transaction.
    Eip2930 = 1,
    /// EIP-1559 dynamic-fee transaction.
    Eip1559 = 2,
    /// EIP-4844 blob transaction.
    Eip4844 = 3,
}

impl TxType {
    /// Returns `true` for blob-carrying transactions.
    pub const fn is_eip4844(&self) -> bool {
        matches!(self, Self::Eip4844)
    }
}
