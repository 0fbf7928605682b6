use crate::constants::GWEI_TO_WEI;
use alloy_primitives::Address;
use alloy_rlp::{RlpDecodable, RlpDecodableWrapper, RlpEncodable, RlpEncodableWrapper};
use std::ops::Deref;

/// A validator withdrawal pushed down from the consensus layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, RlpEncodable, RlpDecodable)]
pub struct Withdrawal {
    /// Monotonically increasing identifier issued by the consensus layer.
    pub index: u64,
    /// Index of the validator the withdrawal belongs to.
    pub validator_index: u64,
    /// Target address for the withdrawn ether.
    pub address: Address,
    /// Value of the withdrawal, in gwei.
    pub amount: u64,
}

impl Withdrawal {
    /// The withdrawal amount in wei.
    pub fn amount_wei(&self) -> u128 {
        self.amount as u128 * GWEI_TO_WEI as u128
    }
}

/// An ordered collection of withdrawals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash, RlpEncodableWrapper, RlpDecodableWrapper)]
pub struct Withdrawals(Vec<Withdrawal>);

impl Withdrawals {
    /// Wraps a list of withdrawals.
    pub fn new(withdrawals: Vec<Withdrawal>) -> Self {
        Self(withdrawals)
    }

    /// Unwraps into the raw list.
    pub fn into_inner(self) -> Vec<Withdrawal> {
        self.0
    }
}

impl Deref for Withdrawals {
    type Target = Vec<Withdrawal>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Withdrawals {
    type Item = Withdrawal;
    type IntoIter = std::vec::IntoIter<Withdrawal>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl AsRef<[Withdrawal]> for Withdrawals {
    fn as_ref(&self) -> &[Withdrawal] {
        &self.0
    }
}

impl FromIterator<Withdrawal> for Withdrawals {
    fn from_iter<T: IntoIterator<Item = Withdrawal>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
