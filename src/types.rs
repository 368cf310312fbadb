use ethers_core::types::Address;

/// The three EIP-1967 proxy addresses read from a contract's fixed slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eip1967Slots {
    pub implementation: Address,
    pub beacon: Address,
    pub admin: Address,
}

impl Eip1967Slots {
    /// True iff none of the three slots holds a non-zero address,
    /// i.e. the contract shows no EIP-1967 proxy relationship.
    pub fn is_empty(&self) -> bool {
        self.implementation == Address::zero()
            && self.beacon == Address::zero()
            && self.admin == Address::zero()
    }
}

/// Verified contract metadata as served by the provider.
///
/// Consumed once per node: the name becomes the node's own name and the ABI
/// feeds the getter classifier.
#[derive(Clone, Debug)]
pub struct ContractMetadata {
    pub source_code: String,
    pub constructor_args: Vec<u8>,
    pub contract_name: String,
    pub abi: Vec<u8>,
}
