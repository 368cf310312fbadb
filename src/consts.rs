use ethers_core::types::H256;
use once_cell::sync::Lazy;

// EIP-1967 fixed storage slot keys. Protocol constants published in the EIP,
// never computed at runtime.

pub static EIP1967_IMPLEMENTATION_SLOT: Lazy<H256> = Lazy::new(|| {
    H256(hex_literal::hex!(
        "360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc"
    ))
});

pub static EIP1967_BEACON_SLOT: Lazy<H256> = Lazy::new(|| {
    H256(hex_literal::hex!(
        "a3f0ad74e5423aebfd80d3ef4346578335a9a72aeaee59ff6cb3582b35133d50"
    ))
});

pub static EIP1967_ADMIN_SLOT: Lazy<H256> = Lazy::new(|| {
    H256(hex_literal::hex!(
        "b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103"
    ))
});
