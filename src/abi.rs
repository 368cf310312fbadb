use std::collections::HashMap;

use ethers_core::abi::{Abi, Function, FunctionExt, ParamType};
use ethers_core::types::Selector;

/// Parses raw ABI JSON as served by the metadata provider.
pub fn parse_abi(raw: &[u8]) -> Result<Abi, serde_json::Error> {
    serde_json::from_slice(raw)
}

/// Extracts the zero-argument, address-returning getters from an ABI as a
/// name to selector table.
///
/// Constructors, fallback and receive never qualify (`Abi::functions` does
/// not yield them). Overloaded getters sharing a name collapse to a single
/// entry, last one in iteration order wins.
pub fn extract_address_getters(abi: &Abi) -> HashMap<String, Selector> {
    fn is_address_getter(f: &Function) -> bool {
        f.inputs.is_empty() // getters take no arguments
            && f.outputs.len() == 1 // and return exactly one thing
            && f.outputs[0].kind == ParamType::Address // which must be an address
    }

    abi.functions()
        .filter(|f| is_address_getter(f))
        .map(|f| (f.name.clone(), f.selector()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED_ABI: &str = r#"[
        {"type": "constructor", "inputs": [{"name": "owner_", "type": "address"}], "stateMutability": "nonpayable"},
        {"type": "fallback", "stateMutability": "payable"},
        {"type": "receive", "stateMutability": "payable"},
        {"type": "function", "name": "owner", "inputs": [], "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"},
        {"type": "function", "name": "implementation", "inputs": [], "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"},
        {"type": "function", "name": "balanceOf", "inputs": [{"name": "who", "type": "address"}], "outputs": [{"name": "", "type": "address"}], "stateMutability": "view"},
        {"type": "function", "name": "totalSupply", "inputs": [], "outputs": [{"name": "", "type": "uint256"}], "stateMutability": "view"},
        {"type": "function", "name": "pair", "inputs": [], "outputs": [{"name": "a", "type": "address"}, {"name": "b", "type": "address"}], "stateMutability": "view"}
    ]"#;

    #[test]
    fn test_accepts_only_plain_address_getters() {
        let abi = parse_abi(MIXED_ABI.as_bytes()).unwrap();
        let getters = extract_address_getters(&abi);

        assert_eq!(getters.len(), 2);
        // known selectors: keccak("owner()") and keccak("implementation()")
        assert_eq!(getters["owner"], [0x8d, 0xa5, 0xcb, 0x5b]);
        assert_eq!(getters["implementation"], [0x5c, 0x60, 0xda, 0x1b]);

        assert!(!getters.contains_key("balanceOf"));
        assert!(!getters.contains_key("totalSupply"));
        assert!(!getters.contains_key("pair"));
    }

    #[test]
    fn test_empty_abi_yields_no_getters() {
        let abi = parse_abi(b"[]").unwrap();
        assert!(extract_address_getters(&abi).is_empty());
    }

    #[test]
    fn test_malformed_abi_is_an_error() {
        assert!(parse_abi(b"not json").is_err());
    }
}
