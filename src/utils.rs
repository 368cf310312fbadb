use ethers_core::types::{Address, H256};

/// Converts raw return data to an address, right-aligned.
///
/// Takes the last 20 bytes when the input is longer, left-pads with zeros
/// when it is shorter. An empty slice yields the zero address.
#[inline(always)]
pub fn bytes_to_address(bytes: &[u8]) -> Address {
    if bytes.len() >= 20 {
        Address::from_slice(&bytes[bytes.len() - 20..])
    } else {
        let mut buf = [0u8; 20];
        buf[20 - bytes.len()..].copy_from_slice(bytes);
        Address::from(buf)
    }
}

/// Extracts the address stored in the low 20 bytes of a storage word.
#[inline(always)]
pub fn h256_to_address(word: &H256) -> Address {
    Address::from_slice(&word.as_bytes()[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_address() {
        let addr = hex_literal::hex!("bebebebebebebebebebebebebebebebebebebebe");
        assert_eq!(bytes_to_address(&addr), Address::from(addr));

        // 32-byte word, address right-aligned
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&addr);
        assert_eq!(bytes_to_address(&word), Address::from(addr));

        // short input is left-padded
        assert_eq!(
            bytes_to_address(&[0xaa, 0xbb]),
            Address::from(hex_literal::hex!(
                "000000000000000000000000000000000000aabb"
            ))
        );

        assert_eq!(bytes_to_address(&[]), Address::zero());
    }

    #[test]
    fn test_h256_to_address() {
        let word = H256(hex_literal::hex!(
            "000000000000000000000000bebebebebebebebebebebebebebebebebebebebe"
        ));
        assert_eq!(
            h256_to_address(&word),
            Address::from(hex_literal::hex!(
                "bebebebebebebebebebebebebebebebebebebebe"
            ))
        );
        assert_eq!(h256_to_address(&H256::zero()), Address::zero());
    }
}
