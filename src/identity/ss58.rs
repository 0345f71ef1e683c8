//! SS58 account address decoding

use blake2::{Blake2b512, Digest};

use crate::error::{BotError, Result};

const SS58_HASH_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const PUBLIC_KEY_LEN: usize = 32;

fn ss58_hash(data: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_HASH_PREFIX);
    hasher.update(data);
    hasher.finalize().to_vec()
}

fn invalid(address: &str, reason: &str) -> BotError {
    BotError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    }
}

/// Extract the 32-byte public key from an SS58 address (any network prefix)
/// or from a `0x`-prefixed hex public key.
pub fn decode_public_key(address: &str) -> Result<[u8; PUBLIC_KEY_LEN]> {
    let address = address.trim();

    if let Some(hex_key) = address.strip_prefix("0x") {
        let bytes = hex::decode(hex_key).map_err(|_| invalid(address, "invalid hex"))?;
        return bytes
            .try_into()
            .map_err(|_| invalid(address, "hex public key must be 32 bytes"));
    }

    let data = bs58::decode(address)
        .into_vec()
        .map_err(|_| invalid(address, "invalid base58"))?;

    let prefix_len = match data.first().copied() {
        Some(0..=63) => 1,
        Some(64..=127) => 2,
        _ => return Err(invalid(address, "unsupported network prefix")),
    };
    if data.len() != prefix_len + PUBLIC_KEY_LEN + CHECKSUM_LEN {
        return Err(invalid(address, "unexpected length"));
    }

    let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if ss58_hash(body)[..CHECKSUM_LEN] != *checksum {
        return Err(invalid(address, "checksum mismatch"));
    }

    let mut public_key = [0u8; PUBLIC_KEY_LEN];
    public_key.copy_from_slice(&body[prefix_len..]);
    Ok(public_key)
}

/// Encode a public key as an SS58 address for the given network prefix
#[cfg(test)]
pub fn encode_address(public_key: &[u8; PUBLIC_KEY_LEN], prefix: u16) -> String {
    let mut data = if prefix < 64 {
        vec![prefix as u8]
    } else {
        vec![
            (((prefix & 0b1111_1100) >> 2) as u8) | 0b0100_0000,
            ((prefix >> 8) as u8) | (((prefix & 0b0000_0011) as u8) << 6),
        ]
    };
    data.extend_from_slice(public_key);
    let checksum = ss58_hash(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    bs58::encode(data).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_PUBLIC: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";
    const ALICE_SUBSTRATE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn alice_key() -> [u8; 32] {
        hex::decode(ALICE_PUBLIC).unwrap().try_into().unwrap()
    }

    #[test]
    fn test_decode_known_address() {
        assert_eq!(decode_public_key(ALICE_SUBSTRATE).unwrap(), alice_key());
    }

    #[test]
    fn test_encode_known_address() {
        assert_eq!(encode_address(&alice_key(), 42), ALICE_SUBSTRATE);
    }

    #[test]
    fn test_two_byte_prefix_roundtrip() {
        // Joystream uses prefix 126
        let address = encode_address(&alice_key(), 126);
        assert_eq!(address, "j4W7rVcUCxi2crhhjRq46fNDRbVHTjJrz6bKxZwehEMQxZeSf");
        assert_eq!(decode_public_key(&address).unwrap(), alice_key());
    }

    #[test]
    fn test_hex_public_key() {
        let hex_key = format!("0x{}", ALICE_PUBLIC);
        assert_eq!(decode_public_key(&hex_key).unwrap(), alice_key());
        assert!(decode_public_key("0xd435").is_err());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let mut tampered = ALICE_SUBSTRATE.to_string();
        tampered.pop();
        tampered.push('Z');
        assert!(matches!(
            decode_public_key(&tampered),
            Err(BotError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_public_key("not an address").is_err());
        assert!(decode_public_key("").is_err());
    }
}
