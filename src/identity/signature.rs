//! Verification of signed claim challenges.
//!
//! A signature is `0x` followed by 128 hex digits. It is accepted if it is a
//! valid sr25519 (`substrate` signing context) or ed25519 signature by the
//! claimed account over the challenge, either as-is or wrapped in
//! `<Bytes>...</Bytes>` the way browser wallets sign raw payloads.

use ed25519_dalek::VerifyingKey;

use super::ss58::decode_public_key;
use crate::error::{BotError, Result};

/// Length of a hex-encoded signature including the `0x` prefix
pub const SIGNATURE_HEX_LEN: usize = 130;

const SIGNING_CONTEXT: &[u8] = b"substrate";
const WRAP_PREFIX: &[u8] = b"<Bytes>";
const WRAP_POSTFIX: &[u8] = b"</Bytes>";

/// Decode a `0x`-prefixed 64-byte signature
pub fn parse_signature(signature: &str) -> Result<[u8; 64]> {
    let hex_sig = signature
        .trim()
        .strip_prefix("0x")
        .ok_or_else(|| BotError::InvalidSignature {
            reason: "missing 0x prefix".to_string(),
        })?;

    let bytes = hex::decode(hex_sig).map_err(|e| BotError::InvalidSignature {
        reason: e.to_string(),
    })?;

    bytes.try_into().map_err(|_| BotError::InvalidSignature {
        reason: "signature must be 64 bytes".to_string(),
    })
}

fn wrap_bytes(message: &[u8]) -> Vec<u8> {
    [WRAP_PREFIX, message, WRAP_POSTFIX].concat()
}

fn verify_sr25519(public_key: &[u8; 32], signature: &[u8; 64], message: &[u8]) -> bool {
    let Ok(key) = schnorrkel::PublicKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = schnorrkel::Signature::from_bytes(signature) else {
        return false;
    };
    key.verify_simple(SIGNING_CONTEXT, message, &signature).is_ok()
}

fn verify_ed25519(public_key: &[u8; 32], signature: &[u8; 64], message: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature);
    key.verify_strict(message, &signature).is_ok()
}

/// Check that `signature` is `address`'s signature over `challenge`.
///
/// Malformed addresses or signatures are errors; a well-formed signature by
/// someone else is `Ok(false)`.
pub fn verify_challenge(challenge: &str, signature: &str, address: &str) -> Result<bool> {
    let public_key = decode_public_key(address)?;
    let signature = parse_signature(signature)?;

    let raw = challenge.as_bytes();
    let wrapped = wrap_bytes(raw);

    Ok([raw, wrapped.as_slice()].iter().any(|message| {
        verify_sr25519(&public_key, &signature, message)
            || verify_ed25519(&public_key, &signature, message)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::testing::TestAccount;

    #[test]
    fn test_signature_length_constant_matches_encoding() {
        let account = TestAccount::sr25519(1);
        assert_eq!(account.sign("challenge").len(), SIGNATURE_HEX_LEN);
    }

    #[test]
    fn test_parse_signature() {
        let sig = format!("0x{}", "ab".repeat(64));
        assert_eq!(parse_signature(&sig).unwrap(), [0xab; 64]);

        assert!(parse_signature(&"ab".repeat(65)).is_err());
        assert!(parse_signature(&format!("0x{}", "zz".repeat(64))).is_err());
        assert!(parse_signature(&format!("0x{}", "ab".repeat(63))).is_err());
    }

    #[test]
    fn test_sr25519_signature_verifies() {
        let account = TestAccount::sr25519(1);
        let signature = account.sign("nonce-123");
        assert!(verify_challenge("nonce-123", &signature, &account.address()).unwrap());
    }

    #[test]
    fn test_ed25519_signature_verifies() {
        let account = TestAccount::ed25519(2);
        let signature = account.sign("nonce-123");
        assert!(verify_challenge("nonce-123", &signature, &account.address()).unwrap());
    }

    #[test]
    fn test_wallet_wrapped_signature_verifies() {
        let account = TestAccount::sr25519(3);
        let signature = account.sign("<Bytes>nonce-123</Bytes>");
        assert!(verify_challenge("nonce-123", &signature, &account.address()).unwrap());
    }

    #[test]
    fn test_wrong_challenge_or_signer_fails() {
        let alice = TestAccount::sr25519(1);
        let bob = TestAccount::ed25519(2);
        let signature = alice.sign("nonce-123");

        assert!(!verify_challenge("nonce-456", &signature, &alice.address()).unwrap());
        assert!(!verify_challenge("nonce-123", &signature, &bob.address()).unwrap());
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let account = TestAccount::sr25519(1);
        let signature = account.sign("nonce");
        assert!(verify_challenge("nonce", &signature, "garbage").is_err());
        assert!(verify_challenge("nonce", "0x1234", &account.address()).is_err());
    }
}
