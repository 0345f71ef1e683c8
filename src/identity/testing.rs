//! Deterministic on-chain accounts for tests

use ed25519_dalek::Signer;

use super::ss58::encode_address;

const JOYSTREAM_PREFIX: u16 = 126;

pub enum TestAccount {
    Sr25519(schnorrkel::Keypair),
    Ed25519(ed25519_dalek::SigningKey),
}

impl TestAccount {
    pub fn sr25519(seed: u8) -> Self {
        let mini = schnorrkel::MiniSecretKey::from_bytes(&[seed; 32]).unwrap();
        TestAccount::Sr25519(mini.expand_to_keypair(schnorrkel::ExpansionMode::Ed25519))
    }

    pub fn ed25519(seed: u8) -> Self {
        TestAccount::Ed25519(ed25519_dalek::SigningKey::from_bytes(&[seed; 32]))
    }

    pub fn address(&self) -> String {
        let public_key = match self {
            TestAccount::Sr25519(keypair) => keypair.public.to_bytes(),
            TestAccount::Ed25519(key) => key.verifying_key().to_bytes(),
        };
        encode_address(&public_key, JOYSTREAM_PREFIX)
    }

    /// Hex signature (`0x...`) over `message`
    pub fn sign(&self, message: &str) -> String {
        let signature = match self {
            TestAccount::Sr25519(keypair) => keypair
                .sign_simple(b"substrate", message.as_bytes())
                .to_bytes(),
            TestAccount::Ed25519(key) => key.sign(message.as_bytes()).to_bytes(),
        };
        format!("0x{}", hex::encode(signature))
    }
}
