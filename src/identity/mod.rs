//! On-chain identity proofs: account addresses and challenge signatures

mod signature;
mod ss58;
#[cfg(test)]
pub mod testing;

pub use signature::{verify_challenge, SIGNATURE_HEX_LEN};
