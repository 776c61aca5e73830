//! # Shared Crypto - Signature Subsystem
//!
//! Key generation, wallet-identifier derivation and message signing for the
//! ledger. Every other crate in the workspace goes through this one for
//! anything cryptographic.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Transaction signing and verification |
//! | `hashing` | SHA-256 | Block hashes, transaction ids, output ids |
//! | `wallet` | SHA-256(public key) | Canonical wallet addresses |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **Verification**: constant-time with respect to secret material, never
//!   panics on malformed input (returns `false` / `Err`)
//! - **Key generation**: seeds come from the OS entropy source; exhaustion is
//!   surfaced as [`CryptoError::KeyGenerationFailed`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;
pub mod wallet;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, sha256_hex, Hash, Sha256Hasher};
pub use signatures::{verify_signature, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use wallet::{is_valid_wallet_id, wallet_id, WALLET_ID_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate a fresh keypair and return `(private seed, public key)`.
///
/// Thin functional wrapper over [`Ed25519KeyPair::generate`] for callers that
/// store the two halves separately.
pub fn generate_keypair() -> Result<([u8; 32], Ed25519PublicKey), CryptoError> {
    let keypair = Ed25519KeyPair::generate()?;
    Ok((keypair.to_seed(), keypair.public_key()))
}
