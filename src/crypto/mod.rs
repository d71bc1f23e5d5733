//! Cryptographic primitives for the codec.
//!
//! Provides randomness, PBKDF2 key derivation and AES-GCM sealing.

pub mod aead;
pub mod kdf;
pub mod random;

pub use aead::{AesGcm, Cipher};
pub use kdf::{KdfParams, derive_key};
pub use random::{OsRandomness, RandomnessSource};

/// Length of the AES-GCM nonce (12 bytes / 96 bits).
pub const NONCE_LEN: usize = 12;
/// Length of the authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;
/// Key length selecting AES-128-GCM.
pub const AES_128_KEY_LEN: usize = 16;
/// Key length selecting AES-192-GCM.
pub const AES_192_KEY_LEN: usize = 24;
/// Key length selecting AES-256-GCM.
pub const AES_256_KEY_LEN: usize = 32;
