//! Portable envelope for encrypted packages.
//!
//! A package is serialized to a JSON record whose byte fields are base64
//! encoded, then optionally wrapped in one more base64 pass so the file
//! holds only printable characters.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::crypto::KdfParams;
use crate::error::{Error, Result};

mod json;

/// Outer transport encoding applied around the JSON record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Wrapping {
    /// Base64 over the whole JSON record.
    #[default]
    Base64,
    /// Bare JSON.
    None,
}

/// Key derivation parameters carried with the ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDerivation {
    salt: Vec<u8>,
    iterations: u32,
    length: usize,
}

impl KeyDerivation {
    pub fn new(salt: Vec<u8>, iterations: u32, length: usize) -> Self {
        Self {
            salt,
            iterations,
            length,
        }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Validated PBKDF2 parameters for replaying the derivation.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        KdfParams::new(self.iterations, self.length)
    }
}

/// Everything needed to reverse one encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    key_derivation: KeyDerivation,
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl Package {
    pub fn new(key_derivation: KeyDerivation, nonce: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self {
            key_derivation,
            nonce,
            ciphertext,
        }
    }

    pub fn key_derivation(&self) -> &KeyDerivation {
        &self.key_derivation
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// Serializes a package to its envelope bytes.
///
/// Output is byte-stable for a given package and wrapping.
pub fn serialize(package: &Package, wrapping: Wrapping) -> Result<Vec<u8>> {
    let json = json::encode(package)?;
    match wrapping {
        Wrapping::None => Ok(json),
        Wrapping::Base64 => Ok(STANDARD.encode(json).into_bytes()),
    }
}

/// Parses envelope bytes back into a package.
///
/// # Errors
///
/// Returns [`Error::Decode`] if:
/// - The outer base64 wrapping is invalid (when enabled)
/// - The record is not valid JSON or misses a field
/// - A byte field is not valid base64
pub fn parse(data: &[u8], wrapping: Wrapping) -> Result<Package> {
    match wrapping {
        Wrapping::None => json::decode(data),
        Wrapping::Base64 => {
            let json = STANDARD
                .decode(data.trim_ascii())
                .map_err(|e| Error::Decode(format!("failed to decode Base64 data: {e}")))?;
            json::decode(&json)
        }
    }
}
