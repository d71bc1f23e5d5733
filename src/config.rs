//! Operation parameters with their defaults.
//!
//! Built once at startup and handed to the codec, terminal and session.

use tracing::warn;

use crate::crypto::{KdfParams, NONCE_LEN, kdf::RECOMMENDED_MIN_ITERATIONS};
use crate::error::{Error, Result};
use crate::format::Wrapping;

/// Default minimum password length, in bytes.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length, in bytes. Only limits user input.
pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 255;
/// Default salt length used to derive the key.
pub const DEFAULT_SALT_LENGTH: usize = 128;
/// Default nonce length; AES-GCM accepts nothing else.
pub const DEFAULT_NONCE_LENGTH: usize = NONCE_LEN;
/// Default PBKDF2 iteration count.
pub const DEFAULT_KEY_DERIVATION_ITERATIONS: u32 = 1_000_000;
/// Default derived key length; 32 selects AES-256.
pub const DEFAULT_KEY_DERIVATION_LENGTH: usize = 32;

/// Parameters fixed at encryption time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub salt_length: usize,
    pub nonce_length: usize,
    pub iterations: u32,
    pub key_length: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            salt_length: DEFAULT_SALT_LENGTH,
            nonce_length: DEFAULT_NONCE_LENGTH,
            iterations: DEFAULT_KEY_DERIVATION_ITERATIONS,
            key_length: DEFAULT_KEY_DERIVATION_LENGTH,
        }
    }
}

impl CodecConfig {
    pub fn kdf_params(&self) -> Result<KdfParams> {
        KdfParams::new(self.iterations, self.key_length)
    }

    /// Checks the parameters before any randomness or key stretching is spent.
    pub fn validate(&self) -> Result<()> {
        if self.nonce_length != NONCE_LEN {
            return Err(Error::InvalidNonceSize {
                expected: NONCE_LEN,
                actual: self.nonce_length,
            });
        }
        if self.salt_length == 0 {
            return Err(Error::DerivationConfig("salt length must be >= 1".into()));
        }
        self.kdf_params()?;

        if self.iterations < RECOMMENDED_MIN_ITERATIONS {
            warn!(
                iterations = self.iterations,
                recommended = RECOMMENDED_MIN_ITERATIONS,
                "key derivation iteration count is low"
            );
        }
        Ok(())
    }
}

/// Bounds a password must satisfy, measured in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_length: DEFAULT_MAX_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize, max_length: usize) -> Result<Self> {
        if min_length > max_length {
            return Err(Error::Input(format!(
                "minimum password length {min_length} exceeds maximum {max_length}"
            )));
        }
        Ok(Self {
            min_length,
            max_length,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validates a new password and its confirmation.
    pub fn check_new(&self, password: &str, confirmation: &str) -> Result<()> {
        self.check_new_bounds(password)?;
        if password != confirmation {
            return Err(Error::Input("passwords do not match".into()));
        }
        Ok(())
    }

    /// Validates the first entry of a new password.
    pub fn check_new_bounds(&self, password: &str) -> Result<()> {
        if password.len() < self.min_length {
            return Err(Error::Input(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        self.check_max(password)
    }

    /// Validates a password for an existing package. No minimum applies:
    /// it may predate the current policy.
    pub fn check_existing(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::Input("decryption password can't be empty".into()));
        }
        self.check_max(password)
    }

    fn check_max(&self, password: &str) -> Result<()> {
        if password.len() > self.max_length {
            return Err(Error::Input(format!(
                "passwords longer than {} are not supported",
                self.max_length
            )));
        }
        Ok(())
    }
}

/// Session behaviour toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub wrapping: Wrapping,
}
