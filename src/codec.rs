use tracing::debug;
use zeroize::Zeroizing;

use crate::config::CodecConfig;
use crate::crypto::{AesGcm, Cipher, OsRandomness, RandomnessSource, derive_key};
use crate::error::{Error, Result};
use crate::format::{KeyDerivation, Package};

/// Turns a password and plaintext into a self-contained [`Package`] and back.
///
/// Holds only immutable configuration, so one instance can serve many
/// operations as long as the randomness source tolerates shared use.
#[derive(Debug, Clone)]
pub struct Codec<C = AesGcm, R = OsRandomness> {
    config: CodecConfig,
    cipher: C,
    rnd: R,
}

impl Codec {
    /// AES-GCM with OS randomness.
    pub fn with_defaults(config: CodecConfig) -> Self {
        Self::new(config, AesGcm::new(), OsRandomness::new())
    }
}

impl<C: Cipher, R: RandomnessSource> Codec<C, R> {
    pub fn new(config: CodecConfig, cipher: C, rnd: R) -> Self {
        Self { config, cipher, rnd }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encrypts `plaintext` under a key stretched from `password` with a
    /// fresh salt and nonce.
    pub fn encrypt(&self, password: &[u8], plaintext: &[u8]) -> Result<Package> {
        self.config.validate()?;
        let kdf = self.config.kdf_params()?;

        let salt = self.rnd.random_bytes(self.config.salt_length)?;
        let nonce = self.rnd.random_bytes(self.config.nonce_length)?;

        debug!(
            iterations = kdf.iterations(),
            key_length = kdf.key_length(),
            salt_length = salt.len(),
            "deriving encryption key"
        );
        let key = derive_key(password, &salt, kdf)?;
        let ciphertext = self.cipher.seal(&key, &nonce, plaintext)?;
        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "sealed plaintext"
        );

        Ok(Package::new(
            KeyDerivation::new(salt, kdf.iterations(), kdf.key_length()),
            nonce,
            ciphertext,
        ))
    }

    /// Decrypts `package` with the derivation parameters it carries.
    ///
    /// The configured defaults play no part here.
    pub fn decrypt(&self, password: &[u8], package: &Package) -> Result<Zeroizing<Vec<u8>>> {
        let kd = package.key_derivation();
        let kdf = kd.kdf_params()?;

        let expected = self.cipher.nonce_len();
        if package.nonce().len() != expected {
            return Err(Error::InvalidNonceSize {
                expected,
                actual: package.nonce().len(),
            });
        }

        debug!(
            iterations = kdf.iterations(),
            key_length = kdf.key_length(),
            salt_length = kd.salt().len(),
            "re-deriving decryption key"
        );
        let key = derive_key(password, kd.salt(), kdf)?;
        self.cipher.open(&key, package.nonce(), package.ciphertext())
    }
}
