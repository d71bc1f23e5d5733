use aes_gcm::{
    Aes128Gcm, Aes256Gcm,
    aead::{Aead, KeyInit, Nonce, consts::U12},
    aes::Aes192,
};
use zeroize::Zeroizing;

use super::{AES_128_KEY_LEN, AES_192_KEY_LEN, AES_256_KEY_LEN, NONCE_LEN};
use crate::error::{Error, Result};

type Aes192Gcm = aes_gcm::AesGcm<Aes192, U12>;

/// Authenticated encryption over a derived key.
///
/// `open` either returns the whole plaintext or fails; it never hands back
/// partially decrypted data.
pub trait Cipher {
    /// Nonce length this cipher requires.
    fn nonce_len(&self) -> usize;

    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    fn open(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>>;
}

/// AES in Galois/Counter Mode with a 96-bit nonce.
///
/// The key length selects the variant: 16, 24 or 32 bytes for AES-128,
/// AES-192 or AES-256. The authentication tag is appended to the ciphertext.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcm;

impl AesGcm {
    pub fn new() -> Self {
        Self
    }

    fn check_nonce(nonce: &[u8]) -> Result<()> {
        if nonce.len() != NONCE_LEN {
            return Err(Error::InvalidNonceSize {
                expected: NONCE_LEN,
                actual: nonce.len(),
            });
        }
        Ok(())
    }
}

impl Cipher for AesGcm {
    fn nonce_len(&self) -> usize {
        NONCE_LEN
    }

    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        Self::check_nonce(nonce)?;
        match key.len() {
            AES_128_KEY_LEN => seal_with::<Aes128Gcm>(key, nonce, plaintext),
            AES_192_KEY_LEN => seal_with::<Aes192Gcm>(key, nonce, plaintext),
            AES_256_KEY_LEN => seal_with::<Aes256Gcm>(key, nonce, plaintext),
            n => Err(unsupported_key(n)),
        }
    }

    fn open(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        Self::check_nonce(nonce)?;
        let plaintext = match key.len() {
            AES_128_KEY_LEN => open_with::<Aes128Gcm>(key, nonce, ciphertext)?,
            AES_192_KEY_LEN => open_with::<Aes192Gcm>(key, nonce, ciphertext)?,
            AES_256_KEY_LEN => open_with::<Aes256Gcm>(key, nonce, ciphertext)?,
            n => return Err(unsupported_key(n)),
        };
        Ok(Zeroizing::new(plaintext))
    }
}

fn unsupported_key(len: usize) -> Error {
    Error::DerivationConfig(format!("no AES-GCM variant for a {len}-byte key"))
}

fn init<A: KeyInit>(key: &[u8]) -> Result<A> {
    A::new_from_slice(key).map_err(|_| unsupported_key(key.len()))
}

fn seal_with<A: Aead + KeyInit>(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    init::<A>(key)?
        .encrypt(Nonce::<A>::from_slice(nonce), plaintext)
        .map_err(|_| Error::Encryption)
}

fn open_with<A: Aead + KeyInit>(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    init::<A>(key)?
        .decrypt(Nonce::<A>::from_slice(nonce), ciphertext)
        .map_err(|_| Error::AuthenticationFailure)
}
