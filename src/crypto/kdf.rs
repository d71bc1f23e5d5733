use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

use super::{AES_128_KEY_LEN, AES_192_KEY_LEN, AES_256_KEY_LEN};

/// Work factor below which a warning is logged. Not enforced.
pub const RECOMMENDED_MIN_ITERATIONS: u32 = 100_000;

/// PBKDF2 parameters fixed at encryption time and replayed verbatim on
/// decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
    key_length: usize,
}

impl KdfParams {
    pub fn new(iterations: u32, key_length: usize) -> Result<Self> {
        let params = Self {
            iterations,
            key_length,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(Error::DerivationConfig(
                "iteration count must be >= 1".into(),
            ));
        }
        if !matches!(
            self.key_length,
            AES_128_KEY_LEN | AES_192_KEY_LEN | AES_256_KEY_LEN
        ) {
            return Err(Error::DerivationConfig(format!(
                "key length {} is not supported, use 16, 24 or 32",
                self.key_length
            )));
        }
        Ok(())
    }
}

/// Stretch `password` into a key with PBKDF2-HMAC-SHA512.
///
/// Deterministic for the same inputs. The salt must not be empty.
pub fn derive_key(password: &[u8], salt: &[u8], kdf: KdfParams) -> Result<Zeroizing<Vec<u8>>> {
    kdf.validate()?;
    if salt.is_empty() {
        return Err(Error::DerivationConfig("salt must not be empty".into()));
    }

    let mut key = Zeroizing::new(vec![0u8; kdf.key_length]);
    pbkdf2_hmac::<Sha512>(password, salt, kdf.iterations, &mut key);

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams::new(1_000, 32).unwrap()
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key(b"password", &salt, fast()).unwrap();
        let k2 = derive_key(b"password", &salt, fast()).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let k1 = derive_key(b"pw", &salt, KdfParams::new(1_000, 32).unwrap()).unwrap();
        let k2 = derive_key(b"pw", &salt, KdfParams::new(1_001, 32).unwrap()).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn kdf_salt_affects_output() {
        let k1 = derive_key(b"pw", &[1u8; 16], fast()).unwrap();
        let k2 = derive_key(b"pw", &[2u8; 16], fast()).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn output_has_requested_length() {
        for len in [16, 24, 32] {
            let kdf = KdfParams::new(10, len).unwrap();
            assert_eq!(derive_key(b"pw", b"salt", kdf).unwrap().len(), len);
        }
    }

    #[test]
    fn shorter_key_is_prefix_of_longer() {
        // PBKDF2 output blocks are independent of the requested length
        let short = derive_key(b"pw", b"salt", KdfParams::new(10, 16).unwrap()).unwrap();
        let long = derive_key(b"pw", b"salt", KdfParams::new(10, 32).unwrap()).unwrap();
        assert_eq!(&long[..16], &short[..]);
    }

    #[test]
    fn matches_known_pbkdf2_sha512_vector() {
        // RFC 6070 style inputs, SHA-512 variant
        let key = derive_key(b"password", b"salt", KdfParams::new(1, 32).unwrap()).unwrap();
        let expected: [u8; 32] = [
            0x86, 0x7f, 0x70, 0xcf, 0x1a, 0xde, 0x02, 0xcf, 0xf3, 0x75, 0x25, 0x99, 0xa3, 0xa5,
            0x3d, 0xc4, 0xaf, 0x34, 0xc7, 0xa6, 0x69, 0x81, 0x5a, 0xe5, 0xd5, 0x13, 0x55, 0x4e,
            0x1c, 0x8c, 0xf2, 0x52,
        ];
        assert_eq!(&key[..], &expected[..]);
    }

    #[test]
    fn kdf_invalid_params_fail_gracefully() {
        assert!(matches!(
            KdfParams::new(0, 32),
            Err(Error::DerivationConfig(_))
        ));
        assert!(matches!(
            KdfParams::new(1_000, 20),
            Err(Error::DerivationConfig(_))
        ));
    }

    #[test]
    fn empty_salt_is_rejected() {
        assert!(matches!(
            derive_key(b"pw", &[], fast()),
            Err(Error::DerivationConfig(_))
        ));
    }
}
