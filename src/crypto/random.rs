use crate::error::{Error, Result};
use getrandom::fill;

/// Source of cryptographically secure random bytes.
///
/// Salts and nonces come from here. Implementations shared across threads
/// must be safe for concurrent use.
pub trait RandomnessSource {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;
}

/// Random bytes straight from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomness;

impl OsRandomness {
    pub fn new() -> Self {
        Self
    }
}

impl RandomnessSource for OsRandomness {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        fill(&mut buf).map_err(|_| Error::Entropy)?;
        Ok(buf)
    }
}
