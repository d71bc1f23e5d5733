use std::fmt;
use std::io;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way an encrypt or decrypt operation can abort.
///
/// Messages name what failed but never why a ciphertext refused to open:
/// a wrong password and a tampered package look the same from outside.
#[derive(Debug)]
pub enum Error {
    /// Missing input file or an output file that already exists.
    PreconditionViolation(String),
    /// Password mismatch, out-of-bounds length or empty decryption password.
    Input(String),
    /// The randomness source could not produce bytes.
    Entropy,
    /// Nonce length does not match what the cipher requires.
    InvalidNonceSize { expected: usize, actual: usize },
    /// Key derivation parameters the cipher cannot work with.
    DerivationConfig(String),
    /// The cipher refused to seal the plaintext.
    Encryption,
    /// Wrong password, corrupted data or tampering.
    AuthenticationFailure,
    /// The package could not be written out as an envelope.
    Encode(String),
    /// Malformed envelope text or fields.
    Decode(String),
    /// Reading or writing a file failed.
    Io { context: String, source: io::Error },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PreconditionViolation(msg) => write!(f, "{msg}"),
            Error::Input(msg) => write!(f, "invalid password input: {msg}"),
            Error::Entropy => write!(f, "OS random generator unavailable"),
            Error::InvalidNonceSize { expected, actual } => {
                write!(f, "incorrect nonce size: {actual}, must be {expected}")
            }
            Error::DerivationConfig(msg) => write!(f, "invalid key derivation parameters: {msg}"),
            Error::Encryption => write!(f, "encryption failed"),
            Error::AuthenticationFailure => write!(f, "Invalid password or corrupted data"),
            Error::Encode(msg) => write!(f, "failed to encode encrypted package: {msg}"),
            Error::Decode(msg) => write!(f, "malformed encrypted package: {msg}"),
            Error::Io { context, .. } => write!(f, "{context}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
