//! Password-based file encryption.
//!
//! A password is stretched with PBKDF2-HMAC-SHA512 into an AES-GCM key. The
//! ciphertext travels in a JSON envelope together with the salt, iteration
//! count, key length and nonce needed to reverse it.

pub mod codec;
pub mod config;
pub mod crypto;
mod error;
pub mod format;
pub mod session;
pub mod storage;
pub mod terminal;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use crate::codec::Codec;
pub use crate::config::{CodecConfig, PasswordPolicy, SessionConfig};
pub use crate::error::{Error, Result};
pub use crate::format::{KeyDerivation, Package, Wrapping};
pub use crate::session::{Session, Stage};
pub use crate::storage::{FileStorage, Storage};
pub use crate::terminal::{ConsoleTerminal, Terminal};

/// Extension appended to encrypted output.
pub const ENCRYPTED_EXTENSION: &str = "aes";
/// Extension appended to decrypted output.
pub const DECRYPTED_EXTENSION: &str = "txt";

/// Which way a file is being transformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Output path used when none is given: `<input>.aes` for encryption and
/// `<input>.txt` for decryption.
pub fn default_output_path(input: &Path, direction: Direction) -> PathBuf {
    let extension = match direction {
        Direction::Encrypt => ENCRYPTED_EXTENSION,
        Direction::Decrypt => DECRYPTED_EXTENSION,
    };
    let mut path = OsString::from(input.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
