//! Top-level encrypt/decrypt workflow.
//!
//! Each operation walks the stages
//! `ValidatingInput -> AcquiringSecret -> Processing -> WritingOutput -> Done`
//! strictly in order. Any error aborts the whole operation; nothing is
//! retried and nothing is resumable.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::codec::Codec;
use crate::config::SessionConfig;
use crate::crypto::{AesGcm, Cipher, OsRandomness, RandomnessSource};
use crate::error::{Error, Result};
use crate::format;
use crate::storage::Storage;
use crate::terminal::Terminal;

/// Where an operation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    ValidatingInput,
    AcquiringSecret,
    Processing,
    WritingOutput,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidatingInput => "validating input",
            Stage::AcquiringSecret => "acquiring secret",
            Stage::Processing => "processing",
            Stage::WritingOutput => "writing output",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encrypt => f.write_str("encrypt"),
            Operation::Decrypt => f.write_str("decrypt"),
        }
    }
}

struct Progress {
    operation: Operation,
    stage: Stage,
}

impl Progress {
    fn start(operation: Operation) -> Self {
        debug!(%operation, stage = %Stage::ValidatingInput, "starting");
        Self {
            operation,
            stage: Stage::ValidatingInput,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stages only move forward");
        debug!(operation = %self.operation, from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }

    fn fail(&self, err: Error) -> Error {
        warn!(operation = %self.operation, stage = %self.stage, error = %err, "operation aborted");
        err
    }
}

/// Drives one encryption or decryption from input file to output file.
pub struct Session<T, S, C = AesGcm, R = OsRandomness> {
    config: SessionConfig,
    terminal: T,
    storage: S,
    codec: Codec<C, R>,
}

impl<T, S, C, R> Session<T, S, C, R>
where
    T: Terminal,
    S: Storage,
    C: Cipher,
    R: RandomnessSource,
{
    pub fn new(config: SessionConfig, terminal: T, storage: S, codec: Codec<C, R>) -> Self {
        Self {
            config,
            terminal,
            storage,
            codec,
        }
    }

    /// Encrypts the file at `input` into a new envelope file at `output`.
    pub fn encrypt(&self, input: &Path, output: &Path) -> Result<()> {
        let mut progress = Progress::start(Operation::Encrypt);
        self.run_encrypt(&mut progress, input, output)
            .map_err(|e| progress.fail(e))
    }

    /// Decrypts the envelope file at `input` into a new file at `output`.
    pub fn decrypt(&self, input: &Path, output: &Path) -> Result<()> {
        let mut progress = Progress::start(Operation::Decrypt);
        self.run_decrypt(&mut progress, input, output)
            .map_err(|e| progress.fail(e))
    }

    fn run_encrypt(&self, progress: &mut Progress, input: &Path, output: &Path) -> Result<()> {
        self.check_paths(input, output, "plaintext input", "ciphertext")?;
        let plaintext = Zeroizing::new(
            self.storage
                .read(input)
                .map_err(|e| with_context(e, "failed to read input file"))?,
        );

        progress.advance(Stage::AcquiringSecret);
        let password = self.terminal.password_for_encryption()?;

        progress.advance(Stage::Processing);
        let package = self.codec.encrypt(password.as_bytes(), &plaintext)?;
        drop(password);
        let envelope = format::serialize(&package, self.config.wrapping)?;

        progress.advance(Stage::WritingOutput);
        self.storage
            .write(output, &envelope)
            .map_err(|e| with_context(e, "failed to save encrypted data"))?;

        progress.advance(Stage::Done);
        info!(
            input = %input.display(),
            output = %output.display(),
            bytes = envelope.len(),
            "encrypted"
        );
        Ok(())
    }

    fn run_decrypt(&self, progress: &mut Progress, input: &Path, output: &Path) -> Result<()> {
        self.check_paths(input, output, "ciphertext input", "plaintext")?;
        let envelope = self
            .storage
            .read(input)
            .map_err(|e| with_context(e, "failed to read input file"))?;

        progress.advance(Stage::AcquiringSecret);
        let password = self.terminal.password_for_decryption()?;

        progress.advance(Stage::Processing);
        let package = format::parse(&envelope, self.config.wrapping)?;
        let plaintext = self.codec.decrypt(password.as_bytes(), &package)?;
        drop(password);

        progress.advance(Stage::WritingOutput);
        self.storage
            .write(output, &plaintext)
            .map_err(|e| with_context(e, "failed to save plaintext output"))?;

        progress.advance(Stage::Done);
        info!(
            input = %input.display(),
            output = %output.display(),
            bytes = plaintext.len(),
            "decrypted"
        );
        Ok(())
    }

    fn check_paths(&self, input: &Path, output: &Path, reads: &str, writes: &str) -> Result<()> {
        if !self.storage.exists(input) {
            return Err(Error::PreconditionViolation(format!(
                "the file with {reads} has not been found at: {:?}",
                input.display().to_string()
            )));
        }
        if self.storage.exists(output) {
            return Err(Error::PreconditionViolation(format!(
                "the file with {writes} already exists at {:?}: \
                 specify different output path with -o flag or remove the file",
                output.display().to_string()
            )));
        }
        Ok(())
    }
}

fn with_context(err: Error, context: &str) -> Error {
    match err {
        Error::Io {
            context: inner,
            source,
        } => Error::io(format!("{context}: {inner}"), source),
        other => other,
    }
}
