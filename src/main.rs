use std::path::PathBuf;

use aesgcm::config::{
    DEFAULT_KEY_DERIVATION_ITERATIONS, DEFAULT_KEY_DERIVATION_LENGTH, DEFAULT_MAX_PASSWORD_LENGTH,
    DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_NONCE_LENGTH, DEFAULT_SALT_LENGTH,
};
use aesgcm::{
    Codec, CodecConfig, ConsoleTerminal, Direction, FileStorage, PasswordPolicy, Session,
    SessionConfig, Wrapping, default_output_path,
};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct PasswordArgs {
    /// Minimum password length requirement for encryption
    #[arg(
        short = 'p',
        long = "min-password-length",
        global = true,
        env = "AESGCM_MIN_PASSWORD_LENGTH",
        default_value_t = DEFAULT_MIN_PASSWORD_LENGTH
    )]
    min_length: usize,

    /// Maximum accepted password length
    #[arg(
        long = "max-password-length",
        global = true,
        env = "AESGCM_MAX_PASSWORD_LENGTH",
        default_value_t = DEFAULT_MAX_PASSWORD_LENGTH
    )]
    max_length: usize,
}

impl PasswordArgs {
    fn to_policy(&self) -> Result<PasswordPolicy> {
        Ok(PasswordPolicy::new(self.min_length, self.max_length)?)
    }
}

#[derive(Debug, clap::Args)]
struct CodecArgs {
    /// Salt length used to derive the key. Don't change unless you're absolutely confident
    #[arg(
        long,
        global = true,
        env = "AESGCM_SALT_LENGTH",
        default_value_t = DEFAULT_SALT_LENGTH
    )]
    salt_length: usize,

    /// Nonce length, must be unique per key. Don't change unless you're absolutely confident
    #[arg(
        long,
        global = true,
        env = "AESGCM_NONCE_LENGTH",
        default_value_t = DEFAULT_NONCE_LENGTH
    )]
    nonce_length: usize,

    /// PBKDF2 iterations used to derive the key. Don't change unless you're absolutely confident
    #[arg(
        long,
        global = true,
        env = "AESGCM_KEY_DERIVATION_ITERATIONS",
        default_value_t = DEFAULT_KEY_DERIVATION_ITERATIONS
    )]
    key_derivation_iterations: u32,

    /// Length of the derived key: 16, 24 or 32 selects AES-128, AES-192 or AES-256
    #[arg(
        long,
        global = true,
        env = "AESGCM_KEY_DERIVATION_LENGTH",
        default_value_t = DEFAULT_KEY_DERIVATION_LENGTH
    )]
    key_derivation_length: usize,
}

impl CodecArgs {
    fn to_config(&self) -> CodecConfig {
        CodecConfig {
            salt_length: self.salt_length,
            nonce_length: self.nonce_length,
            iterations: self.key_derivation_iterations,
            key_length: self.key_derivation_length,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "aesgcm")]
#[command(
    version,
    about = "Encrypts or decrypts a file with password using AES-GCM algorithm."
)]
struct Cli {
    /// Redirect output into the specified file [default: INPUT.aes or INPUT.txt]
    #[arg(short, long, global = true, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Read and write bare JSON instead of wrapping the package in Base64
    #[arg(long, global = true, env = "AESGCM_DISABLE_BASE64")]
    disable_base64: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    password: PasswordArgs,

    #[command(flatten)]
    codec: CodecArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a file, writing INPUT.aes by default
    #[command(arg_required_else_help = true)]
    Encrypt { input: PathBuf },

    /// Decrypts a file, writing INPUT.txt by default
    #[command(arg_required_else_help = true)]
    Decrypt { input: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // optional; flags may also come from the environment
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    init_logging(args.verbose);

    let session_cfg = SessionConfig {
        wrapping: if args.disable_base64 {
            Wrapping::None
        } else {
            Wrapping::Base64
        },
    };
    let terminal = ConsoleTerminal::new(args.password.to_policy()?);
    let codec = Codec::with_defaults(args.codec.to_config());
    let session = Session::new(session_cfg, terminal, FileStorage::new(), codec);

    match args.command {
        Commands::Encrypt { input } => {
            let output = args
                .output
                .unwrap_or_else(|| default_output_path(&input, Direction::Encrypt));
            session
                .encrypt(&input, &output)
                .context("encryption failed")?;
            println!("Successfully encrypted to {:?}", output.display().to_string());
        }
        Commands::Decrypt { input } => {
            let output = args
                .output
                .unwrap_or_else(|| default_output_path(&input, Direction::Decrypt));
            session
                .decrypt(&input, &output)
                .context("decryption failed")?;
            println!("Successfully decrypted to {:?}", output.display().to_string());
        }
    }

    Ok(())
}
