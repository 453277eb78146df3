//! gcmseal CLI - Password-based file and text encryption
//!
//! Command-line interface for encrypting and decrypting files and short
//! texts with AES-256-GCM under a PBKDF2-HMAC-SHA256 derived key.

use clap::{ArgAction, Parser, Subcommand};
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use gcmseal::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};
use gcmseal::{GcmsealError, file_ops, text_ops};

#[derive(Parser)]
#[command(name = "gcmseal")]
#[command(version)]
#[command(about = "Password-based file and text encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the encrypted data to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the decrypted data to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Update an encrypted file with new content, while validating
    /// that the password is not accidentally changed.
    #[command(alias = "u")]
    Update {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the existing encrypted file to replace
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Encrypt text and print the result as hex
    EncryptText {
        /// Text to encrypt
        text: String,
    },

    /// Decrypt hex-encoded text and print the plaintext
    ///
    /// Plaintext that is not valid UTF-8 is printed as hex.
    DecryptText {
        /// Hex-encoded encrypted text; whitespace is ignored
        hex: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut reader = get_passphrase_reader(cli.passphrase_stdin);

    let result = match cli.command {
        Commands::Encrypt { input, output } => {
            file_ops::encrypt_file(&input, &output, &mut *reader)
        }
        Commands::Decrypt { input, output } => {
            file_ops::decrypt_file(&input, &output, &mut *reader)
        }
        Commands::Update { input, output } => file_ops::update_file(&input, &output, &mut *reader),
        Commands::EncryptText { text } => {
            text_ops::encrypt_text(&text, &mut *reader).map(|armored| println!("{}", armored))
        }
        Commands::DecryptText { hex } => text_ops::decrypt_text(&hex, &mut *reader)
            .map(|plaintext| println!("{}", text_ops::render_plaintext(&plaintext))),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", error_chain(&e));
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Render an error and its sources as "outer: inner: innermost".
fn error_chain(err: &GcmsealError) -> String {
    let mut rendered = err.message().to_string();
    let mut source: Option<&dyn StdError> = err.source_error().map(|e| e as &dyn StdError);
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader::new())
    }
}
