//! Command-line surface and dispatch.

use clap::{Parser, Subcommand};
use envelope::EnvelopeError;
use kv_store::{JsonFileStore, StoreError};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

const ENV_HELP: &str = "\
Environment:
  ENVELOPE_KEY         base64 of the 32-byte key (all commands but list)
  ENVELOPE_STORE_FILE  token store path [default: tokens.json]
  ENVELOPE_LOG_LEVEL   log level, overridden by RUST_LOG [default: warn]";

#[derive(Parser, Debug)]
#[command(name = "envelope-cli", version)]
#[command(subcommand_required = true, arg_required_else_help = true)]
#[command(about = "Encode, decode and store AES-256-GCM envelope tokens")]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Errors produced while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command needs a key and none was supplied.
    #[error("ENVELOPE_KEY is required for {0}")]
    MissingKey(&'static str),

    /// `get` named an entry that is not in the store.
    #[error("no token stored under {0:?}")]
    UnknownName(String),

    /// The store holds something other than a token string under this name.
    #[error("entry {0:?} is not a token string")]
    NotAToken(String),

    /// The envelope codec rejected the key or the token.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The token store could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a token for PLAINTEXT
    Encode { plaintext: String },
    /// Print the plaintext inside TOKEN
    Decode { token: String },
    /// Encode PLAINTEXT and store the token as NAME
    Put { name: String, plaintext: String },
    /// Decode the token stored as NAME
    Get { name: String },
    /// Print stored names, one per line
    List,
}

impl Command {
    /// Short name used in logs. Never includes arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Encode { .. } => "encode",
            Command::Decode { .. } => "decode",
            Command::Put { .. } => "put",
            Command::Get { .. } => "get",
            Command::List => "list",
        }
    }

    /// Whether the command touches the codec. `list` only reads names.
    pub fn needs_key(&self) -> bool {
        !matches!(self, Command::List)
    }

    /// Execute the command, returning what should be printed to stdout.
    ///
    /// `key` may be `None` only for commands where [`needs_key`] is false.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the key is missing, the codec rejects the
    /// input, or the store cannot be written.
    ///
    /// [`needs_key`]: Command::needs_key
    pub fn run(
        self,
        key: Option<&[u8]>,
        store: &JsonFileStore,
    ) -> Result<Option<String>, CommandError> {
        let name = self.name();
        let key = move || key.ok_or(CommandError::MissingKey(name));
        match self {
            Command::Encode { plaintext } => Ok(Some(envelope::encode(&plaintext, key()?)?)),
            Command::Decode { token } => Ok(Some(envelope::decode(&token, key()?)?)),
            Command::Put { name, plaintext } => {
                let token = envelope::encode(&plaintext, key()?)?;
                let mut entries = store.load();
                entries.insert(name.clone(), Value::String(token));
                store.save(&entries)?;
                info!(name = %name, entries = entries.len(), "token stored");
                Ok(None)
            }
            Command::Get { name } => {
                let entries = store.load();
                let token = match entries.get(&name) {
                    Some(Value::String(token)) => token,
                    Some(_) => return Err(CommandError::NotAToken(name)),
                    None => return Err(CommandError::UnknownName(name)),
                };
                Ok(Some(envelope::decode(token, key()?)?))
            }
            Command::List => {
                let entries = store.load();
                let mut names: Vec<&str> = entries.keys().map(String::as_str).collect();
                names.sort_unstable();
                Ok(Some(names.join("\n")))
            }
        }
    }
}
