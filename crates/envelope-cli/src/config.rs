//! Configuration loading and validation for the command-line front end.
//!
//! All values are read from `ENVELOPE_`-prefixed environment variables. The
//! process exits with a clear error message if a variable is present but
//! invalid. The key is only demanded by the commands that use it.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::key::KeyMaterial;

/// Prefix shared by every environment variable this binary reads.
pub const ENV_PREFIX: &str = "ENVELOPE";

/// Validated front-end configuration.
#[derive(Deserialize)]
pub struct Config {
    /// Standard base64 encoding of the 32-byte key (`ENVELOPE_KEY`).
    /// Required by every command except `list`.
    #[serde(default)]
    pub key: Option<String>,

    /// Path of the JSON token store (`ENVELOPE_STORE_FILE`).
    #[serde(default = "default_store_file")]
    pub store_file: String,

    /// Tracing log level (`ENVELOPE_LOG_LEVEL`), overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_file() -> String {
    "tokens.json".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key", &"[REDACTED]")
            .field("store_file", &self.store_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed or is blank.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if let Some(key) = &self.key {
            ensure_non_empty(key, "ENVELOPE_KEY")?;
        }
        ensure_non_empty(&self.store_file, "ENVELOPE_STORE_FILE")?;
        Ok(())
    }

    /// Move the key text out of the config and decode it.
    ///
    /// The text is wiped once decoded; a second call finds it gone.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENVELOPE_KEY` is unset or not standard base64.
    pub fn take_key(&mut self) -> Result<KeyMaterial> {
        let text = Zeroizing::new(
            self.key
                .take()
                .context("ENVELOPE_KEY is required and must not be empty")?,
        );
        KeyMaterial::from_base64(&text).context("ENVELOPE_KEY is not valid base64")
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_KEY_B64: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn valid() -> Config {
        Config {
            key: Some(ZERO_KEY_B64.into()),
            store_file: default_store_file(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_store_file(), "tokens.json");
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn loads_from_prefixed_variables() {
        let cfg = Config::load(env(&[
            ("ENVELOPE_KEY", ZERO_KEY_B64),
            ("ENVELOPE_STORE_FILE", "/tmp/vault.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.store_file, "/tmp/vault.json");
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn loads_without_key() {
        let mut cfg = Config::load(env(&[("ENVELOPE_LOG_LEVEL", "debug")])).unwrap();
        assert!(cfg.key.is_none());
        assert_eq!(cfg.log_level, "debug");
        let err = cfg.take_key().unwrap_err();
        assert!(err.to_string().contains("ENVELOPE_KEY is required"));
    }

    #[test]
    fn blank_key_variable_is_rejected() {
        assert!(Config::load(env(&[("ENVELOPE_KEY", "  ")])).is_err());
    }

    #[test]
    fn validate_rejects_blank_key() {
        let cfg = Config {
            key: Some("   ".into()),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_store_file() {
        let cfg = Config {
            store_file: "".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn take_key_decodes_and_clears() {
        let mut cfg = valid();
        let key = cfg.take_key().unwrap();
        assert_eq!(key.as_bytes(), &[0u8; 32]);
        assert!(cfg.key.is_none());
        assert!(cfg.take_key().is_err());
    }

    #[test]
    fn take_key_rejects_non_base64() {
        let mut cfg = Config {
            key: Some("not*base64".into()),
            ..valid()
        };
        assert!(cfg.take_key().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let out = format!("{:?}", valid());
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains(ZERO_KEY_B64));
    }
}
