//! Configuration loading and validation for the diagnostic server.
//!
//! Each value is resolved in order of precedence: command-line flag, then
//! environment variable, then built-in default. The process exits with a
//! clear error message if the certificate or key file does not exist.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

/// Command-line flags. Every flag is optional and overrides its environment variable.
#[derive(Debug, Default, Parser)]
#[command(name = "ssl-server-info", version, about = "Diagnostic HTTPS server for mTLS debugging")]
pub struct Args {
    /// Path to the SSL certificate file [env: CERT_FILE] [default: server.crt]
    #[arg(long, value_name = "PATH")]
    pub cert: Option<String>,

    /// Path to the SSL key file [env: KEY_FILE] [default: server.key]
    #[arg(long, value_name = "PATH")]
    pub key: Option<String>,

    /// Port to listen on [env: PORT] [default: 443]
    #[arg(long)]
    pub port: Option<u16>,
}

/// Validated server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Filesystem path to the PEM-encoded server certificate chain.
    #[serde(default = "default_cert_file")]
    pub cert_file: String,

    /// Filesystem path to the PEM-encoded server private key.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// Port the HTTPS server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_cert_file() -> String {
    "server.crt".into()
}
fn default_key_file() -> String {
    "server.key".into()
}
fn default_port() -> u16 {
    443
}

impl Config {
    /// Load and validate configuration from `args` layered over the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or a credential file is missing.
    pub fn from_env(args: Args) -> Result<Self> {
        let c = Self::resolve(args, None)?;
        c.validate()?;
        Ok(c)
    }

    /// Merge defaults, environment and flags without touching the filesystem.
    ///
    /// `env` replaces the process environment when given.
    fn resolve(args: Args, env: Option<HashMap<String, String>>) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default().source(env).ignore_empty(true))
            .set_override_option("cert_file", args.cert)?
            .set_override_option("key_file", args.key)?
            .set_override_option("port", args.port.map(i64::from))?
            .build()
            .context("failed to build configuration")?;

        cfg.try_deserialize()
            .context("failed to deserialise configuration")
    }

    /// Check that both credential files exist.
    fn validate(&self) -> Result<()> {
        ensure_exists(&self.cert_file, "Certificate")?;
        ensure_exists(&self.key_file, "Key")?;
        Ok(())
    }
}

fn ensure_exists(path: &str, what: &str) -> Result<()> {
    if !Path::new(path).exists() {
        anyhow::bail!("{what} file not found: {path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_cert_file(), "server.crt");
        assert_eq!(default_key_file(), "server.key");
        assert_eq!(default_port(), 443);
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let cfg = Config::resolve(Args::default(), env(&[])).unwrap();
        assert_eq!(cfg.cert_file, "server.crt");
        assert_eq!(cfg.key_file, "server.key");
        assert_eq!(cfg.port, 443);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = Config::resolve(
            Args::default(),
            env(&[("CERT_FILE", "/etc/tls/a.crt"), ("KEY_FILE", "/etc/tls/a.key"), ("PORT", "8443")]),
        )
        .unwrap();
        assert_eq!(cfg.cert_file, "/etc/tls/a.crt");
        assert_eq!(cfg.key_file, "/etc/tls/a.key");
        assert_eq!(cfg.port, 8443);
    }

    #[test]
    fn flags_override_environment() {
        let args = Args::try_parse_from([
            "ssl-server-info",
            "--cert",
            "flag.crt",
            "--port",
            "9443",
        ])
        .unwrap();
        let cfg = Config::resolve(
            args,
            env(&[("CERT_FILE", "env.crt"), ("KEY_FILE", "env.key"), ("PORT", "8443")]),
        )
        .unwrap();
        assert_eq!(cfg.cert_file, "flag.crt");
        assert_eq!(cfg.key_file, "env.key");
        assert_eq!(cfg.port, 9443);
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let cfg = Config::resolve(Args::default(), env(&[("CERT_FILE", "")])).unwrap();
        assert_eq!(cfg.cert_file, "server.crt");
    }

    #[test]
    fn rejects_unparseable_port() {
        assert!(Config::resolve(Args::default(), env(&[("PORT", "https")])).is_err());
        assert!(Args::try_parse_from(["ssl-server-info", "--port", "70000"]).is_err());
    }

    #[test]
    fn validate_rejects_missing_files() {
        let cfg = Config {
            cert_file: "/nonexistent/ssl-server-info/server.crt".into(),
            key_file: "/nonexistent/ssl-server-info/server.key".into(),
            port: default_port(),
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Certificate file not found"));
    }

    #[test]
    fn validate_accepts_existing_files() {
        let dir = std::env::temp_dir();
        let cert = dir.join(format!("ssl-server-info-{}.crt", std::process::id()));
        let key = dir.join(format!("ssl-server-info-{}.key", std::process::id()));
        std::fs::write(&cert, b"cert").unwrap();
        std::fs::write(&key, b"key").unwrap();

        let cfg = Config {
            cert_file: cert.to_string_lossy().into_owned(),
            key_file: key.to_string_lossy().into_owned(),
            port: default_port(),
        };
        let result = cfg.validate();

        std::fs::remove_file(&cert).unwrap();
        std::fs::remove_file(&key).unwrap();
        assert!(result.is_ok());
    }
}
