//! Runtime settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `OWNERBOT_*` environment variables over an
//! optional configuration file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Invalid settings detected after loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser diagnostics.
        message: String,
    },
}

/// Settings for the ownerbot server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "OWNERBOT")]
pub struct OwnerbotSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// Redis connection string; the in-memory store is used when absent.
    pub redis_url: Option<String>,
    /// Webhook token. When absent the token stored under `token` is used.
    pub token: Option<String>,
    /// Directory document loaded into an empty store at startup.
    pub seed_file: Option<PathBuf>,
}

impl OwnerbotSettings {
    /// Parsed bind address. A blank value falls back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = match self.bind_addr.trim() {
            "" => DEFAULT_BIND_ADDR,
            value => value,
        };
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured Redis URL, ignoring blank values.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Configured webhook token wrapped for zeroisation, ignoring blank values.
    pub fn token(&self) -> Option<Zeroizing<String>> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| Zeroizing::new(token.to_owned()))
    }

    /// Configured seed file path.
    pub fn seed_file(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }
}
