//! Configuration for the depot daemon.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $DEPOT_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/depot/config.toml
//!   3. ~/.config/depot/config.toml
//!
//! The defaults reproduce the stock protocol behavior: listen on any local
//! IPv4 address with a backlog of 5 and dial neighbours on loopback.

use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DepotConfig {
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address the listening socket binds to. The port is always
    /// OS-assigned.
    pub bind_addr: String,
    /// Address `Connect` directives dial, combined with the directed port.
    pub connect_addr: String,
    /// Listen backlog.
    pub backlog: u32,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for DepotConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_owned(),
            connect_addr: "127.0.0.1".to_owned(),
            backlog: 5,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("depot")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl DepotConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            DepotConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("DEPOT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Apply DEPOT_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DEPOT_NETWORK__BIND_ADDR") {
            self.network.bind_addr = v;
        }
        if let Ok(v) = std::env::var("DEPOT_NETWORK__CONNECT_ADDR") {
            self.network.connect_addr = v;
        }
        if let Ok(v) = std::env::var("DEPOT_NETWORK__BACKLOG") {
            if let Ok(n) = v.parse() {
                self.network.backlog = n;
            }
        }
    }
}
