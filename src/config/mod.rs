//! Configuration Management
//!
//! This module resolves the connection settings used at startup.
//!
//! # Configuration Locations
//! - Local: `.emptrack/config.json` (per working directory)
//! - Global: `~/.config/emptrack/config.json` (per user)
//!
//! # Resolution Precedence
//! 1. Command-line flags and their environment variables (highest priority)
//! 2. Local config file (`.emptrack/config.json`)
//! 3. Global config file (`~/.config/emptrack/config.json`)
//! 4. Built-in defaults (`postgres@127.0.0.1:5432/employees_db`)
//!
//! Files are merged key by key. The password is read last, from the
//! environment variable named by `password_env` (default `DB_PASSWORD`);
//! when that variable is unset the connection is attempted without one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::{ConnectionConfig, DatabaseType};
use crate::error::{Result, TrackerError};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_USER: &str = "postgres";
pub const DEFAULT_DATABASE: &str = "employees_db";
pub const DEFAULT_PASSWORD_ENV: &str = "DB_PASSWORD";

/// One layer of settings, as stored in a config file or given on the command line
///
/// Every field is optional so layers can be merged; unset fields fall through
/// to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<DatabaseType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Plain-text password. Prefer `password_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name for password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Database file path (for sqlite)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Report handler errors and return to the menu instead of exiting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_going: Option<bool>,
}

impl SettingsLayer {
    /// Overlay `other` on top of `self`; fields set in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            engine: other.engine.or(self.engine),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            user: other.user.or(self.user),
            database: other.database.or(self.database),
            password: other.password.or(self.password),
            password_env: other.password_env.or(self.password_env),
            file: other.file.or(self.file),
            keep_going: other.keep_going.or(self.keep_going),
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub keep_going: bool,
}

impl Settings {
    /// Apply defaults and resolve the password, if any
    ///
    /// `lookup_env` is the environment accessor; production code passes
    /// `|name| std::env::var(name).ok()`.
    pub fn resolve(
        layer: SettingsLayer,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let engine = layer.engine.unwrap_or_default();

        let connection = match engine {
            DatabaseType::Postgres => {
                // An unset variable means no password (trust or peer auth)
                let password = layer.password.or_else(|| {
                    lookup_env(layer.password_env.as_deref().unwrap_or(DEFAULT_PASSWORD_ENV))
                });

                ConnectionConfig::postgres(
                    layer.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                    layer.port.unwrap_or(DEFAULT_PORT),
                    layer.user.unwrap_or_else(|| DEFAULT_USER.to_string()),
                    password,
                    layer.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                )
            }
            DatabaseType::SQLite => {
                let file = layer.file.ok_or_else(|| {
                    TrackerError::config_error("The sqlite engine requires a database file")
                })?;
                ConnectionConfig::sqlite(file)
            }
        };

        Ok(Self { connection, keep_going: layer.keep_going.unwrap_or(false) })
    }
}

/// Get path to local config file (`.emptrack/config.json`)
pub fn local_config_path() -> Result<PathBuf> {
    let current_dir = std::env::current_dir().map_err(|e| {
        TrackerError::config_error(format!("Could not determine current directory: {e}"))
    })?;

    Ok(current_dir.join(".emptrack").join("config.json"))
}

/// Get path to global config file (`~/.config/emptrack/config.json`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| TrackerError::config_error("Could not determine user config directory"))?;

    Ok(config_dir.join("emptrack").join("config.json"))
}

/// Load one settings layer from a config file
///
/// A missing file yields an empty layer.
pub fn load_layer(path: &Path) -> Result<SettingsLayer> {
    if !path.exists() {
        return Ok(SettingsLayer::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TrackerError::config_error(format!("Could not read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        TrackerError::config_error(format!("Invalid config file {}: {e}", path.display()))
    })
}

/// Merge global, local and command-line layers, in that order
pub fn load_with_precedence(cli: SettingsLayer) -> Result<SettingsLayer> {
    let global = match global_config_path() {
        Ok(path) => load_layer(&path)?,
        // No home directory (e.g. minimal containers): skip the global layer
        Err(_) => SettingsLayer::default(),
    };
    let local = load_layer(&local_config_path()?)?;

    Ok(global.merge(local).merge(cli))
}

/// Resolve settings from files, the command line and the process environment
pub fn resolve_settings(cli: SettingsLayer) -> Result<Settings> {
    let layer = load_with_precedence(cli)?;
    Settings::resolve(layer, |name| std::env::var(name).ok())
}
