//! Configuration type definitions.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for the hub ACL service.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct HubConfig {
    /// ACL file settings.
    pub acl: AclConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// ACL file settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Path to the ACL file. Empty or absent starts with an empty ACL.
    pub file: Option<PathBuf>,

    /// Whether a failed load should abort startup. When false the hub
    /// starts with an empty ACL instead.
    pub required: bool,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            file: None,
            required: true,
        }
    }
}

impl AclConfig {
    /// The configured ACL path, if one is set and non-empty.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: LogLevel,

    /// Log format (pretty, compact, json).
    pub format: LogFormat,

    /// Output destination.
    pub output: LogOutput,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level (least verbose).
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable).
    Json,
    /// Multi-line human-readable format.
    Pretty,
    /// Compact single-line format (default).
    #[default]
    Compact,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error (default).
    #[default]
    Stderr,
}
