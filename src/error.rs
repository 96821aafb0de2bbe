// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the glue layers (config loading, note persistence).
/// Classification and routing themselves never fail; malformed optional
/// fields are treated as empty collections, not errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    ParseConfig { path: PathBuf, message: String },

    #[error("unsupported config format for {path}, expected .toml or .json")]
    UnknownConfigFormat { path: PathBuf },

    #[error("failed to write note {path}: {source}")]
    WriteNote {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
