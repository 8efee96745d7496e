// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualificationError {
    #[error("Could not write qualification configuration to {path:?}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not serialize qualification configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not start {program:?}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Waiting for the PK-Sim CLI process failed: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Qualification run was cancelled")]
    Cancelled,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QualificationError {
    /// True when the error is the cancellation signal rather than a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, QualificationError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, QualificationError>;
