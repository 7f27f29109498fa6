// Centralized error types for the credential store

use std::num::ParseIntError;
use std::str::Utf8Error;
use std::path::PathBuf;
use thiserror::Error;

/// File-level failures surfaced by the record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("<{}> cannot open: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read from <{}>: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to <{}>: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a single line of the store file was rejected during load
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("Unexpected field count: expected 3, got {found}")]
    FieldCount { found: usize },

    #[error("Invalid key '{value}': {source}")]
    InvalidKey {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Line is not valid UTF-8: {source}")]
    Encoding {
        #[source]
        source: Utf8Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Character {ch:?} at position {position} shifted by {delta} leaves the valid character range")]
    OutOfRange { ch: char, position: usize, delta: i64 },
}
