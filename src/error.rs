//! Error type shared by every module of the crate.

use crate::value::Kind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by summaries, bin merging, mutation, synthesis and loading.
///
/// All variants are local and recoverable: the core performs no I/O except in
/// [`crate::data::Data::from_path`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `mid` or `div` was requested from a summary with no members.
    #[error("summary is empty: mid and div are undefined")]
    EmptyBin,

    #[error("arity mismatch: expected {expected} fields, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Numeric and symbolic values met at the same field position.
    #[error("type mismatch at position {position}: expected {expected}, got {got}")]
    TypeMismatch {
        position: usize,
        expected: Kind,
        got: Kind,
    },

    /// A summary or bin received a value of the other kind.
    #[error("kind mismatch: expected {expected}, got {got}")]
    KindMismatch { expected: Kind, got: Kind },

    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("population too small: need at least {needed} examples, got {got}")]
    PopulationTooSmall { needed: usize, got: usize },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Error::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
