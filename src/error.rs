//! Error types for the bibrecord crate

use thiserror::Error;

/// Result type for bibrecord operations
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bibrecord
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A string that cannot serve as a symbolic macro identifier
    #[error("invalid symbol name '{0}'")]
    InvalidSymbol(String),

    /// The bounded citation-key candidate search ran out of suffixes
    #[error("citation key space exhausted after {limit} candidates for base '{base}'")]
    KeySpaceExhausted {
        /// Base portion of the key the candidates were built from
        base: String,
        /// Number of candidates tried before giving up
        limit: usize,
    },
}
