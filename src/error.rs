//! Error types for value transformation and configuration.

use thiserror::Error;

/// Errors that can occur while configuring or running a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// Raised only in strict mode. `offset` is a byte offset into the input.
    #[error("malformed value at byte {offset}: unexpected {token:?}")]
    MalformedValue { offset: usize, token: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid configuration file: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shift the offset of a `MalformedValue` error by `base` bytes.
    ///
    /// Used when a value was cut out of a larger document and the error
    /// should point into that document instead.
    pub(crate) fn offset_by(self, base: usize) -> Self {
        match self {
            Error::MalformedValue { offset, token } => Error::MalformedValue {
                offset: offset + base,
                token,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
