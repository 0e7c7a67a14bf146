use std::sync::PoisonError;

use thiserror::Error;

use crate::Error;

/// Errors surfaced through the `UniFFI` bindings.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Path does not correspond to a git repository.
    #[error("path is not a git repository")]
    NotARepository,
    /// Repository is bare and unsupported.
    #[error("repository is bare and unsupported")]
    BareRepository,
    /// File is outside the repository working tree.
    #[error("file is outside the working tree")]
    OutsideWorkdir,
    /// Committed entry is not a file.
    #[error("committed entry is not a file")]
    NotABlob,
    /// Committed content is not UTF-8.
    #[error("committed content is not valid UTF-8")]
    InvalidEncoding,
    /// Underlying git operation failed.
    #[error("git error")]
    Git,
    /// Filesystem interaction failed.
    #[error("filesystem error")]
    Io,
    /// Configuration could not be parsed.
    #[error("invalid configuration")]
    Config,
    /// Internal invariant failed.
    #[error("internal error")]
    Internal,
}

impl From<Error> for CoreError {
    fn from(error: Error) -> Self {
        match error {
            Error::Git { .. } => Self::Git,
            Error::NotARepository { .. } => Self::NotARepository,
            Error::BareRepository { .. } => Self::BareRepository,
            Error::OutsideWorkdir { .. } => Self::OutsideWorkdir,
            Error::NotABlob { .. } => Self::NotABlob,
            Error::InvalidEncoding { .. } => Self::InvalidEncoding,
            Error::Io { .. } => Self::Io,
            Error::Config { .. } => Self::Config,
        }
    }
}

impl<T> From<PoisonError<T>> for CoreError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Internal
    }
}
