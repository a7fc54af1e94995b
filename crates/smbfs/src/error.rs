//! Filesystem error types.

use std::io;
use thiserror::Error;

use crate::session::{NtStatus, ProtocolError};

/// Filesystem error type.
#[derive(Debug, Error)]
pub enum SmbFsError {
    /// Malformed or incomplete connection URI.
    #[error("invalid share: {0}")]
    InvalidShare(String),

    /// A file system is already open under this key.
    #[error("file system already exists: {0}")]
    AlreadyExists(String),

    /// No file system is open under this key.
    #[error("file system not found: {0}")]
    NotFound(String),

    /// Deliberately unsupported operation.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A remote call failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: ProtocolError,
    },

    /// Out-of-range index, empty path, unsupported attribute view.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation on a closed object, or one that needs state it lacks.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl SmbFsError {
    /// Create an InvalidShare error.
    pub fn invalid_share(uri: impl Into<String>) -> Self {
        Self::InvalidShare(uri.into())
    }

    /// Create a NotImplemented error.
    pub fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented(what.into())
    }

    /// Wrap a remote failure for the given path.
    pub fn io(path: impl Into<String>, source: impl Into<ProtocolError>) -> Self {
        Self::Io {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an IllegalState error.
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    /// True for a deliberately unsupported operation.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Status code of the underlying remote failure, if any.
    pub fn nt_status(&self) -> Option<NtStatus> {
        match self {
            Self::Io { source, .. } => source.nt_status(),
            _ => None,
        }
    }
}

/// Convert SmbFsError to std::io::Error for the `Read`/`Write`/`Seek` impls.
impl From<SmbFsError> for io::Error {
    fn from(e: SmbFsError) -> Self {
        let kind = match &e {
            SmbFsError::InvalidShare(_) | SmbFsError::InvalidArgument(_) => {
                io::ErrorKind::InvalidInput
            }
            SmbFsError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            SmbFsError::NotFound(_) => io::ErrorKind::NotFound,
            SmbFsError::NotImplemented(_) => io::ErrorKind::Unsupported,
            SmbFsError::Io { source, .. } => match source.nt_status() {
                Some(NtStatus::ObjectNameNotFound | NtStatus::ObjectPathNotFound) => {
                    io::ErrorKind::NotFound
                }
                Some(NtStatus::ObjectNameCollision) => io::ErrorKind::AlreadyExists,
                Some(NtStatus::AccessDenied) => io::ErrorKind::PermissionDenied,
                _ => io::ErrorKind::Other,
            },
            SmbFsError::IllegalState(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}

/// Filesystem result type.
pub type SmbFsResult<T> = Result<T, SmbFsError>;
