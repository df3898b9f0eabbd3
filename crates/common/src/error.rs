// Typed failures for project and configuration operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StaxError>;

/// Coarse classification of a [`StaxError`], used by callers to pick a reaction
/// (warning vs. hard error, exit code) without matching on every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    MalformedMetadata,
    MalformedData,
    InvalidArgument,
    Io,
}

#[derive(Debug, Error)]
pub enum StaxError {
    #[error("{what} not found at `{}`", .path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("{what} already exists at `{}`", .path.display())]
    AlreadyExists { what: &'static str, path: PathBuf },

    #[error("malformed project metadata at `{}`: {reason}", .path.display())]
    MalformedMetadata { path: PathBuf, reason: String },

    #[error("malformed configuration at `{}`: {reason}", .path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error at `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StaxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::MalformedMetadata { .. } => ErrorKind::MalformedMetadata,
            Self::MalformedData { .. } => ErrorKind::MalformedData,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Wrap an I/O error, promoting `NotFound` and `AlreadyExists` to their typed variants.
    pub(crate) fn from_io(what: &'static str, path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { what, path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { what, path },
            _ => Self::Io { path, source },
        }
    }
}
