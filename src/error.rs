//! Summary: Error types for the canopy container crate.
//! Copyright (c) YOAB. All rights reserved.
//!
//! All errors are identified by kind and carry enough context to diagnose
//! the failing operation. Container operations either complete or leave the
//! tree observably unchanged: collisions are detected before any record is
//! written, and absent-key lookups are pure inspection.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for canopy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds for container and virtual-filesystem operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Insert of a key that is already present in the tree.
    KeyCollision,
    /// Lookup of a key that is not present in the tree.
    AbsentKey,
    /// Construction of a cursor from an out-of-range state tag.
    InvalidIterator {
        tag: i8,
    },
    /// Sequence indexed outside `[0, len)`.
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    /// Argument validation failed at the facade level.
    InvalidInput {
        reason: String,
    },
    /// Virtual path did not resolve to a node.
    NoSuchPath {
        path: String,
    },
    /// A directory operation was applied to a non-directory node.
    NotADirectory {
        name: String,
    },
    /// A file operation was applied to a directory node.
    NotAFile {
        name: String,
    },
    /// The destination name is already taken.
    AlreadyExists {
        path: String,
    },
    /// The operation is not permitted on the root directory.
    RootOperation {
        op: &'static str,
    },
    /// Attempt to move a directory into itself or one of its descendants.
    CyclicMove,
    /// Attempt to join an absolute path onto an existing path.
    AbsolutePathConcat,
    /// A physical path must be absolute to be attached.
    RelativePhysicalPath {
        path: PathBuf,
    },
    /// Failed to create a backing file for a virtual node.
    FileCreate {
        path: PathBuf,
        source: io::Error,
    },
    /// Generic I/O error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyCollision => write!(f, "key already exists in the tree"),
            Error::AbsentKey => write!(f, "requested key is absent from the tree"),
            Error::InvalidIterator { tag } => {
                write!(f, "cannot construct a cursor from state tag {tag}")
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for sequence of length {len}")
            }
            Error::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Error::NoSuchPath { path } => {
                write!(f, "no such file or directory: {path}")
            }
            Error::NotADirectory { name } => write!(f, "{name} is not a directory"),
            Error::NotAFile { name } => write!(f, "{name} is not a regular file"),
            Error::AlreadyExists { path } => write!(f, "{path} already exists"),
            Error::RootOperation { op } => {
                write!(f, "{op} is not permitted on the root directory")
            }
            Error::CyclicMove => {
                write!(f, "cannot move a directory into itself or its descendants")
            }
            Error::AbsolutePathConcat => {
                write!(f, "cannot join an absolute path onto an existing path")
            }
            Error::RelativePhysicalPath { path } => {
                write!(f, "physical path must be absolute: {}", path.display())
            }
            Error::FileCreate { path, source } => {
                write!(f, "failed to create file '{}': {source}", path.display())
            }
            Error::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileCreate { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
