use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Fatal errors that abort a synchronization run.
///
/// The manifest is append-only, so a run aborted midway is safe to resume:
/// already-registered lines are skipped on the next invocation.
#[derive(Debug)]
pub enum SyncError {
    /// An I/O operation failed. Carries the operation and the offending path.
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// Another process holds the manifest lock.
    ManifestLocked(PathBuf),
    /// Two code blocks produced the same target name with different content.
    Conflict {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl SyncError {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        SyncError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Io { op, path, source } => {
                write!(f, "cannot {} '{}': {}", op, path.display(), source)
            }
            SyncError::ManifestLocked(path) => {
                write!(
                    f,
                    "manifest '{}' is locked by another process",
                    path.display()
                )
            }
            SyncError::Conflict {
                name,
                first,
                second,
            } => {
                write!(
                    f,
                    "target '{}' generated with conflicting content by '{}' and '{}'",
                    name,
                    first.display(),
                    second.display()
                )
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
