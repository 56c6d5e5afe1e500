//! Error types for nsdive

use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

use crate::kind::NamespaceKind;

/// nsdive error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Requested namespace kind is not one of the six recognized values
    #[error("unknown namespace kind: {name:?}")]
    UnknownKind {
        /// The unrecognized kind name
        name: String,
    },

    /// The namespace file does not exist (no such process, or procfs root missing)
    #[error("no {kind} namespace for process {target} (no file at {path})")]
    NotFound {
        /// Namespace kind that was requested
        kind: NamespaceKind,
        /// Target identifier the lookup was for
        target: String,
        /// Path that was looked up
        path: PathBuf,
    },

    /// Opening the namespace file failed for a reason other than absence
    #[error("failed to open {kind} namespace of process {target}")]
    Open {
        /// Namespace kind that was requested
        kind: NamespaceKind,
        /// Target identifier the lookup was for
        target: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// setns(2) refused the switch, at entry or at restore
    #[error("setns to {kind} namespace of process {target} rejected: {errno}")]
    SwitchRejected {
        /// Namespace kind being switched
        kind: NamespaceKind,
        /// Target identifier the switch was for
        target: String,
        /// OS error code from the kernel
        errno: Errno,
    },

    /// A session group was requested with an empty kind set
    #[error("no namespace kinds requested")]
    NoKindsRequested,

    /// One or more namespaces could not be restored during exit
    #[error("failed to restore namespaces: {}", render_failures(.failures))]
    RestoreFailed {
        /// The kinds that failed to restore, with their OS error codes
        failures: Vec<(NamespaceKind, Errno)>,
    },
}

fn render_failures(failures: &[(NamespaceKind, Errno)]) -> String {
    failures
        .iter()
        .map(|(kind, errno)| format!("{kind} ({errno})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for nsdive operations
pub type Result<T> = std::result::Result<T, Error>;
