//! Namespace handle resolution

use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::os::fd::{AsFd, BorrowedFd};
use std::path::Path;

use nsdive_core::{Error, NamespaceKind, NsTarget, Result};

/// Default procfs mount point
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// An open handle to one namespace of one process
///
/// The handle pins the namespace instance it was opened against: it stays
/// valid for setns(2) even if the owning process later exits or changes
/// namespaces. Reopening the same path later may yield a different instance.
///
/// The descriptor is opened read-only with close-on-exec set, so it cannot
/// leak across a later `execvp`. No upfront check is made that the path is
/// actually a namespace link; opening a regular file succeeds here and the
/// switch itself rejects it with `EINVAL` at entry time.
#[derive(Debug)]
pub struct NsHandle {
    kind: NamespaceKind,
    target: NsTarget,
    file: File,
}

impl NsHandle {
    /// Open the `kind` namespace of `target` under the standard procfs root
    pub fn open(target: &NsTarget, kind: NamespaceKind) -> Result<Self> {
        Self::open_at(Path::new(DEFAULT_PROC_ROOT), target, kind)
    }

    /// Open the `kind` namespace of `target` under an explicit procfs root
    ///
    /// The root override exists for deployments with a relocated procfs and
    /// for tests that fabricate a procfs hierarchy.
    pub fn open_at(proc_root: &Path, target: &NsTarget, kind: NamespaceKind) -> Result<Self> {
        let path = proc_root
            .join(target.path_component())
            .join("ns")
            .join(kind.proc_name());

        let file = File::open(&path).map_err(|e| {
            if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) {
                Error::NotFound {
                    kind,
                    target: target.to_string(),
                    path: path.clone(),
                }
            } else {
                Error::Open {
                    kind,
                    target: target.to_string(),
                    source: e,
                }
            }
        })?;

        Ok(Self {
            kind,
            target: target.clone(),
            file,
        })
    }

    /// The namespace kind this handle refers to
    #[must_use]
    pub const fn kind(&self) -> NamespaceKind {
        self.kind
    }

    /// The process this handle was resolved for
    #[must_use]
    pub const fn target(&self) -> &NsTarget {
        &self.target
    }

    /// Borrow the underlying descriptor for setns(2)
    #[must_use]
    pub fn fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }

    /// The identity of the namespace instance this handle pins
    ///
    /// A namespace instance is uniquely named by the (device, inode) pair of
    /// its nsfs file, which is what the kernel's `kind:[inode]` readlink
    /// convention encodes. Two handles with equal identities refer to the
    /// same instance.
    pub fn identity(&self) -> Result<NsId> {
        use std::os::linux::fs::MetadataExt;

        let meta = self.file.metadata().map_err(|e| Error::Open {
            kind: self.kind,
            target: self.target.to_string(),
            source: e,
        })?;

        Ok(NsId {
            kind: self.kind,
            dev: meta.st_dev(),
            ino: meta.st_ino(),
        })
    }
}

/// Identity of a namespace instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NsId {
    /// Namespace kind
    pub kind: NamespaceKind,
    /// Device number of the nsfs file
    pub dev: u64,
    /// Inode number of the nsfs file
    pub ino: u64,
}

impl fmt::Display for NsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}]", self.kind, self.ino)
    }
}
