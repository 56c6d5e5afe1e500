//! The privileged namespace-switch primitive

use std::os::fd::BorrowedFd;

use nix::sched::CloneFlags;

/// The setns(2) primitive as an injectable dependency
///
/// Sessions call this with empty flags, meaning "switch whatever kind this
/// descriptor represents". [`Setns`] is the production implementation; tests
/// substitute recording or failing doubles to exercise rollback paths
/// without privilege.
pub trait NsSwitch {
    /// Switch the calling thread into the namespace behind `fd`
    fn setns(&self, fd: BorrowedFd<'_>, flags: CloneFlags) -> nix::Result<()>;
}

/// Production implementation delegating to the kernel
#[derive(Debug, Default, Clone, Copy)]
pub struct Setns;

impl NsSwitch for Setns {
    fn setns(&self, fd: BorrowedFd<'_>, flags: CloneFlags) -> nix::Result<()> {
        nix::sched::setns(fd, flags)
    }
}
