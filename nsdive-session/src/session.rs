//! One namespace kind's enter/exit pair

use std::path::Path;

use nix::sched::CloneFlags;

use nsdive_core::{Error, NamespaceKind, NsTarget, Result};

use crate::handle::NsHandle;
use crate::switch::NsSwitch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ready,
    Entered,
    Finished,
}

/// A single namespace switch with guaranteed restoration
///
/// Pairs a handle to the target's namespace with a handle to the caller's own
/// namespace of the same kind, captured at construction time, before any
/// switch occurs. [`Session::exit`] therefore always restores the pre-entry
/// state, never an intermediate one.
///
/// Every descriptor the session opens is closed on every path: construction
/// failure, entry failure, and normal exit. There is no re-entry once a
/// session has finished.
#[derive(Debug)]
pub struct Session {
    kind: NamespaceKind,
    target: NsTarget,
    handles: Option<Handles>,
    state: State,
}

#[derive(Debug)]
struct Handles {
    origin: NsHandle,
    target: NsHandle,
}

impl Session {
    /// Resolve a session for the `kind` namespace of `target`
    pub fn open(target: NsTarget, kind: NamespaceKind) -> Result<Self> {
        Self::open_at(Path::new(crate::handle::DEFAULT_PROC_ROOT), target, kind)
    }

    /// Resolve a session under an explicit procfs root
    ///
    /// The origin handle is resolved first; if the target lookup then fails,
    /// the origin descriptor is closed before the error propagates.
    pub fn open_at(proc_root: &Path, target: NsTarget, kind: NamespaceKind) -> Result<Self> {
        let origin = NsHandle::open_at(proc_root, &NsTarget::Current, kind)?;
        let target_handle = NsHandle::open_at(proc_root, &target, kind)?;

        Ok(Self {
            kind,
            target,
            handles: Some(Handles {
                origin,
                target: target_handle,
            }),
            state: State::Ready,
        })
    }

    /// The namespace kind this session switches
    #[must_use]
    pub const fn kind(&self) -> NamespaceKind {
        self.kind
    }

    /// The process whose namespace is entered
    #[must_use]
    pub const fn target(&self) -> &NsTarget {
        &self.target
    }

    /// Check if the session is currently entered
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        matches!(self.state, State::Entered)
    }

    /// The handle on the caller's own namespace, if still held
    #[must_use]
    pub const fn origin(&self) -> Option<&NsHandle> {
        match &self.handles {
            Some(handles) => Some(&handles.origin),
            None => None,
        }
    }

    /// The handle on the target's namespace, if still held
    #[must_use]
    pub const fn target_handle(&self) -> Option<&NsHandle> {
        match &self.handles {
            Some(handles) => Some(&handles.target),
            None => None,
        }
    }

    /// Switch the calling thread into the target's namespace
    ///
    /// On failure both descriptors are closed immediately and the session is
    /// finished; it is never left partially entered.
    pub fn enter<S: NsSwitch>(&mut self, switch: &S) -> Result<()> {
        if self.state != State::Ready {
            tracing::warn!(kind = %self.kind, "session already entered or finished");
            return Ok(());
        }

        let Some(handles) = &self.handles else {
            self.state = State::Finished;
            return Ok(());
        };

        if let Err(errno) = switch.setns(handles.target.fd(), CloneFlags::empty()) {
            self.handles = None;
            self.state = State::Finished;
            return Err(Error::SwitchRejected {
                kind: self.kind,
                target: self.target.to_string(),
                errno,
            });
        }

        tracing::debug!(kind = %self.kind, target = %self.target, "entered namespace");
        self.state = State::Entered;
        Ok(())
    }

    /// Switch the calling thread back to its pre-entry namespace
    ///
    /// Both descriptors are closed as the final step whether or not the
    /// switch-back succeeded; the target descriptor's close is best-effort
    /// and cannot mask the switch result. Exiting a session that was never
    /// entered just releases its descriptors and reports success.
    pub fn exit<S: NsSwitch>(&mut self, switch: &S) -> Result<()> {
        match self.state {
            State::Ready => {
                self.release();
                Ok(())
            }
            State::Finished => {
                tracing::warn!(kind = %self.kind, "session already finished");
                Ok(())
            }
            State::Entered => {
                self.state = State::Finished;

                let Some(handles) = self.handles.take() else {
                    return Ok(());
                };

                let result = switch
                    .setns(handles.origin.fd(), CloneFlags::empty())
                    .map_err(|errno| Error::SwitchRejected {
                        kind: self.kind,
                        target: self.target.to_string(),
                        errno,
                    });

                if result.is_ok() {
                    tracing::debug!(kind = %self.kind, target = %self.target, "restored namespace");
                }

                // Target close is best-effort and cannot mask the switch
                // result or stop the origin close.
                let Handles { origin, target } = handles;
                drop(target);
                drop(origin);
                result
            }
        }
    }

    /// Close both descriptors without any switch
    pub(crate) fn release(&mut self) {
        self.handles = None;
        self.state = State::Finished;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state == State::Entered {
            tracing::warn!(
                kind = %self.kind,
                target = %self.target,
                "session dropped while entered; namespace left switched"
            );
        }
    }
}
