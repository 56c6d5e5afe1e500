//! Ordered composition of namespace sessions

use std::path::Path;

use nsdive_core::{Error, KindSet, NamespaceKind, NsTarget, Result};

use crate::handle::DEFAULT_PROC_ROOT;
use crate::session::Session;
use crate::switch::{NsSwitch, Setns};

/// An ordered group of sessions entered together and exited in reverse
///
/// Sessions are built and entered in the canonical kind order (never the
/// caller's listing order) so that exit can reverse entry exactly. If entry
/// fails partway, every already-entered session is rolled back before the
/// failure propagates; the process is never left with a partially-switched
/// namespace set.
#[derive(Debug)]
pub struct SessionGroup<S: NsSwitch = Setns> {
    sessions: Vec<Session>,
    switch: S,
    entered: bool,
}

impl SessionGroup<Setns> {
    /// Build one session per selected kind for `target`
    pub fn open(target: NsTarget, kinds: &KindSet) -> Result<Self> {
        Self::open_at(Path::new(DEFAULT_PROC_ROOT), target, kinds)
    }

    /// Build a group under an explicit procfs root
    pub fn open_at(proc_root: &Path, target: NsTarget, kinds: &KindSet) -> Result<Self> {
        Self::with_switch(proc_root, target, kinds, Setns)
    }
}

impl<S: NsSwitch> SessionGroup<S> {
    /// Build a group with an explicit switch implementation
    ///
    /// If any session fails to resolve, the sessions already built are
    /// dropped, closing their descriptors, before the error propagates.
    pub fn with_switch(
        proc_root: &Path,
        target: NsTarget,
        kinds: &KindSet,
        switch: S,
    ) -> Result<Self> {
        if kinds.is_empty() {
            return Err(Error::NoKindsRequested);
        }

        let mut sessions = Vec::new();
        for kind in kinds.kinds() {
            sessions.push(Session::open_at(proc_root, target.clone(), kind)?);
        }

        Ok(Self {
            sessions,
            switch,
            entered: false,
        })
    }

    /// The sessions, in entry order
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The kinds this group switches, in entry order
    #[must_use]
    pub fn kinds(&self) -> Vec<NamespaceKind> {
        self.sessions.iter().map(Session::kind).collect()
    }

    /// Check if the group is currently entered
    #[must_use]
    pub const fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter every session, in canonical order
    ///
    /// If session `i` fails to enter, sessions `0..i` are exited in reverse
    /// order and the remaining sessions' descriptors are released before the
    /// entry failure propagates. Rollback failures are logged and do not mask
    /// the original error. After a failed `enter_all` no descriptor from any
    /// session remains open.
    pub fn enter_all(&mut self) -> Result<()> {
        for i in 0..self.sessions.len() {
            if let Err(entry_err) = self.sessions[i].enter(&self.switch) {
                for session in self.sessions[..i].iter_mut().rev() {
                    if let Err(rollback_err) = session.exit(&self.switch) {
                        tracing::warn!(
                            kind = %session.kind(),
                            error = %rollback_err,
                            "failed to roll back namespace during aborted entry"
                        );
                    }
                }
                for session in &mut self.sessions[i + 1..] {
                    session.release();
                }
                return Err(entry_err);
            }
        }

        self.entered = true;
        Ok(())
    }

    /// Exit every session, in exactly the reverse of entry order
    ///
    /// The unwind continues past individual failures so a single failed
    /// restoration cannot prevent restoring the others; if any occurred they
    /// are surfaced together afterwards. A group whose sessions were never
    /// entered is a no-op reporting success.
    pub fn exit_all(&mut self) -> Result<()> {
        let mut failures = Vec::new();

        for session in self.sessions.iter_mut().rev() {
            match session.exit(&self.switch) {
                Ok(()) => {}
                Err(Error::SwitchRejected { kind, errno, .. }) => failures.push((kind, errno)),
                Err(other) => {
                    tracing::warn!(
                        kind = %session.kind(),
                        error = %other,
                        "unexpected failure while restoring namespace"
                    );
                }
            }
        }

        self.entered = false;

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::RestoreFailed { failures })
        }
    }

    /// Run `work` inside the composed namespace context
    ///
    /// Enters all sessions, runs the closure, then exits all sessions. A
    /// restoration failure surfaces after the work has run.
    pub fn run<T>(&mut self, work: impl FnOnce() -> T) -> Result<T> {
        self.enter_all()?;
        let output = work();
        self.exit_all()?;
        Ok(output)
    }
}
