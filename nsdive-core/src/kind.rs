//! The six namespace kinds and selections of them

use std::fmt;
use std::str::FromStr;

use nix::sched::CloneFlags;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One of the six Linux namespace kinds nsdive can enter
///
/// Declaration order is the canonical order: groups enter namespaces in this
/// order and exit them in reverse, regardless of how the caller listed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamespaceKind {
    /// Mount namespace
    Mount,
    /// IPC namespace
    Ipc,
    /// Network namespace
    Net,
    /// PID namespace
    Pid,
    /// User namespace
    User,
    /// UTS namespace (hostname and domain name)
    Uts,
}

impl NamespaceKind {
    /// All six kinds in canonical order
    pub const ALL: [Self; 6] = [
        Self::Mount,
        Self::Ipc,
        Self::Net,
        Self::Pid,
        Self::User,
        Self::Uts,
    ];

    /// The entry name under `/proc/<pid>/ns/`
    #[must_use]
    pub const fn proc_name(self) -> &'static str {
        match self {
            Self::Mount => "mnt",
            Self::Ipc => "ipc",
            Self::Net => "net",
            Self::Pid => "pid",
            Self::User => "user",
            Self::Uts => "uts",
        }
    }

    /// The `CLONE_NEW*` flag bit for this kind
    #[must_use]
    pub fn clone_flag(self) -> CloneFlags {
        match self {
            Self::Mount => CloneFlags::CLONE_NEWNS,
            Self::Ipc => CloneFlags::CLONE_NEWIPC,
            Self::Net => CloneFlags::CLONE_NEWNET,
            Self::Pid => CloneFlags::CLONE_NEWPID,
            Self::User => CloneFlags::CLONE_NEWUSER,
            Self::Uts => CloneFlags::CLONE_NEWUTS,
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.proc_name())
    }
}

impl FromStr for NamespaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mnt" => Ok(Self::Mount),
            "ipc" => Ok(Self::Ipc),
            "net" => Ok(Self::Net),
            "pid" => Ok(Self::Pid),
            "user" => Ok(Self::User),
            "uts" => Ok(Self::Uts),
            other => Err(Error::UnknownKind {
                name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for NamespaceKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NamespaceKind> for String {
    fn from(kind: NamespaceKind) -> Self {
        kind.proc_name().to_string()
    }
}

/// A selection of namespace kinds
///
/// Built with the same flag-per-kind shape as the CLI. However the selection
/// is assembled, [`KindSet::kinds`] always yields it in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSet {
    /// Select the mount namespace
    pub mount: bool,

    /// Select the IPC namespace
    pub ipc: bool,

    /// Select the network namespace
    pub net: bool,

    /// Select the PID namespace
    pub pid: bool,

    /// Select the user namespace
    pub user: bool,

    /// Select the UTS namespace
    pub uts: bool,
}

impl KindSet {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select all six kinds
    #[must_use]
    pub const fn all() -> Self {
        Self {
            mount: true,
            ipc: true,
            net: true,
            pid: true,
            user: true,
            uts: true,
        }
    }

    /// Select the mount namespace
    #[must_use]
    pub const fn with_mount(mut self, enable: bool) -> Self {
        self.mount = enable;
        self
    }

    /// Select the IPC namespace
    #[must_use]
    pub const fn with_ipc(mut self, enable: bool) -> Self {
        self.ipc = enable;
        self
    }

    /// Select the network namespace
    #[must_use]
    pub const fn with_net(mut self, enable: bool) -> Self {
        self.net = enable;
        self
    }

    /// Select the PID namespace
    #[must_use]
    pub const fn with_pid(mut self, enable: bool) -> Self {
        self.pid = enable;
        self
    }

    /// Select the user namespace
    #[must_use]
    pub const fn with_user(mut self, enable: bool) -> Self {
        self.user = enable;
        self
    }

    /// Select the UTS namespace
    #[must_use]
    pub const fn with_uts(mut self, enable: bool) -> Self {
        self.uts = enable;
        self
    }

    /// Add one kind to the selection
    #[must_use]
    pub const fn with(self, kind: NamespaceKind) -> Self {
        match kind {
            NamespaceKind::Mount => self.with_mount(true),
            NamespaceKind::Ipc => self.with_ipc(true),
            NamespaceKind::Net => self.with_net(true),
            NamespaceKind::Pid => self.with_pid(true),
            NamespaceKind::User => self.with_user(true),
            NamespaceKind::Uts => self.with_uts(true),
        }
    }

    /// Check whether a kind is selected
    #[must_use]
    pub const fn contains(&self, kind: NamespaceKind) -> bool {
        match kind {
            NamespaceKind::Mount => self.mount,
            NamespaceKind::Ipc => self.ipc,
            NamespaceKind::Net => self.net,
            NamespaceKind::Pid => self.pid,
            NamespaceKind::User => self.user,
            NamespaceKind::Uts => self.uts,
        }
    }

    /// Check whether nothing is selected
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.mount || self.ipc || self.net || self.pid || self.user || self.uts)
    }

    /// The selected kinds, in canonical order
    #[must_use]
    pub fn kinds(&self) -> Vec<NamespaceKind> {
        NamespaceKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proc_names() {
        assert_eq!(NamespaceKind::Mount.proc_name(), "mnt");
        assert_eq!(NamespaceKind::Uts.proc_name(), "uts");
    }

    #[test]
    fn test_parse_known_kinds() {
        for kind in NamespaceKind::ALL {
            let parsed: NamespaceKind = kind.proc_name().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_parse_unknown_kind() {
        let err = "mount".parse::<NamespaceKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownKind { name } if name == "mount"));
    }

    #[test]
    fn test_clone_flags() {
        assert_eq!(NamespaceKind::Net.clone_flag(), CloneFlags::CLONE_NEWNET);
        assert_eq!(NamespaceKind::Mount.clone_flag(), CloneFlags::CLONE_NEWNS);
    }

    #[test]
    fn test_kind_serde_roundtrip() {
        let json = serde_json::to_string(&NamespaceKind::Net).unwrap();
        assert_eq!(json, "\"net\"");
        let back: NamespaceKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NamespaceKind::Net);
    }

    #[test]
    fn test_kind_serde_rejects_unknown() {
        assert!(serde_json::from_str::<NamespaceKind>("\"cgroup\"").is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let set = KindSet::new().with_net(true).with_ipc(true);
        assert!(set.contains(NamespaceKind::Net));
        assert!(set.contains(NamespaceKind::Ipc));
        assert!(!set.contains(NamespaceKind::Mount));
    }

    #[test]
    fn test_canonical_order_ignores_construction_order() {
        let set = KindSet::new()
            .with(NamespaceKind::Uts)
            .with(NamespaceKind::Mount)
            .with(NamespaceKind::Net);

        assert_eq!(
            set.kinds(),
            vec![NamespaceKind::Mount, NamespaceKind::Net, NamespaceKind::Uts]
        );
    }

    #[test]
    fn test_empty_set() {
        assert!(KindSet::new().is_empty());
        assert!(!KindSet::all().is_empty());
        assert_eq!(KindSet::all().kinds().len(), 6);
    }
}
