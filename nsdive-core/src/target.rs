//! Target process identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who owns the namespaces being resolved
///
/// A `Process` identifier is deliberately any string: validity is decided
/// entirely by the procfs lookup, not locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NsTarget {
    /// The calling process's own namespaces (the `self` procfs entry)
    Current,

    /// Another process, by identifier
    Process(String),
}

impl NsTarget {
    /// Create a target from a process identifier
    #[must_use]
    pub fn process(id: impl Into<String>) -> Self {
        Self::Process(id.into())
    }

    /// The procfs path component for this target
    #[must_use]
    pub fn path_component(&self) -> &str {
        match self {
            Self::Current => "self",
            Self::Process(id) => id,
        }
    }
}

impl fmt::Display for NsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_component())
    }
}

impl From<u32> for NsTarget {
    fn from(pid: u32) -> Self {
        Self::Process(pid.to_string())
    }
}
