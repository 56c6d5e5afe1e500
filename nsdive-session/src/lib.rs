//! Namespace entry and restoration
//!
//! This crate is the mechanism behind nsdive: resolving stable handles to the
//! namespaces of another process, switching the calling thread into them with
//! setns(2), and restoring the caller's own namespaces afterwards:
//! - [`NsHandle`] - an open descriptor on one `/proc/<pid>/ns/<kind>` file
//! - [`Session`] - one kind's enter/exit pair with guaranteed descriptor cleanup
//! - [`SessionGroup`] - ordered composition with rollback on partial failure
//!
//! setns(2) affects only the calling thread, so sessions and groups must not
//! be driven from multiple threads of the same process at once.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod group;
pub mod handle;
pub mod session;
pub mod switch;

pub use group::SessionGroup;
pub use handle::{NsHandle, NsId};
pub use session::Session;
pub use switch::{NsSwitch, Setns};
