//! nsdive Core - Foundation types and errors
//!
//! This crate provides the plain-data types shared by the nsdive crates:
//! the six namespace kinds, kind selections, target identifiers, and the
//! error taxonomy. It performs no I/O.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod kind;
pub mod target;

pub use error::{Error, Result};
pub use kind::{KindSet, NamespaceKind};
pub use target::NsTarget;
