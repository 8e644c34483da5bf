//! Classified filesystem entries.
//!
//! A [`File`] wraps a [`RelativePath`](crate::fs::RelativePath) together with a [`FileKind`],
//! which decides how the entry is labelled and how it is removed: plain files are unlinked,
//! directory-shaped kinds are removed recursively. Deciding *which* files should be removed is
//! left to the caller.

mod file;
mod kind;

pub use file::*;
pub use kind::*;
