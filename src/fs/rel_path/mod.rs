//! Paths relative to an open directory.
//!
//! A [`RelativePath`] pairs a parent [`DirectoryStream`](crate::fs::dir::DirectoryStream) with the
//! name of one of its entries. Every operation on it (`open`, `stat`, `unlink`, ...) goes through
//! the `*at` family of syscalls using the parent's descriptor, so the entry is resolved against
//! the directory that was actually opened, not against whatever the parent's path resolves to at
//! the time of the call.
//!
//! [`RelativePath::remove_dir_recursive`] removes a whole tree with an explicit stack of open
//! streams, tolerating entries that are removed by someone else while it runs.

mod rel_path;
mod remove;

pub use rel_path::*;
pub use remove::*;
