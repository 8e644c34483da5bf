//! Directory-relative filesystem operations.
//!
//! The building blocks, leaf first:
//! - [`Fd`], an owned file descriptor that is closed exactly once.
//! - [`DirectoryStream`](dir::DirectoryStream), an open directory that can be read entry by
//!   entry.
//! - [`RelativePath`], an entry of an open directory, which all operations are performed through.
//! - [`Metadata`] and [`FileId`], what a `stat` of an entry reports and the identity derived from
//!   it.
#![cfg(target_os = "linux")]

pub mod dir;
pub mod rel_path;

mod error;
mod fd;
mod file_type;
mod id;
mod metadata;

pub use error::*;
pub use fd::*;
pub use file_type::*;
pub use id::*;
pub use metadata::*;
pub use rel_path::{RelativePath, RemoveStats};

pub use crate::util::RawOsError;
