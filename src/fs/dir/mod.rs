//! Streams over the entries of a directory.
//!
//! A [`DirectoryStream`] owns an open directory and its read position. Besides iterating entry
//! names, it serves as the parent that a [`RelativePath`](crate::fs::RelativePath) performs its
//! operations against, so a stream stays open for as long as any entry read from it is in use.

mod stream;
mod tests;

pub use stream::*;
