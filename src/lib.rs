//! Descriptor-relative filesystem primitives for finding and removing stale kernel build
//! artifacts.
//!
//! Everything in [`fs`] operates on an entry *relative to an open directory descriptor* rather
//! than by re-resolving a string path, so an entry can't be swapped out from under a traversal by
//! renaming one of its ancestors. The [`files`] module layers a small classification on top of
//! that: a [`File`](files::File) knows its type label, its kernel version (when the name carries
//! one) and how to remove itself.
//!
//! # Error Handling
//! Errors are strongly typed, as small structs that implement [`Error`](std::error::Error) and
//! are collected into an enum for static dispatch. [`fs::Error`] separates failures reported by
//! the OS ([`fs::IOError`]) from misuse of the API ([`fs::UsageError`]); the latter indicates a
//! bug in the caller and shouldn't be retried.
//!
//! # Concurrency
//! Nothing here is shared between threads. The only concurrency this crate cares about is
//! *external*: other processes may delete entries while a removal is running, and any entry that
//! vanishes in the meantime is treated as already removed.
//!
//! # Logging
//! The crate emits [`tracing`] events (mostly at `debug` and `trace` level) but never installs a
//! subscriber.
//!
//! # Features
//! - `fs` (default): the descriptor-relative layer, backed by `libc`. Linux only.
//! - `files` (default): the file classification layer, requires `fs`.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "fs")]
pub mod fs;

#[cfg(feature = "files")]
pub mod files;

#[cfg(feature = "fs")]
pub(crate) mod util;
