use std::ffi::{CStr, OsStr, OsString};
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::rc::Rc;

use libc::{DIR, O_CLOEXEC, O_DIRECTORY, O_NOFOLLOW, O_RDONLY, c_int};
use tracing::warn;

use crate::fs::{Fd, IOError, Op, RelativePath, Result};
use crate::util;

/// Flags used to open every directory that gets streamed. Symlinks are never followed, so a link
/// to a directory can't redirect a traversal outside of the tree being walked.
pub const DIR_FLAGS: c_int = O_RDONLY | O_DIRECTORY | O_NOFOLLOW | O_CLOEXEC;

/// An open directory and its current read position.
///
/// The stream remembers the path it was opened with, which is only used to build the paths of
/// entries read from it (for errors and display). All operations on those entries go through the
/// stream's descriptor.
pub struct DirectoryStream {
    dir: NonNull<DIR>,
    path: PathBuf,
    current: Option<OsString>,
}

impl DirectoryStream {
    /// Opens the directory at `dir_path`, as the root of a traversal.
    pub fn open_path<P: AsRef<Path>>(dir_path: P) -> Result<DirectoryStream> {
        let dir_path = dir_path.as_ref();
        let error = |errno| IOError::new(Op::Open, dir_path, errno);
        let pathname = util::to_cstring(dir_path.as_os_str()).map_err(error)?;

        // SAFETY: pathname is a valid, nul-terminated string that outlives the call.
        let fd = Fd::from_ret(unsafe { libc::open(pathname.as_ptr(), DIR_FLAGS) }).map_err(error)?;
        DirectoryStream::from_fd(fd, dir_path.to_owned())
    }

    /// Opens the directory referred to by `entry`, relative to the entry's parent.
    pub fn open(entry: &RelativePath<'_>) -> Result<DirectoryStream> {
        let fd = entry.open(DIR_FLAGS)?;
        DirectoryStream::from_fd(fd, entry.path())
    }

    fn from_fd(mut fd: Fd, path: PathBuf) -> Result<DirectoryStream> {
        // SAFETY: fd is an open directory descriptor. If this succeeds, the stream takes over the
        // descriptor, otherwise it remains ours to close.
        let dir = unsafe { libc::fdopendir(*fd) };
        match NonNull::new(dir) {
            Some(dir) => {
                fd.disown();
                Ok(DirectoryStream {
                    dir,
                    path,
                    current: None,
                })
            },
            None => Err(IOError::new(Op::Open, path, util::err_no()))?,
        }
    }

    /// The path this stream was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn raw_fd(&self) -> c_int {
        // SAFETY: self.dir is a valid stream until dropped.
        unsafe { libc::dirfd(self.dir.as_ptr()) }
    }

    /// Moves to the next entry. Returns `false` once the end of the directory has been reached,
    /// after which there is no current entry.
    pub fn advance(&mut self) -> Result<bool> {
        // readdir only reports errors through errno, leaving it untouched at the end of the stream.
        util::clear_err_no();
        // SAFETY: self.dir is a valid stream and is never shared between threads.
        let entry = unsafe { libc::readdir(self.dir.as_ptr()) };

        if entry.is_null() {
            self.current = None;
            return match util::err_no() {
                0 => Ok(false),
                e => Err(IOError::new(Op::ReadDir, &self.path, e))?,
            };
        }

        // SAFETY: readdir returned a valid entry, which stays valid until the next call on this
        // stream. d_name is nul-terminated.
        let name = unsafe { CStr::from_ptr((*entry).d_name.as_ptr()) };
        self.current = Some(OsStr::from_bytes(name.to_bytes()).to_owned());
        Ok(true)
    }

    /// The name of the entry the stream is currently positioned at, including `.` and `..`.
    pub fn current_name(&self) -> Option<&OsStr> {
        self.current.as_deref()
    }

    /// Reads all remaining entries, other than `.` and `..`, into relative paths that keep this
    /// stream open between them.
    pub fn into_entries(mut self) -> Result<Vec<RelativePath<'static>>> {
        let mut names = Vec::new();
        while self.advance()? {
            match self.current.take() {
                Some(name) if !is_special(&name) => names.push(name),
                _ => {},
            }
        }

        let shared = Rc::new(self);
        Ok(names.into_iter()
            .map(|name| RelativePath::shared(Rc::clone(&shared), name))
            .collect())
    }
}

/// Whether `name` is one of the `.` or `..` pseudo-entries.
pub(crate) fn is_special(name: &OsStr) -> bool {
    name == "." || name == ".."
}

impl Drop for DirectoryStream {
    fn drop(&mut self) {
        // SAFETY: The stream (and with it the descriptor) is never used again after this.
        if unsafe { libc::closedir(self.dir.as_ptr()) } == -1 {
            warn!(
                path = %self.path.display(),
                "error while closing directory stream: {}",
                io::Error::last_os_error(),
            );
        }
    }
}

impl Debug for DirectoryStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryStream")
            .field("fd", &self.raw_fd())
            .field("path", &self.path)
            .field("current", &self.current)
            .finish()
    }
}
