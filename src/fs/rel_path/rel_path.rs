use std::ffi::{CString, OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::mem::MaybeUninit;
use std::ops::Deref;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use libc::{AT_REMOVEDIR, AT_SYMLINK_NOFOLLOW, O_CLOEXEC, c_int, stat as Stat};

use crate::fs::dir::DirectoryStream;
use crate::fs::{Fd, FileId, IOError, Metadata, Op, Result, UsageError};
use crate::util::{self, RawOsError};

/// How much the buffer grows by whenever a link target fills it completely.
pub const READLINK_GROW_STEP: usize = 0x100;

/// The directory that a [`RelativePath`] is relative to.
#[derive(Debug, Clone)]
pub enum Parent<'d> {
    /// A stream owned by the caller, e.g. one frame of a traversal.
    Borrowed(&'d DirectoryStream),
    /// A stream kept open for as long as any of its entries is alive.
    Shared(Rc<DirectoryStream>),
}

impl Deref for Parent<'_> {
    type Target = DirectoryStream;

    fn deref(&self) -> &Self::Target {
        match self {
            Parent::Borrowed(dir) => *dir,
            Parent::Shared(dir) => dir.as_ref(),
        }
    }
}

#[derive(Debug)]
struct CachedFd {
    fd: Fd,
    flags: c_int,
}

/// An entry of a directory, identified by the open parent directory and the entry's name.
///
/// # Invariants
/// - `filename` is never empty.
/// - If `filename` starts with '/', it is absolute and the parent is only used to carry the
///   entry, the OS ignores the parent descriptor for absolute names.
#[derive(Debug)]
pub struct RelativePath<'d> {
    parent: Parent<'d>,
    filename: OsString,
    cached: Option<CachedFd>,
}

impl<'d> RelativePath<'d> {
    /// Refers to the entry `filename` of `parent`.
    ///
    /// # Panics
    /// Panics if `filename` is empty.
    pub fn new<S: Into<OsString>>(parent: &'d DirectoryStream, filename: S) -> RelativePath<'d> {
        RelativePath::with_parent(Parent::Borrowed(parent), filename.into())
    }

    fn with_parent(parent: Parent<'d>, filename: OsString) -> RelativePath<'d> {
        assert!(!filename.is_empty(), "relative path with an empty file name");
        RelativePath {
            parent,
            filename,
            cached: None,
        }
    }

    /// The name of this entry within its parent.
    pub fn filename(&self) -> &OsStr {
        &self.filename
    }

    /// The last component of the file name, which differs from [`filename`](Self::filename) for
    /// top-level paths.
    pub fn basename(&self) -> &OsStr {
        Path::new(&self.filename).file_name().unwrap_or(&self.filename)
    }

    /// The full path of this entry, which is the file name itself if it is absolute.
    pub fn path(&self) -> PathBuf {
        if self.filename.as_bytes().starts_with(b"/") {
            PathBuf::from(&self.filename)
        } else {
            self.parent.path().join(&self.filename)
        }
    }

    pub fn parent(&self) -> &DirectoryStream {
        &self.parent
    }

    fn c_filename(&self, op: Op) -> Result<CString> {
        Ok(util::to_cstring(&self.filename).map_err(|e| self.io_error(op, e))?)
    }

    pub(crate) fn io_error(&self, op: Op, errno: RawOsError) -> IOError {
        IOError::new(op, self.path(), errno)
    }

    /// Opens this entry with `flags`. The returned descriptor is always close-on-exec.
    pub fn open(&self, flags: c_int) -> Result<Fd> {
        let name = self.c_filename(Op::Open)?;

        // SAFETY: name is a valid C string and the parent descriptor is open while borrowed.
        let ret = unsafe { libc::openat(self.parent.raw_fd(), name.as_ptr(), flags | O_CLOEXEC) };
        Ok(Fd::from_ret(ret).map_err(|e| self.io_error(Op::Open, e))?)
    }

    /// Opens this entry once and keeps the descriptor around for later operations, including
    /// [`stat`](Self::stat).
    ///
    /// Asking for the descriptor again with different flags is a [`UsageError`], reopening
    /// isn't supported.
    pub fn cached_fd(&mut self, flags: c_int) -> Result<c_int> {
        if let Some(cached) = &self.cached {
            if cached.flags != flags {
                Err(UsageError::Reopen {
                    held: cached.flags,
                    requested: flags,
                })?
            }
            return Ok(cached.fd.raw());
        }

        let fd = self.open(flags)?;
        let raw = fd.raw();
        self.cached = Some(CachedFd { fd, flags });
        Ok(raw)
    }

    /// Whether a descriptor has been cached by [`cached_fd`](Self::cached_fd).
    pub const fn is_open(&self) -> bool {
        self.cached.is_some()
    }

    /// Reads the metadata of this entry. If this entry is a symlink, the link itself is described
    /// rather than its target.
    pub fn stat(&self) -> Result<Metadata> {
        if let Some(cached) = &self.cached {
            return Ok(cached.fd.metadata().map_err(|e| self.io_error(Op::Stat, e))?);
        }

        let name = self.c_filename(Op::Stat)?;
        let mut raw_meta: MaybeUninit<Stat> = MaybeUninit::uninit();
        // SAFETY: name is a valid C string and raw_meta is valid for writes of a stat struct.
        let ret = unsafe {
            libc::fstatat(self.parent.raw_fd(), name.as_ptr(), raw_meta.as_mut_ptr(), AT_SYMLINK_NOFOLLOW)
        };
        if ret == -1 {
            Err(self.io_error(Op::Stat, util::err_no()))?
        }
        // SAFETY: fstatat either initializes raw_meta or returns an error, handled above.
        Ok(Metadata::from_stat(unsafe { raw_meta.assume_init() }))
    }

    pub fn id(&self) -> Result<FileId> {
        Ok(FileId::from_stat(&self.stat()?))
    }

    pub fn mtime(&self) -> Result<i64> {
        Ok(self.stat()?.mtime())
    }

    /// Reads the target of this entry, which has to be a symlink.
    pub fn read_link(&self) -> Result<OsString> {
        if self.cached.is_some() {
            Err(UsageError::ReadLinkOnOpenFile)?
        }
        // The extra byte tells a complete read apart from a truncated one.
        let expected = usize::try_from(self.stat()?.size).unwrap_or(0);
        self.read_link_sized(expected + 1)
    }

    /// Reads the link target, starting with a buffer of `initial` bytes. The target may have
    /// changed since it was measured, so the buffer grows until a read comes back short of it.
    pub(crate) fn read_link_sized(&self, initial: usize) -> Result<OsString> {
        let name = self.c_filename(Op::ReadLink)?;
        let mut buf = vec![0_u8; initial.max(1)];

        loop {
            // SAFETY: name is a valid C string and buf is valid for writes of buf.len() bytes.
            let ret = unsafe {
                libc::readlinkat(self.parent.raw_fd(), name.as_ptr(), buf.as_mut_ptr().cast(), buf.len())
            };
            match usize::try_from(ret) {
                Err(_) => Err(self.io_error(Op::ReadLink, util::err_no()))?,
                Ok(len) if len == buf.len() => buf.resize(buf.len() + READLINK_GROW_STEP, 0),
                Ok(len) => {
                    buf.truncate(len);
                    return Ok(OsString::from_vec(buf));
                },
            }
        }
    }

    /// Removes this entry, which mustn't be a directory.
    pub fn unlink(&self) -> Result<()> {
        self.unlink_at(Op::Unlink, 0)
    }

    /// Removes this entry, which has to be an empty directory.
    pub fn remove_dir(&self) -> Result<()> {
        self.unlink_at(Op::RemoveDir, AT_REMOVEDIR)
    }

    fn unlink_at(&self, op: Op, flags: c_int) -> Result<()> {
        let name = self.c_filename(op)?;
        // SAFETY: name is a valid C string and the parent descriptor is open while borrowed.
        if unsafe { libc::unlinkat(self.parent.raw_fd(), name.as_ptr(), flags) } == -1 {
            Err(self.io_error(op, util::err_no()))?
        }
        Ok(())
    }
}

impl RelativePath<'static> {
    /// Refers to the entry `filename` of a shared `parent`, keeping the parent open.
    ///
    /// # Panics
    /// Panics if `filename` is empty.
    pub fn shared<S: Into<OsString>>(parent: Rc<DirectoryStream>, filename: S) -> RelativePath<'static> {
        RelativePath::with_parent(Parent::Shared(parent), filename.into())
    }

    /// Refers to a top-level path. Absolute paths are kept verbatim under a stream on `/`,
    /// relative ones under a stream on the current directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RelativePath<'static>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            Err(IOError::new(Op::Open, path, libc::ENOENT))?
        }

        let base = if path.is_absolute() { "/" } else { "." };
        let parent = DirectoryStream::open_path(base)?;
        Ok(RelativePath::shared(Rc::new(parent), path.as_os_str()))
    }
}

impl Display for RelativePath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}
