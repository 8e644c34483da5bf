use std::io;
use std::path::PathBuf;

use derive_more::{Display, Error, From, IsVariant};
use libc::c_int;

use crate::util::RawOsError;

/// The syscall-level operation that an [`IOError`] was raised by.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    #[display("open")]
    Open,
    #[display("stat")]
    Stat,
    #[display("read link")]
    ReadLink,
    #[display("unlink")]
    Unlink,
    #[display("remove directory")]
    RemoveDir,
    #[display("read directory")]
    ReadDir,
}

/// A filesystem syscall failed. Carries the attempted operation, the path it targeted and the
/// error number reported by the OS.
#[derive(Debug, Display, Clone, Error)]
#[display("unable to {op} {}: {}", path.display(), io::Error::from_raw_os_error(*errno))]
pub struct IOError {
    pub op: Op,
    pub path: PathBuf,
    pub errno: RawOsError,
}

impl IOError {
    pub(crate) fn new<P: Into<PathBuf>>(op: Op, path: P, errno: RawOsError) -> IOError {
        IOError {
            op,
            path: path.into(),
            errno,
        }
    }

    pub const fn errno(&self) -> RawOsError {
        self.errno
    }

    /// Whether the target didn't exist (any more) when the operation was attempted.
    pub const fn is_not_found(&self) -> bool {
        self.errno == libc::ENOENT
    }

    pub fn kind(&self) -> io::ErrorKind {
        io::Error::from_raw_os_error(self.errno).kind()
    }
}

impl From<IOError> for io::Error {
    fn from(value: IOError) -> Self {
        io::Error::new(value.kind(), value)
    }
}

/// The API was used in a way that isn't supported. Unlike an [`IOError`], this always points to
/// a bug in the caller.
#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[display("reopening with different flags isn't supported (held {held:#o}, requested {requested:#o})")]
    Reopen { held: c_int, requested: c_int },
    #[display("reading the target of an already opened link isn't supported")]
    ReadLinkOnOpenFile,
}

#[derive(Debug, Display, Clone, From, Error, IsVariant)]
pub enum Error {
    IO(IOError),
    Usage(UsageError),
}

impl Error {
    /// Returns the underlying [`IOError`], if any.
    pub const fn as_io(&self) -> Option<&IOError> {
        match self {
            Error::IO(e) => Some(e),
            Error::Usage(_) => None,
        }
    }

    pub const fn is_not_found(&self) -> bool {
        match self {
            Error::IO(e) => e.is_not_found(),
            Error::Usage(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
