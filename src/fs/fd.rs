use std::fmt::{self, Debug, Formatter};
use std::io;
use std::mem::{self, MaybeUninit};
use std::ops::Deref;

use libc::{c_int, stat as Stat};
use tracing::warn;

use crate::fs::Metadata;
use crate::util::{self, RawOsError};

const NO_FD: c_int = -1;

/// An owned file descriptor, closed exactly once when dropped.
///
/// Moving an `Fd` moves ownership of the descriptor. [`Fd::disown`] and [`Fd::into_raw`] give the
/// descriptor away without closing it, for handing it to something that manages its own closing,
/// such as a `DIR` stream.
pub struct Fd(c_int);

impl Fd {
    /// Takes ownership of `raw`.
    ///
    /// # Safety
    /// `raw` must be an open descriptor that isn't owned by anything else, otherwise it will be
    /// closed twice.
    pub const unsafe fn from_raw(raw: c_int) -> Fd {
        Fd(raw)
    }

    pub(crate) fn from_ret(ret: c_int) -> Result<Fd, RawOsError> {
        match ret {
            -1 => Err(util::err_no()),
            // SAFETY: The descriptor was just returned by the OS, nothing else owns it.
            fd => Ok(unsafe { Fd::from_raw(fd) }),
        }
    }

    pub const fn raw(&self) -> c_int {
        self.0
    }

    pub const fn is_owned(&self) -> bool {
        self.0 != NO_FD
    }

    /// Relinquishes ownership without closing the descriptor. Dropping afterwards is a no-op.
    pub fn disown(&mut self) {
        self.0 = NO_FD;
    }

    /// Relinquishes ownership, returning the raw descriptor to the caller.
    pub fn into_raw(mut self) -> c_int {
        mem::replace(&mut self.0, NO_FD)
    }

    pub(crate) fn metadata(&self) -> Result<Metadata, RawOsError> {
        let mut raw_meta: MaybeUninit<Stat> = MaybeUninit::uninit();
        // SAFETY: raw_meta is valid for writes of a whole stat struct.
        if unsafe { libc::fstat(self.0, raw_meta.as_mut_ptr()) } == -1 {
            return Err(util::err_no());
        }
        // SAFETY: fstat either initializes raw_meta or returns an error, handled above.
        let raw = unsafe { raw_meta.assume_init() };

        Ok(Metadata::from_stat(raw))
    }
}

impl Deref for Fd {
    type Target = c_int;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        if !self.is_owned() {
            return;
        }
        // SAFETY: We own the descriptor and it is never used again after this.
        if unsafe { libc::close(self.0) } == -1 {
            warn!(fd = self.0, "error while closing file descriptor: {}", io::Error::last_os_error());
        }
    }
}

impl Debug for Fd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fd({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_null() -> Fd {
        // SAFETY: The path is a valid C string.
        Fd::from_ret(unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC) })
            .unwrap()
    }

    fn is_open(raw: c_int) -> bool {
        // SAFETY: F_GETFD doesn't touch memory, it only fails for closed descriptors.
        unsafe { libc::fcntl(raw, libc::F_GETFD) != -1 }
    }

    #[test]
    fn test_ownership_can_be_given_away() {
        let mut fd = open_null();
        let raw = fd.raw();
        assert!(fd.is_owned());

        fd.disown();
        assert!(!fd.is_owned());
        drop(fd);
        assert!(is_open(raw), "Disowned descriptors shouldn't be closed on drop.");

        // SAFETY: raw was disowned above, so this is its only owner.
        let fd = unsafe { Fd::from_raw(raw) };
        let raw = fd.into_raw();
        assert!(is_open(raw), "into_raw should hand the descriptor over unclosed.");
        // SAFETY: raw is owned by nothing else.
        drop(unsafe { Fd::from_raw(raw) });
    }

    #[test]
    fn test_metadata() {
        let fd = open_null();
        let meta = fd.metadata().unwrap();
        assert_eq!(meta.file_type, crate::fs::FileType::CharDevice);
    }

    #[test]
    fn test_bad_descriptor() {
        assert!(Fd::from_ret(-1).is_err(), "-1 should never be taken as a descriptor.");
    }
}
