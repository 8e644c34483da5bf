use std::ffi::{CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;

use libc::c_int;

/// The raw error number reported by the OS.
pub type RawOsError = c_int;

pub fn err_no() -> RawOsError {
    // SAFETY: raw_os_error guarantees Some if constructed from last_os_error.
    unsafe { io::Error::last_os_error().raw_os_error().unwrap_unchecked() }
}

/// Resets errno, for calls like `readdir` that only signal failure through it.
pub fn clear_err_no() {
    // SAFETY: __errno_location always returns a valid pointer to the calling thread's errno.
    unsafe { *libc::__errno_location() = 0 }
}

pub fn to_cstring(value: &OsStr) -> Result<CString, RawOsError> {
    // Interior nul bytes can't be passed to the OS, treat them like any other invalid argument.
    CString::new(value.as_bytes()).map_err(|_| libc::EINVAL)
}
