use libc::{EISDIR, ENOTDIR, EPERM};
use tracing::{debug, trace};

use super::RelativePath;
use crate::fs::dir::{self, DirectoryStream};
use crate::fs::{Error, IOError, Result};
use crate::util::RawOsError;

/// Counts of what a recursive removal did, for reporting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemoveStats {
    /// Non-directory entries unlinked.
    pub files: usize,
    /// Directories removed, including the root.
    pub dirs: usize,
    /// Entries that had already disappeared when they were about to be removed.
    pub vanished: usize,
}

impl RemoveStats {
    fn tolerate(&mut self, result: Result<()>, counter: fn(&mut RemoveStats) -> &mut usize) -> Result<()> {
        match result {
            Ok(()) => *counter(self) += 1,
            Err(e) if e.is_not_found() => {
                trace!("{e}, already removed");
                self.vanished += 1;
            },
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

/// Whether a failed unlink suggests the entry is a directory. Linux reports `EISDIR`, POSIX
/// specifies `EPERM`.
const fn is_dir_errno(errno: RawOsError) -> bool {
    errno == EISDIR || errno == EPERM
}

impl RelativePath<'_> {
    /// Removes this directory along with everything in it.
    ///
    /// Entries are unlinked optimistically and only treated as directories when the unlink says
    /// so, which saves a `stat` per entry. Open directories are kept on an explicit stack, one
    /// stream per level, and each one is removed as soon as its stream is exhausted. Entries
    /// (including this directory) that disappear while the removal is running count as removed,
    /// so removing a tree that no longer exists succeeds with nothing to do.
    ///
    /// The first other error aborts the removal, leaving the tree partially removed. Retrying is
    /// safe.
    pub fn remove_dir_recursive(&self) -> Result<RemoveStats> {
        let mut stats = RemoveStats::default();
        let root = match DirectoryStream::open(self) {
            Ok(root) => root,
            Err(e) if e.is_not_found() => {
                debug!("{e}, nothing to remove");
                stats.vanished += 1;
                return Ok(stats);
            },
            Err(e) => return Err(e),
        };

        debug!(path = %self.path().display(), "removing directory tree");
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            if !top.advance()? {
                // The popped stream has been emptied, so its directory can be removed through the
                // parent, which is still positioned at it.
                stack.pop();
                if let Some(parent) = stack.last() {
                    if let Some(name) = parent.current_name() {
                        let emptied = RelativePath::new(parent, name);
                        stats.tolerate(emptied.remove_dir(), |s| &mut s.dirs)?;
                    }
                }
                continue;
            }

            let name = match top.current_name() {
                Some(name) if !dir::is_special(name) => name.to_owned(),
                _ => continue,
            };

            let descend = {
                let entry = RelativePath::new(top, name);
                match entry.unlink() {
                    Err(Error::IO(e)) if is_dir_errno(e.errno) => open_subdir(&entry, e, &mut stats)?,
                    result => {
                        stats.tolerate(result, |s| &mut s.files)?;
                        None
                    },
                }
            };

            if let Some(child) = descend {
                debug!(path = %child.path().display(), "descending");
                stack.push(child);
            }
        }

        stats.tolerate(self.remove_dir(), |s| &mut s.dirs)?;
        debug!(path = %self.path().display(), ?stats, "removed directory tree");
        Ok(stats)
    }
}

/// Opens an entry that couldn't be unlinked, because it seems to be a directory. Returns `None`
/// if it has disappeared in the meantime.
fn open_subdir(
    entry: &RelativePath<'_>,
    unlink_error: IOError,
    stats: &mut RemoveStats,
) -> Result<Option<DirectoryStream>> {
    match DirectoryStream::open(entry) {
        Ok(child) => Ok(Some(child)),
        Err(e) if e.is_not_found() => {
            trace!("{e}, already removed");
            stats.vanished += 1;
            Ok(None)
        },
        // EPERM on something that isn't a directory is a genuine permission problem.
        Err(Error::IO(e)) if e.errno == ENOTDIR => Err(unlink_error)?,
        Err(e) => Err(e),
    }
}
