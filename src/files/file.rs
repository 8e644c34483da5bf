use std::ffi::OsStr;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::FileKind;
use crate::fs::{FileId, RelativePath, Result};

/// An entry on disk, classified by a [`FileKind`].
///
/// There should be one `File` per entry. Two `File`s reaching the same object through different
/// names (hard links) can be told apart by [`File::id`], deduplicating them is up to the caller.
#[derive(Debug)]
pub struct File<'d> {
    path: RelativePath<'d>,
    kind: FileKind,
    version: Option<String>,
}

impl<'d> File<'d> {
    /// Wraps `path` as a file of the given `kind`. The version is taken from the last component
    /// of the name, no I/O is performed.
    pub fn new(path: RelativePath<'d>, kind: FileKind) -> File<'d> {
        let version = kind.version_of(path.basename());
        File {
            path,
            kind,
            version,
        }
    }

    pub fn plain(path: RelativePath<'d>) -> File<'d> {
        File::new(path, FileKind::Plain)
    }

    pub fn directory(path: RelativePath<'d>) -> File<'d> {
        File::new(path, FileKind::Directory)
    }

    /// Wraps `path` as a kernel build directory. Always succeeds, the version is only known if
    /// the name follows the `linux-<version>` pattern.
    pub fn build_dir(path: RelativePath<'d>) -> File<'d> {
        File::new(path, FileKind::BuildDir)
    }

    /// Classifies an entry by its name and type. If the entry can't be stat'ed, it degrades to a
    /// [`FileKind::Plain`] file and any problem surfaces when it is removed.
    pub fn from_entry(path: RelativePath<'d>) -> File<'d> {
        let file_type = match path.stat() {
            Ok(meta) => Some(meta.file_type),
            Err(e) => {
                debug!("{e}, classifying as a plain file");
                None
            },
        };
        let kind = FileKind::classify(path.basename(), file_type);
        File::new(path, kind)
    }

    pub fn filename(&self) -> &OsStr {
        self.path.filename()
    }

    pub fn path(&self) -> PathBuf {
        self.path.path()
    }

    pub fn relative_path(&self) -> &RelativePath<'d> {
        &self.path
    }

    pub const fn kind(&self) -> FileKind {
        self.kind
    }

    /// The name of this file's kind, for display.
    pub const fn type_name(&self) -> &'static str {
        self.kind.label()
    }

    /// The kernel version this file belongs to, if it is known.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn id(&self) -> Result<FileId> {
        self.path.id()
    }

    pub fn mtime(&self) -> Result<i64> {
        self.path.mtime()
    }

    /// Removes the file from disk: a single unlink for plain files, a recursive removal for
    /// directories.
    pub fn remove(&self) -> Result<()> {
        if self.kind.is_dir_like() {
            let stats = self.path.remove_dir_recursive()?;
            debug!(path = %self, ?stats, "removed {}", self.kind);
        } else {
            self.path.unlink()?;
            debug!(path = %self, "removed {}", self.kind);
        }
        Ok(())
    }
}

impl File<'static> {
    /// Classifies the entry at a top-level `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<File<'static>> {
        Ok(File::from_entry(RelativePath::from_path(path)?))
    }
}

impl Display for File<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
