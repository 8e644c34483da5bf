use std::ffi::OsStr;
use std::fmt::{self, Display, Formatter};

use derive_more::IsVariant;

use crate::fs::FileType;

/// Name prefix of kernel build directories, followed by the kernel version.
pub const BUILD_DIR_PREFIX: &str = "linux-";

/// What a [`File`](super::File) is, as far as cleaning up is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum FileKind {
    /// Anything that is removed with a single unlink: regular files, symlinks, sockets, ...
    Plain,
    Directory,
    /// The build (or source) tree of a kernel. Only labelled differently from a directory.
    BuildDir,
}

impl FileKind {
    /// A stable, human readable name of the kind.
    pub const fn label(&self) -> &'static str {
        match self {
            FileKind::Plain => "file",
            FileKind::Directory => "directory",
            FileKind::BuildDir => "build directory",
        }
    }

    /// Whether files of this kind have to be removed recursively.
    pub const fn is_dir_like(&self) -> bool {
        matches!(self, FileKind::Directory | FileKind::BuildDir)
    }

    /// Picks the kind of an entry from its name and type, without touching the filesystem.
    /// Entries of unknown type are always [`FileKind::Plain`].
    pub fn classify(name: &OsStr, file_type: Option<FileType>) -> FileKind {
        match file_type {
            Some(FileType::Directory) if build_dir_version(name).is_some() => FileKind::BuildDir,
            Some(FileType::Directory) => FileKind::Directory,
            _ => FileKind::Plain,
        }
    }

    /// Extracts the kernel version that an entry of this kind carries in its name, if any.
    pub fn version_of(&self, name: &OsStr) -> Option<String> {
        match self {
            FileKind::BuildDir => build_dir_version(name),
            FileKind::Plain | FileKind::Directory => None,
        }
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `linux-6.1.12-gentoo` carries the version `6.1.12-gentoo`.
fn build_dir_version(name: &OsStr) -> Option<String> {
    let version = name.to_str()?.strip_prefix(BUILD_DIR_PREFIX)?;
    version.starts_with(|c: char| c.is_ascii_digit()).then(|| version.to_owned())
}
