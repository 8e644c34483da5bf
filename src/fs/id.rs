use std::fmt::{self, Display, Formatter};

use super::Metadata;

/// Identifies an on-disk object by device and inode, regardless of the name used to reach it.
///
/// Two entries with equal ids are the same object, e.g. hard links to one file. Ids are meant for
/// deduplication only and carry no meaningful order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    device: u64,
    inode: u64,
}

impl FileId {
    pub const fn new(device: u64, inode: u64) -> FileId {
        FileId {
            device,
            inode,
        }
    }

    pub const fn from_stat(meta: &Metadata) -> FileId {
        meta.id()
    }

    pub const fn device(&self) -> u64 {
        self.device
    }

    pub const fn inode(&self) -> u64 {
        self.inode
    }
}

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}:{}", self.device, self.inode)
    }
}
