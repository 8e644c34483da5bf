use libc::stat;

use super::{FileId, FileType};

/// The decoded result of a `stat` call. Symlinks are never followed, so `file_type` may be
/// [`FileType::Symlink`].
#[derive(Debug, Clone)]
pub struct Metadata {
    pub size: i64,             // st_size
    pub file_type: FileType,   // st_mode
    pub mode: u32,             // st_mode
    pub uid: u32,              // st_uid
    pub gid: u32,              // st_gid
    pub parent_device_id: u64, // st_dev
    pub self_device_id: u64,   // st_rdev
    pub time_accessed: (i64, i64), // st_atime, st_atime_nsec
    pub time_modified: (i64, i64), // st_mtime, st_mtime_nsec
    pub time_changed: (i64, i64),  // st_ctime, st_ctime_nsec
    pub links: u64,                // st_nlink
    pub inode_num: u64,            // st_ino
}

impl Metadata {
    #[allow(clippy::unnecessary_cast)]
    pub(crate) const fn from_stat(raw: stat) -> Metadata {
        Metadata {
            size: raw.st_size as i64,
            file_type: FileType::from_stat_mode(raw.st_mode),
            mode: raw.st_mode,
            uid: raw.st_uid,
            gid: raw.st_gid,
            parent_device_id: raw.st_dev as u64,
            self_device_id: raw.st_rdev as u64,
            time_accessed: (raw.st_atime as i64, raw.st_atime_nsec as i64),
            time_modified: (raw.st_mtime as i64, raw.st_mtime_nsec as i64),
            time_changed: (raw.st_ctime as i64, raw.st_ctime_nsec as i64),
            links: raw.st_nlink as u64,
            inode_num: raw.st_ino as u64,
        }
    }

    pub const fn id(&self) -> FileId {
        FileId::new(self.parent_device_id, self.inode_num)
    }

    /// Modification time in seconds since the epoch.
    pub const fn mtime(&self) -> i64 {
        self.time_modified.0
    }
}
