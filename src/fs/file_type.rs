#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    Regular,
    Socket,
    Other,
}

use FileType::*;

impl FileType {
    #[inline(always)]
    pub(crate) const fn from_stat_mode(st_mode: u32) -> FileType {
        match st_mode & libc::S_IFMT {
            libc::S_IFBLK => BlockDevice,
            libc::S_IFCHR => CharDevice,
            libc::S_IFDIR => Directory,
            libc::S_IFIFO => Fifo,
            libc::S_IFLNK => Symlink,
            libc::S_IFREG => Regular,
            libc::S_IFSOCK => Socket,
            _ => Other,
        }
    }

    pub const fn is_dir(&self) -> bool {
        matches!(self, Directory)
    }

    pub const fn is_symlink(&self) -> bool {
        matches!(self, Symlink)
    }
}
