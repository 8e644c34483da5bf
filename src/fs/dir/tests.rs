#![cfg(test)]

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::symlink;

use tempfile::TempDir;

use super::*;
use crate::fs::{Error, Op, RelativePath};

fn scratch(entries: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in entries {
        fs::write(dir.path().join(name), name).unwrap();
    }
    dir
}

#[test]
fn test_advance_lists_every_entry() {
    let dir = scratch(&["a", "b", "c"]);
    let mut stream = DirectoryStream::open_path(dir.path()).unwrap();
    assert_eq!(stream.current_name(), None, "A fresh stream shouldn't be positioned at an entry.");

    let mut names = BTreeSet::new();
    while stream.advance().unwrap() {
        names.insert(stream.current_name().unwrap().to_owned());
    }

    assert_eq!(
        names,
        [".", "..", "a", "b", "c"].into_iter().map(OsString::from).collect::<BTreeSet<_>>(),
        "Streams should report all entries, including the special ones."
    );
    assert!(!stream.advance().unwrap(), "An exhausted stream should stay exhausted.");
    assert_eq!(stream.current_name(), None);
}

#[test]
fn test_into_entries_skips_special_entries() {
    let dir = scratch(&["kernel", "config"]);
    let stream = DirectoryStream::open_path(dir.path()).unwrap();

    let mut entries = stream.into_entries().unwrap();
    entries.sort_by(|a, b| a.filename().cmp(b.filename()));

    assert_eq!(entries.len(), 2, "Only real entries should be returned.");
    assert_eq!(entries[0].filename(), "config");
    assert_eq!(entries[1].filename(), "kernel");
    assert_eq!(entries[1].path(), dir.path().join("kernel"));
    // The shared stream is still open, entries can be acted upon.
    assert_eq!(entries[0].stat().unwrap().size, "config".len() as i64);
}

#[test]
fn test_open_relative_to_parent() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/inner"), "").unwrap();

    let parent = DirectoryStream::open_path(dir.path()).unwrap();
    let sub = RelativePath::new(&parent, "sub");
    let stream = DirectoryStream::open(&sub).unwrap();

    assert_eq!(stream.path(), dir.path().join("sub"));
    let entries = stream.into_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path(), dir.path().join("sub/inner"));
}

#[test]
fn test_open_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    match DirectoryStream::open_path(&missing) {
        Err(Error::IO(e)) => {
            assert_eq!(e.op, Op::Open);
            assert_eq!(e.path, missing);
            assert!(e.is_not_found(), "Opening a missing directory should report ENOENT.");
        },
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_open_refuses_non_directories() {
    let dir = scratch(&["file"]);
    symlink(dir.path(), dir.path().join("link")).unwrap();
    let parent = DirectoryStream::open_path(dir.path()).unwrap();

    let file = DirectoryStream::open(&RelativePath::new(&parent, "file")).unwrap_err();
    assert_eq!(file.as_io().map(|e| e.errno), Some(libc::ENOTDIR));

    let link = DirectoryStream::open(&RelativePath::new(&parent, "link"));
    assert!(link.is_err(), "Streams should never follow a symlink to a directory.");
}
