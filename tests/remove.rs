use std::fs;
use std::os::unix::fs::symlink;
use std::sync::Once;

use kernel_sweep::files::{File, FileKind};
use kernel_sweep::fs::{Op, RelativePath};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

#[test]
fn test_remove_stale_build_dir() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("linux-5.4.0");
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a"), "a").unwrap();
    fs::write(root.join("b/c"), "c").unwrap();
    symlink("/nonexistent", root.join("d")).unwrap();

    let file = File::from_path(&root).unwrap();
    assert_eq!(file.kind(), FileKind::BuildDir);
    assert_eq!(file.type_name(), "build directory");
    assert_eq!(file.path(), root);

    file.remove().unwrap();
    assert!(!root.exists(), "The build directory should be gone.");
    assert!(tmp.path().exists(), "Nothing outside of it should have been touched.");

    file.remove().expect("removing an already removed tree should succeed");
}

#[test]
fn test_missing_path() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("linux-4.19.0");

    let path = RelativePath::from_path(&missing).unwrap();
    let err = path.open(libc::O_RDONLY).unwrap_err();
    let io = err.as_io().expect("a missing path is an I/O problem");
    assert_eq!(io.op, Op::Open);
    assert_eq!(io.path, missing);
    assert!(io.is_not_found());
    assert!(path.stat().unwrap_err().is_not_found());

    let file = File::from_path(&missing).unwrap();
    assert_eq!(file.kind(), FileKind::Plain, "Unknown entries degrade to plain files.");
    assert!(file.remove().unwrap_err().is_not_found());
    assert!(!missing.exists(), "Nothing should have been created.");
}
