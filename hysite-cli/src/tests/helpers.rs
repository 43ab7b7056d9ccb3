//! Test helpers for writing CLI inputs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Write `contents` to `path`, panicking with context on failure.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

/// Create a temporary directory with a UTF-8 root path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// A minimal, valid model artefact.
pub(super) const CONSTANT_MODEL: &[u8] = br#"{"kind":"constant","value":0.6}"#;
