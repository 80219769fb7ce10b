#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_yaml::Value;
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_ref())
            .expect("write temp file contents");
        path
    }

    /// Path under the workspace that does not exist yet.
    pub fn target(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        assert!(!path.exists(), "{path:?} should not exist yet");
        path
    }

    /// Names of every entry currently in the workspace, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names = fs::read_dir(self.path())
            .expect("read workspace")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}

pub fn csv_yaml() -> Command {
    Command::cargo_bin("csv-yaml").expect("binary exists")
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

/// Parses a YAML document and returns its top-level sequence.
pub fn read_entries(path: &Path) -> Vec<Value> {
    let text = fs::read_to_string(path).expect("read yaml output");
    match serde_yaml::from_str::<Value>(&text).expect("parse yaml output") {
        Value::Sequence(entries) => entries,
        other => panic!("expected a top-level sequence, got {other:?}"),
    }
}

/// Keys of one YAML mapping in document order.
pub fn keys(entry: &Value) -> Vec<String> {
    entry
        .as_mapping()
        .expect("entry is a mapping")
        .keys()
        .map(|key| key.as_str().expect("string key").to_string())
        .collect()
}

pub fn field<'a>(entry: &'a Value, name: &str) -> &'a Value {
    entry.get(name).unwrap_or_else(|| panic!("missing key {name}"))
}
