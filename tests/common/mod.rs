#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh back-office home directory that outlives the test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// The shell binary in script mode, rooted at `home`.
pub fn script_cli(home: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("halo_backoffice_cli").expect("binary builds");
    cmd.env("HALO_BACKOFFICE_HOME", home)
        .env("HALO_BACKOFFICE_CLI_SCRIPT", "1")
        .env_remove("RUST_LOG");
    cmd
}
