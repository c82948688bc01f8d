#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::PathBuf;
use tempfile::TempDir;

/// Private HOME and database for one test, removed on drop.
pub struct Sandbox {
    home: TempDir,
    pub db: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let home = tempfile::tempdir().expect("temp home");
        let db = home
            .path()
            .join("test_paytimer.sqlite")
            .to_string_lossy()
            .to_string();
        Self { home, db }
    }

    /// `paytimer --db <db>` running with the sandbox as HOME.
    pub fn pt(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("paytimer");
        cmd.env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .args(["--db", &self.db]);
        cmd
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.path().join(".paytimer").join("paytimer.conf")
    }

    pub fn out_file(&self, name: &str) -> String {
        self.home.path().join(name).to_string_lossy().to_string()
    }

    /// Run `init` in test mode (no config file).
    pub fn init(&self) {
        self.pt().args(["--test", "init"]).assert().success();
    }

    pub fn add(&self, date: &str, start: &str, end: &str) {
        self.pt()
            .args(["add", date, "--in", start, "--out", end])
            .assert()
            .success();
    }
}
