#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use dutyroster::core::{Engine, EngineSettings};
use dutyroster::db::SqliteStore;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rti() -> Command {
    cargo_bin_cmd!("dutyroster")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_dutyroster.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize DB and register Alice, Bob and the administrator Dave
pub fn init_db_with_persons(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for name in ["Alice", "Bob"] {
        rti()
            .args(["--db", db_path, "person", "add", name])
            .assert()
            .success();
    }

    rti()
        .args(["--db", db_path, "person", "add", "Dave", "--admin"])
        .assert()
        .success();
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// In-memory engine pinned to `today`.
pub fn engine_at(today: &str) -> Engine<SqliteStore> {
    engine_with(today, EngineSettings::default())
}

pub fn engine_with(today: &str, settings: EngineSettings) -> Engine<SqliteStore> {
    let store = SqliteStore::in_memory().expect("in-memory store");
    Engine::new(store, settings).with_today(d(today))
}
