#![warn(clippy::pedantic)]

mod common;

use std::path::PathBuf;
use std::process::Command;

use trussbridge::{
    analyze_bridge, load_design, save_design, DesignDocument, DesignFileError,
};

use common::{warren, STANDARD_SITE, STRONG, WEAK};

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("trussbridge-{}-{name}.json", std::process::id()))
}

#[test]
fn saved_design_loads_back_unchanged() {
    let mut bridge = warren(STANDARD_SITE, STRONG);
    analyze_bridge(&mut bridge);
    bridge.notes_mut().designed_by = "E. Warren".to_string();
    let path = scratch_file("round-trip");

    save_design(&bridge, &path).expect("temp dir is writable");
    let loaded = load_design(&path).expect("file was just written");
    std::fs::remove_file(&path).ok();

    assert_eq!(DesignDocument::from_bridge(&loaded), DesignDocument::from_bridge(&bridge));
    assert!(loaded
        .members()
        .all(|m| m.member.compression_force_strength_ratio().is_some()));
}

#[test]
fn missing_file_reports_its_path() {
    let path = scratch_file("does-not-exist");
    let error = load_design(&path).expect_err("nothing there");
    assert!(matches!(error, DesignFileError::Io { .. }));
    assert!(error.to_string().contains("does-not-exist"));
}

fn run_cli(name: &str, stock: common::Stock) -> String {
    let bridge = warren(STANDARD_SITE, stock);
    let path = scratch_file(name);
    save_design(&bridge, &path).expect("temp dir is writable");
    let output = Command::new(env!("CARGO_BIN_EXE_trussbridge"))
        .arg(&path)
        .output()
        .expect("binary runs");
    std::fs::remove_file(&path).ok();
    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let expected_prefix = format!("{}: ", path.display());
    assert!(stdout.starts_with(&expected_prefix), "unexpected output {stdout:?}");
    stdout[expected_prefix.len()..].trim_end().to_string()
}

#[test]
fn command_line_reports_pass_and_fail() {
    assert_eq!(run_cli("cli-strong", STRONG), "passes.");
    assert_eq!(run_cli("cli-weak", WEAK), "fails.");
}

#[test]
fn command_line_rejects_garbage() {
    let path = scratch_file("garbage");
    std::fs::write(&path, "not a bridge").expect("temp dir is writable");
    let output = Command::new(env!("CARGO_BIN_EXE_trussbridge"))
        .arg(&path)
        .output()
        .expect("binary runs");
    std::fs::remove_file(&path).ok();
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("as a bridge file."));
}
