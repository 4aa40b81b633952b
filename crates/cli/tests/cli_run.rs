//! Runs the `syncpics` binary against temporary trees.
//!
//! Only dry runs and startup failures are exercised here, so ImageMagick does
//! not need to be installed.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Writes a config pointing at `<dir>/source` and `<dir>/mirror`.
fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let source = dir.join("source");
    std::fs::create_dir_all(&source).unwrap();
    let config = format!(
        r#"
[syncpics]
source = "{}"
destination = "{}"
excludes = ["**/private/*"]
{}
"#,
        source.display(),
        dir.join("mirror").display(),
        extra
    );
    let path = dir.join("syncpics.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn syncpics(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_syncpics"))
        .arg("--config-file")
        .arg(config)
        .arg("--no-progress")
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run syncpics")
}

#[test]
fn test_dry_run_prints_action_log() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    let source = dir.path().join("source");
    write_file(&source, "2024/clip.MP4", b"v");
    write_file(&source, "2024/photo.JPG", b"p");
    write_file(&source, "2024/raw.DNG", b"r");
    write_file(&source, "2024/private/secret.JPG", b"s");

    let output = syncpics(&config, &["--dryrun"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["2024/clip.MP4 -> 2024/clip.MP4", "2024/photo.JPG -> 2024/photo.HEIC"]
    );
    assert!(!dir.path().join("mirror").exists());
}

#[test]
fn test_unrecognized_format_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");
    write_file(&dir.path().join("source"), "weird.TXT", b"?");

    let output = syncpics(&config, &["--dryrun"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unhandled format for:"), "stderr: {}", stderr);
    assert!(stderr.contains("weird.TXT"));
}

#[test]
fn test_missing_config_file_exits_with_error() {
    let dir = TempDir::new().unwrap();

    let output = syncpics(&dir.path().join("absent.toml"), &["--dryrun"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
}

#[test]
fn test_invalid_config_exits_before_work() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[converter]\nquality = 0\n");
    write_file(&dir.path().join("source"), "photo.jpg", b"p");

    let output = syncpics(&config, &["--dryrun"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_event_date_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    let output = syncpics(&config, &["--include-event", "yesterday"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
