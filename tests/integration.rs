//! Integration tests for read-dir-files


use std::collections::BTreeSet;

use harness::{FixtureDir, listed_lines, run_read_dir_files};
use read_dir_files::{
    Encoding, ListEvent, ListOptions, PathLister, ReadOptions, list_paths, read_tree,
    read_tree_sync,
};
use serde_json::Value;

const SAMPLE_PATHS: [&str; 8] = [
    "dir/", "dir/a", "dir/b", "dir/c", "dir/d", "dir/sub/", "dir/sub/a", "dir/sub/b",
];

fn sample_set() -> BTreeSet<String> {
    SAMPLE_PATHS.iter().map(|p| p.to_string()).collect()
}

fn root_arg(fixture: &FixtureDir) -> String {
    fixture.sample_root().to_string_lossy().into_owned()
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn test_read_sync_sample_tree() {
    let fixture = FixtureDir::sample();
    let tree = read_tree_sync(fixture.sample_root(), &ReadOptions::default()).unwrap();

    let len = |name: &str| tree.file(name).unwrap().len();
    assert_eq!((len("a"), len("b"), len("c"), len("d")), (12, 10, 0, 0));

    let sub = tree.dir("sub").unwrap();
    assert_eq!(sub.file("a").unwrap().len(), 16);
    assert_eq!(sub.file("b").unwrap().len(), 0);
}

#[tokio::test]
async fn test_read_async_with_encoding() {
    let fixture = FixtureDir::sample();
    let options = ReadOptions::new().with_encoding(Encoding::Utf8);
    let tree = read_tree(fixture.sample_root(), &options).await.unwrap();

    assert_eq!(tree.file("b").unwrap().as_text(), Some("Hello ncp\n"));
    assert_eq!(
        tree.dir("sub").unwrap().file("a").unwrap().as_text(),
        Some("Hello nodejitsu\n")
    );
}

#[tokio::test]
async fn test_read_async_non_recursive() {
    let fixture = FixtureDir::sample();
    let tree = read_tree(fixture.sample_root(), &ReadOptions::new().recursive(false))
        .await
        .unwrap();
    assert_eq!(tree.len(), 4);
    assert!(tree.dir("sub").is_none());
}

#[tokio::test]
async fn test_list_paths_relative_to_fixtures() {
    let fixture = FixtureDir::sample();
    let paths = list_paths(fixture.sample_root(), ListOptions::new().normalize(false))
        .finish()
        .await
        .unwrap();

    assert_eq!(paths.iter().cloned().collect::<BTreeSet<_>>(), sample_set());
    assert_eq!(paths[0], "dir/");
}

#[tokio::test]
async fn test_list_events_counts() {
    let fixture = FixtureDir::sample();
    let listing = PathLister::new(ListOptions::new().normalize(false)).list(fixture.sample_root());
    let (events, result) = listing.collect_events().await;
    result.unwrap();

    let directories: BTreeSet<&str> = events
        .iter()
        .filter(|e| matches!(e, ListEvent::Directory(_)))
        .filter_map(ListEvent::path)
        .collect();
    let files = events
        .iter()
        .filter(|e| matches!(e, ListEvent::File(_)))
        .count();

    assert_eq!(directories, BTreeSet::from(["dir/", "dir/sub/"]));
    assert_eq!(files, 6);
    assert_eq!(events.last(), Some(&ListEvent::End));
}

#[tokio::test]
async fn test_list_filter_excludes_subtree() {
    let fixture = FixtureDir::sample();
    let options = ListOptions::new()
        .normalize(false)
        .filter(|dir| !dir.ends_with("sub/"));
    let paths = list_paths(fixture.sample_root(), options).finish().await.unwrap();

    assert_eq!(paths.len(), 5);
    assert!(paths.iter().all(|p| !p.starts_with("dir/sub")));
}

// ============================================================================
// CLI: read
// ============================================================================

#[test]
fn test_cli_read_prints_byte_tree() {
    let fixture = FixtureDir::sample();
    let (stdout, stderr, success) =
        run_read_dir_files(fixture.path(), &["read", &root_arg(&fixture)]);
    assert!(success, "read should succeed: {}", stderr);

    let json: Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["a"].as_array().unwrap().len(), 12);
    assert_eq!(json["a"][0], 72);
    assert_eq!(json["c"], serde_json::json!([]));
    assert_eq!(json["sub"]["a"].as_array().unwrap().len(), 16);
}

#[test]
fn test_cli_read_with_encoding() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) =
        run_read_dir_files(fixture.path(), &["read", "dir", "-e", "utf8"]);
    assert!(success);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["a"], "Hello world\n");
    assert_eq!(json["d"], "");
    assert_eq!(json["sub"]["a"], "Hello nodejitsu\n");
}

#[test]
fn test_cli_read_sync_matches_async() {
    let fixture = FixtureDir::sample();
    let (async_out, _, ok_async) = run_read_dir_files(fixture.path(), &["read", "dir", "-e", "hex"]);
    let (sync_out, _, ok_sync) =
        run_read_dir_files(fixture.path(), &["read", "dir", "-e", "hex", "--sync"]);
    assert!(ok_async && ok_sync);

    let async_json: Value = serde_json::from_str(&async_out).unwrap();
    let sync_json: Value = serde_json::from_str(&sync_out).unwrap();
    assert_eq!(async_json, sync_json);
    assert_eq!(sync_json["b"], "48656c6c6f206e63700a");
}

#[test]
fn test_cli_read_no_recursive() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) =
        run_read_dir_files(fixture.path(), &["read", "dir", "--no-recursive", "-j", "1"]);
    assert!(success);

    let json: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 4);
    assert!(json.get("sub").is_none());
}

#[test]
fn test_cli_read_unknown_encoding() {
    let fixture = FixtureDir::sample();
    let (_stdout, stderr, success) =
        run_read_dir_files(fixture.path(), &["read", "dir", "-e", "klingon"]);
    assert!(!success);
    assert!(stderr.contains("unknown encoding"), "stderr: {}", stderr);
}

#[test]
fn test_cli_read_missing_dir() {
    let fixture = FixtureDir::new();
    let (stdout, stderr, success) = run_read_dir_files(fixture.path(), &["read", "missing"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("failed to list entries of"), "stderr: {}", stderr);
}

// ============================================================================
// CLI: list
// ============================================================================

#[test]
fn test_cli_list_relative() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) = run_read_dir_files(
        fixture.path(),
        &["list", &root_arg(&fixture), "--relative", "--color", "never"],
    );
    assert!(success);

    let lines = listed_lines(&stdout);
    assert_eq!(lines[0], "dir/");
    let listed: BTreeSet<String> = lines.iter().map(|l| l.to_string()).collect();
    assert_eq!(listed, sample_set());
    assert!(stdout.contains("2 directories, 6 files"));
}

#[test]
fn test_cli_list_full_paths() {
    let fixture = FixtureDir::sample();
    let root = root_arg(&fixture);
    let (stdout, _stderr, success) =
        run_read_dir_files(fixture.path(), &["list", &root, "--color", "never"]);
    assert!(success);

    let lines = listed_lines(&stdout);
    assert_eq!(lines.len(), 8);
    assert!(lines.iter().all(|l| l.starts_with(root.as_str())));
}

#[test]
fn test_cli_list_events() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) = run_read_dir_files(
        fixture.path(),
        &["list", &root_arg(&fixture), "--relative", "--events", "--color", "never"],
    );
    assert!(success);

    let lines = listed_lines(&stdout);
    let directories = lines.iter().filter(|l| l.starts_with("directory ")).count();
    let files = lines.iter().filter(|l| l.starts_with("file ")).count();
    assert_eq!(directories, 2);
    assert_eq!(files, 6);
    assert_eq!(lines.last(), Some(&"end"));
}

#[test]
fn test_cli_list_json() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) = run_read_dir_files(
        fixture.path(),
        &["list", &root_arg(&fixture), "--relative", "--json"],
    );
    assert!(success);

    let paths: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(paths.into_iter().collect::<BTreeSet<_>>(), sample_set());
}

#[test]
fn test_cli_list_ignore_pattern() {
    let fixture = FixtureDir::sample();
    let (stdout, _stderr, success) = run_read_dir_files(
        fixture.path(),
        &["list", &root_arg(&fixture), "--relative", "-I", "su*", "--color", "never"],
    );
    assert!(success);

    let lines = listed_lines(&stdout);
    assert_eq!(lines.len(), 5);
    assert!(!stdout.contains("sub"));
}

#[test]
fn test_cli_list_base_dir() {
    let fixture = FixtureDir::sample();
    let root = root_arg(&fixture);
    let (stdout, _stderr, success) = run_read_dir_files(
        fixture.path(),
        &["list", &root, "--relative", "--base-dir", &root, "--json"],
    );
    assert!(success);

    let paths: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert!(paths.contains(&"sub/a".to_string()));
    assert!(paths.contains(&"a".to_string()));
}

#[test]
fn test_cli_debug_logging_goes_to_stderr() {
    let fixture = FixtureDir::sample();
    let (stdout, stderr, success) = run_read_dir_files(
        fixture.path(),
        &["--log-level", "debug", "list", "dir", "--json"],
    );
    assert!(success);
    assert!(serde_json::from_str::<Vec<String>>(&stdout).is_ok());
    assert!(stderr.contains("Listing paths under"), "stderr: {}", stderr);
}

// ============================================================================
// CLI: exit status and usage
// ============================================================================

mod cli_status {
    use assert_cmd::Command;
    use predicates::prelude::*;

    use super::FixtureDir;

    fn cmd() -> Command {
        Command::cargo_bin("read-dir-files").expect("binary built")
    }

    #[test]
    fn test_requires_subcommand() {
        cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn test_list_missing_dir_reports_path() {
        let fixture = FixtureDir::new();
        cmd()
            .current_dir(fixture.path())
            .args(["list", "nope"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("read-dir-files:").and(predicate::str::contains("nope")));
    }

    #[test]
    fn test_list_no_recursive_keeps_subdirectory() {
        let fixture = FixtureDir::sample();
        cmd()
            .current_dir(fixture.path())
            .args(["list", "dir", "--no-recursive", "--color", "never"])
            .assert()
            .success()
            .stdout(predicate::str::contains("dir/sub/\n"))
            .stdout(predicate::str::contains("dir/sub/a").not())
            .stdout(predicate::str::contains("2 directories, 4 files"));
    }

    #[test]
    fn test_silent_log_level_keeps_stderr_clean() {
        let fixture = FixtureDir::sample();
        cmd()
            .current_dir(fixture.path())
            .env_remove("RUST_LOG")
            .args(["--log-level", "silent", "read", "dir"])
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}
