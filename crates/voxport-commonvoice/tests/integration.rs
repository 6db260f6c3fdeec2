//! Integration tests for voxport-commonvoice
//!
//! These tests require network access and a valid `HF_TOKEN`, and are marked
//! #[ignore] by default.
//! Run with: cargo test -p voxport-commonvoice --test integration -- --ignored

use std::sync::Arc;

use tempfile::TempDir;

use voxport_commonvoice::{Config, run};
use voxport_core::export::METADATA_FILENAME;
use voxport_core::{METADATA_HEADER, ProgressContext};

fn token_from_env() -> String {
    std::env::var("HF_TOKEN").expect("HF_TOKEN must be set for integration tests")
}

/// Verify a real credential against the hub
#[test]
#[ignore]
fn whoami_accepts_valid_token() {
    let account = voxport_commonvoice::hub::verify_token(&token_from_env())
        .expect("token should be accepted");
    assert!(!account.is_empty());
}

/// Export a small sample of a real split
#[test]
#[ignore]
fn export_small_sample() {
    let output = TempDir::new().expect("Failed to create temp dir");
    let cache = TempDir::new().expect("Failed to create temp dir");

    let config = Config {
        token: token_from_env(),
        output_dir: output.path().to_path_buf(),
        cache_dir: Some(cache.path().to_path_buf()),
        max_records: Some(25),
        ..Default::default()
    };

    let progress = Arc::new(ProgressContext::new());
    let summary = run(&config, &progress).expect("Pipeline should succeed");

    let stats = summary.stats;
    assert!(stats.considered <= 25);
    assert_eq!(stats.saved + stats.skipped(), stats.considered);

    let metadata = std::fs::read_to_string(output.path().join(METADATA_FILENAME))
        .expect("metadata index should exist");
    let mut lines = metadata.lines();
    assert_eq!(lines.next(), Some(METADATA_HEADER));
    assert_eq!(lines.count(), stats.saved);
}

/// Re-running against a warm page cache must be idempotent
#[test]
#[ignore]
fn cached_rerun_is_idempotent() {
    let cache = TempDir::new().expect("Failed to create temp dir");
    let first = TempDir::new().expect("Failed to create temp dir");
    let second = TempDir::new().expect("Failed to create temp dir");

    let config = |output: &TempDir| Config {
        token: token_from_env(),
        output_dir: output.path().to_path_buf(),
        cache_dir: Some(cache.path().to_path_buf()),
        max_records: Some(10),
        ..Default::default()
    };

    let progress = Arc::new(ProgressContext::new());
    run(&config(&first), &progress).expect("first run should succeed");
    run(&config(&second), &progress).expect("second run should succeed");

    let meta_a = std::fs::read(first.path().join(METADATA_FILENAME)).unwrap();
    let meta_b = std::fs::read(second.path().join(METADATA_FILENAME)).unwrap();
    assert_eq!(meta_a, meta_b, "metadata must be byte-identical across runs");
}
