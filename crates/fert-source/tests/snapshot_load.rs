use std::fs;

use fert_core::errors::FertError;
use fert_source::{fetch_all_tokens, PaginationOpts, Snapshot, SnapshotSource};
use tempfile::tempdir;

#[test]
fn loads_mock_shaped_snapshot() {
    let dir = tempdir().expect("dir");
    let path = dir.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{
  "bpf": 3013244,
  "tokens": [
    { "id": 6000000, "supply": 1, "humidity": 5, "endBpf": 6000000, "startBpf": 0, "season": 6074 },
    { "id": "5000000", "supply": "3", "humidity": "2.5", "endBpf": "5000000", "startBpf": "100", "season": 6001 }
  ]
}"#,
    )
    .expect("write");
    let snapshot = Snapshot::load(&path).expect("load");
    assert_eq!(snapshot.progress, 3_013_244);
    assert_eq!(snapshot.tokens.len(), 2);

    let source = SnapshotSource::new(snapshot);
    let outcome = fetch_all_tokens(&source, &PaginationOpts::default()).expect("fetch");
    let seasons: Vec<_> = outcome.tokens.iter().map(|t| t.season).collect();
    assert_eq!(seasons, vec![6001, 6074]);
}

#[test]
fn missing_snapshot_is_an_io_error() {
    let dir = tempdir().expect("dir");
    let err = Snapshot::load(&dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(err, FertError::Io(_)));
}

#[test]
fn malformed_snapshot_is_a_serde_error() {
    let err = Snapshot::from_json_slice(b"{\"tokens\": []}").expect_err("no progress");
    assert!(matches!(err, FertError::Serde(_)));
}
