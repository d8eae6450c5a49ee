//! Artifact loading: happy path, fatal-startup scenarios, and structural
//! validation rejections.

use std::fs;
use std::path::Path;

use serde_json::Value;

use underwrite::artifacts::{GBDT_FILE, ISOTONIC_FILE, LOGISTIC_FILE, TRANSFORMER_FILE};
use underwrite::testing;
use underwrite::{
    ArtifactError, EligibilityScorer, ModelArtifactSet, ScoreConfig, ScorePipeline,
};

const ALL_FILES: [&str; 4] = [TRANSFORMER_FILE, LOGISTIC_FILE, ISOTONIC_FILE, GBDT_FILE];

fn fixture_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    testing::write_fixture_files(dir.path()).expect("write fixture artifacts");
    dir
}

#[test]
fn loads_a_complete_artifact_directory() {
    let dir = fixture_dir();
    let set = ModelArtifactSet::load(dir.path()).unwrap();

    assert_eq!(set.transformer().n_outputs(), 13);
    assert_eq!(set.linear().n_features(), 13);
    assert_eq!(set.forest().n_features(), 13);
    assert_eq!(set.forest().n_trees(), 2);
}

#[test]
fn loaded_set_scores_identically_to_in_memory_fixture() {
    let dir = fixture_dir();
    let loaded = ScorePipeline::from_artifact_dir(dir.path(), ScoreConfig::default()).unwrap();
    let in_memory = ScorePipeline::new(testing::fixture_artifacts(), ScoreConfig::default());

    let record = testing::sample_record();
    let a = loaded.score(&record).unwrap();
    let b = in_memory.score(&record).unwrap();
    assert_eq!(a.probability.to_bits(), b.probability.to_bits());
    assert_eq!(a.decision, b.decision);
}

#[test]
fn deleting_any_artifact_is_fatal() {
    for file in ALL_FILES {
        let dir = fixture_dir();
        fs::remove_file(dir.path().join(file)).unwrap();

        let err = ModelArtifactSet::load(dir.path()).unwrap_err();
        assert!(
            matches!(&err, ArtifactError::Missing { path } if path.ends_with(file)),
            "expected Missing for {file}, got: {err:?}"
        );
    }
}

#[test]
fn corrupting_any_artifact_is_fatal() {
    for file in ALL_FILES {
        let dir = fixture_dir();
        fs::write(dir.path().join(file), b"{ not json").unwrap();

        let err = ModelArtifactSet::load(dir.path()).unwrap_err();
        assert!(
            matches!(&err, ArtifactError::Parse { path, .. } if path.ends_with(file)),
            "expected Parse for {file}, got: {err:?}"
        );
    }
}

#[test]
fn unsupported_schema_version_is_fatal() {
    let dir = fixture_dir();
    mutate_json(dir.path(), LOGISTIC_FILE, |v| {
        v["version"] = Value::from(99);
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { reason, .. }
        if reason.contains("version 99")));
}

#[test]
fn non_monotonic_isotonic_knots_are_rejected() {
    let dir = fixture_dir();
    mutate_json(dir.path(), ISOTONIC_FILE, |v| {
        // Reverse the calibrated values so they decrease.
        v["values"] = serde_json::json!([0.98, 0.8, 0.5, 0.2, 0.02]);
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { reason, .. }
        if reason.contains("non-decreasing")));
}

#[test]
fn out_of_bounds_tree_child_is_rejected() {
    let dir = fixture_dir();
    mutate_json(dir.path(), GBDT_FILE, |v| {
        v["trees"][0]["children_left"][0] = Value::from(9_999_999u64);
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { reason, .. }
        if reason.contains("out-of-bounds")));
}

#[test]
fn mismatched_tree_array_lengths_are_rejected() {
    let dir = fixture_dir();
    mutate_json(dir.path(), GBDT_FILE, |v| {
        let values = v["trees"][0]["leaf_values"].as_array_mut().unwrap();
        values.pop();
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { reason, .. }
        if reason.contains("leaf_values")));
}

#[test]
fn cross_artifact_width_mismatch_is_rejected() {
    let dir = fixture_dir();
    mutate_json(dir.path(), LOGISTIC_FILE, |v| {
        let weights = v["weights"].as_array_mut().unwrap();
        weights.pop();
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { path, reason }
        if path.ends_with(LOGISTIC_FILE) && reason.contains("transformer produces")));
}

#[test]
fn non_positive_scale_in_transformer_is_rejected() {
    let dir = fixture_dir();
    mutate_json(dir.path(), TRANSFORMER_FILE, |v| {
        v["fields"][0]["encoder"]["scale"] = Value::from(0.0);
    });

    let err = ModelArtifactSet::load(dir.path()).unwrap_err();
    assert!(matches!(&err, ArtifactError::Invalid { reason, .. }
        if reason.contains("scale")));
}

fn mutate_json(dir: &Path, file: &str, mutate: impl FnOnce(&mut Value)) {
    let path = dir.join(file);
    let mut value: Value =
        serde_json::from_slice(&fs::read(&path).expect("read artifact")).expect("parse artifact");
    mutate(&mut value);
    fs::write(&path, serde_json::to_vec(&value).expect("serialize")).expect("write artifact");
}
