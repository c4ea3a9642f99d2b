// Checkpoint persistence: round-trip fidelity, the typed failure modes and
// the process-lifetime parameter cache.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_cnn::checkpoint::{load, save, ModelCache};
use ferrite_cnn::network::ParameterSet;
use ferrite_cnn::CnnError;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ferrite_cnn_{}_{}", std::process::id(), name))
}

fn seeded_params(seed: u64) -> ParameterSet {
    let mut rng = StdRng::seed_from_u64(seed);
    ParameterSet::init(&mut rng)
}

#[test]
fn round_trip_preserves_every_tensor() {
    let path = temp_path("roundtrip.json");
    let params = seeded_params(17);

    save(&path, &params).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded.w1.shape(), params.w1.shape());
    assert_eq!(loaded.w1.data, params.w1.data);
    assert_eq!(loaded.w2.data, params.w2.data);
    assert_eq!(loaded.w3.data, params.w3.data);
    assert_eq!(loaded.w4.data, params.w4.data);
    assert_eq!(loaded.w5.data, params.w5.data);
    assert_eq!(loaded.b1, params.b1);
    assert_eq!(loaded.b2, params.b2);
    assert_eq!(loaded.b3, params.b3);
    assert_eq!(loaded.b4, params.b4);
    assert_eq!(loaded.b5, params.b5);

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_checkpoint_not_found() {
    let path = temp_path("does_not_exist.json");
    match load(&path) {
        Err(CnnError::CheckpointNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected CheckpointNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn missing_tensor_is_checkpoint_corrupt() {
    let path = temp_path("missing_tensor.json");
    save(&path, &seeded_params(1)).unwrap();

    // Strip one of the ten names out of the document.
    let text = std::fs::read_to_string(&path).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    doc.as_object_mut().unwrap().remove("b5");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    assert!(matches!(load(&path), Err(CnnError::CheckpointCorrupt(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn wrong_shape_is_checkpoint_corrupt() {
    let path = temp_path("wrong_shape.json");
    save(&path, &seeded_params(2)).unwrap();

    // Rewrite W1's recorded shape to the wrong rank.
    let text = std::fs::read_to_string(&path).unwrap();
    let mut doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    doc["W1"]["shape"] = serde_json::json!([3, 3, 48]);
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    assert!(matches!(load(&path), Err(CnnError::CheckpointCorrupt(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn unparsable_file_is_checkpoint_corrupt() {
    let path = temp_path("garbage.json");
    std::fs::write(&path, b"not json at all").unwrap();
    assert!(matches!(load(&path), Err(CnnError::CheckpointCorrupt(_))));
    std::fs::remove_file(&path).ok();
}

#[test]
fn cache_serves_the_same_instance_until_invalidated() {
    let path = temp_path("cache.json");
    save(&path, &seeded_params(3)).unwrap();

    let cache = ModelCache::new();
    let first = cache.load(&path).unwrap();
    let second = cache.load(&path).unwrap();
    // Cache hit: the same in-memory parameters are shared, not re-read.
    assert!(Arc::ptr_eq(&first, &second));

    cache.invalidate();
    let third = cache.load(&path).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));

    std::fs::remove_file(&path).ok();
}

#[test]
fn reload_picks_up_an_overwritten_checkpoint() {
    let path = temp_path("reload.json");
    save(&path, &seeded_params(4)).unwrap();

    let cache = ModelCache::new();
    let stale = cache.load(&path).unwrap();

    let replacement = seeded_params(5);
    save(&path, &replacement).unwrap();
    let fresh = cache.reload(&path).unwrap();

    assert!(!Arc::ptr_eq(&stale, &fresh));
    assert_eq!(fresh.w1.data, replacement.w1.data);

    std::fs::remove_file(&path).ok();
}
