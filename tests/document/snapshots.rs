//! MessagePack snapshots of encoded documents

use tagtype_document::{DocumentCodec, TimestampPolicy, snapshot};
use tagtype_foundation::ErrorKind;

use crate::geometry;

#[test]
fn snapshot_then_decode() {
    let registry = geometry();
    let handle = registry.get("Path").unwrap();
    let path = handle
        .from_json(&serde_json::json!({
            "name": "square",
            "closed": true,
            "segments": [
                { "@@tagName": "Line", "id": "top", "from": { "x": 0, "y": 0 }, "to": { "x": 1, "y": 0 } },
                { "@@tagName": "Line", "id": "right", "from": { "x": 1, "y": 0 }, "to": { "x": 1, "y": 1 } }
            ]
        }))
        .unwrap();

    let encoded = handle.encode(&path, TimestampPolicy::Seconds).unwrap();
    let temp_path = std::env::temp_dir().join("tagtype_integration_snapshot.msgpack");
    snapshot::save_to_file(&encoded, &temp_path).expect("save failed");
    let loaded = snapshot::load_from_file(&temp_path).expect("load failed");
    let _ = std::fs::remove_file(&temp_path);

    assert_eq!(loaded, encoded);
    assert_eq!(handle.decode(&loaded, TimestampPolicy::Seconds).unwrap(), path);
}

#[test]
fn truncated_snapshot_fails() {
    let registry = geometry();
    let handle = registry.get("Path").unwrap();
    let path = handle
        .from_json(&serde_json::json!({ "name": "p", "closed": false, "segments": [] }))
        .unwrap();
    let bytes = snapshot::to_bytes(&handle.encode(&path, TimestampPolicy::Seconds).unwrap()).unwrap();
    let err = snapshot::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}
