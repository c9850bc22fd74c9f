//! Body Lifecycle
//!
//! **Invariant**: A body born from bytes decodes lazily, a body born from a
//! mapping encodes lazily, and a body with neither reports `InvalidBody`
//! instead of pretending to be empty.

use crate::common::*;
use tempfile::TempDir;

#[test]
fn test_invalid_body_is_distinct_from_empty_object() {
    assert!(matches!(Body::default().properties(), Err(Error::InvalidBody)));
    assert!(Body::from_json(b"{}".to_vec()).properties().unwrap().is_empty());
}

#[test]
fn test_absent_body_encodes_to_nothing() {
    assert!(Body::default().encoded().unwrap().is_none());
}

#[test]
fn test_body_from_bytes_and_back() {
    let body = Body::from_json(br#"{"b":[true,null],"a":"x"}"#.to_vec());
    assert_eq!(body.property("a").unwrap(), Some(&Value::from("x")));

    let mut edited = body.clone();
    edited.set_property("c", Value::Float(1.5)).unwrap();
    assert_eq!(
        edited.encoded().unwrap().unwrap(),
        br#"{"a":"x","b":[true,null],"c":1.5}"#
    );
    // The original keeps its bytes
    assert_eq!(
        body.encoded().unwrap().unwrap(),
        br#"{"b":[true,null],"a":"x"}"#
    );
}

#[test]
fn test_bytes_survive_encode_and_decode() {
    let mut rev = DocumentRevision::new("d", "1-a", false);
    let mut properties = Properties::new();
    properties.insert("blob".to_string(), Value::Bytes(b"hi".to_vec()));
    rev.set_properties(properties);

    let canonical = rev.canonical_body().unwrap().unwrap();
    let json = canonical.encoded().unwrap().unwrap().to_vec();
    assert_eq!(json, br#"{"_id":"d","_rev":"1-a","blob":{"$bytes":"aGk="}}"#);

    let mut reread = DocumentRevision::new("d", "1-a", false);
    reread.set_json(json);
    assert_eq!(reread.property("blob"), Some(Value::Bytes(b"hi".to_vec())));
    assert_eq!(reread.property("blob"), rev.property("blob"));
}

#[test]
fn test_revision_body_lifecycle() {
    let mut rev = DocumentRevision::new("doc1", "1-a", false);
    assert!(!rev.has_body());

    rev.set_json(br#"{"n":1}"#.to_vec());
    assert_eq!(rev.property("n"), Some(Value::Int(1)));

    rev.set_body(Body::from_properties(props(serde_json::json!({"n": 2}))));
    assert_eq!(rev.property("n"), Some(Value::Int(2)));

    rev.set_property("n", Value::Int(3)).unwrap();
    assert_eq!(rev.property("n"), Some(Value::Int(3)));
}

#[test]
fn test_limits_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("limits.toml");
    std::fs::write(&path, "max_nesting_depth = 2\nmax_array_len = 3\n").unwrap();
    let limits = BodyLimits::from_file(&path).unwrap();

    let shallow = Body::from_properties(props(serde_json::json!({"a": [1, 2, 3]})));
    assert!(shallow.validate(&limits).is_ok());

    let deep = Body::from_properties(props(serde_json::json!({"a": {"b": {}}})));
    assert!(matches!(deep.validate(&limits), Err(Error::Limit(_))));

    let wide = Body::from_properties(props(serde_json::json!({"a": [1, 2, 3, 4]})));
    assert!(matches!(wide.validate(&limits), Err(Error::Limit(_))));
}

#[test]
fn test_default_limits_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("limits.toml");
    std::fs::write(&path, BodyLimits::default_toml()).unwrap();
    assert_eq!(BodyLimits::from_file(&path).unwrap(), BodyLimits::default());
}
