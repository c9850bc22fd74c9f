//! Metadata Overlay Invariants
//!
//! **Invariant**: `_id`, `_rev` and `_deleted` always reflect the revision's
//! own fields, on every read path, regardless of what the body stores.

use crate::common::*;

#[test]
fn test_properties_report_revision_ids_over_body_values() {
    let rev = rev_with_body(
        "doc1",
        "3-ccc",
        serde_json::json!({"_id": "impostor", "_rev": "1-old", "n": 1}),
    );

    let properties = rev.properties().unwrap();
    assert_eq!(properties["_id"], Value::from("doc1"));
    assert_eq!(properties["_rev"], Value::from("3-ccc"));
    assert_eq!(properties["n"], Value::Int(1));
}

#[test]
fn test_property_and_properties_agree_on_metadata() {
    let mut rev = rev_with_body(
        "doc1",
        "2-b",
        serde_json::json!({"_id": "x", "_rev": "9-z", "_deleted": true}),
    );

    for deleted in [false, true] {
        rev.set_deleted(deleted);
        let properties = rev.properties().unwrap();
        for key in ["_id", "_rev", "_deleted"] {
            assert_eq!(
                rev.property(key).as_ref(),
                properties.get(key),
                "key {} deleted {}",
                key,
                deleted
            );
        }
    }
}

#[test]
fn test_canonical_body_and_properties_agree() {
    let mut rev = rev_with_body("doc1", "4-d", serde_json::json!({"_rev": "1-a", "k": [1, 2]}));
    rev.set_deleted(true);

    let canonical = rev.canonical_body().unwrap().unwrap();
    assert_eq!(
        Properties::clone(canonical.properties().unwrap()),
        rev.properties().unwrap()
    );
}

#[test]
fn test_set_properties_does_not_write_metadata() {
    let rev = rev_with_body("doc1", "1-a", serde_json::json!({"k": 1}));
    let raw = rev.body().unwrap().properties().unwrap();
    assert!(!raw.contains_key("_id"));
    assert!(!raw.contains_key("_rev"));

    let canonical = rev.canonical_body().unwrap().unwrap();
    assert!(canonical.properties().unwrap().contains_key("_id"));
}

#[test]
fn test_missing_placeholder_has_no_properties() {
    let mut rev = DocumentRevision::new("doc1", "5-e", false);
    rev.set_missing(true);
    assert!(rev.properties().is_none());
    assert!(rev.canonical_body().unwrap().is_none());
    assert!(rev.attachments().is_none());
    assert_eq!(rev.property("_rev"), Some(Value::from("5-e")));
}

#[test]
fn test_copy_with_new_ids_rewrites_raw_body() {
    let rev = rev_with_body("doc1", "1-a", serde_json::json!({"x": 1}));
    let copy = rev.copy_with_new_ids("doc1", "2-xyz").unwrap();

    let raw = copy.body().unwrap().properties().unwrap();
    assert_eq!(
        Properties::clone(raw),
        props(serde_json::json!({"_id": "doc1", "_rev": "2-xyz", "x": 1}))
    );
    // Source is untouched
    assert_eq!(rev.rev_id(), Some("1-a"));
    assert_eq!(rev.properties().unwrap()["_rev"], Value::from("1-a"));
}

#[test]
fn test_copy_with_new_ids_refuses_rename() {
    let rev = rev_with_body("docA", "1-a", serde_json::json!({}));
    let err = rev.copy_with_new_ids("docB", "2-b").unwrap_err();
    assert!(matches!(err, Error::ContractViolation(_)));
}

#[test]
fn test_copy_with_new_ids_requires_doc_id() {
    let rev = DocumentRevision::with_ids(None, None, false);
    assert!(rev.copy_with_new_ids("", "1-a").unwrap_err().is_contract_violation());
}

#[test]
fn test_revision_from_stored_json() {
    let body = Body::from_json(br#"{"_id":"d","_rev":"2-b","_deleted":true}"#.to_vec());
    assert!(body.is_valid_revision_body());

    let rev = DocumentRevision::from_body(body).unwrap();
    assert!(rev.matches("d", "2-b"));
    assert!(rev.is_deleted());
    assert_eq!(rev.generation(), Some(2));
}
