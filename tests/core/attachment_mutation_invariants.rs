//! Attachment Mutation Invariants
//!
//! **Invariant**: Attachment rewrites are all-or-nothing. An abort leaves the
//! revision observably untouched; a commit changes only the replaced
//! entries and never affects other holders of the original body.

use crate::common::*;
use std::sync::Arc;

fn two_attachments() -> DocumentRevision {
    rev_with_body(
        "doc1",
        "2-b",
        serde_json::json!({
            "_attachments": {
                "a": {"content_type": "text/plain", "digest": "md5-aaa", "stub": true},
                "b": {"content_type": "image/png", "digest": "md5-bbb", "stub": true}
            }
        }),
    )
}

fn inline(meta: &Properties, data: &[u8]) -> AttachmentMutation {
    let mut out = meta.clone();
    out.remove("stub");
    out.insert("data".to_string(), Value::Bytes(data.to_vec()));
    AttachmentMutation::Replace(out)
}

#[test]
fn test_abort_after_rewrite_changes_nothing() {
    let mut rev = two_attachments();
    let before = rev.canonical_body().unwrap().unwrap();
    let before_json = before.encoded().unwrap().unwrap().to_vec();

    let changed = rev.mutate_attachments(|name, meta| match name {
        "a" => inline(meta, b"hello"),
        _ => AttachmentMutation::Abort,
    });

    assert!(!changed);
    let after = rev.canonical_body().unwrap().unwrap();
    assert_eq!(after.encoded().unwrap().unwrap(), before_json.as_slice());
}

#[test]
fn test_abort_stops_iteration() {
    let mut rev = two_attachments();
    let mut visited = Vec::new();
    rev.mutate_attachments(|name, _| {
        visited.push(name.to_string());
        AttachmentMutation::Abort
    });
    assert_eq!(visited, vec!["a"]);
}

#[test]
fn test_commit_rewrites_only_replaced_entry() {
    let mut rev = two_attachments();
    let original = rev.attachments().unwrap();

    let changed = rev.mutate_attachments(|name, meta| match name {
        "a" => inline(meta, b"hello"),
        _ => AttachmentMutation::Keep,
    });
    assert!(changed);

    let attachments = rev.attachments().unwrap();
    let a = attachments["a"].as_object().unwrap();
    assert_eq!(a.get("data"), Some(&Value::Bytes(b"hello".to_vec())));
    assert!(!a.contains_key("stub"));

    // Untouched entry is the very same mapping
    let b_before = original["b"].as_object_arc().unwrap();
    let b_after = attachments["b"].as_object_arc().unwrap();
    assert!(Arc::ptr_eq(b_before, b_after));
}

#[test]
fn test_commit_is_visible_in_encoded_body() {
    let mut rev = two_attachments();
    assert!(rev.mutate_attachments(|name, meta| match name {
        "b" => inline(meta, b"hi"),
        _ => AttachmentMutation::Keep,
    }));

    let json: serde_json::Value =
        serde_json::from_slice(rev.json().unwrap().unwrap()).unwrap();
    assert_eq!(json["_attachments"]["b"]["data"], serde_json::json!({"$bytes": "aGk="}));
    assert_eq!(json["_attachments"]["a"]["stub"], serde_json::json!(true));
    assert_eq!(json["_rev"], serde_json::json!("2-b"));
}

#[test]
fn test_copies_are_isolated_from_commit() {
    let mut rev = two_attachments();
    let lightweight = rev.copy_without_body().into_owned();
    let snapshot = rev.clone();

    assert!(rev.mutate_attachments(|_, meta| inline(meta, b"x")));

    let snap = snapshot.attachments().unwrap();
    assert_eq!(snap["a"].as_object().unwrap().get("stub"), Some(&Value::Bool(true)));
    assert!(lightweight.attachments().is_none());
}

#[test]
fn test_keep_everything_reports_unchanged() {
    let mut rev = two_attachments();
    assert!(!rev.mutate_attachments(|_, _| AttachmentMutation::Keep));
}

#[test]
fn test_revision_without_attachments_is_unchanged() {
    let mut rev = rev_with_body("doc1", "1-a", serde_json::json!({"title": "t"}));
    let mut called = false;
    assert!(!rev.mutate_attachments(|_, _| {
        called = true;
        AttachmentMutation::Keep
    }));
    assert!(!called);
}
