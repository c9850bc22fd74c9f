//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub use revdb::{
    compare, generation_of, parse, AttachmentMutation, Body, BodyLimits, DocumentRevision, Error,
    Properties, RevId, RevIdError, Value,
};

/// Build a property mapping from a JSON object literal.
pub fn props(json: serde_json::Value) -> Properties {
    match Value::from(json) {
        Value::Object(map) => Properties::clone(&map),
        other => panic!("fixture must be an object, got {}", other.type_name()),
    }
}

/// Revision with both IDs and a body built from a JSON object literal.
pub fn rev_with_body(doc_id: &str, rev_id: &str, json: serde_json::Value) -> DocumentRevision {
    let mut rev = DocumentRevision::new(doc_id, rev_id, false);
    rev.set_properties(props(json));
    rev
}

/// Hash a value with the std hasher.
pub fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
