//! revdb - Revision model for a multi-version JSON document store
//!
//! revdb models single versions of JSON documents the way CouchDB-family
//! stores do: opaque `<generation>-<digest>` revision IDs with a
//! deterministic collation, property bodies with lazy JSON encoding, and
//! an all-or-nothing protocol for rewriting attachment metadata.
//!
//! # Quick Start
//!
//! ```
//! use revdb::{compare, DocumentRevision, Value};
//! use std::cmp::Ordering;
//!
//! let mut rev = DocumentRevision::new("doc1", "1-abc", false);
//! rev.set_json(br#"{"title":"hello"}"#.to_vec());
//! assert_eq!(rev.property("title"), Some(Value::from("hello")));
//!
//! // Generations compare numerically
//! assert_eq!(compare("2-abc", "10-abc"), Ordering::Less);
//! ```
//!
//! # Architecture
//!
//! Everything lives in `revdb-core`; this crate re-exports its public API.
//! Storage, replication and the revision tree are separate layers that
//! consume it.

pub use revdb_core::*;
