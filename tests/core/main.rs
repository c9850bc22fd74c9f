//! Revision model integration tests
//!
//! Each module checks one family of invariants through the public API only.

#[path = "../common/mod.rs"]
mod common;

mod attachment_mutation_invariants;
mod body_lifecycle;
mod overlay_invariants;
