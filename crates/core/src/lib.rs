//! Core revision model for the revdb document store
//!
//! This crate defines the in-memory model every higher layer builds on:
//! - Value / Properties: Tagged property tree of a document body
//! - Body: Property body with lazy JSON decoding and encoding
//! - RevId: Parsing and collation of `<generation>-<digest>` revision IDs
//! - DocumentRevision: One version of a document, with the `_id`/`_rev`/`_deleted` overlay
//! - AttachmentMutation: All-or-nothing rewriting of `_attachments` metadata
//! - BodyLimits: Configurable size limits for bodies
//! - RevisionInfo: Read-only revision contract shared with storage and replication
//! - Error: Error type hierarchy
//!
//! Nothing here performs I/O except loading `BodyLimits` from a file, and
//! nothing locks. Callers serialize writes to a single `DocumentRevision`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod body;
pub mod error;
pub mod limits;
pub mod revision;
pub mod traits;
pub mod value;

pub use body::Body;
pub use error::{Error, Result};
pub use limits::{BodyLimits, LimitError, MAX_ARRAY_LEN, MAX_DOCUMENT_BYTES, MAX_NESTING_DEPTH};
pub use revision::{
    compare, generation_of, parse, AttachmentMutation, DocumentRevision, ParsedRevId, RevId,
    RevIdError, ATTACHMENTS_KEY, DELETED_KEY, ID_KEY, MAX_GENERATION, REV_KEY,
};
pub use traits::RevisionInfo;
pub use value::{Properties, Value};
