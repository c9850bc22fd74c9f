//! Revision model
//!
//! - `rev_id`: parsing and collation of `<generation>-<digest>` revision IDs
//! - `document`: `DocumentRevision`, one version of a document
//! - `attachments`: all-or-nothing rewriting of `_attachments` metadata
//!
//! The free functions `parse`, `generation_of` and `compare` work on plain
//! strings, so the revision tree can order branches without building
//! `DocumentRevision` values.

pub mod attachments;
pub mod document;
pub mod rev_id;

pub use attachments::AttachmentMutation;
pub use document::{DocumentRevision, ATTACHMENTS_KEY, DELETED_KEY, ID_KEY, REV_KEY};
pub use rev_id::{compare, generation_of, parse, ParsedRevId, RevId, RevIdError, MAX_GENERATION};
