//! Core traits for revision collaborators
//!
//! Storage, replication and the revision tree each keep their own revision
//! representations. `RevisionInfo` is the read-only view they all agree on,
//! so any of them can be turned into a `DocumentRevision` with
//! `DocumentRevision::from_info`.

use crate::revision::generation_of;
use crate::value::Properties;

/// Read-only view of one revision of a document
///
/// # Examples
///
/// ```
/// use revdb_core::{DocumentRevision, RevisionInfo};
///
/// fn depth(info: &dyn RevisionInfo) -> Option<u32> {
///     info.generation()
/// }
///
/// let rev = DocumentRevision::new("doc1", "2-abc", false);
/// assert_eq!(depth(&rev), Some(2));
/// ```
pub trait RevisionInfo {
    /// Document ID, if assigned
    fn doc_id(&self) -> Option<&str>;

    /// Revision ID, if assigned
    fn rev_id(&self) -> Option<&str>;

    /// Whether this revision is a deletion tombstone
    fn is_deleted(&self) -> bool;

    /// Storage-assigned sequence number (0 if never stored)
    fn sequence(&self) -> u64;

    /// Whether the body of this revision is known to be missing
    fn is_missing(&self) -> bool;

    /// Effective properties with `_id`, `_rev` and `_deleted` applied
    ///
    /// `None` when no body is available.
    fn properties(&self) -> Option<Properties>;

    /// Generation parsed from the revision ID
    fn generation(&self) -> Option<u32> {
        self.rev_id().and_then(generation_of)
    }
}
