//! Document revisions
//!
//! A `DocumentRevision` is one version of one document: its doc ID, its
//! revision ID, a deletion flag, and optionally its body.
//!
//! ## Metadata overlay
//!
//! The doc ID, revision ID and deletion flag live outside the body. Every
//! view of the properties (`properties()`, `property()`, `canonical_body()`)
//! overlays them onto the body as `_id`, `_rev` and `_deleted`, so stale
//! metadata stored inside the body mapping never wins.
//!
//! ## Identity
//!
//! Two revisions are equal iff both have a doc ID and a revision ID and those
//! are equal. Sequence, deletion flag, missing flag and body are ignored.

use crate::body::Body;
use crate::error::{Error, Result};
use crate::revision::rev_id::generation_of;
use crate::traits::RevisionInfo;
use crate::value::{Properties, Value};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Property key holding the document ID
pub const ID_KEY: &str = "_id";
/// Property key holding the revision ID
pub const REV_KEY: &str = "_rev";
/// Property key holding the deletion flag
pub const DELETED_KEY: &str = "_deleted";
/// Property key holding the attachment metadata mapping
pub const ATTACHMENTS_KEY: &str = "_attachments";

/// One version of a document
#[derive(Debug, Clone, Default)]
pub struct DocumentRevision {
    doc_id: Option<String>,
    rev_id: Option<String>,
    deleted: bool,
    sequence: u64,
    missing: bool,
    /// Shared with copies until one of them writes
    body: Option<Arc<Body>>,
}

impl DocumentRevision {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a revision with both IDs assigned and no body
    pub fn new(doc_id: impl Into<String>, rev_id: impl Into<String>, deleted: bool) -> Self {
        Self::with_ids(Some(doc_id.into()), Some(rev_id.into()), deleted)
    }

    /// Create a revision whose IDs may still be unassigned
    pub fn with_ids(doc_id: Option<String>, rev_id: Option<String>, deleted: bool) -> Self {
        DocumentRevision {
            doc_id,
            rev_id,
            deleted,
            ..Default::default()
        }
    }

    /// Create a revision from a body, reading `_id`, `_rev` and `_deleted` from it
    ///
    /// # Errors
    ///
    /// Returns an error if the body holds no data or cannot be decoded.
    pub fn from_body(body: Body) -> Result<Self> {
        let properties = body.properties()?;
        let doc_id = properties.get(ID_KEY).and_then(Value::as_str).map(str::to_string);
        let rev_id = properties.get(REV_KEY).and_then(Value::as_str).map(str::to_string);
        let deleted = properties
            .get(DELETED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut rev = Self::with_ids(doc_id, rev_id, deleted);
        rev.body = Some(Arc::new(body));
        Ok(rev)
    }

    /// Create a revision from a decoded mapping
    pub fn from_properties(properties: Properties) -> Self {
        let doc_id = properties.get(ID_KEY).and_then(Value::as_str).map(str::to_string);
        let rev_id = properties.get(REV_KEY).and_then(Value::as_str).map(str::to_string);
        let deleted = properties
            .get(DELETED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut rev = Self::with_ids(doc_id, rev_id, deleted);
        rev.set_properties(properties);
        rev
    }

    /// Copy another revision representation
    ///
    /// The body becomes the other revision's effective properties. Sequence
    /// and missing flag are storage state and are not carried over.
    pub fn from_info(other: &dyn RevisionInfo) -> Self {
        Self::from_info_with_ids(
            other,
            other.doc_id().map(str::to_string),
            other.rev_id().map(str::to_string),
        )
    }

    /// Copy another revision representation under different IDs
    ///
    /// Unlike `copy_with_new_ids`, the copied body is not rewritten; `_id` and
    /// `_rev` inside it keep the source's values until the overlay is applied.
    pub fn from_info_with_ids(
        other: &dyn RevisionInfo,
        doc_id: Option<String>,
        rev_id: Option<String>,
    ) -> Self {
        let mut rev = Self::with_ids(doc_id, rev_id, other.is_deleted());
        rev.body = other
            .properties()
            .map(|properties| Arc::new(Body::from_properties(properties)));
        rev
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Document ID, if assigned
    #[inline]
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Revision ID, if assigned
    #[inline]
    pub fn rev_id(&self) -> Option<&str> {
        self.rev_id.as_deref()
    }

    /// Whether this revision is a deletion tombstone
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Storage-assigned sequence number
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Whether this is a placeholder whose body has not been fetched
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.missing
    }

    /// Generation of the revision ID, `None` if unassigned or malformed
    pub fn generation(&self) -> Option<u32> {
        self.rev_id().and_then(generation_of)
    }

    /// Raw body without the metadata overlay
    pub fn body(&self) -> Option<&Body> {
        self.body.as_deref()
    }

    /// Whether a body is attached
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Whether this revision has the given doc and revision IDs
    pub fn matches(&self, doc_id: &str, rev_id: &str) -> bool {
        self.doc_id() == Some(doc_id) && self.rev_id() == Some(rev_id)
    }

    // =========================================================================
    // Storage-layer setters
    // =========================================================================

    /// Set the sequence number assigned by storage
    pub fn set_sequence(&mut self, sequence: u64) {
        self.sequence = sequence;
    }

    /// Mark or unmark this revision as a missing placeholder
    pub fn set_missing(&mut self, missing: bool) {
        self.missing = missing;
    }

    /// Set the deletion flag
    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Metadata always wins: each key is present iff the revision has the value.
    fn apply_overlay(&self, properties: &mut Properties) {
        match &self.doc_id {
            Some(doc_id) => properties.insert(ID_KEY.to_string(), Value::from(doc_id.as_str())),
            None => properties.remove(ID_KEY),
        };
        match &self.rev_id {
            Some(rev_id) => properties.insert(REV_KEY.to_string(), Value::from(rev_id.as_str())),
            None => properties.remove(REV_KEY),
        };
        if self.deleted {
            properties.insert(DELETED_KEY.to_string(), Value::Bool(true));
        } else {
            properties.remove(DELETED_KEY);
        }
    }

    /// Effective properties: the body with `_id`, `_rev` and `_deleted` applied
    ///
    /// Returns `Ok(None)` when there is no body or the body holds no data.
    ///
    /// # Errors
    ///
    /// Returns an error if the body's JSON cannot be decoded.
    pub fn try_properties(&self) -> Result<Option<Properties>> {
        let Some(body) = &self.body else {
            return Ok(None);
        };
        let mut properties = match body.to_properties() {
            Ok(properties) => properties,
            Err(Error::InvalidBody) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.apply_overlay(&mut properties);
        Ok(Some(properties))
    }

    /// Effective properties, `None` if there is no usable body
    ///
    /// Decode failures are logged and reported as `None`.
    pub fn properties(&self) -> Option<Properties> {
        match self.try_properties() {
            Ok(properties) => properties,
            Err(e) => {
                warn!(doc_id = ?self.doc_id, rev_id = ?self.rev_id, error = %e, "revision body failed to decode");
                None
            }
        }
    }

    /// Single effective property
    ///
    /// `_id`, `_rev` and `_deleted` come from the revision itself, never
    /// from the body.
    pub fn property(&self, key: &str) -> Option<Value> {
        match key {
            ID_KEY => self.doc_id().map(Value::from),
            REV_KEY => self.rev_id().map(Value::from),
            DELETED_KEY => self.deleted.then_some(Value::Bool(true)),
            _ => match self.body.as_deref()?.property(key) {
                Ok(value) => value.cloned(),
                Err(Error::InvalidBody) => None,
                Err(e) => {
                    warn!(doc_id = ?self.doc_id, rev_id = ?self.rev_id, key, error = %e, "revision body failed to decode");
                    None
                }
            },
        }
    }

    /// Replace the body with a mapping
    ///
    /// The mapping is stored as given; the overlay is applied on read.
    pub fn set_properties(&mut self, properties: Properties) {
        self.body = Some(Arc::new(Body::from_properties(properties)));
    }

    /// Replace the body
    pub fn set_body(&mut self, body: Body) {
        self.body = Some(Arc::new(body));
    }

    /// Replace the body with encoded JSON
    pub fn set_json(&mut self, json: impl Into<Vec<u8>>) {
        self.body = Some(Arc::new(Body::from_json(json)));
    }

    /// Encoded form of the raw body, `None` without a body
    pub fn json(&self) -> Result<Option<&[u8]>> {
        match self.body.as_deref() {
            Some(body) => body.encoded(),
            None => Ok(None),
        }
    }

    /// Set one property of the raw body
    ///
    /// A body shared with other revisions is cloned first.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBody` if there is no body with data.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let body = self.body.as_mut().ok_or(Error::InvalidBody)?;
        Arc::make_mut(body).set_property(key, value)
    }

    /// Body with the metadata overlay written into it
    ///
    /// This is the form persisted or sent as a standalone document. `None`
    /// when there is no usable body.
    pub fn canonical_body(&self) -> Result<Option<Body>> {
        Ok(self.try_properties()?.map(Body::from_properties))
    }

    /// The `_attachments` mapping of the effective properties
    pub fn attachments(&self) -> Option<Arc<Properties>> {
        self.properties()?
            .get(ATTACHMENTS_KEY)
            .and_then(Value::as_object_arc)
            .cloned()
    }

    // =========================================================================
    // Copies
    // =========================================================================

    /// Lightweight handle without the body
    ///
    /// Borrows `self` when there is no body to drop.
    pub fn copy_without_body(&self) -> Cow<'_, DocumentRevision> {
        if self.body.is_none() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(DocumentRevision {
            doc_id: self.doc_id.clone(),
            rev_id: self.rev_id.clone(),
            deleted: self.deleted,
            sequence: self.sequence,
            missing: self.missing,
            body: None,
        })
    }

    /// Copy this revision under a new revision ID
    ///
    /// The new body is the effective properties of this revision with `_id`
    /// and `_rev` rewritten, so the raw body carries the new IDs too.
    ///
    /// # Errors
    ///
    /// - `Error::ContractViolation` if `doc_id` is empty, or this revision
    ///   already belongs to a different document
    /// - body decode errors from `try_properties`
    pub fn copy_with_new_ids(&self, doc_id: &str, rev_id: &str) -> Result<DocumentRevision> {
        if doc_id.is_empty() {
            return Err(Error::contract("copy_with_new_ids requires a doc ID"));
        }
        if let Some(existing) = self.doc_id() {
            if existing != doc_id {
                return Err(Error::contract(format!(
                    "cannot move revision of '{}' to document '{}'",
                    existing, doc_id
                )));
            }
        }

        let mut properties = self.try_properties()?.unwrap_or_default();
        properties.insert(ID_KEY.to_string(), Value::from(doc_id));
        properties.insert(REV_KEY.to_string(), Value::from(rev_id));

        let mut rev = DocumentRevision::new(doc_id, rev_id, self.deleted);
        rev.set_properties(properties);
        debug!(doc_id, from = ?self.rev_id, to = rev_id, "copied revision with new IDs");
        Ok(rev)
    }
}

impl PartialEq for DocumentRevision {
    fn eq(&self, other: &Self) -> bool {
        match (&self.doc_id, &self.rev_id, &other.doc_id, &other.rev_id) {
            (Some(a_doc), Some(a_rev), Some(b_doc), Some(b_rev)) => a_doc == b_doc && a_rev == b_rev,
            _ => false,
        }
    }
}

impl Hash for DocumentRevision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc_id.hash(state);
        self.rev_id.hash(state);
    }
}

impl fmt::Display for DocumentRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} #{}{}}}",
            self.doc_id().unwrap_or_default(),
            self.rev_id().unwrap_or_default(),
            if self.deleted { "DEL" } else { "" }
        )
    }
}

impl RevisionInfo for DocumentRevision {
    fn doc_id(&self) -> Option<&str> {
        DocumentRevision::doc_id(self)
    }

    fn rev_id(&self) -> Option<&str> {
        DocumentRevision::rev_id(self)
    }

    fn is_deleted(&self) -> bool {
        DocumentRevision::is_deleted(self)
    }

    fn sequence(&self) -> u64 {
        DocumentRevision::sequence(self)
    }

    fn is_missing(&self) -> bool {
        DocumentRevision::is_missing(self)
    }

    fn properties(&self) -> Option<Properties> {
        DocumentRevision::properties(self)
    }
}
