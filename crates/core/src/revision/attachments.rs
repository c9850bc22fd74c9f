//! Attachment metadata rewriting
//!
//! Storage and replication rewrite the `_attachments` entries of a revision
//! before persisting or sending it, e.g. to turn a stub that references a
//! blob by digest into inline data. `mutate_attachments` runs a callback
//! over every entry and applies the rewrites all-or-nothing:
//!
//! 1. The callback sees each entry by shared reference and cannot change it.
//! 2. `AttachmentMutation::Abort` stops the walk; the revision is untouched.
//! 3. The first `Replace` clones the effective properties and the
//!    `_attachments` mapping. Entries that are kept stay shared with the
//!    original mapping, and whoever else holds the original body sees no
//!    change.
//! 4. If at least one entry was replaced, the clone becomes the new body.

use super::document::{DocumentRevision, ATTACHMENTS_KEY};
use crate::value::{Properties, Value};
use tracing::debug;

/// Callback verdict for one attachment entry
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentMutation {
    /// Leave the entry as it is
    Keep,
    /// Replace the entry's metadata
    Replace(Properties),
    /// Reject the whole rewrite
    Abort,
}

impl DocumentRevision {
    /// Rewrite attachment metadata
    ///
    /// Returns `true` if any entry was replaced and committed, `false` if the
    /// revision has no properties or no `_attachments`, nothing was replaced,
    /// or the callback aborted.
    ///
    /// Entries whose value is not an object are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use revdb_core::{AttachmentMutation, DocumentRevision, Value};
    ///
    /// let mut rev = DocumentRevision::new("doc1", "1-a", false);
    /// rev.set_json(br#"{"_attachments":{"a.txt":{"stub":true}}}"#.to_vec());
    ///
    /// let changed = rev.mutate_attachments(|_name, meta| {
    ///     let mut resolved = meta.clone();
    ///     resolved.remove("stub");
    ///     resolved.insert("data".to_string(), Value::from("aGk="));
    ///     AttachmentMutation::Replace(resolved)
    /// });
    /// assert!(changed);
    /// ```
    pub fn mutate_attachments<F>(&mut self, mut mutator: F) -> bool
    where
        F: FnMut(&str, &Properties) -> AttachmentMutation,
    {
        let Some(mut properties) = self.properties() else {
            return false;
        };
        let Some(attachments) = properties
            .get(ATTACHMENTS_KEY)
            .and_then(Value::as_object_arc)
            .cloned()
        else {
            return false;
        };

        let mut edited: Option<Properties> = None;
        for (name, entry) in attachments.iter() {
            let Some(metadata) = entry.as_object() else {
                debug!(doc_id = ?self.doc_id(), attachment = %name, kind = entry.type_name(), "skipping non-object attachment");
                continue;
            };
            match mutator(name, metadata) {
                AttachmentMutation::Keep => {}
                AttachmentMutation::Replace(replacement) => {
                    edited
                        .get_or_insert_with(|| Properties::clone(&attachments))
                        .insert(name.clone(), Value::object(replacement));
                }
                AttachmentMutation::Abort => {
                    debug!(doc_id = ?self.doc_id(), rev_id = ?self.rev_id(), attachment = %name, "attachment rewrite aborted");
                    return false;
                }
            }
        }

        let Some(edited) = edited else {
            return false;
        };
        properties.insert(ATTACHMENTS_KEY.to_string(), Value::object(edited));
        self.set_properties(properties);
        debug!(doc_id = ?self.doc_id(), rev_id = ?self.rev_id(), "attachment rewrite committed");
        true
    }
}
