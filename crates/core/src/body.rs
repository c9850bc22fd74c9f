//! Property body of a document revision
//!
//! A `Body` holds the JSON-like content of one revision in either or both of
//! two forms:
//! - the decoded `Properties` mapping
//! - the encoded JSON bytes (wire form)
//!
//! Whichever form is missing is produced on first use and cached. A body
//! built from neither form has no data; asking it for properties fails with
//! `Error::InvalidBody` so callers can tell "no data" from "empty object".
//!
//! Bodies have no content equality. Identity of a revision is decided by
//! `DocumentRevision` through its doc and rev ids.

use crate::error::{Error, Result};
use crate::limits::BodyLimits;
use crate::value::{properties_from_json_map, properties_to_json_map, Properties, Value};
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// JSON-like property tree with lazy decoding and encoding
#[derive(Debug, Clone, Default)]
pub struct Body {
    /// Decoded mapping, filled on construction or first access
    object: OnceCell<Arc<Properties>>,
    /// Encoded JSON, filled on construction or first `encoded()` call
    json: OnceCell<Arc<[u8]>>,
}

impl Body {
    /// Create a body from an already-decoded mapping
    pub fn from_properties(properties: Properties) -> Self {
        Self::from_shared(Arc::new(properties))
    }

    /// Create a body that shares an existing mapping
    pub fn from_shared(properties: Arc<Properties>) -> Self {
        Body {
            object: OnceCell::with_value(properties),
            json: OnceCell::new(),
        }
    }

    /// Create a body from encoded JSON
    ///
    /// Decoding is deferred to the first property access. Empty input
    /// produces a body with no data.
    pub fn from_json(json: impl Into<Vec<u8>>) -> Self {
        let json = json.into();
        if json.is_empty() {
            return Body::default();
        }
        Body {
            object: OnceCell::new(),
            json: OnceCell::with_value(Arc::from(json)),
        }
    }

    /// Whether the body holds a mapping or encoded bytes
    pub fn has_data(&self) -> bool {
        self.object.get().is_some() || self.json.get().is_some()
    }

    /// All properties of the body
    ///
    /// Decodes and caches the JSON form on first call.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidBody` if the body holds no data
    /// - `Error::SerializationError` if the JSON is malformed
    /// - `Error::NotAnObject` if the JSON top level is not an object
    pub fn properties(&self) -> Result<&Arc<Properties>> {
        self.object.get_or_try_init(|| {
            let json = self.json.get().ok_or(Error::InvalidBody)?;
            decode(json).map(Arc::new)
        })
    }

    /// Owned copy of the mapping
    ///
    /// Nested objects stay shared with this body.
    pub fn to_properties(&self) -> Result<Properties> {
        self.properties().map(|p| Properties::clone(p))
    }

    /// Look up a single property
    pub fn property(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.properties()?.get(key))
    }

    /// Set a single property in place
    ///
    /// Invalidates the cached encoded form. If the mapping is shared with
    /// another body it is cloned first.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        self.properties()?;
        let object = self.object.get_mut().ok_or(Error::InvalidBody)?;
        Arc::make_mut(object).insert(key.into(), value);
        self.json = OnceCell::new();
        Ok(())
    }

    /// Encoded JSON form of the body
    ///
    /// Returns `Ok(None)` when the body holds no data.
    pub fn encoded(&self) -> Result<Option<&[u8]>> {
        if let Some(json) = self.json.get() {
            return Ok(Some(&json[..]));
        }
        let Some(object) = self.object.get() else {
            return Ok(None);
        };
        let json = self.json.get_or_try_init(|| encode(object))?;
        Ok(Some(&json[..]))
    }

    /// Whether this body can be stored as a revision
    ///
    /// A body is acceptable if it names its document, or if it carries no
    /// revision metadata at all.
    pub fn is_valid_revision_body(&self) -> bool {
        let Ok(properties) = self.properties() else {
            return false;
        };
        properties.contains_key("_id")
            || (!properties.contains_key("_rev") && !properties.contains_key("_deleted"))
    }

    /// Check the body against configured limits
    pub fn validate(&self, limits: &BodyLimits) -> Result<()> {
        if let Some(json) = self.encoded()? {
            limits.validate_size(json.len())?;
        }
        let properties = self.properties()?;
        let depth = 1 + properties.values().map(Value::nesting_depth).max().unwrap_or(0);
        limits.validate_depth(depth)?;
        let array_len = properties.values().map(Value::max_array_len).max().unwrap_or(0);
        limits.validate_array_len(array_len)?;
        Ok(())
    }
}

impl From<Properties> for Body {
    fn from(properties: Properties) -> Self {
        Body::from_properties(properties)
    }
}

fn decode(json: &[u8]) -> Result<Properties> {
    match serde_json::from_slice::<serde_json::Value>(json)? {
        serde_json::Value::Object(map) => Ok(properties_from_json_map(map)),
        other => Err(Error::NotAnObject(Value::from(other).type_name())),
    }
}

fn encode(properties: &Properties) -> Result<Arc<[u8]>> {
    let json = serde_json::Value::Object(properties_to_json_map(properties));
    Ok(Arc::from(serde_json::to_vec(&json)?))
}
