//! Size limits for document bodies
//!
//! Bodies arrive from storage, replication peers and API callers. Before a
//! body is persisted or transmitted the storage layer can check it against
//! a `BodyLimits` value:
//!
//! | Limit | Default | Field |
//! |-------|---------|-------|
//! | Max encoded body size | 16 MB | `max_document_bytes` |
//! | Max nesting depth | 100 levels | `max_nesting_depth` |
//! | Max array length | 1M elements | `max_array_len` |
//!
//! Limits can be loaded from a TOML file; missing fields keep their defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default maximum encoded body size in bytes (16 MB)
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Default maximum nesting depth (100 levels)
pub const MAX_NESTING_DEPTH: usize = 100;

/// Default maximum array length (1 million elements)
pub const MAX_ARRAY_LEN: usize = 1_000_000;

/// Error type for body limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Encoded body exceeds maximum size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual encoded size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Body nesting exceeds maximum depth
    #[error("document nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// An array in the body exceeds maximum length
    #[error("array size {size} exceeds maximum of {max} elements")]
    ArrayTooLarge {
        /// Actual array length
        size: usize,
        /// Maximum allowed length
        max: usize,
    },
}

/// Configurable body limits
///
/// # Example
///
/// ```toml
/// max_document_bytes = 16777216
/// max_nesting_depth = 100
/// max_array_len = 1000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLimits {
    /// Maximum encoded body size in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    /// Maximum nesting depth of objects and arrays
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Maximum length of any array in the body
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,
}

fn default_max_document_bytes() -> usize {
    MAX_DOCUMENT_BYTES
}

fn default_max_nesting_depth() -> usize {
    MAX_NESTING_DEPTH
}

fn default_max_array_len() -> usize {
    MAX_ARRAY_LEN
}

impl Default for BodyLimits {
    fn default() -> Self {
        BodyLimits {
            max_document_bytes: MAX_DOCUMENT_BYTES,
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_array_len: MAX_ARRAY_LEN,
        }
    }
}

impl BodyLimits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        BodyLimits {
            max_document_bytes: 256,
            max_nesting_depth: 4,
            max_array_len: 8,
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Document body limits
#
# Maximum encoded body size in bytes (default: 16 MB)
max_document_bytes = 16777216

# Maximum nesting depth of objects and arrays (default: 100)
max_nesting_depth = 100

# Maximum length of any array in a body (default: 1000000)
max_array_len = 1000000
"#
    }

    /// Parse limits from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the text cannot be parsed or a limit is zero.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let limits: BodyLimits = toml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("Failed to parse body limits: {}", e)))?;
        limits.check()?;
        Ok(limits)
    }

    /// Read and parse limits from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::InvalidConfig(format!("{} ('{}')", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize these limits to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize body limits: {}", e)))
    }

    fn check(&self) -> Result<()> {
        if self.max_document_bytes == 0 || self.max_nesting_depth == 0 || self.max_array_len == 0 {
            return Err(Error::InvalidConfig(
                "body limits must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate an encoded body size
    pub fn validate_size(&self, size: usize) -> std::result::Result<(), LimitError> {
        if size > self.max_document_bytes {
            Err(LimitError::DocumentTooLarge {
                size,
                max: self.max_document_bytes,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a nesting depth
    pub fn validate_depth(&self, depth: usize) -> std::result::Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            Err(LimitError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            })
        } else {
            Ok(())
        }
    }

    /// Validate an array length
    pub fn validate_array_len(&self, size: usize) -> std::result::Result<(), LimitError> {
        if size > self.max_array_len {
            Err(LimitError::ArrayTooLarge {
                size,
                max: self.max_array_len,
            })
        } else {
            Ok(())
        }
    }
}
