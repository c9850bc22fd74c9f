//! Revision identifiers
//!
//! A revision ID has the form `<generation>-<digest>`:
//! - **generation**: decimal branch depth (`1` for a document's first revision)
//! - **digest**: opaque suffix, usually a content hash
//!
//! ## Ordering
//!
//! Revision IDs are collated by generation first (numerically, so `2-x` sorts
//! before `10-x`), then by digest as raw bytes. If either side does not parse,
//! both strings are compared whole and case-insensitively. Conflict
//! resolution on legacy data depends on this exact fallback, including the
//! case asymmetry between the two branches.
//!
//! Malformed IDs are an expected input. Parsing reports them as `RevIdError`
//! instead of panicking, and collation still produces a deterministic result.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted generation (fits a signed 32-bit integer)
pub const MAX_GENERATION: u32 = i32::MAX as u32;

/// Reason a revision ID failed to parse
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RevIdError {
    /// Input is empty
    #[error("revision ID is empty")]
    Empty,
    /// Input contains a space character
    #[error("revision ID contains a space")]
    ContainsSpace,
    /// No `-` between generation and digest
    #[error("revision ID has no '-' separator")]
    MissingSeparator,
    /// Generation prefix is not a decimal number in range
    #[error("revision ID generation is not a number in 0..={}", MAX_GENERATION)]
    InvalidGeneration,
    /// Nothing after the separator
    #[error("revision ID digest is empty")]
    EmptyDigest,
}

/// Successfully parsed revision ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedRevId<'a> {
    /// Branch depth
    pub generation: u32,
    /// Opaque suffix after the first `-`
    pub digest: &'a str,
}

impl fmt::Display for ParsedRevId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.generation, self.digest)
    }
}

/// Split a revision ID into generation and digest
///
/// # Errors
///
/// Returns `RevIdError` if the input is empty, contains a space, has no `-`,
/// has a non-numeric or out-of-range generation, or has an empty digest.
pub fn parse(text: &str) -> Result<ParsedRevId<'_>, RevIdError> {
    if text.is_empty() {
        return Err(RevIdError::Empty);
    }
    if text.contains(' ') {
        return Err(RevIdError::ContainsSpace);
    }
    let (generation, digest) = text.split_once('-').ok_or(RevIdError::MissingSeparator)?;
    if generation.is_empty() || !generation.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RevIdError::InvalidGeneration);
    }
    let generation = generation
        .parse::<u32>()
        .ok()
        .filter(|g| *g <= MAX_GENERATION)
        .ok_or(RevIdError::InvalidGeneration)?;
    if digest.is_empty() {
        return Err(RevIdError::EmptyDigest);
    }
    Ok(ParsedRevId { generation, digest })
}

/// Generation of a revision ID, or `None` if it is malformed
pub fn generation_of(text: &str) -> Option<u32> {
    parse(text).ok().map(|p| p.generation)
}

/// Collate two revision IDs
///
/// Both arguments must be present; an absent ID has no defined position.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Ok(a), Ok(b)) => a
            .generation
            .cmp(&b.generation)
            .then_with(|| a.digest.as_bytes().cmp(b.digest.as_bytes())),
        _ => compare_ignore_case(a, b),
    }
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Owned revision ID
///
/// `RevId::new` validates; `RevId::new_unchecked` accepts anything so that
/// legacy or corrupt IDs read from storage can still be carried and collated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevId(String);

impl RevId {
    /// Create a RevId, validating the input
    ///
    /// # Errors
    ///
    /// Returns `RevIdError` if the text is not `<generation>-<digest>`.
    pub fn new(text: impl Into<String>) -> Result<Self, RevIdError> {
        let text = text.into();
        parse(&text)?;
        Ok(RevId(text))
    }

    /// Create a RevId without validation
    pub fn new_unchecked(text: impl Into<String>) -> Self {
        RevId(text.into())
    }

    /// Format a RevId from its parts
    pub fn from_parts(generation: u32, digest: &str) -> Result<Self, RevIdError> {
        Self::new(format!("{}-{}", generation, digest))
    }

    /// Parsed view of this ID
    pub fn parsed(&self) -> Result<ParsedRevId<'_>, RevIdError> {
        parse(&self.0)
    }

    /// Whether this ID is well-formed
    pub fn is_valid(&self) -> bool {
        self.parsed().is_ok()
    }

    /// Generation, or `None` for a malformed ID
    pub fn generation(&self) -> Option<u32> {
        generation_of(&self.0)
    }

    /// Digest, or `None` for a malformed ID
    pub fn digest(&self) -> Option<&str> {
        self.parsed().ok().map(|p| p.digest)
    }

    /// Collate against another ID
    ///
    /// This is not `Ord`: malformed IDs that differ only in case collate equal.
    pub fn collate(&self, other: &RevId) -> Ordering {
        compare(&self.0, &other.0)
    }

    /// Get the ID as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RevId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RevId {
    type Err = RevIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RevId::new(s)
    }
}

impl TryFrom<String> for RevId {
    type Error = RevIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RevId::new(s)
    }
}

impl From<RevId> for String {
    fn from(id: RevId) -> Self {
        id.0
    }
}

impl AsRef<str> for RevId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
