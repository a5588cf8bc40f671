//! # Document Names
//!
//! A document name doubles as the base name of its backing file, so it must
//! be safe to join onto a directory path.
//!
//! ## Identifier Rule
//!
//! Lowercase ASCII alphanumerics, with embedded `-` and `_` allowed. The
//! first and last characters must be alphanumeric. A single character is a
//! valid name.

use std::fmt;

use crate::error::DocumentError;

/// Check `name` against the identifier rule.
fn validate_name(name: &str) -> Result<(), DocumentError> {
    if name.trim().is_empty() {
        return Err(DocumentError::MissingName);
    }

    let invalid = |reason: String| DocumentError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let first = name.chars().next();
    let last = name.chars().last();
    for boundary in [first, last].into_iter().flatten() {
        if !is_lower_alnum(boundary) {
            return Err(invalid(format!(
                "must begin and end with [a-z0-9], got {boundary:?}"
            )));
        }
    }

    for c in name.chars() {
        if !(is_lower_alnum(c) || c == '-' || c == '_') {
            return Err(invalid(format!(
                "contains invalid character {c:?}: must match [a-z0-9_-]"
            )));
        }
    }
    Ok(())
}

fn is_lower_alnum(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// A validated document name.
///
/// The inner value cannot be mutated after construction, guaranteeing the
/// identifier rule holds wherever a `DocumentName` is passed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentName(String);

impl DocumentName {
    /// Create a new validated name.
    ///
    /// Returns [`DocumentError::MissingName`] for an empty or whitespace-only
    /// string and [`DocumentError::InvalidName`] for anything else that
    /// breaks the identifier rule.
    pub fn new(name: &str) -> Result<Self, DocumentError> {
        validate_name(name)?;
        Ok(Self(name.to_string()))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the backing resource (`<name>.json`).
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for DocumentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<&str> for DocumentName {
    type Error = DocumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
