//! # Error Types
//!
//! Errors raised while constructing or decoding documents. Store- and
//! schema-level failures live in their own crates and wrap these.

use thiserror::Error;

/// Error constructing, naming or decoding a [`Document`](crate::Document).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document name was empty or whitespace-only.
    #[error("name of metadata was not provided")]
    MissingName,

    /// The document name breaks the identifier rule.
    #[error("invalid metadata name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which part of the rule was broken.
        reason: String,
    },

    /// The required `displayName` attribute was absent.
    #[error("missing required 'displayName' attribute")]
    MissingDisplayName,

    /// The serialized form was not a well-formed document.
    #[error("malformed metadata document: {reason}")]
    Malformed {
        /// Human-readable reason for the failure.
        reason: String,
    },
}
