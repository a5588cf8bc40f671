//! # Namespace Identifiers
//!
//! Built-in namespace names. The authoritative set of valid namespaces is
//! whatever the schema cache loaded; these constants exist so callers do not
//! spell them by hand.

/// Namespace holding runtime configurations.
pub const NAMESPACE_RUNTIMES: &str = "runtimes";

/// Namespace holding reusable code snippets.
pub const NAMESPACE_CODE_SNIPPETS: &str = "code-snippets";

/// Namespace reserved for exercising the store itself.
///
/// Schemas declaring this namespace are loaded only when
/// [`TESTING_ENV_VAR`] is truthy at schema-cache construction.
pub const NAMESPACE_TESTING: &str = "metadata-tests";

/// Environment toggle exposing [`NAMESPACE_TESTING`].
pub const TESTING_ENV_VAR: &str = "METADATA_TESTING";
