//! # Error Types
//!
//! Two layers, mirroring who raises them:
//!
//! - [`BuildError`] is what a builder returns. It knows nothing about where
//!   in the document it was invoked.
//! - [`SchemaError`] is what a parse returns. The resolver attaches the tag
//!   and the document path to every builder failure, except user callback
//!   failures, which pass through untouched.
//!
//! Every error is fatal to the parse that raised it. No partial tree is ever
//! returned.

use std::error::Error as StdError;

use tagschema_core::DocumentError;
use thiserror::Error;

/// Failure inside a single builder invocation.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The tagged node's body was not a mapping (or empty).
    #[error("expected a mapping body, found {found}")]
    ExpectedMapping {
        /// Kind of the body that was found.
        found: &'static str,
    },

    /// A required key is absent.
    #[error("missing required key '{key}'")]
    MissingKey { key: &'static str },

    /// A key the builder does not recognise.
    #[error("unknown key '{key}'")]
    UnknownKey { key: String },

    /// A key holds a value of the wrong kind.
    #[error("key '{key}' expects {expected}, found {found}")]
    WrongKind {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A key is given both inside `type_args` and as a schema node field.
    #[error("key '{key}' is a schema node field and cannot appear in type_args")]
    KeyCollision { key: String },

    /// A value has the right kind but is not acceptable.
    #[error("invalid value for '{key}': {reason}")]
    InvalidArgument { key: String, reason: String },

    /// The type constructor rejected its `type_args`.
    #[error("invalid type arguments: {0}")]
    InvalidTypeArgs(#[from] serde_json::Error),

    /// A regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A user-supplied builder or constructor failed.
    #[error(transparent)]
    Callback(Box<dyn StdError + Send + Sync>),
}

impl BuildError {
    /// Wrap an extension author's error so it reaches the caller unchanged.
    pub fn callback(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Callback(err.into())
    }

    pub(crate) fn wrong_kind(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::WrongKind {
            key: key.into(),
            expected,
            found,
        }
    }

    /// A value of the right kind that the builder cannot accept.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a whole parse.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The text is not a well-formed document.
    #[error("syntax error: {0}")]
    Syntax(#[from] DocumentError),

    /// A tagged node names a tag with no registered builder.
    #[error("unknown tag '!{tag}' at {path}")]
    UnknownTag { tag: String, path: String },

    /// A builder rejected its arguments.
    #[error("cannot build '!{tag}' at {path}: {source}")]
    Build {
        tag: String,
        path: String,
        source: BuildError,
    },

    /// A user-supplied builder failed. Propagated as raised.
    #[error(transparent)]
    Callback(Box<dyn StdError + Send + Sync>),

    /// The document root did not resolve to a schema node.
    #[error("document root resolved to {found}, not a schema node")]
    NotASchema { found: &'static str },

    /// Nesting exceeded the configured limit.
    #[error("document nesting exceeds {max_depth} levels at {path}")]
    TooDeep { max_depth: usize, path: String },
}

impl SchemaError {
    /// Attach the tag and path to a builder failure.
    pub(crate) fn from_build(tag: &str, path: String, err: BuildError) -> Self {
        match err {
            BuildError::Callback(inner) => Self::Callback(inner),
            source => Self::Build {
                tag: tag.to_string(),
                path,
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("no plane on Saturday")]
    struct Grounded;

    #[test]
    fn callback_errors_are_not_wrapped() {
        let err = SchemaError::from_build("validator.zorba", "$".into(), BuildError::callback(Grounded));
        assert_eq!(err.to_string(), "no plane on Saturday");
        let SchemaError::Callback(inner) = err else {
            panic!("expected callback error");
        };
        assert!(inner.downcast_ref::<Grounded>().is_some());
    }

    #[test]
    fn build_errors_carry_tag_and_path() {
        let err = SchemaError::from_build(
            "validator.one_of",
            "$.validator".into(),
            BuildError::MissingKey { key: "choices" },
        );
        assert_eq!(
            err.to_string(),
            "cannot build '!validator.one_of' at $.validator: missing required key 'choices'"
        );
    }
}
