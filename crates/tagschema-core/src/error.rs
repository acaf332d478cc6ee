//! # Error Types
//!
//! Errors raised while turning YAML text into a [`Node`](crate::Node) tree.
//! Everything here is a syntax-level failure: the text is not a document
//! the resolver can consume.

use thiserror::Error;

/// Failure to produce a generic document tree.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The text is not well-formed YAML, or holds more than one document.
    #[error("malformed document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML reader refused to descend further than
    /// [`READER_NESTING_LIMIT`](crate::READER_NESTING_LIMIT) levels.
    #[error("document nesting exceeds the reader limit near line {line}")]
    TooDeep {
        /// 1-based line where the reader gave up.
        line: usize,
    },

    /// Two keys of one mapping stringify to the same text, e.g. `1` and `'1'`.
    #[error("duplicate key '{key}' in mapping at {path}")]
    DuplicateKey {
        /// Path of the mapping holding the duplicate.
        path: String,
        key: String,
    },

    /// A mapping key was a sequence, a mapping, or a tagged value.
    #[error("mapping key at {path} must be a plain scalar, found {found}")]
    NonScalarKey {
        /// Path of the mapping holding the offending key.
        path: String,
        /// Kind of the key that was found.
        found: &'static str,
    },

    /// A numeric scalar could not be represented.
    #[error("unrepresentable number at {path}: {raw}")]
    UnsupportedNumber {
        /// Path of the scalar.
        path: String,
        /// Source text of the number.
        raw: String,
    },
}
