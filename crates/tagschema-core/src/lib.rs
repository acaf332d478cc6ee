//! # tagschema-core — Generic Document Model
//!
//! The leaf of the tagschema workspace. It turns YAML text into a generic
//! tree of scalars, sequences, and mappings in which every node may carry a
//! [`Tag`]. The tree is what the schema resolver consumes; nothing in here
//! knows about schemas, validators, or builders.
//!
//! ## Guarantees
//!
//! 1. **Order is preserved.** Mapping entries and sequence elements keep the
//!    order in which they appear in the source text. Positional semantics
//!    downstream (tuple elements, child ordering) depend on it.
//!
//! 2. **Tags are normalized.** `!field.string` and `field.string` name the
//!    same tag; the leading `!` is stripped once at construction.
//!
//! 3. **Keys are strings.** Scalar keys are stringified; tagged or composite
//!    keys, and keys that collide once stringified, are rejected with a
//!    [`DocumentError`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tagschema-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - The tree is immutable once produced: consumers take it by value.

pub mod document;
pub mod error;
pub mod path;

pub use document::{parse_document, Content, Node, Scalar, Tag, READER_NESTING_LIMIT};
pub use error::DocumentError;
pub use path::{DocumentPath, PathSegment};
