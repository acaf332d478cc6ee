//! # Generic Document Tree
//!
//! [`Node`] is the structural view of a YAML document: scalars, sequences,
//! and mappings, each optionally annotated with a [`Tag`]. It is produced
//! from `serde_yaml::Value`, which already preserves mapping insertion order
//! and carries local tags as `Value::Tagged`.
//!
//! The conversion is deliberately lossless for what the resolver needs and
//! strict about what it cannot represent: mapping keys must be plain
//! scalars.

use std::fmt;

use crate::error::DocumentError;
use crate::path::DocumentPath;

/// A tag attached to a document node, stored without its leading `!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Build a tag, stripping one leading `!` if present.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        Self(raw.strip_prefix('!').unwrap_or(raw).to_string())
    }

    /// The normalized tag name, e.g. `field.string`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Short name of the scalar kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Stringified form used when the scalar appears as a mapping key.
    fn into_key(self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s,
        }
    }
}

/// The structural content of a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    /// Entries in source order.
    Mapping(Vec<(String, Node)>),
}

/// A node of the generic document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Option<Tag>,
    pub content: Content,
}

impl Node {
    pub fn scalar(scalar: Scalar) -> Self {
        Self {
            tag: None,
            content: Content::Scalar(scalar),
        }
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Self {
            tag: None,
            content: Content::Sequence(items),
        }
    }

    pub fn mapping(entries: Vec<(String, Node)>) -> Self {
        Self {
            tag: None,
            content: Content::Mapping(entries),
        }
    }

    /// Attach (or replace) the node's tag.
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    /// Short name of the content kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match &self.content {
            Content::Scalar(scalar) => scalar.kind(),
            Content::Sequence(_) => "sequence",
            Content::Mapping(_) => "mapping",
        }
    }

    /// Convert a parsed YAML value into a document tree.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, DocumentError> {
        let mut path = DocumentPath::root();
        convert(value, &mut path)
    }
}

/// Parse YAML text holding exactly one document into a [`Node`] tree.
///
/// An empty text yields an untagged null scalar.
pub fn parse_document(text: &str) -> Result<Node, DocumentError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|err| {
        if err.to_string().starts_with("recursion limit exceeded") {
            DocumentError::TooDeep {
                line: err.location().map_or(0, |loc| loc.line()),
            }
        } else {
            DocumentError::Yaml(err)
        }
    })?;
    Node::from_yaml(value)
}

/// Nesting depth past which the YAML reader rejects a document outright.
pub const READER_NESTING_LIMIT: usize = 128;

fn convert(value: serde_yaml::Value, path: &mut DocumentPath) -> Result<Node, DocumentError> {
    use serde_yaml::Value;

    match value {
        Value::Null => Ok(Node::scalar(Scalar::Null)),
        Value::Bool(b) => Ok(Node::scalar(Scalar::Bool(b))),
        Value::Number(n) => Ok(Node::scalar(number(&n, path)?)),
        Value::String(s) => Ok(Node::scalar(Scalar::String(s))),
        Value::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for (i, item) in seq.into_iter().enumerate() {
                path.push_index(i);
                items.push(convert(item, path)?);
                path.pop();
            }
            Ok(Node::sequence(items))
        }
        Value::Mapping(map) => {
            let mut entries: Vec<(String, Node)> = Vec::with_capacity(map.len());
            for (k, v) in map {
                let key = key(k, path)?;
                if entries.iter().any(|(seen, _)| *seen == key) {
                    return Err(DocumentError::DuplicateKey {
                        path: path.to_string(),
                        key,
                    });
                }
                path.push_key(key.clone());
                let node = convert(v, path)?;
                path.pop();
                entries.push((key, node));
            }
            Ok(Node::mapping(entries))
        }
        Value::Tagged(tagged) => {
            let serde_yaml::value::TaggedValue { tag, value } = *tagged;
            let node = convert(value, path)?;
            Ok(node.with_tag(Tag::new(tag.to_string())))
        }
    }
}

fn number(n: &serde_yaml::Number, path: &DocumentPath) -> Result<Scalar, DocumentError> {
    if let Some(i) = n.as_i64() {
        return Ok(Scalar::Integer(i));
    }
    // Unsigned values beyond i64 and true floats both land here.
    n.as_f64()
        .map(Scalar::Float)
        .ok_or_else(|| DocumentError::UnsupportedNumber {
            path: path.to_string(),
            raw: n.to_string(),
        })
}

fn key(value: serde_yaml::Value, path: &DocumentPath) -> Result<String, DocumentError> {
    use serde_yaml::Value;

    let scalar = match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(b),
        Value::Number(n) => number(&n, path)?,
        Value::String(s) => Scalar::String(s),
        Value::Sequence(_) => return Err(non_scalar_key(path, "sequence")),
        Value::Mapping(_) => return Err(non_scalar_key(path, "mapping")),
        Value::Tagged(_) => return Err(non_scalar_key(path, "tagged value")),
    };
    Ok(scalar.into_key())
}

fn non_scalar_key(path: &DocumentPath, found: &'static str) -> DocumentError {
    DocumentError::NonScalarKey {
        path: path.to_string(),
        found,
    }
}
