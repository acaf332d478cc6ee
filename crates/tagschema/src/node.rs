//! # Schema Nodes
//!
//! [`SchemaNode`] is the output of a parse: a typed node with an optional
//! validator, an optional missing-value default, and ordered children.
//!
//! [`FieldSpec`] is the explicit set of options every field builder
//! recognises. A field body is decoded into it key by key; anything else is
//! an error rather than a silently forwarded keyword.

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::BuildError;
use crate::types::{SchemaType, TypeKind};
use crate::validator::Validator;
use crate::value::{Mapping, Value};
use crate::widget::Widget;

/// A node of the built schema tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    pub schema_type: SchemaType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    /// Value used when input is absent. `None` means the node is required;
    /// `Some(Json::String(""))` is a real empty-string default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Json>,
    /// Value shown when rendering a fresh form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
    /// Arguments the type was constructed from, as declared.
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub type_args: Mapping,
    pub children: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            name: String::new(),
            validator: None,
            missing: None,
            default: None,
            title: None,
            description: None,
            widget: None,
            type_args: Mapping::new(),
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.missing.is_none()
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SchemaNode::count).sum::<usize>()
    }
}

/// Options recognised by every field builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub validator: Option<Validator>,
    pub missing: Option<Json>,
    pub default: Option<Json>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub widget: Option<Widget>,
    pub type_args: Mapping,
    pub children: Vec<SchemaNode>,
}

impl FieldSpec {
    /// Keys a field body may carry.
    pub const KEYS: [&'static str; 9] = [
        "name",
        "validator",
        "missing",
        "default",
        "title",
        "description",
        "widget",
        "type_args",
        "children",
    ];

    /// Decode a resolved field body. A null body counts as empty.
    pub fn from_value(body: Value) -> Result<Self, BuildError> {
        let mapping = match body {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => return Err(BuildError::ExpectedMapping { found: other.kind() }),
        };

        let mut spec = Self::default();
        for (key, value) in mapping {
            match key.as_str() {
                "name" => spec.name = optional_string(&key, value)?.unwrap_or_default(),
                "validator" => {
                    spec.validator = match value {
                        Value::Null => None,
                        Value::Validator(v) => Some(v),
                        other => return Err(BuildError::wrong_kind(key, "validator", other.kind())),
                    }
                }
                "missing" => spec.missing = Some(value.to_json(&key)?),
                "default" => spec.default = Some(value.to_json(&key)?),
                "title" => spec.title = optional_string(&key, value)?,
                "description" => spec.description = optional_string(&key, value)?,
                "widget" => {
                    spec.widget = match value {
                        Value::Null => None,
                        Value::Widget(w) => Some(w),
                        other => return Err(BuildError::wrong_kind(key, "widget", other.kind())),
                    }
                }
                "type_args" => {
                    spec.type_args = match value {
                        Value::Null => Mapping::new(),
                        Value::Mapping(args) => args,
                        other => return Err(BuildError::wrong_kind(key, "mapping", other.kind())),
                    }
                }
                "children" => spec.children = children(value)?,
                _ => return Err(BuildError::UnknownKey { key }),
            }
        }

        if let Some(key) = spec.type_args.keys().find(|k| Self::KEYS.iter().any(|f| f == k)) {
            return Err(BuildError::KeyCollision { key: key.to_string() });
        }
        Ok(spec)
    }

    /// Attach the spec to a constructed type.
    pub fn into_node(self, schema_type: SchemaType) -> Result<SchemaNode, BuildError> {
        if !self.children.is_empty() && !schema_type.takes_children() {
            return Err(BuildError::invalid(
                "children",
                format!("type '{}' does not hold children", schema_type.name()),
            ));
        }
        if schema_type.kind() == Some(TypeKind::Sequence) && self.children.len() > 1 {
            return Err(BuildError::invalid(
                "children",
                format!("a sequence holds at most one child, found {}", self.children.len()),
            ));
        }

        Ok(SchemaNode {
            schema_type,
            name: self.name,
            validator: self.validator,
            missing: self.missing,
            default: self.default,
            title: self.title,
            description: self.description,
            widget: self.widget,
            type_args: self.type_args,
            children: self.children,
        })
    }
}

fn optional_string(key: &str, value: Value) -> Result<Option<String>, BuildError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(BuildError::wrong_kind(key, "string", other.kind())),
    }
}

fn children(value: Value) -> Result<Vec<SchemaNode>, BuildError> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        other => return Err(BuildError::wrong_kind("children", "sequence", other.kind())),
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Node(node) => Ok(*node),
            other => Err(BuildError::wrong_kind("children", "schema nodes", other.kind())),
        })
        .collect()
}
