//! # Resolved Values
//!
//! [`Value`] is what the resolver produces for every document node: plain
//! data for untagged nodes, or whatever a builder returned for tagged ones.
//! Builders therefore never see raw document nodes, only `Value`s whose
//! nested tagged parts are already built.

use std::cmp::Ordering;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as Json;
use tagschema_core::Scalar;

use crate::error::BuildError;
use crate::node::SchemaNode;
use crate::validator::{Function, Validator};
use crate::widget::Widget;

/// A resolved document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    /// Built by a field builder.
    Node(Box<SchemaNode>),
    /// Built by a validator builder.
    Validator(Validator),
    /// Built by a widget builder.
    Widget(Widget),
    /// Built by a named function tag.
    Function(Function),
}

impl Value {
    /// Short name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Node(_) => "schema node",
            Self::Validator(_) => "validator",
            Self::Widget(_) => "widget",
            Self::Function(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert plain data to JSON.
    ///
    /// Fails if the value, or anything nested in it, is a built value
    /// (schema node, validator, widget, function) or a non-finite float.
    /// `key` names the argument in the error.
    pub fn to_json(&self, key: &str) -> Result<Json, BuildError> {
        match self {
            Self::Null => Ok(Json::Null),
            Self::Bool(b) => Ok(Json::Bool(*b)),
            Self::Integer(i) => Ok(Json::from(*i)),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| BuildError::invalid(key, format!("{f} is not finite"))),
            Self::String(s) => Ok(Json::String(s.clone())),
            Self::Sequence(items) => items
                .iter()
                .map(|item| item.to_json(key))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Self::Mapping(mapping) => mapping.to_json(key),
            built => Err(BuildError::wrong_kind(key, "plain data", built.kind())),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Self::Null,
            Scalar::Bool(b) => Self::Bool(b),
            Scalar::Integer(i) => Self::Integer(i),
            Scalar::Float(f) => Self::Float(f),
            Scalar::String(s) => Self::String(s),
        }
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        Self::Node(Box::new(node))
    }
}

impl From<Validator> for Value {
    fn from(validator: Validator) -> Self {
        Self::Validator(validator)
    }
}

impl From<Widget> for Value {
    fn from(widget: Widget) -> Self {
        Self::Widget(widget)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => items.serialize(serializer),
            Self::Mapping(mapping) => mapping.serialize(serializer),
            Self::Node(node) => node.serialize(serializer),
            Self::Validator(validator) => validator.serialize(serializer),
            Self::Widget(widget) => widget.serialize(serializer),
            Self::Function(function) => function.serialize(serializer),
        }
    }
}

/// An ordered string-keyed mapping of resolved values.
///
/// Entry order is the document's declaration order. Inserting an existing
/// key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove and return the value under `key`, keeping the order of the rest.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object of the entries, under the same rules as [`Value::to_json`].
    pub fn to_json(&self, key: &str) -> Result<Json, BuildError> {
        let mut object = serde_json::Map::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            object.insert(name.clone(), value.to_json(key)?);
        }
        Ok(Json::Object(object))
    }
}

impl FromIterator<(String, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A numeric bound: integers stay exact, floats compare as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Read a JSON number; `None` for anything else.
    pub fn from_json(value: &Json) -> Option<Self> {
        let Json::Number(n) = value else {
            return None;
        };
        match n.as_i64() {
            Some(i) => Some(Self::Integer(i)),
            None => n.as_f64().map(Self::Float),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
        }
    }
}
