//! # Recursive Resolver
//!
//! Reduces a document tree to a [`Value`], children first.
//!
//! For every node: mapping values and sequence elements are resolved in
//! declared order, scalars become plain values, and then, if the node is
//! tagged, its builder receives the resolved body. An untagged node resolves
//! to its resolved body unchanged.
//!
//! A tag is looked up before its body is descended into, so an unknown tag is
//! reported at the outermost place it occurs. The first failure aborts the
//! walk; nothing partially built escapes.

use tagschema_core::{Content, DocumentPath, Node};

use crate::error::SchemaError;
use crate::registry::Registry;
use crate::value::{Mapping, Value};

/// Walks a document tree against one registry.
#[derive(Debug)]
pub struct Resolver<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r Registry, max_depth: usize) -> Self {
        Self { registry, max_depth }
    }

    pub fn resolve(&self, node: Node) -> Result<Value, SchemaError> {
        let mut path = DocumentPath::root();
        self.resolve_at(node, &mut path)
    }

    fn resolve_at(&self, node: Node, path: &mut DocumentPath) -> Result<Value, SchemaError> {
        if path.depth() > self.max_depth {
            return Err(SchemaError::TooDeep {
                max_depth: self.max_depth,
                path: path.to_string(),
            });
        }

        let Node { tag, content } = node;
        let entry = match &tag {
            Some(tag) => Some(self.registry.lookup(tag.as_str()).ok_or_else(|| {
                SchemaError::UnknownTag {
                    tag: tag.as_str().to_string(),
                    path: path.to_string(),
                }
            })?),
            None => None,
        };

        let body = match content {
            Content::Scalar(scalar) => Value::from(scalar),
            Content::Sequence(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    path.push_index(i);
                    resolved.push(self.resolve_at(item, path)?);
                    path.pop();
                }
                Value::Sequence(resolved)
            }
            Content::Mapping(entries) => {
                let mut resolved = Mapping::new();
                for (key, item) in entries {
                    path.push_key(key.clone());
                    let value = self.resolve_at(item, path)?;
                    path.pop();
                    resolved.insert(key, value);
                }
                Value::Mapping(resolved)
            }
        };

        match (tag, entry) {
            (Some(tag), Some(entry)) => {
                tracing::trace!(tag = %tag, path = %path, "building tagged node");
                entry
                    .build(body)
                    .map_err(|err| SchemaError::from_build(tag.as_str(), path.to_string(), err))
            }
            _ => Ok(body),
        }
    }
}
