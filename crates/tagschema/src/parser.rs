//! # Schema Parser
//!
//! Entry point: YAML text in, [`SchemaNode`] out.
//!
//! A [`SchemaParser`] owns a registry template. Every parse call takes a
//! fresh instance of that template, resolves the document against it, and
//! drops it on return. The template itself, and the process-wide base
//! registry, are never mutated by a parse, so one parser can be shared
//! across threads and calls never see each other's state.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tagschema_core::{DocumentError, READER_NESTING_LIMIT};
use tracing::debug;

use crate::error::SchemaError;
use crate::node::SchemaNode;
use crate::registry::Registry;
use crate::resolve::Resolver;
use crate::value::Value;

/// Highest accepted [`ParserConfig::max_depth`].
///
/// Kept well under [`READER_NESTING_LIMIT`] so the resolver's own limit is
/// always the one that fires, whatever mix of tags and containers a
/// document nests.
pub const MAX_DEPTH: usize = READER_NESTING_LIMIT / 2;

/// Parser tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Deepest document nesting accepted before failing with
    /// [`SchemaError::TooDeep`]. At most [`MAX_DEPTH`]; larger values set
    /// directly on the struct are capped.
    #[serde(deserialize_with = "bounded_depth")]
    pub max_depth: usize,
}

impl ParserConfig {
    /// The limit the resolver enforces.
    pub fn effective_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: MAX_DEPTH }
    }
}

fn bounded_depth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let depth = usize::deserialize(deserializer)?;
    if depth > MAX_DEPTH {
        return Err(D::Error::custom(format!(
            "max_depth {depth} is above the ceiling of {MAX_DEPTH}"
        )));
    }
    Ok(depth)
}

#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    registry: Registry,
    config: ParserConfig,
}

impl SchemaParser {
    /// A parser over the standard catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser over an explicit registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Extend the template before parsing.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Parse `text` into a schema tree. The root must build a schema node.
    pub fn parse(&self, text: &str) -> Result<SchemaNode, SchemaError> {
        match self.parse_value(text)? {
            Value::Node(node) => {
                debug!(
                    root = node.schema_type.name(),
                    nodes = node.count(),
                    "parsed schema"
                );
                Ok(*node)
            }
            other => Err(SchemaError::NotASchema { found: other.kind() }),
        }
    }

    /// Parse `text` and return whatever the root resolved to.
    pub fn parse_value(&self, text: &str) -> Result<Value, SchemaError> {
        let max_depth = self.config.effective_depth();
        let document = tagschema_core::parse_document(text).map_err(|err| match err {
            DocumentError::TooDeep { line } => SchemaError::TooDeep {
                max_depth,
                path: format!("line {line}"),
            },
            other => SchemaError::Syntax(other),
        })?;
        let instance = self.registry.create_instance();
        debug!(
            bytes = text.len(),
            extensions = instance.extension_tags().len(),
            max_depth,
            "resolving document"
        );
        Resolver::new(&instance, max_depth).resolve(document)
    }
}

/// Parse `text` with the standard catalog.
pub fn parse(text: &str) -> Result<SchemaNode, SchemaError> {
    SchemaParser::new().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;

    #[test]
    fn parses_with_defaults() {
        let node = parse("!field.string\n  name : phone\n  missing : ''\n").unwrap();
        assert_eq!(node.schema_type.kind(), Some(TypeKind::String));
        assert_eq!(node.name, "phone");
    }

    #[test]
    fn untagged_root_is_not_a_schema() {
        let err = parse("name: phone\n").unwrap_err();
        assert!(matches!(err, SchemaError::NotASchema { found: "mapping" }));

        let err = parse("").unwrap_err();
        assert!(matches!(err, SchemaError::NotASchema { found: "null" }));
    }

    #[test]
    fn validator_root_is_available_as_a_value() {
        let parser = SchemaParser::new();
        let value = parser.parse_value("!validator.email {}\n").unwrap();
        assert!(matches!(value, Value::Validator(_)));
        assert!(matches!(
            parser.parse("!validator.email {}\n"),
            Err(SchemaError::NotASchema { found: "validator" })
        ));
    }

    #[test]
    fn syntax_errors_surface() {
        let err = parse("!field.string\n  name: [phone\n").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax(_)));
    }

    #[test]
    fn parsing_does_not_mutate_the_template() {
        let mut parser = SchemaParser::new();
        parser.registry_mut().register("field.note", |body| {
            crate::builders::field(TypeKind::String, body)
        });
        let before = parser.registry().tags();
        parser.parse("!field.note {name: n}\n").unwrap();
        assert_eq!(parser.registry().tags(), before);
        assert!(!Registry::base().contains("field.note"));
    }

    #[test]
    fn config_defaults_and_overrides() {
        assert_eq!(ParserConfig::default().max_depth, MAX_DEPTH);
        let parser = SchemaParser::new().with_config(ParserConfig { max_depth: 1 });
        let err = parser
            .parse("!schema\nchildren:\n  - !field.string {name: a}\n")
            .unwrap_err();
        assert!(matches!(err, SchemaError::TooDeep { max_depth: 1, .. }));
    }

    /// `!field.string` whose `missing` default nests `levels` flow sequences.
    fn nested_default(levels: usize) -> String {
        format!(
            "!field.string\n  missing: {}{}\n",
            "[".repeat(levels),
            "]".repeat(levels)
        )
    }

    #[test]
    fn depth_limit_applies_to_document_text() {
        let parser = SchemaParser::new();
        assert!(parser.parse(&nested_default(MAX_DEPTH - 1)).is_ok());

        let err = parser.parse(&nested_default(MAX_DEPTH + 5)).unwrap_err();
        let SchemaError::TooDeep { max_depth, path } = err else {
            panic!("expected too deep");
        };
        assert_eq!(max_depth, MAX_DEPTH);
        assert!(path.starts_with("$.missing[0]"));

        let shallow = SchemaParser::new().with_config(ParserConfig { max_depth: 8 });
        assert!(matches!(
            shallow.parse(&nested_default(10)),
            Err(SchemaError::TooDeep { max_depth: 8, .. })
        ));
    }

    #[test]
    fn nesting_past_the_reader_is_too_deep_not_syntax() {
        let generous = SchemaParser::new().with_config(ParserConfig { max_depth: 1000 });
        assert_eq!(generous.config().effective_depth(), MAX_DEPTH);
        let err = generous.parse(&nested_default(200)).unwrap_err();
        assert!(matches!(err, SchemaError::TooDeep { max_depth, .. } if max_depth == MAX_DEPTH));
    }

    #[test]
    fn config_rejects_depth_above_ceiling() {
        let config: ParserConfig = serde_json::from_str(r#"{"max_depth": 16}"#).unwrap();
        assert_eq!(config.max_depth, 16);
        assert_eq!(serde_json::from_str::<ParserConfig>("{}").unwrap(), ParserConfig::default());

        let err = serde_json::from_str::<ParserConfig>(r#"{"max_depth": 1000}"#).unwrap_err();
        assert!(err.to_string().contains("above the ceiling"));
    }
}
