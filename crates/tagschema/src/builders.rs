//! # Node Builders
//!
//! One builder per standard tag, plus helpers for extension authors.
//!
//! A builder receives the tagged node's body after the resolver has built
//! everything nested inside it, so a `validators` list arrives as built
//! [`Validator`]s and a `children` list as built [`SchemaNode`]s. Builders
//! are pure: the result depends on the body alone.
//!
//! ## Extension helpers
//!
//! [`field_with`] and [`validator_with`] wrap a constructor into a builder
//! with the same body handling as the standard ones:
//!
//! ```
//! use tagschema::builders::field_with;
//! use tagschema::{CustomType, Registry, SchemaType};
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     "field.money",
//!     field_with(|type_args| Ok(SchemaType::Custom(CustomType::new("money", type_args)?))),
//! );
//! ```

use crate::catalog::ValidatorTag;
use crate::error::BuildError;
use crate::node::{FieldSpec, SchemaNode};
use crate::types::{SchemaType, TypeKind};
use crate::validator::{Pattern, Validator};
use crate::value::{Mapping, Number, Value};
use crate::widget::{Widget, WidgetKind};

/// Build a schema node of a standard type.
pub fn field(kind: TypeKind, body: Value) -> Result<Value, BuildError> {
    let spec = FieldSpec::from_value(body)?;
    let schema_type = SchemaType::construct(kind, &spec.type_args)?;
    Ok(spec.into_node(schema_type)?.into())
}

/// Wrap a type constructor into a field builder.
///
/// The constructor receives the node's `type_args`; the remaining body keys
/// are handled as for the standard field tags.
pub fn field_with<F>(construct: F) -> impl Fn(Value) -> Result<Value, BuildError> + Send + Sync + 'static
where
    F: Fn(&Mapping) -> Result<SchemaType, BuildError> + Send + Sync + 'static,
{
    move |body| {
        let spec = FieldSpec::from_value(body)?;
        let schema_type = construct(&spec.type_args)?;
        let node: SchemaNode = spec.into_node(schema_type)?;
        Ok(node.into())
    }
}

/// Wrap a validator constructor into a validator builder.
///
/// The constructor must consume every key it understands and then call
/// [`Args::finish`] so stray keys are reported.
pub fn validator_with<F>(construct: F) -> impl Fn(Value) -> Result<Value, BuildError> + Send + Sync + 'static
where
    F: Fn(Args) -> Result<Validator, BuildError> + Send + Sync + 'static,
{
    move |body| Ok(Value::Validator(construct(Args::from_value(body)?)?))
}

/// Build a standard validator.
pub fn validator(rule: ValidatorTag, body: Value) -> Result<Value, BuildError> {
    let mut args = Args::from_value(body)?;
    let validator = match rule {
        ValidatorTag::Function => function(&mut args)?,
        ValidatorTag::Regex => {
            let source = args.required_string("regex")?;
            let pattern = match args.string("flags")? {
                Some(flags) => Pattern::with_flags(&source, &flags)?,
                None => Pattern::new(&source)?,
            };
            Validator::Regex {
                pattern,
                message: args.string("msg")?,
            }
        }
        ValidatorTag::Email => Validator::Email {
            message: args.string("msg")?,
        },
        ValidatorTag::Range => {
            let min = args.number("min")?;
            let max = args.number("max")?;
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(BuildError::invalid("min", format!("{lo} is greater than max {hi}")));
                }
            }
            Validator::Range {
                min,
                max,
                min_err: args.string("min_err")?,
                max_err: args.string("max_err")?,
            }
        }
        ValidatorTag::Length => {
            let min = args.count("min")?;
            let max = args.count("max")?;
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(BuildError::invalid("min", format!("{lo} is greater than max {hi}")));
                }
            }
            Validator::Length {
                min,
                max,
                min_err: args.string("min_err")?,
                max_err: args.string("max_err")?,
            }
        }
        ValidatorTag::OneOf => {
            let items = match args.required("choices")? {
                Value::Sequence(items) => items,
                other => return Err(BuildError::wrong_kind("choices", "sequence", other.kind())),
            };
            let choices = items
                .iter()
                .map(|item| item.to_json("choices"))
                .collect::<Result<_, _>>()?;
            Validator::OneOf {
                choices,
                message: args.string("msg_err")?,
            }
        }
        ValidatorTag::All => {
            let items = match args.required("validators")? {
                Value::Sequence(items) => items,
                other => return Err(BuildError::wrong_kind("validators", "sequence", other.kind())),
            };
            let validators = items
                .into_iter()
                .map(|item| match item {
                    Value::Validator(v) => Ok(v),
                    other => Err(BuildError::wrong_kind("validators", "validators", other.kind())),
                })
                .collect::<Result<_, _>>()?;
            Validator::All { validators }
        }
    };
    args.finish()?;
    Ok(validator.into())
}

fn function(args: &mut Args) -> Result<Validator, BuildError> {
    let function = match args.required("function")? {
        Value::Function(function) => function,
        other => return Err(BuildError::wrong_kind("function", "function", other.kind())),
    };
    // `message` and `msg` are both accepted; giving both is ambiguous.
    let message = match (args.string("message")?, args.string("msg")?) {
        (Some(_), Some(_)) => return Err(BuildError::invalid("msg", "conflicts with 'message'")),
        (message, msg) => message.or(msg),
    };
    Ok(Validator::Function { function, message })
}

/// Build a widget descriptor.
pub fn widget(kind: WidgetKind, body: Value) -> Result<Value, BuildError> {
    let mapping = match body {
        Value::Null => Mapping::new(),
        Value::Mapping(mapping) => mapping,
        other => return Err(BuildError::ExpectedMapping { found: other.kind() }),
    };
    Ok(Widget::from_mapping(kind, mapping)?.into())
}

/// Keyword arguments of a validator body, consumed key by key.
///
/// Null entries count as absent.
#[derive(Debug, Default)]
pub struct Args {
    mapping: Mapping,
}

impl Args {
    /// Accept a mapping body, or null as an empty one.
    pub fn from_value(body: Value) -> Result<Self, BuildError> {
        match body {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self { mapping }),
            other => Err(BuildError::ExpectedMapping { found: other.kind() }),
        }
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.mapping.take(key).filter(|v| !v.is_null())
    }

    pub fn required(&mut self, key: &'static str) -> Result<Value, BuildError> {
        self.take(key).ok_or(BuildError::MissingKey { key })
    }

    pub fn string(&mut self, key: &str) -> Result<Option<String>, BuildError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(BuildError::wrong_kind(key, "string", other.kind())),
        }
    }

    pub fn required_string(&mut self, key: &'static str) -> Result<String, BuildError> {
        self.string(key)?.ok_or(BuildError::MissingKey { key })
    }

    pub fn number(&mut self, key: &str) -> Result<Option<Number>, BuildError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(Number::Integer(i))),
            Some(Value::Float(f)) if f.is_finite() => Ok(Some(Number::Float(f))),
            Some(Value::Float(f)) => Err(BuildError::invalid(key, format!("{f} is not finite"))),
            Some(other) => Err(BuildError::wrong_kind(key, "number", other.kind())),
        }
    }

    /// A non-negative integer.
    pub fn count(&mut self, key: &str) -> Result<Option<usize>, BuildError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => usize::try_from(i)
                .map(Some)
                .map_err(|_| BuildError::invalid(key, format!("{i} is negative"))),
            Some(other) => Err(BuildError::wrong_kind(key, "integer", other.kind())),
        }
    }

    /// Fail on the first key nobody consumed.
    pub fn finish(self) -> Result<(), BuildError> {
        match self.mapping.into_iter().next() {
            Some((key, _)) => Err(BuildError::UnknownKey { key }),
            None => Ok(()),
        }
    }
}
