//! # Standard Tag Catalog
//!
//! The tags every registry knows out of the box, as a closed enumeration.
//! Extension tags live beside it in the registry's own map
//! (see [`Registry`](crate::Registry)).
//!
//! | Tag | Builds |
//! |---|---|
//! | `schema` | mapping node |
//! | `field.<type>` | node of `<type>` (see [`TypeKind`]) |
//! | `validator.<rule>` | [`Validator`](crate::Validator) |
//! | `widget.<kind>` | [`Widget`](crate::Widget) |

use std::fmt;

use crate::builders;
use crate::error::BuildError;
use crate::types::TypeKind;
use crate::value::Value;
use crate::widget::WidgetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValidatorTag {
    Function,
    Regex,
    Email,
    Range,
    Length,
    OneOf,
    All,
}

impl ValidatorTag {
    pub const ALL: [ValidatorTag; 7] = [
        ValidatorTag::Function,
        ValidatorTag::Regex,
        ValidatorTag::Email,
        ValidatorTag::Range,
        ValidatorTag::Length,
        ValidatorTag::OneOf,
        ValidatorTag::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Regex => "regex",
            Self::Email => "email",
            Self::Range => "range",
            Self::Length => "length",
            Self::OneOf => "one_of",
            Self::All => "all",
        }
    }
}

/// A tag of the standard catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardTag {
    /// Alias for `field.mapping`, conventionally used at the root.
    Schema,
    Field(TypeKind),
    Validator(ValidatorTag),
    Widget(WidgetKind),
}

impl StandardTag {
    /// Every standard tag, in catalog order.
    pub fn all() -> Vec<StandardTag> {
        std::iter::once(Self::Schema)
            .chain(TypeKind::ALL.into_iter().map(Self::Field))
            .chain(ValidatorTag::ALL.into_iter().map(Self::Validator))
            .chain(WidgetKind::ALL.into_iter().map(Self::Widget))
            .collect()
    }

    /// Look up a normalized tag name such as `field.string`.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == "schema" {
            return Some(Self::Schema);
        }
        let (family, name) = tag.split_once('.')?;
        match family {
            "field" => TypeKind::ALL
                .into_iter()
                .find(|k| k.as_str() == name)
                .map(Self::Field),
            "validator" => ValidatorTag::ALL
                .into_iter()
                .find(|v| v.as_str() == name)
                .map(Self::Validator),
            "widget" => WidgetKind::ALL
                .into_iter()
                .find(|w| w.as_str() == name)
                .map(Self::Widget),
            _ => None,
        }
    }

    /// Run the builder for this tag.
    pub fn build(self, body: Value) -> Result<Value, BuildError> {
        match self {
            Self::Schema => builders::field(TypeKind::Mapping, body),
            Self::Field(kind) => builders::field(kind, body),
            Self::Validator(rule) => builders::validator(rule, body),
            Self::Widget(kind) => builders::widget(kind, body),
        }
    }
}

impl fmt::Display for StandardTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
            Self::Field(kind) => write!(f, "field.{}", kind.as_str()),
            Self::Validator(rule) => write!(f, "validator.{}", rule.as_str()),
            Self::Widget(kind) => write!(f, "widget.{}", kind.as_str()),
        }
    }
}
