//! Presentation hints carried on schema nodes.
//!
//! Widgets are descriptors only. Nothing in this crate renders them; the
//! options are kept as plain data for whichever front end consumes the tree.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::error::BuildError;
use crate::value::{Mapping, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Checkboxes,
    Radio,
    RichText,
    Select,
    TextArea,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Checkboxes,
        WidgetKind::Radio,
        WidgetKind::RichText,
        WidgetKind::Select,
        WidgetKind::TextArea,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkboxes => "checkboxes",
            Self::Radio => "radio",
            Self::RichText => "richtext",
            Self::Select => "select",
            Self::TextArea => "textarea",
        }
    }

    /// Whether the widget offers a fixed list of values.
    pub fn has_choices(self) -> bool {
        matches!(self, Self::Checkboxes | Self::Radio | Self::Select)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub kind: WidgetKind,
    /// `(value, label)` pairs, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<(Json, String)>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Json>,
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
            options: Map::new(),
        }
    }

    /// Build a widget from its resolved arguments.
    ///
    /// `values` is accepted only by choice widgets. Each entry is either a
    /// `[value, label]` pair or a bare scalar labelled by itself. Every other
    /// key becomes an option and must be plain data.
    pub fn from_mapping(kind: WidgetKind, mut args: Mapping) -> Result<Self, BuildError> {
        let mut widget = Self::new(kind);

        if let Some(values) = args.take("values") {
            if !kind.has_choices() {
                return Err(BuildError::UnknownKey {
                    key: "values".to_string(),
                });
            }
            let Value::Sequence(items) = values else {
                return Err(BuildError::wrong_kind("values", "sequence", values.kind()));
            };
            widget.values = items.into_iter().map(choice).collect::<Result<_, _>>()?;
        }

        for (key, value) in args {
            let json = value.to_json(&key)?;
            widget.options.insert(key, json);
        }
        Ok(widget)
    }
}

fn choice(item: Value) -> Result<(Json, String), BuildError> {
    match item {
        Value::Sequence(pair) if pair.len() == 2 => {
            let [value, label]: [Value; 2] = pair
                .try_into()
                .map_err(|_| BuildError::invalid("values", "expected a [value, label] pair"))?;
            let value = value.to_json("values")?;
            let Value::String(label) = label else {
                return Err(BuildError::wrong_kind("values", "string label", label.kind()));
            };
            Ok((value, label))
        }
        Value::Sequence(_) => Err(BuildError::invalid("values", "expected a [value, label] pair")),
        Value::Null | Value::Bool(_) | Value::Integer(_) | Value::Float(_) | Value::String(_) => {
            let value = item.to_json("values")?;
            let label = match item {
                Value::String(s) => s,
                _ => value.to_string(),
            };
            Ok((value, label))
        }
        other => Err(BuildError::wrong_kind("values", "scalar or pair", other.kind())),
    }
}
