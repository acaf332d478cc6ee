//! # Schema Types
//!
//! The data type declared by a [`SchemaNode`](crate::SchemaNode). Each
//! standard type has an argument struct decoded from the node's `type_args`
//! mapping; unknown arguments are rejected by `deny_unknown_fields`, so a
//! typo in `type_args` fails the build instead of being ignored.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::BuildError;
use crate::value::Mapping;

/// The standard type catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Date,
    Time,
    Tuple,
    Set,
    Sequence,
    Mapping,
}

impl TypeKind {
    pub const ALL: [TypeKind; 12] = [
        TypeKind::String,
        TypeKind::Integer,
        TypeKind::Float,
        TypeKind::Decimal,
        TypeKind::Boolean,
        TypeKind::DateTime,
        TypeKind::Date,
        TypeKind::Time,
        TypeKind::Tuple,
        TypeKind::Set,
        TypeKind::Sequence,
        TypeKind::Mapping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        }
    }

    /// Whether nodes of this type hold child nodes.
    pub fn takes_children(self) -> bool {
        matches!(self, Self::Tuple | Self::Sequence | Self::Mapping)
    }
}

/// A constructed data type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaType {
    String(StringArgs),
    Integer(IntegerArgs),
    Float,
    Decimal(DecimalArgs),
    Boolean(BooleanArgs),
    #[serde(rename = "datetime")]
    DateTime(DateTimeArgs),
    Date(DateArgs),
    Time,
    Tuple,
    Set,
    Sequence(SequenceArgs),
    Mapping(MappingArgs),
    /// A type contributed by an extension.
    Custom(CustomType),
}

impl SchemaType {
    /// Construct a standard type from its `type_args`.
    pub fn construct(kind: TypeKind, type_args: &Mapping) -> Result<Self, BuildError> {
        let args = type_args.to_json("type_args")?;

        let schema_type = match kind {
            TypeKind::String => Self::String(decode(args)?),
            TypeKind::Integer => Self::Integer(decode(args)?),
            TypeKind::Float => {
                decode::<NoArgs>(args)?;
                Self::Float
            }
            TypeKind::Decimal => Self::Decimal(decode::<DecimalArgs>(args)?.checked()?),
            TypeKind::Boolean => Self::Boolean(decode(args)?),
            TypeKind::DateTime => Self::DateTime(decode::<DateTimeArgs>(args)?.checked()?),
            TypeKind::Date => Self::Date(decode(args)?),
            TypeKind::Time => {
                decode::<NoArgs>(args)?;
                Self::Time
            }
            TypeKind::Tuple => {
                decode::<NoArgs>(args)?;
                Self::Tuple
            }
            TypeKind::Set => {
                decode::<NoArgs>(args)?;
                Self::Set
            }
            TypeKind::Sequence => Self::Sequence(decode(args)?),
            TypeKind::Mapping => Self::Mapping(decode(args)?),
        };
        Ok(schema_type)
    }

    /// Standard kind, or `None` for custom types.
    pub fn kind(&self) -> Option<TypeKind> {
        Some(match self {
            Self::String(_) => TypeKind::String,
            Self::Integer(_) => TypeKind::Integer,
            Self::Float => TypeKind::Float,
            Self::Decimal(_) => TypeKind::Decimal,
            Self::Boolean(_) => TypeKind::Boolean,
            Self::DateTime(_) => TypeKind::DateTime,
            Self::Date(_) => TypeKind::Date,
            Self::Time => TypeKind::Time,
            Self::Tuple => TypeKind::Tuple,
            Self::Set => TypeKind::Set,
            Self::Sequence(_) => TypeKind::Sequence,
            Self::Mapping(_) => TypeKind::Mapping,
            Self::Custom(_) => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Custom(custom) => &custom.name,
            other => other.kind().map_or("custom", TypeKind::as_str),
        }
    }

    pub fn takes_children(&self) -> bool {
        match self {
            Self::Custom(custom) => custom.composite,
            other => other.kind().is_some_and(TypeKind::takes_children),
        }
    }
}

fn decode<T: DeserializeOwned>(args: Json) -> Result<T, BuildError> {
    Ok(serde_json::from_value(args)?)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringArgs {
    /// Accept the empty string as a value rather than treating it as absent.
    pub allow_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegerArgs {
    /// Reject non-integral numbers instead of truncating them.
    pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecimalArgs {
    /// Quantum to round to, e.g. `"0.01"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounding: Option<Rounding>,
    pub normalize: bool,
}

impl DecimalArgs {
    fn checked(self) -> Result<Self, BuildError> {
        if let Some(quant) = &self.quant {
            if quant.trim().parse::<f64>().map_or(true, |q| !q.is_finite()) {
                return Err(BuildError::invalid("quant", format!("{quant:?} is not a number")));
            }
        }
        Ok(self)
    }
}

/// Decimal rounding modes, named as in the decimal arithmetic standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    #[serde(rename = "ROUND_UP")]
    Up,
    #[serde(rename = "ROUND_DOWN")]
    Down,
    #[serde(rename = "ROUND_CEILING")]
    Ceiling,
    #[serde(rename = "ROUND_FLOOR")]
    Floor,
    #[serde(rename = "ROUND_HALF_UP")]
    HalfUp,
    #[serde(rename = "ROUND_HALF_DOWN")]
    HalfDown,
    #[serde(rename = "ROUND_HALF_EVEN")]
    HalfEven,
    #[serde(rename = "ROUND_05UP")]
    ZeroFiveUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BooleanArgs {
    pub false_choices: Vec<String>,
    /// When empty, every string not in `false_choices` counts as true.
    pub true_choices: Vec<String>,
    pub false_val: String,
    pub true_val: String,
}

impl Default for BooleanArgs {
    fn default() -> Self {
        Self {
            false_choices: vec!["false".to_string(), "0".to_string()],
            true_choices: Vec::new(),
            false_val: "false".to_string(),
            true_val: "true".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateTimeArgs {
    /// Offset applied to naive datetimes: `UTC`, `Z`, or `±HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_tzinfo: Option<String>,
    /// `strftime`-style format; RFC 3339 when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl DateTimeArgs {
    fn checked(self) -> Result<Self, BuildError> {
        if let Some(tz) = &self.default_tzinfo {
            if parse_offset(tz).is_none() {
                return Err(BuildError::invalid(
                    "default_tzinfo",
                    format!("{tz:?} is not UTC, Z, or an offset like +05:30"),
                ));
            }
        }
        Ok(self)
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.default_tzinfo.as_deref().and_then(parse_offset)
    }

    /// Read `s` as an aware timestamp.
    ///
    /// Naive timestamps, and bare dates taken at midnight, are placed in
    /// `default_tzinfo`, or UTC when it is unset.
    pub fn parse(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        let naive = match &self.format {
            Some(format) => {
                if let Ok(aware) = DateTime::parse_from_str(s, format) {
                    return Some(aware);
                }
                NaiveDateTime::parse_from_str(s, format).ok()?
            }
            None => {
                if let Ok(aware) = DateTime::parse_from_rfc3339(s) {
                    return Some(aware);
                }
                parse_naive_datetime(s).or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })?
            }
        };
        let offset = self.offset().or_else(|| FixedOffset::east_opt(0))?;
        naive.and_local_timezone(offset).single()
    }
}

const NAIVE_DATETIME: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub(crate) fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

/// Parse `UTC`, `Z`, or `±HH:MM` into a fixed offset.
pub(crate) fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
        return FixedOffset::east_opt(0);
    }
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceArgs {
    /// Treat a non-sequence value as a one-element sequence.
    pub accept_scalar: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingArgs {
    pub unknown: Unknown,
}

/// What a mapping does with keys that match no child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unknown {
    #[default]
    Ignore,
    Raise,
    Preserve,
}

/// A type registered by an extension, carried as its name and arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomType {
    pub name: String,
    pub args: Json,
    /// Whether nodes of this type may hold children.
    pub composite: bool,
}

impl CustomType {
    pub fn new(name: impl Into<String>, type_args: &Mapping) -> Result<Self, BuildError> {
        let args = type_args.to_json("type_args")?;
        Ok(Self {
            name: name.into(),
            args,
            composite: false,
        })
    }

    pub fn composite(mut self) -> Self {
        self.composite = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn args(entries: &[(&str, Value)]) -> Mapping {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_args_build_defaults() {
        for kind in TypeKind::ALL {
            let schema_type = SchemaType::construct(kind, &Mapping::new()).unwrap();
            assert_eq!(schema_type.kind(), Some(kind));
            assert_eq!(schema_type.name(), kind.as_str());
        }
    }

    #[test]
    fn known_args_are_forwarded() {
        let schema_type = SchemaType::construct(
            TypeKind::Decimal,
            &args(&[
                ("quant", Value::String("0.01".into())),
                ("rounding", Value::String("ROUND_HALF_UP".into())),
            ]),
        )
        .unwrap();
        assert_eq!(
            schema_type,
            SchemaType::Decimal(DecimalArgs {
                quant: Some("0.01".into()),
                rounding: Some(Rounding::HalfUp),
                normalize: false,
            })
        );
    }

    #[test]
    fn unknown_args_are_rejected() {
        let err = SchemaType::construct(TypeKind::Float, &args(&[("precision", Value::Integer(2))]))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTypeArgs(_)));

        let err = SchemaType::construct(TypeKind::String, &args(&[("strict", Value::Bool(true))]))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTypeArgs(_)));
    }

    #[test]
    fn malformed_arg_values_are_rejected() {
        let err = SchemaType::construct(TypeKind::Decimal, &args(&[("quant", Value::String("cents".into()))]))
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument { ref key, .. } if key == "quant"));

        let err = SchemaType::construct(
            TypeKind::Mapping,
            &args(&[("unknown", Value::String("explode".into()))]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidTypeArgs(_)));
    }

    #[test]
    fn boolean_defaults_match_common_false_spellings() {
        let SchemaType::Boolean(boolean) = SchemaType::construct(TypeKind::Boolean, &Mapping::new()).unwrap() else {
            panic!("expected boolean");
        };
        assert_eq!(boolean.false_choices, ["false", "0"]);
        assert!(boolean.true_choices.is_empty());
    }

    #[test]
    fn offsets_parse() {
        assert_eq!(parse_offset("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_offset("+05:30"), FixedOffset::east_opt(5 * 3600 + 30 * 60));
        assert_eq!(parse_offset("-08:00"), FixedOffset::east_opt(-8 * 3600));
        assert_eq!(parse_offset("Mars/Olympus"), None);
        assert_eq!(parse_offset("+5:30"), None);
        assert_eq!(parse_offset("+24:00"), None);

        let err = SchemaType::construct(
            TypeKind::DateTime,
            &args(&[("default_tzinfo", Value::String("Mars/Olympus".into()))]),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument { .. }));
    }

    #[test]
    fn naive_datetimes_take_the_default_offset() {
        let kolkata = DateTimeArgs {
            default_tzinfo: Some("+05:30".into()),
            format: None,
        };
        let stamp = kolkata.parse("2024-05-01 12:30").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2024-05-01T12:30:00+05:30");

        let aware = kolkata.parse("2024-05-01T12:30:00-02:00").unwrap();
        assert_eq!(aware.offset().local_minus_utc(), -2 * 3600);

        let utc = DateTimeArgs::default();
        assert_eq!(utc.parse("2024-05-01").unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(utc.parse("yesterday"), None);
    }
}
