//! # Value Checking
//!
//! Walks a built schema tree against candidate data and reports every
//! violation with the data path where it occurred. Data is only checked,
//! never coerced: a value that passes comes back unchanged to the caller.
//!
//! A node's validator runs only when the value and everything beneath it
//! passed the type checks, so a malformed value yields one type message
//! instead of a cascade.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::Value as Json;
use tagschema_core::DocumentPath;

use crate::node::SchemaNode;
use crate::types::{parse_naive_datetime, BooleanArgs, DateArgs, DateTimeArgs, SchemaType, Unknown};

/// A single check failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Data path of the offending value, e.g. `$.contacts[1].phone`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one check, in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl SchemaNode {
    /// Check `value` against this schema.
    pub fn validate(&self, value: &Json) -> Result<(), Violations> {
        let mut walk = Walk {
            path: DocumentPath::root(),
            found: Vec::new(),
        };
        walk.node(self, Some(value));
        if walk.found.is_empty() {
            Ok(())
        } else {
            Err(Violations { violations: walk.found })
        }
    }
}

struct Walk {
    path: DocumentPath,
    found: Vec<Violation>,
}

impl Walk {
    fn report(&mut self, message: impl Into<String>) {
        self.found.push(Violation {
            path: self.path.to_string(),
            message: message.into(),
        });
    }

    fn node(&mut self, node: &SchemaNode, value: Option<&Json>) {
        // Null, absence, and a disallowed empty string all count as missing.
        let value = value.filter(|v| !v.is_null()).filter(|v| match (&node.schema_type, v) {
            (SchemaType::String(args), Json::String(s)) => args.allow_empty || !s.is_empty(),
            _ => true,
        });
        let Some(value) = value else {
            if node.is_required() {
                self.report("Required");
            }
            return;
        };

        let before = self.found.len();
        self.typed(node, value);
        if self.found.len() > before {
            return;
        }
        if let Some(validator) = &node.validator {
            if let Err(invalid) = validator.check(value) {
                for message in invalid.messages {
                    self.report(message);
                }
            }
        }
    }

    fn typed(&mut self, node: &SchemaNode, value: &Json) {
        match &node.schema_type {
            SchemaType::String(_) => {
                if !value.is_string() {
                    self.report(format!("{} is not a string", quoted(value)));
                }
            }
            SchemaType::Integer(args) => {
                let ok = match value {
                    Json::Number(n) => n.is_i64() || n.is_u64() || !args.strict,
                    Json::String(s) => s.trim().parse::<i64>().is_ok(),
                    _ => false,
                };
                if !ok {
                    self.report(format!("{} is not a number", quoted(value)));
                }
            }
            SchemaType::Float | SchemaType::Decimal(_) => {
                let ok = match value {
                    Json::Number(_) => true,
                    Json::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
                    _ => false,
                };
                if !ok {
                    self.report(format!("{} is not a number", quoted(value)));
                }
            }
            SchemaType::Boolean(args) => {
                if let Err(message) = boolean(args, value) {
                    self.report(message);
                }
            }
            SchemaType::DateTime(args) => {
                if !value.as_str().is_some_and(|s| datetime(args, s)) {
                    self.report("Invalid date");
                }
            }
            SchemaType::Date(args) => {
                if !value.as_str().is_some_and(|s| date(args, s)) {
                    self.report("Invalid date");
                }
            }
            SchemaType::Time => {
                if !value.as_str().is_some_and(time) {
                    self.report("Invalid time");
                }
            }
            SchemaType::Set => {
                if !value.is_array() {
                    self.report(format!("{} is not iterable", quoted(value)));
                }
            }
            SchemaType::Tuple => self.tuple(node, value),
            SchemaType::Sequence(args) => match value {
                Json::Array(items) => self.elements(node, items),
                scalar if args.accept_scalar => self.elements(node, std::slice::from_ref(scalar)),
                _ => self.report(format!("{} is not iterable", quoted(value))),
            },
            SchemaType::Mapping(args) => self.mapping(node, args.unknown, value),
            SchemaType::Custom(custom) => {
                if custom.composite {
                    if let Json::Object(_) = value {
                        self.mapping(node, Unknown::Ignore, value);
                    }
                }
            }
        }
    }

    fn tuple(&mut self, node: &SchemaNode, value: &Json) {
        let Json::Array(items) = value else {
            self.report(format!("{} is not iterable", quoted(value)));
            return;
        };
        if items.len() != node.children.len() {
            self.report(format!(
                "{} has an incorrect number of elements (expected {}, was {})",
                quoted(value),
                node.children.len(),
                items.len()
            ));
            return;
        }
        for (i, (child, item)) in node.children.iter().zip(items).enumerate() {
            self.path.push_index(i);
            self.node(child, Some(item));
            self.path.pop();
        }
    }

    fn elements(&mut self, node: &SchemaNode, items: &[Json]) {
        let Some(child) = node.children.first() else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.path.push_index(i);
            self.node(child, Some(item));
            self.path.pop();
        }
    }

    fn mapping(&mut self, node: &SchemaNode, unknown: Unknown, value: &Json) {
        let Json::Object(object) = value else {
            self.report(format!("{} is not a mapping type", quoted(value)));
            return;
        };
        for child in &node.children {
            self.path.push_key(child.name.clone());
            self.node(child, object.get(&child.name));
            self.path.pop();
        }
        if unknown == Unknown::Raise {
            let extra: Vec<&str> = object
                .keys()
                .map(String::as_str)
                .filter(|key| node.child(key).is_none())
                .collect();
            if !extra.is_empty() {
                self.report(format!("Unrecognized keys in mapping: {}", extra.join(", ")));
            }
        }
    }
}

fn quoted(value: &Json) -> String {
    match value {
        Json::String(s) => format!("\"{s}\""),
        other => format!("\"{other}\""),
    }
}

fn boolean(args: &BooleanArgs, value: &Json) -> Result<(), String> {
    let text = match value {
        Json::Bool(_) => return Ok(()),
        Json::String(s) => s.to_lowercase(),
        Json::Number(n) => n.to_string(),
        other => return Err(format!("{} is not a string", quoted(other))),
    };
    let listed = |choices: &[String]| choices.iter().any(|c| c.to_lowercase() == text);
    if listed(&args.false_choices) || args.true_choices.is_empty() || listed(&args.true_choices) {
        return Ok(());
    }
    Err(format!(
        "{} is neither in ({}) nor in ({})",
        quoted(value),
        args.false_choices.join(", "),
        args.true_choices.join(", ")
    ))
}

fn datetime(args: &DateTimeArgs, s: &str) -> bool {
    args.parse(s).is_some()
}

fn date(args: &DateArgs, s: &str) -> bool {
    match &args.format {
        Some(format) => NaiveDate::parse_from_str(s, format).is_ok(),
        // A full timestamp is accepted; its date part is what counts.
        None => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                || DateTime::parse_from_rfc3339(s).is_ok()
                || parse_naive_datetime(s).is_some()
        }
    }
}

fn time(s: &str) -> bool {
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .any(|f| NaiveTime::parse_from_str(s, f).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use serde_json::json;

    fn messages(schema: &SchemaNode, value: Json) -> Vec<String> {
        match schema.validate(&value) {
            Ok(()) => Vec::new(),
            Err(violations) => violations
                .into_inner()
                .into_iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }

    const PEOPLE: &str = "\
!schema
  children:
    - !field.string
      name: name
    - !field.integer
      name: rating
      missing: 3
      validator: !validator.range {min: 1, max: 5}
    - !field.sequence
      name: contacts
      missing: []
      children:
        - !field.mapping
          children:
            - !field.string
              name: phone
              validator: !validator.regex {regex: '\\d{3}-\\d{4}', msg: bad phone}
";

    #[test]
    fn clean_data_passes() {
        let schema = parse(PEOPLE).unwrap();
        assert!(schema
            .validate(&json!({"name": "Ann", "rating": 4, "contacts": [{"phone": "555-1234"}]}))
            .is_ok());
        assert!(schema.validate(&json!({"name": "Ann"})).is_ok());
    }

    #[test]
    fn violations_carry_data_paths() {
        let schema = parse(PEOPLE).unwrap();
        assert_eq!(
            messages(
                &schema,
                json!({"rating": 9, "contacts": [{"phone": "555-1234"}, {"phone": "nope"}, {}]})
            ),
            [
                "$.name: Required",
                "$.rating: 9 is greater than maximum value 5",
                "$.contacts[1].phone: bad phone",
                "$.contacts[2].phone: Required",
            ]
        );
    }

    #[test]
    fn type_failure_suppresses_validator() {
        let schema = parse(PEOPLE).unwrap();
        assert_eq!(
            messages(&schema, json!({"name": "Ann", "rating": "lots"})),
            ["$.rating: \"lots\" is not a number"]
        );
    }

    #[test]
    fn empty_string_is_missing_unless_allowed() {
        let required = parse("!field.string {name: a}").unwrap();
        assert_eq!(messages(&required, json!("")), ["$: Required"]);

        let optional = parse("!field.string {name: a, missing: ''}").unwrap();
        assert!(optional.validate(&json!("")).is_ok());

        let allowed = parse("!field.string {name: a, type_args: {allow_empty: true}}").unwrap();
        assert!(allowed.validate(&json!("")).is_ok());
    }

    #[test]
    fn tuples_check_arity_and_positions() {
        let schema = parse(
            "!field.tuple\n  children:\n    - !field.float {name: min}\n    - !field.date {name: when}\n",
        )
        .unwrap();
        assert!(schema.validate(&json!([1.5, "2024-02-29"])).is_ok());
        assert_eq!(
            messages(&schema, json!([1.5])),
            ["$: \"[1.5]\" has an incorrect number of elements (expected 2, was 1)"]
        );
        assert_eq!(messages(&schema, json!([1.5, "2023-02-29"])), ["$[1]: Invalid date"]);
    }

    #[test]
    fn unknown_keys_follow_mapping_policy() {
        let ignore = parse("!schema\n  children: [!field.string {name: a}]\n").unwrap();
        assert!(ignore.validate(&json!({"a": "x", "b": 1})).is_ok());

        let raise = parse(
            "!schema\n  type_args: {unknown: raise}\n  children: [!field.string {name: a}]\n",
        )
        .unwrap();
        assert_eq!(
            messages(&raise, json!({"a": "x", "b": 1, "c": 2})),
            ["$: Unrecognized keys in mapping: b, c"]
        );
    }

    #[test]
    fn booleans_honour_choices() {
        let strict = parse(
            "!field.boolean\n  type_args: {false_choices: ['no'], true_choices: ['yes']}\n",
        )
        .unwrap();
        assert!(strict.validate(&json!("YES")).is_ok());
        assert!(strict.validate(&json!(false)).is_ok());
        assert_eq!(
            messages(&strict, json!("maybe")),
            ["$: \"maybe\" is neither in (no) nor in (yes)"]
        );

        let loose = parse("!field.boolean {}").unwrap();
        assert!(loose.validate(&json!("anything")).is_ok());
    }

    #[test]
    fn datetimes_and_times() {
        let stamp = parse("!field.datetime {}").unwrap();
        assert!(stamp.validate(&json!("2024-05-01T12:30:00+02:00")).is_ok());
        assert!(stamp.validate(&json!("2024-05-01 12:30")).is_ok());
        assert_eq!(messages(&stamp, json!("yesterday")), ["$: Invalid date"]);

        let formatted = parse("!field.date {type_args: {format: '%d/%m/%Y'}}").unwrap();
        assert!(formatted.validate(&json!("01/05/2024")).is_ok());
        assert!(formatted.validate(&json!("2024-05-01")).is_err());

        let clock = parse("!field.time {}").unwrap();
        assert!(clock.validate(&json!("23:59:59.5")).is_ok());
        assert_eq!(messages(&clock, json!("25:00")), ["$: Invalid time"]);
    }

    #[test]
    fn sequences_may_accept_scalars() {
        let schema = parse(
            "!field.sequence\n  type_args: {accept_scalar: true}\n  children: [!field.integer {}]\n",
        )
        .unwrap();
        assert!(schema.validate(&json!(7)).is_ok());
        assert_eq!(messages(&schema, json!("x")), ["$[0]: \"x\" is not a number"]);

        let plain = parse("!field.sequence\n  children: [!field.integer {}]\n").unwrap();
        assert_eq!(messages(&plain, json!(7)), ["$: \"7\" is not iterable"]);
    }
}
