//! # Validators
//!
//! Composable rules attached to schema nodes. Validators are built from
//! `validator.*` tags and checked against candidate values by whoever
//! consumes the schema (see [`SchemaNode::validate`](crate::SchemaNode::validate)).
//!
//! ## Messages
//!
//! Every rule has a default message; documents may override it. Messages
//! are templates: `${val}`, `${min}`, `${max}`, and `${choices}` are
//! replaced at check time.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value as Json;
use thiserror::Error;

use crate::error::BuildError;
use crate::value::Number;

const FUNCTION_MSG: &str = "Invalid value";
const REGEX_MSG: &str = "String does not match expected pattern";
const EMAIL_MSG: &str = "Invalid email address";
const RANGE_MIN_MSG: &str = "${val} is less than minimum value ${min}";
const RANGE_MAX_MSG: &str = "${val} is greater than maximum value ${max}";
const LENGTH_MIN_MSG: &str = "Shorter than minimum length ${min}";
const LENGTH_MAX_MSG: &str = "Longer than maximum length ${max}";
const ONE_OF_MSG: &str = "\"${val}\" is not one of ${choices}";

/// A rejected value, with one message per failed rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .messages.join("; "))]
pub struct Invalid {
    pub messages: Vec<String>,
}

impl Invalid {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

/// A named predicate usable by `validator.function`.
#[derive(Clone)]
pub struct Function {
    name: String,
    predicate: Arc<dyn Fn(&Json) -> bool + Send + Sync>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Json) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, value: &Json) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.name).finish()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl Serialize for Function {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Behaviour of a validator contributed by an extension.
///
/// Implementations must be free of shared mutable state: the same validator
/// may be checked from several threads at once.
pub trait Check: fmt::Debug + Send + Sync {
    /// Identifier shown in exports and debug output.
    fn name(&self) -> &str;

    fn check(&self, value: &Json) -> Result<(), Invalid>;
}

/// Shared handle to an extension validator.
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Check>);

impl CustomValidator {
    pub fn new(check: impl Check + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn check(&self, value: &Json) -> Result<(), Invalid> {
        self.0.check(value)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Serialize for CustomValidator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CustomValidator", 1)?;
        state.serialize_field("name", self.name())?;
        state.end()
    }
}

/// A compiled regular expression, compared by its source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    /// Compile with flag letters: `i` (case-insensitive), `m` (multi-line),
    /// `s` (dot matches newline), `x` (verbose).
    pub fn with_flags(source: &str, flags: &str) -> Result<Self, BuildError> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                other => return Err(BuildError::invalid("flags", format!("unsupported flag {other:?}"))),
            };
        }
        Ok(Self(builder.build()?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True when the pattern matches at the start of `text`.
    pub fn matches_prefix(&self, text: &str) -> bool {
        self.0.find(text).is_some_and(|m| m.start() == 0)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A validation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    Function {
        function: Function,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Regex {
        pattern: Pattern,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Email {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Range {
        min: Option<Number>,
        max: Option<Number>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_err: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_err: Option<String>,
    },
    Length {
        min: Option<usize>,
        max: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min_err: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_err: Option<String>,
    },
    OneOf {
        /// Allowed values in declaration order.
        choices: Vec<Json>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    All {
        validators: Vec<Validator>,
    },
    Custom(CustomValidator),
}

impl Validator {
    /// Short name of the rule, for display.
    pub fn kind(&self) -> &str {
        match self {
            Self::Function { .. } => "function",
            Self::Regex { .. } => "regex",
            Self::Email { .. } => "email",
            Self::Range { .. } => "range",
            Self::Length { .. } => "length",
            Self::OneOf { .. } => "one_of",
            Self::All { .. } => "all",
            Self::Custom(custom) => custom.name(),
        }
    }

    /// Check `value` against this rule.
    pub fn check(&self, value: &Json) -> Result<(), Invalid> {
        match self {
            Self::Function { function, message } => {
                if function.call(value) {
                    Ok(())
                } else {
                    Err(fail(message.as_deref().unwrap_or(FUNCTION_MSG), value, &[]))
                }
            }
            Self::Regex { pattern, message } => match value.as_str() {
                Some(text) if pattern.matches_prefix(text) => Ok(()),
                _ => Err(fail(message.as_deref().unwrap_or(REGEX_MSG), value, &[])),
            },
            Self::Email { message } => match value.as_str() {
                Some(text) if is_email(text) => Ok(()),
                _ => Err(fail(message.as_deref().unwrap_or(EMAIL_MSG), value, &[])),
            },
            Self::Range {
                min,
                max,
                min_err,
                max_err,
            } => {
                let Some(number) = Number::from_json(value) else {
                    return Err(fail("\"${val}\" is not a number", value, &[]));
                };
                if let Some(min) = min {
                    if number < *min {
                        let template = min_err.as_deref().unwrap_or(RANGE_MIN_MSG);
                        return Err(fail(template, value, &[("min", min.to_string())]));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        let template = max_err.as_deref().unwrap_or(RANGE_MAX_MSG);
                        return Err(fail(template, value, &[("max", max.to_string())]));
                    }
                }
                Ok(())
            }
            Self::Length {
                min,
                max,
                min_err,
                max_err,
            } => {
                let len = match value {
                    Json::String(s) => s.chars().count(),
                    Json::Array(items) => items.len(),
                    Json::Object(map) => map.len(),
                    _ => return Err(fail("\"${val}\" has no length", value, &[])),
                };
                if let Some(min) = min {
                    if len < *min {
                        let template = min_err.as_deref().unwrap_or(LENGTH_MIN_MSG);
                        return Err(fail(template, value, &[("min", min.to_string())]));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        let template = max_err.as_deref().unwrap_or(LENGTH_MAX_MSG);
                        return Err(fail(template, value, &[("max", max.to_string())]));
                    }
                }
                Ok(())
            }
            Self::OneOf { choices, message } => {
                if choices.contains(value) {
                    Ok(())
                } else {
                    let listed = choices.iter().map(display).collect::<Vec<_>>().join(", ");
                    let template = message.as_deref().unwrap_or(ONE_OF_MSG);
                    Err(fail(template, value, &[("choices", listed)]))
                }
            }
            Self::All { validators } => {
                let messages: Vec<String> = validators
                    .iter()
                    .filter_map(|v| v.check(value).err())
                    .flat_map(|invalid| invalid.messages)
                    .collect();
                if messages.is_empty() {
                    Ok(())
                } else {
                    Err(Invalid { messages })
                }
            }
            Self::Custom(custom) => custom.check(value),
        }
    }
}

fn fail(template: &str, value: &Json, vars: &[(&str, String)]) -> Invalid {
    Invalid::new(interpolate(template, value, vars))
}

/// Replace `${val}` and the named `${var}` placeholders in a message.
fn interpolate(template: &str, value: &Json, vars: &[(&str, String)]) -> String {
    let mut message = template.replace("${val}", &display(value));
    for (name, replacement) in vars {
        message = message.replace(&format!("${{{name}}}"), replacement);
    }
    message
}

/// Strings render bare; everything else as JSON.
fn display(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Address check: `local@domain.tld`.
///
/// The local part allows letters, digits, and `._%+-!#$&'*/=?^`{|}~()`.
/// The domain is dot- or hyphen-separated alphanumeric labels ending in an
/// alphabetic TLD of 2 to 22 letters.
fn is_email(s: &str) -> bool {
    const LOCAL_PUNCT: &str = "._%+-!#$&'*/=?^`{|}~()";

    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_PUNCT.contains(c))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if !(2..=22).contains(&tld.len()) || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    // Labels: alphanumeric runs joined by single '.' or '-'.
    !host.is_empty()
        && host
            .split(['.', '-'])
            .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regex_matches_at_start_only() {
        let validator = Validator::Regex {
            pattern: Pattern::new(r"\d{3}-\d{4}").unwrap(),
            message: Some("bad".into()),
        };
        assert!(validator.check(&json!("555-1234")).is_ok());
        assert!(validator.check(&json!("555-1234 ext. 9")).is_ok());
        assert_eq!(validator.check(&json!("call 555-1234")), Err(Invalid::new("bad")));
        assert_eq!(validator.check(&json!(5551234)), Err(Invalid::new("bad")));
    }

    #[test]
    fn regex_flags() {
        let pattern = Pattern::with_flags("abc", "i").unwrap();
        assert!(pattern.matches_prefix("ABCdef"));
        assert!(matches!(
            Pattern::with_flags("abc", "q"),
            Err(BuildError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn email_addresses() {
        for good in ["a@example.com", "first.last+tag@mail.example.org", "x_y@sub-domain.io"] {
            assert!(is_email(good), "{good}");
        }
        for bad in ["", "no-at-sign", "@example.com", "a@", "a@example", "a@example.c", "a@exa..mple.com", "a b@example.com", "a@example.c0m"] {
            assert!(!is_email(bad), "{bad}");
        }
        let validator = Validator::Email { message: None };
        assert_eq!(
            validator.check(&json!("nope")),
            Err(Invalid::new("Invalid email address"))
        );
    }

    #[test]
    fn range_uses_custom_messages() {
        let validator = Validator::Range {
            min: Some(Number::Integer(1)),
            max: Some(Number::Integer(5)),
            min_err: Some("Rating must be >= 1".into()),
            max_err: None,
        };
        assert!(validator.check(&json!(1)).is_ok());
        assert!(validator.check(&json!(4.5)).is_ok());
        assert_eq!(validator.check(&json!(0)), Err(Invalid::new("Rating must be >= 1")));
        assert_eq!(
            validator.check(&json!(6)),
            Err(Invalid::new("6 is greater than maximum value 5"))
        );
        assert_eq!(
            validator.check(&json!("three")),
            Err(Invalid::new("\"three\" is not a number"))
        );
    }

    #[test]
    fn length_counts_characters_items_and_keys() {
        let validator = Validator::Length {
            min: Some(2),
            max: Some(3),
            min_err: None,
            max_err: None,
        };
        assert!(validator.check(&json!("héé")).is_ok());
        assert!(validator.check(&json!([1, 2])).is_ok());
        assert!(validator.check(&json!({"a": 1, "b": 2})).is_ok());
        assert_eq!(
            validator.check(&json!("a")),
            Err(Invalid::new("Shorter than minimum length 2"))
        );
        assert_eq!(
            validator.check(&json!([1, 2, 3, 4])),
            Err(Invalid::new("Longer than maximum length 3"))
        );
    }

    #[test]
    fn one_of_lists_choices_in_order() {
        let validator = Validator::OneOf {
            choices: vec![json!("red"), json!("blue"), json!("green")],
            message: None,
        };
        assert!(validator.check(&json!("blue")).is_ok());
        assert_eq!(
            validator.check(&json!("mauve")),
            Err(Invalid::new("\"mauve\" is not one of red, blue, green"))
        );
    }

    #[test]
    fn all_collects_every_failure() {
        let validator = Validator::All {
            validators: vec![
                Validator::Regex {
                    pattern: Pattern::new(r"\w+$").unwrap(),
                    message: None,
                },
                Validator::Length {
                    min: Some(8),
                    max: Some(14),
                    min_err: None,
                    max_err: None,
                },
            ],
        };
        assert!(validator.check(&json!("passcode99")).is_ok());
        let invalid = validator.check(&json!("no way")).unwrap_err();
        assert_eq!(
            invalid.messages,
            [
                "String does not match expected pattern",
                "Shorter than minimum length 8"
            ]
        );
        assert_eq!(
            invalid.to_string(),
            "String does not match expected pattern; Shorter than minimum length 8"
        );
    }

    #[test]
    fn function_uses_predicate_and_message() {
        let validator = Validator::Function {
            function: Function::new("is_cold", |v| v.as_f64().is_some_and(|t| t < 30.0)),
            message: Some("Too darn hot!".into()),
        };
        assert!(validator.check(&json!(12.5)).is_ok());
        assert_eq!(validator.check(&json!(41)), Err(Invalid::new("Too darn hot!")));
    }

    #[derive(Debug)]
    struct NeverOn(&'static str);

    impl Check for NeverOn {
        fn name(&self) -> &str {
            "never_on"
        }

        fn check(&self, value: &Json) -> Result<(), Invalid> {
            if value.as_str() == Some(self.0) {
                Err(Invalid::new(format!("Never on {}", self.0)))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn custom_validators_delegate_and_compare_by_identity() {
        let custom = CustomValidator::new(NeverOn("Sunday"));
        let validator = Validator::Custom(custom.clone());
        assert_eq!(validator.kind(), "never_on");
        assert_eq!(validator.check(&json!("Sunday")), Err(Invalid::new("Never on Sunday")));
        assert!(validator.check(&json!("Monday")).is_ok());

        assert_eq!(validator, Validator::Custom(custom));
        assert_ne!(validator, Validator::Custom(CustomValidator::new(NeverOn("Sunday"))));
    }

    #[test]
    fn validators_serialize_with_kind_tag() {
        let validator = Validator::All {
            validators: vec![
                Validator::Email { message: None },
                Validator::Custom(CustomValidator::new(NeverOn("Sunday"))),
            ],
        };
        assert_eq!(
            serde_json::to_value(&validator).unwrap(),
            json!({
                "kind": "all",
                "validators": [
                    {"kind": "email"},
                    {"kind": "custom", "name": "never_on"}
                ]
            })
        );
    }
}
