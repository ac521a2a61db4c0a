//! Option records as reported by the evaluator.
//!
//! The evaluator prints one JSON object mapping option name to
//! `{type, description, default, ...}`. Key order in that object is the
//! rendering order, so the response is kept in an [`IndexMap`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EvaluatorError;

/// Option kind the evaluator reports when it cannot describe the type.
/// Records of this kind are never rendered.
pub const UNKNOWN_KIND: &str = "unknown";

/// Ordered mapping from option key to its record, in evaluator output order.
pub type EvaluatorResponse = IndexMap<String, OptionRecord>;

/// One option as described by the evaluator.
///
/// Fields the evaluator emits beyond these three (declarations, example,
/// `readOnly`, `loc`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Option type as a human-readable string (`"boolean"`, `"list of string"`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Option description, possibly empty.
    ///
    /// Older nixpkgs report `lib.mdDoc` descriptions as
    /// `{ "_type": "mdDoc", "text": "..." }`; only `text` is kept.
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl OptionRecord {
    /// Returns `true` when the evaluator could not determine the option type.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.kind.as_deref() == Some(UNKNOWN_KIND)
    }

    /// Flattens this record into the plain strings a template receives.
    #[must_use]
    pub fn fields(&self, key: &str) -> OptionFields {
        OptionFields {
            key: key.to_string(),
            kind: self.kind.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            default: self
                .default
                .as_ref()
                .map(DefaultValue::as_text)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// An option default: either a plain value or a rendered literal.
///
/// `lib.optionAttrSetToDocList` reports defaults as
/// `{ "_type": "literalExpression", "text": "..." }`; only `text` is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// A JSON string, or the compact JSON text of any other non-object value.
    Scalar(String),
    /// An object carrying a textual representation under `text`.
    Structured {
        /// Nested text, empty when the object has no `text` field.
        text: String,
    },
}

impl DefaultValue {
    /// The string substituted into templates.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Scalar(s) | Self::Structured { text: s } => s,
        }
    }

    /// Consumes the value, returning its template string.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Scalar(s) | Self::Structured { text: s } => s,
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Object(mut map) => {
                let text = match map.remove("text") {
                    Some(Value::String(s)) => s,
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                Self::Structured { text }
            }
            other => Self::Scalar(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Decodes a string field that may also arrive as a `{ "text": ... }` object.
fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| DefaultValue::from(v).into_text()))
}

/// The four fields handed to an option template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionFields {
    /// Option name, e.g. `services.foo.enable`.
    pub key: String,
    /// Option type, exposed to templates as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Option description.
    pub description: String,
    /// Resolved default.
    pub default: String,
}

/// Decodes evaluator standard output into an ordered response.
///
/// # Errors
///
/// Returns [`EvaluatorError::Decode`] if `stdout` is not a JSON object whose
/// values are option records.
pub fn parse_response(stdout: &[u8]) -> Result<EvaluatorResponse, EvaluatorError> {
    Ok(serde_json::from_slice(stdout)?)
}
