//! Request body encoding: flat payloads to `application/x-www-form-urlencoded`
//! or JSON text.

use std::fmt;

use url::form_urlencoded;

use super::headers::ContentType;

/// Scalar value of a payload field or header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Text(value) => serde_json::Value::String(value.clone()),
            FieldValue::Integer(value) => serde_json::Value::from(*value),
            FieldValue::Bool(value) => serde_json::Value::Bool(*value),
        }
    }
}

/// Ordered flat mapping of field name to value. `None` marks an undefined field,
/// which is kept here but never encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    fields: Vec<(String, Option<FieldValue>)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), Some(value.into())));
    }

    pub fn push_opt<V: Into<FieldValue>>(&mut self, name: impl Into<String>, value: Option<V>) {
        self.fields.push((name.into(), value.map(Into::into)));
    }

    /// Defined fields in insertion order.
    pub fn defined(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name.as_str(), value)))
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for Payload
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (name, value) in iter {
            payload.push_opt(name, value);
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Sent as-is regardless of the target encoding.
    Scalar(FieldValue),
    Fields(Payload),
}

impl From<Payload> for RequestBody {
    fn from(value: Payload) -> Self {
        Self::Fields(value)
    }
}

/// Encoding chosen for a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyTarget {
    Form,
    #[default]
    Json,
}

impl BodyTarget {
    /// `Content-Type` matching this encoding.
    pub fn content_type(self) -> ContentType {
        match self {
            Self::Form => ContentType::FormUrlEncoded,
            Self::Json => ContentType::Json,
        }
    }
}

/// Serialize `body` for `target`. Deterministic and infallible.
pub fn serialize_body(body: &RequestBody, target: BodyTarget) -> String {
    match body {
        RequestBody::Scalar(value) => value.to_string(),
        RequestBody::Fields(payload) => match target {
            BodyTarget::Form => encode_form(payload),
            BodyTarget::Json => encode_json(payload),
        },
    }
}

fn encode_form(payload: &Payload) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in payload.defined() {
        serializer.append_pair(name, &value.to_string());
    }
    serializer.finish()
}

fn encode_json(payload: &Payload) -> String {
    let object = payload
        .defined()
        .map(|(name, value)| (name.to_owned(), serde_json::Value::from(value)))
        .collect::<serde_json::Map<String, serde_json::Value>>();
    serde_json::Value::Object(object).to_string()
}
