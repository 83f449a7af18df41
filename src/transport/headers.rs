//! Request header composition.

use std::collections::BTreeMap;
use std::fmt;

use super::body::FieldValue;

/// Canonical header map sent with a request.
pub type HeaderMap = BTreeMap<String, String>;

pub const CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentType {
    Json,
    FormUrlEncoded,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed header configuration: a mandatory `Content-Type` plus extra entries.
///
/// Extra entries may be undefined (`None`); [`RequestHeaders::compose`] drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    content_type: ContentType,
    extra: Vec<(String, Option<FieldValue>)>,
}

impl RequestHeaders {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            extra: Vec::new(),
        }
    }

    /// Add an entry. A `Content-Type` entry (any casing) replaces the content type.
    pub fn with(self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with_opt(name, Some(value))
    }

    pub fn with_opt<V: Into<FieldValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        let name = name.into();
        let value = value.map(Into::into);
        if name.eq_ignore_ascii_case(CONTENT_TYPE) {
            if let Some(value) = value {
                self.content_type = ContentType::parse(&value.to_string());
            }
            return self;
        }
        self.extra.push((name, value));
        self
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Drop undefined entries and stringify the rest. Later entries win on
    /// duplicate names.
    pub fn compose(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE.to_owned(), self.content_type.as_str().to_owned());
        for (name, value) in &self.extra {
            if let Some(value) = value {
                headers.insert(name.clone(), value.to_string());
            }
        }
        headers
    }
}

impl From<&HeaderMap> for RequestHeaders {
    /// Lift an already-composed map back into a configuration. A map without
    /// `Content-Type` is treated as JSON.
    fn from(map: &HeaderMap) -> Self {
        map.iter().fold(
            Self::new(ContentType::Json),
            |headers, (name, value)| headers.with(name.clone(), value.as_str()),
        )
    }
}

/// Force `Content-Type` to `content_type`, removing entries that differ only by casing.
pub fn set_content_type(headers: &mut HeaderMap, content_type: &ContentType) {
    headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
    headers.insert(CONTENT_TYPE.to_owned(), content_type.as_str().to_owned());
}
