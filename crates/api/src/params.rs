//! Parameters and their encoding as query strings or request bodies.
use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::error::Error;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Multi-valued string pairs encoded in `application/x-www-form-urlencoded` format.
///
/// Keys are encoded in sorted order; the values of each key keep the order they were added in.
/// Escaping follows the WHATWG `application/x-www-form-urlencoded` serializer, so `~` is escaped
/// and `*` is not.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormValues(BTreeMap<String, Vec<String>>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to any values already associated with `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace any values associated with `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), vec![value.into()]);
        self
    }

    /// The first value associated with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|vs| vs.first()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    pub fn parse(input: &[u8]) -> Self {
        form_urlencoded::parse(input).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.add(k, v);
        }
        values
    }
}

/// What to send in the body of a POST request.
#[derive(Clone, Debug, Default)]
pub enum Params<T = serde_json::Value> {
    #[default]
    None,
    Form(FormValues),
    Json(T),
}

impl<T: Serialize> Params<T> {
    /// Returns the body and its content type, or `None` if there is no body.
    pub(crate) fn encode(&self) -> Result<Option<(Vec<u8>, &'static str)>, Error> {
        match self {
            Self::None => Ok(None),
            Self::Form(values) => Ok(Some((values.encode().into_bytes(), FORM_CONTENT_TYPE))),
            Self::Json(value) => {
                let body = serde_json::to_vec(value).map_err(Error::Encoding)?;
                Ok(Some((body, JSON_CONTENT_TYPE)))
            }
        }
    }
}

impl From<FormValues> for Params {
    fn from(values: FormValues) -> Self {
        Self::Form(values)
    }
}
