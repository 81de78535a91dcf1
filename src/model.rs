use crate::text::clean;
use serde::Serialize;
use serde_json::Value;

pub trait RecordExt {
    fn raw_text(&self) -> &str;
    fn raw_note(&self) -> &str;
    fn subfield(&self, key: &str) -> Option<&Value>;
    fn subfields(&self) -> Vec<(&str, &Value)>;

    fn text(&self) -> String {
        clean(self.raw_text())
    }

    fn note(&self) -> String {
        clean(self.raw_note())
    }

    fn subfield_text(&self, key: &str) -> String {
        self.subfield(key).map(|v| v.text()).unwrap_or_default()
    }
}

impl RecordExt for Value {
    fn raw_text(&self) -> &str {
        match self {
            Value::Object(map) => map.get("text").and_then(Value::as_str).unwrap_or(""),
            _ => "",
        }
    }

    fn raw_note(&self) -> &str {
        match self {
            Value::Object(map) => match map.get("note") {
                Some(Value::String(note)) => note,
                Some(Value::Object(inner)) => inner.get("text").and_then(Value::as_str).unwrap_or(""),
                _ => "",
            },
            _ => "",
        }
    }

    fn subfield(&self, key: &str) -> Option<&Value> {
        let map = self.as_object()?;
        if let Some(found) = map.get(key) {
            return Some(found);
        }
        map.iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(key.trim()))
            .map(|(_, v)| v)
    }

    fn subfields(&self) -> Vec<(&str, &Value)> {
        let Some(map) = self.as_object() else {
            return Vec::new();
        };
        map.iter()
            .filter(|(k, _)| !matches!(k.trim(), "text" | "note"))
            .map(|(k, v)| (k.trim(), v))
            .collect()
    }
}

pub fn subfield_with_prefix<'a>(record: &'a Value, prefix: &str) -> Option<(&'a str, &'a Value)> {
    record
        .subfields()
        .into_iter()
        .find(|(k, _)| k.to_ascii_lowercase().starts_with(&prefix.to_ascii_lowercase()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Parsed(T),
    Unparsed { raw_text: String },
}

impl<T: Default> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::Parsed(T::default())
    }
}

impl<T> Outcome<T> {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, Outcome::Unparsed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Measure {
    pub value: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_estimate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CountryRecord {
    pub code: String,
    pub data: Value,
}

impl CountryRecord {
    pub fn new(code: impl Into<String>, data: Value) -> Self {
        Self {
            code: code.into().to_ascii_uppercase(),
            data,
        }
    }

    pub fn field(&self, section: &str, field: &str) -> Option<&Value> {
        self.data.subfield(section)?.subfield(field)
    }
}
