use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Float,
    Int,
    Bool,
    String,
}

impl FieldType {
    /// The value substituted when extraction or parsing cannot produce one.
    pub fn sentinel(self) -> FieldValue {
        match self {
            FieldType::Float => FieldValue::Float(0.0),
            FieldType::Int => FieldValue::Int(0),
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::String => FieldValue::Text(String::new()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Float => "float",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::String => "string",
        };
        f.pad(name)
    }
}

/// A typed field value. Serializes as a bare JSON number, boolean or string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Text(_) => FieldType::String,
        }
    }

    /// Numeric view used by threshold predicates and sorting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// One extracted record. Field order is the schema declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, keeping its original position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter().position(|(n, _)| *n == name) {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Declaration of one output field: where to find it and how to parse it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Tag of the `ParserRegistry` entry to invoke
    pub parser: String,
    /// Ordered selector cascade; empty means the element itself
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Read this attribute instead of the inner text
    #[serde(default)]
    pub attribute: Option<String>,
    /// Regex whose first capture group replaces the fragment
    #[serde(default)]
    pub capture: Option<String>,
    /// Regex whose matches are removed from the fragment
    #[serde(default)]
    pub strip_pattern: Option<String>,
    /// Base URL prepended to fragments starting with '/'
    #[serde(default)]
    pub prefix_relative: Option<String>,
    #[serde(default)]
    pub max_chars: Option<usize>,
    /// Literal fragment used instead of reading the DOM
    #[serde(default)]
    pub constant: Option<String>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        parser: impl Into<String>,
        selectors: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            parser: parser.into(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            attribute: None,
            capture: None,
            strip_pattern: None,
            prefix_relative: None,
            max_chars: None,
            constant: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_capture(mut self, pattern: impl Into<String>) -> Self {
        self.capture = Some(pattern.into());
        self
    }

    pub fn with_strip_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.strip_pattern = Some(pattern.into());
        self
    }

    pub fn with_prefix_relative(mut self, base: impl Into<String>) -> Self {
        self.prefix_relative = Some(base.into());
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn with_constant(mut self, value: impl Into<String>) -> Self {
        self.constant = Some(value.into());
        self
    }
}
