use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Data type of a project field, as reported by GitHub (`dataType`).
///
/// Only the first three variants can be turned into an update; everything else
/// keeps its raw type name so diagnostics can show it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldDataType {
    Text,
    Number,
    SingleSelect,
    Unsupported(String),
}

impl FieldDataType {
    pub fn from_github(raw: &str) -> Self {
        match raw {
            "TEXT" => Self::Text,
            "NUMBER" => Self::Number,
            "SINGLE_SELECT" => Self::SingleSelect,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::SingleSelect => "SINGLE_SELECT",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for FieldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldDataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldDataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_github(&raw))
    }
}

/// One choice of a single-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: String,
    pub name: String,
}

/// A custom field configured on a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    pub name: String,
    pub data_type: FieldDataType,
    /// Declared options, in board order. Empty unless `data_type` is single-select.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: FieldDataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            options: Vec::new(),
        }
    }

    /// Convenience constructor for single-select fields from `(id, name)` pairs.
    pub fn single_select<I, K, V>(id: impl Into<String>, name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut field = Self::new(id, name, FieldDataType::SingleSelect);
        field.options = options
            .into_iter()
            .map(|(id, name)| FieldOption {
                id: id.into(),
                name: name.into(),
            })
            .collect();
        field
    }

    /// Option whose name equals `name` exactly (case-sensitive, whole string).
    pub fn option_named(&self, name: &str) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.name == name)
    }

    pub fn option_names(&self) -> Vec<String> {
        self.options.iter().map(|option| option.name.clone()).collect()
    }
}

/// Typed value of a resolved field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    Text(String),
    Number(String),
    SingleSelect { option_id: String },
}

impl ResolvedValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "TEXT",
            Self::Number(_) => "NUMBER",
            Self::SingleSelect { .. } => "SINGLE_SELECT",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text(value) | Self::Number(value) => Some(value),
            Self::SingleSelect { .. } => None,
        }
    }

    pub fn option_id(&self) -> Option<&str> {
        match self {
            Self::SingleSelect { option_id } => Some(option_id),
            Self::Text(_) | Self::Number(_) => None,
        }
    }
}

/// A field update ready for the creation payload.
///
/// Serializes as `{ field_id, field_type, value }` for text/number fields and
/// `{ field_id, field_type, option_id }` for single-select fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFieldUpdate {
    pub field_id: String,
    pub value: ResolvedValue,
}

impl Serialize for ResolvedFieldUpdate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ResolvedFieldUpdate", 3)?;
        state.serialize_field("field_id", &self.field_id)?;
        state.serialize_field("field_type", self.value.type_name())?;
        match &self.value {
            ResolvedValue::Text(value) | ResolvedValue::Number(value) => {
                state.serialize_field("value", value)?;
            }
            ResolvedValue::SingleSelect { option_id } => {
                state.serialize_field("option_id", option_id)?;
            }
        }
        state.end()
    }
}

/// Field name to value mapping authored for one issue.
///
/// Entries keep their declaration order; resolution output follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValueRequest {
    entries: Vec<(String, String)>,
}

impl FieldValueRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated name replaces the earlier value in place.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldValueRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (name, value) in iter {
            request.insert(name, value);
        }
        request
    }
}

impl Serialize for FieldValueRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One field value as written in the configuration file.
///
/// YAML scalars are taken verbatim (`1.10` stays `1.10`, `007` stays `007`) and
/// a null value becomes an empty string. Formats that only hand out typed
/// scalars, such as TOML, are stringified; floats keep their decimal point.
struct FieldValue(String);

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a scalar field value")
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue(String::new()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue(String::new()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(FieldValue(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(FieldValue(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(FieldValue(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(FieldValue(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(FieldValue(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // Debug keeps the fraction on whole floats: 2.0 renders as "2.0", not "2".
        Ok(FieldValue(format!("{value:?}")))
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(FieldValueVisitor)
    }
}

struct FieldValueRequestVisitor;

impl<'de> Visitor<'de> for FieldValueRequestVisitor {
    type Value = FieldValueRequest;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a mapping of project field names to values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut request = FieldValueRequest::new();
        while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
            if request.get(&name).is_some() {
                return Err(de::Error::custom(format!("duplicate field `{name}` in fields")));
            }
            request.entries.push((name, value.0));
        }
        Ok(request)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(FieldValueRequest::new())
    }
}

impl<'de> Deserialize<'de> for FieldValueRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FieldValueRequestVisitor)
    }
}
