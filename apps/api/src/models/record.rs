//! Parsed resume record: an insertion-ordered mapping from a closed set of
//! field names to text or list values.
//!
//! Section extraction, entity extraction and the final merged result all use
//! `Record`. Absent fields are simply not present; there are no null placeholders.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Every key a record can carry, in the order the pipeline produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Skills,
    Education,
    Experience,
    Email,
    Phone,
    Name,
    Organizations,
    Dates,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Skills,
        Field::Education,
        Field::Experience,
        Field::Email,
        Field::Phone,
        Field::Name,
        Field::Organizations,
        Field::Dates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Skills => "Skills",
            Field::Education => "Education",
            Field::Experience => "Experience",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Name => "Name",
            Field::Organizations => "Organizations",
            Field::Dates => "Dates",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// A field value: a single string, or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Single-cell rendering used by the CSV export: lists are joined with `", "`.
    pub fn flatten(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    #[cfg(test)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    #[cfg(test)]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(Field, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, field: Field, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Builder form of [`Record::insert`].
    #[cfg(test)]
    pub fn with(mut self, field: Field, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    #[cfg(test)]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key union of `self` and `right`. Keys keep first-insertion order; on a
    /// collision the value from `right` wins.
    pub fn merge(mut self, right: Record) -> Record {
        for (field, value) in right.entries {
            self.insert(field, value);
        }
        self
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of resume fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some(key) = access.next_key::<String>()? {
                    let field = key.parse::<Field>().map_err(de::Error::custom)?;
                    let value = access.next_value::<FieldValue>()?;
                    record.insert(field, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
