//! Input catalog: field descriptions and candidate API methods
//!
//! The payload read at the start of a run looks like:
//!
//! ```json
//! {
//!   "fieldDescriptions": { "email": "user email address" },
//!   "apiMethods": [ { "Name": "GetEmail", "Description": "retrieves the email address of a user" } ]
//! }
//! ```

use crate::error::{Error, Result};
use ahash::AHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Field name → description, kept in document order
///
/// A repeated key keeps its first position and takes the last description.
#[derive(Debug, Clone, Default)]
pub struct FieldDescriptions {
    entries: Vec<(String, String)>,
    /// Field name → position in `entries`
    index: AHashMap<String, usize>,
}

impl FieldDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a field description
    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) {
        let name = name.into();
        let description = description.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1 = description,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, description));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.entries.iter().map(|(_, d)| d.clone()).collect()
    }
}

impl PartialEq for FieldDescriptions {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<N, D> FromIterator<(N, D)> for FieldDescriptions
where
    N: Into<String>,
    D: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut fields = FieldDescriptions::new();
        for (name, description) in iter {
            fields.insert(name, description);
        }
        fields
    }
}

impl Serialize for FieldDescriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, description) in &self.entries {
            map.serialize_entry(name, description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldDescriptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = FieldDescriptions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping field names to description strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut fields = FieldDescriptions::with_capacity(access.size_hint().unwrap_or(0).min(4096));
                while let Some((name, description)) = access.next_entry::<String, String>()? {
                    fields.insert(name, description);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// A candidate API method
///
/// Names are not required to be unique across a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMethod {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

impl ApiMethod {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The complete input payload of one matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub field_descriptions: FieldDescriptions,
    pub api_methods: Vec<ApiMethod>,
}

impl MatchRequest {
    pub fn new(field_descriptions: FieldDescriptions, api_methods: Vec<ApiMethod>) -> Self {
        Self {
            field_descriptions,
            api_methods,
        }
    }

    /// Parse a payload; shape errors surface as `MalformedInput`
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Reject payloads with no fields or no API methods
    pub fn validate(&self) -> Result<()> {
        if self.field_descriptions.is_empty() {
            return Err(Error::EmptyInput("fieldDescriptions"));
        }
        if self.api_methods.is_empty() {
            return Err(Error::EmptyInput("apiMethods"));
        }
        Ok(())
    }

    pub fn api_descriptions(&self) -> Vec<String> {
        self.api_methods.iter().map(|api| api.description.clone()).collect()
    }
}
