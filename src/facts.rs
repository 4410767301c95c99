use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespaced facts about one file, keyed `Namespace:Field`.
///
/// A key never maps to `null`: inserting `null` is ignored. Serializes as a
/// plain JSON object.
///
/// ```rust
/// use filemeta::Facts;
/// use serde_json::json;
///
/// let mut facts = Facts::new();
/// facts.insert("File:MIMEType", "image/png");
/// facts.insert("Composite:Softwares", serde_json::Value::Null);
/// assert_eq!(facts.len(), 1);
/// assert_eq!(facts.get("File:MIMEType"), Some(&json!("image/png")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Facts(BTreeMap<String, Value>);

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        if !value.is_null() {
            self.0.insert(key.into(), value);
        }
    }

    /// Insert any serializable value under `key`.
    pub fn insert_serialized<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value).or_raise(|| ErrorKind::MalformedOutput(key.clone()))?;
        self.insert(key, value);
        Ok(())
    }

    /// Union with `other`; on a shared key the value from `other` wins.
    pub fn merge(&mut self, other: Facts) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Facts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut facts = Self::new();
        iter.into_iter().for_each(|(key, value)| facts.insert(key, value));
        facts
    }
}

impl IntoIterator for Facts {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
