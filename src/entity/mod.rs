use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// Entity is a schema-less record fetched from (or sent to) the console backend
///
/// Services, environments and stat records all share this shape: a mapping of
/// field names to JSON scalars. The backend is authoritative for validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entity from `(field, value)` pairs
    ///
    /// # Examples
    ///
    /// ```
    /// use mockconsole::entity::Entity;
    /// use serde_json::json;
    ///
    /// let env = Entity::from_fields([("name", json!("prod")), ("nbDayKeepAllData", json!(4))]);
    /// assert_eq!(env.get_str("name"), Some("prod"));
    /// assert_eq!(env.get_i64("nbDayKeepAllData"), Some(4));
    /// ```
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Identity used in `/{resource}/{id}` paths
    ///
    /// Backends send ids either as strings or as numbers; both are rendered
    /// as path segments. Null or missing ids yield `None`.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    /// Set a field, returning the previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Envelope returned by collection endpoints
///
/// Most resources answer `{"data": [...]}`; the services endpoint answers
/// `{"services": [...]}`. When both keys are present `data` wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Entity>>,
    #[serde(default)]
    pub services: Option<Vec<Entity>>,
}

impl ListEnvelope {
    /// The listed items, or `None` when the object carries neither key
    pub fn into_items(self) -> Option<Vec<Entity>> {
        self.data.or(self.services)
    }
}

/// Body of a collection response: an envelope or a bare array
///
/// Select-box endpoints such as `environments/options` answer a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody {
    Bare(Vec<Entity>),
    Envelope(ListEnvelope),
}

impl ListBody {
    pub fn into_items(self) -> Option<Vec<Entity>> {
        match self {
            ListBody::Bare(items) => Some(items),
            ListBody::Envelope(envelope) => envelope.into_items(),
        }
    }
}
