use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token header
///
/// An open JSON object. A token built by this crate always carries `typ`
/// and `alg`; any other field (`kid`, `cty`, ...) is passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Create a `{"typ": "JWT", "alg": algorithm}` header
    pub fn new(algorithm: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("typ".into(), Value::from("JWT"));
        fields.insert("alg".into(), Value::from(algorithm));
        Self(fields)
    }

    /// Algorithm name (`alg`), if present and a string
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Token type (`typ`), if present and a string
    pub fn token_type(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Key ID (`kid`), if present and a string
    pub fn key_id(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    /// Set the key ID, builder style
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.0.insert("kid".into(), Value::String(key_id.into()));
        self
    }
}

impl Deref for Header {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Header {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
