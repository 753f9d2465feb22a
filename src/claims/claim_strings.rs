//! `ClaimStrings`: a claim that is either one string or an array of strings
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A sequence of strings, e.g. the `aud` claim
///
/// Decoding accepts a bare string, an array of strings or `null` (empty).
/// A one-element sequence encodes as an array unless the value was built
/// with `single_string_as_array` turned off, in which case it encodes as a
/// bare string. Equality only looks at the strings.
#[derive(Debug, Clone, Default)]
pub struct ClaimStrings {
    values: Vec<String>,
    single_as_string: bool,
}

/// Wire shape: either one item or a list
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl ClaimStrings {
    /// An empty sequence
    pub const fn empty() -> Self {
        Self {
            values: Vec::new(),
            single_as_string: false,
        }
    }

    /// A sequence holding one string
    pub fn single(value: impl Into<String>) -> Self {
        Self::from(vec![value.into()])
    }

    /// Choose how a one-element sequence encodes
    ///
    /// `true` (the default) writes `["a"]`, `false` writes `"a"`.
    pub fn single_string_as_array(mut self, as_array: bool) -> Self {
        self.single_as_string = !as_array;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The strings in order
    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    /// Consume into the underlying strings
    pub fn into_vec(self) -> Vec<String> {
        self.values
    }
}

impl Deref for ClaimStrings {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl PartialEq for ClaimStrings {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for ClaimStrings {}

impl From<Vec<String>> for ClaimStrings {
    fn from(values: Vec<String>) -> Self {
        Self {
            values,
            single_as_string: false,
        }
    }
}

impl From<&str> for ClaimStrings {
    fn from(value: &str) -> Self {
        Self::single(value)
    }
}

impl From<String> for ClaimStrings {
    fn from(value: String) -> Self {
        Self::single(value)
    }
}

impl<const N: usize> From<[&str; N]> for ClaimStrings {
    fn from(values: [&str; N]) -> Self {
        Self::from(values.iter().map(|v| v.to_string()).collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a ClaimStrings {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Serialize for ClaimStrings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.values.as_slice() {
            [single] if self.single_as_string => single.serialize(serializer),
            values => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ClaimStrings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = match Option::<OneOrMany<String>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::One(value)) => vec![value],
            Some(OneOrMany::Many(values)) => values,
        };
        Ok(Self::from(values))
    }
}
