use std::ops::{Deref, DerefMut};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::claims::{ClaimStrings, Claims, NumericDate, DEFAULT_PRECISION};
use crate::error::{Error, Result};

/// Open claim set: any JSON object
///
/// Registered claims are read by their wire names (`exp`, `iss`, ...) and
/// coerced on access. A time claim set to `0` or `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(Map<String, Value>);

impl MapClaims {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Consume into the underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn numeric_date(&self, key: &str) -> Result<Option<NumericDate>> {
        self.numeric_date_with(key, DEFAULT_PRECISION)
    }

    /// A time claim decoded with `precision` instead of whole seconds
    ///
    /// `0` and `null` count as absent, as for the registered accessors.
    pub fn numeric_date_with(&self, key: &str, precision: Duration) -> Result<Option<NumericDate>> {
        let number = match self.0.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(number)) => number,
            Some(_) => return Err(Error::InvalidClaimType(key.to_string())),
        };

        let date = if let Some(seconds) = number.as_i64() {
            if seconds == 0 {
                return Ok(None);
            }
            NumericDate::from_timestamp(seconds).map(|date| date.to_precision(precision))
        } else {
            match number.as_f64() {
                Some(seconds) if seconds == 0.0 => return Ok(None),
                Some(seconds) => NumericDate::from_seconds_with_precision(seconds, precision),
                None => None,
            }
        };

        date.map(Some)
            .ok_or_else(|| Error::InvalidClaimType(key.to_string()))
    }

    fn string(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(Error::InvalidClaimType(key.to_string())),
        }
    }

    fn claim_strings(&self, key: &str) -> Result<ClaimStrings> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(ClaimStrings::empty()),
            Some(Value::String(value)) => Ok(ClaimStrings::single(value.as_str())),
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    value
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| Error::InvalidClaimType(key.to_string()))
                })
                .collect::<Result<Vec<_>>>()
                .map(ClaimStrings::from),
            Some(_) => Err(Error::InvalidClaimType(key.to_string())),
        }
    }
}

impl Deref for MapClaims {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MapClaims {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for MapClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapClaims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Claims for MapClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("exp")
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("iat")
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        self.numeric_date("nbf")
    }

    fn issuer(&self) -> Result<Option<&str>> {
        self.string("iss")
    }

    fn subject(&self) -> Result<Option<&str>> {
        self.string("sub")
    }

    fn audience(&self) -> Result<ClaimStrings> {
        self.claim_strings("aud")
    }
}
