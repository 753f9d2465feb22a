//! Claims model
//!
//! A claim set is anything implementing [`Claims`]: the six registered claim
//! accessors plus an optional self-check. Three representations ship with the
//! crate:
//! - [`MapClaims`]: an open JSON object
//! - [`RegisteredClaims`]: exactly the seven registered fields
//! - user structs marked with the [`claims`](crate::claims) attribute, which
//!   embed [`RegisteredClaims`] and may add their own validation
mod claim_strings;
mod map;
mod numeric_date;
mod registered;
mod validator;

pub use claim_strings::ClaimStrings;
pub use map::MapClaims;
pub use numeric_date::{NumericDate, DEFAULT_PRECISION};
pub use registered::RegisteredClaims;
pub use validator::Validator;

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Access to the registered claims of a claim set
///
/// Each accessor returns `Ok(None)` (or an empty [`ClaimStrings`]) when the
/// claim is absent; whether absence is acceptable is decided by the
/// [`Validator`]. An `Err` means the claim is present with the wrong type.
pub trait Claims {
    /// The `exp` claim
    fn expiration_time(&self) -> Result<Option<NumericDate>>;

    /// The `iat` claim
    fn issued_at(&self) -> Result<Option<NumericDate>>;

    /// The `nbf` claim
    fn not_before(&self) -> Result<Option<NumericDate>>;

    /// The `iss` claim
    fn issuer(&self) -> Result<Option<&str>>;

    /// The `sub` claim
    fn subject(&self) -> Result<Option<&str>>;

    /// The `aud` claim
    fn audience(&self) -> Result<ClaimStrings>;

    /// Application-specific checks, run after the built-in rules
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// How `NumericDate` and `ClaimStrings` values encode
///
/// Build claim values through one of these instead of mutating a shared
/// default, so differently configured encoders can run side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Truncation and fraction digits for time claims (default: 1 second)
    pub precision: Duration,

    /// Encode a one-element `ClaimStrings` as an array (default: true)
    pub single_string_as_array: bool,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            single_string_as_array: true,
        }
    }
}

impl EncodingOptions {
    /// Create options with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time precision
    pub fn precision(mut self, precision: Duration) -> Self {
        self.precision = precision;
        self
    }

    /// Set the one-element audience encoding
    pub fn single_string_as_array(mut self, as_array: bool) -> Self {
        self.single_string_as_array = as_array;
        self
    }

    /// A date carrying these options
    pub fn numeric_date(&self, time: DateTime<Utc>) -> NumericDate {
        NumericDate::with_precision(time, self.precision)
    }

    /// A date decoded from fractional seconds with these options
    pub fn decode_date(&self, seconds: f64) -> Option<NumericDate> {
        NumericDate::from_seconds_with_precision(seconds, self.precision)
    }

    /// A string sequence carrying these options
    pub fn claim_strings(&self, values: impl Into<ClaimStrings>) -> ClaimStrings {
        values
            .into()
            .single_string_as_array(self.single_string_as_array)
    }

    /// Re-encode every date and the audience of a registered claim set
    pub fn apply(&self, claims: &mut RegisteredClaims) {
        for date in [
            &mut claims.expiration,
            &mut claims.not_before,
            &mut claims.issued_at,
        ]
        .into_iter()
        .flatten()
        {
            *date = date.to_precision(self.precision);
        }
        claims.audience = self.claim_strings(std::mem::take(&mut claims.audience));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_are_independent() {
        let time = DateTime::from_timestamp(1_700_000_000, 123_000_000).unwrap();
        let millis = EncodingOptions::new().precision(Duration::from_millis(1));
        let seconds = EncodingOptions::new();

        assert_eq!(
            serde_json::to_string(&millis.numeric_date(time)).unwrap(),
            "1700000000.123"
        );
        assert_eq!(
            serde_json::to_string(&seconds.numeric_date(time)).unwrap(),
            "1700000000"
        );
    }

    #[test]
    fn test_decode_date_keeps_configured_precision() {
        let millis = EncodingOptions::new().precision(Duration::from_millis(1));
        let date = millis.decode_date(1_700_000_000.5).unwrap();
        assert_eq!(date.to_json_number(), "1700000000.500");

        let seconds = EncodingOptions::new().decode_date(1_700_000_000.5).unwrap();
        assert_eq!(seconds.to_json_number(), "1700000000");
    }

    #[test]
    fn test_apply() {
        let options = EncodingOptions::new().single_string_as_array(false);
        let mut claims = RegisteredClaims::new()
            .with_audience("api")
            .with_expiration(NumericDate::from_timestamp(300).unwrap());
        options.apply(&mut claims);

        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"aud":"api","exp":300}"#
        );
    }

    #[test]
    fn test_default_validate_is_noop() {
        assert!(RegisteredClaims::new().validate().is_ok());
        assert!(MapClaims::new().validate().is_ok());
    }
}
