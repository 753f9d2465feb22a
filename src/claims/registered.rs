use serde::{Deserialize, Serialize};

use crate::claims::{ClaimStrings, Claims, NumericDate};
use crate::error::Result;

/// Registered claims as defined in RFC 7519 Section 4.1
///
/// Each of the seven fields is optional; absent fields are left out of the
/// encoded JSON. Embed this struct (flattened) in a custom claims type to get
/// the standard accessors, or use the [`claims`](crate::claims) attribute
/// which does that for you.
///
/// # Examples
///
/// ```ignore
/// use jwtmint::*;
///
/// let claims = RegisteredClaims::new()
///     .with_issuer("https://auth.example.com")
///     .with_subject("user-42")
///     .with_audience("api")
///     .with_expiration(NumericDate::from_timestamp(1_900_000_000).unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer (iss) - identifies the principal that issued the token
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Subject (sub) - identifies the principal that is the subject of the token
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Audience (aud) - identifies the recipients the token is intended for
    #[serde(rename = "aud", default, skip_serializing_if = "ClaimStrings::is_empty")]
    pub audience: ClaimStrings,

    /// Expiration Time (exp) - the token must not be accepted on or after this time
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NumericDate>,

    /// Not Before (nbf) - the token must not be accepted before this time
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<NumericDate>,

    /// Issued At (iat) - the time at which the token was issued
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<NumericDate>,

    /// JWT ID (jti) - unique identifier for the token
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub jwt_id: Option<String>,
}

impl RegisteredClaims {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<ClaimStrings>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_expiration(mut self, expiration: NumericDate) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_not_before(mut self, not_before: NumericDate) -> Self {
        self.not_before = Some(not_before);
        self
    }

    pub fn with_issued_at(mut self, issued_at: NumericDate) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn with_jwt_id(mut self, jwt_id: impl Into<String>) -> Self {
        self.jwt_id = Some(jwt_id.into());
        self
    }
}

impl Claims for RegisteredClaims {
    fn expiration_time(&self) -> Result<Option<NumericDate>> {
        Ok(self.expiration)
    }

    fn issued_at(&self) -> Result<Option<NumericDate>> {
        Ok(self.issued_at)
    }

    fn not_before(&self) -> Result<Option<NumericDate>> {
        Ok(self.not_before)
    }

    fn issuer(&self) -> Result<Option<&str>> {
        Ok(self.issuer.as_deref())
    }

    fn subject(&self) -> Result<Option<&str>> {
        Ok(self.subject.as_deref())
    }

    fn audience(&self) -> Result<ClaimStrings> {
        Ok(self.audience.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let claims = RegisteredClaims::new().with_subject("user-42");
        assert_eq!(serde_json::to_string(&claims).unwrap(), r#"{"sub":"user-42"}"#);
        assert_eq!(serde_json::to_string(&RegisteredClaims::new()).unwrap(), "{}");
    }

    #[test]
    fn test_field_order_and_names() {
        let claims = RegisteredClaims::new()
            .with_issuer("iss")
            .with_subject("sub")
            .with_audience("aud")
            .with_expiration(NumericDate::from_timestamp(300).unwrap())
            .with_not_before(NumericDate::from_timestamp(200).unwrap())
            .with_issued_at(NumericDate::from_timestamp(100).unwrap())
            .with_jwt_id("id");

        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"iss":"iss","sub":"sub","aud":["aud"],"exp":300,"nbf":200,"iat":100,"jti":"id"}"#
        );
    }

    #[test]
    fn test_decode() {
        let claims: RegisteredClaims =
            serde_json::from_str(r#"{"aud":"app1","exp":1700000000,"nbf":null,"extra":true}"#)
                .unwrap();
        assert_eq!(claims.audience, ClaimStrings::single("app1"));
        assert_eq!(
            claims.expiration_time().unwrap(),
            NumericDate::from_timestamp(1_700_000_000)
        );
        assert_eq!(claims.not_before().unwrap(), None);
        assert_eq!(claims.issuer().unwrap(), None);
    }

    #[test]
    fn test_decode_wrong_type() {
        assert!(serde_json::from_str::<RegisteredClaims>(r#"{"exp":"soon"}"#).is_err());
        assert!(serde_json::from_str::<RegisteredClaims>(r#"{"aud":[1]}"#).is_err());
    }
}
