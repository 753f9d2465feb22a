//! Two-phase token parsing
//!
//! [`Parser::parse`] performs phase 1: it splits the wire string, decodes the
//! header, resolves the announced algorithm, decodes the claims and the
//! signature. Structural failures stop here. The returned [`DecodedToken`]
//! carries phase 2 (claims validation and signature verification), run once
//! the caller knows which key to use.
//!
//! ```ignore
//! use jwtmint::*;
//!
//! let parser = Parser::with_validator(Validator::new().expected_issuer("auth"));
//! let token = parser
//!     .parse(&wire, signing_method_by_name)?
//!     .validate(|token| match token.header.key_id() {
//!         Some("2024") => Ok(current_key.clone()),
//!         _ => Err(Error::custom("unknown kid")),
//!     })?;
//! ```

use serde::de::DeserializeOwned;

use crate::algorithm::SigningMethod;
use crate::claims::{MapClaims, Validator};
use crate::error::{Error, Result};
use crate::token::{DecodedToken, Header, Token};
use crate::utils::base64url;

/// Token parser holding the claim validation rules
#[derive(Debug, Clone)]
pub struct Parser {
    validator: Validator,
}

impl Default for Parser {
    /// Audience, issuer and subject are required once an expected value is set
    fn default() -> Self {
        Self::with_validator(
            Validator::new()
                .require_audience()
                .require_issuer()
                .require_subject(),
        )
    }
}

impl Parser {
    /// Create a parser with the default rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom rules
    pub fn with_validator(validator: Validator) -> Self {
        Self { validator }
    }

    /// The rules applied in phase 2
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Decode a token into open [`MapClaims`]
    pub fn parse<'m, R>(&self, token: &str, resolve_alg: R) -> Result<DecodedToken<'m, MapClaims>>
    where
        R: FnOnce(&str) -> Result<&'m dyn SigningMethod>,
    {
        self.parse_with_claims(token, resolve_alg)
    }

    /// Decode a token into a caller-chosen claims type
    ///
    /// `resolve_alg` maps the header's `alg` to a signing method; its error is
    /// returned unchanged.
    pub fn parse_with_claims<'m, C, R>(
        &self,
        token: &str,
        resolve_alg: R,
    ) -> Result<DecodedToken<'m, C>>
    where
        C: DeserializeOwned,
        R: FnOnce(&str) -> Result<&'m dyn SigningMethod>,
    {
        let parts: Vec<&str> = token.split('.').collect();
        let &[header_b64, claims_b64, signature_b64] = parts.as_slice() else {
            return Err(Error::TokenMalformed(format!(
                "token contains an invalid number of segments: {}",
                parts.len()
            )));
        };

        let header_json = base64url::decode(header_b64)?;
        let header: Header = serde_json::from_slice(&header_json)
            .map_err(|e| Error::TokenMalformed(format!("could not JSON decode header: {e}")))?;

        if header.token_type() != Some("JWT") {
            return Err(Error::TokenMalformed("header 'typ' must be \"JWT\"".into()));
        }
        let alg = header
            .algorithm()
            .ok_or_else(|| Error::TokenMalformed("header 'alg' must be a string".into()))?;

        let method = resolve_alg(alg)?;
        tracing::debug!(alg, "resolved signing method");

        let claims_json = base64url::decode(claims_b64)?;
        let claims: C = serde_json::from_slice(&claims_json)
            .map_err(|e| Error::TokenMalformed(format!("could not JSON decode claims: {e}")))?;

        let signature = base64url::decode(signature_b64)?;

        let token = Token {
            header,
            claims,
            method,
        };
        let signing_input = format!("{header_b64}.{claims_b64}");

        Ok(DecodedToken::new(
            token,
            signing_input,
            signature,
            self.validator.clone(),
        ))
    }
}
