//! Token construction and signing
//!
//! A [`Token`] couples a header, a claim set and the signing method that will
//! sign it. The signing input is `base64url(header) "." base64url(claims)`,
//! and that exact byte sequence is what every signing method signs.

use serde::Serialize;

use crate::algorithm::SigningMethod;
use crate::claims::MapClaims;
use crate::error::Result;
use crate::keys::Key;
use crate::token::Header;
use crate::utils::base64url;

/// A token ready to be signed, or one that passed verification
///
/// # Examples
///
/// ```ignore
/// use jwtmint::*;
///
/// let claims = RegisteredClaims::new()
///     .with_subject("user-42")
///     .with_expiration(NumericDate::from_timestamp(1_900_000_000).unwrap());
///
/// let token = Token::with_claims(&HS256, claims)
///     .signed_string(&Key::symmetric(b"secret".to_vec()))?;
/// ```
#[derive(Debug, Clone)]
pub struct Token<'m, C = MapClaims> {
    /// Header fields; `typ` and `alg` are set on construction
    pub header: Header,

    /// The claim set
    pub claims: C,

    /// The method the token is signed with
    pub method: &'m dyn SigningMethod,
}

impl<'m> Token<'m, MapClaims> {
    /// Create a token with an empty claim set
    pub fn new(method: &'m dyn SigningMethod) -> Self {
        Self::with_claims(method, MapClaims::new())
    }
}

impl<'m, C> Token<'m, C> {
    /// Create a token with the given claims
    pub fn with_claims(method: &'m dyn SigningMethod, claims: C) -> Self {
        Self {
            header: Header::new(method.name()),
            claims,
            method,
        }
    }

    /// Get the claims
    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Consume the token, keeping the claims
    pub fn into_claims(self) -> C {
        self.claims
    }
}

impl<C: Serialize> Token<'_, C> {
    /// The bytes the signature covers: `base64url(header).base64url(claims)`
    pub fn signing_bytes(&self) -> Result<Vec<u8>> {
        let header = serde_json::to_vec(&self.header)?;
        let claims = serde_json::to_vec(&self.claims)?;

        let mut out = base64url::encode(header).into_bytes();
        out.push(b'.');
        out.extend_from_slice(base64url::encode(claims).as_bytes());
        Ok(out)
    }

    /// The complete wire form: signing bytes, `.`, base64url(signature)
    pub fn signed_bytes(&self, key: &Key) -> Result<Vec<u8>> {
        let mut out = self.signing_bytes()?;
        let signature = self.method.sign(&out, key)?;
        tracing::trace!(alg = self.method.name(), "signed token");

        out.push(b'.');
        out.extend_from_slice(base64url::encode(signature).as_bytes());
        Ok(out)
    }

    /// The complete wire form as a string
    pub fn signed_string(&self, key: &Key) -> Result<String> {
        let bytes = self.signed_bytes(key)?;
        // Only base64url characters and dots are ever written
        Ok(bytes.into_iter().map(char::from).collect())
    }
}

/// Build and sign a token with a `{typ, alg}` header in one call
pub fn generate_token<C: Serialize>(
    method: &dyn SigningMethod,
    claims: C,
    key: &Key,
) -> Result<String> {
    Token::with_claims(method, claims).signed_string(key)
}
