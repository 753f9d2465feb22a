//! Phase 2 of parsing: validation and signature verification
//!
//! A [`DecodedToken`] is what the parser hands back after structural decoding.
//! Nothing in it is trusted yet. It keeps the exact signing input and the raw
//! signature so that verification runs over the bytes that were received,
//! never over a re-encoding.

use std::fmt;

use crate::claims::{Claims, Validator};
use crate::error::{Error, Result};
use crate::keys::{Key, VerificationKey};
use crate::token::{Header, Token};

type HeaderCheck<'f> = Box<dyn FnOnce(&Header) -> Result<()> + 'f>;
type ClaimsCheck<'f, C> = Box<dyn FnOnce(&C) -> Result<()> + 'f>;

/// A structurally valid token whose claims and signature are not yet checked
pub struct DecodedToken<'m, C> {
    token: Token<'m, C>,
    signing_input: String,
    signature: Vec<u8>,
    validator: Validator,
}

impl<'m, C> DecodedToken<'m, C> {
    pub(crate) fn new(
        token: Token<'m, C>,
        signing_input: String,
        signature: Vec<u8>,
        validator: Validator,
    ) -> Self {
        Self {
            token,
            signing_input,
            signature,
            validator,
        }
    }

    /// The unverified token
    ///
    /// Use it to pick a key (by `kid`, issuer, ...), not to make decisions.
    pub fn token(&self) -> &Token<'m, C> {
        &self.token
    }

    /// The unverified header
    pub fn header(&self) -> &Header {
        &self.token.header
    }

    /// The unverified claims
    pub fn claims(&self) -> &C {
        &self.token.claims
    }

    /// The `header.claims` segments exactly as received
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    /// The decoded signature segment
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl<'m, C: Claims> DecodedToken<'m, C> {
    /// Validate claims and verify the signature, with no extra checks
    ///
    /// `resolve_key` receives the decoded token and returns one key or a set
    /// of candidate keys.
    pub fn validate<R, K>(self, resolve_key: R) -> Result<Token<'m, C>>
    where
        R: FnOnce(&Token<'m, C>) -> Result<K>,
        K: Into<VerificationKey>,
    {
        self.verification().run(resolve_key)
    }

    /// Start a verification with optional header and claims checks
    pub fn verification<'f>(self) -> Verification<'m, 'f, C> {
        Verification {
            decoded: self,
            header_check: None,
            claims_check: None,
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for DecodedToken<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("token", &self.token)
            .field("signing_input", &self.signing_input)
            .finish_non_exhaustive()
    }
}

/// Phase 2 configuration for a [`DecodedToken`]
///
/// Steps run in order and stop at the first failing step:
/// 1. the header check, if any
/// 2. the [`Validator`] rules (all rules run, failures are collected)
/// 3. key resolution and signature verification against each candidate
/// 4. the claims check, if any
pub struct Verification<'m, 'f, C> {
    decoded: DecodedToken<'m, C>,
    header_check: Option<HeaderCheck<'f>>,
    claims_check: Option<ClaimsCheck<'f, C>>,
}

impl<'m, 'f, C: Claims> Verification<'m, 'f, C> {
    /// Check the header before anything else
    pub fn check_header<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&Header) -> Result<()> + 'f,
    {
        self.header_check = Some(Box::new(check));
        self
    }

    /// Check the claims once the signature is verified
    pub fn check_claims<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&C) -> Result<()> + 'f,
    {
        self.claims_check = Some(Box::new(check));
        self
    }

    /// Run all steps and return the verified token
    pub fn run<R, K>(self, resolve_key: R) -> Result<Token<'m, C>>
    where
        R: FnOnce(&Token<'m, C>) -> Result<K>,
        K: Into<VerificationKey>,
    {
        let Verification {
            decoded,
            header_check,
            claims_check,
        } = self;
        let DecodedToken {
            token,
            signing_input,
            signature,
            validator,
        } = decoded;

        if let Some(check) = header_check {
            check(&token.header)?;
        }

        validator.validate(&token.claims)?;

        let keys: VerificationKey = resolve_key(&token)
            .map_err(|e| Error::TokenKeyFuncUnknown(Box::new(e)))?
            .into();
        verify_with_candidates(&token, signing_input.as_bytes(), &signature, keys.candidates())?;

        if let Some(check) = claims_check {
            check(&token.claims)?;
        }

        Ok(token)
    }
}

/// Succeeds on the first candidate that verifies
fn verify_with_candidates<C>(
    token: &Token<'_, C>,
    signing_input: &[u8],
    signature: &[u8],
    candidates: &[Key],
) -> Result<()> {
    let mut last_error = None;

    for (index, key) in candidates.iter().enumerate() {
        match token.method.verify(signing_input, signature, key) {
            Ok(()) => {
                tracing::debug!(alg = token.method.name(), index, "signature verified");
                return Ok(());
            }
            Err(e) => {
                tracing::trace!(alg = token.method.name(), index, error = %e, "key candidate rejected");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(Error::TokenSignatureInvalid(Box::new(e))),
        None => Err(Error::TokenKeyFuncUnknown(Box::new(Error::InvalidKey(
            "key resolver returned no keys".into(),
        )))),
    }
}
