use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;

use crate::claims::Claims;
use crate::error::{Error, Result};

type TimeFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Claim-level validation rules
///
/// Time rules (`exp`, `nbf` and, once enabled, `iat`) always run. Audience,
/// issuer and subject are only checked once an expected value is configured.
/// A `require_*` flag turns an absent claim into [`Error::ClaimRequired`].
///
/// Every rule runs; failures are collected so a caller sees all of them at
/// once (see [`validate`](Self::validate)).
///
/// # Examples
///
/// ```ignore
/// use jwtmint::*;
///
/// let validator = Validator::new()
///     .expected_issuer("https://auth.example.com")
///     .expected_audience("api")
///     .require_expiration_time()
///     .verify_issued_at();
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    time_fn: Option<TimeFn>,

    require_issuer: bool,
    require_subject: bool,
    require_audience: bool,
    require_expiration_time: bool,
    require_not_before: bool,
    require_issued_at: bool,

    verify_issued_at: bool,

    expected_issuer: Option<String>,
    expected_subject: Option<String>,
    expected_audience: Option<String>,
}

impl Validator {
    /// Create a validator that only checks present time claims
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom clock instead of the system time
    pub fn with_time_fn<F>(mut self, time_fn: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.time_fn = Some(Arc::new(time_fn));
        self
    }

    /// Require a matching `iss` claim
    pub fn expected_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Require a matching `sub` claim
    pub fn expected_subject(mut self, subject: impl Into<String>) -> Self {
        self.expected_subject = Some(subject.into());
        self
    }

    /// Require `aud` to contain this value
    pub fn expected_audience(mut self, audience: impl Into<String>) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Check that `iat` is not in the future
    pub fn verify_issued_at(mut self) -> Self {
        self.verify_issued_at = true;
        self
    }

    pub fn require_issuer(mut self) -> Self {
        self.require_issuer = true;
        self
    }

    pub fn require_subject(mut self) -> Self {
        self.require_subject = true;
        self
    }

    pub fn require_audience(mut self) -> Self {
        self.require_audience = true;
        self
    }

    pub fn require_expiration_time(mut self) -> Self {
        self.require_expiration_time = true;
        self
    }

    pub fn require_not_before(mut self) -> Self {
        self.require_not_before = true;
        self
    }

    pub fn require_issued_at(mut self) -> Self {
        self.require_issued_at = true;
        self
    }

    /// The time the rules are evaluated against
    pub fn now(&self) -> DateTime<Utc> {
        match &self.time_fn {
            Some(time_fn) => time_fn(),
            None => Utc::now(),
        }
    }

    /// Validate a claim set
    ///
    /// Returns the single failure when exactly one rule fails, and
    /// [`Error::ClaimsInvalid`] with all failures when several do.
    pub fn validate<C: Claims + ?Sized>(&self, claims: &C) -> Result<()> {
        let now = self.now();
        let mut errors = Vec::new();

        let mut check = |result: Result<()>| {
            if let Err(e) = result {
                errors.push(e);
            }
        };

        check(self.verify_expiration_time(claims, now));
        check(self.verify_not_before(claims, now));
        if self.verify_issued_at {
            check(self.verify_issued_at_claim(claims, now));
        }
        if let Some(expected) = &self.expected_audience {
            check(self.verify_audience(claims, expected));
        }
        if let Some(expected) = &self.expected_issuer {
            check(verify_string(
                claims.issuer(),
                expected,
                self.require_issuer,
                "iss",
                Error::TokenInvalidIssuer,
            ));
        }
        if let Some(expected) = &self.expected_subject {
            check(verify_string(
                claims.subject(),
                expected,
                self.require_subject,
                "sub",
                Error::TokenInvalidSubject,
            ));
        }
        check(claims.validate());

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => {
                tracing::debug!(count, "claims failed validation");
                Err(Error::ClaimsInvalid(errors))
            }
        }
    }

    /// `now` must be strictly before `exp`
    fn verify_expiration_time<C: Claims + ?Sized>(
        &self,
        claims: &C,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match claims.expiration_time()? {
            None if self.require_expiration_time => Err(Error::ClaimRequired("exp")),
            None => Ok(()),
            Some(exp) if now < exp.time() => Ok(()),
            Some(_) => Err(Error::TokenExpired),
        }
    }

    /// `nbf` must not be after `now`
    fn verify_not_before<C: Claims + ?Sized>(&self, claims: &C, now: DateTime<Utc>) -> Result<()> {
        match claims.not_before()? {
            None if self.require_not_before => Err(Error::ClaimRequired("nbf")),
            None => Ok(()),
            Some(nbf) if nbf.time() > now => Err(Error::TokenNotValidYet),
            Some(_) => Ok(()),
        }
    }

    /// `iat` must not be after `now`
    fn verify_issued_at_claim<C: Claims + ?Sized>(
        &self,
        claims: &C,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match claims.issued_at()? {
            None if self.require_issued_at => Err(Error::ClaimRequired("iat")),
            None => Ok(()),
            Some(iat) if iat.time() > now => Err(Error::TokenUsedBeforeIssued),
            Some(_) => Ok(()),
        }
    }

    fn verify_audience<C: Claims + ?Sized>(&self, claims: &C, expected: &str) -> Result<()> {
        let audience = claims.audience()?;

        // All members are compared so timing does not reveal the match position
        let mut matched = false;
        let mut all_empty = true;
        for member in &audience {
            matched |= !member.is_empty() && constant_time_eq(member.as_bytes(), expected.as_bytes());
            all_empty &= member.is_empty();
        }

        // An empty list and a list of empty strings both count as absent
        if all_empty {
            return if self.require_audience {
                Err(Error::ClaimRequired("aud"))
            } else {
                Ok(())
            };
        }

        if matched {
            Ok(())
        } else {
            Err(Error::TokenInvalidAudience)
        }
    }
}

fn verify_string(
    claim: Result<Option<&str>>,
    expected: &str,
    required: bool,
    name: &'static str,
    mismatch: Error,
) -> Result<()> {
    match claim? {
        None | Some("") if required => Err(Error::ClaimRequired(name)),
        None | Some("") => Ok(()),
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(mismatch),
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("custom_clock", &self.time_fn.is_some())
            .field("require_issuer", &self.require_issuer)
            .field("require_subject", &self.require_subject)
            .field("require_audience", &self.require_audience)
            .field("require_expiration_time", &self.require_expiration_time)
            .field("require_not_before", &self.require_not_before)
            .field("require_issued_at", &self.require_issued_at)
            .field("verify_issued_at", &self.verify_issued_at)
            .field("expected_issuer", &self.expected_issuer)
            .field("expected_subject", &self.expected_subject)
            .field("expected_audience", &self.expected_audience)
            .finish()
    }
}
