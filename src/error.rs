//! Error types for token signing, parsing and validation
//!
//! Errors are classified by [`ErrorKind`]. A single error can belong to more
//! than one kind: an ECDSA verification failure is both an algorithm-specific
//! failure and a generic [`ErrorKind::SignatureInvalid`]. Use [`Error::is`] to
//! branch on a kind instead of matching variants.

use thiserror::Error;

/// jwtmint errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("token is malformed: {0}")]
    TokenMalformed(String),

    #[error("segment is not valid unpadded base64url: {0}")]
    MalformedSegment(String),

    #[error("failed to encode JSON: {0}")]
    Json(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    #[error("the 'none' algorithm is rejected")]
    AlgorithmNoneRejected,

    #[error("algorithm '{found}' is not allowed, expected one of {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    #[error("the requested hash function is unavailable: {0}")]
    HashUnavailable(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("key is of invalid type for {algorithm}: expected {expected}, got {actual}")]
    InvalidKeyType {
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("key is invalid: {0}")]
    InvalidKey(String),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("signature is invalid")]
    SignatureInvalid,

    #[error("ecdsa: verification error")]
    EcdsaVerification,

    #[error("ed25519: verification error")]
    Ed25519Verification,

    #[error("token signature is invalid: {0}")]
    TokenSignatureInvalid(Box<Error>),

    #[error("token key func unknown: {0}")]
    TokenKeyFuncUnknown(Box<Error>),

    // ============================================================================
    // Claim Errors
    // ============================================================================
    #[error("claim is required: {0}")]
    ClaimRequired(&'static str),

    #[error("invalid type for claim '{0}'")]
    InvalidClaimType(String),

    #[error("token is expired")]
    TokenExpired,

    #[error("token used before issued")]
    TokenUsedBeforeIssued,

    #[error("token is not valid yet")]
    TokenNotValidYet,

    #[error("token has invalid audience")]
    TokenInvalidAudience,

    #[error("token has invalid issuer")]
    TokenInvalidIssuer,

    #[error("token has invalid subject")]
    TokenInvalidSubject,

    #[error("token has invalid claims: {}", join_messages(.0))]
    ClaimsInvalid(Vec<Error>),

    #[error("{0}")]
    Custom(String),
}

/// Classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TokenMalformed,
    MalformedSegment,
    Json,
    AlgorithmUnsupported,
    AlgorithmNotAllowed,
    HashUnavailable,
    InvalidKeyType,
    InvalidKey,
    SignatureInvalid,
    EcdsaVerification,
    Ed25519Verification,
    TokenSignatureInvalid,
    TokenKeyFuncUnknown,
    ClaimRequired,
    InvalidClaimType,
    TokenExpired,
    TokenUsedBeforeIssued,
    TokenNotValidYet,
    TokenInvalidAudience,
    TokenInvalidIssuer,
    TokenInvalidSubject,
    TokenInvalidClaims,
    Custom,
}

impl Error {
    /// Create a caller-defined error, typically from a header or claims check
    pub fn custom(message: impl Into<String>) -> Self {
        Error::Custom(message.into())
    }

    /// The primary kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TokenMalformed(_) => ErrorKind::TokenMalformed,
            Error::MalformedSegment(_) => ErrorKind::MalformedSegment,
            Error::Json(_) => ErrorKind::Json,
            Error::AlgorithmUnsupported(_) | Error::AlgorithmNoneRejected => {
                ErrorKind::AlgorithmUnsupported
            }
            Error::AlgorithmNotAllowed { .. } => ErrorKind::AlgorithmNotAllowed,
            Error::HashUnavailable(_) => ErrorKind::HashUnavailable,
            Error::InvalidKeyType { .. } => ErrorKind::InvalidKeyType,
            Error::InvalidKey(_) => ErrorKind::InvalidKey,
            Error::SignatureInvalid => ErrorKind::SignatureInvalid,
            Error::EcdsaVerification => ErrorKind::EcdsaVerification,
            Error::Ed25519Verification => ErrorKind::Ed25519Verification,
            Error::TokenSignatureInvalid(_) => ErrorKind::TokenSignatureInvalid,
            Error::TokenKeyFuncUnknown(_) => ErrorKind::TokenKeyFuncUnknown,
            Error::ClaimRequired(_) => ErrorKind::ClaimRequired,
            Error::InvalidClaimType(_) => ErrorKind::InvalidClaimType,
            Error::TokenExpired => ErrorKind::TokenExpired,
            Error::TokenUsedBeforeIssued => ErrorKind::TokenUsedBeforeIssued,
            Error::TokenNotValidYet => ErrorKind::TokenNotValidYet,
            Error::TokenInvalidAudience => ErrorKind::TokenInvalidAudience,
            Error::TokenInvalidIssuer => ErrorKind::TokenInvalidIssuer,
            Error::TokenInvalidSubject => ErrorKind::TokenInvalidSubject,
            Error::ClaimsInvalid(_) => ErrorKind::TokenInvalidClaims,
            Error::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Check whether this error belongs to `kind`
    ///
    /// Wrapping errors report their own kind as well as every kind of the
    /// errors they carry, so a failed phase-2 verification is at the same time
    /// [`ErrorKind::TokenMalformed`], [`ErrorKind::TokenSignatureInvalid`] and,
    /// when the signature did not match, [`ErrorKind::SignatureInvalid`].
    pub fn is(&self, kind: ErrorKind) -> bool {
        if self.kind() == kind {
            return true;
        }

        match self {
            Error::MalformedSegment(_) => kind == ErrorKind::TokenMalformed,
            Error::EcdsaVerification | Error::Ed25519Verification => {
                kind == ErrorKind::SignatureInvalid
            }
            Error::TokenSignatureInvalid(inner) => {
                kind == ErrorKind::TokenMalformed || inner.is(kind)
            }
            Error::TokenKeyFuncUnknown(inner) => inner.is(kind),
            Error::ClaimsInvalid(errors) => errors.iter().any(|e| e.is(kind)),
            _ => false,
        }
    }

    /// The individual errors behind an aggregate, or this error alone
    pub fn errors(&self) -> &[Error] {
        match self {
            Error::ClaimsInvalid(errors) => errors,
            other => std::slice::from_ref(other),
        }
    }
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

/// Result type alias for jwtmint operations
pub type Result<T> = std::result::Result<T, Error>;
