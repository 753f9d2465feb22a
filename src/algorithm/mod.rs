//! Signing methods and the built-in algorithm registry
//!
//! Every method implements [`SigningMethod`]. The built-in methods are
//! process-wide statics; they hold no mutable state and are shared freely.
//! Parsers pick a method by name through a caller-supplied resolver, for
//! which [`signing_method_by_name`] and [`AlgorithmPolicy::resolve`] are ready
//! made.
mod traits;

pub mod ecdsa;
pub mod eddsa;
pub mod hmac;
pub mod rsa;

pub use ecdsa::SigningMethodEcdsa;
pub use eddsa::SigningMethodEd25519;
pub use hmac::SigningMethodHmac;
pub use rsa::SigningMethodRsa;
pub use traits::SigningMethod;

use crate::error::{Error, Result};

/// Digest used by a signing method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HMAC with SHA-256
pub static HS256: SigningMethodHmac = SigningMethodHmac::new("HS256", HashAlgorithm::Sha256);
/// HMAC with SHA-384
pub static HS384: SigningMethodHmac = SigningMethodHmac::new("HS384", HashAlgorithm::Sha384);
/// HMAC with SHA-512
pub static HS512: SigningMethodHmac = SigningMethodHmac::new("HS512", HashAlgorithm::Sha512);

/// RSASSA-PKCS1-v1_5 with SHA-256
pub static RS256: SigningMethodRsa = SigningMethodRsa::new("RS256", HashAlgorithm::Sha256);
/// RSASSA-PKCS1-v1_5 with SHA-384
pub static RS384: SigningMethodRsa = SigningMethodRsa::new("RS384", HashAlgorithm::Sha384);
/// RSASSA-PKCS1-v1_5 with SHA-512
pub static RS512: SigningMethodRsa = SigningMethodRsa::new("RS512", HashAlgorithm::Sha512);

/// ECDSA with P-256 and SHA-256
pub static ES256: SigningMethodEcdsa =
    SigningMethodEcdsa::new("ES256", HashAlgorithm::Sha256, 256);
/// ECDSA with P-384 and SHA-384
pub static ES384: SigningMethodEcdsa =
    SigningMethodEcdsa::new("ES384", HashAlgorithm::Sha384, 384);
/// ECDSA with P-521 and SHA-512
pub static ES512: SigningMethodEcdsa =
    SigningMethodEcdsa::new("ES512", HashAlgorithm::Sha512, 521);

/// EdDSA with Ed25519
pub static EDDSA: SigningMethodEd25519 = SigningMethodEd25519;

static REGISTRY: [&(dyn SigningMethod + 'static); 10] = [
    &HS256, &HS384, &HS512, &RS256, &RS384, &RS512, &ES256, &ES384, &ES512, &EDDSA,
];

/// Look up a built-in signing method by its `alg` name
///
/// `"none"` is always rejected.
pub fn signing_method_by_name(name: &str) -> Result<&'static dyn SigningMethod> {
    if name == "none" {
        return Err(Error::AlgorithmNoneRejected);
    }

    REGISTRY
        .iter()
        .copied()
        .find(|method| method.name() == name)
        .ok_or_else(|| Error::AlgorithmUnsupported(name.to_string()))
}

/// Names of all built-in signing methods
pub fn signing_method_names() -> Vec<&'static str> {
    REGISTRY.iter().map(|method| method.name()).collect()
}

/// Policy for allowed signing methods
///
/// Use [`resolve`](Self::resolve) as the parser's algorithm resolver to accept
/// only the methods a deployment actually issues.
#[derive(Clone)]
pub struct AlgorithmPolicy {
    allowed: Vec<&'static dyn SigningMethod>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific methods
    pub fn allow_only(methods: Vec<&'static dyn SigningMethod>) -> Self {
        Self { allowed: methods }
    }

    /// Policy that allows every built-in method
    pub fn allow_all() -> Self {
        Self::allow_only(REGISTRY.to_vec())
    }

    /// Policy that allows any HMAC method (HS256, HS384, HS512)
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![&HS256, &HS384, &HS512])
    }

    /// Policy that allows any RSA method (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only(vec![&RS256, &RS384, &RS512])
    }

    /// Policy that allows any ECDSA method (ES256, ES384, ES512)
    pub fn ecdsa_any() -> Self {
        Self::allow_only(vec![&ES256, &ES384, &ES512])
    }

    /// Resolve an `alg` header value against this policy
    pub fn resolve(&self, name: &str) -> Result<&'static dyn SigningMethod> {
        if name == "none" {
            return Err(Error::AlgorithmNoneRejected);
        }

        self.allowed
            .iter()
            .copied()
            .find(|method| method.name() == name)
            .ok_or_else(|| Error::AlgorithmNotAllowed {
                found: name.to_string(),
                allowed: self.allowed.iter().map(|m| m.name().to_string()).collect(),
            })
    }
}

impl std::fmt::Debug for AlgorithmPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.allowed.iter().map(|m| m.name()))
            .finish()
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}
