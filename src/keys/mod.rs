//! Key types for signing and verification
//!
//! This module provides a type-safe abstraction over the key material each
//! signing method family accepts:
//! - Symmetric secrets (HMAC)
//! - RSA key pairs and public keys
//! - ECDSA key pairs and public points
//! - Ed25519 public keys, and [`Signer`] implementations for private keys
//!
//! Keys are built from already materialized DER buffers; reading PEM files or
//! environment variables is left to the caller.
use std::fmt;
use std::sync::Arc;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    self, EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair, RsaKeyPair,
};

use crate::error::{Error, Result};

/// A key that can be used to sign or verify a token
#[derive(Clone)]
pub enum Key {
    /// Symmetric secret for HMAC algorithms
    Symmetric(SymmetricKey),

    /// RSA private key for RS256/RS384/RS512 signing
    RsaPrivate(RsaPrivateKey),

    /// RSA public key for RS256/RS384/RS512 verification
    RsaPublic(RsaPublicKey),

    /// ECDSA private key for ES256/ES384/ES512 signing
    EcdsaPrivate(EcdsaPrivateKey),

    /// ECDSA public key for ES256/ES384/ES512 verification
    EcdsaPublic(EcdsaPublicKey),

    /// Ed25519 public key for EdDSA verification
    Ed25519Public(Ed25519PublicKey),

    /// Opaque signing capability (EdDSA signing requires one)
    Signer(Arc<dyn Signer>),
}

/// A private key that can produce signatures without exposing its material
pub trait Signer: Send + Sync {
    /// The verification key matching this signer
    fn public_key(&self) -> Key;

    /// Sign `message` with the scheme's own hashing
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an RSA private key from a PKCS#8 document
    pub fn rsa_private_pkcs8(der: &[u8]) -> Result<Self> {
        RsaKeyPair::from_pkcs8(der)
            .map(|pair| Key::RsaPrivate(RsaPrivateKey::new(pair)))
            .map_err(|e| Error::InvalidKey(format!("RSA PKCS#8: {e}")))
    }

    /// Create an RSA private key from a PKCS#1 `RSAPrivateKey` DER document
    pub fn rsa_private_der(der: &[u8]) -> Result<Self> {
        RsaKeyPair::from_der(der)
            .map(|pair| Key::RsaPrivate(RsaPrivateKey::new(pair)))
            .map_err(|e| Error::InvalidKey(format!("RSA DER: {e}")))
    }

    /// Create an RSA public key from DER (PKCS#1 `RSAPublicKey` or SubjectPublicKeyInfo)
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::RsaPublic(RsaPublicKey::new(der.into()))
    }

    /// Create an ECDSA private key from a PKCS#8 document, detecting the curve
    pub fn ecdsa_private_pkcs8(der: &[u8]) -> Result<Self> {
        EcdsaPrivateKey::from_pkcs8(der).map(Key::EcdsaPrivate)
    }

    /// Create an ECDSA public key from an uncompressed SEC1 point
    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::EcdsaPublic(EcdsaPublicKey::new(point.into(), curve))
    }

    /// Create an Ed25519 signer from a PKCS#8 document
    pub fn ed25519_private_pkcs8(der: &[u8]) -> Result<Self> {
        let pair = Ed25519KeyPair::from_pkcs8(der)
            .map_err(|e| Error::InvalidKey(format!("Ed25519 PKCS#8: {e}")))?;
        Ok(Key::signer(Ed25519PrivateKey { pair }))
    }

    /// Create an Ed25519 public key from its raw encoding
    pub fn ed25519_public(bytes: impl Into<Vec<u8>>) -> Self {
        Key::Ed25519Public(Ed25519PublicKey::new(bytes.into()))
    }

    /// Wrap a custom signing capability
    pub fn signer(signer: impl Signer + 'static) -> Self {
        Key::Signer(Arc::new(signer))
    }

    /// Derive the verification key for this key
    ///
    /// Symmetric and public keys return themselves.
    pub fn public_key(&self) -> Result<Key> {
        match self {
            Key::RsaPrivate(key) => Ok(Key::RsaPublic(key.public_key())),
            Key::EcdsaPrivate(key) => Ok(Key::EcdsaPublic(key.public_key())),
            Key::Signer(signer) => Ok(signer.public_key()),
            other => Ok(other.clone()),
        }
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::RsaPrivate(_) => "RSA private",
            Key::RsaPublic(_) => "RSA public",
            Key::EcdsaPrivate(_) => "ECDSA private",
            Key::EcdsaPublic(_) => "ECDSA public",
            Key::Ed25519Public(_) => "Ed25519 public",
            Key::Signer(_) => "Signer",
        }
    }

    fn mismatch(&self, algorithm: &str, expected: &str) -> Error {
        Error::InvalidKeyType {
            algorithm: algorithm.to_string(),
            expected: expected.to_string(),
            actual: self.key_type().to_string(),
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "Symmetric")),
        }
    }

    /// Get as RSA private key or return error
    pub fn as_rsa_private(&self, algorithm: &str) -> Result<&RsaPrivateKey> {
        match self {
            Key::RsaPrivate(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "RSA private")),
        }
    }

    /// Get as RSA public key or return error
    pub fn as_rsa_public(&self, algorithm: &str) -> Result<&RsaPublicKey> {
        match self {
            Key::RsaPublic(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "RSA public")),
        }
    }

    /// Get as ECDSA private key or return error
    pub fn as_ecdsa_private(&self, algorithm: &str) -> Result<&EcdsaPrivateKey> {
        match self {
            Key::EcdsaPrivate(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "ECDSA private")),
        }
    }

    /// Get as ECDSA public key or return error
    pub fn as_ecdsa_public(&self, algorithm: &str) -> Result<&EcdsaPublicKey> {
        match self {
            Key::EcdsaPublic(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "ECDSA public")),
        }
    }

    /// Get as Ed25519 public key or return error
    pub fn as_ed25519_public(&self, algorithm: &str) -> Result<&Ed25519PublicKey> {
        match self {
            Key::Ed25519Public(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "Ed25519 public")),
        }
    }

    /// Get as signing capability or return error
    pub fn as_signer(&self, algorithm: &str) -> Result<&dyn Signer> {
        match self {
            Key::Signer(signer) => Ok(signer.as_ref()),
            _ => Err(self.mismatch(algorithm, "Signer")),
        }
    }
}

impl fmt::Debug for Key {
    // Secrets never reach the formatter
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::EcdsaPrivate(key) => write!(f, "Key::EcdsaPrivate({:?})", key.curve()),
            Key::EcdsaPublic(key) => write!(f, "Key::EcdsaPublic({:?})", key.curve()),
            other => write!(f, "Key::{}", other.key_type().replace(' ', "_")),
        }
    }
}

impl From<SymmetricKey> for Key {
    fn from(key: SymmetricKey) -> Self {
        Key::Symmetric(key)
    }
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// RSA key pair used for PKCS#1 v1.5 signing
#[derive(Clone)]
pub struct RsaPrivateKey {
    pair: Arc<RsaKeyPair>,
}

impl RsaPrivateKey {
    fn new(pair: RsaKeyPair) -> Self {
        Self {
            pair: Arc::new(pair),
        }
    }

    pub(crate) fn key_pair(&self) -> &RsaKeyPair {
        &self.pair
    }

    /// The matching public key
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey::new(self.pair.public_key().as_ref().to_vec())
    }
}

/// RSA public key (DER-encoded)
#[derive(Clone)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

impl RsaPublicKey {
    /// Create a new RSA public key from DER bytes
    pub fn new(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
    /// P-521 (secp521r1) curve
    P521,
}

impl EcdsaCurve {
    /// Curve order size in bits
    pub const fn bits(self) -> usize {
        match self {
            EcdsaCurve::P256 => 256,
            EcdsaCurve::P384 => 384,
            EcdsaCurve::P521 => 521,
        }
    }

    /// Width in bytes of one signature scalar
    pub const fn scalar_len(self) -> usize {
        (self.bits() + 7) >> 3
    }

    // The curve's own hash, the only pairing keys are parsed with
    fn default_signing(self) -> &'static EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
            EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
        }
    }
}

/// ECDSA private key (parsed key pair plus detected curve)
///
/// The key pair is parsed once, bound to the curve's own hash, and the public
/// point is derived at the same time.
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    pair: Arc<EcdsaKeyPair>,
    public: EcdsaPublicKey,
}

impl EcdsaPrivateKey {
    /// Parse a PKCS#8 document, trying each supported curve
    pub fn from_pkcs8(der: &[u8]) -> Result<Self> {
        [EcdsaCurve::P256, EcdsaCurve::P384, EcdsaCurve::P521]
            .into_iter()
            .find_map(|curve| {
                EcdsaKeyPair::from_pkcs8(curve.default_signing(), der)
                    .ok()
                    .map(|pair| Self::new(pair, curve))
            })
            .ok_or_else(|| Error::InvalidKey("ECDSA PKCS#8: unsupported curve or encoding".into()))
    }

    fn new(pair: EcdsaKeyPair, curve: EcdsaCurve) -> Self {
        let public = EcdsaPublicKey::new(pair.public_key().as_ref().to_vec(), curve);
        Self {
            pair: Arc::new(pair),
            public,
        }
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.public.curve
    }

    pub(crate) fn key_pair(&self) -> &EcdsaKeyPair {
        &self.pair
    }

    /// The matching public key
    pub fn public_key(&self) -> EcdsaPublicKey {
        self.public.clone()
    }
}

impl Signer for EcdsaPrivateKey {
    fn public_key(&self) -> Key {
        Key::EcdsaPublic(EcdsaPrivateKey::public_key(self))
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.pair
            .sign(&SystemRandom::new(), message)
            .map(|sig| sig.as_ref().to_vec())
            .map_err(|_| Error::InvalidKey("ECDSA signing failed".into()))
    }
}

/// ECDSA public key (uncompressed SEC1 point)
#[derive(Clone)]
pub struct EcdsaPublicKey {
    point: Vec<u8>,
    curve: EcdsaCurve,
}

impl EcdsaPublicKey {
    /// Create a new ECDSA public key from an encoded point
    pub fn new(point: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self { point, curve }
    }

    /// Get the encoded point
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }
}

/// Ed25519 public key (raw 32 bytes)
#[derive(Clone)]
pub struct Ed25519PublicKey {
    bytes: Vec<u8>,
}

impl Ed25519PublicKey {
    /// Encoded length of an Ed25519 public key
    pub const LEN: usize = 32;

    /// Create a new Ed25519 public key
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

struct Ed25519PrivateKey {
    pair: Ed25519KeyPair,
}

impl Signer for Ed25519PrivateKey {
    fn public_key(&self) -> Key {
        Key::ed25519_public(self.pair.public_key().as_ref())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.pair.sign(message).as_ref().to_vec())
    }
}

/// Key material handed back by a key resolver
///
/// A set is used for rotation: verification succeeds if any candidate
/// verifies the signature.
#[derive(Debug, Clone)]
pub enum VerificationKey {
    /// A single key
    Single(Key),
    /// Candidate keys tried in order
    Set(Vec<Key>),
}

impl VerificationKey {
    /// Candidate keys in the order they are tried
    pub fn candidates(&self) -> &[Key] {
        match self {
            VerificationKey::Single(key) => std::slice::from_ref(key),
            VerificationKey::Set(keys) => keys,
        }
    }
}

impl From<Key> for VerificationKey {
    fn from(key: Key) -> Self {
        VerificationKey::Single(key)
    }
}

impl From<Vec<Key>> for VerificationKey {
    fn from(keys: Vec<Key>) -> Self {
        VerificationKey::Set(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_key_conversions() {
        let key1 = SymmetricKey::from("secret");
        assert_eq!(key1.as_bytes(), b"secret");

        let key2 = SymmetricKey::from(vec![1, 2, 3]);
        assert_eq!(key2.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_key_type_checking() {
        let sym_key = Key::symmetric(b"secret".to_vec());
        assert!(sym_key.as_symmetric("HS256").is_ok());
        assert!(matches!(
            sym_key.as_rsa_public("RS256"),
            Err(Error::InvalidKeyType { ref algorithm, ref expected, ref actual })
                if algorithm == "RS256" && expected == "RSA public" && actual == "Symmetric"
        ));
        assert!(sym_key.as_signer("EdDSA").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = Key::symmetric(b"super-secret".to_vec());
        let printed = format!("{key:?}");
        assert_eq!(printed, "Key::Symmetric");
        assert!(!printed.contains("super"));
    }

    #[test]
    fn test_curve_scalar_len() {
        assert_eq!(EcdsaCurve::P256.scalar_len(), 32);
        assert_eq!(EcdsaCurve::P384.scalar_len(), 48);
        assert_eq!(EcdsaCurve::P521.scalar_len(), 66);
    }

    #[test]
    fn test_ecdsa_curve_detection() {
        let rng = SystemRandom::new();
        for (alg, curve) in [
            (&signature::ECDSA_P256_SHA256_FIXED_SIGNING, EcdsaCurve::P256),
            (&signature::ECDSA_P384_SHA384_FIXED_SIGNING, EcdsaCurve::P384),
            (&signature::ECDSA_P521_SHA512_FIXED_SIGNING, EcdsaCurve::P521),
        ] {
            let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &rng).unwrap();
            let key = Key::ecdsa_private_pkcs8(pkcs8.as_ref()).unwrap();
            assert_eq!(key.as_ecdsa_private("ES").unwrap().curve(), curve);

            let public = key.public_key().unwrap();
            assert_eq!(public.as_ecdsa_public("ES").unwrap().curve(), curve);
        }
    }

    #[test]
    fn test_ecdsa_signer_uses_derived_public_key() {
        use crate::algorithm::{SigningMethod, ES384};

        let pkcs8 = EcdsaKeyPair::generate_pkcs8(
            &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
            &SystemRandom::new(),
        )
        .unwrap();
        let private = EcdsaPrivateKey::from_pkcs8(pkcs8.as_ref()).unwrap();
        let derived = private.public_key();
        assert_eq!(derived.as_bytes().len(), 97);
        assert_eq!(derived.curve(), EcdsaCurve::P384);

        let signer = Key::signer(private.clone());
        let Key::EcdsaPublic(from_signer) = signer.public_key().unwrap() else {
            panic!("expected an ECDSA public key");
        };
        assert_eq!(from_signer.as_bytes(), derived.as_bytes());

        // Repeated signing reuses the parsed pair
        let key = Key::EcdsaPrivate(private);
        for message in [&b"first"[..], b"second"] {
            let signature = ES384.sign(message, &key).unwrap();
            let via_signer = Signer::sign(signer.as_signer("ES384").unwrap(), message).unwrap();
            let public = Key::EcdsaPublic(derived.clone());
            assert!(ES384.verify(message, &signature, &public).is_ok());
            assert!(ES384.verify(message, &via_signer, &public).is_ok());
        }
    }

    #[test]
    fn test_ed25519_public_key_derivation() {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).unwrap();
        let key = Key::ed25519_private_pkcs8(pkcs8.as_ref()).unwrap();
        let public = key.public_key().unwrap();
        assert_eq!(
            public.as_ed25519_public("EdDSA").unwrap().as_bytes().len(),
            Ed25519PublicKey::LEN
        );
    }

    #[test]
    fn test_invalid_private_keys() {
        assert!(matches!(Key::rsa_private_pkcs8(b"nope"), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::ecdsa_private_pkcs8(b"nope"), Err(Error::InvalidKey(_))));
        assert!(matches!(Key::ed25519_private_pkcs8(b"nope"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_verification_key_candidates() {
        let single = VerificationKey::from(Key::symmetric(b"a".to_vec()));
        assert_eq!(single.candidates().len(), 1);

        let set = VerificationKey::from(vec![
            Key::symmetric(b"a".to_vec()),
            Key::symmetric(b"b".to_vec()),
        ]);
        assert_eq!(set.candidates().len(), 2);
    }
}
