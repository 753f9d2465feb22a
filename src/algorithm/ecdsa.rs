use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaSigningAlgorithm, UnparsedPublicKey, VerificationAlgorithm};

/// ECDSA signing method (ES256, ES384, ES512)
///
/// Signatures use the fixed-width JWS layout from RFC 7518 Section 3.4: the
/// scalars `r` and `s` are each left-padded to `ceil(key_bits / 8)` bytes and
/// concatenated. ASN.1 DER signatures are never produced or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMethodEcdsa {
    name: &'static str,
    hash: HashAlgorithm,
    key_bits: usize,
}

impl SigningMethodEcdsa {
    /// Create an ECDSA signing method with a custom name
    ///
    /// `key_bits` is the curve size the key must match (256, 384 or 521).
    pub const fn new(name: &'static str, hash: HashAlgorithm, key_bits: usize) -> Self {
        Self {
            name,
            hash,
            key_bits,
        }
    }

    /// Curve size in bits
    pub const fn key_bits(&self) -> usize {
        self.key_bits
    }

    /// Length in bytes of a signature produced by this method
    pub const fn signature_len(&self) -> usize {
        2 * ((self.key_bits + 7) >> 3)
    }

    fn signing_algorithm(&self) -> Result<&'static EcdsaSigningAlgorithm> {
        match (self.hash, self.key_bits) {
            (HashAlgorithm::Sha256, 256) => Ok(&signature::ECDSA_P256_SHA256_FIXED_SIGNING),
            (HashAlgorithm::Sha384, 384) => Ok(&signature::ECDSA_P384_SHA384_FIXED_SIGNING),
            (HashAlgorithm::Sha512, 521) => Ok(&signature::ECDSA_P521_SHA512_FIXED_SIGNING),
            (hash, bits) => Err(self.unavailable(hash, bits)),
        }
    }

    fn verification_algorithm(&self) -> Result<&'static dyn VerificationAlgorithm> {
        match (self.hash, self.key_bits) {
            (HashAlgorithm::Sha256, 256) => Ok(&signature::ECDSA_P256_SHA256_FIXED),
            (HashAlgorithm::Sha384, 384) => Ok(&signature::ECDSA_P384_SHA384_FIXED),
            (HashAlgorithm::Sha512, 521) => Ok(&signature::ECDSA_P521_SHA512_FIXED),
            (hash, bits) => Err(self.unavailable(hash, bits)),
        }
    }

    fn unavailable(&self, hash: HashAlgorithm, bits: usize) -> Error {
        Error::HashUnavailable(format!("{} with {hash} on a {bits}-bit curve", self.name))
    }
}

impl SigningMethod for SigningMethodEcdsa {
    fn name(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
        let private_key = key.as_ecdsa_private(self.name)?;

        if private_key.curve().bits() != self.key_bits {
            return Err(Error::InvalidKey(format!(
                "{} requires a {}-bit curve, got {:?}",
                self.name,
                self.key_bits,
                private_key.curve()
            )));
        }

        // The pair is bound to the curve's own hash, the only pairing available
        self.signing_algorithm()?;
        let signature = private_key
            .key_pair()
            .sign(&SystemRandom::new(), signing_input)
            .map_err(|_| Error::InvalidKey(format!("{} signing failed", self.name)))?;

        Ok(signature.as_ref().to_vec())
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
        let public_key = key.as_ecdsa_public(self.name)?;

        // Fixed layout: anything else cannot be split into r and s
        if signature.len() != self.signature_len() {
            return Err(Error::EcdsaVerification);
        }

        if public_key.curve().bits() != self.key_bits {
            return Err(Error::InvalidKey(format!(
                "{} requires a {}-bit curve, got {:?}",
                self.name,
                self.key_bits,
                public_key.curve()
            )));
        }

        UnparsedPublicKey::new(self.verification_algorithm()?, public_key.as_bytes())
            .verify(signing_input, signature)
            .map_err(|_| Error::EcdsaVerification)
    }
}
