use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, UnparsedPublicKey, VerificationAlgorithm};

/// RSASSA-PKCS1-v1_5 signing method (RS256, RS384, RS512)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMethodRsa {
    name: &'static str,
    hash: HashAlgorithm,
}

impl SigningMethodRsa {
    /// Create an RSA signing method with a custom name
    pub const fn new(name: &'static str, hash: HashAlgorithm) -> Self {
        Self { name, hash }
    }

    /// The digest applied before PKCS#1 v1.5 padding
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    fn padding(&self) -> &'static dyn RsaEncoding {
        match self.hash {
            HashAlgorithm::Sha256 => &signature::RSA_PKCS1_SHA256,
            HashAlgorithm::Sha384 => &signature::RSA_PKCS1_SHA384,
            HashAlgorithm::Sha512 => &signature::RSA_PKCS1_SHA512,
        }
    }

    fn verification_algorithm(&self) -> &'static dyn VerificationAlgorithm {
        match self.hash {
            HashAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            HashAlgorithm::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            HashAlgorithm::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }
    }
}

impl SigningMethod for SigningMethodRsa {
    fn name(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
        let key_pair = key.as_rsa_private(self.name)?.key_pair();

        let mut signature = vec![0u8; key_pair.public_modulus_len()];
        key_pair
            .sign(
                self.padding(),
                &SystemRandom::new(),
                signing_input,
                &mut signature,
            )
            .map_err(|_| Error::InvalidKey(format!("{} signing failed", self.name)))?;

        Ok(signature)
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
        let rsa_key = key.as_rsa_public(self.name)?;

        UnparsedPublicKey::new(self.verification_algorithm(), rsa_key.as_der())
            .verify(signing_input, signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{RS256, RS384, RS512};
    use rsa::pkcs8::EncodePrivateKey;
    use std::sync::OnceLock;

    const SIGNING_INPUT: &[u8] =
        b"eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    fn private_key() -> &'static Key {
        static KEY: OnceLock<Key> = OnceLock::new();
        KEY.get_or_init(|| {
            let mut rng = rand::thread_rng();
            let private_key =
                rsa::RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
            let pkcs8_doc = private_key
                .to_pkcs8_der()
                .expect("Failed to serialize to PKCS#8");
            Key::rsa_private_pkcs8(pkcs8_doc.as_bytes()).expect("Failed to load key")
        })
    }

    #[test]
    fn test_sign_verify_all_hashes() {
        let private = private_key();
        let public = private.public_key().unwrap();

        for method in [&RS256, &RS384, &RS512] {
            let signature = method.sign(SIGNING_INPUT, private).unwrap();
            assert_eq!(signature.len(), 256, "{}", method.name());
            assert!(method.verify(SIGNING_INPUT, &signature, &public).is_ok());
        }
    }

    #[test]
    fn test_hash_mismatch_fails() {
        let private = private_key();
        let public = private.public_key().unwrap();

        let signature = RS256.sign(SIGNING_INPUT, private).unwrap();
        assert!(matches!(
            RS512.verify(SIGNING_INPUT, &signature, &public),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_tampered_input_fails() {
        let private = private_key();
        let public = private.public_key().unwrap();

        let signature = RS256.sign(SIGNING_INPUT, private).unwrap();
        assert!(matches!(
            RS256.verify(b"eyJhbGciOiJSUzI1NiJ9.e30", &signature, &public),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_wrong_key_type() {
        let key = Key::symmetric(b"secret".to_vec());
        assert!(matches!(
            RS256.sign(SIGNING_INPUT, &key),
            Err(Error::InvalidKeyType { .. })
        ));

        // A private key is not accepted for verification
        assert!(matches!(
            RS256.verify(SIGNING_INPUT, &[0u8; 256], private_key()),
            Err(Error::InvalidKeyType { .. })
        ));
    }
}
