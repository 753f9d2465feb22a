use crate::algorithm::{HashAlgorithm, SigningMethod};
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HMAC signing method (HS256, HS384, HS512)
///
/// Uses the same symmetric secret to sign and verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMethodHmac {
    name: &'static str,
    hash: HashAlgorithm,
}

impl SigningMethodHmac {
    /// Create an HMAC signing method with a custom name
    pub const fn new(name: &'static str, hash: HashAlgorithm) -> Self {
        Self { name, hash }
    }

    /// The hash function keyed by the secret
    pub const fn hash(&self) -> HashAlgorithm {
        self.hash
    }

    fn mac(&self, signing_input: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
        let tag = match self.hash {
            HashAlgorithm::Sha256 => compute::<Hmac<Sha256>>(signing_input, secret)?,
            HashAlgorithm::Sha384 => compute::<Hmac<Sha384>>(signing_input, secret)?,
            HashAlgorithm::Sha512 => compute::<Hmac<Sha512>>(signing_input, secret)?,
        };
        Ok(tag)
    }
}

fn compute<M: Mac + hmac::digest::KeyInit>(signing_input: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|e| Error::InvalidKey(format!("HMAC secret: {e}")))?;
    mac.update(signing_input);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl SigningMethod for SigningMethodHmac {
    fn name(&self) -> &str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
        let symmetric_key = key.as_symmetric(self.name)?;
        self.mac(signing_input, symmetric_key.as_bytes())
    }

    /// Verify with constant-time comparison
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
        let symmetric_key = key.as_symmetric(self.name)?;
        let expected_signature = self.mac(signing_input, symmetric_key.as_bytes())?;

        if signature.len() != expected_signature.len() {
            return Err(Error::SignatureInvalid);
        }

        if constant_time_eq(signature, &expected_signature) {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{HS256, HS384, HS512};
    use crate::utils::base64url;

    const SIGNING_INPUT: &[u8] =
        b"eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    #[test]
    fn test_hs256_known_vector() {
        // RFC 7515 Appendix A.1
        let secret = base64url::decode(
            "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow",
        )
        .unwrap();
        let signing_input = b"eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ";

        let signature = HS256.sign(signing_input, &Key::symmetric(secret)).unwrap();
        assert_eq!(
            base64url::encode(signature),
            "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"
        );
    }

    #[test]
    fn test_sign_verify_all_hashes() {
        let key = Key::symmetric(b"your-256-bit-secret".to_vec());
        for (method, len) in [(&HS256, 32), (&HS384, 48), (&HS512, 64)] {
            let signature = method.sign(SIGNING_INPUT, &key).unwrap();
            assert_eq!(signature.len(), len, "{}", method.name());
            assert!(method.verify(SIGNING_INPUT, &signature, &key).is_ok());
        }
    }

    #[test]
    fn test_invalid_signature() {
        let key = Key::symmetric(b"your-256-bit-secret".to_vec());
        let mut signature = HS256.sign(SIGNING_INPUT, &key).unwrap();
        signature[0] ^= 0x01;

        assert!(matches!(
            HS256.verify(SIGNING_INPUT, &signature, &key),
            Err(Error::SignatureInvalid)
        ));
        assert!(matches!(
            HS256.verify(SIGNING_INPUT, b"wrong", &key),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let key = Key::symmetric(b"secret-a".to_vec());
        let signature = HS512.sign(SIGNING_INPUT, &key).unwrap();
        assert!(HS512
            .verify(SIGNING_INPUT, &signature, &Key::symmetric(b"secret-b".to_vec()))
            .is_err());
    }

    #[test]
    fn test_wrong_key_type() {
        let key = Key::rsa_public(vec![1, 2, 3]);
        assert!(matches!(
            HS256.sign(SIGNING_INPUT, &key),
            Err(Error::InvalidKeyType { .. })
        ));
        assert!(matches!(
            HS256.verify(SIGNING_INPUT, b"sig", &key),
            Err(Error::InvalidKeyType { .. })
        ));
    }
}
