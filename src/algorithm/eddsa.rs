use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::{Ed25519PublicKey, Key};

use aws_lc_rs::signature::{UnparsedPublicKey, ED25519};

/// EdDSA signing method over Ed25519
///
/// Signing needs a [`Signer`](crate::keys::Signer) whose public counterpart is
/// an Ed25519 key; the message is passed unhashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningMethodEd25519;

impl SigningMethod for SigningMethodEd25519 {
    fn name(&self) -> &str {
        "EdDSA"
    }

    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
        let signer = key.as_signer(self.name())?;

        // Any signer matches the capability; only an Ed25519 one is usable
        if !matches!(signer.public_key(), Key::Ed25519Public(_)) {
            return Err(Error::InvalidKey(format!(
                "EdDSA requires an Ed25519 signer, got one for {:?}",
                signer.public_key()
            )));
        }

        signer.sign(signing_input)
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
        let public_key = key.as_ed25519_public(self.name())?;

        if public_key.as_bytes().len() != Ed25519PublicKey::LEN {
            return Err(Error::InvalidKey(format!(
                "Ed25519 public key must be {} bytes, got {}",
                Ed25519PublicKey::LEN,
                public_key.as_bytes().len()
            )));
        }

        UnparsedPublicKey::new(&ED25519, public_key.as_bytes())
            .verify(signing_input, signature)
            .map_err(|_| Error::Ed25519Verification)
    }
}
