use crate::error::Result;
use crate::keys::Key;

/// Core trait that all token signing methods implement
///
/// Every family (HMAC, RSA, ECDSA, EdDSA) exposes the same two operations so
/// that tokens and the parser never branch on algorithm identity.
pub trait SigningMethod: Send + Sync {
    /// The algorithm identifier written to the `alg` header (e.g., "HS256", "EdDSA")
    fn name(&self) -> &str;

    /// Sign the signing input
    ///
    /// # Arguments
    /// * `signing_input` - The encoded `header.claims` bytes, signed as-is
    /// * `key` - The key to sign with
    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>>;

    /// Verify a signature
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.claims)
    /// * `signature` - The raw, already decoded signature bytes
    /// * `key` - The key to use for verification
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()>;
}

impl std::fmt::Debug for dyn SigningMethod + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningMethod({})", self.name())
    }
}
