//! Base64URL encoding/decoding per RFC 4648
//!
//! Every token segment uses the URL-safe alphabet without padding. This
//! module is a thin wrapper around the `base64` crate that maps decode
//! failures to [`Error::MalformedSegment`].

use crate::error::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Encode bytes as an unpadded Base64URL string
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode an unpadded Base64URL string
///
/// Padding characters, characters from the standard alphabet and lengths that
/// leave dangling bits are all rejected.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::MalformedSegment(format!("Base64URL decode failed: {e}")))
}
