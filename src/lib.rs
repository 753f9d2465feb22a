//! # jwtmint - Sign and Verify Compact JSON Web Tokens
//!
//! **jwtmint** creates and checks JWS compact tokens (`header.claims.signature`)
//! signed with HMAC, RSA PKCS#1 v1.5, ECDSA or Ed25519.
//!
//! ## Overview
//!
//! Issuing a token means building a [`Token`] from a signing method and a
//! claim set, then calling [`Token::signed_string`] with a [`Key`]. Checking a
//! token runs in two phases:
//!
//! ```text
//! &str
//!   │ Parser::parse(token, resolve_alg)      structure, header, algorithm
//!   ▼
//! DecodedToken (untrusted; header and claims readable)
//!   │ .validate(resolve_key)                 claim rules, then signature
//!   ▼
//! Token (verified)
//! ```
//!
//! The algorithm announced in the header is never trusted on its own: the
//! caller maps it to a [`SigningMethod`] (for instance through an
//! [`AlgorithmPolicy`]), and the key is picked by the caller after reading
//! the decoded header. `alg: none` is rejected outright.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtmint::*;
//!
//! let key = Key::symmetric(b"your-256-bit-secret".to_vec());
//! let claims = RegisteredClaims::new()
//!     .with_subject("user-42")
//!     .with_expiration(NumericDate::from_timestamp(1_900_000_000).unwrap());
//!
//! let wire = generate_token(&HS256, &claims, &key)?;
//!
//! let token = Parser::new()
//!     .parse(&wire, |alg| AlgorithmPolicy::hmac_any().resolve(alg))?
//!     .validate(|_| Ok(key.clone()))?;
//!
//! assert_eq!(token.claims.subject()?, Some("user-42"));
//! ```
//!
//! ## Algorithms
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA**: RS256, RS384, RS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//! - **EdDSA**: Ed25519
//!
//! Signing and verification use `aws-lc-rs`, except HMAC which uses the
//! `hmac` and `sha2` crates with a constant-time comparison.
//!
//! ## Claims
//!
//! Any type implementing [`Claims`] can be validated. [`MapClaims`] holds an
//! open JSON object, [`RegisteredClaims`] the seven registered claims, and the
//! [`claims`](macro@claims) attribute extends a struct of your own:
//!
//! ```ignore
//! #[jwtmint::claims(validate = check_scope)]
//! struct ApiClaims {
//!     scope: String,
//! }
//!
//! fn check_scope(claims: &ApiClaims) -> jwtmint::Result<()> {
//!     if claims.scope.is_empty() {
//!         return Err(jwtmint::Error::custom("scope is empty"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`Error`]. Several errors belong to more than one
//! category; test with [`Error::is`] rather than matching a single variant:
//!
//! ```ignore
//! match result {
//!     Err(e) if e.is(ErrorKind::TokenExpired) => refresh(),
//!     Err(e) if e.is(ErrorKind::TokenMalformed) => reject(),
//!     ...
//! }
//! ```

extern crate self as jwtmint;

#[doc(hidden)]
pub use serde;

// Core
pub mod error;
pub mod utils;

// Signing
pub mod algorithm;
pub mod keys;

// Claims
pub mod claims;

// Token
pub mod parser;
pub mod token;

pub use algorithm::{
    signing_method_by_name, signing_method_names, AlgorithmPolicy, HashAlgorithm, SigningMethod,
    SigningMethodEcdsa, SigningMethodEd25519, SigningMethodHmac, SigningMethodRsa, EDDSA, ES256,
    ES384, ES512, HS256, HS384, HS512, RS256, RS384, RS512,
};
pub use claims::{
    ClaimStrings, Claims, EncodingOptions, MapClaims, NumericDate, RegisteredClaims, Validator,
};
pub use error::{Error, ErrorKind, Result};
pub use keys::{EcdsaCurve, Key, Signer, VerificationKey};
pub use parser::Parser;
pub use token::{generate_token, DecodedToken, Header, Token, Verification};

pub use jwtmint_derive::claims;
