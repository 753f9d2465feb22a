//! Shared key material for integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, Ed25519KeyPair};
use chrono::{DateTime, Utc};
use jwtmint::*;
use rsa::pkcs8::EncodePrivateKey;

pub const NOW: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(NOW, 0).unwrap()
}

/// A date `offset` seconds from [`NOW`]
pub fn at(offset: i64) -> NumericDate {
    NumericDate::from_timestamp(NOW + offset).unwrap()
}

pub fn hmac_key() -> Key {
    Key::symmetric(b"integration-test-secret".to_vec())
}

/// One 2048-bit RSA key per test binary; generation is slow
pub fn rsa_private() -> &'static Key {
    static KEY: OnceLock<Key> = OnceLock::new();
    KEY.get_or_init(rsa_key)
}

/// A fresh 2048-bit RSA key
pub fn rsa_key() -> Key {
    let mut rng = rand::thread_rng();
    let private_key = rsa::RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
    let pkcs8_doc = private_key
        .to_pkcs8_der()
        .expect("Failed to serialize to PKCS#8");
    Key::rsa_private_pkcs8(pkcs8_doc.as_bytes()).expect("Failed to load key")
}

pub fn ecdsa_private(curve: EcdsaCurve) -> Key {
    let alg = match curve {
        EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
    };
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new())
        .expect("Failed to generate key");
    Key::ecdsa_private_pkcs8(pkcs8.as_ref()).expect("Failed to load key")
}

pub fn ed25519_private() -> Key {
    let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
        .expect("Failed to generate key");
    Key::ed25519_private_pkcs8(pkcs8.as_ref()).expect("Failed to load key")
}

/// Signing key and matching verification key for a method
pub fn key_pair(method: &dyn SigningMethod) -> (Key, Key) {
    let private = match method.name() {
        "HS256" | "HS384" | "HS512" => hmac_key(),
        "RS256" | "RS384" | "RS512" => rsa_private().clone(),
        "ES256" => ecdsa_private(EcdsaCurve::P256),
        "ES384" => ecdsa_private(EcdsaCurve::P384),
        "ES512" => ecdsa_private(EcdsaCurve::P521),
        "EdDSA" => ed25519_private(),
        other => panic!("no test key for {other}"),
    };
    let public = private.public_key().expect("Failed to derive public key");
    (private, public)
}

/// A validator pinned to [`NOW`]
pub fn validator() -> Validator {
    Validator::new().with_time_fn(fixed_now)
}

pub fn parser() -> Parser {
    Parser::with_validator(validator())
}

/// Build a wire token from raw JSON segments and a raw signature
pub fn raw_token(header: &str, claims: &str, signature: &[u8]) -> String {
    format!(
        "{}.{}.{}",
        utils::base64url::encode(header),
        utils::base64url::encode(claims),
        utils::base64url::encode(signature)
    )
}

/// Sign raw JSON segments as-is
pub fn sign_raw(method: &dyn SigningMethod, header: &str, claims: &str, key: &Key) -> String {
    let signing_input = format!(
        "{}.{}",
        utils::base64url::encode(header),
        utils::base64url::encode(claims)
    );
    let signature = method.sign(signing_input.as_bytes(), key).unwrap();
    format!("{signing_input}.{}", utils::base64url::encode(signature))
}
