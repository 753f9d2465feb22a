//! Signing and verification benchmarks
//!
//! Compares the cost of each signing method for the two halves of a token's
//! life: issuing (`generate_token`) and checking (`Parser::parse` plus
//! `DecodedToken::validate`).

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, Ed25519KeyPair};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jwtmint::*;
use rsa::pkcs8::EncodePrivateKey;

/// Helpers to build key material once per run
mod helpers {
    use super::*;

    pub fn claims() -> RegisteredClaims {
        let now = chrono::Utc::now();
        RegisteredClaims::new()
            .with_issuer("https://example.com")
            .with_subject("user123")
            .with_audience("api")
            .with_issued_at(NumericDate::new(now))
            .with_expiration(NumericDate::new(now + chrono::Duration::hours(1)))
    }

    pub fn signing_key(method: &dyn SigningMethod) -> Key {
        let rng = SystemRandom::new();
        match method.name() {
            "HS256" | "HS384" | "HS512" => Key::symmetric(b"benchmark-secret-key".to_vec()),
            "RS256" => {
                let private_key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048)
                    .expect("Failed to generate key");
                let pkcs8 = private_key.to_pkcs8_der().expect("Failed to serialize");
                Key::rsa_private_pkcs8(pkcs8.as_bytes()).expect("Failed to load key")
            }
            "ES256" => {
                let pkcs8 =
                    EcdsaKeyPair::generate_pkcs8(&signature::ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
                        .expect("Failed to generate key");
                Key::ecdsa_private_pkcs8(pkcs8.as_ref()).expect("Failed to load key")
            }
            "ES384" => {
                let pkcs8 =
                    EcdsaKeyPair::generate_pkcs8(&signature::ECDSA_P384_SHA384_FIXED_SIGNING, &rng)
                        .expect("Failed to generate key");
                Key::ecdsa_private_pkcs8(pkcs8.as_ref()).expect("Failed to load key")
            }
            "EdDSA" => {
                let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng).expect("Failed to generate key");
                Key::ed25519_private_pkcs8(pkcs8.as_ref()).expect("Failed to load key")
            }
            other => panic!("Unsupported algorithm: {other}"),
        }
    }
}

fn methods() -> [&'static dyn SigningMethod; 7] {
    [&HS256, &HS384, &HS512, &RS256, &ES256, &ES384, &EDDSA]
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");

    for method in methods() {
        let key = helpers::signing_key(method);
        let claims = helpers::claims();

        group.bench_function(method.name(), |b| {
            b.iter(|| generate_token(method, black_box(&claims), &key).unwrap());
        });
    }

    group.finish();
}

fn bench_parse_and_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_verify");
    let parser = Parser::with_validator(
        Validator::new()
            .expected_issuer("https://example.com")
            .expected_audience("api")
            .verify_issued_at(),
    );

    for method in methods() {
        let private = helpers::signing_key(method);
        let public = private.public_key().unwrap();
        let wire = generate_token(method, helpers::claims(), &private).unwrap();

        group.bench_function(method.name(), |b| {
            b.iter(|| {
                parser
                    .parse(black_box(&wire), signing_method_by_name)
                    .unwrap()
                    .validate(|_| Ok(public.clone()))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_parse_only(c: &mut Criterion) {
    let key = helpers::signing_key(&HS256);
    let wire = generate_token(&HS256, helpers::claims(), &key).unwrap();
    let parser = Parser::new();

    c.bench_function("parse_only", |b| {
        b.iter(|| parser.parse(black_box(&wire), signing_method_by_name).unwrap());
    });
}

criterion_group!(benches, bench_sign, bench_parse_and_verify, bench_parse_only);
criterion_main!(benches);
