//! Run with
//!
//! ```not_rust
//! RUST_LOG=jwtmint=trace cargo run --example issue_and_verify
//! ```
//!
//! Issues an ES256 token with a `kid`, then checks it the way a resource
//! server would: restrict the algorithms, pick the key by `kid`, validate the
//! registered claims and finally an application-level scope.

use std::collections::HashMap;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{EcdsaKeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use chrono::{Duration, Utc};
use jwtmint::{
    AlgorithmPolicy, Claims, Error, Key, NumericDate, Parser, RegisteredClaims, Token, Validator,
    ES256,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[jwtmint::claims(validate = check_scope)]
struct ApiClaims {
    scope: String,
}

fn check_scope(claims: &ApiClaims) -> jwtmint::Result<()> {
    if claims.scope.split(' ').any(|s| s == "orders:read") {
        Ok(())
    } else {
        Err(Error::custom("scope 'orders:read' is required"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug,jwtmint=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Issuer side
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &SystemRandom::new())
        .map_err(|_| "key generation failed")?;
    let signing_key = Key::ecdsa_private_pkcs8(pkcs8.as_ref())?;

    let now = Utc::now();
    let claims = ApiClaims {
        registered: RegisteredClaims::new()
            .with_issuer("https://auth.example.com")
            .with_subject("user-42")
            .with_audience("orders-api")
            .with_issued_at(NumericDate::new(now))
            .with_expiration(NumericDate::new(now + Duration::minutes(15))),
        scope: "orders:read orders:write".into(),
    };

    let mut token = Token::with_claims(&ES256, claims);
    token.header = token.header.with_key_id("2024-06");
    let wire = token.signed_string(&signing_key)?;
    tracing::info!(%wire, "issued token");

    // Resource server side
    let keys: HashMap<String, Key> = [("2024-06".to_string(), signing_key.public_key()?)].into();
    let policy = AlgorithmPolicy::ecdsa_any();
    let parser = Parser::with_validator(
        Validator::new()
            .expected_issuer("https://auth.example.com")
            .expected_audience("orders-api")
            .require_expiration_time()
            .verify_issued_at(),
    );

    let verified = parser
        .parse_with_claims::<ApiClaims, _>(&wire, |alg| policy.resolve(alg))?
        .validate(|token| {
            token
                .header
                .key_id()
                .and_then(|kid| keys.get(kid).cloned())
                .ok_or_else(|| Error::custom("unknown kid"))
        })?;

    tracing::info!(
        subject = verified.claims.subject()?,
        scope = %verified.claims.scope,
        "token verified"
    );
    Ok(())
}
