//! `#[claims]` attribute macro

mod common;

use common::*;
use jwtmint::*;

#[claims]
struct SessionClaims {
    session_id: String,
    #[serde(default)]
    roles: Vec<String>,
}

#[claims(validate = require_admin_scope)]
#[derive(PartialEq)]
struct AdminClaims {
    scope: String,
}

fn require_admin_scope(claims: &AdminClaims) -> Result<()> {
    if claims.scope.split(' ').any(|s| s == "admin") {
        Ok(())
    } else {
        Err(Error::custom("missing admin scope"))
    }
}

#[test]
fn test_registered_claims_are_flattened() {
    let claims = SessionClaims {
        registered: RegisteredClaims::new()
            .with_subject("user-42")
            .with_expiration(at(60)),
        session_id: "s-1".into(),
        roles: vec!["reader".into()],
    };

    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "sub": "user-42",
            "exp": NOW + 60,
            "session_id": "s-1",
            "roles": ["reader"]
        })
    );
}

#[test]
fn test_round_trip_with_custom_claims() {
    let claims = SessionClaims {
        registered: RegisteredClaims::new()
            .with_issuer("auth")
            .with_audience("api")
            .with_expiration(at(60)),
        session_id: "s-1".into(),
        roles: vec![],
    };
    let wire = generate_token(&HS256, &claims, &hmac_key()).unwrap();

    let token = Parser::with_validator(validator().expected_issuer("auth").expected_audience("api"))
        .parse_with_claims::<SessionClaims, _>(&wire, signing_method_by_name)
        .unwrap()
        .validate(|_| Ok(hmac_key()))
        .unwrap();

    assert_eq!(token.claims.session_id, "s-1");
    assert_eq!(token.claims.issuer().unwrap(), Some("auth"));
    assert_eq!(token.claims.registered.expiration, Some(at(60)));
}

#[test]
fn test_registered_rules_apply() {
    let claims = SessionClaims {
        registered: RegisteredClaims::new().with_expiration(at(-60)),
        session_id: "s-1".into(),
        roles: vec![],
    };
    assert_eq!(validator().validate(&claims), Err(Error::TokenExpired));
}

#[test]
fn test_custom_validation_runs() {
    let admin = AdminClaims {
        registered: RegisteredClaims::new(),
        scope: "read admin".into(),
    };
    assert!(validator().validate(&admin).is_ok());

    let reader = AdminClaims {
        registered: RegisteredClaims::new().with_expiration(at(-1)),
        scope: "read".into(),
    };
    let err = validator().validate(&reader).unwrap_err();
    assert!(err.is(ErrorKind::TokenInvalidClaims));
    assert!(err.is(ErrorKind::TokenExpired));
    assert!(err.is(ErrorKind::Custom));
    assert_eq!(err.errors().len(), 2);
}

#[test]
fn test_custom_validation_through_parser() {
    let claims = AdminClaims {
        registered: RegisteredClaims::new().with_subject("user-42"),
        scope: "read".into(),
    };
    let wire = generate_token(&ES256, &claims, &ecdsa_private(EcdsaCurve::P256)).unwrap();

    let err = parser()
        .parse_with_claims::<AdminClaims, _>(&wire, signing_method_by_name)
        .unwrap()
        .validate(|_| -> Result<Key> { unreachable!("claims fail before key resolution") })
        .unwrap_err();
    assert_eq!(err, Error::custom("missing admin scope"));
}
