use rollbook::config::jwt::JwtConfig;
use rollbook::modules::auth::model::Role;
use rollbook::utils::jwt::{create_access_token, verify_token};

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        expiry_minutes: 25,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();

    let result = create_access_token(Role::Student, &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Student, &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_ok());
    let claims = result.unwrap();
    assert_eq!(claims.role, Role::Student);
}

#[test]
fn test_token_contains_correct_role_teacher() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Teacher, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.role, Role::Teacher);
}

#[test]
fn test_claims_are_cloneable() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Teacher, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    // Claims travel through extractors by value; a copy must carry the
    // same role and timestamps.
    let copy = claims.clone();
    assert_eq!(copy.role, claims.role);
    assert_eq!(copy.exp, claims.exp);
    assert_eq!(copy.iat, claims.iat);
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();
    let invalid_token = "invalid.token.here";

    let result = verify_token(invalid_token, &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_empty() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Teacher, &jwt_config).unwrap();

    let wrong_jwt_config = JwtConfig {
        secret: "different_secret_key".to_string(),
        expiry_minutes: 25,
    };

    let result = verify_token(&token, &wrong_jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    let malformed_tokens = vec![
        "not.enough.parts",
        "too.many.parts.here.extra",
        "!!!.invalid.chars",
        "header.payload.",
        ".payload.signature",
    ];

    for token in malformed_tokens {
        let result = verify_token(token, &jwt_config);
        assert!(result.is_err());
    }
}

#[test]
fn test_token_expiry_matches_config() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Student, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert!(claims.exp > claims.iat);
    assert_eq!(
        claims.exp - claims.iat,
        jwt_config.expiry_minutes as usize * 60
    );
}

#[test]
fn test_verify_tampered_token() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(Role::Student, &jwt_config).unwrap();

    // Flip a character in the signature segment.
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    assert_eq!(parts.len(), 3);
    let sig = parts[2].clone();
    let flipped = if sig.starts_with('A') { "B" } else { "A" };
    parts[2] = format!("{}{}", flipped, &sig[1..]);
    let tampered = parts.join(".");

    assert!(verify_token(&tampered, &jwt_config).is_err());
}
