use rollbook::utils::password::{hash_password, is_valid_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "Testpass123";
    let result = hash_password(password);

    assert!(result.is_ok());
    let hash = result.unwrap();
    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_hash_password_is_salted() {
    let password = "Testpass123";
    let hash1 = hash_password(password).unwrap();
    let hash2 = hash_password(password).unwrap();

    assert_ne!(hash1, hash2);
}

#[test]
fn test_verify_password_correct() {
    let password = "Correctpass1";
    let hash = hash_password(password).unwrap();

    let result = verify_password(password, &hash);

    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password("Correctpass1").unwrap();

    let result = verify_password("Wrongpass1", &hash);

    assert!(result.is_ok());
    assert!(!result.unwrap());
}

#[test]
fn test_verify_password_garbage_hash() {
    let result = verify_password("Anything1", "not-a-bcrypt-hash");

    assert!(result.is_err());
}

#[test]
fn test_policy_accepts_mixed_case_with_digit() {
    assert!(is_valid_password("Abc123"));
    assert!(is_valid_password("Passw0rd"));
    assert!(is_valid_password("xYz9xYz9xYz9"));
}

#[test]
fn test_policy_rejects_missing_uppercase() {
    assert!(!is_valid_password("abc123"));
}

#[test]
fn test_policy_rejects_missing_lowercase() {
    assert!(!is_valid_password("ABC123"));
}

#[test]
fn test_policy_rejects_missing_digit() {
    assert!(!is_valid_password("Abcdef"));
}

#[test]
fn test_policy_rejects_too_short() {
    // Five characters, everything else satisfied.
    assert!(!is_valid_password("Abc12"));
}

#[test]
fn test_policy_rejects_whitespace_anywhere() {
    assert!(!is_valid_password("Abc 123"));
    assert!(!is_valid_password(" Abc123"));
    assert!(!is_valid_password("Abc123 "));
    assert!(!is_valid_password("Abc\t123"));
}

#[test]
fn test_policy_rejects_empty() {
    assert!(!is_valid_password(""));
}

#[test]
fn test_policy_boundary_exactly_six() {
    assert!(is_valid_password("Abc123"));
}
