use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::Rng;

use super::model::Role;

/// Verification codes are six digits: [100_000, 1_000_000).
const MIN_CODE_VALUE: u32 = 100_000;
const MAX_CODE_VALUE: u32 = 1_000_000;

/// How long a staged registration stays claimable.
const MAX_VERIFICATION_MINUTES: i64 = 10;

/// A fully validated registration waiting for its emailed code.
#[derive(Debug, Clone)]
pub struct PendingRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// bcrypt hash, never the raw password.
    pub password: String,
    pub date_of_birth: DateTime<Utc>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// In-memory holding area for pending registrations and password reset
/// codes. Injected through the application state behind an `Arc`, never a
/// global. Each map sits behind its own mutex and locks are held only for
/// the map operation itself, with no await points inside. Entries do not
/// survive a restart.
#[derive(Debug, Default)]
pub struct VerificationStore {
    pending: Mutex<HashMap<u32, PendingRegistration>>,
    reset_codes: Mutex<HashMap<String, u32>>,
}

impl VerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a validated registration under a fresh six-digit code and
    /// returns the code. Re-rolls while the drawn code is already taken, so
    /// a code never refers to more than one pending registration.
    pub fn stage_registration(&self, registration: PendingRegistration) -> u32 {
        let mut rng = rand::thread_rng();
        let mut pending = self.pending.lock();

        let mut code = rng.gen_range(MIN_CODE_VALUE..MAX_CODE_VALUE);
        while pending.contains_key(&code) {
            code = rng.gen_range(MIN_CODE_VALUE..MAX_CODE_VALUE);
        }

        pending.insert(code, registration);
        code
    }

    /// Claims the pending registration staged under `code`, removing it.
    ///
    /// Returns `None` when the code is unknown, the stored email does not
    /// match, or the entry is older than the verification window. Expired
    /// entries are dropped on the spot; an email mismatch leaves the entry
    /// in place so the real owner can still claim it.
    pub fn claim_pending(&self, code: u32, email: &str) -> Option<PendingRegistration> {
        let mut pending = self.pending.lock();

        let entry = pending.get(&code)?;
        let expired =
            Utc::now() - entry.created_at >= Duration::minutes(MAX_VERIFICATION_MINUTES);
        let email_matches = entry.email == email;

        if expired {
            pending.remove(&code);
            return None;
        }
        if !email_matches {
            return None;
        }

        pending.remove(&code)
    }

    /// Puts a claimed registration back under its original code, for when
    /// promotion fails after the claim. Leaves any entry that has since
    /// been staged under the same code untouched.
    pub fn restage(&self, code: u32, registration: PendingRegistration) {
        self.pending.lock().entry(code).or_insert(registration);
    }

    /// Issues a password reset code for `email`, replacing any outstanding
    /// one so at most one code per email is ever live.
    pub fn issue_reset_code(&self, email: &str) -> u32 {
        let code = rand::thread_rng().gen_range(MIN_CODE_VALUE..MAX_CODE_VALUE);
        self.reset_codes.lock().insert(email.to_string(), code);
        code
    }

    /// Looks up the outstanding reset code for `email` without consuming it.
    pub fn reset_code(&self, email: &str) -> Option<u32> {
        self.reset_codes.lock().get(email).copied()
    }

    /// Removes the outstanding reset code after a successful password reset.
    pub fn clear_reset_code(&self, email: &str) {
        self.reset_codes.lock().remove(email);
    }

    /// Drops everything. Called on graceful shutdown.
    pub fn clear(&self) {
        self.pending.lock().clear();
        self.reset_codes.lock().clear();
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Backdates a staged registration, for exercising expiry in tests.
    #[cfg(test)]
    pub fn age_pending(&self, code: u32, by: Duration) {
        if let Some(entry) = self.pending.lock().get_mut(&code) {
            entry.created_at -= by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> PendingRegistration {
        PendingRegistration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "$2b$12$fakehashfakehashfakehash".to_string(),
            date_of_birth: Utc::now() - Duration::weeks(52 * 20),
            role: Role::Student,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_stage_returns_six_digit_code() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));
        assert!((MIN_CODE_VALUE..MAX_CODE_VALUE).contains(&code));
    }

    #[test]
    fn test_claim_with_matching_email_consumes_entry() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));

        let claimed = store.claim_pending(code, "ada@example.com");
        assert!(claimed.is_some());
        assert_eq!(claimed.unwrap().email, "ada@example.com");

        // Gone after a successful claim.
        assert!(store.claim_pending(code, "ada@example.com").is_none());
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn test_claim_unknown_code() {
        let store = VerificationStore::new();
        store.stage_registration(registration("ada@example.com"));
        assert!(store.claim_pending(123_456, "ada@example.com").is_none());
    }

    #[test]
    fn test_claim_wrong_email_preserves_entry() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));

        assert!(store.claim_pending(code, "mallory@example.com").is_none());
        // The rightful owner can still claim it.
        assert!(store.claim_pending(code, "ada@example.com").is_some());
    }

    #[test]
    fn test_restage_makes_code_claimable_again() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));
        let claimed = store.claim_pending(code, "ada@example.com").unwrap();

        store.restage(code, claimed);

        let reclaimed = store.claim_pending(code, "ada@example.com");
        assert!(reclaimed.is_some());
        assert_eq!(reclaimed.unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_claim_expired_entry_is_dropped() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));
        store.age_pending(code, Duration::minutes(10));

        assert!(store.claim_pending(code, "ada@example.com").is_none());
        assert_eq!(store.pending_len(), 0);
    }

    #[test]
    fn test_claim_just_inside_window() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));
        store.age_pending(code, Duration::minutes(9));

        assert!(store.claim_pending(code, "ada@example.com").is_some());
    }

    #[test]
    fn test_stage_rerolls_on_collision() {
        let store = VerificationStore::new();
        // Fill a chunk of the code space; every staged code must be distinct.
        let mut codes = std::collections::HashSet::new();
        for i in 0..500 {
            let code = store.stage_registration(registration(&format!("u{}@example.com", i)));
            assert!(codes.insert(code));
        }
        assert_eq!(store.pending_len(), 500);
    }

    #[test]
    fn test_reset_code_overwrites_previous() {
        let store = VerificationStore::new();
        let first = store.issue_reset_code("ada@example.com");
        let second = store.issue_reset_code("ada@example.com");

        let current = store.reset_code("ada@example.com");
        assert_eq!(current, Some(second));
        if first != second {
            assert_ne!(current, Some(first));
        }
    }

    #[test]
    fn test_reset_code_peek_does_not_consume() {
        let store = VerificationStore::new();
        let code = store.issue_reset_code("ada@example.com");
        assert_eq!(store.reset_code("ada@example.com"), Some(code));
        assert_eq!(store.reset_code("ada@example.com"), Some(code));

        store.clear_reset_code("ada@example.com");
        assert_eq!(store.reset_code("ada@example.com"), None);
    }

    #[test]
    fn test_clear_empties_both_maps() {
        let store = VerificationStore::new();
        let code = store.stage_registration(registration("ada@example.com"));
        store.issue_reset_code("ada@example.com");

        store.clear();

        assert!(store.claim_pending(code, "ada@example.com").is_none());
        assert_eq!(store.reset_code("ada@example.com"), None);
    }

    #[test]
    fn test_concurrent_staging_yields_unique_codes() {
        use std::sync::Arc;

        let store = Arc::new(VerificationStore::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        store.stage_registration(registration(&format!(
                            "t{}u{}@example.com",
                            t, i
                        )))
                    })
                    .collect::<Vec<_>>()
            }));
        }

        let mut all = std::collections::HashSet::new();
        for handle in handles {
            for code in handle.join().expect("staging thread panicked") {
                assert!(all.insert(code), "duplicate code issued");
            }
        }
        assert_eq!(store.pending_len(), 400);
    }
}
