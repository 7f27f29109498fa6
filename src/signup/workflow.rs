use crate::codec::shift::{decode, encode};
use crate::core::error::CodecError;
use crate::models::user::UserRecord;
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::debug;

/// Keys handed out at signup are drawn uniformly from this range
pub const KEY_RANGE: RangeInclusive<i32> = 1..=20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Successful,
    InvalidUsername,
}

impl SignupOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SignupOutcome::Successful => "Successful signup",
            SignupOutcome::InvalidUsername => "Invalid username",
        }
    }
}

impl fmt::Display for SignupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Returns true when no record uses `username` (exact, case-sensitive match)
pub fn is_unique(username: &str, records: &[UserRecord]) -> bool {
    !records.iter().any(|record| record.username == username)
}

/// Register a new user in the in-memory store
///
/// A taken username leaves `records` untouched. Otherwise a key is drawn
/// from [`KEY_RANGE`], the password is obfuscated with it and the record is
/// appended. Nothing is written to disk here; the caller saves explicitly.
pub fn signup<R: Rng + ?Sized>(
    records: &mut Vec<UserRecord>,
    username: &str,
    password: &str,
    rng: &mut R,
) -> Result<SignupOutcome, CodecError> {
    if !is_unique(username, records) {
        debug!(username, "Signup rejected, username already taken");
        return Ok(SignupOutcome::InvalidUsername);
    }

    let key = rng.random_range(KEY_RANGE);
    let obfuscated_password = encode(password, key)?;
    records.push(UserRecord::new(username, obfuscated_password, key));

    debug!(username, records = records.len(), "Signup accepted");

    Ok(SignupOutcome::Successful)
}

/// Decode the stored password of `username`, if such a record exists
pub fn reveal(records: &[UserRecord], username: &str) -> Option<Result<String, CodecError>> {
    records
        .iter()
        .find(|record| record.username == username)
        .map(|record| decode(&record.obfuscated_password, record.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_is_unique() {
        let records = vec![UserRecord::new("alice", "bmjdf", 1)];

        assert!(!is_unique("alice", &records));
        assert!(is_unique("bob", &records));
        assert!(is_unique("Alice", &records));
        assert!(is_unique("alice", &[]));
    }

    #[test]
    fn test_successful_signup() {
        let mut records = Vec::new();

        let outcome = signup(&mut records, "bob", "secret", &mut rng()).unwrap();

        assert_eq!(outcome, SignupOutcome::Successful);
        assert_eq!(outcome.to_string(), "Successful signup");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "bob");
        assert!(KEY_RANGE.contains(&records[0].key));
        assert_ne!(records[0].obfuscated_password, "secret");
        assert_eq!(decode(&records[0].obfuscated_password, records[0].key).unwrap(), "secret");
    }

    #[test]
    fn test_duplicate_signup_is_rejected() {
        let mut records = Vec::new();
        let mut rng = rng();

        signup(&mut records, "alice", "pw1", &mut rng).unwrap();
        let before = records.clone();

        let outcome = signup(&mut records, "alice", "pw2", &mut rng).unwrap();

        assert_eq!(outcome, SignupOutcome::InvalidUsername);
        assert_eq!(outcome.to_string(), "Invalid username");
        assert_eq!(records, before);
        assert_eq!(reveal(&records, "alice").unwrap().unwrap(), "pw1");
    }

    #[test]
    fn test_usernames_stay_unique_across_many_signups() {
        let mut records = Vec::new();
        let mut rng = rng();
        let names = ["alice", "bob", "alice", "carol", "bob", "Bob", "dave", "carol"];

        for name in names {
            signup(&mut records, name, "pw", &mut rng).unwrap();
        }

        let distinct: HashSet<&str> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(distinct.len(), records.len());
        assert_eq!(records.len(), 5);

        let order: Vec<&str> = records.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(order, vec!["alice", "bob", "carol", "Bob", "dave"]);
    }

    #[test]
    fn test_keys_cover_full_range() {
        let mut rng = rng();
        let mut seen = HashSet::new();

        for i in 0..2000 {
            let mut records = Vec::new();
            signup(&mut records, &format!("user{i}"), "pw", &mut rng).unwrap();
            seen.insert(records[0].key);
        }

        assert_eq!(seen, KEY_RANGE.collect::<HashSet<_>>());
    }

    #[test]
    fn test_signup_with_unencodable_password_leaves_store_unchanged() {
        let mut records = vec![UserRecord::new("alice", "bmjdf", 1)];

        let result = signup(&mut records, "bob", "\u{10FFFF}", &mut rng());

        assert!(result.is_err());
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_reveal_unknown_user() {
        assert!(reveal(&[], "nobody").is_none());
    }
}
