use async_trait::async_trait;

use super::password::{hash_password, verify_password};
use crate::config::{LookupMode, UserEntry};
use crate::error::{AuthError, Result};

/// How a user's password is kept in memory
#[derive(Clone)]
pub enum Secret {
    Plaintext(String),
    /// Argon2 PHC string
    Hashed(String),
}

impl Secret {
    /// Plaintext secrets use plain equality, hashed ones the Argon2 verifier
    pub fn verify(&self, candidate: &str) -> bool {
        match self {
            Secret::Plaintext(password) => password == candidate,
            Secret::Hashed(hash) => verify_password(candidate, hash),
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, Secret::Hashed(_))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Plaintext(_) => f.write_str("Plaintext(..)"),
            Secret::Hashed(_) => f.write_str("Hashed(..)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub username: String,
    secret: Secret,
}

impl User {
    pub fn plaintext(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: Secret::Plaintext(password.into()),
        }
    }

    /// Hash `password` and keep only the hash
    pub fn hashed(username: impl Into<String>, password: &str) -> Result<Self> {
        Ok(Self {
            username: username.into(),
            secret: Secret::Hashed(hash_password(password)?),
        })
    }

    pub fn with_password_hash(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: Secret::Hashed(password_hash.into()),
        }
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        self.secret.verify(candidate)
    }

    pub fn secret(&self) -> &Secret {
        &self.secret
    }
}

/// Credential lookup capability injected into the application state
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Fixed user list built once at startup and never mutated
pub struct InMemoryUserStore {
    users: Vec<User>,
    lookup: LookupMode,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>, lookup: LookupMode) -> Self {
        Self { users, lookup }
    }

    /// Build from configured entries. With `hashed` set, plaintext passwords
    /// are hashed and only the hash is retained.
    pub fn from_entries(entries: &[UserEntry], lookup: LookupMode, hashed: bool) -> Result<Self> {
        let mut users = Vec::with_capacity(entries.len());
        for entry in entries {
            let user = match (hashed, &entry.password, &entry.password_hash) {
                (true, _, Some(hash)) => User::with_password_hash(&entry.username, hash),
                (true, Some(password), None) => User::hashed(&entry.username, password)?,
                (false, Some(password), _) => User::plaintext(&entry.username, password),
                _ => {
                    return Err(AuthError::Config(format!(
                        "user {} has no usable password for this demo",
                        entry.username
                    )));
                }
            };
            users.push(user);
        }
        Ok(Self::new(users, lookup))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn lookup(&self, username: &str) -> Option<&User> {
        match self.lookup {
            // First record containing the submitted name wins
            LookupMode::Substring => self.users.iter().find(|u| u.username.contains(username)),
            LookupMode::Exact => self.users.iter().find(|u| u.username == username),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.lookup(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lookup: LookupMode) -> InMemoryUserStore {
        InMemoryUserStore::new(
            vec![
                User::plaintext("one", "secret_one"),
                User::plaintext("two", "secret_two"),
                User::plaintext("someone", "secret_three"),
            ],
            lookup,
        )
    }

    #[tokio::test]
    async fn test_substring_lookup_first_match_wins() {
        let store = store(LookupMode::Substring);

        let user = store.find_by_username("on").await.unwrap().unwrap();
        assert_eq!(user.username, "one");

        // "one" is also contained in "someone" but the first record wins
        let user = store.find_by_username("one").await.unwrap().unwrap();
        assert_eq!(user.username, "one");

        let user = store.find_by_username("meo").await.unwrap().unwrap();
        assert_eq!(user.username, "someone");

        assert!(store.find_by_username("three").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exact_lookup() {
        let store = store(LookupMode::Exact);

        assert!(store.find_by_username("on").await.unwrap().is_none());
        let user = store.find_by_username("two").await.unwrap().unwrap();
        assert_eq!(user.username, "two");
    }

    #[test]
    fn test_plaintext_secret() {
        let user = User::plaintext("one", "secret_one");
        assert!(user.verify_password("secret_one"));
        assert!(!user.verify_password("secret_on"));
        assert!(!user.secret().is_hashed());
    }

    #[test]
    fn test_from_entries_hashes_when_asked() {
        let entries = vec![UserEntry::new("one", "secret_one")];
        let store = InMemoryUserStore::from_entries(&entries, LookupMode::Exact, true).unwrap();
        let user = store.lookup("one").unwrap();
        assert!(user.secret().is_hashed());
        assert!(user.verify_password("secret_one"));
        assert!(!user.verify_password("secret_two"));
    }

    #[test]
    fn test_from_entries_requires_plaintext_for_plain_demos() {
        let entries = vec![UserEntry {
            username: "one".to_string(),
            password: None,
            password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string()),
        }];
        assert!(InMemoryUserStore::from_entries(&entries, LookupMode::Exact, false).is_err());
        assert!(InMemoryUserStore::from_entries(&entries, LookupMode::Exact, true).is_ok());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let user = User::plaintext("one", "secret_one");
        assert!(!format!("{:?}", user).contains("secret_one"));
    }
}
