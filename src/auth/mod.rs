//! Credential checks for the login step. Not a hardened security
//! boundary: the default table ships inside the binary, salts included.

use std::{collections::HashMap, path::Path};

use anyhow::Result;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Failed logins collapse into this one message so that an unknown user
/// and a wrong password are indistinguishable.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("incorrect credentials")]
pub struct IncorrectCredentials;

/// Anything able to answer a username/password check. The rest of the
/// application only talks to this, so the built-in table can be swapped
/// for a real store without touching calling logic.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore {
    fn verify(&self, username: &str, password: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialEntry {
    pub salt: String,
    pub hash: String,
}

/// Username to salted-hash table held in memory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticCredentials {
    entries: HashMap<String, CredentialEntry>,
}

impl StaticCredentials {
    /// The table embedded directly in source.
    pub fn builtin() -> Self {
        let mut credentials = Self::default();
        credentials.entries.insert(
            "admin".into(),
            CredentialEntry {
                salt: "7f3a".into(),
                hash: "5eafcf1d80a24cf6f57a73bdb504b9a3d67808f6ada4e819fa860ceb0ca7c286".into(),
            },
        );
        credentials.entries.insert(
            "maria".into(),
            CredentialEntry {
                salt: "c1d9".into(),
                hash: "9bf34410769d872ed433d5f104a3ed6f59bf44ce70bb76ae0719cbbda57ffd4e".into(),
            },
        );
        credentials
    }

    /// Loads the same table shape from a JSON file, keyed by username:
    /// `{"ana": {"salt": "..", "hash": ".."}}`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Hashes `password` under `salt` and stores it for `username`.
    pub fn insert(&mut self, username: impl Into<String>, salt: impl Into<String>, password: &str) {
        let salt = salt.into();
        let hash = hash_password(&salt, password);
        self.entries.insert(username.into(), CredentialEntry { salt, hash });
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        match self.entries.get(username) {
            Some(entry) => hash_password(&entry.salt, password) == entry.hash,
            None => false,
        }
    }
}

pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Checks the login. Runs on every process start; there is no session to
/// keep alive afterwards.
pub fn authenticate(
    store: &impl CredentialStore,
    username: &str,
    password: &str,
) -> Result<(), IncorrectCredentials> {
    if store.verify(username, password) {
        Ok(())
    } else {
        Err(IncorrectCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        authenticate, hash_password, IncorrectCredentials, MockCredentialStore, StaticCredentials,
        CredentialStore,
    };

    #[test]
    fn test_hash_password_is_stable() {
        let first = hash_password("7f3a", "secret");
        let second = hash_password("7f3a", "secret");
        assert_eq!(first, second);
        assert_ne!(first, "secret");
        assert_ne!(first, hash_password("c1d9", "secret"));
    }

    #[test]
    fn test_builtin_table_verifies() {
        let credentials = StaticCredentials::builtin();
        assert!(credentials.verify("admin", "admin"));
        assert!(!credentials.verify("admin", "nimda"));
        assert!(!credentials.verify("desconocido", "admin"));
    }

    #[test]
    fn test_inserted_entry_verifies() {
        let mut credentials = StaticCredentials::default();
        credentials.insert("ana", "11aa", "hunter2");
        assert!(credentials.verify("ana", "hunter2"));
        assert!(!credentials.verify("ana", "hunter3"));
    }

    #[test]
    fn test_table_parses_from_json() {
        let raw = r#"{"ana": {"salt": "11aa", "hash": "deadbeef"}}"#;
        let credentials: StaticCredentials = serde_json::from_str(raw).unwrap();
        assert_eq!(credentials.entries["ana"].salt, "11aa");
    }

    #[test]
    fn test_authenticate_failure_is_generic() {
        let mut store = MockCredentialStore::new();
        store.expect_verify().returning(|_, _| false);

        let error = authenticate(&store, "whoever", "whatever").unwrap_err();
        assert_eq!(error, IncorrectCredentials);
        assert_eq!(error.to_string(), "incorrect credentials");
    }

    #[test]
    fn test_authenticate_passes_through() {
        let mut store = MockCredentialStore::new();
        store.expect_verify().returning(|user, password| user == "ana" && password == "ok");

        assert!(authenticate(&store, "ana", "ok").is_ok());
        assert!(authenticate(&store, "ana", "no").is_err());
    }
}
