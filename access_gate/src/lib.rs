//! # Access Gate
//!
//! Single shared secret guarding the edit modes.
//!
//! ## Philosophy
//!
//! - **Hash, never store**: Only a salted SHA-256 digest reaches the store
//! - **One secret**: No users, no lockout, no rate limiting
//! - **Upgrade in place**: Old checksums are accepted once, then rewritten
//!
//! The stored credential looks like `sha256$<salt-hex>$<digest-hex>`, where the
//! digest covers the salt bytes followed by the UTF-8 secret.

use services_storage::{KeyValueStore, StoreError};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SALTED_PREFIX: &str = "sha256";

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Password must not be empty")]
    EmptySecret,

    #[error("No credential is stored")]
    NoCredential,

    #[error("Stored credential is malformed: {0}")]
    Malformed(String),

    #[error("Credential storage failed: {0}")]
    Store(#[from] StoreError),
}

pub type GateResult<T> = Result<T, GateError>;

/// Parsed form of a stored credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Salted { salt: Vec<u8>, digest: Vec<u8> },
    /// Rolling 32-bit checksum written by older builds
    Legacy(i32),
}

impl Credential {
    /// Hashes `secret` under a fresh random salt
    pub fn derive(secret: &str) -> Self {
        let salt = Uuid::new_v4().as_bytes().to_vec();
        let digest = salted_digest(&salt, secret);
        Credential::Salted { salt, digest }
    }

    pub fn parse(stored: &str) -> GateResult<Self> {
        let stored = stored.trim();
        if let Some(rest) = stored.strip_prefix(SALTED_PREFIX) {
            let (salt, digest) = rest
                .strip_prefix('$')
                .and_then(|fields| fields.split_once('$'))
                .ok_or_else(|| GateError::Malformed("expected sha256$<salt>$<digest>".to_string()))?;
            let salt = hex::decode(salt).map_err(|e| GateError::Malformed(e.to_string()))?;
            let digest = hex::decode(digest).map_err(|e| GateError::Malformed(e.to_string()))?;
            return Ok(Credential::Salted { salt, digest });
        }

        stored
            .parse::<i32>()
            .map(Credential::Legacy)
            .map_err(|_| GateError::Malformed(format!("unrecognised credential {stored:?}")))
    }

    pub fn encode(&self) -> String {
        match self {
            Credential::Salted { salt, digest } => {
                format!("{}${}${}", SALTED_PREFIX, hex::encode(salt), hex::encode(digest))
            }
            Credential::Legacy(checksum) => checksum.to_string(),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Credential::Salted { salt, digest } => salted_digest(salt, candidate) == *digest,
            Credential::Legacy(checksum) => legacy_checksum(candidate) == *checksum,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Credential::Legacy(_))
    }
}

fn salted_digest(salt: &[u8], secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

/// `hash * 31 + unit` over UTF-16 code units, wrapping at 32 bits
pub fn legacy_checksum(secret: &str) -> i32 {
    secret
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        })
}

/// Verifies and replaces the shared secret kept in a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct AccessGate {
    storage_key: String,
    default_secret: String,
}

impl AccessGate {
    pub fn new(storage_key: impl Into<String>, default_secret: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            default_secret: default_secret.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Seeds the default secret when nothing is stored yet
    pub fn init<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> GateResult<()> {
        if store.get(&self.storage_key)?.is_some() {
            return Ok(());
        }
        info!(key = %self.storage_key, "seeding default credential");
        self.set_password(store, &self.default_secret)
    }

    /// Checks `candidate` against the stored credential
    ///
    /// A matching legacy checksum is rewritten in the salted format. A failed
    /// rewrite is logged and does not affect the result.
    pub fn verify<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        candidate: &str,
    ) -> GateResult<bool> {
        let stored = store
            .get(&self.storage_key)?
            .ok_or(GateError::NoCredential)?;
        let credential = Credential::parse(&stored)?;

        let ok = credential.matches(candidate);
        debug!(ok, legacy = credential.is_legacy(), "verified credential");

        if ok && credential.is_legacy() {
            match self.set_password(store, candidate) {
                Ok(()) => info!("upgraded legacy credential"),
                Err(e) => warn!(error = %e, "could not upgrade legacy credential"),
            }
        }
        Ok(ok)
    }

    /// Stores `new_secret` under a fresh salt
    pub fn set_password<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        new_secret: &str,
    ) -> GateResult<()> {
        if new_secret.is_empty() {
            return Err(GateError::EmptySecret);
        }
        let credential = Credential::derive(new_secret);
        store.set(&self.storage_key, &credential.encode())?;
        Ok(())
    }

    /// Replaces the secret after checking the current one
    ///
    /// Returns `Ok(false)` without touching the store when `current` is wrong.
    pub fn change_password<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        current: &str,
        new_secret: &str,
    ) -> GateResult<bool> {
        if new_secret.is_empty() {
            return Err(GateError::EmptySecret);
        }
        if !self.verify(store, current)? {
            return Ok(false);
        }
        self.set_password(store, new_secret)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services_storage::{FailingStore, FailurePolicy, MemoryStore};

    fn gate() -> AccessGate {
        AccessGate::new("app_auth_hash", "admin")
    }

    #[test]
    fn test_legacy_checksum_values() {
        assert_eq!(legacy_checksum(""), 0);
        assert_eq!(legacy_checksum("a"), 97);
        assert_eq!(legacy_checksum("ab"), 97 * 31 + 98);
        assert_eq!(legacy_checksum("admin"), 92668751);
    }

    #[test]
    fn test_legacy_checksum_wraps() {
        let long = "z".repeat(64);
        // Must not panic on overflow
        let _ = legacy_checksum(&long);
    }

    #[test]
    fn test_init_seeds_default() {
        let mut store = MemoryStore::new();
        gate().init(&mut store).unwrap();

        let stored = store.get("app_auth_hash").unwrap().unwrap();
        assert!(stored.starts_with("sha256$"));
        assert!(gate().verify(&mut store, "admin").unwrap());
        assert!(!gate().verify(&mut store, "Admin").unwrap());
    }

    #[test]
    fn test_init_keeps_existing_secret() {
        let mut store = MemoryStore::new();
        gate().set_password(&mut store, "s3cret").unwrap();
        gate().init(&mut store).unwrap();

        assert!(gate().verify(&mut store, "s3cret").unwrap());
        assert!(!gate().verify(&mut store, "admin").unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = Credential::derive("admin").encode();
        let b = Credential::derive("admin").encode();
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_parse() {
        let credential = Credential::derive("pw");
        let parsed = Credential::parse(&credential.encode()).unwrap();
        assert_eq!(parsed, credential);
        assert!(parsed.matches("pw"));
    }

    #[test]
    fn test_malformed_credentials() {
        assert!(matches!(Credential::parse("sha256$zz$00"), Err(GateError::Malformed(_))));
        assert!(matches!(Credential::parse("sha256$00"), Err(GateError::Malformed(_))));
        assert!(matches!(Credential::parse("sha25600$00"), Err(GateError::Malformed(_))));
        assert!(matches!(Credential::parse("sha256ab$cd"), Err(GateError::Malformed(_))));
        assert!(matches!(Credential::parse("hello"), Err(GateError::Malformed(_))));
    }

    #[test]
    fn test_verify_without_credential() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            gate().verify(&mut store, "admin"),
            Err(GateError::NoCredential)
        ));
    }

    #[test]
    fn test_legacy_credential_upgraded_on_success() {
        let mut store = MemoryStore::new();
        store
            .set("app_auth_hash", &legacy_checksum("admin").to_string())
            .unwrap();

        assert!(!gate().verify(&mut store, "wrong").unwrap());
        assert!(!store.get("app_auth_hash").unwrap().unwrap().starts_with("sha256$"));

        assert!(gate().verify(&mut store, "admin").unwrap());
        assert!(store.get("app_auth_hash").unwrap().unwrap().starts_with("sha256$"));
        assert!(gate().verify(&mut store, "admin").unwrap());
    }

    #[test]
    fn test_legacy_upgrade_failure_still_verifies() {
        let mut inner = MemoryStore::new();
        inner
            .set("app_auth_hash", &legacy_checksum("admin").to_string())
            .unwrap();
        let mut store = FailingStore::new(inner, FailurePolicy::OnKeys(vec!["app_auth_hash".into()]));

        assert!(gate().verify(&mut store, "admin").unwrap());
        assert!(store.inner().get("app_auth_hash").unwrap().unwrap() == "92668751");
    }

    #[test]
    fn test_change_password() {
        let mut store = MemoryStore::new();
        gate().init(&mut store).unwrap();

        assert!(!gate().change_password(&mut store, "wrong", "new").unwrap());
        assert!(gate().verify(&mut store, "admin").unwrap());

        assert!(gate().change_password(&mut store, "admin", "new").unwrap());
        assert!(gate().verify(&mut store, "new").unwrap());
        assert!(!gate().verify(&mut store, "admin").unwrap());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut store = MemoryStore::new();
        gate().init(&mut store).unwrap();
        assert!(matches!(
            gate().set_password(&mut store, ""),
            Err(GateError::EmptySecret)
        ));
        assert!(matches!(
            gate().change_password(&mut store, "admin", ""),
            Err(GateError::EmptySecret)
        ));
    }
}
