//! Access gate contract tests
//!
//! `verify(s)` holds exactly for the last secret passed to `init` or
//! `set_password`, including after the store is reopened.

#[allow(dead_code)]
const CREDENTIAL_KEY: &str = "app_auth_hash";
#[allow(dead_code)]
const DEFAULT_SECRET: &str = "admin";

#[cfg(test)]
mod tests {
    use super::*;
    use access_gate::{legacy_checksum, AccessGate};
    use services_storage::{JsonFileStore, KeyValueStore, MemoryStore};

    fn gate() -> AccessGate {
        AccessGate::new(CREDENTIAL_KEY, DEFAULT_SECRET)
    }

    #[test]
    fn test_default_secret_seeded_once() {
        let mut store = MemoryStore::new();
        gate().init(&mut store).unwrap();
        let seeded = store.get(CREDENTIAL_KEY).unwrap().unwrap();
        assert!(seeded.starts_with("sha256$"));

        gate().init(&mut store).unwrap();
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap().unwrap(), seeded);
        assert!(gate().verify(&mut store, DEFAULT_SECRET).unwrap());
    }

    #[test]
    fn test_stable_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            gate().init(&mut store).unwrap();
            gate().set_password(&mut store, "squat-rack").unwrap();
        }

        let mut store = JsonFileStore::open(&path).unwrap();
        gate().init(&mut store).unwrap();
        assert!(gate().verify(&mut store, "squat-rack").unwrap());
        assert!(!gate().verify(&mut store, DEFAULT_SECRET).unwrap());
        assert!(!gate().verify(&mut store, "squat-rack ").unwrap());
    }

    #[test]
    fn test_stored_credential_hides_secret() {
        let mut store = MemoryStore::new();
        gate().set_password(&mut store, "hunter2").unwrap();
        let stored = store.get(CREDENTIAL_KEY).unwrap().unwrap();
        assert!(!stored.contains("hunter2"));
        assert_eq!(stored.split('$').count(), 3);
    }

    #[test]
    fn test_legacy_checksum_upgraded_once() {
        let mut store = MemoryStore::new();
        store
            .set(CREDENTIAL_KEY, &legacy_checksum(DEFAULT_SECRET).to_string())
            .unwrap();
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap().as_deref(), Some("92668751"));

        assert!(!gate().verify(&mut store, "wrong").unwrap());
        assert_eq!(store.get(CREDENTIAL_KEY).unwrap().as_deref(), Some("92668751"));

        assert!(gate().verify(&mut store, DEFAULT_SECRET).unwrap());
        assert!(store
            .get(CREDENTIAL_KEY)
            .unwrap()
            .unwrap()
            .starts_with("sha256$"));
        assert!(gate().verify(&mut store, DEFAULT_SECRET).unwrap());
    }
}
