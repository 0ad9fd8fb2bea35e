//! Local session cache: the persisted "who is logged in" record.
//!
//! One slot per device. Storage failures never reach callers: they are
//! logged and the operation degrades to a no-op write or an empty read.

use std::sync::Arc;

use mahasiswa_kv::KVStore;
use mahasiswa_kv::traits::encode_bool;
use serde::Serialize;

pub const KEY_USER_ID: &str = "user_id";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_IS_LOGGED_IN: &str = "is_logged_in";

const ALL_KEYS: [&str; 4] = [KEY_USER_ID, KEY_USER_EMAIL, KEY_USER_NAME, KEY_IS_LOGGED_IN];

/// Snapshot of the cached session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub is_logged_in: bool,
}

impl SessionSnapshot {
    /// Name to greet the user with: display name, else email.
    pub fn display_name(&self) -> Option<&str> {
        self.user_name.as_deref().or(self.email.as_deref())
    }
}

/// Typed view over a [`KVStore`] holding the four session keys.
#[derive(Clone)]
pub struct SessionCache {
    kv: Arc<dyn KVStore>,
}

impl SessionCache {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Record a signed-in user. All four keys land in one batch write; a
    /// missing display name removes any stale one in the same write.
    pub fn save(&self, user_id: &str, email: &str, user_name: Option<&str>) {
        let logged_in = [encode_bool(true)];
        let mut sets: Vec<(&str, &[u8])> = vec![
            (KEY_USER_ID, user_id.as_bytes()),
            (KEY_USER_EMAIL, email.as_bytes()),
            (KEY_IS_LOGGED_IN, &logged_in),
        ];
        let mut deletes: Vec<&str> = Vec::new();
        match user_name {
            Some(name) => sets.push((KEY_USER_NAME, name.as_bytes())),
            None => deletes.push(KEY_USER_NAME),
        }

        match self.kv.batch_write(&sets, &deletes) {
            Ok(()) => tracing::info!(user_id, email, "session saved"),
            Err(e) => tracing::error!(error = %e, "failed to save session"),
        }
    }

    /// Remove every session key.
    pub fn clear(&self) {
        match self.kv.batch_delete(&ALL_KEYS) {
            Ok(()) => tracing::info!("session cleared"),
            Err(e) => tracing::error!(error = %e, "failed to clear session"),
        }
    }

    /// Current snapshot; a missing or unreadable flag reads as logged out.
    pub fn read(&self) -> SessionSnapshot {
        let snapshot = SessionSnapshot {
            user_id: self.string(KEY_USER_ID),
            email: self.string(KEY_USER_EMAIL),
            user_name: self.string(KEY_USER_NAME),
            is_logged_in: self.flag(KEY_IS_LOGGED_IN),
        };
        tracing::debug!(?snapshot, "session read");
        snapshot
    }

    pub fn is_logged_in(&self) -> bool {
        self.flag(KEY_IS_LOGGED_IN)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.kv.get_string(key).unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "failed to read session field");
            None
        })
    }

    fn flag(&self, key: &str) -> bool {
        match self.kv.get_bool(key) {
            Ok(value) => value.unwrap_or(false),
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read session flag");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mahasiswa_kv::{KVError, MemoryKV, RedbStore};

    fn cache() -> (Arc<MemoryKV>, SessionCache) {
        let kv = Arc::new(MemoryKV::new());
        (kv.clone(), SessionCache::new(kv))
    }

    #[test]
    fn empty_store_reads_logged_out() {
        let (_, cache) = cache();
        assert_eq!(cache.read(), SessionSnapshot::default());
        assert!(!cache.is_logged_in());
    }

    #[test]
    fn read_after_save_returns_same_fields() {
        let (_, cache) = cache();
        cache.save("uid-eko", "eko@example.com", Some("Eko"));

        let s = cache.read();
        assert!(s.is_logged_in);
        assert_eq!(s.user_id.as_deref(), Some("uid-eko"));
        assert_eq!(s.email.as_deref(), Some("eko@example.com"));
        assert_eq!(s.user_name.as_deref(), Some("Eko"));
        assert_eq!(s.display_name(), Some("Eko"));
    }

    #[test]
    fn save_without_name_drops_previous_name() {
        let (_, cache) = cache();
        cache.save("uid-budi", "budi@example.com", Some("Budi"));
        cache.save("uid-eko", "eko@example.com", None);

        let s = cache.read();
        assert_eq!(s.user_id.as_deref(), Some("uid-eko"));
        assert_eq!(s.user_name, None);
        assert_eq!(s.display_name(), Some("eko@example.com"));
    }

    #[test]
    fn read_after_clear_has_no_residue() {
        let (kv, cache) = cache();
        cache.save("uid-eko", "eko@example.com", Some("Eko"));
        cache.clear();

        assert_eq!(cache.read(), SessionSnapshot::default());
        assert!(kv.is_empty());
    }

    #[test]
    fn uses_documented_keys() {
        let (kv, cache) = cache();
        cache.save("uid-eko", "eko@example.com", None);

        assert_eq!(kv.get_string("user_id").unwrap().as_deref(), Some("uid-eko"));
        assert_eq!(kv.get_string("user_email").unwrap().as_deref(), Some("eko@example.com"));
        assert_eq!(kv.get_bool("is_logged_in").unwrap(), Some(true));
    }

    #[test]
    fn corrupt_flag_reads_logged_out() {
        let (kv, cache) = cache();
        kv.set("is_logged_in", b"true").unwrap();
        assert!(!cache.read().is_logged_in);
    }

    #[test]
    fn session_persists_in_redb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.redb");
        {
            let cache = SessionCache::new(Arc::new(RedbStore::open(&path).unwrap()));
            cache.save("uid-eko", "eko@example.com", None);
        }

        let cache = SessionCache::new(Arc::new(RedbStore::open(&path).unwrap()));
        assert!(cache.is_logged_in());
        assert_eq!(cache.read().email.as_deref(), Some("eko@example.com"));
    }

    /// Counts write calls reaching the store.
    #[derive(Default)]
    struct CountingKV {
        inner: MemoryKV,
        writes: std::sync::atomic::AtomicUsize,
    }

    impl CountingKV {
        fn bump(&self) {
            self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl KVStore for CountingKV {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
            self.bump();
            self.inner.set(key, value)
        }
        fn delete(&self, key: &str) -> Result<(), KVError> {
            self.bump();
            self.inner.delete(key)
        }
        fn batch_write(&self, sets: &[(&str, &[u8])], deletes: &[&str]) -> Result<(), KVError> {
            self.bump();
            self.inner.batch_write(sets, deletes)
        }
    }

    #[test]
    fn save_without_name_is_a_single_write() {
        let kv = Arc::new(CountingKV::default());
        let cache = SessionCache::new(kv.clone());
        cache.save("uid-budi", "budi@example.com", Some("Budi"));
        cache.save("uid-eko", "eko@example.com", None);

        assert_eq!(kv.writes.load(std::sync::atomic::Ordering::SeqCst), 2);
        let s = cache.read();
        assert_eq!(s.email.as_deref(), Some("eko@example.com"));
        assert_eq!(s.user_name, None);
    }

    struct BrokenKV;

    impl KVStore for BrokenKV {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KVError> {
            Err(KVError::Storage("disk gone".into()))
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), KVError> {
            Err(KVError::Storage("disk gone".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), KVError> {
            Err(KVError::Storage("disk gone".into()))
        }
    }

    #[test]
    fn storage_failures_do_not_surface() {
        let cache = SessionCache::new(Arc::new(BrokenKV));
        cache.save("uid-eko", "eko@example.com", Some("Eko"));
        cache.clear();
        assert_eq!(cache.read(), SessionSnapshot::default());
    }
}
