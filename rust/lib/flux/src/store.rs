use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::pattern::PatternMap;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for state change notifications.
pub type ChangeHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Per-path state store with pattern-routed change notifications.
///
/// - `set(path, value)` stores a value and notifies all matching subscribers.
/// - `get(path)` reads the current value (Arc clone, cheap).
/// - `subscribe(pattern, handler)` registers a change handler.
/// - `unsubscribe(pattern, id)` removes a handler.
pub struct StateStore {
    values: RwLock<BTreeMap<String, StateValue>>,
    handlers: PatternMap<HandlerEntry>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: ChangeHandler,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(BTreeMap::new()),
            handlers: PatternMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Set a typed value at the given path and notify matching subscribers.
    pub fn set<T: Any + Send + Sync>(&self, path: &str, value: T) {
        self.set_value(path, StateValue::new(value));
    }

    /// Set a pre-built StateValue at the given path and notify matching subscribers.
    ///
    /// Subscribers run after the write lock is released, so they may read
    /// the store freely.
    pub fn set_value(&self, path: &str, value: StateValue) {
        {
            let mut values = self.values.write().unwrap();
            values.insert(path.to_string(), value.clone());
        }
        for entry in self.handlers.match_topic(path) {
            (entry.handler)(path, &value);
        }
    }

    /// Get the current state value at the given path.
    pub fn get(&self, path: &str) -> Option<StateValue> {
        let values = self.values.read().unwrap();
        values.get(path).cloned()
    }

    /// Read and clone a typed value. `None` if the path is unset or holds
    /// another type.
    pub fn read<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.get(path).and_then(|v| v.downcast_ref::<T>().cloned())
    }

    /// Remove the state value at the given path.
    ///
    /// Returns the old value if present. Does NOT notify subscribers.
    pub fn remove(&self, path: &str) -> Option<StateValue> {
        let mut values = self.values.write().unwrap();
        values.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        let values = self.values.read().unwrap();
        values.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to state changes matching the given pattern.
    ///
    /// The handler is called synchronously on the thread that calls `set`.
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.insert(
            pattern,
            HandlerEntry {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Unsubscribe a handler by its subscription ID and pattern.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.handlers.remove(pattern, |entry| entry.id == id);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct AuthState {
        busy: bool,
        error: Option<String>,
    }

    #[test]
    fn set_and_read_struct() {
        let store = StateStore::new();
        store.set(
            "auth/state",
            AuthState {
                busy: true,
                error: None,
            },
        );

        let state = store.read::<AuthState>("auth/state").unwrap();
        assert!(state.busy);
        assert_eq!(state.error, None);
    }

    #[test]
    fn read_wrong_type_is_none() {
        let store = StateStore::new();
        store.set("app/route", "/login".to_string());
        assert_eq!(store.read::<u32>("app/route"), None);
        assert_eq!(store.read::<String>("app/route").as_deref(), Some("/login"));
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = StateStore::new();
        store.set("app/route", "/".to_string());
        store.set("app/route", "/home".to_string());
        assert_eq!(store.read::<String>("app/route").as_deref(), Some("/home"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_does_not_notify() {
        let store = StateStore::new();
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        store.subscribe("roster/state", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("roster/state", 1u32);
        assert!(store.remove("roster/state").is_some());
        assert!(!store.contains("roster/state"));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn subscribe_wildcard_sees_path_and_value() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        store.subscribe("auth/#", move |path, value| {
            let route = value.downcast_ref::<String>().cloned().unwrap_or_default();
            s.lock().unwrap().push((path.to_string(), route));
        });

        store.set("auth/notice", "Login berhasil!".to_string());
        store.set("app/route", "/home".to_string());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ("auth/notice".to_string(), "Login berhasil!".to_string()));
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = StateStore::new();
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let id = store.subscribe("app/route", move |_, _| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        store.set("app/route", "/".to_string());
        store.unsubscribe("app/route", id);
        store.set("app/route", "/login".to_string());

        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn subscriber_may_read_store() {
        let store = Arc::new(StateStore::new());
        let observed = Arc::new(Mutex::new(None));
        let (st, obs) = (store.clone(), observed.clone());
        store.subscribe("app/route", move |path, _| {
            *obs.lock().unwrap() = st.read::<String>(path);
        });

        store.set("app/route", "/home".to_string());
        assert_eq!(observed.lock().unwrap().as_deref(), Some("/home"));
    }

    #[test]
    fn subscription_ids_are_distinct() {
        let store = StateStore::new();
        let a = store.subscribe("#", |_, _| {});
        let b = store.subscribe("#", |_, _| {});
        assert_ne!(a, b);
    }
}
