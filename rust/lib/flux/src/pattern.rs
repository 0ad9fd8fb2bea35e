use std::sync::RwLock;

/// Check whether a concrete topic path matches a subscription pattern.
///
/// - `+` matches exactly one level
/// - `#` matches any number of remaining levels, including none; it is only
///   meaningful as the last segment
pub fn matches(pattern: &str, topic: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut top = topic.split('/');
    loop {
        match (pat.next(), top.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(p), Some(t)) if p == t => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// A list of `(pattern, value)` registrations matched in insertion order.
///
/// Screen apps register a handful of handlers and subscribers, so a linear
/// scan stays cheap and keeps dispatch order deterministic.
pub struct PatternMap<T> {
    entries: RwLock<Vec<(String, T)>>,
}

impl<T: Clone> PatternMap<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, pattern: &str, value: T) {
        self.entries
            .write()
            .unwrap()
            .push((pattern.to_string(), value));
    }

    /// All values whose pattern matches `topic`, in registration order.
    pub fn match_topic(&self, topic: &str) -> Vec<T> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|(pattern, _)| matches(pattern, topic))
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// Remove the values registered under exactly `pattern` that satisfy
    /// `predicate`. Returns `true` if anything was removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|(p, v)| !(p == pattern && predicate(v)));
        entries.len() < before
    }

    /// Whether anything is registered under exactly `pattern`.
    pub fn has_pattern(&self, pattern: &str) -> bool {
        self.entries.read().unwrap().iter().any(|(p, _)| p == pattern)
    }
}

impl<T: Clone> Default for PatternMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
