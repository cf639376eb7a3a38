//! # Configuration
//!
//! Plaza ships a minimal, framework-agnostic configuration system
//! based on a simple string key/value store, surfaced as
//! `app.set()` / `app.get()`. Applications layer configuration
//! however they like (env overrides, files, flags).
//!
//! ```rust
//! use plaza_core::PlazaApp;
//! let app = PlazaApp::<(), ()>::new();
//!
//! app.set("seed.enabled", "true");
//! assert_eq!(app.get("seed.enabled"), Some("true".to_string()));
//! ```
//!
//! Hooks receive an immutable [`PlazaConfigSnapshot`] taken at call
//! time, so config reads inside the pipeline never contend with
//! writers.
//!
//! Higher-level loaders (TOML, env, Consul, ...) are intentionally
//! kept out of the core so each application remains free to choose
//! its configuration strategy.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct PlazaConfig {
    values: HashMap<String, String>,
}

impl PlazaConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    ///
    /// Returns None if the key is not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn snapshot(&self) -> PlazaConfigSnapshot {
        PlazaConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlazaConfigSnapshot {
    map: HashMap<String, String>,
}

impl PlazaConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let mut cfg = PlazaConfig::new();
        cfg.set("pages.defaultLocale", "en");

        let snap = cfg.snapshot();
        cfg.set("pages.defaultLocale", "es");

        assert_eq!(snap.get("pages.defaultLocale"), Some("en"));
        assert_eq!(cfg.get("pages.defaultLocale"), Some("es"));
    }

    #[test]
    fn typed_getters() {
        let mut cfg = PlazaConfig::new();
        cfg.set("seed.enabled", "true");
        cfg.set("paginate.max", "50");
        cfg.set("bad", "zzz");

        let snap = cfg.snapshot();
        assert_eq!(snap.get_bool("seed.enabled"), Some(true));
        assert_eq!(snap.get_usize("paginate.max"), Some(50));
        assert_eq!(snap.get_usize("bad"), None);
        assert_eq!(snap.get_bool("missing"), None);
    }
}
