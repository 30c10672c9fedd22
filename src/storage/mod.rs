use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Durable slot (`localStorage`), used when the user picked "remember me".
pub const DURABLE_TOKEN_KEY: &str = "authToken";
/// Ephemeral slot (`sessionStorage`), cleared when the tab session ends.
pub const EPHEMERAL_TOKEN_KEY: &str = "accessToken";

/// Minimal string key/value store. Browser storage and the in-memory store
/// used off-browser both sit behind this.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserStorageKind {
    Local,
    Session,
}

/// `window.localStorage` / `window.sessionStorage`. Storage failures (private
/// mode, quota) are ignored the same way the rest of the app treats them.
#[derive(Clone, Copy, Debug)]
pub struct BrowserStorage {
    kind: BrowserStorageKind,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self {
            kind: BrowserStorageKind::Local,
        }
    }

    pub fn session() -> Self {
        Self {
            kind: BrowserStorageKind::Session,
        }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match self.kind {
            BrowserStorageKind::Local => window.local_storage().ok().flatten(),
            BrowserStorageKind::Session => window.session_storage().ok().flatten(),
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
    }
}

/// The two token slots. At most one of them holds a token: every write
/// clears both first.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("durable_present", &self.durable.get(DURABLE_TOKEN_KEY).is_some())
            .field(
                "ephemeral_present",
                &self.ephemeral.get(EPHEMERAL_TOKEN_KEY).is_some(),
            )
            .finish()
    }
}

impl TokenStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, ephemeral }
    }

    pub fn browser() -> Self {
        Self::new(
            Arc::new(BrowserStorage::local()),
            Arc::new(BrowserStorage::session()),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    /// Durable slot first, then the ephemeral one.
    pub fn get_token(&self) -> Option<String> {
        self.durable
            .get(DURABLE_TOKEN_KEY)
            .or_else(|| self.ephemeral.get(EPHEMERAL_TOKEN_KEY))
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_token(&self, token: &str, remember_me: bool) {
        self.clear_tokens();
        if remember_me {
            self.durable.set(DURABLE_TOKEN_KEY, token);
        } else {
            self.ephemeral.set(EPHEMERAL_TOKEN_KEY, token);
        }
    }

    pub fn clear_tokens(&self) {
        self.durable.remove(DURABLE_TOKEN_KEY);
        self.ephemeral.remove(EPHEMERAL_TOKEN_KEY);
    }

    pub fn durable_token(&self) -> Option<String> {
        self.durable.get(DURABLE_TOKEN_KEY)
    }

    pub fn ephemeral_token(&self) -> Option<String> {
        self.ephemeral.get(EPHEMERAL_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_me_goes_to_durable_only() {
        let store = TokenStore::in_memory();
        store.set_token("tok", true);
        assert_eq!(store.durable_token().as_deref(), Some("tok"));
        assert!(store.ephemeral_token().is_none());
        assert_eq!(store.get_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_session_only_goes_to_ephemeral_only() {
        let store = TokenStore::in_memory();
        store.set_token("tok", false);
        assert!(store.durable_token().is_none());
        assert_eq!(store.ephemeral_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_switching_slots_clears_the_other() {
        let store = TokenStore::in_memory();
        store.set_token("first", true);
        store.set_token("second", false);
        assert!(store.durable_token().is_none());
        assert_eq!(store.get_token().as_deref(), Some("second"));

        store.set_token("third", true);
        assert!(store.ephemeral_token().is_none());
        assert_eq!(store.get_token().as_deref(), Some("third"));
    }

    #[test]
    fn test_clear_tokens_empties_both() {
        let durable = Arc::new(MemoryStorage::new());
        let ephemeral = Arc::new(MemoryStorage::new());
        durable.set(DURABLE_TOKEN_KEY, "a");
        ephemeral.set(EPHEMERAL_TOKEN_KEY, "b");

        let store = TokenStore::new(durable, ephemeral);
        store.clear_tokens();
        assert!(store.get_token().is_none());
    }

    #[test]
    fn test_clones_share_the_same_slots() {
        let store = TokenStore::in_memory();
        let other = store.clone();
        store.set_token("shared", false);
        assert_eq!(other.get_token().as_deref(), Some("shared"));
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_browser_token_store_roundtrip() {
        let store = TokenStore::browser();
        store.clear_tokens();
        assert!(store.get_token().is_none());

        store.set_token("t1", true);
        assert_eq!(BrowserStorage::local().get(DURABLE_TOKEN_KEY).as_deref(), Some("t1"));
        assert!(BrowserStorage::session().get(EPHEMERAL_TOKEN_KEY).is_none());

        store.set_token("t2", false);
        assert!(BrowserStorage::local().get(DURABLE_TOKEN_KEY).is_none());
        assert_eq!(store.get_token().as_deref(), Some("t2"));

        store.clear_tokens();
        assert!(store.get_token().is_none());
    }
}
