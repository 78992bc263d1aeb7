use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const DEFAULT_BEST_SCORE_KEY: &str = "game2048_bestScore";

/// String key-value persistence with `localStorage` semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// while an engine owns another.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Browser `window.localStorage`. Every access is best effort: a missing
/// window, disabled storage or quota error is logged and treated as absent.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(store) => {
                if store.set_item(key, value).is_err() {
                    crate::log(&format!("[store] failed to write {key}"));
                }
            }
            None => crate::log("[store] localStorage unavailable"),
        }
    }
}

/// Best score persisted as a decimal string under a fixed key.
pub struct BestScore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl BestScore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Absent or malformed values read as 0.
    pub fn load(&self) -> u32 {
        self.store
            .get_item(&self.key)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    pub fn save(&mut self, score: u32) {
        self.store.set_item(&self.key, &score.to_string());
    }
}
