//! Single source of truth for accessibility preferences within a page session.
//!
//! The store is write-through: every successful mutation persists the full
//! record immediately, and a failed write never rolls back the in-memory
//! state. Projection onto the document is the caller's job (see `applier`).

use crate::config::STORAGE_KEY;
use crate::{defaults, Position, Settings, StoredPrefs, Toggle};
use log::{debug, error, warn};
use std::fmt;

#[derive(Debug)]
pub enum StorageError {
    /// The platform exposes no per-origin storage (private mode, sandbox).
    Unavailable,
    Write(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "persistent storage is unavailable"),
            StorageError::Write(detail) => write!(f, "failed to write preferences: {}", detail),
        }
    }
}

impl std::error::Error for StorageError {}

/// Seam between the store and the platform's per-origin storage.
pub trait PreferenceStorage {
    fn read(&self) -> Option<String>;
    fn write(&self, payload: &str) -> Result<(), StorageError>;
}

/// Browser `localStorage` under the fixed preference key.
pub struct LocalStorage;

impl PreferenceStorage for LocalStorage {
    fn read(&self) -> Option<String> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok().flatten()?;
        storage.get_item(STORAGE_KEY).ok().flatten()
    }

    fn write(&self, payload: &str) -> Result<(), StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        storage
            .set_item(STORAGE_KEY, payload)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

/// Owns the settings record for one page session.
pub struct SettingsStore<S: PreferenceStorage> {
    storage: S,
    settings: Settings,
}

impl<S: PreferenceStorage> SettingsStore<S> {
    pub fn new(storage: S, position: Position) -> Self {
        SettingsStore {
            storage,
            settings: Settings::with_position(position),
        }
    }

    /// Hydrates the record from persistent storage. Absent or corrupt data
    /// is treated as "no stored preferences": logged, defaults kept, no
    /// error surfaces to the caller.
    pub fn load(&mut self) {
        let Some(raw) = self.storage.read() else {
            debug!("no stored accessibility preferences");
            return;
        };
        match serde_json::from_str::<StoredPrefs>(&raw) {
            Ok(stored) => {
                self.settings.merge_stored(stored);
                debug!("loaded accessibility preferences");
            }
            Err(e) => warn!("Error loading accessibility preferences: {}", e),
        }
    }

    /// Current settings snapshot.
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Direct boolean update; persists the full record.
    pub fn set_flag(&mut self, toggle: Toggle, value: bool) {
        self.settings.set_flag(toggle, value);
        self.save();
    }

    /// One step up; silently ignored at the ceiling. Returns whether the
    /// value changed.
    pub fn increase_font(&mut self) -> bool {
        if self.settings.font_size >= defaults::FONT_MAX {
            return false;
        }
        self.settings.font_size += defaults::FONT_STEP;
        self.save();
        true
    }

    /// One step down; silently ignored at the floor.
    pub fn decrease_font(&mut self) -> bool {
        if self.settings.font_size <= defaults::FONT_MIN {
            return false;
        }
        self.settings.font_size -= defaults::FONT_STEP;
        self.save();
        true
    }

    /// Restores every feature field to its default and persists. The widget
    /// position is kept: it belongs to the embedding, not the user.
    pub fn reset(&mut self) {
        self.settings = Settings::with_position(self.settings.position);
        self.save();
    }

    fn save(&self) {
        match serde_json::to_string(&self.settings) {
            Ok(payload) => {
                if let Err(e) = self.storage.write(&payload) {
                    error!("Error saving accessibility preferences: {}", e);
                }
            }
            Err(e) => error!("Error serializing accessibility preferences: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage(Rc<RefCell<Option<String>>>);

    impl PreferenceStorage for MemoryStorage {
        fn read(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn write(&self, payload: &str) -> Result<(), StorageError> {
            *self.0.borrow_mut() = Some(payload.to_string());
            Ok(())
        }
    }

    struct FailingStorage;

    impl PreferenceStorage for FailingStorage {
        fn read(&self) -> Option<String> {
            None
        }

        fn write(&self, _payload: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota exceeded".to_string()))
        }
    }

    fn seeded(payload: &str) -> SettingsStore<MemoryStorage> {
        let storage = MemoryStorage::default();
        *storage.0.borrow_mut() = Some(payload.to_string());
        let mut store = SettingsStore::new(storage, Position::default());
        store.load();
        store
    }

    #[test]
    fn decrement_floors_at_80() {
        let mut store = SettingsStore::new(MemoryStorage::default(), Position::default());
        let mut observed = vec![store.get().font_size];
        for _ in 0..6 {
            store.decrease_font();
            observed.push(store.get().font_size);
        }
        assert_eq!(observed, vec![100, 90, 80, 80, 80, 80, 80]);
        assert!(!store.decrease_font());
    }

    #[test]
    fn increment_caps_at_200() {
        let mut store = SettingsStore::new(MemoryStorage::default(), Position::default());
        for _ in 0..15 {
            store.increase_font();
        }
        assert_eq!(store.get().font_size, 200);
        assert!(!store.increase_font());
        assert_eq!(store.get().font_size, 200);
    }

    #[test]
    fn reset_restores_defaults_and_keeps_position() {
        let mut store = SettingsStore::new(MemoryStorage::default(), Position::TopLeft);
        store.set_flag(Toggle::HighContrast, true);
        store.set_flag(Toggle::Tts, true);
        store.increase_font();
        store.reset();
        assert_eq!(*store.get(), Settings::with_position(Position::TopLeft));
    }

    #[test]
    fn update_then_reload_reproduces_the_record() {
        let storage = MemoryStorage::default();
        let mut store = SettingsStore::new(storage.clone(), Position::default());
        store.set_flag(Toggle::Grayscale, true);
        store.set_flag(Toggle::KeyboardNav, true);
        store.increase_font();
        store.increase_font();
        store.decrease_font();
        let written = store.get().clone();

        // Simulated page reload: a fresh store over the same storage.
        let mut reloaded = SettingsStore::new(storage, Position::default());
        reloaded.load();
        assert_eq!(*reloaded.get(), written);
    }

    #[test]
    fn corrupt_payload_falls_back_to_defaults() {
        let store = seeded("{not json");
        assert_eq!(*store.get(), Settings::default());
    }

    #[test]
    fn stored_out_of_range_font_is_accepted_as_is() {
        // Leniency kept from the original: load does not clamp.
        let store = seeded(r#"{"fontSize":5000}"#);
        assert_eq!(store.get().font_size, 5000);
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let mut store = SettingsStore::new(FailingStorage, Position::default());
        store.set_flag(Toggle::HighContrast, true);
        assert!(store.get().high_contrast);
        assert!(store.increase_font());
        assert_eq!(store.get().font_size, 110);
    }
}
