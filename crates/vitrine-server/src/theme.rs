use std::sync::Arc;

use vitrine_core::ThemePreference;

use crate::storage::{KeyValueStore, StorageError};

pub const THEME_KEY: &str = "theme";

#[derive(Clone)]
pub struct ThemeStore {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn saved(&self) -> Option<ThemePreference> {
        match self.store.get(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(ThemePreference::parse),
            Err(e) => {
                tracing::warn!(error = %e, "theme preference unreadable");
                None
            }
        }
    }

    #[must_use]
    pub fn current(&self, prefers_dark: bool) -> ThemePreference {
        ThemePreference::resolve(self.saved(), prefers_dark)
    }

    /// Flips the effective theme and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the preference cannot be written.
    pub fn toggle(&self, prefers_dark: bool) -> Result<ThemePreference, StorageError> {
        let next = self.current(prefers_dark).toggled();
        self.store.set(THEME_KEY, next.as_str())?;
        Ok(next)
    }
}
