use std::collections::HashSet;
use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageError};

pub const FAVORITES_KEY: &str = "vitrine_favorites";

/// Favorited product titles, stored as a JSON array under [`FAVORITES_KEY`].
///
/// Every call reads the medium afresh; nothing is cached between calls.
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Titles in insertion order. Unreadable or corrupt state reads as empty.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "favorites unreadable, treating as empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "favorites value is not a JSON string array");
            Vec::new()
        })
    }

    #[must_use]
    pub fn title_set(&self) -> HashSet<String> {
        self.titles().into_iter().collect()
    }

    #[must_use]
    pub fn is_favorite(&self, title: &str) -> bool {
        self.titles().iter().any(|t| t == title)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.titles().len()
    }

    /// Flips membership of `title` and persists immediately.
    ///
    /// Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated list cannot be written.
    pub fn toggle(&self, title: &str) -> Result<bool, StorageError> {
        let mut titles = self.titles();
        let now_favorite = if let Some(pos) = titles.iter().position(|t| t == title) {
            titles.remove(pos);
            false
        } else {
            titles.push(title.to_owned());
            true
        };
        let encoded = serde_json::to_string(&titles).map_err(StorageError::Encode)?;
        self.store.set(FAVORITES_KEY, &encoded)?;
        tracing::debug!(title, favorite = now_favorite, count = titles.len(), "favorite toggled");
        Ok(now_favorite)
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the key cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(FAVORITES_KEY)
    }
}
