//! The live catalog and the visitor state around it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use vitrine_catalog::{CatalogClient, CatalogError, CatalogSource};
use vitrine_core::{AppConfig, ProductRecord, ThemePreference};

use crate::countdown::{self, CountdownScheduler};
use crate::favorites::FavoritesStore;
use crate::filter::FilterState;
use crate::redirect::{OutboundLog, RedirectGate};
use crate::render::{
    annotate_favorites, render_board, render_page, Board, Card, PageView, RenderOptions,
};
use crate::storage::{JsonFileStore, KeyValueStore, StorageError};
use crate::theme::ThemeStore;
use crate::toast::ToastScheduler;

const TOAST_DISPLAY: Duration = Duration::from_secs(5);

pub struct Storefront {
    catalog: CatalogClient,
    sheet_url: String,
    options: RenderOptions,
    board: Arc<RwLock<Board>>,
    source: Mutex<Option<CatalogSource>>,
    favorites: FavoritesStore,
    themes: ThemeStore,
    countdown: CountdownScheduler,
    toasts: ToastScheduler,
    gate: Arc<RedirectGate<OutboundLog>>,
}

impl Storefront {
    /// Builds a storefront persisting visitor state to `config.state_path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.state_path));
        Self::with_store(config, store)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the HTTP client cannot be built.
    pub fn with_store(
        config: &AppConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(config.request_timeout_secs, &config.user_agent)?;
        Ok(Self {
            catalog,
            sheet_url: config.sheet_url.clone(),
            options: RenderOptions {
                display_offset: config.display_offset,
            },
            board: Arc::new(RwLock::new(Board::default())),
            source: Mutex::new(None),
            favorites: FavoritesStore::new(Arc::clone(&store)),
            themes: ThemeStore::new(store),
            countdown: CountdownScheduler::new(Duration::from_millis(config.countdown_tick_ms)),
            toasts: ToastScheduler::new(
                Duration::from_secs(config.toast_min_secs),
                Duration::from_secs(config.toast_max_secs),
                TOAST_DISPLAY,
            ),
            gate: Arc::new(RedirectGate::new(
                Duration::from_millis(config.redirect_delay_ms),
                Duration::from_millis(config.redirect_hide_ms),
                OutboundLog::new(),
            )),
        })
    }

    /// Fetches the sheet and installs the result. Never fails: an unusable
    /// sheet installs the fallback catalog.
    pub async fn reload(&self) -> CatalogSource {
        let loaded = self.catalog.load(&self.sheet_url).await;
        self.install(&loaded.records, loaded.source).await;
        loaded.source
    }

    /// Renders `records` into a complete board, swaps it in, then restarts
    /// the countdown and toast tasks against it.
    pub async fn install(&self, records: &[ProductRecord], source: CatalogSource) {
        let favorites = self.favorite_set().await;
        let mut board = render_board(records, &self.options, &favorites);
        countdown::tick(&mut board, Utc::now());
        let count = board.len();

        *self.board.write().await = board;
        *self.source.lock().unwrap_or_else(PoisonError::into_inner) = Some(source);

        self.countdown.start(Arc::clone(&self.board));
        self.toasts.start(Arc::clone(&self.board));
        tracing::info!(?source, count, "catalog installed");
    }

    /// Runs visitor-state I/O on the blocking pool.
    async fn with_state<T, F>(&self, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&FavoritesStore, &ThemeStore) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let favorites = self.favorites.clone();
        let themes = self.themes.clone();
        tokio::task::spawn_blocking(move || work(&favorites, &themes)).await?
    }

    /// Favorited titles in insertion order, read once.
    pub async fn favorite_titles(&self) -> Vec<String> {
        self.with_state(|favorites, _| Ok(favorites.titles()))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "favorites unreadable, treating as empty");
                Vec::new()
            })
    }

    async fn favorite_set(&self) -> HashSet<String> {
        self.favorite_titles().await.into_iter().collect()
    }

    /// The effective theme and whether it was explicitly saved.
    pub async fn theme(&self, prefers_dark: bool) -> (ThemePreference, bool) {
        self.with_state(move |_, themes| {
            let saved = themes.saved();
            Ok((ThemePreference::resolve(saved, prefers_dark), saved.is_some()))
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "theme preference unreadable");
            (ThemePreference::resolve(None, prefers_dark), false)
        })
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the preference cannot be persisted.
    pub async fn toggle_theme(&self, prefers_dark: bool) -> Result<ThemePreference, StorageError> {
        self.with_state(move |_, themes| themes.toggle(prefers_dark))
            .await
    }

    /// A copy of the board with favorites re-read from storage.
    pub async fn snapshot(&self) -> Board {
        self.snapshot_with_favorites().await.0
    }

    /// Like [`Storefront::snapshot`], also returning the favorites set the
    /// board was annotated with.
    pub async fn snapshot_with_favorites(&self) -> (Board, HashSet<String>) {
        let favorites = self.favorite_set().await;
        let mut board = self.board.read().await.clone();
        annotate_favorites(&mut board, &favorites);
        (board, favorites)
    }

    /// The full page for `filter`; every card is emitted, hidden or not.
    pub async fn page_html(&self, filter: &FilterState, prefers_dark: bool) -> String {
        let (board, favorites) = self.snapshot_with_favorites().await;
        let (theme, _) = self.theme(prefers_dark).await;
        let toast = self.toasts.current().await;

        let view = PageView {
            theme,
            search: &filter.search,
            store_value: filter.store.as_str(),
            category_value: filter.category.as_str(),
            store_chips: filter.store_chips(&board),
            category_chips: filter.category_chips(&board),
            favorite_count: favorites.len(),
            cards: board
                .cards()
                .iter()
                .map(|card| (card, filter.is_visible(card, &favorites)))
                .collect(),
            return_query: filter.to_query_string(),
            toast: toast.as_ref(),
            countdown_tick_ms: u64::try_from(self.countdown.period().as_millis())
                .unwrap_or(u64::MAX),
        };
        render_page(&view)
    }

    pub async fn card_count(&self) -> usize {
        self.board.read().await.len()
    }

    pub async fn card(&self, id: usize) -> Option<Card> {
        let mut card = self.board.read().await.get(id).cloned()?;
        card.favorite = self.favorite_titles().await.contains(&card.title);
        Some(card)
    }

    /// Flips the favorite state of card `id`. `Ok(None)` for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the favorites cannot be persisted.
    pub async fn toggle_favorite(&self, id: usize) -> Result<Option<(Card, bool)>, StorageError> {
        let Some(mut card) = self.board.read().await.get(id).cloned() else {
            return Ok(None);
        };
        let title = card.title.clone();
        let favorite = self
            .with_state(move |favorites, _| favorites.toggle(&title))
            .await?;
        card.favorite = favorite;
        Ok(Some((card, favorite)))
    }

    #[must_use]
    pub fn source(&self) -> Option<CatalogSource> {
        *self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastScheduler {
        &self.toasts
    }

    #[must_use]
    pub fn countdown(&self) -> &CountdownScheduler {
        &self.countdown
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<RedirectGate<OutboundLog>> {
        &self.gate
    }
}
