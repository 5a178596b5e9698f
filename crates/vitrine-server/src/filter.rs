//! Search + store chip + category chip visibility.
//!
//! Filter state is carried in the request's query string (`q`, `store`,
//! `category`), so every render recomputes visibility from scratch.

use std::collections::HashSet;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use vitrine_core::slugify;

use crate::render::{Board, Card, Chip};

const ALL: &str = "all";
const FAVORITES: &str = "favorites";

/// Characters left intact in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub q: Option<String>,
    pub store: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFilter {
    All,
    Favorites,
    Store(String),
}

impl StoreFilter {
    /// Values are slugified, so `Mercado Livre` and `mercadolivre` agree.
    fn parse(value: &str) -> Self {
        match slugify(value).as_str() {
            "" | ALL => StoreFilter::All,
            FAVORITES => StoreFilter::Favorites,
            slug => StoreFilter::Store(slug.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            StoreFilter::All => ALL,
            StoreFilter::Favorites => FAVORITES,
            StoreFilter::Store(slug) => slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Category(String),
}

impl CategoryFilter {
    fn parse(value: &str) -> Self {
        match slugify(value).as_str() {
            "" | ALL => CategoryFilter::All,
            slug => CategoryFilter::Category(slug.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL,
            CategoryFilter::Category(slug) => slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub store: StoreFilter,
    pub category: CategoryFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            store: StoreFilter::All,
            category: CategoryFilter::All,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn from_query(query: &FilterQuery) -> Self {
        Self {
            search: query.q.clone().unwrap_or_default(),
            store: StoreFilter::parse(query.store.as_deref().unwrap_or_default()),
            category: CategoryFilter::parse(query.category.as_deref().unwrap_or_default()),
        }
    }

    /// Clicking the active store chip reverts to all stores.
    #[must_use]
    pub fn click_store(&self, value: &str) -> Self {
        let clicked = StoreFilter::parse(value);
        let store = if clicked == self.store {
            StoreFilter::All
        } else {
            clicked
        };
        Self {
            store,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn click_category(&self, value: &str) -> Self {
        Self {
            category: CategoryFilter::parse(value),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn is_visible(&self, card: &Card, favorites: &HashSet<String>) -> bool {
        let matches_search = self.search.is_empty()
            || card
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase());

        let matches_store = match &self.store {
            StoreFilter::All => true,
            StoreFilter::Favorites => favorites.contains(&card.title),
            StoreFilter::Store(slug) => card.store_slug == *slug,
        };

        let matches_category = match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Category(slug) => card.category_slug.contains(slug.as_str()),
        };

        matches_search && matches_store && matches_category
    }

    #[must_use]
    pub fn visible<'a>(&self, board: &'a Board, favorites: &HashSet<String>) -> Vec<&'a Card> {
        board
            .cards()
            .iter()
            .filter(|card| self.is_visible(card, favorites))
            .collect()
    }

    /// Query string without the leading `?`; defaults are omitted.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("q={}", encode(&self.search)));
        }
        if self.store != StoreFilter::All {
            parts.push(format!("store={}", encode(self.store.as_str())));
        }
        if self.category != CategoryFilter::All {
            parts.push(format!("category={}", encode(self.category.as_str())));
        }
        parts.join("&")
    }

    #[must_use]
    pub fn href(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            "/".to_owned()
        } else {
            format!("/?{query}")
        }
    }

    /// `Todas`, `Favoritos`, then one chip per distinct store on the board.
    #[must_use]
    pub fn store_chips(&self, board: &Board) -> Vec<Chip> {
        let fixed = [
            (ALL.to_owned(), "Todas".to_owned()),
            (FAVORITES.to_owned(), "Favoritos".to_owned()),
        ];
        fixed
            .into_iter()
            .chain(board.stores())
            .map(|(value, label)| Chip {
                active: StoreFilter::parse(&value) == self.store,
                href: self.click_store(&value).href(),
                label,
                value,
            })
            .collect()
    }

    /// `Todas`, then one chip per distinct category on the board.
    #[must_use]
    pub fn category_chips(&self, board: &Board) -> Vec<Chip> {
        std::iter::once((ALL.to_owned(), "Todas".to_owned()))
            .chain(board.categories())
            .map(|(value, label)| Chip {
                active: CategoryFilter::parse(&value) == self.category,
                href: self.click_category(&value).href(),
                label,
                value,
            })
            .collect()
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_board, RenderOptions};
    use chrono::FixedOffset;
    use vitrine_catalog::fallback_catalog;
    use vitrine_core::ProductRecord;

    fn record(store: &str, category: &str, title: &str) -> ProductRecord {
        ProductRecord {
            store: store.to_owned(),
            category: category.to_owned(),
            title: title.to_owned(),
            ..fallback_catalog().remove(0)
        }
    }

    fn sample_board() -> Board {
        let records = vec![
            record("Amazon", "tecnologia", "Echo Dot 5"),
            record("Mercado Livre", "casa e jardim", "Mangueira"),
            record("Shopee", "beleza", "Sérum Vitamina C"),
            record("Amazon", "casa", "Aspirador Robô"),
        ];
        let options = RenderOptions {
            display_offset: FixedOffset::east_opt(0).unwrap(),
        };
        render_board(&records, &options, &HashSet::new())
    }

    fn titles(board: &Board, state: &FilterState, favorites: &HashSet<String>) -> Vec<String> {
        state
            .visible(board, favorites)
            .into_iter()
            .map(|c| c.title.clone())
            .collect()
    }

    fn query(q: Option<&str>, store: Option<&str>, category: Option<&str>) -> FilterQuery {
        FilterQuery {
            q: q.map(str::to_owned),
            store: store.map(str::to_owned),
            category: category.map(str::to_owned),
        }
    }

    #[test]
    fn default_state_shows_everything() {
        let board = sample_board();
        let state = FilterState::default();
        assert_eq!(state.visible(&board, &HashSet::new()).len(), board.len());
    }

    #[test]
    fn empty_search_with_all_filters_is_identity() {
        let board = sample_board();
        let state = FilterState::from_query(&query(Some(""), Some("all"), Some("all")));
        assert_eq!(state, FilterState::default());
        assert_eq!(state.visible(&board, &HashSet::new()).len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_substring_of_title() {
        let board = sample_board();
        let state = FilterState::from_query(&query(Some("ECHO"), None, None));
        assert_eq!(titles(&board, &state, &HashSet::new()), vec!["Echo Dot 5"]);

        let accented = FilterState::from_query(&query(Some("sérum"), None, None));
        assert_eq!(titles(&board, &accented, &HashSet::new()), vec!["Sérum Vitamina C"]);
    }

    #[test]
    fn whitespace_search_is_matched_literally() {
        let board = sample_board();
        let state = FilterState::from_query(&query(Some(" "), None, None));
        assert_eq!(
            titles(&board, &state, &HashSet::new()),
            vec!["Echo Dot 5", "Sérum Vitamina C", "Aspirador Robô"]
        );
    }

    #[test]
    fn hand_typed_store_and_category_values_are_slugified() {
        let board = sample_board();
        let state = FilterState::from_query(&query(None, Some("Mercado Livre"), Some("Casa")));
        assert_eq!(state.store, StoreFilter::Store("mercadolivre".to_owned()));
        assert_eq!(titles(&board, &state, &HashSet::new()), vec!["Mangueira"]);

        let amazon = FilterState::from_query(&query(None, Some("Amazon"), None));
        assert_eq!(
            titles(&board, &amazon, &HashSet::new()),
            vec!["Echo Dot 5", "Aspirador Robô"]
        );
        let favorites = FilterState::from_query(&query(None, Some("Favorites"), None));
        assert_eq!(favorites.store, StoreFilter::Favorites);
    }

    #[test]
    fn store_filter_matches_slug_exactly() {
        let board = sample_board();
        let state = FilterState::from_query(&query(None, Some("amazon"), None));
        assert_eq!(
            titles(&board, &state, &HashSet::new()),
            vec!["Echo Dot 5", "Aspirador Robô"]
        );
    }

    #[test]
    fn category_filter_matches_slug_substring() {
        let board = sample_board();
        // "casa" is a substring of both "casa" and "casaejardim".
        let state = FilterState::from_query(&query(None, None, Some("casa")));
        assert_eq!(
            titles(&board, &state, &HashSet::new()),
            vec!["Mangueira", "Aspirador Robô"]
        );
    }

    #[test]
    fn filters_are_anded() {
        let board = sample_board();
        let state = FilterState::from_query(&query(Some("a"), Some("amazon"), Some("casa")));
        assert_eq!(titles(&board, &state, &HashSet::new()), vec!["Aspirador Robô"]);
    }

    #[test]
    fn favorites_filter_shows_exactly_the_favorite_set() {
        let board = sample_board();
        let favorites: HashSet<String> =
            ["Mangueira".to_owned(), "Sérum Vitamina C".to_owned()].into_iter().collect();
        let state = FilterState::from_query(&query(None, Some("favorites"), None));
        assert_eq!(
            titles(&board, &state, &favorites),
            vec!["Mangueira", "Sérum Vitamina C"]
        );
        assert!(titles(&board, &state, &HashSet::new()).is_empty());
    }

    #[test]
    fn clicking_active_store_chip_reverts_to_all() {
        let state = FilterState::default().click_store("shopee");
        assert_eq!(state.store, StoreFilter::Store("shopee".to_owned()));
        assert_eq!(state.click_store("shopee").store, StoreFilter::All);
        assert_eq!(state.click_store("amazon").store, StoreFilter::Store("amazon".to_owned()));
        assert_eq!(state.click_store("favorites").store, StoreFilter::Favorites);
    }

    #[test]
    fn clicking_category_chip_always_selects_it() {
        let state = FilterState::default().click_category("beleza");
        assert_eq!(state.category, CategoryFilter::Category("beleza".to_owned()));
        assert_eq!(
            state.click_category("beleza").category,
            CategoryFilter::Category("beleza".to_owned())
        );
        assert_eq!(state.click_category("all").category, CategoryFilter::All);
    }

    #[test]
    fn query_string_round_trips_through_from_query() {
        let state = FilterState {
            search: "tv 4k & som".to_owned(),
            store: StoreFilter::Store("mercadolivre".to_owned()),
            category: CategoryFilter::Category("tecnologia".to_owned()),
        };
        assert_eq!(
            state.to_query_string(),
            "q=tv%204k%20%26%20som&store=mercadolivre&category=tecnologia"
        );
        assert_eq!(FilterState::default().href(), "/");
    }

    #[test]
    fn chips_list_fixed_entries_then_board_values() {
        let board = sample_board();
        let state = FilterState::default().click_store("amazon");

        let stores = state.store_chips(&board);
        let values: Vec<_> = stores.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["all", "favorites", "amazon", "mercadolivre", "shopee"]);
        let amazon = &stores[2];
        assert!(amazon.active);
        // Re-clicking the active chip leads back to all stores.
        assert_eq!(amazon.href, "/");
        assert_eq!(stores[4].href, "/?store=shopee");

        let categories = state.category_chips(&board);
        assert_eq!(categories[0].label, "Todas");
        assert!(categories[0].active);
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[1].href, "/?store=amazon&category=tecnologia");
    }
}
