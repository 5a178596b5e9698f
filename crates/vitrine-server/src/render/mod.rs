//! Card rendering and the post-render passes.
//!
//! [`render_card`] is pure. [`render_board`] renders every record first and
//! only then runs the passes, so each pass sees the complete board:
//! favorites annotation, redirect wiring, lazy-load observation. The fourth
//! pass, countdown scheduling, needs the shared board and is run by
//! [`crate::storefront::Storefront::install`].

mod html;
mod icons;
mod page;

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use vitrine_catalog::parse_expiry;
use vitrine_core::ProductRecord;

use crate::countdown::Countdown;

pub use html::card_html;
pub use icons::StoreIcon;
pub use page::{render_interstitial, render_not_found, render_page, Chip, PageView};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub display_offset: FixedOffset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub kind: String,
}

/// One rendered product unit.
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub id: usize,
    pub title: String,
    pub store: String,
    pub store_slug: String,
    pub category: String,
    pub category_slug: String,
    pub current_price: String,
    pub previous_price: Option<String>,
    pub badge: Option<Badge>,
    pub image_url: String,
    pub destination_url: String,
    pub store_icon: StoreIcon,
    /// Present only when the record's expiry parsed to a valid instant.
    pub expiry: Option<DateTime<Utc>>,
    /// `Some` iff `expiry` is `Some`.
    pub countdown: Option<Countdown>,
    pub favorite: bool,
    /// `#` until [`wire_redirects`] routes it through the gate.
    pub outbound_href: String,
    pub lazy_image: bool,
}

impl Card {
    #[must_use]
    pub fn price_text(&self) -> String {
        format!("R$ {}", self.current_price)
    }
}

#[must_use]
pub fn render_card(id: usize, record: &ProductRecord, options: &RenderOptions) -> Card {
    let expiry = record
        .expiry
        .as_deref()
        .and_then(|raw| parse_expiry(raw, options.display_offset));

    let badge = record.badge_text.as_ref().map(|text| Badge {
        text: text.clone(),
        kind: record
            .badge_kind
            .clone()
            .unwrap_or_else(|| "venda".to_owned()),
    });

    Card {
        id,
        title: record.title.clone(),
        store: record.store.clone(),
        store_slug: record.store_slug(),
        category: record.category.clone(),
        category_slug: record.category_slug(),
        current_price: record.current_price.clone(),
        previous_price: record.previous_price.clone(),
        badge,
        image_url: record.image_url.clone(),
        destination_url: record.destination_url.clone(),
        store_icon: StoreIcon::for_store(&record.store),
        expiry,
        countdown: expiry.map(|_| Countdown::Pending),
        favorite: false,
        outbound_href: "#".to_owned(),
        lazy_image: false,
    }
}

/// The complete set of rendered cards for one catalog load.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Card> {
        self.cards.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Distinct `(slug, display name)` stores in first-seen order.
    #[must_use]
    pub fn stores(&self) -> Vec<(String, String)> {
        distinct(self.cards.iter().map(|c| (&c.store_slug, &c.store)))
    }

    /// Distinct `(slug, display name)` categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<(String, String)> {
        distinct(self.cards.iter().map(|c| (&c.category_slug, &c.category)))
    }
}

fn distinct<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    pairs
        .filter(|(slug, _)| seen.insert(*slug))
        .map(|(slug, name)| (slug.clone(), name.clone()))
        .collect()
}

pub fn annotate_favorites(board: &mut Board, favorites: &HashSet<String>) {
    for card in board.cards_mut() {
        card.favorite = favorites.contains(&card.title);
    }
}

pub fn wire_redirects(board: &mut Board) {
    for card in board.cards_mut() {
        card.outbound_href = format!("/go/{}", card.id);
    }
}

pub fn observe_images(board: &mut Board) {
    for card in board.cards_mut() {
        card.lazy_image = true;
    }
}

/// Renders every record, then runs the synchronous post-render passes.
#[must_use]
pub fn render_board(
    records: &[ProductRecord],
    options: &RenderOptions,
    favorites: &HashSet<String>,
) -> Board {
    let cards = records
        .iter()
        .enumerate()
        .map(|(id, record)| render_card(id, record, options))
        .collect();
    let mut board = Board::new(cards);

    annotate_favorites(&mut board, favorites);
    wire_redirects(&mut board);
    observe_images(&mut board);
    board
}
