//! Header-alias resolution from [`RawRecord`] to [`ProductRecord`].
//!
//! Each canonical field owns an ordered list of accepted header spellings.
//! Lookup is case-insensitive, so column order and casing in the sheet do
//! not matter; the first alias with a non-empty value wins.

use vitrine_core::ProductRecord;

use crate::csv::RawRecord;
use crate::expiry::normalize_expiry;

const STORE_ALIASES: &[&str] = &["Loja", "Store"];
const CATEGORY_ALIASES: &[&str] = &["Categoria", "Category"];
const TITLE_ALIASES: &[&str] = &["Titulo", "Título", "Title", "Produto", "Nome"];
const CURRENT_PRICE_ALIASES: &[&str] =
    &["PrecoAtual", "Preço Atual", "Preco", "Preço", "Price"];
const PREVIOUS_PRICE_ALIASES: &[&str] = &["PrecoAntigo", "Preço Antigo", "OldPrice"];
const BADGE_ALIASES: &[&str] = &["Badge", "Selo"];
const BADGE_KIND_ALIASES: &[&str] = &["BadgeTipo", "TipoBadge", "BadgeType"];
const IMAGE_ALIASES: &[&str] = &["LinkImagem", "Imagem", "Image", "ImageUrl"];
const LINK_ALIASES: &[&str] = &["LinkReal", "Link", "Url", "LinkAfiliado"];
const EXPIRY_ALIASES: &[&str] = &["Expiry", "Expira", "Validade"];

const DEFAULT_STORE: &str = "Loja";
const DEFAULT_CATEGORY: &str = "geral";
const DEFAULT_TITLE: &str = "Oferta";
const DEFAULT_PRICE: &str = "0,00";
const DEFAULT_BADGE_KIND: &str = "venda";
const DEFAULT_LINK: &str = "#";

/// Returns the first non-empty value among `aliases`, trimmed.
fn resolve(record: &RawRecord, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        record
            .get_ignore_case(alias)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    })
}

fn resolve_or(record: &RawRecord, aliases: &[&str], default: &str) -> String {
    resolve(record, aliases).unwrap_or_else(|| default.to_owned())
}

/// Maps one decoded row to a canonical record, applying field defaults.
#[must_use]
pub fn normalize_record(record: &RawRecord) -> ProductRecord {
    let badge_text = resolve(record, BADGE_ALIASES);
    // A kind without text would render an empty badge; drop it.
    let badge_kind = badge_text.as_ref().map(|_| {
        resolve_or(record, BADGE_KIND_ALIASES, DEFAULT_BADGE_KIND).to_lowercase()
    });

    ProductRecord {
        store: resolve_or(record, STORE_ALIASES, DEFAULT_STORE),
        category: resolve_or(record, CATEGORY_ALIASES, DEFAULT_CATEGORY),
        title: resolve_or(record, TITLE_ALIASES, DEFAULT_TITLE),
        current_price: resolve_or(record, CURRENT_PRICE_ALIASES, DEFAULT_PRICE),
        previous_price: resolve(record, PREVIOUS_PRICE_ALIASES),
        badge_text,
        badge_kind,
        image_url: resolve(record, IMAGE_ALIASES).unwrap_or_default(),
        destination_url: resolve_or(record, LINK_ALIASES, DEFAULT_LINK),
        expiry: resolve(record, EXPIRY_ALIASES).map(|raw| normalize_expiry(&raw)),
    }
}

#[must_use]
pub fn normalize_records(records: &[RawRecord]) -> Vec<ProductRecord> {
    records.iter().map(normalize_record).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
