use serde::{Deserialize, Serialize};

/// A catalog entry after header aliases and defaults have been resolved.
///
/// Records are rebuilt from scratch on every catalog load and never mutated
/// afterwards; a reload replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Store display name, e.g. `"Mercado Livre"`.
    pub store: String,
    pub category: String,
    /// Identity key for favorites and filtering. Assumed unique per catalog.
    pub title: String,
    /// Pre-formatted price text exactly as published, e.g. `"2.849"`.
    pub current_price: String,
    pub previous_price: Option<String>,
    pub badge_text: Option<String>,
    /// Presentational badge variant, rendered as `badge-{kind}`.
    pub badge_kind: Option<String>,
    pub image_url: String,
    /// The real (un-cloaked) affiliate link.
    pub destination_url: String,
    /// Normalized expiry text. Still may fail to parse; consumers validate.
    pub expiry: Option<String>,
}

impl ProductRecord {
    /// Filter key for the store chip row.
    #[must_use]
    pub fn store_slug(&self) -> String {
        slugify(&self.store)
    }

    /// Filter key for the category chip row.
    #[must_use]
    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }
}

/// Lower-cases `value` and strips every whitespace character.
///
/// `"Mercado Livre"` becomes `"mercadolivre"`. Chips and cards must both be
/// keyed through this function so the filter join matches exactly.
#[must_use]
pub fn slugify(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(store: &str, category: &str) -> ProductRecord {
        ProductRecord {
            store: store.to_string(),
            category: category.to_string(),
            title: "Fone Bluetooth".to_string(),
            current_price: "99,90".to_string(),
            previous_price: None,
            badge_text: None,
            badge_kind: None,
            image_url: String::new(),
            destination_url: "#".to_string(),
            expiry: None,
        }
    }

    #[test]
    fn slugify_strips_all_whitespace_and_lowercases() {
        assert_eq!(slugify("Mercado Livre"), "mercadolivre");
        assert_eq!(slugify("  Casa  e\tCozinha "), "casaecozinha");
        assert_eq!(slugify("AMAZON"), "amazon");
    }

    #[test]
    fn slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("Eletrônicos"), "eletrônicos");
    }

    #[test]
    fn record_slugs_follow_display_names() {
        let r = record("Mercado Livre", "Casa e Cozinha");
        assert_eq!(r.store_slug(), "mercadolivre");
        assert_eq!(r.category_slug(), "casaecozinha");
    }

    #[test]
    fn record_serializes_optional_fields_as_null() {
        let json = serde_json::to_value(record("Amazon", "tecnologia")).expect("serialize");
        assert!(json["previous_price"].is_null());
        assert_eq!(json["store"], "Amazon");
    }
}
