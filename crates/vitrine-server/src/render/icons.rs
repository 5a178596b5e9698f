use serde::Serialize;

/// Store badge icon, picked by fuzzy match on the store name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreIcon {
    Amazon,
    MercadoLivre,
    Shopee,
    Generic,
}

impl StoreIcon {
    #[must_use]
    pub fn for_store(store: &str) -> Self {
        let store = store.to_lowercase();
        if store.contains("amazon") {
            Self::Amazon
        } else if store.contains("mercado") {
            Self::MercadoLivre
        } else if store.contains("shopee") {
            Self::Shopee
        } else {
            Self::Generic
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Amazon => "fab fa-amazon",
            Self::MercadoLivre => "fas fa-handshake",
            Self::Shopee => "fas fa-bag-shopping",
            Self::Generic => "fas fa-store",
        }
    }

    #[must_use]
    pub fn html(self) -> String {
        format!(r#"<i class="{}"></i>"#, self.class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_brands_match_anywhere_in_the_name() {
        assert_eq!(StoreIcon::for_store("Amazon Prime"), StoreIcon::Amazon);
        assert_eq!(StoreIcon::for_store("MERCADO LIVRE"), StoreIcon::MercadoLivre);
        assert_eq!(StoreIcon::for_store("Loja Shopee BR"), StoreIcon::Shopee);
    }

    #[test]
    fn unknown_store_gets_generic_icon() {
        let icon = StoreIcon::for_store("Magalu");
        assert_eq!(icon, StoreIcon::Generic);
        assert_eq!(icon.html(), r#"<i class="fas fa-store"></i>"#);
    }
}
