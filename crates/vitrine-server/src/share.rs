use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::render::Card;

/// The set left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    WhatsApp,
    Telegram,
}

impl SharePlatform {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "whatsapp" => Some(SharePlatform::WhatsApp),
            "telegram" => Some(SharePlatform::Telegram),
            _ => None,
        }
    }

    #[must_use]
    pub fn share_url(self, card: &Card) -> String {
        let message = share_message(&card.title, &card.price_text(), &card.destination_url);
        match self {
            SharePlatform::WhatsApp => whatsapp_url(&message),
            SharePlatform::Telegram => telegram_url(&card.destination_url, &message),
        }
    }
}

#[must_use]
pub fn share_message(title: &str, price: &str, link: &str) -> String {
    format!("🔥 *Achadinho na Vitrine!* \n\n✨ {title}\n💰 *{price}*\n\n👉 Confira aqui: {link}")
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[must_use]
pub fn whatsapp_url(message: &str) -> String {
    format!("https://wa.me/?text={}", encode(message))
}

#[must_use]
pub fn telegram_url(link: &str, message: &str) -> String {
    format!(
        "https://t.me/share/url?url={}&text={}",
        encode(link),
        encode(message)
    )
}
