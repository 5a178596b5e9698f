use vitrine_core::ProductRecord;

/// The single offer shown when the sheet cannot be fetched or is empty.
#[must_use]
pub fn fallback_catalog() -> Vec<ProductRecord> {
    vec![ProductRecord {
        store: "Amazon".to_owned(),
        category: "tecnologia".to_owned(),
        title: "Smart TV Multi 50\" 4K Google TV".to_owned(),
        current_price: "2.849".to_owned(),
        previous_price: Some("3.299".to_owned()),
        badge_text: Some("Mais Vendido".to_owned()),
        badge_kind: Some("venda".to_owned()),
        image_url: "https://m.media-amazon.com/images/I/61RV6khFSQL._AC_SL1000_.jpg".to_owned(),
        destination_url:
            "https://www.amazon.com.br/Smart-Multi-Compat%C3%ADvel-Alexa-Google/dp/B0FLRC6T9L"
                .to_owned(),
        expiry: Some("2026-12-31T23:59:59".to_owned()),
    }]
}
