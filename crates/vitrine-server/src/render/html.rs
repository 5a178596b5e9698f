use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::Card;

/// Renders one card. `return_query` is the filter query the favorite form
/// should come back to.
#[must_use]
pub fn card_html(card: &Card, hidden: bool, return_query: &str) -> String {
    let icon = card.store_icon.html();
    let store = text(&card.store);
    let store_attr = attr(&card.store);
    let title = text(&card.title);
    let title_attr = attr(&card.title);

    let mut classes = String::from("card");
    if hidden {
        classes.push_str(" hidden");
    }

    let mut img_classes = String::from("card-img");
    if card.lazy_image {
        img_classes.push_str(" skeleton");
    }
    let loading = if card.lazy_image { "lazy" } else { "eager" };

    let badge = card.badge.as_ref().map_or_else(String::new, |b| {
        format!(
            r#"<div class="promo-badge badge-{}"><i class="fas fa-bolt"></i> {}</div>"#,
            attr(&b.kind),
            text(&b.text)
        )
    });

    let previous = card.previous_price.as_ref().map_or_else(String::new, |p| {
        format!(" <small>R$ {}</small>", text(p))
    });

    let countdown = match (&card.expiry, &card.countdown) {
        (Some(expiry), Some(countdown)) if countdown.is_ended() => format!(
            r#"<div class="countdown-container ended" data-expiry="{}">{}</div>"#,
            expiry.to_rfc3339(),
            countdown.text()
        ),
        (Some(expiry), Some(countdown)) => format!(
            r#"<div class="countdown-container pulse-timer" data-expiry="{}"><span class="countdown-label"><i class="fas fa-clock"></i> Expira em:</span> <span class="countdown-values">{}</span></div>"#,
            expiry.to_rfc3339(),
            countdown.text()
        ),
        _ => String::new(),
    };

    let favorite_class = if card.favorite {
        "btn-favorite is-favorite"
    } else {
        "btn-favorite"
    };
    let query_suffix = if return_query.is_empty() {
        String::new()
    } else {
        format!("?{return_query}")
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="{classes}" data-id="{id}" data-store="{store_slug}" data-category="{category_slug}">
  <div class="{img_classes}">
    <img src="{image}" alt="{title_attr}" loading="{loading}">
    <form method="post" action="/favorites/{id}/toggle{query_suffix}">
      <button type="submit" class="{favorite_class}" aria-label="Adicionar aos favoritos"><i class="fas fa-heart"></i></button>
    </form>
    {badge}
    <span class="card-tag">{icon} {store}</span>
  </div>
  <div class="card-content">
    <h3>{title}</h3>
    <div class="price">R$ {price}{previous}</div>
    {countdown}
    <a href="{outbound}" target="_blank" rel="noopener" class="btn-afiliado {store_slug} btn-cloak" data-url="{destination}" data-store-name="{store_attr}">{icon} VER OFERTA NA {store_upper}</a>
    <div class="share-actions">
      <a href="/share/{id}/whatsapp" target="_blank" rel="noopener" class="share-btn whatsapp"><i class="fab fa-whatsapp"></i></a>
      <a href="/share/{id}/telegram" target="_blank" rel="noopener" class="share-btn telegram"><i class="fab fa-telegram-plane"></i></a>
    </div>
  </div>
</div>"#,
        id = card.id,
        store_slug = attr(&card.store_slug),
        category_slug = attr(&card.category_slug),
        image = attr(&card.image_url),
        price = text(&card.current_price),
        outbound = attr(&card.outbound_href),
        destination = attr(&card.destination_url),
        store_upper = text(&card.store.to_uppercase()),
    );
    html
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::FixedOffset;
    use vitrine_catalog::fallback_catalog;

    use super::*;
    use crate::countdown::Countdown;
    use crate::render::{render_board, RenderOptions};

    fn options() -> RenderOptions {
        RenderOptions {
            display_offset: FixedOffset::west_opt(3 * 3600).unwrap(),
        }
    }

    fn fallback_card() -> Card {
        render_board(&fallback_catalog(), &options(), &HashSet::new()).cards()[0].clone()
    }

    #[test]
    fn card_html_escapes_markup_in_sheet_values() {
        let mut card = fallback_card();
        card.title = r#"<b>"Oferta"</b> & cia"#.to_owned();
        let html = card_html(&card, false, "");
        assert!(html.contains(r#"<h3>&lt;b&gt;"Oferta"&lt;/b&gt; &amp; cia</h3>"#));
        assert!(html.contains(r#"alt="&lt;b&gt;&quot;Oferta&quot;&lt;/b&gt; &amp; cia""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn card_html_contains_every_part() {
        let html = card_html(&fallback_card(), false, "");
        assert!(html.contains(r#"class="card""#));
        assert!(html.contains(r#"data-store="amazon""#));
        assert!(html.contains(r#"loading="lazy""#));
        assert!(html.contains("card-img skeleton"));
        assert!(html.contains("promo-badge badge-venda"));
        assert!(html.contains(r#"<h3>Smart TV Multi 50" 4K Google TV</h3>"#));
        assert!(html.contains(r#"alt="Smart TV Multi 50&quot; 4K Google TV""#));
        assert!(html.contains("R$ 2.849 <small>R$ 3.299</small>"));
        assert!(html.contains("countdown-container"));
        assert!(html.contains(r#"href="/go/0""#));
        assert!(html.contains("VER OFERTA NA AMAZON"));
        assert!(html.contains("/share/0/whatsapp"));
        assert!(html.contains("/share/0/telegram"));
        assert!(html.contains(r#"action="/favorites/0/toggle""#));
    }

    #[test]
    fn card_html_omits_countdown_for_unparseable_expiry() {
        let mut record = fallback_catalog().remove(0);
        record.expiry = Some("not-a-date".to_owned());
        let board = render_board(&[record], &options(), &HashSet::new());
        let html = card_html(&board.cards()[0], false, "");
        assert!(!html.contains("countdown-container"));
        // The rest of the card still renders.
        assert!(html.contains("VER OFERTA NA AMAZON"));
    }

    #[test]
    fn card_html_renders_ended_state() {
        let mut card = fallback_card();
        card.countdown = Some(Countdown::Ended);
        let html = card_html(&card, false, "");
        assert!(html.contains("OFERTA ENCERRADA"));
        assert!(!html.contains("countdown-values"));
    }

    #[test]
    fn card_html_marks_hidden_and_favorite_and_keeps_return_query() {
        let mut card = fallback_card();
        card.favorite = true;
        let html = card_html(&card, true, "store=favorites");
        assert!(html.contains(r#"class="card hidden""#));
        assert!(html.contains("btn-favorite is-favorite"));
        assert!(html.contains(r#"action="/favorites/0/toggle?store=favorites""#));
    }
}
