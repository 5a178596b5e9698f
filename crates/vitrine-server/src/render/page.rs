use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use vitrine_core::ThemePreference;

use super::html::card_html;
use super::{Card, StoreIcon};
use crate::toast::Toast;

const PAGE_TEMPLATE: &str = include_str!("page.html");
const INTERSTITIAL_TEMPLATE: &str = include_str!("interstitial.html");
/// Shorter than the toast display time, so every toast is seen.
const TOAST_POLL_MS: u64 = 3_000;

/// One filter control. `href` already encodes the state after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub value: String,
    pub active: bool,
    pub href: String,
}

pub struct PageView<'a> {
    pub theme: ThemePreference,
    pub search: &'a str,
    pub store_value: &'a str,
    pub category_value: &'a str,
    pub store_chips: Vec<Chip>,
    pub category_chips: Vec<Chip>,
    pub favorite_count: usize,
    /// Every card with its visibility under the active filter.
    pub cards: Vec<(&'a Card, bool)>,
    /// Current filter as a query string, without the leading `?`.
    pub return_query: String,
    pub toast: Option<&'a Toast>,
    /// How often the page script refreshes countdown text.
    pub countdown_tick_ms: u64,
}

/// Single-pass `{{token}}` substitution, so values that happen to contain a
/// token are never expanded a second time.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(token, _)| *token == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn chips_html(chips: &[Chip], class: &str, data_attr: &str) -> String {
    chips.iter().fold(String::new(), |mut out, chip| {
        let active = if chip.active { " active" } else { "" };
        let _ = write!(
            out,
            r#"<a class="{class}{active}" {data_attr}="{}" href="{}">{}</a>"#,
            attr(&chip.value),
            attr(&chip.href),
            text(&chip.label),
        );
        out
    })
}

fn toast_html(toast: Option<&Toast>) -> String {
    toast.map_or_else(String::new, |t| {
        format!(
            r#"  <div class="toast" role="status"><i class="fas fa-fire"></i> {}</div>"#,
            text(&t.message)
        )
    })
}

#[must_use]
pub fn render_page(view: &PageView<'_>) -> String {
    let cards = view
        .cards
        .iter()
        .map(|(card, visible)| card_html(card, !visible, &view.return_query))
        .collect::<Vec<_>>()
        .join("\n");
    let visible_count = view.cards.iter().filter(|(_, v)| *v).count().to_string();
    let theme_class = match view.theme {
        ThemePreference::Dark => "dark-mode",
        ThemePreference::Light => "",
    };
    let return_suffix = if view.return_query.is_empty() {
        String::new()
    } else {
        format!("?{}", attr(&view.return_query))
    };

    fill(
        PAGE_TEMPLATE,
        &[
            ("theme_class", theme_class),
            ("search_value", &attr(view.search)),
            ("store_value", &attr(view.store_value)),
            ("category_value", &attr(view.category_value)),
            ("fav_count", &view.favorite_count.to_string()),
            ("return_suffix", &return_suffix),
            ("store_chips", &chips_html(&view.store_chips, "chip", "data-filter")),
            (
                "category_chips",
                &chips_html(&view.category_chips, "chip-cat", "data-cat"),
            ),
            ("visible_count", &visible_count),
            ("cards", &cards),
            ("toast", &toast_html(view.toast)),
            ("countdown_tick_ms", &view.countdown_tick_ms.max(1).to_string()),
            ("toast_poll_ms", &TOAST_POLL_MS.to_string()),
        ],
    )
}

/// The cloaking overlay shown before the real destination opens.
#[must_use]
pub fn render_interstitial(store: &str, destination: &str, delay_ms: u64) -> String {
    let message = crate::redirect::redirect_message(store);
    // `<meta refresh>` only honours whole seconds; the script is exact.
    let refresh_secs = delay_ms.div_ceil(1000).to_string();
    let destination_js = serde_json::to_string(destination)
        .unwrap_or_else(|_| "\"/\"".to_owned())
        .replace("</", "<\\/");

    fill(
        INTERSTITIAL_TEMPLATE,
        &[
            ("refresh_secs", &refresh_secs),
            ("destination_attr", &attr(destination)),
            ("store_logo", &StoreIcon::for_store(store).html()),
            ("message", &text(&message)),
            ("destination_js", &destination_js),
            ("delay_ms", &delay_ms.to_string()),
        ],
    )
}

#[must_use]
pub fn render_not_found() -> String {
    r#"<!DOCTYPE html><html lang="pt-BR"><head><meta charset="utf-8"><title>Oferta não encontrada</title></head><body><h1>Oferta não encontrada</h1><p><a href="/">Voltar para a vitrine</a></p></body></html>"#.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_known_tokens_once() {
        let out = fill("a {{x}} b {{y}} {{unknown}}", &[("x", "{{y}}"), ("y", "2")]);
        assert_eq!(out, "a {{y}} b 2 {{unknown}}");
    }

    #[test]
    fn fill_keeps_unterminated_token() {
        assert_eq!(fill("a {{x", &[("x", "1")]), "a {{x");
    }

    #[test]
    fn chips_render_active_state_and_href() {
        let chips = vec![
            Chip {
                label: "Todas".to_owned(),
                value: "all".to_owned(),
                active: false,
                href: "/?store=all".to_owned(),
            },
            Chip {
                label: "Amazon".to_owned(),
                value: "amazon".to_owned(),
                active: true,
                href: "/?store=all".to_owned(),
            },
        ];
        let html = chips_html(&chips, "chip", "data-filter");
        assert!(html.contains(r#"<a class="chip" data-filter="all""#));
        assert!(html.contains(r#"<a class="chip active" data-filter="amazon""#));
    }

    fn empty_view(toast: Option<&Toast>) -> PageView<'_> {
        PageView {
            theme: ThemePreference::Light,
            search: "",
            store_value: "all",
            category_value: "all",
            store_chips: Vec::new(),
            category_chips: Vec::new(),
            favorite_count: 0,
            cards: Vec::new(),
            return_query: String::new(),
            toast,
            countdown_tick_ms: 1_000,
        }
    }

    #[test]
    fn page_script_ticks_countdowns_and_polls_toasts() {
        let html = render_page(&empty_view(None));
        assert!(html.contains("<script>"));
        assert!(html.contains(r#"querySelectorAll(".countdown-container[data-expiry]:not(.ended)")"#));
        assert!(html.contains(r#"var ENDED = "OFERTA ENCERRADA";"#));
        assert!(html.contains("setInterval(tickCountdowns, 1000);"));
        assert!(html.contains(r#"fetch("/api/v1/toast""#));
        assert!(html.contains("setInterval(pollToast, 3000);"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn page_renders_current_toast_inside_slot() {
        let now = chrono::Utc::now();
        let toast = Toast {
            message: "Ana de Recife acabou de garantir: <Fone>".to_owned(),
            product_title: "<Fone>".to_owned(),
            shown_at: now,
            expires_at: now,
        };
        let html = render_page(&empty_view(Some(&toast)));
        assert!(html.contains(r#"<div id="toast-slot" aria-live="polite">"#));
        assert!(html.contains("Ana de Recife acabou de garantir: &lt;Fone&gt;"));
    }

    #[test]
    fn interstitial_names_store_and_destination() {
        let html = render_interstitial("Shopee", "https://shopee.com.br/x?a=1&b=2", 1200);
        assert!(html.contains("Levando você para a Shopee..."));
        assert!(html.contains("fa-bag-shopping"));
        assert!(html.contains(r#"content="2;url=https://shopee.com.br/x?a=1&amp;b=2""#));
        assert!(html.contains(r#"window.location.replace("https://shopee.com.br/x?a=1&b=2")"#));
        assert!(html.contains("}, 1200);"));
    }

    #[test]
    fn interstitial_script_cannot_be_closed_by_destination() {
        let html = render_interstitial("X", "https://e.com/</script><script>alert(1)", 0);
        assert!(!html.contains("</script><script>alert"));
    }
}
