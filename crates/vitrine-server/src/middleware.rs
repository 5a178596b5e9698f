use axum::{
    extract::Request,
    http::{
        header::{HeaderMap, HeaderName, VARY},
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuses an incoming `x-request-id` or mints a v4 UUID, and echoes it back.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }
    res
}

/// Asks browsers to send the color-scheme client hint on later requests.
pub async fn advertise_color_scheme_hint(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(
        HeaderName::from_static("accept-ch"),
        HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"),
    );
    headers.append(VARY, HeaderValue::from_static("Sec-CH-Prefers-Color-Scheme"));
    res
}

/// `true` when the client hint reports a dark color scheme.
#[must_use]
pub fn prefers_dark(headers: &HeaderMap) -> bool {
    headers
        .get(COLOR_SCHEME_HINT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().trim_matches('"').eq_ignore_ascii_case("dark"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_scheme_hint_accepts_quoted_and_bare_values() {
        let mut headers = HeaderMap::new();
        assert!(!prefers_dark(&headers));

        headers.insert(COLOR_SCHEME_HINT, HeaderValue::from_static("\"dark\""));
        assert!(prefers_dark(&headers));

        headers.insert(COLOR_SCHEME_HINT, HeaderValue::from_static("Dark"));
        assert!(prefers_dark(&headers));

        headers.insert(COLOR_SCHEME_HINT, HeaderValue::from_static("\"light\""));
        assert!(!prefers_dark(&headers));
    }
}
