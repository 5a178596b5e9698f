//! Catalog and page commands.

use std::path::Path;

use vitrine_catalog::{encode_rows, CatalogClient};
use vitrine_core::ProductRecord;
use vitrine_server::filter::{FilterQuery, FilterState};
use vitrine_server::Storefront;

use crate::OutputFormat;

const USER_AGENT: &str = "vitrine/0.1 (catalog)";

/// Canonical column names, one per record field, in output order.
pub(crate) const CSV_HEADER: [&str; 10] = [
    "Loja",
    "Categoria",
    "Titulo",
    "PrecoAtual",
    "PrecoAntigo",
    "Badge",
    "BadgeTipo",
    "LinkImagem",
    "LinkReal",
    "Expiry",
];

/// Fetches and prints the sheet's records.
///
/// # Errors
///
/// Returns an error if the client cannot be built, or, without
/// `allow_fallback`, if the sheet cannot be fetched or yields no records.
pub(crate) async fn run_catalog(
    url: &str,
    format: OutputFormat,
    allow_fallback: bool,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let client = CatalogClient::new(timeout_secs, USER_AGENT)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;

    let records = if allow_fallback {
        let loaded = client.load(url).await;
        tracing::info!(source = ?loaded.source, "catalog loaded");
        loaded.records
    } else {
        client.fetch_records(url).await?
    };

    let output = format_records(&records, format)?;
    println!("{}", output.trim_end_matches('\n'));
    Ok(())
}

pub(crate) fn format_records(
    records: &[ProductRecord],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let header = CSV_HEADER.iter().map(|h| (*h).to_owned()).collect();
            let mut rows: Vec<Vec<String>> = vec![header];
            rows.extend(records.iter().map(record_row));
            Ok(encode_rows(&rows)?)
        }
    }
}

fn record_row(record: &ProductRecord) -> Vec<String> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        record.store.clone(),
        record.category.clone(),
        record.title.clone(),
        record.current_price.clone(),
        optional(&record.previous_price),
        optional(&record.badge_text),
        optional(&record.badge_kind),
        record.image_url.clone(),
        record.destination_url.clone(),
        optional(&record.expiry),
    ]
}

/// Loads the catalog with the server configuration and renders the page once.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the HTTP client cannot be
/// built, or the output file cannot be written.
pub(crate) async fn run_render(filter: &FilterQuery, out: Option<&Path>) -> anyhow::Result<()> {
    let config = vitrine_core::load_app_config()?;
    let storefront = Storefront::from_config(&config)?;
    let source = storefront.reload().await;
    let html = storefront
        .page_html(&FilterState::from_query(filter), false)
        .await;

    match out {
        Some(path) => {
            std::fs::write(path, &html)?;
            tracing::info!(?source, path = %path.display(), bytes = html.len(), "page written");
        }
        None => print!("{html}"),
    }
    Ok(())
}
