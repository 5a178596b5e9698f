use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use vitrine_core::ProductRecord;

use crate::csv::decode_records;
use crate::error::CatalogError;
use crate::fallback::fallback_catalog;
use crate::normalize::normalize_records;

/// Where the records of a [`LoadedCatalog`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub records: Vec<ProductRecord>,
    pub source: CatalogSource,
}

/// HTTP client for a spreadsheet published as CSV.
///
/// No retries: a failed or empty fetch is answered with
/// the fixed fallback catalog by [`CatalogClient::load`].
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches and normalizes the sheet at `url`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`]: network or TLS failure.
    /// - [`CatalogError::UnexpectedStatus`]: any non-2xx status.
    /// - [`CatalogError::EmptyCatalog`]: the body decoded to zero records.
    pub async fn fetch_records(&self, url: &str) -> Result<Vec<ProductRecord>, CatalogError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/csv, text/plain;q=0.9, */*;q=0.1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let records = normalize_records(&decode_records(&body));
        if records.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                url: url.to_owned(),
            });
        }

        tracing::info!(url, count = records.len(), "catalog fetched");
        Ok(records)
    }

    /// Loads the catalog, substituting [`fallback_catalog`] on any failure.
    ///
    /// Never fails: every error is logged and degrades to the fallback.
    pub async fn load(&self, url: &str) -> LoadedCatalog {
        match self.fetch_records(url).await {
            Ok(records) => LoadedCatalog {
                records,
                source: CatalogSource::Remote,
            },
            Err(e) => {
                tracing::warn!(url, error = %e, "catalog unavailable, using fallback");
                LoadedCatalog {
                    records: fallback_catalog(),
                    source: CatalogSource::Fallback,
                }
            }
        }
    }
}
