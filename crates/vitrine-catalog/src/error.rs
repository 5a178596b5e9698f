use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("catalog at {url} produced no records")]
    EmptyCatalog { url: String },

    #[error("CSV encoding error: {0}")]
    Encode(#[from] ::csv::Error),
}
