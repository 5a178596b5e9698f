pub mod client;
pub mod csv;
pub mod error;
pub mod expiry;
pub mod fallback;
pub mod normalize;

pub use client::{CatalogClient, CatalogSource, LoadedCatalog};
pub use crate::csv::{decode_records, decode_rows, encode_rows, RawRecord};
pub use error::CatalogError;
pub use expiry::{normalize_expiry, parse_expiry};
pub use fallback::fallback_catalog;
pub use normalize::{normalize_record, normalize_records};
