//! HTTP storefront for an affiliate offer catalog published as a sheet.

pub mod api;
pub mod countdown;
pub mod favorites;
pub mod filter;
pub mod middleware;
pub mod redirect;
pub mod render;
pub mod share;
pub mod storage;
pub mod storefront;
pub mod theme;
pub mod toast;

pub use api::{build_app, AppState};
pub use storefront::Storefront;
