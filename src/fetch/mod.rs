// src/fetch/mod.rs

use anyhow::Result;
use reqwest::Client;

pub mod listing;
pub mod portraits;

pub use listing::{fetch_listing, parse_members, SEARCH_URL};
pub use portraits::{download_portrait, portrait_filename, PortraitNames};

/// Shared HTTP client for the listing page and portraits.
pub fn client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .cookie_store(true)
        .build()?)
}
