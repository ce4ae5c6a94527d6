mod basic;
mod client;
mod query;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use query::{Region, SalesQuery};

use anyhow::Result;
use tracing::debug;

/// GETs `url` and returns the body. Non-success statuses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: reqwest::Url) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response body received");
    Ok(bytes.to_vec())
}
