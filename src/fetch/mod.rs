//! Page retrieval: one GET against the configured source.

mod basic;
mod client;
mod headers;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use headers::WithHeaders;

use anyhow::{Context, Result, bail};
use tracing::info;

/// Raw markup of the fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status, or `None` when the page came from a local file.
    pub status: Option<u16>,
    pub body: String,
}

/// Performs a single GET and returns the body text.
///
/// # Errors
///
/// Fails on transport errors and on any non-success status code.
pub async fn fetch_page<C: HttpClient>(client: &C, url: &str) -> Result<FetchedPage> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned status {status}");
    }

    let body = resp.text().await?;
    Ok(FetchedPage {
        status: Some(status.as_u16()),
        body,
    })
}

/// Loads page markup from a URL or, for anything not starting with `http`, a local file.
#[tracing::instrument(skip(user_agent))]
pub async fn load_source(source: &str, user_agent: &str) -> Result<FetchedPage> {
    let page = if source.starts_with("http") {
        let client = WithHeaders::user_agent(BasicClient::new(), user_agent)?;
        fetch_page(&client, source).await?
    } else {
        let body = std::fs::read_to_string(source)
            .with_context(|| format!("failed to read page from '{source}'"))?;
        FetchedPage { status: None, body }
    };

    info!(status = ?page.status, html_length = page.body.len(), "Page loaded");
    Ok(page)
}
