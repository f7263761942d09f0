// src/fetch/mod.rs
// =============================================================================
// This module gets bytes off the web.
//
// Submodules:
// - http: plain HTTP GET with error categorization and retries
// - browser: headless Chromium for pages that build their content with JS
// - pdf: text extraction for PDF editorials
//
// The rest of the crate talks to the `PageFetcher` trait rather than to
// reqwest directly, so the pipeline can be tested with canned pages.
// =============================================================================

mod browser;
mod http;
mod pdf;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

pub use http::HttpClient;
pub use pdf::extract_text as extract_pdf_text;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// Lower-cased Content-Type header ("" when missing)
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// PDF either by header or by magic bytes (some mirrors send octet-stream)
    pub fn is_pdf(&self) -> bool {
        self.content_type.contains("pdf") || self.body.starts_with(b"%PDF")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// Everything the pipeline needs from the network
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a URL. 404 maps to ProblemNotFound, other failures to Network.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;

    /// Load a URL in a headless browser, wait, and return the rendered DOM
    async fn render(&self, url: &str, wait: Duration) -> Result<String>;

    async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self.fetch(url).await?.text())
    }
}
