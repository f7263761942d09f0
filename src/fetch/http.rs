// src/fetch/http.rs
// =============================================================================
// Plain HTTP fetching.
//
// Key functionality:
// - One reqwest Client per run (connection pooling, shared timeout/user agent)
// - Maps HTTP status codes onto our error taxonomy (404 is special)
// - Categorizes transport errors (timeout, DNS, TLS, ...) into readable messages
// - Retries transient failures with exponential backoff
//
// Rust concepts:
// - async/await: For network I/O
// - Loops with early return: the retry loop
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::browser::{self, BrowserOptions};
use super::{FetchedPage, PageFetcher};
use crate::config::Settings;
use crate::error::{EditorialError, Result};

// A failed attempt, plus whether trying again could help
#[derive(Debug)]
struct FetchFailure {
    error: EditorialError,
    transient: bool,
}

pub struct HttpClient {
    client: Client,
    retries: u32,
    browser: BrowserOptions,
    backoff: fn(u32) -> Duration,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.http_timeout())
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| EditorialError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retries: settings.http_retries.max(1),
            browser: BrowserOptions::from_settings(settings),
            backoff: backoff_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<FetchedPage, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if let Some(failure) = status_failure(url, status) {
            return Err(failure);
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let body = response
            .bytes()
            .await
            .map_err(|e| categorize_error(url, e))?
            .to_vec();

        debug!(url, status = status.as_u16(), bytes = body.len(), "fetched");

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(failure) if failure.transient && attempt < self.retries => {
                    let delay = (self.backoff)(attempt);
                    warn!(url, attempt, error = %failure.error, "fetch failed, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn render(&self, url: &str, wait: Duration) -> Result<String> {
        browser::render_page(url, wait, &self.browser).await
    }
}

// 2s, 4s, 8s, then capped at 10s
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.min(8)).min(10);
    Duration::from_secs(secs)
}

// Maps a non-success status code to a failure, or None for 2xx
fn status_failure(url: &str, status: StatusCode) -> Option<FetchFailure> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::NOT_FOUND {
        return Some(FetchFailure {
            error: EditorialError::ProblemNotFound(format!("Resource not found: {}", url)),
            transient: false,
        });
    }

    // Rate limiting and server errors may clear up; other 4xx will not
    let transient = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
    Some(FetchFailure {
        error: EditorialError::Network(format!("HTTP error {}: {}", status.as_u16(), url)),
        transient,
    })
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(url: &str, error: reqwest::Error) -> FetchFailure {
    let error_string = error.to_string().to_lowercase();

    let (message, transient) = if error.is_timeout() {
        ("Request timed out".to_string(), true)
    } else if error.is_redirect() {
        ("Too many redirects".to_string(), false)
    } else if error.is_connect() {
        if error_string.contains("dns") {
            ("Could not resolve hostname".to_string(), true)
        } else {
            ("Connection failed".to_string(), true)
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        ("SSL certificate error".to_string(), false)
    } else if error.is_body() || error.is_request() {
        (format!("Request failed: {}", error), true)
    } else {
        (error.to_string(), false)
    };

    FetchFailure {
        error: EditorialError::Network(format!("Failed to fetch {}: {}", url, message)),
        transient,
    }
}
