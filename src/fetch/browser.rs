// src/fetch/browser.rs
// =============================================================================
// Rendering JavaScript-heavy pages with headless Chromium.
//
// Codeforces blog entries load parts of their body (spoilers, MathJax, some
// tutorial sections) via JS, so a plain GET sometimes misses the editorial.
// For those pages we launch a browser, navigate, give scripts time to run, and
// grab the resulting DOM.
//
// headless_chrome is a synchronous API, so the whole session runs on tokio's
// blocking thread pool.
// =============================================================================

use anyhow::{anyhow, Context};
use headless_chrome::{Browser, LaunchOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{EditorialError, Result};

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub user_agent: String,
    /// Navigation timeout
    pub timeout: Duration,
    /// None lets headless_chrome find (or fetch) a Chromium binary
    pub chrome_path: Option<PathBuf>,
}

impl BrowserOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            timeout: settings.http_timeout(),
            chrome_path: settings.chrome_path.clone(),
        }
    }
}

// Renders a page and returns its HTML after `wait` has elapsed
pub async fn render_page(url: &str, wait: Duration, options: &BrowserOptions) -> Result<String> {
    info!(url, wait_ms = wait.as_millis() as u64, "rendering page with headless browser");

    let owned_url = url.to_string();
    let options = options.clone();

    let outcome = tokio::task::spawn_blocking(move || render_blocking(&owned_url, wait, &options))
        .await
        .map_err(|e| EditorialError::Network(format!("Browser task for {} failed: {}", url, e)))?;

    match outcome {
        Ok(html) => {
            info!(url, chars = html.len(), "rendered page");
            Ok(html)
        }
        Err(e) => Err(EditorialError::Network(format!(
            "Failed to fetch {} with JS rendering: {:#}",
            url, e
        ))),
    }
}

fn render_blocking(url: &str, wait: Duration, options: &BrowserOptions) -> anyhow::Result<String> {
    let launch = LaunchOptions::default_builder()
        .headless(true)
        .path(options.chrome_path.clone())
        // Keep the browser alive for the whole navigation plus the JS wait
        .idle_browser_timeout(options.timeout + wait + Duration::from_secs(10))
        .build()
        .map_err(|e| anyhow!("invalid browser options: {}", e))?;

    let browser = Browser::new(launch).context("could not launch Chromium")?;
    let tab = browser.new_tab().context("could not open a tab")?;

    tab.set_default_timeout(options.timeout);
    tab.set_user_agent(&options.user_agent, None, None)?;

    debug!(url, "navigating");
    tab.navigate_to(url)?;
    tab.wait_until_navigated()?;

    // Scripts keep running after DOMContentLoaded; give them a fixed budget
    std::thread::sleep(wait);

    let html = tab.get_content().context("could not read page content")?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_follow_settings() {
        let settings = Settings {
            http_timeout_secs: 12,
            chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
            ..Settings::default()
        };
        let options = BrowserOptions::from_settings(&settings);
        assert_eq!(options.timeout, Duration::from_secs(12));
        assert_eq!(options.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(options.user_agent, settings.user_agent);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium and network
    async fn test_render_blog_entry() {
        let options = BrowserOptions::from_settings(&Settings::default());
        let html = render_page("https://codeforces.com/blog/entry/8166", Duration::from_secs(2), &options)
            .await
            .unwrap();
        assert!(html.contains("<html"));
    }
}
