// src/problem/page.rs
// =============================================================================
// Scraping the Codeforces problem page.
//
// We only need enough for the Markdown header: title, contest name, limits,
// tags, difficulty, and the first paragraphs of the legend. Every field is
// optional; a missing element never fails the parse.
//
// Page structure (simplified):
//   <div class="problem-statement">
//     <div class="header">
//       <div class="title">A. Theatre Square</div>
//       <div class="time-limit"><div class="property-title">time limit per test</div>1 second</div>
//       <div class="memory-limit"><div class="property-title">memory limit per test</div>256 megabytes</div>
//     </div>
//     <div><p>...</p></div>
//   </div>
//   <span class="tag-box">math</span> <span class="tag-box">*1000</span>
// =============================================================================

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::{info, warn};

use super::api;
use super::types::{ProblemData, ProblemIdentifier};
use super::url::problem_url;
use crate::error::{EditorialError, Result};
use crate::fetch::PageFetcher;

// Fetches and parses the problem page
//
// A 404 is reported as ProblemNotFound straight away. Any other failure
// (bot protection, a redirect to the contest page, a timeout) falls back to
// the Codeforces API for regular contests; gyms have no such fallback.
pub async fn fetch_problem(fetcher: &dyn PageFetcher, identifier: &ProblemIdentifier) -> Result<ProblemData> {
    let url = problem_url(identifier);
    info!(url = %url, "parsing problem page");

    let page_error = match fetcher.fetch_text(&url).await {
        // Blocked requests often get a 200 with a challenge page instead
        Ok(html) if html.contains("problem-statement") => {
            let data = parse_problem_page(&html, identifier, &url);
            info!(title = %data.title, "parsed problem");
            return Ok(data);
        }
        Ok(_) => EditorialError::Parsing(format!("{} has no problem statement", url)),
        Err(EditorialError::ProblemNotFound(_)) => {
            return Err(EditorialError::ProblemNotFound(format!(
                "Problem {} does not exist ({})",
                identifier, url
            )));
        }
        Err(e) => e,
    };

    if identifier.is_gym {
        return Err(page_error);
    }

    warn!(error = %page_error, "problem page unavailable, asking the Codeforces API");
    api::fetch_problem_info(fetcher, identifier).await
}

// Extracts whatever fields the page has
pub fn parse_problem_page(html: &str, identifier: &ProblemIdentifier, url: &str) -> ProblemData {
    let parsed = Html::parse_document(html);
    let document = &parsed;
    let (tags, rating) = extract_tags(document);

    ProblemData {
        identifier: identifier.clone(),
        title: extract_title(document).unwrap_or_else(|| "Unknown Problem".to_string()),
        url: url.to_string(),
        contest_name: extract_contest_name(document),
        description: extract_description(document),
        time_limit: extract_property(document, "div.time-limit"),
        memory_limit: extract_property(document, "div.memory-limit"),
        tags,
        rating,
    }
}

// Selectors are constants; parse failures would be programmer errors
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

// Joins all text nodes and collapses runs of whitespace
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| Regex::new(r"^[A-Z]\d*\.\s*").unwrap())
}

// "A. Theatre Square" -> "Theatre Square"
fn extract_title(document: &Html) -> Option<String> {
    ["div.problem-statement div.header div.title", "div.title"]
        .iter()
        .find_map(|css| document.select(&selector(css)).next())
        .map(element_text)
        .map(|text| title_prefix().replace(&text, "").into_owned())
        .filter(|title| !title.is_empty())
}

// The sidebar box names the contest; breadcrumbs exist on some layouts
fn extract_contest_name(document: &Html) -> Option<String> {
    ["table.rtable th a", "div.breadcrumbs a"]
        .iter()
        .find_map(|css| document.select(&selector(css)).next())
        .map(element_text)
        .filter(|name| !name.is_empty())
}

// "time limit per test 2 seconds" -> "2 seconds"
fn extract_property(document: &Html, css: &str) -> Option<String> {
    let element = document.select(&selector(css)).next()?;
    let full = element_text(element);

    let label = element
        .select(&selector("div.property-title"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    let value = full.strip_prefix(label.as_str()).unwrap_or(&full).trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// First three paragraphs of the statement
fn extract_description(document: &Html) -> Option<String> {
    let paragraphs: Vec<String> = document
        .select(&selector("div.problem-statement p"))
        .map(element_text)
        .filter(|p| !p.is_empty())
        .take(3)
        .collect();

    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

// Tags, with the "*1500" difficulty tag split out as the rating
fn extract_tags(document: &Html) -> (Vec<String>, Option<u32>) {
    let mut tags = Vec::new();
    let mut rating = None;

    for element in document.select(&selector("span.tag-box")) {
        let text = element_text(element);
        if text.is_empty() {
            continue;
        }
        match text.strip_prefix('*').and_then(|r| r.parse::<u32>().ok()) {
            Some(value) => rating = Some(value),
            None => tags.push(text),
        }
    }

    (tags, rating)
}
