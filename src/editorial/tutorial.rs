// src/editorial/tutorial.rs
// =============================================================================
// Loading the tutorial document and turning it into plain text.
//
// How it works:
// 1. Fetch the URL once
// 2. PDF (by Content-Type or magic bytes) -> extract page text
// 3. Otherwise HTML. Codeforces blog and contest pages are re-loaded in a
//    headless browser, because parts of them are filled in by JavaScript
// 4. Strip script/style/nav/footer, keep the post body (div.ttypography),
//    and emit one text node per line
//
// Rust concepts:
// - Recursion over a DOM tree (ego_tree nodes exposed by scraper)
// - Pattern matching on node kinds (text vs element)
// =============================================================================

use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{TutorialData, TutorialFormat};
use crate::error::{EditorialError, Result};
use crate::fetch::{extract_pdf_text, PageFetcher};

// Elements whose text never belongs to the editorial
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "noscript"];

// Loads a tutorial from a URL
//
// Parameters:
//   fetcher: network access
//   url: the editorial URL found by the finder
//   js_wait: how long to let scripts run when rendering in a browser
pub async fn load_tutorial(fetcher: &dyn PageFetcher, url: &str, js_wait: Duration) -> Result<TutorialData> {
    info!(url, "loading tutorial");

    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(EditorialError::ProblemNotFound(_)) => {
            return Err(EditorialError::EditorialNotFound(format!("Tutorial page {} returned 404", url)));
        }
        Err(e) => return Err(e),
    };
    debug!(final_url = %page.url, content_type = %page.content_type, "tutorial fetched");

    if page.is_pdf() {
        let content = extract_pdf_text(page.body)
            .await
            .map_err(|e| parse_failure(url, e))?;

        return Ok(TutorialData {
            url: url.to_string(),
            format: TutorialFormat::Pdf,
            content,
            title: None,
        });
    }

    let html = if needs_js_rendering(url) {
        match fetcher.render(url, js_wait).await {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(url, error = %e, "JS rendering failed, using the static page");
                page.text()
            }
        }
    } else {
        page.text()
    };

    let (content, title) = clean_html(&html);
    info!(url, chars = content.len(), "tutorial text ready");

    Ok(TutorialData {
        url: url.to_string(),
        format: TutorialFormat::Html,
        content,
        title,
    })
}

fn parse_failure(url: &str, error: EditorialError) -> EditorialError {
    let detail = match error {
        EditorialError::Parsing(message) => message,
        other => other.to_string(),
    };
    EditorialError::Parsing(format!("Failed to parse tutorial {}: {}", url, detail))
}

// Codeforces blog entries and contest pages need a real browser
fn needs_js_rendering(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    let on_codeforces = parsed
        .host_str()
        .map(|h| {
            let h = h.to_lowercase();
            h == "codeforces.com" || h.ends_with(".codeforces.com") || h == "codeforces.ru" || h.ends_with(".codeforces.ru")
        })
        .unwrap_or(false);

    let path = parsed.path();
    on_codeforces && (path.starts_with("/blog/") || path.starts_with("/contest/"))
}

// Returns (text content, title)
//
// Content comes from the first div.ttypography (the post body on Codeforces),
// falling back to <body>, then the whole document.
pub fn clean_html(html: &str) -> (String, Option<String>) {
    let document = Html::parse_document(html);

    let root = ["div.ttypography", "body"]
        .iter()
        .find_map(|css| document.select(&selector(css)).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    collect_text(root, &mut lines);

    (lines.join("\n"), extract_title(&document))
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

// Depth-first walk, one trimmed text node per line
fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, lines);
                }
            }
            _ => {}
        }
    }
}

// First <h1>, else <title>
fn extract_title(document: &Html) -> Option<String> {
    ["h1", "title"]
        .iter()
        .find_map(|css| document.select(&selector(css)).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why walk the tree by hand instead of element.text()?
//    - .text() yields every descendant text node, including <script> bodies
//    - scraper's DOM is read-only, so we cannot delete those nodes first
//    - Skipping them during the walk gives the same result
//
// 2. What is ElementRef::wrap?
//    - children() yields generic tree nodes (text, comments, elements)
//    - wrap() turns a node back into an ElementRef if it is an element
// -----------------------------------------------------------------------------
