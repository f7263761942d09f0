// src/editorial/finder.rs
// =============================================================================
// Locating the editorial (tutorial) URL for a contest.
//
// Strategies, first hit wins:
// 1. Scan the contest page for links titled Tutorial / Editorial / Разбор
// 2. Hand the contest page to the model and ask for the link
// 3. Search Codeforces blogs for "contest <id> tutorial", fetch up to three
//    hits at once and keep the first one the model confirms
//
// A failing strategy is logged and the next one runs. Only when all of them
// come up empty do we return EditorialNotFound.
//
// Rust concepts:
// - futures::stream: run a bounded number of fetches concurrently
// - Option chaining: each strategy answers Some(url) or None
// =============================================================================

use futures::stream::{self, StreamExt};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use url::Url;

use super::tutorial::clean_html;
use crate::error::{EditorialError, Result};
use crate::fetch::PageFetcher;
use crate::llm::prompts::{self, NOT_FOUND};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::problem::{contest_url, normalize_url, ProblemIdentifier, CODEFORCES_BASE};

// Link texts that mark an editorial, English first
const ENGLISH_KEYWORDS: &[&str] = &["tutorial", "editorial", "analysis", "solutions"];
const RUSSIAN_KEYWORDS: &[&str] = &["разбор"];

// How many blog search hits we look at (and fetch concurrently)
const MAX_SEARCH_CANDIDATES: usize = 3;

const FIND_MAX_TOKENS: u32 = 2000;
const VALIDATE_MAX_TOKENS: u32 = 1000;

// Finds the tutorial URL for the contest a problem belongs to
//
// Returns: an absolute https URL
pub async fn find_tutorial(
    fetcher: &dyn PageFetcher,
    llm: &dyn CompletionClient,
    identifier: &ProblemIdentifier,
) -> Result<String> {
    let contest_page = contest_url(identifier);
    info!(contest = %contest_page, "looking for the editorial");

    match fetcher.fetch_text(&contest_page).await {
        Ok(html) => {
            if let Some(link) = scan_contest_links(&html, &contest_page) {
                info!(url = %link, "editorial link found on contest page");
                return Ok(normalize_url(&link));
            }

            match ask_model_for_link(llm, &html, &identifier.problem_id).await {
                Ok(Some(link)) => {
                    info!(url = %link, "model located the editorial link");
                    return Ok(normalize_url(&link));
                }
                Ok(None) => debug!("model found no editorial link on contest page"),
                Err(e) => warn!(error = %e, "model lookup on contest page failed"),
            }
        }
        Err(e) => warn!(error = %e, "could not fetch contest page"),
    }

    if let Some(link) = search_blogs(fetcher, llm, identifier).await {
        info!(url = %link, "editorial found through blog search");
        return Ok(normalize_url(&link));
    }

    Err(EditorialError::EditorialNotFound(format!(
        "No editorial found for contest {}",
        identifier.contest_id
    )))
}

// Strategy 1: anchors on the contest page
//
// The first anchor with an English keyword wins; a Russian-only match is
// kept as a fallback in case no English link exists.
fn scan_contest_links(html: &str, page_url: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    let mut russian = None;
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve_link(&base, href) else {
            continue;
        };

        let text = anchor.text().collect::<String>().to_lowercase();
        if ENGLISH_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Some(link);
        }
        if russian.is_none() && RUSSIAN_KEYWORDS.iter().any(|k| text.contains(k)) {
            russian = Some(link);
        }
    }

    russian
}

// Resolves a (possibly relative) href against the page URL
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let url = base.join(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

// Strategy 2: let the model read the contest page
async fn ask_model_for_link(
    llm: &dyn CompletionClient,
    contest_html: &str,
    problem_id: &str,
) -> Result<Option<String>> {
    let request = CompletionRequest::new(prompts::find_editorial_prompt(contest_html, problem_id), FIND_MAX_TOKENS)
        .with_system(prompts::FIND_LINK_SYSTEM);

    let reply = llm.complete(request).await?;
    Ok(parse_link_reply(&reply))
}

// The model is told to answer with a bare URL or NOT_FOUND
fn parse_link_reply(reply: &str) -> Option<String> {
    let reply = reply.trim();
    if reply.is_empty() || reply.contains(NOT_FOUND) {
        return None;
    }

    let candidate = reply
        .split_whitespace()
        .next()?
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '<' | '>' | '(' | ')' | ',' | '.'));

    (candidate.starts_with("http://") || candidate.starts_with("https://")).then(|| candidate.to_string())
}

pub fn search_url(contest_id: &str) -> String {
    format!("{}/search?query=contest+{}+tutorial", CODEFORCES_BASE, contest_id)
}

fn blog_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"href="(/blog/entry/\d+)""#).unwrap())
}

// Distinct blog entry links in page order, at most MAX_SEARCH_CANDIDATES
fn blog_candidates(search_html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for captures in blog_link_pattern().captures_iter(search_html) {
        let link = normalize_url(&captures[1]);
        if !links.contains(&link) {
            links.push(link);
        }
        if links.len() == MAX_SEARCH_CANDIDATES {
            break;
        }
    }
    links
}

// Strategy 3: blog search
async fn search_blogs(
    fetcher: &dyn PageFetcher,
    llm: &dyn CompletionClient,
    identifier: &ProblemIdentifier,
) -> Option<String> {
    let url = search_url(&identifier.contest_id);
    let search_html = match fetcher.fetch_text(&url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "blog search failed");
            return None;
        }
    };

    let candidates = blog_candidates(&search_html);
    debug!(count = candidates.len(), "blog search candidates");

    // buffered() keeps the results in candidate order
    let pages: Vec<(String, Result<String>)> = stream::iter(candidates)
        .map(|link| async move {
            let page = fetcher.fetch_text(&link).await;
            (link, page)
        })
        .buffered(MAX_SEARCH_CANDIDATES)
        .collect()
        .await;

    for (link, page) in pages {
        let html = match page {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %link, error = %e, "could not fetch blog candidate");
                continue;
            }
        };

        if !html.contains(identifier.contest_id.as_str()) {
            debug!(url = %link, "candidate does not mention the contest");
            continue;
        }

        let (text, _) = clean_html(&html);
        if confirm_editorial(llm, &text, &identifier.problem_id).await {
            return Some(link);
        }
    }

    None
}

// YES or PARTIAL counts as an editorial. When the model cannot be asked we
// give the candidate the benefit of the doubt.
async fn confirm_editorial(llm: &dyn CompletionClient, content: &str, problem_id: &str) -> bool {
    let request = CompletionRequest::new(prompts::validate_editorial_prompt(content, problem_id), VALIDATE_MAX_TOKENS);

    match llm.complete(request).await {
        Ok(answer) => {
            let answer = answer.trim().to_uppercase();
            answer.starts_with("YES") || answer.starts_with("PARTIAL")
        }
        Err(e) => {
            warn!(error = %e, "validation call failed, accepting candidate");
            true
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the anchor scan a separate sync function?
//    - scraper::Html is not Send, so it must not live across an .await
//    - Parsing inside a plain fn guarantees it is dropped before we await
//
// 2. stream::iter(..).buffered(n)
//    - Turns the candidate list into a stream of futures
//    - Polls up to n of them at once, yielding results in input order
// -----------------------------------------------------------------------------
