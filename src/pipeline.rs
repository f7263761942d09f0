// src/pipeline.rs
// =============================================================================
// One request from URL to Markdown.
//
// How it works:
// 1. Parse the problem URL
// 2. Cache lookup (unless --no-cache); a hit is returned as-is
// 3. Scrape the problem page for title, limits and tags
// 4. Find the editorial URL for the contest
// 5. Load the tutorial (HTML, JS-rendered HTML or PDF)
// 6. Ask the model for the section about this problem
// 7. Render Markdown and store it in the cache
//
// Rust concepts:
// - Trait objects: Box<dyn PageFetcher> lets tests swap in canned pages
// - Option<T> for an optional component (the cache)
// =============================================================================

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, EditorialCache};
use crate::editorial::{self, TutorialData};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::llm::CompletionClient;
use crate::problem::{self, ProblemData, ProblemIdentifier};

/// Progress callbacks, so the CLI can print one line per stage
pub trait Progress: Send + Sync {
    fn stage(&self, message: &str);
}

/// Discards progress messages
pub struct Quiet;

impl Progress for Quiet {
    fn stage(&self, _message: &str) {}
}

pub struct Pipeline {
    fetcher: Box<dyn PageFetcher>,
    llm: Box<dyn CompletionClient>,
    cache: Option<EditorialCache>,
    js_wait: Duration,
    progress: Box<dyn Progress>,
}

impl Pipeline {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        llm: Box<dyn CompletionClient>,
        cache: Option<EditorialCache>,
        js_wait: Duration,
    ) -> Self {
        Self {
            fetcher,
            llm,
            cache,
            js_wait,
            progress: Box::new(Quiet),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    // Returns the editorial for a problem URL as a Markdown document
    pub async fn editorial_markdown(&self, url: &str) -> Result<String> {
        let identifier = problem::parse_problem_url(url)?;
        info!(problem = %identifier, "processing problem");

        if let Some(record) = self.cache.as_ref().and_then(|c| c.get(&identifier)) {
            self.progress.stage(&format!("Using cached editorial for {}", identifier.full_id()));
            return Ok(record.markdown);
        }

        self.progress.stage(&format!("Fetching problem {}", identifier.full_id()));
        let problem = problem::fetch_problem(self.fetcher.as_ref(), &identifier).await?;

        self.progress.stage("Looking for the editorial");
        let tutorial_url = editorial::find_tutorial(self.fetcher.as_ref(), self.llm.as_ref(), &identifier).await?;

        self.progress.stage(&format!("Loading tutorial {}", tutorial_url));
        let tutorial = editorial::load_tutorial(self.fetcher.as_ref(), &tutorial_url, self.js_wait).await?;
        debug!(title = ?tutorial.title, format = ?tutorial.format, "tutorial loaded");

        self.progress.stage(&format!("Extracting the solution with {}", self.llm.model()));
        let extracted = editorial::extract_editorial(self.llm.as_ref(), &tutorial, &identifier, &problem.title).await?;
        debug!(problem_id = %extracted.problem_id, chars = extracted.solution_text.len(), "solution extracted");

        let markdown = editorial::format_markdown(&extracted, &problem, &tutorial.url);
        self.store(&identifier, &problem, &tutorial, &markdown);

        Ok(markdown)
    }

    // Cache writes are best effort: the user still gets the editorial
    fn store(&self, identifier: &ProblemIdentifier, problem: &ProblemData, tutorial: &TutorialData, markdown: &str) {
        let Some(cache) = &self.cache else {
            return;
        };

        let record = CacheRecord {
            problem: problem.identifier.clone(),
            tutorial_url: tutorial.url.clone(),
            tutorial_format: tutorial.format,
            markdown: markdown.to_string(),
            cached_at: Utc::now(),
            ttl_hours: cache.ttl_hours(),
        };

        match cache.set(&record) {
            Ok(()) => info!(problem = %identifier, "editorial cached"),
            Err(e) => warn!(problem = %identifier, error = %e, "failed to cache editorial"),
        }
    }
}
