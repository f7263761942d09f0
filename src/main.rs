// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load settings (.env + environment) and set up logging
// 3. Optionally clear the cache
// 4. Run the pipeline and write the Markdown to a file or stdout
// 5. Exit with proper code (0 = success, 1 = pipeline error, 2 = unexpected
//    error, 130 = interrupted)
//
// Rust concepts used:
// - async/await: network calls and the LLM request are async
// - tokio::select!: race the work against Ctrl-C
// - Box<dyn Trait>: hand concrete clients to the pipeline as trait objects
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cache; // src/cache/ - TTL file cache of finished editorials
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - .env / environment settings
mod editorial; // src/editorial/ - find, load and extract the editorial
mod error; // src/error.rs - error taxonomy
mod fetch; // src/fetch/ - HTTP, headless browser, PDF
mod llm; // src/llm/ - chat completions client and prompts
mod logging; // src/logging.rs - tracing setup
mod pipeline; // src/pipeline.rs - the stages glued together
mod problem; // src/problem/ - problem URLs and pages
#[cfg(test)]
mod testing; // src/testing.rs - fakes for unit tests

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use cache::EditorialCache;
use cli::Cli;
use config::Settings;
use error::EditorialError;
use fetch::HttpClient;
use llm::OpenAiClient;
use pipeline::{Pipeline, Progress};

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let exit_code = tokio::select! {
        result = run() => match result {
            Ok(code) => code,
            Err(e) => {
                // Anything that is not a pipeline error: I/O on the output file, etc.
                eprintln!("Error: {:#}", e);
                2
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n⚠️  Interrupted");
            130
        }
    };

    std::process::exit(exit_code);
}

// Prints pipeline stages to stderr so stdout only carries the Markdown
struct StderrProgress;

impl Progress for StderrProgress {
    fn stage(&self, message: &str) {
        eprintln!("🔍 {}", message);
    }
}

// This is the main application logic
// Returns:
//   Ok(0) = editorial printed / saved (or cache cleared)
//   Ok(1) = the pipeline failed with an EditorialError
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => return Ok(report(&e)),
    };
    if let Some(key) = cli.api_key.clone() {
        settings.openai_api_key = Some(key);
    }

    if let Err(e) = logging::init(cli.verbose, &settings.log_level) {
        return Ok(report(&e));
    }
    debug!(cache_dir = %settings.cache_dir.display(), model = %settings.openai_model, "settings loaded");

    if cli.clear_cache {
        if let Err(e) = clear_cache(&settings) {
            return Ok(report(&e));
        }
    }

    let Some(url) = cli.url.as_deref() else {
        return Ok(0);
    };

    match editorial_for(&cli, &settings, url).await {
        Ok(markdown) => {
            write_output(&cli, &markdown).await?;
            Ok(0)
        }
        Err(e) => Ok(report(&e)),
    }
}

// Builds the real clients and runs the pipeline once
async fn editorial_for(cli: &Cli, settings: &Settings, url: &str) -> error::Result<String> {
    let fetcher = HttpClient::new(settings)?;
    let llm = OpenAiClient::new(settings)?;

    let cache = if cli.no_cache {
        None
    } else {
        // A broken cache directory should not stop the lookup
        match EditorialCache::open(&settings.cache_dir, settings.cache_ttl_hours) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "cache disabled for this run");
                None
            }
        }
    };

    Pipeline::new(Box::new(fetcher), Box::new(llm), cache, settings.js_wait())
        .with_progress(Box::new(StderrProgress))
        .editorial_markdown(url)
        .await
}

fn clear_cache(settings: &Settings) -> error::Result<()> {
    let cache = EditorialCache::open(&settings.cache_dir, settings.cache_ttl_hours)?;
    let removed = cache.clear()?;
    eprintln!("🗑️  Removed {} cached editorial(s) from {}", removed, cache.dir().display());
    Ok(())
}

async fn write_output(cli: &Cli, markdown: &str) -> Result<()> {
    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, markdown)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Editorial saved to {}", path.display());
        }
        None => println!("{}", markdown),
    }
    Ok(())
}

// Prints a pipeline error with a hint and returns exit code 1
fn report(error: &EditorialError) -> i32 {
    debug!(kind = error.kind(), "request failed");
    eprintln!("❌ {}", error);
    if let Some(hint) = hint(error) {
        eprintln!("   {}", hint);
    }

    1
}

// What the user can do about an error, when there is something
fn hint(error: &EditorialError) -> Option<&'static str> {
    match error {
        EditorialError::MissingApiKey => {
            Some("Set OPENAI_API_KEY in your environment or a .env file, or pass --api-key")
        }
        EditorialError::Config(_) => Some("Check the settings in your environment or .env file"),
        EditorialError::EditorialNotFound(_) => Some("The contest may not have a published editorial yet"),
        EditorialError::Network(_) | EditorialError::Api(_) => Some("Run again with -v for details"),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does tokio::select! do?
//    - Polls several futures and runs the branch of whichever finishes first
//    - The other future is dropped, which cancels it
//    - Here: either the work finishes or the user presses Ctrl-C
//
// 2. Why two error types?
//    - error::Result<T> (EditorialError) is what the pipeline stages return;
//      each variant is a known failure we report with exit code 1
//    - anyhow::Result is for everything else at the top level
//
// 3. What is let-else?
//    - let Some(url) = ... else { return ... };
//    - Binds the value if the pattern matches, otherwise runs the else block
//      (which must leave the function)
// -----------------------------------------------------------------------------
