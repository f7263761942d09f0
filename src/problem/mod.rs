// src/problem/mod.rs
// =============================================================================
// Everything about identifying and describing a Codeforces problem.
//
// Submodules:
// - types: ProblemIdentifier and ProblemData
// - url: parse problem URLs, build contest/problem URLs
// - page: scrape the problem page
// - api: Codeforces API fallback when the page is unavailable
// =============================================================================

mod api;
mod page;
mod types;
mod url;

pub use page::fetch_problem;
pub use types::{ProblemData, ProblemIdentifier};
pub use url::{contest_url, normalize_url, parse_problem_url, CODEFORCES_BASE};
