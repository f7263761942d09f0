// src/problem/api.rs
// =============================================================================
// Codeforces API fallback for problem metadata.
//
// When the HTML problem page is blocked or unparseable we can still get the
// title, tags, and rating from `contest.standings` (asking for a single row
// keeps the response tiny, and it also carries the contest name).
// =============================================================================

use serde::Deserialize;
use tracing::debug;

use super::types::{ProblemData, ProblemIdentifier};
use super::url::{problem_url, CODEFORCES_BASE};
use crate::error::{EditorialError, Result};
use crate::fetch::PageFetcher;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    comment: Option<String>,
    result: Option<Standings>,
}

#[derive(Debug, Deserialize)]
struct Standings {
    contest: ApiContest,
    problems: Vec<ApiProblem>,
}

#[derive(Debug, Deserialize)]
struct ApiContest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiProblem {
    index: String,
    name: String,
    #[serde(default)]
    tags: Vec<String>,
    rating: Option<u32>,
}

pub fn standings_url(identifier: &ProblemIdentifier) -> String {
    format!(
        "{}/api/contest.standings?contestId={}&from=1&count=1",
        CODEFORCES_BASE, identifier.contest_id
    )
}

pub async fn fetch_problem_info(fetcher: &dyn PageFetcher, identifier: &ProblemIdentifier) -> Result<ProblemData> {
    let url = standings_url(identifier);
    debug!(url = %url, "querying Codeforces API");

    let body = fetcher.fetch_text(&url).await?;
    parse_standings(&body, identifier)
}

// Picks the problem out of a contest.standings response
fn parse_standings(body: &str, identifier: &ProblemIdentifier) -> Result<ProblemData> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| EditorialError::Network(format!("Invalid response from Codeforces API: {}", e)))?;

    if response.status != "OK" {
        return Err(EditorialError::Network(format!(
            "Codeforces API error: {}",
            response.comment.unwrap_or(response.status)
        )));
    }

    let standings = response
        .result
        .ok_or_else(|| EditorialError::Network("Codeforces API returned no result".to_string()))?;

    let problem = standings
        .problems
        .into_iter()
        .find(|p| p.index.eq_ignore_ascii_case(&identifier.problem_id))
        .ok_or_else(|| EditorialError::ProblemNotFound(format!("Problem {} not found", identifier)))?;

    let mut data = ProblemData::placeholder(identifier.clone(), problem_url(identifier));
    data.title = problem.name;
    data.contest_name = Some(standings.contest.name);
    data.tags = problem.tags;
    data.rating = problem.rating;
    Ok(data)
}
