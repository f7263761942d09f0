// src/problem/url.rs
// =============================================================================
// Parsing Codeforces problem URLs and building the URLs we fetch.
//
// Supported formats (codeforces.com or codeforces.ru, any subdomain such as
// www. or m1.):
//   - https://codeforces.com/contest/<contest_id>/problem/<problem_id>
//   - https://codeforces.com/problemset/problem/<contest_id>/<problem_id>
//   - https://codeforces.com/gym/<contest_id>/problem/<problem_id>
//
// Rust concepts:
// - OnceLock: compile the regex once, on first use
// - Regex captures: pull pieces out of a matched string
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use super::types::ProblemIdentifier;
use crate::error::{EditorialError, Result};

pub const CODEFORCES_BASE: &str = "https://codeforces.com";

// Matched against "<host><path>" of an already-parsed URL
fn problem_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // The pattern is a constant, so a failure here is a programmer error
        Regex::new(
            r"^(?:[a-z0-9-]+\.)?codeforces\.(?:com|ru)/(contest|gym|problemset/problem)/(\d+)(?:/problem)?/([A-Za-z]\d*)/?$",
        )
        .unwrap()
    })
}

// Parses a Codeforces problem URL into a ProblemIdentifier
//
// Example:
//   "https://codeforces.ru/gym/102345/problem/B1"
//     -> ProblemIdentifier { contest_id: "102345", problem_id: "B1", is_gym: true }
pub fn parse_problem_url(input: &str) -> Result<ProblemIdentifier> {
    debug!(url = input, "parsing problem URL");

    let parsed = Url::parse(input.trim())
        .map_err(|e| EditorialError::InvalidUrl(format!("'{}' is not a valid URL: {}", input, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(EditorialError::InvalidUrl(format!(
            "'{}' must use http or https",
            input
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| EditorialError::InvalidUrl(format!("'{}' has no host", input)))?;

    let target = format!("{}{}", host.to_lowercase(), parsed.path());

    let captures = problem_pattern()
        .captures(&target)
        .ok_or_else(|| unrecognized(input))?;

    let identifier = ProblemIdentifier::new(
        &captures[2],
        captures[3].to_uppercase(),
        &captures[1] == "gym",
    );

    debug!(problem = %identifier, "parsed problem URL");
    Ok(identifier)
}

// Canonical problem page URL
pub fn problem_url(identifier: &ProblemIdentifier) -> String {
    format!("{}/problem/{}", contest_url(identifier), identifier.problem_id)
}

// Contest (or gym) main page, where "Contest materials" links live
pub fn contest_url(identifier: &ProblemIdentifier) -> String {
    let segment = if identifier.is_gym { "gym" } else { "contest" };
    format!("{}/{}/{}", CODEFORCES_BASE, segment, identifier.contest_id)
}

// Turns an editorial link into an absolute https URL
//
// Examples:
//   "/blog/entry/123"                  -> "https://codeforces.com/blog/entry/123"
//   "http://codeforces.com/blog/entry" -> "https://codeforces.com/blog/entry"
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{}{}", CODEFORCES_BASE, url)
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

fn unrecognized(input: &str) -> EditorialError {
    EditorialError::InvalidUrl(format!(
        "Unrecognized Codeforces URL format: {}. Supported formats:\n  \
         - https://codeforces.com/contest/<contest_id>/problem/<problem_id>\n  \
         - https://codeforces.com/problemset/problem/<contest_id>/<problem_id>\n  \
         - https://codeforces.com/gym/<contest_id>/problem/<problem_id>",
        input
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contest_url() {
        let id = parse_problem_url("https://codeforces.com/contest/1234/problem/A").unwrap();
        assert_eq!(id, ProblemIdentifier::new("1234", "A", false));
    }

    #[test]
    fn test_parse_problemset_url() {
        let id = parse_problem_url("https://codeforces.com/problemset/problem/1900/C").unwrap();
        assert_eq!(id, ProblemIdentifier::new("1900", "C", false));
    }

    #[test]
    fn test_parse_gym_url_on_ru_domain() {
        let id = parse_problem_url("https://codeforces.ru/gym/102345/problem/B1").unwrap();
        assert_eq!(id, ProblemIdentifier::new("102345", "B1", true));
    }

    #[test]
    fn test_parse_tolerates_subdomain_query_and_trailing_slash() {
        let id = parse_problem_url("https://m1.codeforces.com/contest/1234/problem/a/?locale=en").unwrap();
        assert_eq!(id, ProblemIdentifier::new("1234", "A", false));
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        let err = parse_problem_url("https://atcoder.jp/contests/abc300/tasks/abc300_a").unwrap_err();
        assert!(matches!(err, EditorialError::InvalidUrl(_)));
        assert!(err.to_string().contains("Supported formats"));
    }

    #[test]
    fn test_parse_rejects_codeforces_in_query_string() {
        let result = parse_problem_url("https://evil.example/?next=codeforces.com/contest/1/problem/A");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_non_url() {
        assert!(parse_problem_url("codeforces contest 1234 A").is_err());
        assert!(parse_problem_url("ftp://codeforces.com/contest/1234/problem/A").is_err());
    }

    #[test]
    fn test_build_urls() {
        let id = ProblemIdentifier::new("1234", "B", false);
        assert_eq!(problem_url(&id), "https://codeforces.com/contest/1234/problem/B");
        assert_eq!(contest_url(&id), "https://codeforces.com/contest/1234");

        let gym = ProblemIdentifier::new("102345", "C", true);
        assert_eq!(problem_url(&gym), "https://codeforces.com/gym/102345/problem/C");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/blog/entry/1"), "https://codeforces.com/blog/entry/1");
        assert_eq!(
            normalize_url("http://codeforces.com/blog/entry/1"),
            "https://codeforces.com/blog/entry/1"
        );
        assert_eq!(normalize_url("https://example.com/x.pdf"), "https://example.com/x.pdf");
    }
}
