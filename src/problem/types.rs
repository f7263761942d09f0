// src/problem/types.rs
// =============================================================================
// Data types describing a Codeforces problem.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one problem: contest (or gym) number plus problem index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemIdentifier {
    /// Contest number, kept as text ("1234")
    pub contest_id: String,
    /// Problem index ("A", "B1", ...)
    pub problem_id: String,
    /// True for problems under /gym/
    #[serde(default)]
    pub is_gym: bool,
}

impl ProblemIdentifier {
    pub fn new(contest_id: impl Into<String>, problem_id: impl Into<String>, is_gym: bool) -> Self {
        Self {
            contest_id: contest_id.into(),
            problem_id: problem_id.into(),
            is_gym,
        }
    }

    /// "1234A"
    pub fn full_id(&self) -> String {
        format!("{}{}", self.contest_id, self.problem_id)
    }

    /// File-system safe cache key, e.g. "editorial_gym_102345_B1"
    pub fn cache_key(&self) -> String {
        let prefix = if self.is_gym { "gym_" } else { "" };
        format!("editorial_{}{}_{}", prefix, self.contest_id, self.problem_id)
    }
}

impl fmt::Display for ProblemIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_gym {
            write!(f, "gym/")?;
        }
        write!(f, "{}/{}", self.contest_id, self.problem_id)
    }
}

/// Everything we scrape about a problem for the Markdown header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemData {
    pub identifier: ProblemIdentifier,
    pub title: String,
    pub url: String,
    pub contest_name: Option<String>,
    pub description: Option<String>,
    pub time_limit: Option<String>,
    pub memory_limit: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: Option<u32>,
}

impl ProblemData {
    // Minimal record when nothing but the identifier is known
    pub fn placeholder(identifier: ProblemIdentifier, url: String) -> Self {
        Self {
            identifier,
            title: "Unknown Problem".to_string(),
            url,
            contest_name: None,
            description: None,
            time_limit: None,
            memory_limit: None,
            tags: Vec::new(),
            rating: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_id_and_display() {
        let id = ProblemIdentifier::new("1234", "A", false);
        assert_eq!(id.full_id(), "1234A");
        assert_eq!(id.to_string(), "1234/A");

        let gym = ProblemIdentifier::new("102345", "B1", true);
        assert_eq!(gym.to_string(), "gym/102345/B1");
    }

    #[test]
    fn test_cache_key_separates_gym() {
        let contest = ProblemIdentifier::new("1234", "A", false);
        let gym = ProblemIdentifier::new("1234", "A", true);
        assert_eq!(contest.cache_key(), "editorial_1234_A");
        assert_eq!(gym.cache_key(), "editorial_gym_1234_A");
        assert_ne!(contest.cache_key(), gym.cache_key());
    }
}
