// src/editorial/types.rs
// =============================================================================
// Data passed between the editorial stages.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorialFormat {
    Html,
    Pdf,
}

/// Tutorial text ready to hand to the model
#[derive(Debug, Clone)]
pub struct TutorialData {
    pub url: String,
    pub format: TutorialFormat,
    /// Cleaned text, one block per line
    pub content: String,
    pub title: Option<String>,
}

/// The extracted solution for one problem
#[derive(Debug, Clone, PartialEq)]
pub struct Editorial {
    pub problem_id: String,
    pub solution_text: String,
    pub source_url: Option<String>,
    /// Model that produced the extraction
    pub model: String,
    pub extracted_at: DateTime<Utc>,
}
