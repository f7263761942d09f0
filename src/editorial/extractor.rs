// src/editorial/extractor.rs
// =============================================================================
// Asking the model for the section of the tutorial about our problem.
// =============================================================================

use chrono::Utc;
use tracing::{info, warn};

use super::types::{Editorial, TutorialData};
use crate::error::{EditorialError, Result};
use crate::llm::prompts::{self, NOT_FOUND};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::problem::ProblemIdentifier;

const EXTRACT_MAX_TOKENS: u32 = 8000;

// Extracts the editorial for one problem from a whole tutorial
//
// Returns EditorialNotFound when the model reports that the tutorial has no
// section for this problem.
pub async fn extract_editorial(
    llm: &dyn CompletionClient,
    tutorial: &TutorialData,
    identifier: &ProblemIdentifier,
    problem_title: &str,
) -> Result<Editorial> {
    info!(problem = %identifier, source = %tutorial.url, "extracting editorial");

    let prompt = prompts::extract_solution_prompt(&tutorial.content, identifier, problem_title);
    let request = CompletionRequest::new(prompt, EXTRACT_MAX_TOKENS).with_system(prompts::EXTRACT_SYSTEM);

    let reply = llm.complete(request).await.map_err(|e| match e {
        // A missing key is a setup problem, not an extraction failure
        EditorialError::MissingApiKey | EditorialError::Config(_) => e,
        other => EditorialError::Extraction(format!("Failed to extract solution: {}", other)),
    })?;

    let reply = reply.trim();
    if let Some(listing) = reply.strip_prefix(NOT_FOUND) {
        let listing = listing.trim_start_matches([':', '.', ' ', '-']).trim();
        warn!(problem = %identifier, "model found no section for this problem");
        let mut message = format!("Tutorial {} has no section for problem {}", tutorial.url, identifier.problem_id);
        if !listing.is_empty() {
            message.push_str(&format!(". Model saw: {}", listing));
        }
        return Err(EditorialError::EditorialNotFound(message));
    }

    let solution_text = strip_front_matter(reply).to_string();
    info!(chars = solution_text.len(), "extracted editorial");

    Ok(Editorial {
        problem_id: identifier.problem_id.clone(),
        solution_text,
        source_url: Some(tutorial.url.clone()),
        model: llm.model().to_string(),
        extracted_at: Utc::now(),
    })
}

// Drops a leading "---\nProblem: A\n...\n---" header block
//
// The prompt asks for the reply as front matter, exactly one blank line, then
// the solution. Anything else is returned unchanged, since a reply may also
// open with a thematic break.
fn strip_front_matter(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("---\n") else {
        return text;
    };
    let Some(fence) = rest.find("\n---\n") else {
        return text;
    };

    let after_fence = &rest[fence + "\n---\n".len()..];
    match after_fence.strip_prefix('\n') {
        Some(solution) if !solution.starts_with('\n') && !solution.trim().is_empty() => solution,
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editorial::TutorialFormat;
    use crate::testing::FakeLlm;

    fn tutorial() -> TutorialData {
        TutorialData {
            url: "https://codeforces.com/blog/entry/1".to_string(),
            format: TutorialFormat::Html,
            content: "tutorial".to_string(),
            title: None,
        }
    }

    fn id() -> ProblemIdentifier {
        ProblemIdentifier::new("123", "B", false)
    }

    #[tokio::test]
    async fn test_returns_solution_text() {
        let llm = FakeLlm::new(vec![Ok("solution".to_string())]);
        let editorial = extract_editorial(&llm, &tutorial(), &id(), "Title").await.unwrap();
        assert_eq!(editorial.solution_text, "solution");
        assert_eq!(editorial.problem_id, "B");
        assert_eq!(editorial.model, "fake-model");
        assert_eq!(editorial.source_url.as_deref(), Some("https://codeforces.com/blog/entry/1"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_valid() {
        let llm = FakeLlm::new(vec![Ok(String::new())]);
        let editorial = extract_editorial(&llm, &tutorial(), &id(), "").await.unwrap();
        assert_eq!(editorial.solution_text, "");
    }

    #[tokio::test]
    async fn test_not_found_reply() {
        let llm = FakeLlm::new(vec![Ok("NOT_FOUND: problems A, C, D".to_string())]);
        let err = extract_editorial(&llm, &tutorial(), &id(), "").await.unwrap_err();
        assert!(matches!(err, EditorialError::EditorialNotFound(_)));
        assert!(err.to_string().contains("problems A, C, D"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_extraction_error() {
        let llm = FakeLlm::new(vec![Err(EditorialError::Api("boom".into()))]);
        let err = extract_editorial(&llm, &tutorial(), &id(), "").await.unwrap_err();
        assert!(matches!(err, EditorialError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_missing_key_passes_through() {
        let llm = FakeLlm::new(vec![Err(EditorialError::MissingApiKey)]);
        let err = extract_editorial(&llm, &tutorial(), &id(), "").await.unwrap_err();
        assert!(matches!(err, EditorialError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_prompt_carries_tutorial_and_problem() {
        let llm = FakeLlm::new(vec![Ok("x".to_string())]);
        extract_editorial(&llm, &tutorial(), &id(), "Array Game").await.unwrap();
        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Problem B"));
        assert!(prompts[0].contains("Array Game"));
    }

    #[test]
    fn test_strip_front_matter() {
        let reply = "---\nProblem: B\nContest: 123\n---\n\n## Idea\nUse DP.";
        assert_eq!(strip_front_matter(reply), "## Idea\nUse DP.");
    }

    #[test]
    fn test_front_matter_kept_without_blank_line() {
        let reply = "---\nmeta\n---\nsolution";
        assert_eq!(strip_front_matter(reply), reply);
    }

    #[test]
    fn test_front_matter_kept_with_extra_blank_lines() {
        let reply = "---\nmeta\n---\n\n\nsolution";
        assert_eq!(strip_front_matter(reply), reply);
    }

    #[test]
    fn test_front_matter_kept_without_solution() {
        assert_eq!(strip_front_matter("---\nmeta\n---\n\n"), "---\nmeta\n---\n\n");
    }

    #[tokio::test]
    async fn test_front_matter_removed_from_reply() {
        let reply = "---\nProblem: B\n---\n\nUse a stack.\n";
        let llm = FakeLlm::new(vec![Ok(reply.to_string())]);
        let editorial = extract_editorial(&llm, &tutorial(), &id(), "").await.unwrap();
        assert_eq!(editorial.solution_text, "Use a stack.");
    }

    #[test]
    fn test_strip_front_matter_leaves_plain_text() {
        assert_eq!(strip_front_matter("## Idea\nUse DP."), "## Idea\nUse DP.");
        // A horizontal rule without a closing fence is content
        assert_eq!(strip_front_matter("---\nno closing fence"), "---\nno closing fence");
    }
}
