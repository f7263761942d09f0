// src/llm/prompts.rs
// =============================================================================
// Prompt texts.
//
// Page content is truncated before it goes into a prompt so one huge blog
// post cannot blow the model's context window. Truncation counts chars, not
// bytes, so Cyrillic editorials never get cut mid-character.
// =============================================================================

use crate::problem::ProblemIdentifier;

pub const CONTEST_HTML_LIMIT: usize = 50_000;
pub const TUTORIAL_LIMIT: usize = 150_000;
pub const VALIDATE_LIMIT: usize = 20_000;

pub const FIND_LINK_SYSTEM: &str =
    "You are a helpful assistant that extracts URLs from HTML content. Return only the URL, nothing else.";

pub const EXTRACT_SYSTEM: &str = "You are an expert at analyzing competitive programming editorials. \
     Extract and structure the solution information clearly and accurately.";

/// The reply marker for "no such thing here"
pub const NOT_FOUND: &str = "NOT_FOUND";

// First `limit` chars of `text`
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn find_editorial_prompt(contest_html: &str, problem_id: &str) -> String {
    format!(
        "Find the editorial/tutorial/разбор link for this Codeforces contest \
         (I need the solution of problem {problem_id}).\n\n\
         Look for: Tutorial, Editorial, Разбор, Solutions, Analysis \
         (usually a blog post or the \"Contest materials\" box).\n\n\
         Return ONLY the full URL (http:// or https://), or \"{NOT_FOUND}\".\n\n\
         HTML:\n{html}\n",
        problem_id = problem_id,
        NOT_FOUND = NOT_FOUND,
        html = truncate_chars(contest_html, CONTEST_HTML_LIMIT),
    )
}

pub fn extract_solution_prompt(tutorial: &str, identifier: &ProblemIdentifier, title: &str) -> String {
    let pid = &identifier.problem_id;

    let mut markers = format!(
        "{pid}. / {pid}) / Problem {pid} / {full} / Задача {pid}",
        pid = pid,
        full = identifier.full_id()
    );
    let mut title_line = String::new();
    if !title.is_empty() {
        markers.push_str(&format!(" / \"{}\"", title));
        title_line = format!("Title: {}\n", title);
    }

    format!(
        "Extract the editorial for Problem {pid} from this Codeforces tutorial.\n\n\
         Find the section marked as: {markers}\n\n\
         Look for headings and separators (---, ##); matching is case-insensitive.\n\n\
         Format:\n\
         ---\n\
         Problem: {pid}\n\
         Contest: {contest}\n\
         {title_line}\
         ---\n\n\
         [Complete solution - preserve formatting, code blocks, formulas]\n\n\
         If not found: start with \"{NOT_FOUND}\" and list what problems you see.\n\n\
         Tutorial:\n{tutorial}",
        pid = pid,
        markers = markers,
        contest = identifier.contest_id,
        title_line = title_line,
        NOT_FOUND = NOT_FOUND,
        tutorial = truncate_chars(tutorial, TUTORIAL_LIMIT),
    )
}

pub fn validate_editorial_prompt(content: &str, problem_id: &str) -> String {
    format!(
        "Does this contain an editorial for Problem {problem_id}?\n\n\
         Answer: YES / NO / PARTIAL\n\n\
         Content:\n{content}\n",
        problem_id = problem_id,
        content = truncate_chars(content, VALIDATE_LIMIT),
    )
}
