// src/editorial/format.rs
// =============================================================================
// Rendering the final Markdown document.
//
// Layout:
//   # 1234A. Problem Title
//   - metadata bullets
//   ## Editorial
//   <solution, every heading pushed one level down>
//   ---
//   footer
//
// The solution comes from the model and often starts its own sections at
// "#" or "##". Demoting them keeps "## Editorial" the parent section.
// =============================================================================

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};

use super::types::Editorial;
use crate::problem::ProblemData;

pub fn format_markdown(editorial: &Editorial, problem: &ProblemData, tutorial_url: &str) -> String {
    let identifier = &problem.identifier;
    let mut out = String::new();

    out.push_str(&format!("# {}. {}\n\n", identifier.full_id(), problem.title));

    if let Some(contest) = &problem.contest_name {
        out.push_str(&format!("- **Contest:** {}\n", contest));
    }
    out.push_str(&format!("- **Problem:** [{}]({})\n", identifier.full_id(), problem.url));
    if let Some(limit) = &problem.time_limit {
        out.push_str(&format!("- **Time limit:** {}\n", limit));
    }
    if let Some(limit) = &problem.memory_limit {
        out.push_str(&format!("- **Memory limit:** {}\n", limit));
    }
    if !problem.tags.is_empty() {
        out.push_str(&format!("- **Tags:** {}\n", problem.tags.join(", ")));
    }
    if let Some(rating) = problem.rating {
        out.push_str(&format!("- **Rating:** {}\n", rating));
    }
    let source = editorial.source_url.as_deref().unwrap_or(tutorial_url);
    out.push_str(&format!("- **Editorial:** <{}>\n", source));

    out.push_str("\n## Editorial\n\n");
    let solution = demote_headings(editorial.solution_text.trim());
    if solution.is_empty() {
        out.push_str("_The model returned an empty solution._\n");
    } else {
        out.push_str(&solution);
        out.push('\n');
    }

    out.push_str(&format!(
        "\n---\n\n*Extracted by {} on {}*\n",
        editorial.model,
        editorial.extracted_at.format("%Y-%m-%d %H:%M UTC")
    ));

    out
}

// Adds one '#' to every ATX heading, leaving H6 and setext headings alone
//
// Works on source offsets from the parser, so headings inside fenced code
// blocks are never touched.
fn demote_headings(markdown: &str) -> String {
    let mut insert_at = Vec::new();

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        if let Event::Start(Tag::Heading(level, _, _)) = event {
            if level == HeadingLevel::H6 {
                continue;
            }
            let source = &markdown[range.clone()];
            let indent = source.len() - source.trim_start().len();
            if source[indent..].starts_with('#') {
                insert_at.push(range.start + indent);
            }
        }
    }

    let mut result = markdown.to_string();
    // Back to front so earlier offsets stay valid
    for offset in insert_at.into_iter().rev() {
        result.insert(offset, '#');
    }
    result
}
