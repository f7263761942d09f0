// src/editorial/mod.rs
// =============================================================================
// Finding, loading and extracting the editorial for a problem.
//
// Submodules:
// - finder: locate the tutorial URL for a contest
// - tutorial: load it (HTML, JS-rendered HTML or PDF) as plain text
// - extractor: ask the model for the part about our problem
// - format: render the final Markdown document
// =============================================================================

mod extractor;
mod finder;
mod format;
mod tutorial;
mod types;

pub use extractor::extract_editorial;
pub use finder::find_tutorial;
pub use format::format_markdown;
pub use tutorial::load_tutorial;
pub use types::{TutorialData, TutorialFormat};
