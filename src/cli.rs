// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: the tool takes one problem URL and a few flags.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Option<T>: arguments that may be absent
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "codeforces-editorial",
    version,
    about = "Find and extract the editorial for a Codeforces problem",
    long_about = "codeforces-editorial finds the tutorial for a Codeforces contest, \
                  extracts the part about one problem with an LLM, and prints it as Markdown. \
                  Results are cached locally."
)]
pub struct Cli {
    /// Problem URL, e.g. https://codeforces.com/contest/1234/problem/A
    ///
    /// Also accepts /problemset/problem/<contest>/<problem> and /gym/ URLs.
    #[arg(required_unless_present = "clear_cache")]
    pub url: Option<String>,

    /// Write the Markdown to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the cache for this run (nothing is read or written)
    #[arg(long)]
    pub no_cache: bool,

    /// Remove all cached editorials before doing anything else
    #[arg(long)]
    pub clear_cache: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// OpenAI API key (overrides OPENAI_API_KEY)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does required_unless_present do?
//    - `codeforces-editorial --clear-cache` is valid on its own
//    - Without --clear-cache, leaving out the URL is a usage error
//
// 2. Where does the field name become a flag?
//    - no_cache -> --no-cache, clear_cache -> --clear-cache
//    - short = -o / -v, taken from the first letter
//
// 3. What does env = "OPENAI_API_KEY" do?
//    - If --api-key is not given, clap reads the environment variable
//    - hide_env_values keeps the key out of --help output
// -----------------------------------------------------------------------------
