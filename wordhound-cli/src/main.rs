use clap::Parser;
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wordhound::search::TermMatcher;
use wordhound::{SearchConfig, SearchError, SearchOutcome};

type Result<T> = std::result::Result<T, SearchError>;

/// Concurrent word search across files and directory trees
#[derive(Parser)]
#[command(name = "wordhound", author, version, about, long_about = None)]
struct Cli {
    /// Word to search for (matched as literal text; empty matches every line)
    term: String,

    /// File or directory to search
    path: PathBuf,

    /// Recurse into subdirectories without a depth limit
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Explicit depth bound, counted in path separators (overrides -r)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Case-insensitive matching
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Number of worker threads (default: logical CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    threads: Option<NonZeroUsize>,

    /// Show only summary statistics, not matches
    #[arg(long)]
    stats: bool,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> SearchConfig {
        let mut config = SearchConfig::new(self.term, self.path);
        config.case_insensitive = self.ignore_case;
        // An explicit bound wins over -r; -r alone removes the bound.
        config.max_depth = match (self.max_depth, self.recursive) {
            (Some(depth), _) => Some(depth),
            (None, true) => None,
            (None, false) => config.max_depth,
        };
        if let Some(threads) = self.threads {
            config.thread_count = threads;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("wordhound: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let explicit_config = cli.config.clone();
    let stats_only = cli.stats;

    let config = SearchConfig::load_from(explicit_config.as_deref())
        .map_err(|e| SearchError::config(e.to_string()))?
        .merge_with_cli(cli.into_config());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Searching for '{}' under {} with {} threads",
        config.term,
        config.root_path.display(),
        config.thread_count
    );

    let matcher = TermMatcher::new(config.term.clone(), config.case_insensitive);
    let outcome = wordhound::search(&config)?;

    for error in &outcome.errors {
        eprintln!("wordhound: {}", error);
    }

    print_search_results(&outcome, &config.term, &matcher, stats_only);
    Ok(())
}

fn print_search_results(
    outcome: &SearchOutcome,
    term: &str,
    matcher: &TermMatcher,
    stats_only: bool,
) {
    if stats_only {
        println!(
            "Found {} matches in {} files",
            outcome.total_matches, outcome.files_with_matches
        );
        return;
    }

    if outcome.file_results.is_empty() {
        println!("The word '{}' was not found.", term);
        return;
    }

    println!("Search results for the word '{}':", term);
    for file_result in &outcome.file_results {
        println!("\n{}", file_result.path.display().to_string().blue());
        for m in &file_result.matches {
            println!(
                "{}: {}",
                m.line_number.to_string().green(),
                highlight(&m.line_content, matcher)
            );
        }
    }

    println!(
        "\nFound {} matches in {} files",
        outcome.total_matches, outcome.files_with_matches
    );
}

/// Wraps every occurrence of the term in green bold, by literal
/// splicing on the spans the matcher found. The term is never compiled
/// as a pattern, so pattern-special characters stay plain text.
fn highlight(line: &str, matcher: &TermMatcher) -> String {
    let spans = matcher.find_spans(line);
    if spans.is_empty() {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (start, end) in spans {
        out.push_str(&line[last..start]);
        out.push_str(&line[start..end].green().bold().to_string());
        last = end;
    }
    out.push_str(&line[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(term: &str, case_insensitive: bool, line: &str) -> String {
        colored::control::set_override(false);
        let out = highlight(line, &TermMatcher::new(term, case_insensitive));
        colored::control::unset_override();
        out
    }

    #[test]
    fn test_highlight_without_colors_is_identity() {
        assert_eq!(plain("hello", false, "say hello twice hello"), "say hello twice hello");
        assert_eq!(plain("absent", false, "nothing here"), "nothing here");
    }

    #[test]
    fn test_highlight_special_characters_stay_literal() {
        // A term full of pattern metacharacters highlights only itself
        assert_eq!(plain("a.*b", false, "match a.*b not axxb"), "match a.*b not axxb");
    }

    #[test]
    fn test_highlight_wraps_spans_when_colored() {
        colored::control::set_override(true);
        let out = highlight("a hit here", &TermMatcher::new("hit", false));
        colored::control::unset_override();
        assert!(out.starts_with("a "));
        assert!(out.contains("hit"));
        assert_ne!(out, "a hit here");
    }
}
