/// This module implements the caller-visible result types.
///
/// Results arrive from worker threads in completion order, so the
/// engine accumulates them into a `SearchOutcome` whose `file_results`
/// carry no ordering guarantee across files. Within one file the match
/// list is always ascending by line number because files are read
/// sequentially. Scan failures never abort the run; they land in
/// `errors` next to the results that did succeed.
use std::path::PathBuf;

use crate::errors::SearchError;

/// A single line that contained the search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLine {
    /// The 1-based physical line number in the source file
    pub line_number: usize,
    /// The content of the line, original casing, terminator stripped
    pub line_content: String,
}

/// All matching lines found in a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// The path to the file
    pub path: PathBuf,
    /// The matching lines, ascending by line number, never empty
    pub matches: Vec<MatchLine>,
}

/// The complete result of one search run
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Per-file results, in no particular order
    pub file_results: Vec<FileResult>,
    /// Errors recovered during the run, one per failed file or directory
    pub errors: Vec<SearchError>,
    /// Total number of matching lines across all files
    pub total_matches: usize,
    /// Number of files scheduled for scanning
    pub files_searched: usize,
    /// Number of files with at least one match
    pub files_with_matches: usize,
}

impl SearchOutcome {
    /// Creates a new empty outcome
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds one file's matches to the outcome.
    ///
    /// A result without matches is dropped so that every stored
    /// `FileResult` has a non-empty match list.
    pub fn add_file_result(&mut self, file_result: FileResult) {
        if file_result.matches.is_empty() {
            return;
        }
        self.total_matches += file_result.matches.len();
        self.files_with_matches += 1;
        self.file_results.push(file_result);
    }

    /// Records an error recovered during the run
    pub fn record_error(&mut self, error: SearchError) {
        self.errors.push(error);
    }

    /// Whether the run produced neither matches nor errors
    pub fn is_empty(&self) -> bool {
        self.file_results.is_empty() && self.errors.is_empty()
    }
}
