use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, trace, warn};

use super::matcher::TermMatcher;
use super::scanner::FileScanner;
use super::walker::TreeWalker;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::results::{FileResult, SearchOutcome};

/// Performs a search for `config.term` under `config.root_path`.
///
/// A file root is scanned inline. A directory root fans out one scan
/// unit per candidate file over a worker pool of `config.thread_count`
/// threads and fans the results back in over a channel; the call
/// returns once every unit has finished. Per-file and per-directory
/// failures are recorded in the outcome, and only a root path that
/// cannot be resolved fails the call itself.
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutcome> {
    info!(
        "Starting search for '{}' under {}",
        config.term,
        config.root_path.display()
    );

    let metadata = std::fs::metadata(&config.root_path)
        .map_err(|e| SearchError::from_io(&config.root_path, e))?;

    let matcher = TermMatcher::new(config.term.clone(), config.case_insensitive);
    let scanner = FileScanner::new(matcher);

    let outcome = if metadata.is_dir() {
        search_directory(config, Arc::new(scanner))?
    } else {
        debug!("Root is a single file, scanning inline");
        scan_single_file(&scanner, &config.root_path)
    };

    info!(
        "Search complete. Found {} matches in {} files",
        outcome.total_matches, outcome.files_with_matches
    );
    Ok(outcome)
}

fn scan_single_file(scanner: &FileScanner, path: &Path) -> SearchOutcome {
    let mut outcome = SearchOutcome::new();
    outcome.files_searched = 1;
    match scanner.scan_file(path) {
        Ok(matches) => outcome.add_file_result(FileResult {
            path: path.to_path_buf(),
            matches,
        }),
        Err(e) => outcome.record_error(e),
    }
    outcome
}

fn search_directory(
    config: &SearchConfig,
    scanner: Arc<FileScanner>,
) -> SearchResult<SearchOutcome> {
    let thread_count = config.thread_count.get();
    debug!("Using {} worker threads", thread_count);

    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|e| SearchError::config(format!("failed to build worker pool: {}", e)))?;
    let pool = Arc::new(pool);

    let (result_tx, result_rx) = channel();
    let (error_tx, error_rx) = channel();
    let files_searched = Arc::new(AtomicUsize::new(0));

    // The traversal is itself a unit of work. It owns the original
    // senders for as long as it is scheduling children, so the channels
    // cannot disconnect while new scans are still being added.
    let traversal = {
        let pool = Arc::clone(&pool);
        let scanner = Arc::clone(&scanner);
        let scheduled = Arc::clone(&files_searched);
        let root = config.root_path.clone();
        let max_depth = config.max_depth;
        move || {
            let walker = TreeWalker::new(&root, max_depth);
            run_traversal(walker, &pool, &scanner, &scheduled, result_tx, error_tx);
        }
    };
    pool.spawn(traversal);

    let mut outcome = collect(result_rx, error_rx);
    outcome.files_searched = files_searched.load(Ordering::Relaxed);
    Ok(outcome)
}

/// Walks the tree and hands one scan unit per candidate file to the
/// pool. The senders passed in here are dropped when the function
/// returns, marking the traversal itself as finished.
fn run_traversal(
    walker: TreeWalker,
    pool: &ThreadPool,
    scanner: &Arc<FileScanner>,
    scheduled: &AtomicUsize,
    result_tx: Sender<FileResult>,
    error_tx: Sender<SearchError>,
) {
    for entry in walker {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                // One unreadable directory ends the enumeration; scans
                // already handed to the pool keep running.
                warn!("Traversal stopped: {}", e);
                let _ = error_tx.send(e);
                break;
            }
        };

        trace!("Scheduling scan for {}", path.display());
        scheduled.fetch_add(1, Ordering::Relaxed);

        // Clone the senders before the unit reaches the pool so it
        // counts as outstanding from this moment, not from whenever a
        // worker picks it up.
        let result_tx = result_tx.clone();
        let error_tx = error_tx.clone();
        let scanner = Arc::clone(scanner);
        pool.spawn(move || match scanner.scan_file(&path) {
            Ok(matches) if !matches.is_empty() => {
                let _ = result_tx.send(FileResult { path, matches });
            }
            Ok(_) => {}
            Err(e) => {
                let _ = error_tx.send(e);
            }
        });
    }
}

/// Drains both channels into an outcome.
///
/// The result iteration blocks until every sender clone is gone, which
/// is exactly when the traversal and all the scans it scheduled have
/// finished; the error channel is fully buffered by then.
fn collect(result_rx: Receiver<FileResult>, error_rx: Receiver<SearchError>) -> SearchOutcome {
    let mut outcome = SearchOutcome::new();

    for file_result in result_rx {
        outcome.add_file_result(file_result);
    }
    for error in error_rx {
        outcome.record_error(error);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    #[test]
    fn test_search_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("test.txt"), "test line\ntest line 2\n").unwrap();
        std::fs::write(dir.path().join("other.txt"), "nothing here\n").unwrap();

        let config = SearchConfig::new("test", dir.path())
            .with_max_depth(None)
            .with_thread_count(NonZeroUsize::new(2).unwrap());

        let outcome = search(&config).unwrap();
        assert_eq!(outcome.files_with_matches, 1);
        assert_eq!(outcome.total_matches, 2);
        assert_eq!(outcome.files_searched, 2);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_search_single_file_inline() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.txt");
        std::fs::write(&file, "one test\nno hit\n").unwrap();

        let config = SearchConfig::new("test", &file);

        let outcome = search(&config).unwrap();
        assert_eq!(outcome.files_searched, 1);
        assert_eq!(outcome.files_with_matches, 1);
        assert_eq!(outcome.file_results[0].path, file);
    }

    #[test]
    fn test_search_single_file_without_match_is_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.txt");
        std::fs::write(&file, "nothing of note\n").unwrap();

        let config = SearchConfig::new("absent", &file);

        let outcome = search(&config).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.files_searched, 1);
    }

    #[test]
    fn test_search_missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let config = SearchConfig::new("test", dir.path().join("no_such_root"));

        let err = search(&config).unwrap_err();
        assert!(matches!(err, SearchError::FileNotFound(_)));
    }

    #[test]
    fn test_empty_term_matches_every_line() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.txt");
        std::fs::write(&file, "one\ntwo\nthree\n").unwrap();

        let config = SearchConfig::new("", &file);

        let outcome = search(&config).unwrap();
        assert_eq!(outcome.total_matches, 3);
    }

    #[test]
    fn test_directory_root_past_bound_finds_nothing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("test.txt"), "test line\n").unwrap();

        // Absolute roots carry separators of their own, so the default
        // zero bound excludes them outright.
        let config = SearchConfig::new("test", dir.path());

        let outcome = search(&config).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.files_searched, 0);
    }
}
