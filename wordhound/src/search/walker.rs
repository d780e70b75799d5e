use std::path::{Path, PathBuf};

use ignore::{Walk, WalkBuilder};

use crate::errors::{SearchError, SearchResult};

/// Number of path-separator characters in a path's string form.
///
/// The traversal's depth bound counts separators in the full path as
/// walked, not nesting relative to the root, so an absolute root starts
/// out deeper than a relative one. Paths are not cleaned or normalized
/// before counting.
pub fn separator_depth(path: &Path) -> usize {
    path.to_string_lossy()
        .chars()
        .filter(|&c| c == std::path::MAIN_SEPARATOR)
        .count()
}

/// Enumerates the candidate files under a root path.
///
/// A regular-file root yields exactly itself. A directory root is walked
/// depth-first with every filter off: hidden files, ignore files and
/// gitignored files are all candidates, and no entry is pre-filtered by
/// extension, size or content. Directories whose separator count
/// exceeds the bound are pruned whole; files are never depth-filtered.
///
/// The iterator yields `Err` exactly once if an entry cannot be read,
/// then ends: one bad directory stops the enumeration but keeps
/// everything yielded before it.
pub struct TreeWalker {
    walk: Option<Walk>,
    root: PathBuf,
    done: bool,
}

impl TreeWalker {
    /// Builds a walker rooted at `root`, bounded by `max_depth`
    /// separators; `None` walks the whole subtree.
    pub fn new(root: impl AsRef<Path>, max_depth: Option<usize>) -> Self {
        let root = root.as_ref().to_path_buf();

        // The bound applies to the root directory itself: a directory
        // already past it yields nothing at all.
        if let Some(limit) = max_depth {
            if root.is_dir() && separator_depth(&root) > limit {
                return Self {
                    walk: None,
                    root,
                    done: true,
                };
            }
        }

        let mut builder = WalkBuilder::new(&root);
        builder.standard_filters(false);
        if let Some(limit) = max_depth {
            builder.filter_entry(move |entry| {
                !entry.file_type().is_some_and(|ft| ft.is_dir())
                    || separator_depth(entry.path()) <= limit
            });
        }

        Self {
            walk: Some(builder.build()),
            root,
            done: false,
        }
    }
}

impl Iterator for TreeWalker {
    type Item = SearchResult<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let walk = self.walk.as_mut()?;

        for entry in walk {
            match entry {
                Ok(entry) => {
                    // Directories only mark descent; candidates are
                    // everything else.
                    if entry.file_type().is_some_and(|ft| !ft.is_dir()) {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Err(e) => {
                    self.done = true;
                    let path = error_path(&e)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(SearchError::traversal(path, e.to_string())));
                }
            }
        }

        self.done = true;
        None
    }
}

fn error_path(error: &ignore::Error) -> Option<&Path> {
    match error {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect_paths(walker: TreeWalker) -> Vec<PathBuf> {
        walker.map(|entry| entry.unwrap()).collect()
    }

    #[test]
    fn test_separator_depth_counts_separators() {
        assert_eq!(separator_depth(Path::new("plain")), 0);
        assert_eq!(separator_depth(&Path::new("a").join("b").join("c.txt")), 2);

        let nested = Path::new("a").join("b");
        assert_eq!(separator_depth(&nested), separator_depth(Path::new("a")) + 1);
    }

    #[test]
    fn test_single_file_root_yields_itself() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("only.txt");
        fs::write(&file, "content\n").unwrap();

        let paths = collect_paths(TreeWalker::new(&file, None));
        assert_eq!(paths, vec![file.clone()]);

        // Depth bounds never apply to a file root.
        let paths = collect_paths(TreeWalker::new(&file, Some(0)));
        assert_eq!(paths, vec![file]);
    }

    #[test]
    fn test_yields_files_not_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), "b\n").unwrap();

        let paths = collect_paths(TreeWalker::new(dir.path(), None));
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_depth_bound_prunes_deeper_directories() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::create_dir_all(a.join("b").join("c")).unwrap();
        fs::write(dir.path().join("top.txt"), "x\n").unwrap();
        fs::write(a.join("mid.txt"), "x\n").unwrap();
        fs::write(a.join("b").join("deep.txt"), "x\n").unwrap();
        fs::write(a.join("b").join("c").join("deepest.txt"), "x\n").unwrap();

        let limit = separator_depth(&a);
        let paths = collect_paths(TreeWalker::new(dir.path(), Some(limit)));

        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&dir.path().join("top.txt")));
        assert!(paths.contains(&a.join("mid.txt")));
    }

    #[test]
    fn test_files_are_never_depth_filtered() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("top.txt"), "x\n").unwrap();
        fs::write(dir.path().join("sub").join("nested.txt"), "x\n").unwrap();

        // Files directly under the root sit one separator past the
        // bound, yet only the subdirectory is pruned.
        let limit = separator_depth(dir.path());
        let paths = collect_paths(TreeWalker::new(dir.path(), Some(limit)));

        assert_eq!(paths, vec![dir.path().join("top.txt")]);
    }

    #[test]
    fn test_directory_root_past_bound_yields_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("unreachable.txt"), "x\n").unwrap();

        // An absolute root carries separators of its own, so a zero
        // bound excludes the root directory itself.
        assert!(separator_depth(dir.path()) > 0);
        let paths = collect_paths(TreeWalker::new(dir.path(), Some(0)));
        assert!(paths.is_empty());
    }

    #[test]
    fn test_hidden_and_gitignored_files_are_visited() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.txt"), "x\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        fs::write(dir.path().join("app.log"), "x\n").unwrap();

        let paths = collect_paths(TreeWalker::new(dir.path(), None));
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&dir.path().join(".hidden.txt")));
        assert!(paths.contains(&dir.path().join("app.log")));
    }

    #[test]
    fn test_missing_root_yields_one_error_then_ends() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir");

        let mut walker = TreeWalker::new(&missing, None);
        let first = walker.next().unwrap();
        assert!(matches!(first, Err(SearchError::Traversal { .. })));
        assert!(walker.next().is_none());
    }
}
