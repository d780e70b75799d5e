use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::matcher::TermMatcher;
use crate::errors::{SearchError, SearchResult};
use crate::results::MatchLine;

const BUFFER_CAPACITY: usize = 65536;

/// Longest line the scanner will buffer before giving up on a file
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Reads files line by line and collects the lines containing the term
#[derive(Debug, Clone)]
pub struct FileScanner {
    matcher: TermMatcher,
}

impl FileScanner {
    /// Creates a scanner that reports lines matched by `matcher`
    pub fn new(matcher: TermMatcher) -> Self {
        Self { matcher }
    }

    /// The matcher this scanner applies to every line
    pub fn matcher(&self) -> &TermMatcher {
        &self.matcher
    }

    /// Scans one file and returns its matching lines in file order.
    ///
    /// The file is streamed through a fixed-size buffer, never loaded
    /// whole. Line numbers count physical lines from 1; the stored text
    /// keeps the original casing with the terminator stripped. Bytes
    /// that are not valid UTF-8 are replaced rather than failing the
    /// scan. A single line longer than [`MAX_LINE_BYTES`] fails the file
    /// with [`SearchError::LineTooLong`].
    pub fn scan_file(&self, path: &Path) -> SearchResult<Vec<MatchLine>> {
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);

        let mut matches = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        loop {
            buf.clear();
            // Reading one byte past the limit distinguishes "exactly at
            // the limit" from "over it" without unbounded buffering.
            let read = reader
                .by_ref()
                .take(MAX_LINE_BYTES as u64 + 1)
                .read_until(b'\n', &mut buf)
                .map_err(|e| SearchError::from_io(path, e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            strip_terminator(&mut buf);
            if buf.len() > MAX_LINE_BYTES {
                return Err(SearchError::line_too_long(path, MAX_LINE_BYTES));
            }

            let text = String::from_utf8_lossy(&buf);
            if self.matcher.is_match(&text) {
                matches.push(MatchLine {
                    line_number,
                    line_content: text.into_owned(),
                });
            }
        }

        Ok(matches)
    }
}

/// Removes a trailing `\n` or `\r\n`. A bare `\r` is left alone: it
/// means the limit cut a line short of its `\n`, which the length check
/// must still see.
fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
