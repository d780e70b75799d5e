/// Locates literal occurrences of the search term in a line of text.
///
/// The term is always treated as plain text: characters that would carry
/// meaning in a pattern language match themselves and nothing else. In
/// case-insensitive mode the term is folded once at construction rather
/// than per line.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    folded_term: Option<String>,
}

impl TermMatcher {
    /// Creates a matcher for the given term
    pub fn new(term: impl Into<String>, case_insensitive: bool) -> Self {
        let term = term.into();
        let folded_term = case_insensitive.then(|| term.to_lowercase());
        Self { term, folded_term }
    }

    /// The term as given by the caller
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Whether this matcher folds case before comparing
    pub fn is_case_insensitive(&self) -> bool {
        self.folded_term.is_some()
    }

    /// Whether the line contains the term at least once.
    ///
    /// An empty term matches every line.
    pub fn is_match(&self, line: &str) -> bool {
        match &self.folded_term {
            Some(folded) => line.to_lowercase().contains(folded.as_str()),
            None => line.contains(self.term.as_str()),
        }
    }

    /// Byte ranges of every non-overlapping occurrence, ascending.
    ///
    /// The ranges index the original line even in case-insensitive mode,
    /// where occurrences are located by folding one character at a time,
    /// so callers can splice display markers around them directly. An
    /// empty term yields no spans.
    pub fn find_spans(&self, line: &str) -> Vec<(usize, usize)> {
        if self.term.is_empty() {
            return Vec::new();
        }
        match &self.folded_term {
            Some(folded) => find_folded_spans(line, folded),
            None => line
                .match_indices(self.term.as_str())
                .map(|(start, matched)| (start, start + matched.len()))
                .collect(),
        }
    }
}

fn find_folded_spans(line: &str, folded: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    while start < line.len() {
        match folded_prefix_end(&line[start..], folded) {
            Some(len) => {
                spans.push((start, start + len));
                start += len;
            }
            None => {
                start += line[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    spans
}

/// Byte length of the leading characters of `text` whose lowercase
/// folding equals `folded`, if `text` starts with such a sequence.
///
/// Folding can change a character's byte length, so the walk consumes
/// source characters one at a time and strips their folded form off the
/// front of the term. A span is only reported when the term is exhausted
/// exactly at a character boundary of the source.
fn folded_prefix_end(text: &str, folded: &str) -> Option<usize> {
    let mut remaining = folded;
    for (pos, ch) in text.char_indices() {
        for low in ch.to_lowercase() {
            let mut buf = [0u8; 4];
            remaining = remaining.strip_prefix(&*low.encode_utf8(&mut buf))?;
        }
        if remaining.is_empty() {
            return Some(pos + ch.len_utf8());
        }
    }
    None
}
