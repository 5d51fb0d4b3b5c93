// src/lyrics/matcher.rs

use std::fmt::Debug;

/// Strategy deciding whether a line matches a search query.
pub trait Matcher: Send + Sync + Debug {
    fn matches(&self, line: &str, query: &str) -> bool;
}

/// Matches when the line contains every whitespace-separated word of the
/// query, ignoring case. A query without words matches nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllWordsMatcher;

impl Matcher for AllWordsMatcher {
    fn matches(&self, line: &str, query: &str) -> bool {
        let line = line.to_lowercase();
        let mut words = query.split_whitespace().peekable();
        if words.peek().is_none() {
            return false;
        }
        words.all(|word| line.contains(&word.to_lowercase()))
    }
}
