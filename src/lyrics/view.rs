// src/lyrics/view.rs

//! Ordered line storage with a selection, searchable through [`LineCursor`].

use crate::lyrics::matcher::{AllWordsMatcher, Matcher};

/// Line shown before anything was fetched.
pub const PLACEHOLDER: &str =
    "No lyrics found yet. To search, select a track/file in view 1-4 and use fetch_lyrics";

/// Navigation and matching over an ordered sequence of lines.
///
/// Positions are line indices; `previous`/`next` return `None` at the ends.
pub trait LineCursor {
    fn current(&self) -> Option<usize>;
    fn previous(&self, index: usize) -> Option<usize>;
    fn next(&self, index: usize) -> Option<usize>;
    fn matches(&self, index: usize, query: &str) -> bool;
}

#[derive(Debug)]
pub struct LyricsView {
    lines: Vec<String>,
    selected: usize,
    matcher: Box<dyn Matcher>,
}

impl Default for LyricsView {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsView {
    /// View holding only the placeholder line.
    pub fn new() -> Self {
        Self::with_matcher(Box::new(AllWordsMatcher))
    }

    pub fn with_matcher(matcher: Box<dyn Matcher>) -> Self {
        Self {
            lines: vec![PLACEHOLDER.to_string()],
            selected: 0,
            matcher,
        }
    }

    /// Replace the contents with the non-empty, newline-separated lines of
    /// `text` and select the first one.
    pub fn show(&mut self, text: &str) {
        self.clear();
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            self.add_line(line);
        }
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.selected = 0;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn selected_line(&self) -> Option<&str> {
        self.lines.get(self.selected).map(String::as_str)
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.lines.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Indices of all lines matching `query`, in order.
    pub fn matching(&self, query: &str) -> Vec<usize> {
        (0..self.lines.len())
            .filter(|&i| self.matches(i, query))
            .collect()
    }

    /// Select the next matching line after the current one, wrapping around.
    pub fn search_forward(&mut self, query: &str) -> Option<usize> {
        let start = self.current()?;
        let mut index = start;
        loop {
            index = self.next(index).unwrap_or(0);
            if self.matches(index, query) {
                self.selected = index;
                return Some(index);
            }
            if index == start {
                return None;
            }
        }
    }

    /// Select the previous matching line before the current one, wrapping
    /// around.
    pub fn search_backward(&mut self, query: &str) -> Option<usize> {
        let start = self.current()?;
        let last = self.lines.len() - 1;
        let mut index = start;
        loop {
            index = self.previous(index).unwrap_or(last);
            if self.matches(index, query) {
                self.selected = index;
                return Some(index);
            }
            if index == start {
                return None;
            }
        }
    }
}

impl LineCursor for LyricsView {
    fn current(&self) -> Option<usize> {
        (self.selected < self.lines.len()).then_some(self.selected)
    }

    fn previous(&self, index: usize) -> Option<usize> {
        (index > 0 && index <= self.lines.len()).then(|| index - 1)
    }

    fn next(&self, index: usize) -> Option<usize> {
        (index + 1 < self.lines.len()).then(|| index + 1)
    }

    fn matches(&self, index: usize, query: &str) -> bool {
        self.lines
            .get(index)
            .is_some_and(|line| self.matcher.matches(line, query))
    }
}
