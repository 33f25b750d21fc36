//! Language definitions for tokenizing
//!
//! A LanguageDefinition is an ordered set of pattern rules. Tokenizing a line
//! produces spans that cover the line completely and in order.

use tracing::trace;

use super::rules::PatternRule;
use super::tokens::TokenKind;

/// A classified byte range within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Kind assigned to this span
    pub kind: TokenKind,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, kind: TokenKind) -> Self {
        Self { start, end, kind }
    }

    /// The text this span covers in `line`
    pub fn text<'t>(&self, line: &'t str) -> &'t str {
        &line[self.start..self.end]
    }
}

/// A language definition for tokenizing
pub struct LanguageDefinition {
    /// Language name (e.g., "Python")
    pub name: String,
    /// Pattern rules, sorted by priority (highest first)
    pub patterns: Vec<PatternRule>,
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            patterns: Vec::new(),
        }
    }

    /// Add a pattern rule
    pub fn add_pattern(&mut self, rule: PatternRule) {
        trace!("{}: rule '{}' at priority {}", self.name, rule.name, rule.priority);
        self.patterns.push(rule);
        // Stable sort keeps insertion order among equal priorities
        self.patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Split a single line into spans
    ///
    /// Text no rule matches becomes an `Error` span one character wide.
    pub fn tokenize_line(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let rest = &text[pos..];
            let found = self
                .patterns
                .iter()
                .find_map(|rule| rule.match_start(rest).map(|m| (rule, m)));

            match found {
                Some((rule, m)) => {
                    if let Some(affix) = rule.affix.filter(|_| m.affix_len > 0) {
                        spans.push(Span::new(pos, pos + m.affix_len, affix));
                    }
                    if m.len > m.affix_len {
                        spans.push(Span::new(pos + m.affix_len, pos + m.len, rule.kind));
                    }
                    pos += m.len;
                }
                None => {
                    let width = rest.chars().next().map_or(1, char::len_utf8);
                    spans.push(Span::new(pos, pos + width, TokenKind::Error));
                    pos += width;
                }
            }
        }

        spans
    }
}
