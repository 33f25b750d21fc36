//! Pattern rules for tokenizing
//!
//! A rule is a regex anchored at the current position of the line being
//! tokenized. Rules are tried in priority order (highest first) and the first
//! one that matches a non-empty prefix wins.

use regex::Regex;

use super::tokens::TokenKind;

/// A single-line pattern rule
pub struct PatternRule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex, anchored at the start of the remaining text
    pub pattern: Regex,
    /// Token kind to assign to matches
    pub kind: TokenKind,
    /// Kind for the text captured by group 1, emitted as a separate token
    pub affix: Option<TokenKind>,
    /// Priority (higher = matched first)
    pub priority: i32,
}

/// Where a rule matched, relative to the start of the remaining text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    /// Total matched length in bytes
    pub len: usize,
    /// Length of the leading affix (0 when absent)
    pub affix_len: usize,
}

impl PatternRule {
    /// Create a new pattern rule
    pub fn new(name: &str, pattern: &str, kind: TokenKind, priority: i32) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            kind,
            affix: None,
            priority,
        })
    }

    /// Create a rule whose capture group 1 is a prefix of a different kind
    pub fn with_affix(
        name: &str,
        pattern: &str,
        affix: TokenKind,
        kind: TokenKind,
        priority: i32,
    ) -> Result<Self, regex::Error> {
        let mut rule = Self::new(name, pattern, kind, priority)?;
        rule.affix = Some(affix);
        Ok(rule)
    }

    /// Match at the start of `text`; empty matches never count
    pub fn match_start(&self, text: &str) -> Option<RuleMatch> {
        let rule_match = if self.affix.is_some() {
            let caps = self.pattern.captures(text)?;
            let whole = caps.get(0)?;
            RuleMatch {
                len: whole.end(),
                affix_len: caps.get(1).map_or(0, |m| m.end()),
            }
        } else {
            RuleMatch {
                len: self.pattern.find(text)?.end(),
                affix_len: 0,
            }
        };
        (rule_match.len > 0).then_some(rule_match)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_anchored() {
        let rule = PatternRule::new("number", r"\d+", TokenKind::NumberInteger, 50).unwrap();
        assert_eq!(rule.match_start("123 abc"), Some(RuleMatch { len: 3, affix_len: 0 }));
        assert_eq!(rule.match_start("abc 123"), None);
    }

    #[test]
    fn test_empty_match_is_ignored() {
        let rule = PatternRule::new("maybe", r"x*", TokenKind::Name, 1).unwrap();
        assert_eq!(rule.match_start("abc"), None);
        assert_eq!(rule.match_start("xxa").map(|m| m.len), Some(2));
    }

    #[test]
    fn test_affix_capture() {
        let rule = PatternRule::with_affix(
            "string",
            r#"([rb]?)("[^"]*")"#,
            TokenKind::StringAffix,
            TokenKind::StringDouble,
            90,
        )
        .unwrap();

        assert_eq!(rule.match_start(r#"r"raw" + 1"#), Some(RuleMatch { len: 6, affix_len: 1 }));
        assert_eq!(rule.match_start(r#""plain""#), Some(RuleMatch { len: 7, affix_len: 0 }));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternRule::new("bad", r"(", TokenKind::Error, 0).is_err());
    }
}
