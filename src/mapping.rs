//! Token mapping side channel
//!
//! When enabled, every rendered token is recorded as a `{category: text}`
//! entry, one list per rendered line, and the whole record is written as
//! `mapping.json` next to the output document.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::Result;
use crate::syntax::{Rgb, Token};

/// File name of the mapping written beside the document
pub const MAPPING_FILE: &str = "mapping.json";

/// One token: serialized as a single-entry object `{category: text}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub category: String,
    pub text: String,
}

impl MappingEntry {
    pub fn from_token(token: &Token<'_>) -> Self {
        Self {
            category: token.category().to_string(),
            text: token.text.to_string(),
        }
    }
}

impl Serialize for MappingEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.category, &self.text)?;
        map.end()
    }
}

/// Entries of one rendered line, in token order
pub type MappingLine = Vec<MappingEntry>;

/// The mapping of a whole document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MappingRecord {
    lines: Vec<MappingLine>,
}

impl MappingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: MappingLine) {
        self.lines.push(line);
    }

    /// Append another record's lines (multi-file documents)
    pub fn extend(&mut self, other: MappingRecord) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[MappingLine] {
        &self.lines
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write `mapping.json` into the directory holding `document`
    pub fn save_beside(&self, document: &Path) -> Result<PathBuf> {
        let path = mapping_path(document);
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

/// Where the mapping for `document` goes
pub fn mapping_path(document: &Path) -> PathBuf {
    document
        .parent()
        .map_or_else(|| PathBuf::from(MAPPING_FILE), |dir| dir.join(MAPPING_FILE))
}

/// Print one token as `Type:... Value:... Color:...`, the value in its color
pub fn echo_token<W: Write>(out: &mut W, token: &Token<'_>, hex: Option<&str>, rgb: Rgb) -> io::Result<()> {
    queue!(
        out,
        Print(format!("Type:{}    Value:", token.category())),
        SetForegroundColor(Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b
        }),
        Print(token.text),
        ResetColor,
        Print(format!("  Color:{}\n", hex.unwrap_or("None")))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenKind;

    fn sample() -> MappingRecord {
        let mut record = MappingRecord::new();
        record.push_line(vec![
            MappingEntry::from_token(&Token::new(TokenKind::KeywordNamespace, "import")),
            MappingEntry::from_token(&Token::new(TokenKind::Text, " ")),
            MappingEntry::from_token(&Token::new(TokenKind::NameNamespace, "os")),
        ]);
        record.push_line(Vec::new());
        record
    }

    #[test]
    fn test_json_shape() {
        assert_eq!(
            sample().to_json().unwrap(),
            r#"[[{"Token.Keyword.Namespace":"import"},{"Token.Text":" "},{"Token.Name.Namespace":"os"}],[]]"#
        );
    }

    #[test]
    fn test_extend() {
        let mut record = sample();
        record.extend(sample());
        assert_eq!(record.lines().len(), 4);
        assert!(record.lines()[3].is_empty());
    }

    #[test]
    fn test_mapping_path() {
        assert_eq!(mapping_path(Path::new("out/code.docx")), PathBuf::from("out/mapping.json"));
        assert_eq!(mapping_path(Path::new("code.docx")), PathBuf::from("mapping.json"));
    }

    #[test]
    fn test_save_beside() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample().save_beside(&dir.path().join("code.docx")).unwrap();

        assert_eq!(path, dir.path().join(MAPPING_FILE));
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[0][2]["Token.Name.Namespace"], "os");
    }

    #[test]
    fn test_echo_token() {
        let mut out = Vec::new();
        let token = Token::new(TokenKind::Keyword, "def");
        echo_token(&mut out, &token, Some("#AF00DB"), Rgb::new(0xaf, 0, 0xdb)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Type:Token.Keyword    Value:"));
        assert!(text.contains("def"));
        assert!(text.ends_with("  Color:#AF00DB\n"));
    }
}
