//! Word document model
//!
//! A Document is an ordered list of blocks. Source code is rendered as a
//! single-column table, one row per source line, each row a sequence of
//! styled runs.

mod package;

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use crate::error::Result;
use crate::syntax::RunStyle;

/// A styled span of text within a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: &str, style: RunStyle) -> Self {
        Self {
            text: text.to_string(),
            style,
        }
    }
}

/// One table row: a single cell holding one left-aligned paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub runs: Vec<Run>,
}

impl Row {
    /// Concatenated text of the row
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A single-column table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table style name as Word shows it (e.g. "Light Shading Accent 1")
    pub style: String,
    pub rows: Vec<Row>,
    /// Remove the top border of the first cell
    pub strip_first_top_border: bool,
}

impl Table {
    pub fn new(style: &str) -> Self {
        Self {
            style: style.to_string(),
            rows: Vec::new(),
            strip_first_top_border: false,
        }
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }
}

/// Top-level document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { text: String, level: u8 },
    Table(Table),
    PageBreak,
}

/// An in-memory Word document
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a heading paragraph; levels outside 1..=9 are clamped
    pub fn add_heading(&mut self, text: &str, level: u8) {
        self.blocks.push(Block::Heading {
            text: text.to_string(),
            level: level.clamp(1, 9),
        });
    }

    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Write the document as a .docx package
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        package::write_package(self, writer)
    }

    /// Save the document to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }
}
