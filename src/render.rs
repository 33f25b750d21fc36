//! Source-to-table rendering
//!
//! Every source line becomes one table row, and every token on it one run
//! colored by the resolver. With mapping enabled the same pass records a
//! `{category: text}` entry per run.

use std::io::{self, Write};

use crate::colors::ColorResolver;
use crate::docx::{Row, Run, Table};
use crate::error::Result;
use crate::mapping::{echo_token, MappingEntry, MappingRecord};
use crate::syntax::{PythonLexer, RunStyle};

/// Styling and side-channel options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub font_name: String,
    /// Font size in points
    pub font_size: u16,
    pub bold: bool,
    /// Word table style name
    pub table_style: String,
    /// Collect the token mapping
    pub map: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_name: "Consolas".to_string(),
            font_size: 9,
            bold: false,
            table_style: "Light Shading Accent 1".to_string(),
            map: false,
        }
    }
}

impl RenderOptions {
    fn run_style(&self) -> RunStyle {
        RunStyle::new(&self.font_name, self.font_size).with_bold(self.bold)
    }
}

/// A rendered block of code
#[derive(Debug, Clone)]
pub struct RenderedCode {
    pub table: Table,
    /// Present only when mapping is enabled
    pub mapping: Option<MappingRecord>,
}

/// Renders code with one lexer, resolver and set of options
pub struct Renderer<'a> {
    lexer: &'a PythonLexer,
    resolver: &'a ColorResolver,
    options: &'a RenderOptions,
    echo: bool,
}

impl<'a> Renderer<'a> {
    /// Mapped tokens are echoed to stdout unless turned off with `with_echo`
    pub fn new(lexer: &'a PythonLexer, resolver: &'a ColorResolver, options: &'a RenderOptions) -> Self {
        Self {
            lexer,
            resolver,
            options,
            echo: true,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Render `code` into a table, one row per line
    pub fn render(&self, code: &str) -> Result<RenderedCode> {
        let base = self.options.run_style();
        let mut table = Table::new(&self.options.table_style);
        table.strip_first_top_border = true;
        let mut mapping = self.options.map.then(MappingRecord::new);

        let stdout = io::stdout();
        let mut out = stdout.lock();

        for line in code.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut row = Row::default();
            let mut map_line = Vec::new();

            for token in self.lexer.tokenize_line(line) {
                let color = self.resolver.resolve(token.category());

                if mapping.is_some() {
                    if self.echo {
                        let hex = self.resolver.resolve_hex(token.category());
                        echo_token(&mut out, &token, hex, color)?;
                    }
                    map_line.push(MappingEntry::from_token(&token));
                }
                row.runs.push(Run::new(token.text, base.clone().with_color(color)));
            }

            if let Some(mapping) = mapping.as_mut() {
                mapping.push_line(map_line);
            }
            table.add_row(row);
        }

        if mapping.is_some() && self.echo {
            out.flush()?;
        }

        Ok(RenderedCode { table, mapping })
    }
}
