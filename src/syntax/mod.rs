//! Syntax and styling module
//!
//! This module provides the tokenizing side of the converter:
//! - Token kinds with hierarchical category labels
//! - Priority-ordered pattern rules
//! - The Python lexer
//! - Colors and run styles

mod language;
mod python;
mod rules;
mod style;
mod tokens;

pub use python::PythonLexer;
pub use style::{Rgb, RunStyle};
pub use tokens::{Token, TokenKind};
