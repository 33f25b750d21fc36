//! Python lexer
//!
//! Each line is tokenized on its own: constructs spanning lines (triple-quoted
//! strings, bracket continuations) are only recognized up to the end of the
//! line they start on.

use tracing::debug;

use super::language::{LanguageDefinition, Span};
use super::rules::PatternRule;
use super::tokens::{Token, TokenKind};

const STRING_PREFIX: &str = "[rRuUbBfF]{0,2}";

const KEYWORDS: &[&str] = &[
    "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "global", "if", "lambda", "nonlocal", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const BUILTINS: &[&str] = &[
    "abs", "all", "any", "ascii", "bin", "bool", "breakpoint", "bytearray", "bytes", "callable",
    "chr", "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len", "list",
    "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open", "ord", "pow",
    "print", "property", "range", "repr", "reversed", "round", "set", "setattr", "slice",
    "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
];

const EXCEPTIONS: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException", "BlockingIOError",
    "BrokenPipeError", "BufferError", "ChildProcessError", "ConnectionError", "EOFError",
    "EnvironmentError", "Exception", "FileExistsError", "FileNotFoundError", "FloatingPointError",
    "GeneratorExit", "IOError", "ImportError", "IndentationError", "IndexError",
    "InterruptedError", "IsADirectoryError", "KeyError", "KeyboardInterrupt", "LookupError",
    "MemoryError", "ModuleNotFoundError", "NameError", "NotADirectoryError", "NotImplementedError",
    "OSError", "OverflowError", "PermissionError", "ProcessLookupError", "RecursionError",
    "ReferenceError", "RuntimeError", "StopAsyncIteration", "StopIteration", "SyntaxError",
    "SystemError", "SystemExit", "TabError", "TimeoutError", "TypeError", "UnboundLocalError",
    "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeError", "ValueError", "Warning",
    "ZeroDivisionError",
];

/// What the next identifier on the line names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Anything,
    Function,
    Class,
    Namespace,
}

/// Line-at-a-time Python tokenizer
pub struct PythonLexer {
    lang: LanguageDefinition,
}

impl PythonLexer {
    /// Create the lexer, compiling its pattern rules
    pub fn new() -> Result<Self, regex::Error> {
        let lang = python_language()?;
        debug!("{} lexer ready with {} rules", lang.name, lang.patterns.len());
        Ok(Self { lang })
    }

    /// Split one line into tokens
    ///
    /// The tokens cover the line in order. Newline-only tokens are dropped.
    pub fn tokenize_line<'t>(&self, line: &'t str) -> Vec<Token<'t>> {
        let spans = self.lang.tokenize_line(line);
        let mut tokens = Vec::with_capacity(spans.len());

        let mut expect = Expect::Anything;
        let mut leading = true;
        let mut in_import = false;
        let mut i = 0;

        while i < spans.len() {
            let span = spans[i];
            let text = span.text(line);
            i += 1;

            if span.kind == TokenKind::Text {
                if text != "\n" {
                    tokens.push(Token::new(TokenKind::Text, text));
                }
                continue;
            }

            let starts_namespace = span.kind == TokenKind::Name
                || (span.kind == TokenKind::Punctuation && text == ".");
            if expect == Expect::Namespace && starts_namespace {
                let end = namespace_end(&spans, i - 1, line);
                i = spans.iter().position(|s| s.start == end).unwrap_or(spans.len());
                tokens.push(Token::new(TokenKind::NameNamespace, &line[span.start..end]));
                expect = Expect::Anything;
                leading = false;
                continue;
            }

            let kind = match span.kind {
                TokenKind::Name => match expect {
                    Expect::Function if is_dunder(text) => TokenKind::NameFunctionMagic,
                    Expect::Function => TokenKind::NameFunction,
                    Expect::Class => TokenKind::NameClass,
                    _ => match text {
                        "import" => {
                            // `from x import y` names plain identifiers
                            expect = if in_import { Expect::Anything } else { Expect::Namespace };
                            in_import = !in_import;
                            leading = false;
                            tokens.push(Token::new(TokenKind::KeywordNamespace, text));
                            continue;
                        }
                        "from" if leading => {
                            expect = Expect::Namespace;
                            in_import = true;
                            leading = false;
                            tokens.push(Token::new(TokenKind::KeywordNamespace, text));
                            continue;
                        }
                        "def" => {
                            expect = Expect::Function;
                            leading = false;
                            tokens.push(Token::new(TokenKind::Keyword, text));
                            continue;
                        }
                        "class" => {
                            expect = Expect::Class;
                            leading = false;
                            tokens.push(Token::new(TokenKind::Keyword, text));
                            continue;
                        }
                        word => classify_word(word),
                    },
                },
                TokenKind::StringDouble | TokenKind::StringSingle
                    if leading && (text.starts_with("\"\"\"") || text.starts_with("'''")) =>
                {
                    TokenKind::StringDoc
                }
                other => other,
            };

            // Another module may follow a comma in `import a, b`
            expect = if kind == TokenKind::Punctuation && text == "," && in_import {
                Expect::Namespace
            } else {
                Expect::Anything
            };
            if kind != TokenKind::StringAffix {
                leading = false;
            }
            tokens.push(Token::new(kind, text));
        }

        tokens
    }
}

/// End offset of a dotted module path starting at `spans[first]`
fn namespace_end(spans: &[Span], first: usize, line: &str) -> usize {
    spans[first..]
        .iter()
        .take_while(|s| {
            s.kind == TokenKind::Name || (s.kind == TokenKind::Punctuation && s.text(line) == ".")
        })
        .last()
        .map_or(spans[first].end, |s| s.end)
}

fn is_dunder(word: &str) -> bool {
    word.len() > 4 && word.starts_with("__") && word.ends_with("__")
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "True" | "False" | "None" => TokenKind::KeywordConstant,
        "and" | "or" | "not" | "in" | "is" => TokenKind::OperatorWord,
        "import" | "from" => TokenKind::Keyword,
        "self" | "cls" => TokenKind::NameBuiltinPseudo,
        w if KEYWORDS.contains(&w) => TokenKind::Keyword,
        w if EXCEPTIONS.contains(&w) => TokenKind::NameException,
        w if BUILTINS.contains(&w) => TokenKind::NameBuiltin,
        w if is_dunder(w) => TokenKind::NameFunctionMagic,
        _ => TokenKind::Name,
    }
}

/// Create the Python language definition
fn python_language() -> Result<LanguageDefinition, regex::Error> {
    let mut lang = LanguageDefinition::new("Python");

    lang.add_pattern(PatternRule::new("comment", r"#.*", TokenKind::CommentSingle, 100)?);
    lang.add_pattern(PatternRule::new("newline", r"\n", TokenKind::Text, 99)?);
    lang.add_pattern(PatternRule::new("whitespace", r"[^\S\n]+", TokenKind::Text, 98)?);

    // Strings; an unterminated literal runs to the end of the line
    lang.add_pattern(PatternRule::with_affix(
        "triple_double",
        &format!(r#"({STRING_PREFIX})("""(?:[^\\]|\\.?)*?(?:"""|$))"#),
        TokenKind::StringAffix,
        TokenKind::StringDouble,
        96,
    )?);
    lang.add_pattern(PatternRule::with_affix(
        "triple_single",
        &format!(r"({STRING_PREFIX})('''(?:[^\\]|\\.?)*?(?:'''|$))"),
        TokenKind::StringAffix,
        TokenKind::StringSingle,
        96,
    )?);
    lang.add_pattern(PatternRule::with_affix(
        "double_string",
        &format!(r#"({STRING_PREFIX})("(?:[^"\\]|\\.?)*(?:"|$))"#),
        TokenKind::StringAffix,
        TokenKind::StringDouble,
        95,
    )?);
    lang.add_pattern(PatternRule::with_affix(
        "single_string",
        &format!(r"({STRING_PREFIX})('(?:[^'\\]|\\.?)*(?:'|$))"),
        TokenKind::StringAffix,
        TokenKind::StringSingle,
        95,
    )?);

    lang.add_pattern(PatternRule::new("decorator", r"@[^\W\d][\w.]*", TokenKind::NameDecorator, 90)?);

    // Numbers
    lang.add_pattern(PatternRule::new("hex", r"0[xX][0-9a-fA-F_]+", TokenKind::NumberHex, 84)?);
    lang.add_pattern(PatternRule::new("binary", r"0[bB][01_]+", TokenKind::NumberBin, 84)?);
    lang.add_pattern(PatternRule::new("octal", r"0[oO][0-7_]+", TokenKind::NumberOct, 84)?);
    lang.add_pattern(PatternRule::new(
        "float",
        r"(?:\d[\d_]*\.[\d_]*|\.\d[\d_]*)(?:[eE][+-]?\d[\d_]*)?[jJ]?|\d[\d_]*[eE][+-]?\d[\d_]*[jJ]?",
        TokenKind::NumberFloat,
        82,
    )?);
    lang.add_pattern(PatternRule::new("integer", r"\d[\d_]*[jJ]?", TokenKind::NumberInteger, 80)?);

    // Identifiers; keywords are told apart afterwards
    lang.add_pattern(PatternRule::new("word", r"[^\W\d]\w*", TokenKind::Name, 70)?);

    lang.add_pattern(PatternRule::new(
        "operator",
        r"\*\*=?|//=?|>>=?|<<=?|->|:=|!=|[-+*/%&|^=<>@]=?|~",
        TokenKind::Operator,
        50,
    )?);
    lang.add_pattern(PatternRule::new("continuation", r"\\", TokenKind::Text, 45)?);
    lang.add_pattern(PatternRule::new("punctuation", r"[()\[\]{},:;.]", TokenKind::Punctuation, 40)?);

    Ok(lang)
}
