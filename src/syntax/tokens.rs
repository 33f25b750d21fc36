//! Token kinds for syntax highlighting
//!
//! Every kind carries a hierarchical category label (`Token.Keyword.Namespace`).
//! The lowercase form of the label is the key used by color maps.

/// Lexical categories the Python lexer can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Whitespace and newlines
    Text,
    /// Characters no rule recognizes
    Error,
    /// Plain identifiers
    Name,
    /// Name following `def`
    NameFunction,
    /// Dunder names (`__init__`)
    NameFunctionMagic,
    /// Name following `class`
    NameClass,
    /// Module paths in import statements
    NameNamespace,
    /// `@decorator`
    NameDecorator,
    /// Built-in functions and types (`print`, `len`, `dict`)
    NameBuiltin,
    /// `self` and `cls`
    NameBuiltinPseudo,
    /// Built-in exception classes
    NameException,
    /// Language keywords
    Keyword,
    /// `import` and `from`
    KeywordNamespace,
    /// `True`, `False`, `None`
    KeywordConstant,
    /// Symbolic operators
    Operator,
    /// `and`, `or`, `not`, `in`, `is`
    OperatorWord,
    /// Brackets, commas, colons, dots
    Punctuation,
    /// `# ...` comments
    CommentSingle,
    /// Single-quoted strings
    StringSingle,
    /// Double-quoted strings
    StringDouble,
    /// Triple-quoted strings opening a line
    StringDoc,
    /// String prefixes (`r`, `b`, `f`, ...)
    StringAffix,
    NumberInteger,
    NumberFloat,
    NumberHex,
    NumberBin,
    NumberOct,
}

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: [TokenKind; 27] = [
        TokenKind::Text,
        TokenKind::Error,
        TokenKind::Name,
        TokenKind::NameFunction,
        TokenKind::NameFunctionMagic,
        TokenKind::NameClass,
        TokenKind::NameNamespace,
        TokenKind::NameDecorator,
        TokenKind::NameBuiltin,
        TokenKind::NameBuiltinPseudo,
        TokenKind::NameException,
        TokenKind::Keyword,
        TokenKind::KeywordNamespace,
        TokenKind::KeywordConstant,
        TokenKind::Operator,
        TokenKind::OperatorWord,
        TokenKind::Punctuation,
        TokenKind::CommentSingle,
        TokenKind::StringSingle,
        TokenKind::StringDouble,
        TokenKind::StringDoc,
        TokenKind::StringAffix,
        TokenKind::NumberInteger,
        TokenKind::NumberFloat,
        TokenKind::NumberHex,
        TokenKind::NumberBin,
        TokenKind::NumberOct,
    ];

    /// Get the hierarchical category label for this kind
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text => "Token.Text",
            TokenKind::Error => "Token.Error",
            TokenKind::Name => "Token.Name",
            TokenKind::NameFunction => "Token.Name.Function",
            TokenKind::NameFunctionMagic => "Token.Name.Function.Magic",
            TokenKind::NameClass => "Token.Name.Class",
            TokenKind::NameNamespace => "Token.Name.Namespace",
            TokenKind::NameDecorator => "Token.Name.Decorator",
            TokenKind::NameBuiltin => "Token.Name.Builtin",
            TokenKind::NameBuiltinPseudo => "Token.Name.Builtin.Pseudo",
            TokenKind::NameException => "Token.Name.Exception",
            TokenKind::Keyword => "Token.Keyword",
            TokenKind::KeywordNamespace => "Token.Keyword.Namespace",
            TokenKind::KeywordConstant => "Token.Keyword.Constant",
            TokenKind::Operator => "Token.Operator",
            TokenKind::OperatorWord => "Token.Operator.Word",
            TokenKind::Punctuation => "Token.Punctuation",
            TokenKind::CommentSingle => "Token.Comment.Single",
            TokenKind::StringSingle => "Token.Literal.String.Single",
            TokenKind::StringDouble => "Token.Literal.String.Double",
            TokenKind::StringDoc => "Token.Literal.String.Doc",
            TokenKind::StringAffix => "Token.Literal.String.Affix",
            TokenKind::NumberInteger => "Token.Literal.Number.Integer",
            TokenKind::NumberFloat => "Token.Literal.Number.Float",
            TokenKind::NumberHex => "Token.Literal.Number.Hex",
            TokenKind::NumberBin => "Token.Literal.Number.Bin",
            TokenKind::NumberOct => "Token.Literal.Number.Oct",
        }
    }

    /// Color-map key for this kind (the lowercase label)
    pub fn key(&self) -> String {
        self.name().to_ascii_lowercase()
    }

    /// Parse a kind from its label, in either case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// A classified piece of a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub kind: TokenKind,
    pub text: &'t str,
}

impl<'t> Token<'t> {
    pub fn new(kind: TokenKind, text: &'t str) -> Self {
        Self { kind, text }
    }

    /// Hierarchical category label of this token
    pub fn category(&self) -> &'static str {
        self.kind.name()
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = TokenKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), TokenKind::ALL.len());
    }

    #[test]
    fn test_from_name_roundtrip() {
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
            assert_eq!(TokenKind::from_name(&kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_invalid() {
        assert_eq!(TokenKind::from_name("Token.Nope"), None);
        assert_eq!(TokenKind::from_name(""), None);
    }

    #[test]
    fn test_key_is_lowercase_label() {
        assert_eq!(TokenKind::KeywordNamespace.key(), "token.keyword.namespace");
        assert_eq!(TokenKind::StringSingle.to_string(), "Token.Literal.String.Single");
    }
}
