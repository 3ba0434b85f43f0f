//! Fundamental components of the token stream.
use std::fmt;

use unicase::UniCase;

/// A location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Character column within the line, starting at 1.
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EntryMarker,
    Name,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Equals,
    Comma,
    Number,
    StringLiteral,
    Concat,
    Content,
    Comment,
    Space,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::EntryMarker => "'@'",
            TokenKind::Name => "name",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Equals => "'='",
            TokenKind::Comma => "','",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "quoted string",
            TokenKind::Concat => "'#'",
            TokenKind::Content => "braced content",
            TokenKind::Comment => "comment text",
            TokenKind::Space => "whitespace",
        })
    }
}

/// A single token, borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'r> {
    pub kind: TokenKind,
    pub text: &'r str,
    pub start: Position,
    pub end: Position,
}

impl<'r> Token<'r> {
    pub fn new(kind: TokenKind, text: &'r str, start: Position, end: Position) -> Self {
        Self {
            kind,
            text,
            start,
            end,
        }
    }
}

/// The kind of entry opened by an `@`, which determines how the lexer treats its body.
///
/// 1. Case-insensitive: `@STRING` and `@String` are both [`EntryKind::String`].
/// 2. The body of a `@comment` or `@preamble` is opaque text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    /// A `string` entry.
    String,
    /// A `comment` entry.
    Comment,
    /// A `preamble` entry.
    Preamble,
    /// Any other entry type.
    #[default]
    Regular,
}

impl EntryKind {
    pub fn classify(entry_type: &str) -> Self {
        let uni = UniCase::unicode(entry_type);
        if uni == UniCase::ascii("preamble") {
            Self::Preamble
        } else if uni == UniCase::ascii("comment") {
            Self::Comment
        } else if uni == UniCase::ascii("string") {
            Self::String
        } else {
            Self::Regular
        }
    }

    /// Whether the body of the entry is a single run of opaque text.
    #[inline]
    pub fn is_opaque(self) -> bool {
        matches!(self, Self::Comment | Self::Preamble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EntryKind::classify("PreAmble"), EntryKind::Preamble);
        assert_eq!(EntryKind::classify("comment"), EntryKind::Comment);
        assert_eq!(EntryKind::classify("STRING"), EntryKind::String);
        assert_eq!(EntryKind::classify("article"), EntryKind::Regular);
        assert_eq!(EntryKind::classify("strings"), EntryKind::Regular);
        assert!(EntryKind::Comment.is_opaque());
        assert!(!EntryKind::String.is_opaque());
    }
}
