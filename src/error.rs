//! # Errors
//! Every fallible operation in this crate returns an [`Error`]. The error carries an
//! [`ErrorCode`] describing what went wrong, and for lexer and parser failures the
//! [`Position`] in the source at which it went wrong.
//!
//! Use [`Error::classify`] to distinguish tokenization problems from grammar problems:
//! ```
//! use bibkit::{parse, Dialect};
//! use bibkit::error::Category;
//!
//! let err = parse("@article{key, title = \\x}", Dialect::Bibtex).unwrap_err();
//! assert_eq!(err.classify(), Category::Lex);
//!
//! let err = parse("@article{key, year = 2000, year = 2001}", Dialect::Bibtex).unwrap_err();
//! assert_eq!(err.classify(), Category::Parse);
//! ```
use std::error;
use std::fmt;
use std::io;

use crate::token::{Position, TokenKind};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The input could not be tokenized.
    Lex,
    /// The token stream does not match the grammar, or a name is not legal in the dialect.
    Parse,
    /// A value failed validation at construction.
    Value,
    /// An entry is missing fields required by its reference format.
    Requirement,
    /// Reading the input failed.
    Io,
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCode {
    /// No token pattern matches at this character.
    UnmatchedToken(char),
    /// A closing brace without an opening brace.
    UnbalancedBraces,
    /// A closing parenthesis without an opening parenthesis.
    UnbalancedParentheses,
    /// The input ended inside a braced value.
    UnclosedBrace,
    /// The input ended inside a parenthesized value.
    UnclosedParenthesis,
    /// The input ended inside a quoted string.
    UnterminatedString,

    /// Found a token which is not permitted here.
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },
    /// The input ended in the middle of an entry.
    UnexpectedEof { expected: &'static str },
    /// The entry type is not legal in the dialect.
    InvalidEntryType(String),
    /// The field name is not legal in the dialect.
    InvalidField(String),
    /// The same field appears twice in one entry.
    DuplicateField(String),
    /// The date does not match `YYYY[-MM[-DD]][/[YYYY[-MM[-DD]]]]`.
    InvalidDate(String),

    /// A negative year.
    InvalidYear(i32),
    /// A month outside `1..=12`.
    InvalidMonth(u8),
    /// A day outside `1..=31`.
    InvalidDay(u8),
    /// A name style other than `first-last` or `last-first`.
    UnknownNameStyle(String),
    /// A reference format other than `bibtex`, `biblatex`, `mixed` or `relaxed`.
    UnknownDialect(String),
    /// Several `@string` entries define the same variables.
    DuplicateVariable(Vec<String>),
    /// An `@xdata` entry references itself, possibly through other `@xdata` entries.
    CyclicXdata(String),
    /// A field value cannot be written since its braces do not balance.
    UnbalancedValue(String),

    /// An entry lacks fields required by the reference format.
    MissingRequiredFields {
        key: String,
        bibtype: String,
        required: Vec<String>,
        either: Vec<Vec<String>>,
    },

    /// Reading the input failed.
    Io,
}

impl ErrorCode {
    pub fn category(&self) -> Category {
        match self {
            ErrorCode::UnmatchedToken(_)
            | ErrorCode::UnbalancedBraces
            | ErrorCode::UnbalancedParentheses
            | ErrorCode::UnclosedBrace
            | ErrorCode::UnclosedParenthesis
            | ErrorCode::UnterminatedString => Category::Lex,
            ErrorCode::UnexpectedToken { .. }
            | ErrorCode::UnexpectedEof { .. }
            | ErrorCode::InvalidEntryType(_)
            | ErrorCode::InvalidField(_)
            | ErrorCode::DuplicateField(_)
            | ErrorCode::InvalidDate(_) => Category::Parse,
            ErrorCode::InvalidYear(_)
            | ErrorCode::InvalidMonth(_)
            | ErrorCode::InvalidDay(_)
            | ErrorCode::UnknownNameStyle(_)
            | ErrorCode::UnknownDialect(_)
            | ErrorCode::DuplicateVariable(_)
            | ErrorCode::CyclicXdata(_)
            | ErrorCode::UnbalancedValue(_) => Category::Value,
            ErrorCode::MissingRequiredFields { .. } => Category::Requirement,
            ErrorCode::Io => Category::Io,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::UnmatchedToken(ch) => write!(f, "unmatched token at character '{ch}'"),
            ErrorCode::UnbalancedBraces => f.write_str("unbalanced braces"),
            ErrorCode::UnbalancedParentheses => f.write_str("unbalanced parentheses"),
            ErrorCode::UnclosedBrace => f.write_str("input ended inside a braced value"),
            ErrorCode::UnclosedParenthesis => {
                f.write_str("input ended inside a parenthesized value")
            }
            ErrorCode::UnterminatedString => f.write_str("unterminated string literal"),
            ErrorCode::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorCode::UnexpectedEof { expected } => {
                write!(f, "expected {expected}, found end of input")
            }
            ErrorCode::InvalidEntryType(t) => write!(f, "invalid entry type '{t}'"),
            ErrorCode::InvalidField(name) => write!(f, "invalid field '{name}'"),
            ErrorCode::DuplicateField(name) => write!(f, "duplicate field '{name}'"),
            ErrorCode::InvalidDate(s) => write!(f, "invalid date '{s}'"),
            ErrorCode::InvalidYear(y) => write!(f, "year must be non-negative, got {y}"),
            ErrorCode::InvalidMonth(m) => write!(f, "month must be between 1 and 12, got {m}"),
            ErrorCode::InvalidDay(d) => write!(f, "day must be between 1 and 31, got {d}"),
            ErrorCode::UnknownNameStyle(s) => write!(f, "unknown name style '{s}'"),
            ErrorCode::UnknownDialect(s) => write!(
                f,
                "unknown reference format '{s}' (use any of biblatex, bibtex, mixed, relaxed)"
            ),
            ErrorCode::DuplicateVariable(vars) => {
                write!(f, "strings contain duplicate variables: {}", vars.join(", "))
            }
            ErrorCode::CyclicXdata(key) => write!(f, "cyclic xdata reference through '{key}'"),
            ErrorCode::UnbalancedValue(field) => {
                write!(f, "value of field '{field}' has unbalanced braces")
            }
            ErrorCode::MissingRequiredFields {
                key,
                bibtype,
                required,
                either,
            } => {
                write!(
                    f,
                    "entry '{key}' (type '{bibtype}') is missing required field(s): "
                )?;
                let mut missing: Vec<String> = required.clone();
                missing.extend(either.iter().map(|alt| alt.join("/")));
                f.write_str(&missing.join(", "))
            }
            ErrorCode::Io => f.write_str("failed to read input"),
        }
    }
}

#[derive(Debug)]
struct ErrorImpl {
    code: ErrorCode,
    position: Option<Position>,
    depth: usize,
    line: Option<String>,
    io: Option<io::Error>,
}

/// The error type of this crate.
#[derive(Debug)]
pub struct Error {
    err: Box<ErrorImpl>,
}

impl Error {
    fn new(code: ErrorCode, position: Option<Position>) -> Self {
        Self {
            err: Box::new(ErrorImpl {
                code,
                position,
                depth: 0,
                line: None,
                io: None,
            }),
        }
    }

    /// A tokenization failure, with the brace depth and the text of the line it occurred on.
    pub(crate) fn lex(code: ErrorCode, position: Position, depth: usize, line: &str) -> Self {
        let mut err = Self::new(code, Some(position));
        err.err.depth = depth;
        err.err.line = Some(line.to_owned());
        err
    }

    /// A failure at a known position.
    pub(crate) fn at(code: ErrorCode, position: Position) -> Self {
        Self::new(code, Some(position))
    }

    /// A failure without position information.
    pub(crate) fn syntax(code: ErrorCode) -> Self {
        Self::new(code, None)
    }

    /// The class of this error.
    pub fn classify(&self) -> Category {
        self.err.code.category()
    }

    pub fn is_lex(&self) -> bool {
        self.classify() == Category::Lex
    }

    pub fn is_parse(&self) -> bool {
        self.classify() == Category::Parse
    }

    pub fn is_value(&self) -> bool {
        self.classify() == Category::Value
    }

    pub fn is_io(&self) -> bool {
        self.classify() == Category::Io
    }

    pub fn code(&self) -> &ErrorCode {
        &self.err.code
    }

    /// Where in the source the error occurred, if known.
    pub fn position(&self) -> Option<Position> {
        self.err.position
    }

    /// Line number of the error; `0` if unknown.
    pub fn line(&self) -> usize {
        self.err.position.map_or(0, |p| p.line)
    }

    /// Character column of the error; `0` if unknown.
    pub fn column(&self) -> usize {
        self.err.position.map_or(0, |p| p.column)
    }

    /// Brace depth of the lexer when the error occurred.
    pub fn depth(&self) -> usize {
        self.err.depth
    }

    /// The full source line on which a lexer error occurred.
    pub fn line_text(&self) -> Option<&str> {
        self.err.line.as_deref()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.err.code == other.err.code && self.err.position == other.err.position
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.err.io, self.err.position) {
            (Some(io), _) => write!(f, "{}: {io}", self.err.code),
            (None, Some(pos)) if self.is_lex() => write!(
                f,
                "failed at line {}, char {}, position {}, brace level {}: {}",
                pos.line, pos.column, pos.offset, self.err.depth, self.err.code
            ),
            (None, Some(pos)) => write!(
                f,
                "{} at line {}, char {}",
                self.err.code, pos.line, pos.column
            ),
            (None, None) => fmt::Display::fmt(&self.err.code, f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.err
            .io
            .as_ref()
            .map(|err| err as &(dyn error::Error + 'static))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let mut new = Self::new(ErrorCode::Io, None);
        new.err.io = Some(err);
        new
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Self::syntax(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_display() {
        let pos = Position {
            offset: 14,
            line: 2,
            column: 3,
        };
        let err = Error::lex(ErrorCode::UnbalancedBraces, pos, 0, "a}");
        assert_eq!(
            err.to_string(),
            "failed at line 2, char 3, position 14, brace level 0: unbalanced braces"
        );
        assert_eq!(err.line_text(), Some("a}"));
        assert!(err.is_lex());
    }

    #[test]
    fn test_missing_display() {
        let err = Error::syntax(ErrorCode::MissingRequiredFields {
            key: "key".into(),
            bibtype: "article".into(),
            required: vec!["title".into()],
            either: vec![vec!["year".into(), "date".into()]],
        });
        assert_eq!(
            err.to_string(),
            "entry 'key' (type 'article') is missing required field(s): title, year/date"
        );
        assert_eq!(err.classify(), Category::Requirement);
    }

    #[test]
    fn test_io() {
        let err = Error::from(io::Error::new(io::ErrorKind::InvalidData, "bad bytes"));
        assert!(err.is_io());
        assert!(error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "failed to read input: bad bytes");
    }
}
