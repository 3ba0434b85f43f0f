//! The main lexer for bibliography source text.
use memchr::{memchr, memchr_iter};
use tracing::trace;

use super::scan;
use crate::error::{Error, ErrorCode, Result};
use crate::token::{EntryKind, Position, Token, TokenKind, is_name_byte};

/// The state of the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Free text between entries.
    Comment,
    /// Immediately after an `@`, expecting the entry type.
    Entry,
    /// Inside an entry, matching structural tokens.
    Bib,
    /// Inside a braced value whose contents are opaque.
    Value,
    /// Inside the parenthesized body of a `@comment` or `@preamble`.
    Parens,
}

/// Incrementally computes line and column numbers for byte offsets.
#[derive(Debug, Clone)]
struct LineTracker {
    offset: usize,
    line: usize,
    line_start: usize,
}

impl LineTracker {
    fn new() -> Self {
        Self {
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn position(&mut self, input: &str, offset: usize) -> Position {
        if offset < self.offset {
            *self = Self::new();
        }

        let bytes = &input.as_bytes()[self.offset..offset];
        for nl in memchr_iter(b'\n', bytes) {
            self.line += 1;
            self.line_start = self.offset + nl + 1;
        }
        self.offset = offset;

        Position {
            offset,
            line: self.line,
            column: input[self.line_start..offset].chars().count() + 1,
        }
    }
}

/// A lexer over a complete source string, producing [`Token`]s lazily.
///
/// The lexer is fused after the first error. Whitespace inside entries is skipped unless
/// requested with [`Lexer::with_spaces`].
///
/// ```
/// use bibkit::lex::Lexer;
/// use bibkit::token::TokenKind;
///
/// let kinds: Vec<TokenKind> = Lexer::new("@misc{key,}")
///     .map(|tok| tok.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::EntryMarker,
///         TokenKind::Name,
///         TokenKind::LBrace,
///         TokenKind::Name,
///         TokenKind::Comma,
///         TokenKind::RBrace,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'r> {
    input: &'r str,
    pos: usize,
    mode: Mode,
    kind: EntryKind,
    depth: usize,
    paren_entry: bool,
    spaces: bool,
    pending: Option<Token<'r>>,
    lines: LineTracker,
    done: bool,
}

impl<'r> Lexer<'r> {
    pub fn new(input: &'r str) -> Self {
        Self {
            input,
            pos: 0,
            mode: Mode::Comment,
            kind: EntryKind::Regular,
            depth: 0,
            paren_entry: false,
            spaces: false,
            pending: None,
            lines: LineTracker::new(),
            done: false,
        }
    }

    /// Also produce [`TokenKind::Space`] tokens.
    pub fn with_spaces(mut self, spaces: bool) -> Self {
        self.spaces = spaces;
        self
    }

    /// The current brace depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    fn bytes(&self) -> &'r [u8] {
        self.input.as_bytes()
    }

    fn set_mode(&mut self, mode: Mode) {
        trace!(from = ?self.mode, to = ?mode, depth = self.depth, "lexer mode");
        self.mode = mode;
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Token<'r> {
        let start_pos = self.lines.position(self.input, start);
        let end_pos = self.lines.position(self.input, end);
        let input = self.input;
        Token::new(kind, &input[start..end], start_pos, end_pos)
    }

    /// Emit a token of `len` bytes at the current position and advance past it.
    fn advance(&mut self, kind: TokenKind, len: usize) -> Token<'r> {
        let start = self.pos;
        self.pos += len;
        self.token(kind, start, self.pos)
    }

    fn error(&mut self, code: ErrorCode, offset: usize) -> Error {
        let position = self.lines.position(self.input, offset);
        let start = self.lines.line_start;
        let end = memchr(b'\n', &self.bytes()[start..]).map_or(self.input.len(), |nl| start + nl);
        Error::lex(code, position, self.depth, &self.input[start..end])
    }

    fn unmatched(&mut self) -> Error {
        let ch = self.input[self.pos..].chars().next().unwrap_or('\0');
        self.error(ErrorCode::UnmatchedToken(ch), self.pos)
    }

    fn lex_comment(&mut self) -> Result<Option<Token<'r>>> {
        if self.pos >= self.input.len() {
            return Ok(None);
        }

        match scan::next_entry(self.bytes(), self.pos) {
            Some(at) if at == self.pos => {
                let tok = self.advance(TokenKind::EntryMarker, 1);
                self.set_mode(Mode::Entry);
                Ok(Some(tok))
            }
            Some(at) => Ok(Some(self.advance(TokenKind::Comment, at - self.pos))),
            None => Ok(Some(
                self.advance(TokenKind::Comment, self.input.len() - self.pos),
            )),
        }
    }

    fn lex_entry_type(&mut self) -> Result<Option<Token<'r>>> {
        let ws = scan::whitespace(self.bytes(), self.pos);
        if ws > self.pos {
            return Ok(Some(self.advance(TokenKind::Space, ws - self.pos)));
        }

        if self.pos >= self.input.len() {
            return Ok(None);
        }

        let end = scan::identifier(self.bytes(), self.pos);
        if end == self.pos {
            return Err(self.unmatched());
        }

        let tok = self.advance(TokenKind::Name, end - self.pos);
        self.kind = EntryKind::classify(tok.text);
        self.depth = 0;
        self.paren_entry = false;
        self.set_mode(Mode::Bib);
        Ok(Some(tok))
    }

    fn lex_bib(&mut self) -> Result<Option<Token<'r>>> {
        let Some(&b) = self.bytes().get(self.pos) else {
            return Ok(None);
        };

        let tok = match b {
            b'{' => {
                self.depth += 1;
                let tok = self.advance(TokenKind::LBrace, 1);
                if (self.depth == 1 && self.kind.is_opaque()) || self.depth > 1 {
                    self.set_mode(Mode::Value);
                }
                tok
            }
            b'}' => {
                if self.depth == 0 || (self.paren_entry && self.depth == 1) {
                    return Err(self.error(ErrorCode::UnbalancedBraces, self.pos));
                }
                self.depth -= 1;
                let tok = self.advance(TokenKind::RBrace, 1);
                if self.depth == 0 {
                    self.set_mode(Mode::Comment);
                }
                tok
            }
            b'(' => {
                if self.kind.is_opaque() {
                    let tok = self.advance(TokenKind::LParen, 1);
                    self.set_mode(Mode::Parens);
                    tok
                } else if self.depth == 0 {
                    self.depth = 1;
                    self.paren_entry = true;
                    self.advance(TokenKind::LParen, 1)
                } else {
                    return Err(self.unmatched());
                }
            }
            b')' => {
                if !(self.paren_entry && self.depth == 1) {
                    return Err(self.error(ErrorCode::UnbalancedParentheses, self.pos));
                }
                self.depth = 0;
                self.paren_entry = false;
                let tok = self.advance(TokenKind::RParen, 1);
                self.set_mode(Mode::Comment);
                tok
            }
            b'=' => self.advance(TokenKind::Equals, 1),
            b',' => self.advance(TokenKind::Comma, 1),
            b'#' => self.advance(TokenKind::Concat, 1),
            b'@' => self.advance(TokenKind::EntryMarker, 1),
            b'"' => match scan::quoted(self.bytes(), self.pos + 1) {
                Ok(close) => self.advance(TokenKind::StringLiteral, close + 1 - self.pos),
                Err(code) => return Err(self.error(code, self.pos)),
            },
            b if b.is_ascii_whitespace() => {
                let end = scan::whitespace(self.bytes(), self.pos);
                self.advance(TokenKind::Space, end - self.pos)
            }
            b if b == b'-' || b.is_ascii_digit() || is_name_byte(b) => {
                match scan::number(self.bytes(), self.pos) {
                    Some(end) => self.advance(TokenKind::Number, end - self.pos),
                    None => {
                        let end = scan::identifier(self.bytes(), self.pos);
                        self.advance(TokenKind::Name, end - self.pos)
                    }
                }
            }
            _ => return Err(self.unmatched()),
        };

        Ok(Some(tok))
    }

    fn lex_value(&mut self) -> Result<Option<Token<'r>>> {
        let Some(close) = scan::balanced(self.bytes(), self.pos) else {
            return Err(self.error(ErrorCode::UnclosedBrace, self.input.len()));
        };

        let content = self.advance(TokenKind::Content, close - self.pos);
        self.pending = Some(self.advance(TokenKind::RBrace, 1));
        self.depth -= 1;
        if self.depth == 0 {
            self.set_mode(Mode::Comment);
        } else {
            self.set_mode(Mode::Bib);
        }
        Ok(Some(content))
    }

    fn lex_parens(&mut self) -> Result<Option<Token<'r>>> {
        let Some(close) = scan::parenthesized(self.bytes(), self.pos) else {
            return Err(self.error(ErrorCode::UnclosedParenthesis, self.input.len()));
        };

        let content = self.advance(TokenKind::Content, close - self.pos);
        self.pending = Some(self.advance(TokenKind::RParen, 1));
        self.set_mode(Mode::Comment);
        Ok(Some(content))
    }
}

impl<'r> Iterator for Lexer<'r> {
    type Item = Result<Token<'r>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tok) = self.pending.take() {
            return Some(Ok(tok));
        }

        while !self.done {
            let step = match self.mode {
                Mode::Comment => self.lex_comment(),
                Mode::Entry => self.lex_entry_type(),
                Mode::Bib => self.lex_bib(),
                Mode::Value => self.lex_value(),
                Mode::Parens => self.lex_parens(),
            };

            match step {
                Ok(Some(tok)) if tok.kind == TokenKind::Space && !self.spaces => continue,
                Ok(Some(tok)) => return Some(Ok(tok)),
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }

        None
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}
