//! # Parser
//! A recursive descent parser over the token stream of a [`Lexer`].
//!
//! ```bib
//! @article{key,
//!   author = {Author},
//!   title = "Vol. " # vol # ".",
//! }
//! ```
//! Entry types and field names are checked against the [`Dialect`] of the [`ParseOptions`]
//! and lowercased. A braced, quoted or numeric value becomes a [`Value::Str`] without its
//! delimiters. A bare variable or a `#`-concatenation becomes a [`Value::Concat`] which keeps
//! every piece, to be resolved later by [`expand_strings`](crate::expand::expand_strings).
//!
//! The value of a `@string` is resolved right away against the variables defined before it.
use std::collections::HashSet;
use std::io;

use tracing::debug;

use crate::entry::{Comment, Entries, Entry, Piece, Preamble, StringEntry, Value};
use crate::error::{Error, ErrorCode, Result};
use crate::expand::resolve;
use crate::lex::Lexer;
use crate::token::{EntryKind, Position, Token, TokenKind};
use crate::vocab::Dialect;

/// Options for [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub dialect: Dialect,
    /// Drop the free text between entries.
    pub ignore_comments: bool,
}

impl ParseOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ignore_comments: false,
        }
    }

    pub fn ignore_comments(mut self, ignore: bool) -> Self {
        self.ignore_comments = ignore;
        self
    }
}

/// A parser over a stream of tokens.
pub struct Parser<'r, I> {
    tokens: I,
    peeked: Option<Token<'r>>,
    last: Position,
    options: ParseOptions,
}

impl<'r, I> Parser<'r, I>
where
    I: Iterator<Item = Result<Token<'r>>>,
{
    pub fn new(tokens: I, options: ParseOptions) -> Self {
        Self {
            tokens,
            peeked: None,
            last: Position::default(),
            options,
        }
    }

    fn peek(&mut self) -> Result<Option<Token<'r>>> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }
        Ok(self.peeked)
    }

    fn next_token(&mut self) -> Result<Option<Token<'r>>> {
        let tok = match self.peeked.take() {
            Some(tok) => Some(tok),
            None => self.tokens.next().transpose()?,
        };
        if let Some(tok) = tok {
            self.last = tok.end;
        }
        Ok(tok)
    }

    /// The next token, which must exist.
    fn require(&mut self, expected: &'static str) -> Result<Token<'r>> {
        self.next_token()?
            .ok_or_else(|| Error::at(ErrorCode::UnexpectedEof { expected }, self.last))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'r>> {
        let tok = self.require(expected)?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(unexpected(tok, expected))
        }
    }

    /// Read the whole token stream.
    pub fn parse(mut self) -> Result<Entries> {
        let mut entries = Entries::default();

        while let Some(tok) = self.next_token()? {
            match tok.kind {
                TokenKind::Comment => {
                    if !self.options.ignore_comments && !tok.text.trim().is_empty() {
                        entries.comments.push(tok.text.to_owned());
                    }
                }
                TokenKind::EntryMarker => self.take_entry(&mut entries)?,
                _ => return Err(unexpected(tok, "'@'")),
            }
        }

        debug!(
            entries = entries.entries.len(),
            strings = entries.strings.len(),
            preambles = entries.preambles.len(),
            comments = entries.comment_entries.len() + entries.comments.len(),
            dialect = %self.options.dialect,
            "parsed bibliography"
        );
        Ok(entries)
    }

    fn take_entry(&mut self, entries: &mut Entries) -> Result<()> {
        let entry_type = self.expect(TokenKind::Name, "entry type")?;

        match EntryKind::classify(entry_type.text) {
            EntryKind::Comment => {
                let text = self.take_bracketed_text()?;
                entries.comment_entries.push(Comment::new(text));
            }
            EntryKind::Preamble => {
                let text = self.take_bracketed_text()?;
                entries.preambles.push(Preamble::new(text));
            }
            EntryKind::String => {
                let closing = self.take_initial()?;
                let variable = self.expect(TokenKind::Name, "variable name")?;
                self.ignore_field_sep()?;
                let value = self.take_value()?;
                let value = match value.as_pieces() {
                    Some(pieces) => resolve(pieces, |name| entries.string(name)),
                    None => value.as_str().unwrap_or_default().to_owned(),
                };
                self.take_terminal(closing)?;
                entries.strings.push(StringEntry::new(variable.text, &value));
            }
            EntryKind::Regular => {
                let entry = self.take_regular_entry(entry_type)?;
                entries.entries.push(entry);
            }
        }

        Ok(())
    }

    /// Consume an opening `{` or `(` and return the kind of the matching closing token.
    fn take_initial(&mut self) -> Result<TokenKind> {
        let tok = self.require("'{' or '('")?;
        match tok.kind {
            TokenKind::LBrace => Ok(TokenKind::RBrace),
            TokenKind::LParen => Ok(TokenKind::RParen),
            _ => Err(unexpected(tok, "'{' or '('")),
        }
    }

    fn take_terminal(&mut self, closing: TokenKind) -> Result<()> {
        self.expect(closing, closing_name(closing)).map(|_| ())
    }

    /// The opaque body of a `@comment` or `@preamble`.
    fn take_bracketed_text(&mut self) -> Result<&'r str> {
        let closing = self.take_initial()?;
        let content = self.expect(TokenKind::Content, "entry body")?;
        self.take_terminal(closing)?;
        Ok(content.text)
    }

    fn ignore_field_sep(&mut self) -> Result<()> {
        self.expect(TokenKind::Equals, "'='").map(|_| ())
    }

    fn take_citation_key(&mut self) -> Result<&'r str> {
        let tok = self.require("entry key")?;
        match tok.kind {
            TokenKind::Name | TokenKind::Number => Ok(tok.text),
            _ => Err(unexpected(tok, "entry key")),
        }
    }

    fn take_regular_entry(&mut self, entry_type: Token<'r>) -> Result<Entry> {
        if !self.options.dialect.is_entry_type(entry_type.text) {
            return Err(Error::at(
                ErrorCode::InvalidEntryType(entry_type.text.to_lowercase()),
                entry_type.start,
            ));
        }

        let closing = self.take_initial()?;
        let key = self.take_citation_key()?;
        let mut entry = Entry::new(entry_type.text, key);

        let tok = self.require("','")?;
        if tok.kind == closing {
            return Ok(entry);
        } else if tok.kind != TokenKind::Comma {
            return Err(unexpected(tok, "','"));
        }

        let mut seen = HashSet::new();
        while let Some(field) = self.take_field_key(closing)? {
            let name = field.text.to_lowercase();
            if !self.options.dialect.is_field(&name) {
                return Err(Error::at(ErrorCode::InvalidField(name), field.start));
            }
            if !seen.insert(name.clone()) {
                return Err(Error::at(ErrorCode::DuplicateField(name), field.start));
            }

            self.ignore_field_sep()?;
            let value = self.take_value()?;
            entry.set(&name, value);

            let tok = self.require("',' or closing delimiter")?;
            if tok.kind == closing {
                return Ok(entry);
            } else if tok.kind != TokenKind::Comma {
                return Err(unexpected(tok, "',' or closing delimiter"));
            }
        }

        Ok(entry)
    }

    /// A field name, or `None` once the closing delimiter is consumed.
    fn take_field_key(&mut self, closing: TokenKind) -> Result<Option<Token<'r>>> {
        let tok = self.require("field name")?;
        if tok.kind == closing {
            Ok(None)
        } else if tok.kind == TokenKind::Name {
            Ok(Some(tok))
        } else {
            Err(unexpected(tok, "field name"))
        }
    }

    fn take_value(&mut self) -> Result<Value> {
        let mut pieces = Vec::new();
        let mut number = false;

        loop {
            let tok = self.require("field value")?;
            let piece = match tok.kind {
                TokenKind::LBrace => {
                    let content = self.expect(TokenKind::Content, "braced content")?;
                    self.expect(TokenKind::RBrace, "'}'")?;
                    Piece::Braced(content.text.to_owned())
                }
                TokenKind::StringLiteral => {
                    Piece::Quoted(tok.text[1..tok.text.len() - 1].to_owned())
                }
                TokenKind::Number => {
                    number = pieces.is_empty();
                    Piece::Bare(tok.text.to_owned())
                }
                TokenKind::Name => Piece::Bare(tok.text.to_owned()),
                _ => return Err(unexpected(tok, "field value")),
            };
            pieces.push(piece);

            match self.peek()? {
                Some(tok) if tok.kind == TokenKind::Concat => {
                    self.next_token()?;
                }
                _ => break,
            }
        }

        // a single literal or number is a plain string
        match pieces.pop() {
            Some(Piece::Braced(text) | Piece::Quoted(text)) if pieces.is_empty() => {
                Ok(Value::Str(text))
            }
            Some(Piece::Bare(text)) if pieces.is_empty() && number => Ok(Value::Str(text)),
            Some(piece) => {
                pieces.push(piece);
                Ok(Value::Concat(pieces))
            }
            None => Ok(Value::Concat(pieces)),
        }
    }
}

fn closing_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::RParen => "')'",
        _ => "'}'",
    }
}

fn unexpected(tok: Token<'_>, expected: &'static str) -> Error {
    Error::at(
        ErrorCode::UnexpectedToken {
            expected,
            found: tok.kind,
        },
        tok.start,
    )
}

/// Parse a bibliography.
///
/// ```
/// use bibkit::entry::{Piece, Value};
/// use bibkit::{parse, Dialect};
///
/// let bib = parse(
///     r#"@string{vol = "3"}
///     @Article{key,
///       Title = {A {Title}},
///       volume = "Vol. " # vol,
///     }"#,
///     Dialect::Bibtex,
/// )
/// .unwrap();
///
/// let entry = &bib.entries[0];
/// assert_eq!(entry.bibtype(), "article");
/// assert_eq!(entry.get_str("title"), Some("A {Title}"));
/// assert_eq!(
///     entry.get("volume"),
///     Some(&Value::Concat(vec![
///         Piece::Quoted("Vol. ".into()),
///         Piece::Bare("vol".into()),
///     ]))
/// );
/// assert_eq!(bib.strings[0].value, "3");
/// ```
pub fn parse(text: &str, dialect: Dialect) -> Result<Entries> {
    parse_with(text, &ParseOptions::new(dialect))
}

/// Parse a bibliography with explicit options.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Entries> {
    Parser::new(Lexer::new(text), *options).parse()
}

/// Read a bibliography to the end and parse it.
pub fn parse_file<R: io::Read>(mut reader: R, dialect: Dialect) -> Result<Entries> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relaxed(text: &str) -> Entries {
        parse(text, Dialect::Relaxed).unwrap()
    }

    #[test]
    fn test_regular_entry() {
        let bib = relaxed("@Book{Key2000, AUTHOR = {A. Author}, year = 2000, note = word,}");
        let entry = &bib.entries[0];
        assert_eq!(entry.bibtype(), "book");
        assert_eq!(entry.bibkey(), "Key2000");
        assert_eq!(
            entry.fields().collect::<Vec<_>>(),
            [
                ("author", &Value::from("A. Author")),
                ("year", &Value::from("2000")),
                ("note", &Value::variable("word")),
            ]
        );
    }

    #[test]
    fn test_keys_and_separators() {
        assert_eq!(relaxed("@misc{2004,}").entries[0].bibkey(), "2004");
        assert!(relaxed("@misc{key,}").entries[0].is_empty());
        assert!(relaxed("@misc{key}").entries[0].is_empty());
        assert_eq!(relaxed("@misc{key, title = {T}}").entries[0].len(), 1);
        assert_eq!(relaxed("@misc(key, title = {T},)").entries[0].len(), 1);
    }

    #[test]
    fn test_values() {
        let bib = relaxed(
            r#"@misc{key,
                a = {x {y} z},
                b = "quoted {"} text",
                c = "Vol. " # vol # {.} # 2,
                d = {},
                e = "",
                f = {C# Programming},
                g = -12,
                h = jan,
            }"#,
        );
        let entry = &bib.entries[0];
        assert_eq!(entry.get_str("a"), Some("x {y} z"));
        assert_eq!(entry.get_str("b"), Some("quoted {\"} text"));
        assert_eq!(
            entry.get("c"),
            Some(&Value::Concat(vec![
                Piece::Quoted("Vol. ".into()),
                Piece::Bare("vol".into()),
                Piece::Braced(".".into()),
                Piece::Bare("2".into()),
            ]))
        );
        assert!(!entry.contains("d"));
        assert!(!entry.contains("e"));
        assert_eq!(entry.get_str("f"), Some("C# Programming"));
        assert_eq!(entry.get_str("g"), Some("-12"));
        assert_eq!(entry.get("h"), Some(&Value::variable("jan")));
    }

    #[test]
    fn test_string_definitions() {
        let bib = relaxed(
            r#"@string{first = "Jan"}
            @string{both = first # {, Feb}}
            @string{other = unknown # first}
            @string{FIRST = "January"}"#,
        );
        assert_eq!(bib.strings[1].value, "Jan, Feb");
        assert_eq!(bib.strings[2].value, "unknownJan");
        assert_eq!(bib.string("first"), Some("January"));
    }

    #[test]
    fn test_auxiliary() {
        let bib = relaxed(
            r#"@string{ var = " value " }
            @STRING(other = {x})
            @preamble{ "\newcommand{\noopsort}[1]{}" }
            @preamble( "text" )
            @comment{ a {nested} comment }
            @comment(verbatim)"#,
        );
        assert_eq!(
            bib.strings,
            [StringEntry::new("var", "value"), StringEntry::new("other", "x")]
        );
        assert_eq!(
            bib.preambles,
            [
                Preamble::new("\"\\newcommand{\\noopsort}[1]{}\""),
                Preamble::new("\"text\"")
            ]
        );
        assert_eq!(
            bib.comment_entries,
            [Comment::new(" a {nested} comment "), Comment::new("verbatim")]
        );
        assert!(bib.entries.is_empty());
    }

    #[test]
    fn test_comments() {
        let text = "free text\n@misc{a,}\n\n@misc{b,} trailing";
        let bib = relaxed(text);
        assert_eq!(bib.comments, ["free text\n", " trailing"]);

        let options = ParseOptions::new(Dialect::Relaxed).ignore_comments(true);
        assert!(parse_with(text, &options).unwrap().comments.is_empty());
    }

    #[test]
    fn test_duplicate_field() {
        let err = parse(
            "@article{key, year = 2000, Year = 2001}",
            Dialect::Bibtex,
        )
        .unwrap_err();
        assert_eq!(err.code(), &ErrorCode::DuplicateField("year".into()));
        assert_eq!(err.position().map(|p| p.offset), Some(27));
        assert_eq!(err.column(), 28);
        assert!(err.is_parse());

        let err = relaxed_err("@misc{key, note = {}, note = {x}}");
        assert_eq!(err.code(), &ErrorCode::DuplicateField("note".into()));
    }

    fn relaxed_err(text: &str) -> Error {
        parse(text, Dialect::Relaxed).unwrap_err()
    }

    #[test]
    fn test_dialects() {
        let text = "@article{key, journaltitle = {J}}";
        assert_eq!(
            parse(text, Dialect::Bibtex).unwrap_err().code(),
            &ErrorCode::InvalidField("journaltitle".into())
        );
        assert!(parse(text, Dialect::Biblatex).is_ok());
        assert!(parse(text, Dialect::Mixed).is_ok());
        assert!(parse(text, Dialect::Relaxed).is_ok());

        let err = parse("@online{key,}", Dialect::Bibtex).unwrap_err();
        assert_eq!(err.code(), &ErrorCode::InvalidEntryType("online".into()));
        assert_eq!(err.column(), 2);

        assert_eq!(
            relaxed_err("@entry!{key,}").code(),
            &ErrorCode::InvalidEntryType("entry!".into())
        );
        assert_eq!(
            relaxed_err("@misc{key, f!eld = {x}}").code(),
            &ErrorCode::InvalidField("f!eld".into())
        );
    }

    #[test]
    fn test_grammar_errors() {
        assert_eq!(
            relaxed_err("@misc{key title = {x}}").code(),
            &ErrorCode::UnexpectedToken {
                expected: "','",
                found: TokenKind::Name
            }
        );
        assert_eq!(
            relaxed_err("@misc{key, title {x}}").code(),
            &ErrorCode::UnexpectedToken {
                expected: "'='",
                found: TokenKind::LBrace
            }
        );
        assert_eq!(
            relaxed_err("@misc{key, title = }").code(),
            &ErrorCode::UnexpectedToken {
                expected: "field value",
                found: TokenKind::RBrace
            }
        );
        assert_eq!(
            relaxed_err("@misc{key, title = {x}").code(),
            &ErrorCode::UnexpectedEof {
                expected: "',' or closing delimiter"
            }
        );
        assert_eq!(
            relaxed_err("@misc").code(),
            &ErrorCode::UnexpectedEof {
                expected: "'{' or '('"
            }
        );
    }

    #[test]
    fn test_lex_errors_propagate() {
        let err = relaxed_err("@misc{key, title = {x}}}\n@misc{key, title = \"x}");
        assert!(err.is_lex());
        assert_eq!(err.line(), 2);

        // a stray brace between entries is free text
        assert_eq!(relaxed("@misc{key,}\n}").comments, ["\n}"]);
    }

    #[test]
    fn test_parse_file() {
        let text = "@misc{key, title = {T}}";
        let bib = parse_file(text.as_bytes(), Dialect::Relaxed).unwrap();
        assert_eq!(bib, relaxed(text));
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            let _ = parse(&s, Dialect::Relaxed);
        }

        #[test]
        fn no_panic_entries(s in "@[a-z]{1,6}[{(][a-z0-9]{0,4},?( ?[a-z]{1,4} ?= ?(\"[^\"{}]{0,5}\"|[a-z0-9]{1,4}|\\{[^{}]{0,5}\\}))*[})]") {
            let _ = parse(&s, Dialect::Bibtex);
        }
    }
}
