//! # Writing bibliographies
//! A [`Serializer`] writes [`Entries`] and their items as BibTeX through a [`Formatter`],
//! which controls the punctuation and whitespace, and [`FormatOptions`], which control the
//! layout:
//! ```
//! use bibkit::{Entry, Value};
//! use bibkit::ser::{FormatOptions, entry_to_string};
//!
//! let entry = Entry::new("article", "key")
//!     .with("author", "Author")
//!     .with("year", Value::Int(2000));
//! assert_eq!(
//!     entry_to_string(&entry, &FormatOptions::default()).unwrap(),
//!     "@article{key,\n    author = {Author},\n    year   = {2000}\n}"
//! );
//! ```
//! String values are written as they are. Typed values are written in their string form,
//! see [`preprocess_value`](crate::preprocess::preprocess_value), and concatenations piece
//! by piece.
mod formatter;

use std::borrow::Cow;
use std::io;

use tracing::trace;

pub use self::formatter::{CompactFormatter, DefaultFormatter, Formatter, ValidatingFormatter};
use crate::entry::{Comment, Entries, Entry, Item, Piece, Preamble, StringEntry, Value};
use crate::error::{Error, ErrorCode, Result};
use crate::preprocess::preprocess_value;
use crate::token::is_balanced;

/// The order in which the fields of an entry are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Order {
    /// As stored in the entry.
    #[default]
    Source,
    /// Sorted by field name.
    Alphabetical,
    /// The listed fields first, in the listed order, then the others as stored.
    Fields(Vec<String>),
}

/// The delimiters around a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surround {
    #[default]
    Braces,
    /// Values containing a `"` are braced regardless.
    Quotes,
}

/// Layout options for a [`Serializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Written before each field, and before the contents of multi-line auxiliary entries.
    pub indent: String,
    /// Line up the `=` of all fields of an entry.
    pub align: bool,
    pub order: Order,
    pub surround: Surround,
    /// Write `@string`, `@preamble` and `@comment` entries on a single line.
    pub singleline: bool,
    /// Delimit `@string`, `@preamble` and `@comment` entries by braces rather than
    /// parentheses.
    pub braces: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_owned(),
            align: true,
            order: Order::Source,
            surround: Surround::Braces,
            singleline: true,
            braces: true,
        }
    }
}

impl FormatOptions {
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn align(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn surround(mut self, surround: Surround) -> Self {
        self.surround = surround;
        self
    }

    pub fn singleline(mut self, singleline: bool) -> Self {
        self.singleline = singleline;
        self
    }

    pub fn braces(mut self, braces: bool) -> Self {
        self.braces = braces;
        self
    }
}

/// Write a bibliography to `writer` with the [`DefaultFormatter`].
#[inline]
pub fn to_writer<W>(writer: W, entries: &Entries, options: &FormatOptions) -> Result<()>
where
    W: io::Write,
{
    let mut ser = Serializer::with_options(writer, DefaultFormatter {}, options.clone());
    ser.write_entries(entries)
}

fn into_string(out: Vec<u8>) -> Result<String> {
    String::from_utf8(out)
        .map_err(|err| Error::from(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Write a bibliography to a string with the [`DefaultFormatter`].
pub fn to_string(entries: &Entries, options: &FormatOptions) -> Result<String> {
    let mut out = Vec::new();
    to_writer(&mut out, entries, options)?;
    into_string(out)
}

/// Write a single item to a string with the [`DefaultFormatter`].
pub fn item_to_string(item: Item<'_>, options: &FormatOptions) -> Result<String> {
    let mut ser = Serializer::with_options(Vec::new(), DefaultFormatter {}, options.clone());
    ser.write_item(item)?;
    into_string(ser.into_inner())
}

/// Write a regular entry to a string with the [`DefaultFormatter`].
pub fn entry_to_string(entry: &Entry, options: &FormatOptions) -> Result<String> {
    item_to_string(Item::Entry(entry), options)
}

/// The main serializer, when you already have a [`std::io::Write`] and a [`Formatter`].
pub struct Serializer<W, F = DefaultFormatter> {
    writer: W,
    formatter: F,
    options: FormatOptions,
}

impl<W, F> Serializer<W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Create a new [`Serializer`] with the default [`FormatOptions`].
    pub fn new(writer: W, formatter: F) -> Self {
        Self::with_options(writer, formatter, FormatOptions::default())
    }

    pub fn with_options(writer: W, formatter: F, options: FormatOptions) -> Self {
        Self {
            writer,
            formatter,
            options,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write every item of `entries` in the order of [`Entries::all`], separated by the
    /// entry separator of the formatter.
    pub fn write_entries(&mut self, entries: &Entries) -> Result<()> {
        for (idx, item) in entries.all().enumerate() {
            if idx > 0 {
                self.formatter.write_entry_separator(&mut self.writer)?;
            }
            self.write_item(item)?;
        }
        trace!(items = entries.len(), "wrote bibliography");
        Ok(())
    }

    pub fn write_item(&mut self, item: Item<'_>) -> Result<()> {
        match item {
            Item::String(string) => self.write_string(string),
            Item::Preamble(preamble) => self.write_preamble(preamble),
            Item::CommentEntry(comment) => self.write_comment_entry(comment),
            Item::Entry(entry) => self.write_entry(entry),
            Item::Comment(comment) => Ok(self.formatter.write_comment(&mut self.writer, comment)?),
        }
    }

    pub fn write_entry(&mut self, entry: &Entry) -> Result<()> {
        let fields = ordered_fields(entry, &self.options.order);

        // render first so that a validation failure leaves nothing half-written
        let mut rendered = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let text = Rendered::new(name, value);
            if F::VALIDATE && !text.is_balanced() {
                return Err(Error::syntax(ErrorCode::UnbalancedValue(name.to_owned())));
            }
            rendered.push((name, text));
        }

        let width = if self.options.align {
            rendered
                .iter()
                .map(|(name, _)| name.chars().count())
                .max()
                .unwrap_or(0)
        } else {
            0
        };

        let f = &mut self.formatter;
        let w = &mut self.writer;

        f.write_entry_type(w, entry.bibtype())?;
        f.write_body_start(w, true)?;
        f.write_entry_key(w, entry.bibkey())?;
        f.write_entry_key_end(w)?;

        let count = rendered.len();
        for (idx, (name, text)) in rendered.iter().enumerate() {
            f.write_field_start(w, &self.options.indent)?;
            f.write_field_key(w, name)?;
            if self.options.align {
                f.write_field_padding(w, width - name.chars().count())?;
            }
            f.write_field_separator(w)?;
            match text {
                Rendered::Text(text) => write_text(f, w, text, self.options.surround)?,
                Rendered::Pieces(pieces) => write_pieces(f, w, pieces)?,
            }
            f.write_field_end(w, idx + 1 == count)?;
        }

        f.write_body_end(w, true)?;
        Ok(())
    }

    /// Write `@string{variable = "value"}`.
    pub fn write_string(&mut self, string: &StringEntry) -> Result<()> {
        if F::VALIDATE && !is_balanced(string.value.as_bytes()) {
            return Err(Error::syntax(ErrorCode::UnbalancedValue(
                string.variable.clone(),
            )));
        }

        let f = &mut self.formatter;
        let w = &mut self.writer;

        f.write_entry_type(w, "string")?;
        f.write_body_start(w, self.options.braces)?;
        if !self.options.singleline {
            f.write_auxiliary_start(w, &self.options.indent)?;
        }
        f.write_field_key(w, &string.variable)?;
        f.write_field_separator(w)?;
        write_text(f, w, &string.value, Surround::Quotes)?;
        if !self.options.singleline {
            f.write_auxiliary_end(w)?;
        }
        f.write_body_end(w, self.options.braces)?;
        Ok(())
    }

    pub fn write_preamble(&mut self, preamble: &Preamble) -> Result<()> {
        self.write_auxiliary("preamble", &preamble.value)
    }

    pub fn write_comment_entry(&mut self, comment: &Comment) -> Result<()> {
        self.write_auxiliary("comment", &comment.value)
    }

    fn write_auxiliary(&mut self, entry_type: &str, value: &str) -> Result<()> {
        if F::VALIDATE && !is_balanced(value.as_bytes()) {
            return Err(Error::syntax(ErrorCode::UnbalancedValue(
                entry_type.to_owned(),
            )));
        }

        let f = &mut self.formatter;
        let w = &mut self.writer;

        f.write_entry_type(w, entry_type)?;
        f.write_body_start(w, self.options.braces)?;
        if !self.options.singleline {
            f.write_auxiliary_start(w, &self.options.indent)?;
        }
        w.write_all(value.as_bytes())?;
        if !self.options.singleline {
            f.write_auxiliary_end(w)?;
        }
        f.write_body_end(w, self.options.braces)?;
        Ok(())
    }
}

/// A field value ready to be written.
enum Rendered<'e> {
    Text(Cow<'e, str>),
    Pieces(&'e [Piece]),
}

impl<'e> Rendered<'e> {
    fn new(field: &str, value: &'e Value) -> Self {
        match value {
            Value::Str(text) => Rendered::Text(Cow::Borrowed(text)),
            Value::Concat(pieces) => Rendered::Pieces(pieces),
            _ => Rendered::Text(Cow::Owned(preprocess_value(field, value))),
        }
    }

    fn is_balanced(&self) -> bool {
        match self {
            Rendered::Text(text) => is_balanced(text.as_bytes()),
            Rendered::Pieces(pieces) => pieces.iter().all(|p| is_balanced(p.text().as_bytes())),
        }
    }
}

fn write_text<F, W>(f: &mut F, w: &mut W, text: &str, surround: Surround) -> io::Result<()>
where
    F: Formatter,
    W: ?Sized + io::Write,
{
    match surround {
        Surround::Quotes if !text.contains('"') => f.write_quoted_token(w, text),
        _ => f.write_bracketed_token(w, text),
    }
}

fn write_pieces<F, W>(f: &mut F, w: &mut W, pieces: &[Piece]) -> io::Result<()>
where
    F: Formatter,
    W: ?Sized + io::Write,
{
    for (idx, piece) in pieces.iter().enumerate() {
        if idx > 0 {
            f.write_token_separator(w)?;
        }
        match piece {
            Piece::Braced(token) => f.write_bracketed_token(w, token)?,
            Piece::Quoted(token) => f.write_quoted_token(w, token)?,
            Piece::Bare(variable) => f.write_variable_token(w, variable)?,
        }
    }
    Ok(())
}

/// The fields of `entry` in the requested order.
fn ordered_fields<'e>(entry: &'e Entry, order: &Order) -> Vec<(&'e str, &'e Value)> {
    let mut fields: Vec<_> = entry.fields().collect();
    match order {
        Order::Source => {}
        Order::Alphabetical => fields.sort_by(|a, b| a.0.cmp(b.0)),
        Order::Fields(first) => {
            let rank = |name: &str| {
                first
                    .iter()
                    .position(|f| f.eq_ignore_ascii_case(name))
                    .unwrap_or(first.len())
            };
            // stable, so unlisted fields keep their order
            fields.sort_by_key(|(name, _)| rank(name));
        }
    }
    fields
}
