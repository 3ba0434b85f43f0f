use serde::{Deserialize, Serialize};

use crate::date::DateRange;
use crate::name::Name;

/// One operand of a `#`-concatenation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    /// `{text}`
    Braced(String),
    /// `"text"`
    Quoted(String),
    /// A string variable, or a number.
    Bare(String),
}

impl Piece {
    /// The text without delimiters.
    pub fn text(&self) -> &str {
        match self {
            Piece::Braced(text) | Piece::Quoted(text) | Piece::Bare(text) => text,
        }
    }

    pub(crate) fn write_into(&self, out: &mut String) {
        match self {
            Piece::Braced(text) => {
                out.push('{');
                out.push_str(text);
                out.push('}');
            }
            Piece::Quoted(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
            Piece::Bare(text) => out.push_str(text),
        }
    }
}

/// The written form of a concatenation, `piece # piece # ...`.
///
/// ```
/// use bibkit::entry::{Piece, written};
///
/// let pieces = [Piece::Quoted("Vol. ".into()), Piece::Bare("vol".into())];
/// assert_eq!(written(&pieces), "\"Vol. \" # vol");
/// ```
pub fn written(pieces: &[Piece]) -> String {
    let mut out = String::new();
    for (idx, piece) in pieces.iter().enumerate() {
        if idx > 0 {
            out.push_str(" # ");
        }
        piece.write_into(&mut out);
    }
    out
}

/// The value of a field.
///
/// The parser produces [`Value::Str`] for a single braced, quoted or numeric value and
/// [`Value::Concat`] for a bare variable or a `#`-concatenation. The other variants are the
/// result of [`postprocess`](crate::postprocess::postprocess).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Str(String),
    Int(i64),
    Date(DateRange),
    /// A page range `start--end`.
    Pages(i64, i64),
    List(Vec<String>),
    Names(Vec<Name>),
    /// A value referencing string variables, kept as written until
    /// [`expand_strings`](crate::expand::expand_strings) resolves it.
    Concat(Vec<Piece>),
}

impl Value {
    /// An empty value is never stored in an entry.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Str(s) => s.is_empty(),
            Value::Int(_) | Value::Pages(..) => false,
            Value::Date(date) => date.is_empty(),
            Value::List(list) => list.is_empty(),
            Value::Names(names) => names.is_empty(),
            Value::Concat(pieces) => pieces.is_empty(),
        }
    }

    /// A lone string variable, as in `journal = jcp`.
    pub fn variable(name: impl Into<String>) -> Self {
        Value::Concat(vec![Piece::Bare(name.into())])
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateRange> {
        match self {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_pages(&self) -> Option<(i64, i64)> {
        match self {
            Value::Pages(start, end) => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_names(&self) -> Option<&[Name]> {
        match self {
            Value::Names(names) => Some(names),
            _ => None,
        }
    }

    pub fn as_pieces(&self) -> Option<&[Piece]> {
        match self {
            Value::Concat(pieces) => Some(pieces),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<DateRange> for Value {
    fn from(date: DateRange) -> Self {
        Value::Date(date)
    }
}

impl From<(i64, i64)> for Value {
    fn from((start, end): (i64, i64)) -> Self {
        Value::Pages(start, end)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::List(list)
    }
}

impl From<Vec<Piece>> for Value {
    fn from(pieces: Vec<Piece>) -> Self {
        Value::Concat(pieces)
    }
}

impl From<Vec<Name>> for Value {
    fn from(names: Vec<Name>) -> Self {
        Value::Names(names)
    }
}
