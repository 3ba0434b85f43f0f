//! # Names
//! A BibTeX name has four components: the first names, the `von` prefix, the last names and
//! the `Jr.` suffix. The comma count of the name selects how the words are distributed:
//! ```bib
//! author = {First von Last}
//! author = {von Last, First}
//! author = {von Last, Jr, First}
//! ```
//! The prefix is found by case: a run of lowercase words which are not braced. A braced word
//! is never part of the prefix, so `{de la} Cruz` has no prefix and `{de la}` is a first name.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, Result};
use crate::lex::{NameWord, lex_name};

/// The components of a single name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    pub prefix: String,
    pub last: String,
    pub suffix: String,
}

/// How to lay out a [`Name`] in [`Name::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    /// `First von Last Jr`
    #[default]
    FirstLast,
    /// `von Last, Jr, First`
    LastFirst,
}

impl FromStr for NameStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first-last" => Ok(NameStyle::FirstLast),
            "last-first" => Ok(NameStyle::LastFirst),
            _ => Err(Error::syntax(ErrorCode::UnknownNameStyle(s.to_owned()))),
        }
    }
}

fn join(words: &[NameWord]) -> String {
    words
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The bounds `[i, j)` of the prefix run, where `i` is the first lowercase word and `j` one
/// past the last lowercase word before the final word.
fn prefix_bounds(words: &[NameWord]) -> Option<(usize, usize)> {
    let i = words.iter().position(NameWord::is_lowercase)?;
    let mut j = i + 1;
    for (k, word) in words.iter().enumerate().take(words.len() - 1).skip(i + 1) {
        if word.is_lowercase() {
            j = k + 1;
        }
    }

    // the last name is never empty
    if j >= words.len() {
        j = words.len() - 1;
    }
    Some((i, j))
}

/// Split the part before the first comma into the prefix and the last names.
fn split_prefix_last(words: &[NameWord]) -> (String, String) {
    match prefix_bounds(words) {
        Some((_, j)) => (join(&words[..j]), join(&words[j..])),
        None => (String::new(), join(words)),
    }
}

/// Initials of the given names: `Jean-Paul Marie` becomes `J.-P. M.`
fn abbreviate(first: &str) -> String {
    first
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .filter_map(|piece| piece.chars().next())
                .map(|ch| format!("{ch}."))
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Name {
    pub fn new(
        first: impl Into<String>,
        prefix: impl Into<String>,
        last: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            prefix: prefix.into(),
            last: last.into(),
            suffix: suffix.into(),
        }
    }

    /// Parse a single name.
    ///
    /// ```
    /// use bibkit::Name;
    ///
    /// let name = Name::parse("Jean de la Fontaine").unwrap();
    /// assert_eq!(name, Name::new("Jean", "de la", "Fontaine", ""));
    ///
    /// let name = Name::parse("Smith, Jr., John").unwrap();
    /// assert_eq!(name, Name::new("John", "", "Smith", "Jr."));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let lexed = lex_name(input)?;
        let mut parts = lexed.parts.into_iter();
        let head = parts.next().unwrap_or_default();

        if lexed.commas == 0 {
            return Ok(Self::from_words(&head));
        }

        let (prefix, last) = split_prefix_last(&head);
        let rest: Vec<String> = parts.map(|part| join(&part)).collect();
        let (suffix, first) = if lexed.commas == 1 {
            (String::new(), rest.first().cloned().unwrap_or_default())
        } else {
            (
                rest.first().cloned().unwrap_or_default(),
                rest.get(1).cloned().unwrap_or_default(),
            )
        };

        Ok(Self {
            first,
            prefix,
            last,
            suffix,
        })
    }

    /// The `First von Last` form.
    fn from_words(words: &[NameWord]) -> Self {
        match words {
            [] => Self::default(),
            [single] => Self::new("", "", single.text.clone(), ""),
            _ => match prefix_bounds(words) {
                Some((i, j)) if i < j => {
                    Self::new(join(&words[..i]), join(&words[i..j]), join(&words[j..]), "")
                }
                _ => {
                    let (first, last) = words.split_at(words.len() - 1);
                    Self::new(join(first), "", join(last), "")
                }
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
            && self.prefix.is_empty()
            && self.last.is_empty()
            && self.suffix.is_empty()
    }

    /// Render the name, optionally abbreviating the first names to initials.
    ///
    /// ```
    /// use bibkit::Name;
    /// use bibkit::name::NameStyle;
    ///
    /// let name = Name::parse("Jean-Paul de la Fontaine").unwrap();
    /// assert_eq!(name.format(NameStyle::FirstLast, true), "J.-P. de la Fontaine");
    /// assert_eq!(name.format(NameStyle::LastFirst, false), "de la Fontaine, Jean-Paul");
    /// ```
    pub fn format(&self, style: NameStyle, initials: bool) -> String {
        let first = if initials {
            abbreviate(&self.first)
        } else {
            self.first.clone()
        };

        match style {
            NameStyle::FirstLast => [
                first.as_str(),
                self.prefix.as_str(),
                self.last.as_str(),
                self.suffix.as_str(),
            ]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            NameStyle::LastFirst => {
                let mut out = [self.prefix.as_str(), self.last.as_str()]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                for part in [self.suffix.as_str(), first.as_str()] {
                    if !part.is_empty() {
                        out.push_str(", ");
                        out.push_str(part);
                    }
                }
                out
            }
        }
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(NameStyle::FirstLast, false))
    }
}
