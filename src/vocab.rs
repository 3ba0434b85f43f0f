//! # Reference formats
//!
//! A [`Dialect`] decides which entry types and field names the parser accepts.
//!
//! | Dialect    | Entry types                                | Fields                          |
//! |------------|--------------------------------------------|---------------------------------|
//! | `bibtex`   | the BibTeX types                           | the BibTeX fields               |
//! | `biblatex` | the BibLaTeX types, including type aliases | the BibLaTeX data and special fields |
//! | `mixed`    | either                                     | either                          |
//! | `relaxed`  | any word made of `\w`, `-`, `:` and `.`    | the same                        |
//!
//! All lookups are case-insensitive.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::error::{Error, ErrorCode};
use crate::token::is_relaxed_name;

mod tables;

pub use tables::*;

/// A reference format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Bibtex,
    Biblatex,
    Mixed,
    #[default]
    Relaxed,
}

#[inline]
fn contains(table: &[&str], name: &str) -> bool {
    let name = UniCase::unicode(name);
    table.iter().any(|known| UniCase::ascii(*known) == name)
}

fn is_bibtex_entry_type(name: &str) -> bool {
    contains(BASE_ENTRY_TYPES, name) || contains(BIBTEX_ENTRY_TYPES, name)
}

fn is_biblatex_entry_type(name: &str) -> bool {
    contains(BASE_ENTRY_TYPES, name)
        || contains(BIBLATEX_ENTRY_TYPES, name)
        || contains(BIBLATEX_UNSUPPORTED_ENTRY_TYPES, name)
        || BIBLATEX_ENTRY_TYPE_ALIASES
            .iter()
            .any(|(_, aliases)| contains(aliases, name))
}

fn is_bibtex_field(name: &str) -> bool {
    contains(BASE_FIELDS, name) || contains(BIBTEX_FIELDS, name)
}

fn is_biblatex_field(name: &str) -> bool {
    contains(BASE_FIELDS, name)
        || contains(BIBLATEX_FIELDS, name)
        || contains(BIBLATEX_SPECIAL_FIELDS, name)
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::Bibtex,
        Dialect::Biblatex,
        Dialect::Mixed,
        Dialect::Relaxed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Bibtex => "bibtex",
            Dialect::Biblatex => "biblatex",
            Dialect::Mixed => "mixed",
            Dialect::Relaxed => "relaxed",
        }
    }

    /// Check if an entry type is legal in this dialect.
    pub fn is_entry_type(self, name: &str) -> bool {
        match self {
            Dialect::Bibtex => is_bibtex_entry_type(name),
            Dialect::Biblatex => is_biblatex_entry_type(name),
            Dialect::Mixed => is_bibtex_entry_type(name) || is_biblatex_entry_type(name),
            Dialect::Relaxed => is_relaxed_name(name),
        }
    }

    /// Check if a field name is legal in this dialect.
    pub fn is_field(self, name: &str) -> bool {
        match self {
            Dialect::Bibtex => is_bibtex_field(name),
            Dialect::Biblatex => is_biblatex_field(name),
            Dialect::Mixed => is_bibtex_field(name) || is_biblatex_field(name),
            Dialect::Relaxed => is_relaxed_name(name),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| s.eq_ignore_ascii_case(d.as_str()))
            .ok_or_else(|| Error::syntax(ErrorCode::UnknownDialect(s.to_owned())))
    }
}

/// Check if a field belongs to the BibTeX or BibLaTeX vocabulary.
pub fn is_known_field(name: &str) -> bool {
    is_bibtex_field(name) || is_biblatex_field(name)
}

/// The aliases of an entry type. Only BibLaTeX has aliases.
///
/// ```
/// use bibkit::Dialect;
/// use bibkit::vocab::aliases;
///
/// assert_eq!(aliases("online", Dialect::Biblatex), ["electronic", "www"]);
/// assert!(aliases("online", Dialect::Bibtex).is_empty());
/// ```
pub fn aliases(entry_type: &str, dialect: Dialect) -> &'static [&'static str] {
    if dialect != Dialect::Biblatex {
        return &[];
    }

    let entry_type = UniCase::unicode(entry_type);
    BIBLATEX_ENTRY_TYPE_ALIASES
        .iter()
        .find(|(canonical, _)| UniCase::ascii(*canonical) == entry_type)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// The BibLaTeX entry type aliased by `entry_type`, if any.
pub fn aliased_type(entry_type: &str) -> Option<&'static str> {
    BIBLATEX_ENTRY_TYPE_ALIASES
        .iter()
        .find(|(_, aliases)| contains(aliases, entry_type))
        .map(|(canonical, _)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_types() {
        assert!(Dialect::Bibtex.is_entry_type("Article"));
        assert!(Dialect::Bibtex.is_entry_type("phdthesis"));
        assert!(!Dialect::Bibtex.is_entry_type("online"));
        assert!(Dialect::Biblatex.is_entry_type("online"));
        assert!(Dialect::Biblatex.is_entry_type("www"));
        assert!(Dialect::Biblatex.is_entry_type("phdthesis"));
        assert!(Dialect::Biblatex.is_entry_type("software"));
        assert!(!Dialect::Biblatex.is_entry_type("unknown"));
        assert!(Dialect::Mixed.is_entry_type("techreport"));
        assert!(Dialect::Mixed.is_entry_type("mvbook"));
        assert!(Dialect::Relaxed.is_entry_type("anything-goes"));
        assert!(!Dialect::Relaxed.is_entry_type("entry!"));
    }

    #[test]
    fn test_fields() {
        assert!(!Dialect::Bibtex.is_field("journaltitle"));
        assert!(Dialect::Biblatex.is_field("JournalTitle"));
        assert!(Dialect::Bibtex.is_field("journal"));
        assert!(!Dialect::Biblatex.is_field("journal"));
        assert!(Dialect::Mixed.is_field("journal"));
        assert!(Dialect::Mixed.is_field("journaltitle"));
        assert!(Dialect::Relaxed.is_field("x-custom"));
        assert!(is_known_field("xdata"));
        assert!(!is_known_field("x-custom"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("BibLaTeX".parse::<Dialect>().unwrap(), Dialect::Biblatex);
        assert_eq!("relaxed".parse::<Dialect>().unwrap(), Dialect::Relaxed);
        assert_eq!(
            "apa".parse::<Dialect>().unwrap_err().code(),
            &ErrorCode::UnknownDialect("apa".into())
        );
        assert_eq!(Dialect::Mixed.to_string(), "mixed");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(aliases("thesis", Dialect::Biblatex), ["masterthesis", "phdthesis"]);
        assert!(aliases("article", Dialect::Biblatex).is_empty());
        assert_eq!(aliased_type("PhdThesis"), Some("thesis"));
        assert_eq!(aliased_type("article"), None);
    }
}
