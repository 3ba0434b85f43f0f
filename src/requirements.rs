//! # Required fields
//! BibTeX and BibLaTeX styles expect some fields for each entry type, for example an
//! `@article` needs an `author`, a `title`, a `journaltitle` and either a `year` or a `date`
//! in BibLaTeX. These requirements are guidelines rather than rules, so [`check`] and
//! [`collect`] report what is missing instead of failing. Use [`Entry::validate`] for an
//! error.
//!
//! The `relaxed` and `mixed` dialects have no requirements. Entry types without a table
//! entry have none either.
use crate::entry::Entry;
use crate::vocab::{Dialect, aliased_type};

const YEAR_OR_DATE: &[&str] = &["year", "date"];
const AUTHOR_OR_EDITOR: &[&str] = &["author", "editor"];
const CHAPTER_OR_PAGES: &[&str] = &["chapter", "pages"];

type FieldNames = &'static [&'static str];

/// `(entry type, required fields, groups of which one field is required)`.
type Requirements = &'static [(&'static str, FieldNames, &'static [FieldNames])];

static BIBTEX: Requirements = &[
    ("article", &["author", "title", "journal", "year"], &[]),
    ("book", &["title", "publisher", "year"], &[AUTHOR_OR_EDITOR]),
    ("booklet", &["title"], &[]),
    ("conference", &["author", "title", "booktitle", "year"], &[]),
    (
        "inbook",
        &["title", "publisher", "year"],
        &[AUTHOR_OR_EDITOR, CHAPTER_OR_PAGES],
    ),
    (
        "incollection",
        &["author", "title", "booktitle", "publisher", "year"],
        &[],
    ),
    ("inproceedings", &["author", "title", "booktitle", "year"], &[]),
    ("manual", &["title"], &[]),
    ("masterthesis", &["author", "title", "school", "year"], &[]),
    ("misc", &[], &[]),
    ("phdthesis", &["author", "title", "school", "year"], &[]),
    ("proceedings", &["title", "year"], &[]),
    ("techreport", &["author", "title", "institution", "year"], &[]),
    ("unpublished", &["author", "title", "note"], &[]),
];

static BIBLATEX: Requirements = &[
    ("article", &["author", "title", "journaltitle"], &[YEAR_OR_DATE]),
    ("book", &["author", "title"], &[YEAR_OR_DATE]),
    ("mvbook", &["author", "title"], &[YEAR_OR_DATE]),
    ("booklet", &["title"], &[AUTHOR_OR_EDITOR, YEAR_OR_DATE]),
    ("mvcollection", &["editor", "title"], &[YEAR_OR_DATE]),
    ("collection", &["editor", "title"], &[YEAR_OR_DATE]),
    ("incollection", &["author", "title", "booktitle"], &[YEAR_OR_DATE]),
    ("manual", &["title"], &[AUTHOR_OR_EDITOR, YEAR_OR_DATE]),
    ("misc", &[], &[]),
    ("online", &["title", "url"], &[AUTHOR_OR_EDITOR, YEAR_OR_DATE]),
    ("patent", &["author", "title", "number"], &[YEAR_OR_DATE]),
    ("periodical", &["editor", "title"], &[YEAR_OR_DATE]),
    ("proceedings", &["title"], &[YEAR_OR_DATE]),
    ("inproceedings", &["author", "title", "booktitle"], &[YEAR_OR_DATE]),
    (
        "report",
        &["author", "title", "type", "institution"],
        &[YEAR_OR_DATE],
    ),
    ("set", &[], &[]),
    (
        "thesis",
        &["author", "title", "type", "institution"],
        &[YEAR_OR_DATE],
    ),
    ("unpublished", &["author", "title"], &[YEAR_OR_DATE]),
    ("xdata", &[], &[]),
];

/// The fields an entry lacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Missing {
    /// Required fields which are absent.
    pub required: Vec<&'static str>,
    /// Groups of fields of which none is present.
    pub either: Vec<&'static [&'static str]>,
}

impl Missing {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.either.is_empty()
    }
}

fn lookup(table: Requirements, bibtype: &str) -> Option<(FieldNames, &'static [FieldNames])> {
    table
        .iter()
        .find(|(name, _, _)| *name == bibtype)
        .map(|(_, required, either)| (*required, *either))
}

/// The fields `entry` lacks according to the requirements of `dialect`.
///
/// A BibLaTeX type alias such as `phdthesis` has the requirements of the type it aliases.
///
/// ```
/// use bibkit::{Dialect, Entry};
/// use bibkit::requirements::check;
///
/// let entry = Entry::new("book", "key").with("title", "T").with("date", "2000");
/// let missing = check(&entry, Dialect::Biblatex);
/// assert_eq!(missing.required, ["author"]);
/// assert!(missing.either.is_empty());
/// ```
pub fn check(entry: &Entry, dialect: Dialect) -> Missing {
    let requirements = match dialect {
        Dialect::Bibtex => lookup(BIBTEX, entry.bibtype()),
        Dialect::Biblatex => lookup(BIBLATEX, entry.bibtype()).or_else(|| {
            aliased_type(entry.bibtype()).and_then(|canonical| lookup(BIBLATEX, canonical))
        }),
        Dialect::Mixed | Dialect::Relaxed => None,
    };

    let Some((required, either)) = requirements else {
        return Missing::default();
    };

    Missing {
        required: required
            .iter()
            .copied()
            .filter(|field| !entry.contains(field))
            .collect(),
        either: either
            .iter()
            .copied()
            .filter(|group| !group.iter().any(|field| entry.contains(field)))
            .collect(),
    }
}

/// Every entry with missing fields, along with what it lacks.
pub fn collect(entries: &[Entry], dialect: Dialect) -> Vec<(&Entry, Missing)> {
    entries
        .iter()
        .map(|entry| (entry, check(entry, dialect)))
        .filter(|(_, missing)| !missing.is_empty())
        .collect()
}
