//! Field mappings from a crossreferenced entry (the source) to the entry referencing it (the
//! target). A `None` target field means that the source field is not inherited.

/// Pairs of `(source field, target field)`.
pub type FieldMap = &'static [(&'static str, Option<&'static str>)];

const BOOK_COMMON: FieldMap = &[
    ("title", Some("booktitle")),
    ("subtitle", Some("booksubtitle")),
    ("titleaddon", Some("booktitleaddon")),
    ("shorttitle", None),
    ("sorttitle", None),
    ("indextitle", None),
    ("indexsorttitle", None),
];

const MAIN_COMMON: FieldMap = &[
    ("title", Some("maintitle")),
    ("subtitle", Some("mainsubtitle")),
    ("titleaddon", Some("maintitleaddon")),
    ("shorttitle", None),
    ("sorttitle", None),
    ("indextitle", None),
    ("indexsorttitle", None),
];

const BOOK_AUTHOR: FieldMap = &[("author", Some("author")), ("author", Some("bookauthor"))];

const MAIN_TITLE: FieldMap = &[("title", Some("maintitle"))];

const REFERENCE: FieldMap = &[
    ("subtitle", Some("mainsubtitle")),
    ("titleaddon", Some("maintitleaddon")),
    ("shorttitle", None),
    ("sorttitle", None),
    ("indextitle", None),
    ("indexsorttitle", None),
];

const PERIODICAL: FieldMap = &[
    ("title", Some("journaltitle")),
    ("subtitle", Some("journalsubtitle")),
    ("shorttitle", None),
    ("sorttitle", None),
    ("indextitle", None),
    ("indexsorttitle", None),
];

/// Administrative fields inherited under their own name by every pair of entry types.
pub static DEFAULT_MAPPING: FieldMap = &[
    ("ids", Some("ids")),
    ("crossref", Some("crossref")),
    ("xref", Some("xref")),
    ("entryset", Some("entryset")),
    ("entrysubtype", Some("entrysubtype")),
    ("execute", Some("execute")),
    ("label", Some("label")),
    ("options", Some("options")),
    ("presort", Some("presort")),
    ("related", Some("related")),
    ("relatedoptions", Some("relatedoptions")),
    ("relatedstring", Some("relatedstring")),
    ("relatedtype", Some("relatedtype")),
    ("shorthand", Some("shorthand")),
    ("shorthandintro", Some("shorthandintro")),
    ("sortkey", Some("sortkey")),
];

/// `(target type, source type, mappings)`.
pub static MAPPINGS: &[(&str, &str, &[FieldMap])] = &[
    ("mvbook", "inbook", &[BOOK_AUTHOR, MAIN_COMMON]),
    ("mvcollection", "collection", &[MAIN_TITLE]),
    ("inbook", "book", &[BOOK_COMMON]),
    ("inbook", "mvbook", &[BOOK_AUTHOR, MAIN_COMMON]),
    ("bookinbook", "book", &[BOOK_COMMON]),
    ("bookinbook", "mvbook", &[BOOK_AUTHOR, MAIN_COMMON]),
    ("suppbook", "book", &[BOOK_COMMON]),
    ("suppbook", "mvbook", &[BOOK_AUTHOR, MAIN_COMMON]),
    ("book", "mvbook", &[MAIN_COMMON]),
    ("collection", "mvcollection", &[MAIN_TITLE]),
    ("suppcollection", "reference", &[REFERENCE]),
    ("inproceedings", "proceedings", &[BOOK_COMMON]),
    ("article", "periodical", &[PERIODICAL]),
    ("suppperiodical", "periodical", &[PERIODICAL]),
];

/// The field mapping from a `source` entry type to a `target` entry type, followed by the
/// default mapping.
pub fn mapping(
    target: &str,
    source: &str,
) -> impl Iterator<Item = &'static (&'static str, Option<&'static str>)> + use<> {
    let specific: &'static [FieldMap] = MAPPINGS
        .iter()
        .find(|(t, s, _)| *t == target && *s == source)
        .map(|(_, _, maps)| *maps)
        .unwrap_or(&[]);

    specific
        .iter()
        .flat_map(|map| map.iter())
        .chain(DEFAULT_MAPPING.iter())
}
