//! Static field and entry type tables.

/// Fields common to BibTeX and BibLaTeX.
pub static BASE_FIELDS: &[&str] = &[
    "author",
    "booktitle",
    "edition",
    "editor",
    "howpublished",
    "institution",
    "month",
    "note",
    "number",
    "organization",
    "pages",
    "publisher",
    "series",
    "title",
    "type",
    "volume",
    "year",
];

/// Fields only in BibTeX. BibLaTeX accepts most of these as aliases, but they are not part of
/// its vocabulary proper.
pub static BIBTEX_FIELDS: &[&str] = &[
    "address",
    "annote",
    "chapter",
    "crossref",
    "journal",
    "key",
    "pdf",
    "primaryclass",
    "school",
];

/// Data fields only in BibLaTeX.
pub static BIBLATEX_FIELDS: &[&str] = &[
    "abstract",
    "addendum",
    "afterword",
    "annotation",
    "annotator",
    "authortype",
    "bookauthor",
    "bookpagination",
    "booksubtitle",
    "booktitleaddon",
    "chapter",
    "commentator",
    "date",
    "doi",
    "editora",
    "editoratype",
    "editorb",
    "editorbtype",
    "editorc",
    "editorctype",
    "editortype",
    "eid",
    "entrysubtype",
    "eprint",
    "eprintclass",
    "eprinttype",
    "eventdate",
    "eventtitle",
    "eventtitleaddon",
    "file",
    "foreword",
    "holder",
    "indextitle",
    "introduction",
    "isan",
    "isbn",
    "isnm",
    "isrn",
    "issn",
    "issue",
    "issuesubtitle",
    "issuetitle",
    "iswc",
    "journalsubtitle",
    "journaltitle",
    "label",
    "language",
    "library",
    "location",
    "mainsubtitle",
    "maintitle",
    "maintitleaddon",
    "nameaddon",
    "origdate",
    "origlanguage",
    "origlocation",
    "origpublisher",
    "origtitle",
    "pagetotal",
    "pagination",
    "part",
    "pubstate",
    "reprinttitle",
    "shortauthor",
    "shorteditor",
    "shorthand",
    "shorthandintro",
    "shortjournal",
    "shortseries",
    "shorttitle",
    "subtitle",
    "titleaddon",
    "translator",
    "url",
    "urldate",
    "venue",
    "version",
    "volumes",
];

/// Special fields only in BibLaTeX.
pub static BIBLATEX_SPECIAL_FIELDS: &[&str] = &[
    "crossref",
    "entryset",
    "execute",
    "gender",
    "ids",
    "indexsorttitle",
    "keywords",
    "langid",
    "langidopts",
    "options",
    "presort",
    "related",
    "relatedoptions",
    "relatedstring",
    "relatedtype",
    "sortkey",
    "sortname",
    "sortshorthand",
    "sorttitle",
    "sortyear",
    "xdata",
    "xref",
];

/// Entry types common to BibTeX and BibLaTeX.
pub static BASE_ENTRY_TYPES: &[&str] = &[
    "article",
    "book",
    "booklet",
    "inbook",
    "incollection",
    "inproceedings",
    "manual",
    "misc",
    "proceedings",
    "unpublished",
];

pub static BIBTEX_ENTRY_TYPES: &[&str] = &["conference", "masterthesis", "phdthesis", "techreport"];

pub static BIBLATEX_ENTRY_TYPES: &[&str] = &[
    "bookinbook",
    "booklet",
    "collection",
    "inference",
    "mvbook",
    "mvcollection",
    "mvproceedings",
    "mvreference",
    "online",
    "patent",
    "periodical",
    "reference",
    "report",
    "set",
    "suppbook",
    "suppcollection",
    "suppperiodical",
    "thesis",
    "xdata",
];

/// Entry types which BibLaTeX recognizes but its standard styles do not support.
pub static BIBLATEX_UNSUPPORTED_ENTRY_TYPES: &[&str] = &[
    "artwork",
    "audio",
    "bibnote",
    "commentary",
    "image",
    "juristiction",
    "legal",
    "legislation",
    "letter",
    "movie",
    "music",
    "performance",
    "review",
    "software",
    "standard",
    "video",
];

/// BibLaTeX entry types and the types which alias them.
pub static BIBLATEX_ENTRY_TYPE_ALIASES: &[(&str, &[&str])] = &[
    ("inproceedings", &["conference"]),
    ("online", &["electronic", "www"]),
    ("report", &["techreport"]),
    ("thesis", &["masterthesis", "phdthesis"]),
];
