//! # Postprocessing
//! The parser stores every field as a string. Postprocessing converts the values of known
//! fields to typed [`Value`]s:
//!
//! | Field | Conversion |
//! |-------|------------|
//! | `year`, `edition`, `number`, `pagetotal`, `volume` | [`Value::Int`] |
//! | `month` | the full month name, from `1` to `12` or `jan` to `dec` |
//! | `date`, `eventdate`, `origdate`, `urldate` | [`Value::Date`] |
//! | `pages` | [`Value::Pages`] from `start--end` |
//! | `keywords` | [`Value::List`], split on `;` |
//! | `xdata`, `related` | [`Value::List`], split on `,` |
//! | name fields such as `author` and `publisher` | [`Value::Names`] or [`Value::List`], split on `and` |
//!
//! A conversion which fails leaves the value unchanged. Only string values are converted, so
//! postprocessing an entry twice has no further effect.
use memchr::memchr;
use tracing::debug;

use crate::date::DateRange;
use crate::entry::{Entry, Value};
use crate::error::Result;
use crate::lex::NameList;
use crate::name::Name;

pub(crate) static INT_FIELDS: &[&str] = &["year", "edition", "number", "pagetotal", "volume"];

pub(crate) static DATE_FIELDS: &[&str] = &["date", "eventdate", "origdate", "urldate"];

/// Fields holding a list of names.
pub static NAME_FIELDS: &[&str] = &[
    "address",
    "afterword",
    "annotator",
    "author",
    "bookauthor",
    "commentator",
    "editor",
    "editora",
    "editorb",
    "editorc",
    "foreword",
    "holder",
    "institution",
    "introduction",
    "language",
    "location",
    "organization",
    "origlocation",
    "origpublisher",
    "publisher",
    "school",
    "shortauthor",
    "shorteditor",
    "translator",
];

/// Name fields whose names are split into [`Name`]s by default.
pub static SPLIT_NAME_FIELDS: &[&str] = &[
    "author",
    "afterword",
    "bookauthor",
    "commentator",
    "editor",
    "editora",
    "editorb",
    "editorc",
    "foreword",
    "holder",
    "introduction",
    "language",
    "origpublisher",
    "publisher",
    "shortauthor",
    "shorteditor",
    "translator",
];

/// Abbreviated and full month names.
pub static MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Which fields of an entry to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fields<'a> {
    All,
    Only(&'a [&'a str]),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostprocessOptions {
    /// Strip braces from values which remain strings.
    pub remove_braces: bool,
    /// Name fields converted to [`Value::Names`]. Other name fields become [`Value::List`].
    pub split_names: Vec<String>,
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self {
            remove_braces: false,
            split_names: SPLIT_NAME_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
        }
    }
}

impl PostprocessOptions {
    pub fn remove_braces(mut self, remove: bool) -> Self {
        self.remove_braces = remove;
        self
    }

    pub fn split_names<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split_names = fields.into_iter().map(Into::into).collect();
        self
    }

    fn splits(&self, field: &str) -> bool {
        self.split_names.iter().any(|f| f.eq_ignore_ascii_case(field))
    }
}

/// The full month name for a month number or a three letter abbreviation.
///
/// ```
/// use bibkit::postprocess::month_name;
///
/// assert_eq!(month_name("4"), Some("April"));
/// assert_eq!(month_name("Dec"), Some("December"));
/// assert_eq!(month_name("13"), None);
/// ```
pub fn month_name(month: &str) -> Option<&'static str> {
    let month = month.trim();
    if let Ok(n) = month.parse::<usize>() {
        return (1..=12).contains(&n).then(|| MONTHS[n - 1].1);
    }

    MONTHS
        .iter()
        .find(|(abbrev, _)| abbrev.eq_ignore_ascii_case(month))
        .map(|(_, full)| *full)
}

/// Remove unescaped braces.
///
/// ```
/// use bibkit::postprocess::remove_braces;
///
/// assert_eq!(remove_braces("{The} {{LaTeX}} \\{Companion\\}"), "The LaTeX \\{Companion\\}");
/// ```
pub fn remove_braces(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        match ch {
            '{' | '}' if !escaped => {}
            _ => out.push(ch),
        }
        escaped = ch == '\\' && !escaped;
    }
    out
}

fn split_list(value: &str, sep: char) -> Vec<String> {
    value
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// `start--end`, with any run of dashes between the page numbers.
fn parse_pages(value: &str) -> Option<(i64, i64)> {
    let start = memchr(b'-', value.as_bytes())?;
    let end = start + value[start..].bytes().take_while(|b| *b == b'-').count();
    let (first, last) = (&value[..start], &value[end..]);
    if last.contains('-') {
        return None;
    }
    Some((first.trim().parse().ok()?, last.trim().parse().ok()?))
}

fn split_names(value: &str, field: &str, options: &PostprocessOptions) -> Result<Value> {
    let names = NameList::new(value).collect::<Result<Vec<&str>>>()?;

    if options.splits(field) {
        let names = names
            .into_iter()
            .map(Name::parse)
            .collect::<Result<Vec<Name>>>()?;
        Ok(Value::Names(names))
    } else if options.remove_braces {
        Ok(Value::List(names.into_iter().map(remove_braces).collect()))
    } else {
        Ok(Value::List(names.into_iter().map(str::to_owned).collect()))
    }
}

/// The typed value of a field, or `None` if it stays as it is.
fn convert(field: &str, value: &str, options: &PostprocessOptions) -> Option<Value> {
    let converted = match field {
        _ if INT_FIELDS.contains(&field) => value.trim().parse().ok().map(Value::Int),
        "month" => month_name(value).map(Value::from),
        _ if DATE_FIELDS.contains(&field) => match DateRange::parse(value) {
            Ok(date) => Some(Value::Date(date)),
            Err(err) => {
                debug!(field, value, %err, "date left unchanged");
                None
            }
        },
        "pages" => parse_pages(value).map(Value::from),
        "keywords" => Some(Value::List(split_list(value, ';'))),
        "xdata" | "related" => Some(Value::List(split_list(value, ','))),
        _ if NAME_FIELDS.contains(&field) => match split_names(value, field, options) {
            Ok(names) => Some(names),
            Err(err) => {
                debug!(field, value, %err, "names left unchanged");
                None
            }
        },
        _ => None,
    };

    converted.filter(|v| !v.is_empty())
}

/// Convert the selected string fields of an entry in place.
///
/// Braces are removed after conversion, and only from values which are not converted, so
/// that braces still protect their contents while a value is split: the publisher
/// `{Barnes and Noble}` stays a single name. Values which are not strings, including
/// unexpanded concatenations, are left alone.
///
/// ```
/// use bibkit::entry::{Entry, Value};
/// use bibkit::postprocess::{postprocess, Fields, PostprocessOptions};
///
/// let mut entry = Entry::new("article", "key")
///     .with("year", " 2001 ")
///     .with("pages", "10--20")
///     .with("keywords", "a; b;")
///     .with("author", "Smith, John and Jane Doe");
/// postprocess(&mut entry, Fields::All, &PostprocessOptions::default());
///
/// assert_eq!(entry.get("year"), Some(&Value::Int(2001)));
/// assert_eq!(entry.get("pages"), Some(&Value::Pages(10, 20)));
/// assert_eq!(entry.get("keywords"), Some(&Value::List(vec!["a".into(), "b".into()])));
/// assert_eq!(entry.get("author").and_then(Value::as_names).map(|n| n.len()), Some(2));
/// ```
pub fn postprocess(entry: &mut Entry, fields: Fields<'_>, options: &PostprocessOptions) {
    let selected: Vec<String> = match fields {
        Fields::All => entry.keys().map(str::to_owned).collect(),
        Fields::Only(fields) => fields.iter().map(|f| f.to_lowercase()).collect(),
        Fields::None => return,
    };

    for field in selected {
        let Some(value) = entry.get_str(&field) else {
            continue;
        };

        if let Some(converted) = convert(&field, value, options) {
            entry.set(&field, converted);
        } else if options.remove_braces {
            let stripped = remove_braces(value);
            if !stripped.is_empty() && stripped != value {
                entry.set(&field, stripped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::PartialDate;

    fn process(field: &str, value: &str) -> Option<Value> {
        let mut entry = Entry::new("misc", "key").with(field, value);
        postprocess(&mut entry, Fields::All, &PostprocessOptions::default());
        entry.get(field).cloned()
    }

    #[test]
    fn test_integers() {
        assert_eq!(process("year", "2001"), Some(Value::Int(2001)));
        assert_eq!(process("volume", " 12 "), Some(Value::Int(12)));
        assert_eq!(process("edition", "2nd"), Some(Value::from("2nd")));
    }

    #[test]
    fn test_month() {
        assert_eq!(process("month", "4"), Some(Value::from("April")));
        assert_eq!(process("month", "SEP"), Some(Value::from("September")));
        assert_eq!(process("month", "0"), Some(Value::from("0")));
        assert_eq!(process("month", "Spring"), Some(Value::from("Spring")));
        assert_eq!(process("month", "March"), Some(Value::from("March")));
    }

    #[test]
    fn test_dates() {
        let start = PartialDate::new(Some(1988), Some(1), Some(12)).unwrap();
        let end = PartialDate::new(Some(2016), Some(12), Some(31)).unwrap();
        assert_eq!(
            process("date", "1988-01-12/2016-12-31"),
            Some(Value::Date(DateRange::new(start, end, false)))
        );
        assert_eq!(process("urldate", "20-20"), Some(Value::from("20-20")));
        assert_eq!(process("origdate", "2016-31-12"), Some(Value::from("2016-31-12")));
    }

    #[test]
    fn test_pages() {
        assert_eq!(process("pages", "10--20"), Some(Value::Pages(10, 20)));
        assert_eq!(process("pages", "10 - 20"), Some(Value::Pages(10, 20)));
        assert_eq!(process("pages", "10"), Some(Value::from("10")));
        assert_eq!(process("pages", "10-20-30"), Some(Value::from("10-20-30")));
        assert_eq!(process("pages", "x--20"), Some(Value::from("x--20")));
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            process("keywords", "rust; parsing ;;"),
            Some(Value::List(vec!["rust".into(), "parsing".into()]))
        );
        assert_eq!(
            process("xdata", "a, b"),
            Some(Value::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(process("keywords", " ; "), Some(Value::from(" ; ")));
    }

    #[test]
    fn test_names() {
        assert_eq!(
            process("author", "Smith, John and {Barnes and Noble}"),
            Some(Value::Names(vec![
                Name::new("John", "", "Smith", ""),
                Name::new("", "", "Barnes and Noble", ""),
            ]))
        );
        assert_eq!(
            process("institution", "MIT and {ETH} Z{\\\"u}rich"),
            Some(Value::List(vec!["MIT".into(), "{ETH} Z{\\\"u}rich".into()]))
        );
        // unbalanced braces leave the value alone
        assert_eq!(process("author", "A} and B"), Some(Value::from("A} and B")));
    }

    #[test]
    fn test_options() {
        let mut entry = Entry::new("misc", "key")
            .with("title", "{The} {LaTeX} Companion")
            .with("institution", "{ETH} Zurich")
            .with("author", "A. Smith");
        let options = PostprocessOptions::default()
            .remove_braces(true)
            .split_names(["editor"]);
        postprocess(&mut entry, Fields::Only(&["Title", "institution", "author"]), &options);

        assert_eq!(entry.get_str("title"), Some("The LaTeX Companion"));
        assert_eq!(
            entry.get("institution"),
            Some(&Value::List(vec!["ETH Zurich".into()]))
        );
        assert_eq!(
            entry.get("author"),
            Some(&Value::List(vec!["A. Smith".into()]))
        );
    }

    #[test]
    fn test_selection() {
        let mut entry = Entry::new("misc", "key").with("year", "2000").with("volume", "1");
        postprocess(&mut entry, Fields::None, &PostprocessOptions::default());
        assert_eq!(entry.get_str("year"), Some("2000"));

        postprocess(&mut entry, Fields::Only(&["year"]), &PostprocessOptions::default());
        assert_eq!(entry.get("year"), Some(&Value::Int(2000)));
        assert_eq!(entry.get_str("volume"), Some("1"));
    }

    #[test]
    fn test_idempotent() {
        let mut entry = Entry::new("article", "key")
            .with("year", "2000")
            .with("month", "feb")
            .with("date", "1997/")
            .with("pages", "1--5")
            .with("keywords", "a;b")
            .with("author", "de la Fontaine, Jean")
            .with("title", "{T}");
        let options = PostprocessOptions::default().remove_braces(true);
        postprocess(&mut entry, Fields::All, &options);
        let once = entry.clone();
        postprocess(&mut entry, Fields::All, &options);
        assert_eq!(entry, once);
    }
}
