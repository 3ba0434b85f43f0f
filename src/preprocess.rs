//! # Preprocessing
//! The inverse of [`postprocess`](crate::postprocess::postprocess): every [`Value`] is
//! turned back into the string a bibliography file would hold, in a form which postprocesses
//! to the same value.
use crate::entry::{Entry, Value, written};
use crate::name::Name;
use crate::postprocess::{Fields, MONTHS, NAME_FIELDS};

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Brace each free-standing `and` outside of braces, so that a name list does not split there.
fn protect_and(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    let mut rest = name;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            'a' if depth == 0
                && rest.starts_with("and")
                && !out.chars().next_back().is_some_and(is_word_char)
                && !rest[3..].chars().next().is_some_and(is_word_char) =>
            {
                out.push_str("{and}");
                rest = &rest[3..];
                continue;
            }
            _ => {}
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

/// Brace a name component containing a comma.
fn protect_comma(part: &str) -> String {
    if part.contains(',') {
        format!("{{{part}}}")
    } else {
        part.to_owned()
    }
}

/// A string which [`Name::parse`] reads back as `name`.
fn name_to_string(name: &Name) -> String {
    let last = protect_comma(&name.last);
    let mut head = if name.prefix.is_empty() {
        last
    } else {
        format!("{} {last}", name.prefix)
    };

    if name.first.is_empty() && name.suffix.is_empty() {
        if !name.last.contains(char::is_whitespace) {
            return head;
        }
        head.push(',');
        return head;
    }

    if !name.suffix.is_empty() {
        head.push_str(", ");
        head.push_str(&protect_comma(&name.suffix));
    }
    head.push_str(", ");
    head.push_str(&protect_comma(&name.first));
    head
}

/// The month number of a full month name, as postprocessing writes it.
fn month_number(month: &str) -> Option<usize> {
    MONTHS
        .iter()
        .position(|(_, full)| full.eq_ignore_ascii_case(month))
        .map(|idx| idx + 1)
}

/// The string form of the value of `field`.
///
/// A month given by its full name is written as its number. A concatenation is written as
/// `piece # piece`, which only a serializer can place unsurrounded.
///
/// ```
/// use bibkit::entry::Value;
/// use bibkit::name::Name;
/// use bibkit::preprocess::preprocess_value;
///
/// assert_eq!(preprocess_value("pages", &Value::Pages(10, 20)), "10--20");
/// assert_eq!(preprocess_value("month", &Value::from("April")), "4");
/// assert_eq!(
///     preprocess_value(
///         "author",
///         &Value::Names(vec![
///             Name::new("John", "", "Smith", ""),
///             Name::new("", "", "Barnes and Noble", ""),
///         ])
///     ),
///     "Smith, John and Barnes {and} Noble,"
/// );
/// ```
pub fn preprocess_value(field: &str, value: &Value) -> String {
    match value {
        Value::Str(s) if field == "month" => month_number(s)
            .map(|n| n.to_string())
            .unwrap_or_else(|| s.clone()),
        Value::Str(s) => s.clone(),
        Value::Int(n) => n.to_string(),
        Value::Date(date) => date.to_string(),
        Value::Pages(start, end) => format!("{start}--{end}"),
        Value::List(list) if field == "keywords" => list.join(";"),
        Value::List(list) if NAME_FIELDS.contains(&field) => list
            .iter()
            .map(|name| protect_and(name))
            .collect::<Vec<_>>()
            .join(" and "),
        Value::List(list) => list.join(", "),
        Value::Names(names) => names
            .iter()
            .map(|name| protect_and(&name_to_string(name)))
            .collect::<Vec<_>>()
            .join(" and "),
        Value::Concat(pieces) => written(pieces),
    }
}

/// The string forms of the selected fields of an entry, in field order.
pub fn preprocess(entry: &Entry, fields: Fields<'_>) -> Vec<(String, String)> {
    let selected = |name: &str| match fields {
        Fields::All => true,
        Fields::Only(only) => only.iter().any(|f| f.eq_ignore_ascii_case(name)),
        Fields::None => false,
    };

    entry
        .fields()
        .filter(|(name, _)| selected(name))
        .map(|(name, value)| (name.to_owned(), preprocess_value(name, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateRange;
    use crate::postprocess::{PostprocessOptions, postprocess};

    #[test]
    fn test_protect_and() {
        assert_eq!(protect_and("Barnes and Noble"), "Barnes {and} Noble");
        assert_eq!(protect_and("{Barnes and Noble}"), "{Barnes and Noble}");
        assert_eq!(protect_and("Sandy Anderson"), "Sandy Anderson");
        assert_eq!(protect_and("and"), "{and}");
        assert_eq!(protect_and("Band and"), "Band {and}");
    }

    #[test]
    fn test_names() {
        let render = |first: &str, prefix: &str, last: &str, suffix: &str| {
            name_to_string(&Name::new(first, prefix, last, suffix))
        };
        assert_eq!(render("Jean", "de la", "Fontaine", ""), "de la Fontaine, Jean");
        assert_eq!(render("John", "", "Smith", "Jr."), "Smith, Jr., John");
        assert_eq!(render("", "", "Plato", ""), "Plato");
        assert_eq!(render("", "van", "Gogh", ""), "van Gogh");
        assert_eq!(render("", "", "Vall\\'ee Poussin", ""), "Vall\\'ee Poussin,");
        assert_eq!(render("A.", "", "Smith, Jones", ""), "{Smith, Jones}, A.");

        for name in [
            Name::new("Jean", "de la", "Fontaine", ""),
            Name::new("John", "", "Smith", "Jr."),
            Name::new("", "", "Vall\\'ee Poussin", ""),
            Name::new("", "van", "Gogh", ""),
        ] {
            assert_eq!(Name::parse(&name_to_string(&name)).unwrap(), name);
        }
    }

    #[test]
    fn test_values() {
        assert_eq!(preprocess_value("year", &Value::Int(2000)), "2000");
        assert_eq!(
            preprocess_value("date", &Value::Date(DateRange::parse("1997/").unwrap())),
            "1997/"
        );
        assert_eq!(
            preprocess_value("keywords", &Value::List(vec!["a".into(), "b".into()])),
            "a;b"
        );
        assert_eq!(
            preprocess_value("xdata", &Value::List(vec!["a".into(), "b".into()])),
            "a, b"
        );
        assert_eq!(
            preprocess_value(
                "institution",
                &Value::List(vec!["MIT".into(), "Smith and Sons".into()])
            ),
            "MIT and Smith {and} Sons"
        );
        assert_eq!(preprocess_value("month", &Value::from("Spring")), "Spring");
        assert_eq!(preprocess_value("month", &Value::from("may")), "5");
        assert_eq!(preprocess_value("title", &Value::from("January")), "January");
        assert_eq!(preprocess_value("month", &Value::variable("jan")), "jan");
    }

    #[test]
    fn test_roundtrip() {
        let raw = Entry::new("book", "key")
            .with("year", "2000")
            .with("month", "12")
            .with("date", "2000-12-01")
            .with("pages", "3--7")
            .with("keywords", "x;y")
            .with("author", "de la Fontaine, Jean and Barnes {and} Noble, Inc.")
            .with("publisher", "Smith {and} Sons")
            .with("location", "Paris and London");
        let options = PostprocessOptions::default();

        let mut processed = raw.clone();
        postprocess(&mut processed, Fields::All, &options);

        let mut reread = Entry::new("book", "key");
        for (field, value) in preprocess(&processed, Fields::All) {
            reread.set(&field, value);
        }
        postprocess(&mut reread, Fields::All, &options);
        assert_eq!(reread, processed);
    }

    #[test]
    fn test_selection() {
        let entry = Entry::new("misc", "key")
            .with("year", Value::Int(2000))
            .with("title", "T");
        assert_eq!(
            preprocess(&entry, Fields::Only(&["YEAR"])),
            [("year".to_owned(), "2000".to_owned())]
        );
        assert!(preprocess(&entry, Fields::None).is_empty());
    }
}
