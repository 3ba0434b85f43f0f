//! # String variables
//! `@string` entries define variables which field values reference, either alone or through
//! `#`-concatenation:
//! ```bib
//! @string{mar = "March"}
//!
//! @misc{key,
//!   month = mar,
//!   note = mar # " Report",
//! }
//! ```
//! The parser keeps such values as [`Value::Concat`]. Use [`expand_strings`] to substitute
//! the variables and [`unexpand_strings`] to go back.
use std::collections::HashMap;

use memchr::memmem;
use tracing::debug;
use unicase::UniCase;

use crate::entry::{Entry, Piece, StringEntry, Value};
use crate::error::{Error, ErrorCode, Result};

/// Join the pieces of a concatenation, looking up bare pieces with `lookup`. A bare piece
/// which is not a variable stays as written.
pub(crate) fn resolve<'v, F>(pieces: &[Piece], lookup: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Braced(text) | Piece::Quoted(text) => out.push_str(text),
            Piece::Bare(name) => out.push_str(lookup(name).unwrap_or(name)),
        }
    }
    out
}

/// The variables defined more than once, compared case-insensitively.
fn duplicate_variables(strings: &[StringEntry]) -> Vec<String> {
    let mut counts: HashMap<UniCase<&str>, usize> = HashMap::new();
    for string in strings {
        *counts.entry(UniCase::new(string.variable.as_str())).or_default() += 1;
    }

    let mut duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(var, _)| var.into_inner().to_owned())
        .collect();
    duplicates.sort();
    duplicates
}

fn check_duplicates(strings: &[StringEntry], ignore_duplicates: bool) -> Result<()> {
    if ignore_duplicates {
        return Ok(());
    }
    let duplicates = duplicate_variables(strings);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(Error::syntax(ErrorCode::DuplicateVariable(duplicates)))
    }
}

/// Substitute string variables in every value which references them.
///
/// Braced and quoted pieces are taken literally and bare pieces are looked up among the
/// `strings`, case-insensitively. A bare piece which is not a variable stays as written.
/// Every expanded value becomes a [`Value::Str`].
/// With duplicate variables this fails with [`ErrorCode::DuplicateVariable`] unless
/// `ignore_duplicates` is set, in which case the last definition wins.
///
/// ```
/// use bibkit::{parse, Dialect};
/// use bibkit::expand::expand_strings;
///
/// let mut bib = parse(
///     r#"@string{mar = "March"}
///        @misc{key, month = mar, note = mar # " Report"}"#,
///     Dialect::Relaxed,
/// )
/// .unwrap();
/// expand_strings(&mut bib.entries, &bib.strings, false).unwrap();
/// assert_eq!(bib.entries[0].get_str("month"), Some("March"));
/// assert_eq!(bib.entries[0].get_str("note"), Some("March Report"));
/// ```
pub fn expand_strings(
    entries: &mut [Entry],
    strings: &[StringEntry],
    ignore_duplicates: bool,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    check_duplicates(strings, ignore_duplicates)?;

    let variables: HashMap<UniCase<&str>, &str> = strings
        .iter()
        .map(|s| (UniCase::new(s.variable.as_str()), s.value.as_str()))
        .collect();

    for entry in entries.iter_mut() {
        for (field, value) in entry.fields_mut() {
            let Value::Concat(pieces) = value else {
                continue;
            };

            let expanded = resolve(pieces, |name| variables.get(&UniCase::new(name)).copied());
            debug!(field, "expanded string variables");
            *value = Value::Str(expanded);
        }
    }

    Ok(())
}

/// Rewrite string values which contain the value of a string variable as concatenations.
///
/// Each occurrence of a variable value is replaced by the variable, and the remaining text
/// is quoted. Where several values match at the same position the longest is used. A value
/// which is exactly one variable value becomes that variable.
///
/// ```
/// use bibkit::Entry;
/// use bibkit::entry::{Piece, StringEntry, Value};
/// use bibkit::expand::unexpand_strings;
///
/// let mut entries = [Entry::new("misc", "key").with("note", "March Report")];
/// let strings = [StringEntry::new("mar", "March")];
/// unexpand_strings(&mut entries, &strings, false).unwrap();
/// assert_eq!(
///     entries[0].get("note"),
///     Some(&Value::Concat(vec![
///         Piece::Bare("mar".into()),
///         Piece::Quoted(" Report".into()),
///     ]))
/// );
/// ```
pub fn unexpand_strings(
    entries: &mut [Entry],
    strings: &[StringEntry],
    ignore_duplicates: bool,
) -> Result<()> {
    if entries.is_empty() || strings.is_empty() {
        return Ok(());
    }
    check_duplicates(strings, ignore_duplicates)?;

    let finders: Vec<(memmem::Finder<'_>, &str)> = strings
        .iter()
        .filter(|s| !s.value.is_empty())
        .map(|s| (memmem::Finder::new(s.value.as_bytes()), s.variable.as_str()))
        .collect();

    for entry in entries.iter_mut() {
        for (_, value) in entry.fields_mut() {
            let Value::Str(text) = value else {
                continue;
            };
            if let Some(pieces) = unexpand(text, &finders) {
                *value = Value::Concat(pieces);
            }
        }
    }

    Ok(())
}

/// The earliest, then longest, variable value occurring in `haystack`.
fn earliest_match<'a>(
    haystack: &str,
    finders: &[(memmem::Finder<'_>, &'a str)],
) -> Option<(usize, usize, &'a str)> {
    finders
        .iter()
        .filter_map(|(finder, variable)| {
            finder
                .find(haystack.as_bytes())
                .map(|start| (start, finder.needle().len(), *variable))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
}

fn unexpand(text: &str, finders: &[(memmem::Finder<'_>, &str)]) -> Option<Vec<Piece>> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some((start, len, variable)) = earliest_match(rest, finders) {
        if start > 0 {
            pieces.push(literal(&rest[..start]));
        }
        pieces.push(Piece::Bare(variable.to_owned()));
        rest = &rest[start + len..];
    }
    if pieces.is_empty() {
        return None;
    }
    if !rest.is_empty() {
        pieces.push(literal(rest));
    }
    Some(pieces)
}

/// Literal text, braced if it contains a `"`.
fn literal(text: &str) -> Piece {
    if text.contains('"') {
        Piece::Braced(text.to_owned())
    } else {
        Piece::Quoted(text.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(vars: &[(&str, &str)]) -> Vec<StringEntry> {
        vars.iter()
            .map(|(var, value)| StringEntry::new(var, value))
            .collect()
    }

    fn concat(pieces: &[Piece]) -> Value {
        Value::Concat(pieces.to_vec())
    }

    #[test]
    fn test_resolve() {
        let pieces = [
            Piece::Braced("a {b}".into()),
            Piece::Bare("VAR".into()),
            Piece::Bare("unknown".into()),
            Piece::Quoted("!".into()),
        ];
        let lookup = |name: &str| name.eq_ignore_ascii_case("var").then_some("less");
        assert_eq!(resolve(&pieces, lookup), "a {b}lessunknown!");
        assert_eq!(resolve(&[], lookup), "");
    }

    #[test]
    fn test_expand() {
        let mut entries = [
            Entry::new("misc", "a").with(
                "note",
                concat(&[
                    Piece::Quoted("Merci".into()),
                    Piece::Bare("VAR".into()),
                    Piece::Quoted(" Animals".into()),
                ]),
            ),
            Entry::new("misc", "b")
                .with(
                    "note",
                    concat(&[Piece::Bare("unknown".into()), Piece::Braced("!".into())]),
                )
                .with("title", "var")
                .with("journal", Value::variable("var")),
        ];
        expand_strings(&mut entries, &strings(&[("var", "less")]), false).unwrap();
        assert_eq!(entries[0].get_str("note"), Some("Merciless Animals"));
        assert_eq!(entries[1].get_str("note"), Some("unknown!"));
        assert_eq!(entries[1].get_str("title"), Some("var"));
        assert_eq!(entries[1].get_str("journal"), Some("less"));
    }

    #[test]
    fn test_expand_without_strings() {
        let mut entries = [Entry::new("misc", "key").with("publisher", Value::variable("aw"))];
        expand_strings(&mut entries, &[], false).unwrap();
        assert_eq!(entries[0].get_str("publisher"), Some("aw"));
    }

    #[test]
    fn test_duplicates() {
        let dup = strings(&[("a", "1"), ("A", "2"), ("b", "3")]);
        let note = concat(&[Piece::Bare("a".into()), Piece::Bare("b".into())]);
        let mut entries = [Entry::new("misc", "key").with("note", note.clone())];

        let err = expand_strings(&mut entries, &dup, false).unwrap_err();
        assert_eq!(err.code(), &ErrorCode::DuplicateVariable(vec!["a".into()]));
        assert_eq!(entries[0].get("note"), Some(&note));

        expand_strings(&mut entries, &dup, true).unwrap();
        assert_eq!(entries[0].get_str("note"), Some("23"));
    }

    #[test]
    fn test_unexpand() {
        let vars = strings(&[("var", "less"), ("mar", "March"), ("q", "say \"hi\"")]);
        let mut entries = [Entry::new("misc", "key")
            .with("title", "Merciless Animals")
            .with("note", "March")
            .with("abstract", "they say \"hi\"")
            .with("keywords", "nothing here")
            .with("year", Value::Int(2000))];
        unexpand_strings(&mut entries, &vars, false).unwrap();

        assert_eq!(
            entries[0].get("title"),
            Some(&concat(&[
                Piece::Quoted("Merci".into()),
                Piece::Bare("var".into()),
                Piece::Quoted(" Animals".into()),
            ]))
        );
        assert_eq!(entries[0].get("note"), Some(&Value::variable("mar")));
        assert_eq!(
            entries[0].get("abstract"),
            Some(&concat(&[Piece::Quoted("they ".into()), Piece::Bare("q".into())]))
        );
        assert_eq!(entries[0].get_str("keywords"), Some("nothing here"));
        assert_eq!(entries[0].get("year"), Some(&Value::Int(2000)));
    }

    #[test]
    fn test_unexpand_quote_literal() {
        let vars = strings(&[("mar", "March")]);
        let mut entries = [Entry::new("misc", "key").with("note", "March \"draft\"")];
        unexpand_strings(&mut entries, &vars, false).unwrap();
        assert_eq!(
            entries[0].get("note"),
            Some(&concat(&[
                Piece::Bare("mar".into()),
                Piece::Braced(" \"draft\"".into()),
            ]))
        );
    }

    #[test]
    fn test_longest_match() {
        let vars = strings(&[("short", "Mar"), ("long", "March")]);
        let mut entries = [Entry::new("misc", "key").with("note", "In March")];
        unexpand_strings(&mut entries, &vars, false).unwrap();
        assert_eq!(
            entries[0].get("note"),
            Some(&concat(&[Piece::Quoted("In ".into()), Piece::Bare("long".into())]))
        );
    }

    #[test]
    fn test_roundtrip() {
        let vars = strings(&[("mar", "March"), ("tcj", "The Computer Journal")]);
        let original = Entry::new("misc", "key")
            .with("note", "March Report")
            .with("journal", "The Computer Journal");
        let mut entries = [original.clone()];

        unexpand_strings(&mut entries, &vars, false).unwrap();
        assert_ne!(entries[0], original);
        expand_strings(&mut entries, &vars, false).unwrap();
        assert_eq!(entries[0], original);
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn unexpand_then_expand(s in "\\PC*") {
            let vars = strings(&[("mar", "March"), ("c", "C#"), ("q", "\"")]);
            let original = Entry::new("misc", "key").with("note", s.as_str());
            let mut entries = [original.clone()];
            unexpand_strings(&mut entries, &vars, false).unwrap();
            expand_strings(&mut entries, &vars, false).unwrap();
            prop_assert_eq!(&entries[0], &original);
        }
    }
}
