//! # Crossref and xdata inheritance
//! An entry with a `crossref` field inherits fields from the entry it references:
//! ```bib
//! @inbook{chapter,
//!   crossref = {book},
//!   title = {Chapter},
//! }
//! @book{book,
//!   title = {Book},
//! }
//! ```
//! Here `chapter` inherits `booktitle = {Book}`. Which source field lands in which target field
//! depends on the entry types of both entries, see [`mappings::MAPPINGS`]. Crossreferences
//! are resolved a single step: the fields which the source itself inherits are not passed on.
//!
//! An entry with an `xdata` field inherits every missing field of the referenced `@xdata`
//! entries, which may themselves reference further `@xdata` entries.
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::entry::{Entry, Value};
use crate::error::{Error, ErrorCode, Result};

pub mod mappings;

pub use mappings::mapping;

/// A per-pair override of the [`CrossrefOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossrefException {
    pub target: String,
    pub source: String,
    pub inherit: Option<bool>,
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossrefOptions {
    /// Inherit at all.
    pub inherit: bool,
    /// Replace fields the target already has.
    pub overwrite: bool,
    pub exceptions: Vec<CrossrefException>,
}

impl Default for CrossrefOptions {
    fn default() -> Self {
        Self {
            inherit: true,
            overwrite: false,
            exceptions: Vec::new(),
        }
    }
}

impl CrossrefOptions {
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Use different options for targets of type `target` referencing sources of type
    /// `source`.
    pub fn exception(
        mut self,
        target: &str,
        source: &str,
        inherit: Option<bool>,
        overwrite: Option<bool>,
    ) -> Self {
        self.exceptions.push(CrossrefException {
            target: target.to_lowercase(),
            source: source.to_lowercase(),
            inherit,
            overwrite,
        });
        self
    }

    /// The effective `overwrite` flag for a pair of entry types, or `None` if the pair does
    /// not inherit.
    fn resolve(&self, target: &str, source: &str) -> Option<bool> {
        let mut inherit = self.inherit;
        let mut overwrite = self.overwrite;

        if let Some(exception) = self
            .exceptions
            .iter()
            .find(|e| e.target == target && e.source == source)
        {
            inherit = exception.inherit.unwrap_or(inherit);
            overwrite = exception.overwrite.unwrap_or(overwrite);
        }

        inherit.then_some(overwrite)
    }
}

fn crossref(entry: &Entry) -> Option<&str> {
    entry.get_str("crossref").map(str::trim)
}

/// Copies of the entries referenced by a crossref. Of several entries with the same key, the
/// last one is used.
fn crossref_sources(entries: &[Entry]) -> HashMap<String, Entry> {
    let referenced: HashSet<&str> = entries.iter().filter_map(crossref).collect();

    entries
        .iter()
        .filter(|entry| referenced.contains(entry.bibkey()))
        .map(|entry| (entry.bibkey().to_owned(), entry.clone()))
        .collect()
}

fn for_each_crossref<F>(entries: &mut [Entry], options: &CrossrefOptions, mut apply: F)
where
    F: FnMut(&mut Entry, &Entry, bool),
{
    let sources = crossref_sources(entries);

    for target in entries.iter_mut() {
        let Some(key) = crossref(target) else {
            continue;
        };
        let Some(source) = sources.get(key) else {
            debug!(key = target.bibkey(), crossref = key, "crossref target not found");
            continue;
        };
        let Some(overwrite) = options.resolve(target.bibtype(), source.bibtype()) else {
            debug!(
                target = target.bibtype(),
                source = source.bibtype(),
                "inheritance disabled for entry types"
            );
            continue;
        };

        apply(target, source, overwrite);
    }
}

/// Copy fields from crossreferenced entries.
///
/// ```
/// use bibkit::{Dialect, parse};
/// use bibkit::references::{CrossrefOptions, inherit_crossrefs};
///
/// let mut bib = parse(
///     "@inbook{a, crossref = {b}, title = {Chapter}}
///      @book{b, title = {Book}, shorttitle = {B}, publisher = {P}}",
///     Dialect::Biblatex,
/// )
/// .unwrap();
/// inherit_crossrefs(&mut bib.entries, &CrossrefOptions::default());
///
/// let entry = &bib.entries[0];
/// assert_eq!(entry.get_str("title"), Some("Chapter"));
/// assert_eq!(entry.get_str("booktitle"), Some("Book"));
/// assert!(!entry.contains("shorttitle"));
/// assert!(!entry.contains("publisher"));
/// ```
pub fn inherit_crossrefs(entries: &mut [Entry], options: &CrossrefOptions) {
    for_each_crossref(entries, options, |target, source, overwrite| {
        for (source_field, target_field) in mapping(target.bibtype(), source.bibtype()) {
            let Some(target_field) = target_field else {
                continue;
            };
            let Some(value) = source.get(source_field) else {
                continue;
            };
            if overwrite || !target.contains(target_field) {
                target.set(target_field, value.clone());
            }
        }
    });
}

/// Remove the fields which equal the corresponding fields of the crossreferenced entry.
///
/// This reverses [`inherit_crossrefs`] unless fields were overwritten, or the target held a
/// field equal to the inherited one before.
pub fn uninherit_crossrefs(entries: &mut [Entry], options: &CrossrefOptions) {
    for_each_crossref(entries, options, |target, source, _| {
        for (source_field, target_field) in mapping(target.bibtype(), source.bibtype()) {
            let Some(target_field) = target_field else {
                continue;
            };
            let inherited = match (source.get(source_field), target.get(target_field)) {
                (Some(source_value), Some(target_value)) => source_value == target_value,
                _ => false,
            };
            if inherited {
                target.remove(target_field);
            }
        }
    });
}

/// The keys listed in the `xdata` field of an entry.
fn xdata_keys(entry: &Entry) -> Vec<String> {
    match entry.get("xdata") {
        Some(Value::Str(keys)) => keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned)
            .collect(),
        Some(Value::List(keys)) => keys.clone(),
        _ => Vec::new(),
    }
}

fn xdata_sources(entries: &[Entry]) -> BTreeMap<String, Entry> {
    entries
        .iter()
        .filter(|entry| entry.bibtype() == "xdata")
        .map(|entry| (entry.bibkey().to_owned(), entry.clone()))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Active,
    Done,
}

/// Fail on the first `@xdata` entry found to reference itself.
fn check_cycles(sources: &BTreeMap<String, Entry>) -> Result<()> {
    fn visit<'a>(
        key: &'a str,
        sources: &'a BTreeMap<String, Entry>,
        state: &mut HashMap<&'a str, Visit>,
    ) -> Result<()> {
        match state.get(key) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::Active) => {
                return Err(Error::syntax(ErrorCode::CyclicXdata(key.to_owned())));
            }
            None => {}
        }

        let Some((key, source)) = sources.get_key_value(key) else {
            return Ok(());
        };
        state.insert(key.as_str(), Visit::Active);
        for next in xdata_keys(source) {
            if let Some((next, _)) = sources.get_key_value(next.as_str()) {
                visit(next.as_str(), sources, state)?;
            }
        }
        state.insert(key.as_str(), Visit::Done);
        Ok(())
    }

    let mut state = HashMap::new();
    for key in sources.keys() {
        visit(key.as_str(), sources, &mut state)?;
    }
    Ok(())
}

/// The `@xdata` entries reachable from `target`, breadth first, each at most once.
fn resolve_xdata<'s>(target: &Entry, sources: &'s BTreeMap<String, Entry>) -> Vec<&'s Entry> {
    let mut queue: VecDeque<String> = xdata_keys(target).into();
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    while let Some(key) = queue.pop_front() {
        let Some((key, source)) = sources.get_key_value(key.as_str()) else {
            debug!(key = target.bibkey(), xdata = %key, "xdata entry not found");
            continue;
        };
        if !seen.insert(key.as_str()) {
            continue;
        }

        resolved.push(source);
        queue.extend(xdata_keys(source));
    }

    resolved
}

fn for_each_xdata<F>(entries: &mut [Entry], mut apply: F) -> Result<()>
where
    F: FnMut(&mut Entry, &Entry),
{
    let sources = xdata_sources(entries);
    if sources.is_empty() {
        return Ok(());
    }
    check_cycles(&sources)?;

    for target in entries.iter_mut() {
        for source in resolve_xdata(target, &sources) {
            apply(target, source);
        }
    }
    Ok(())
}

/// Copy the missing fields of referenced `@xdata` entries, following references between
/// `@xdata` entries.
///
/// ```
/// use bibkit::{Dialect, parse};
/// use bibkit::references::inherit_xdata;
///
/// let mut bib = parse(
///     "@book{a, xdata = {x1}, title = {T}}
///      @xdata{x1, xdata = {x2}, publisher = {P}}
///      @xdata{x2, location = {L}}",
///     Dialect::Biblatex,
/// )
/// .unwrap();
/// inherit_xdata(&mut bib.entries).unwrap();
///
/// let book = &bib.entries[0];
/// assert_eq!(book.get_str("publisher"), Some("P"));
/// assert_eq!(book.get_str("location"), Some("L"));
/// assert_eq!(book.get_str("xdata"), Some("x1"));
/// ```
///
/// # Errors
/// [`ErrorCode::CyclicXdata`] if an `@xdata` entry references itself, directly or through other
/// `@xdata` entries. No entry is modified in that case.
pub fn inherit_xdata(entries: &mut [Entry]) -> Result<()> {
    for_each_xdata(entries, |target, source| {
        for (field, value) in source.fields() {
            if !target.contains(field) {
                target.set(field, value.clone());
            }
        }
    })
}

/// Remove every field which a referenced `@xdata` entry also has, except for `xdata` itself.
pub fn uninherit_xdata(entries: &mut [Entry]) -> Result<()> {
    for_each_xdata(entries, |target, source| {
        for field in source.keys() {
            if field != "xdata" {
                target.remove(field);
            }
        }
    })
}
