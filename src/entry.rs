//! # Entry model
//! A parsed bibliography consists of four kinds of items:
//! ```bib
//! @string{jan = "January"}
//! @preamble{"\newcommand{\noopsort}[1]{}"}
//! @comment{ignored by BibTeX}
//! @article{key,
//!   title = {Title},
//! }
//! ```
//! [`Entry`] holds a regular entry; [`StringEntry`], [`Preamble`] and [`Comment`] hold the
//! auxiliary entries. Free text outside of entries is kept as plain strings in [`Entries`].
//!
//! An entry stores its fields in source order. Field names are lowercase, and a field with an
//! empty value is not stored at all: setting a field to an empty value removes it.
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, Result};
use crate::requirements;
use crate::vocab::{self, Dialect};

mod auxiliary;
mod entries;
mod value;

pub use auxiliary::{Comment, Preamble, StringEntry};
pub use entries::{Entries, Item};
pub use value::{Piece, Value, written};

/// A regular bibliographic entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    bibtype: String,
    bibkey: String,
    fields: Vec<(String, Value)>,
}

impl Entry {
    /// A new entry without fields. The entry type is lowercased.
    pub fn new(bibtype: impl Into<String>, bibkey: impl Into<String>) -> Self {
        Self {
            bibtype: bibtype.into().to_lowercase(),
            bibkey: bibkey.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field, builder style.
    ///
    /// ```
    /// use bibkit::Entry;
    ///
    /// let entry = Entry::new("Article", "key")
    ///     .with("Title", "A title")
    ///     .with("year", bibkit::Value::Int(2000));
    /// assert_eq!(entry.bibtype(), "article");
    /// assert_eq!(entry.get_str("title"), Some("A title"));
    /// assert_eq!(entry.keys().collect::<Vec<_>>(), ["title", "year"]);
    /// ```
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn bibtype(&self) -> &str {
        &self.bibtype
    }

    pub fn bibkey(&self) -> &str {
        &self.bibkey
    }

    pub fn set_bibtype(&mut self, bibtype: impl Into<String>) {
        self.bibtype = bibtype.into().to_lowercase();
    }

    pub fn set_bibkey(&mut self, bibkey: impl Into<String>) {
        self.bibkey = bibkey.into();
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(field))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.position(field).map(|idx| &self.fields[idx].1)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.position(field).map(|idx| &mut self.fields[idx].1)
    }

    /// The value of a field which still holds a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    /// Set a field, returning the previous value.
    ///
    /// A new field is appended; an existing field keeps its position. An empty value removes
    /// the field.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        if value.is_empty() {
            return self.remove(field);
        }

        match self.position(field) {
            Some(idx) => Some(std::mem::replace(&mut self.fields[idx].1, value)),
            None => {
                self.fields.push((field.to_lowercase(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.position(field).map(|idx| self.fields.remove(idx).1)
    }

    /// Remove all fields.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// The fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.fields
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields which are neither BibTeX nor BibLaTeX fields.
    pub fn extra_fields(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|name| !vocab::is_known_field(name))
    }

    /// The entry types aliasing the type of this entry.
    pub fn aliases(&self, dialect: Dialect) -> &'static [&'static str] {
        vocab::aliases(&self.bibtype, dialect)
    }

    /// Whether the entry has every field its type requires in `dialect`.
    pub fn valid(&self, dialect: Dialect) -> bool {
        requirements::check(self, dialect).is_empty()
    }

    /// Check the required fields of this entry.
    ///
    /// ```
    /// use bibkit::{Dialect, Entry};
    ///
    /// let entry = Entry::new("article", "key").with("author", "A. Author");
    /// let err = entry.validate(Dialect::Biblatex).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "entry 'key' (type 'article') is missing required field(s): title, journaltitle, year/date"
    /// );
    /// assert!(entry.validate(Dialect::Relaxed).is_ok());
    /// ```
    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        let missing = requirements::check(self, dialect);
        if missing.is_empty() {
            return Ok(());
        }

        Err(Error::syntax(ErrorCode::MissingRequiredFields {
            key: self.bibkey.clone(),
            bibtype: self.bibtype.clone(),
            required: missing.required.iter().map(|f| (*f).to_owned()).collect(),
            either: missing
                .either
                .iter()
                .map(|alt| alt.iter().map(|f| (*f).to_owned()).collect())
                .collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_remove() {
        let mut entry = Entry::new("book", "key");
        assert_eq!(entry.set("title", "Title"), None);
        assert_eq!(entry.set("year", "2000"), None);
        assert_eq!(entry.set("TITLE", "Other"), Some(Value::from("Title")));
        assert_eq!(entry.keys().collect::<Vec<_>>(), ["title", "year"]);
        assert_eq!(entry.get_str("Title"), Some("Other"));

        assert_eq!(entry.set("title", ""), Some(Value::from("Other")));
        assert!(!entry.contains("title"));
        assert_eq!(entry.len(), 1);

        assert_eq!(entry.set("keywords", Vec::<String>::new()), None);
        assert!(!entry.contains("keywords"));

        assert_eq!(entry.remove("year"), Some(Value::from("2000")));
        assert!(entry.is_empty());
    }

    #[test]
    fn test_extra_fields() {
        let entry = Entry::new("misc", "key")
            .with("title", "T")
            .with("x-custom", "value")
            .with("journaltitle", "J")
            .with("journal", "J");
        assert_eq!(entry.extra_fields().collect::<Vec<_>>(), ["x-custom"]);
    }

    #[test]
    fn test_aliases() {
        let entry = Entry::new("thesis", "key");
        assert_eq!(entry.aliases(Dialect::Biblatex), ["masterthesis", "phdthesis"]);
        assert!(entry.aliases(Dialect::Mixed).is_empty());
    }

    #[test]
    fn test_validate() {
        let entry = Entry::new("article", "key")
            .with("author", "A")
            .with("title", "T")
            .with("journal", "J")
            .with("year", "2000");
        assert!(entry.valid(Dialect::Bibtex));
        assert!(!entry.valid(Dialect::Biblatex));

        let err = entry.validate(Dialect::Biblatex).unwrap_err();
        assert_eq!(
            err.code(),
            &ErrorCode::MissingRequiredFields {
                key: "key".into(),
                bibtype: "article".into(),
                required: vec!["journaltitle".into()],
                either: vec![],
            }
        );
    }
}
