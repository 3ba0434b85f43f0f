//! # bibkit
//! Lexing, parsing, coercion and reference inheritance for bibliographies in the BibTeX and
//! BibLaTeX formats.
//!
//! ```
//! use bibkit::{parse, Dialect, Value};
//! use bibkit::postprocess::{postprocess, Fields, PostprocessOptions};
//!
//! let mut bib = parse(
//!     r#"
//!     @article{knuth1984,
//!       author = {Knuth, Donald E.},
//!       title = {Literate Programming},
//!       journaltitle = {The Computer Journal},
//!       date = {1984-05},
//!     }
//!     "#,
//!     Dialect::Biblatex,
//! )
//! .unwrap();
//!
//! let entry = &mut bib.entries[0];
//! postprocess(entry, Fields::All, &PostprocessOptions::default());
//!
//! let authors = entry.get("author").and_then(Value::as_names).unwrap();
//! assert_eq!(authors[0].last, "Knuth");
//! assert_eq!(entry.get("date").and_then(Value::as_date).unwrap().to_string(), "1984-05");
//! ```
//!
//! The pipeline runs from text to tokens ([`lex`]), from tokens to [`Entries`] ([`parse`]),
//! from raw strings to typed [`Value`]s and back ([`postprocess`](mod@postprocess),
//! [`preprocess`]), through `crossref` and `xdata` resolution ([`references`]) and finally
//! back to text ([`ser`]).
//!
//! Which entry types and fields are legal depends on the [`Dialect`]:
//! ```
//! use bibkit::{parse, Dialect};
//!
//! let input = "@online{key, url = {https://example.org}}";
//! assert!(parse(input, Dialect::Biblatex).is_ok());
//! assert!(parse(input, Dialect::Bibtex).is_err());
//! ```

pub mod date;
pub mod entry;

/// Error types for lexing, parsing and conversion.
pub mod error;
pub mod expand;
pub mod lex;
pub mod name;
pub mod parse;
pub mod postprocess;
pub mod preprocess;
pub mod references;
pub mod requirements;
pub mod ser;

/// Tokens and low-level validation of names and values.
pub mod token;
pub mod vocab;

// re-exports
pub use date::{DateRange, PartialDate};
pub use entry::{Entries, Entry, Value};
pub use error::{Error, Result};
pub use name::Name;
pub use parse::{ParseOptions, parse, parse_file, parse_with};
pub use postprocess::postprocess;
pub use references::{inherit_crossrefs, inherit_xdata, uninherit_crossrefs, uninherit_xdata};
pub use vocab::Dialect;
