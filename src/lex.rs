//! # Lexers
//!
//! Three lexers live here:
//!
//! - [`Lexer`] turns a complete bibliography into a stream of [`Token`](crate::token::Token)s.
//!   It is a state machine: free text between entries is a single comment token, the body of
//!   an entry is split into structural tokens, and braced values (and the whole body of
//!   `@comment` and `@preamble` entries) are single opaque content tokens.
//! - [`lex_name`] splits one name into comma-delimited parts of words, as needed by
//!   [`Name::parse`](crate::name::Name::parse).
//! - [`NameList`] splits a list of names on the word `and` outside of braces.
//!
//! The lexer treats the following as equivalent:
//! ```bib
//! @string{var = "value"}
//! @string(var = "value")
//! ```
//! whereas the parenthesized body of a `@comment` or `@preamble` is opaque, just like the
//! braced one:
//! ```bib
//! @preamble{ "\newcommand{\noopsort}[1]{}" }
//! @preamble( "\newcommand{\noopsort}[1]{}" )
//! ```
mod bib;
mod name;
mod namelist;
pub(crate) mod scan;

pub use bib::Lexer;
pub use name::{NameParts, NameWord, lex_name};
pub use namelist::NameList;
