//! # Tokens of a bibliography
//!
//! The [`Lexer`](crate::lex::Lexer) turns source text into a flat stream of [`Token`]s. Each
//! token borrows its text from the source and records the [`Position`] at which it starts and
//! ends.
//!
//! | [`TokenKind`]   | Source text                                    |
//! |-----------------|------------------------------------------------|
//! | `EntryMarker`   | `@`                                            |
//! | `Name`          | entry types, keys, field names and variables   |
//! | `LBrace`        | `{`                                            |
//! | `RBrace`        | `}`                                            |
//! | `LParen`        | `(`                                            |
//! | `RParen`        | `)`                                            |
//! | `Equals`        | `=`                                            |
//! | `Comma`         | `,`                                            |
//! | `Number`        | `-?[0-9]+`                                     |
//! | `StringLiteral` | `"..."`, including the quotes                  |
//! | `Concat`        | `#`                                            |
//! | `Content`       | the opaque text inside a braced value          |
//! | `Comment`       | free text between entries                      |
//! | `Space`         | whitespace inside an entry                     |
mod types;
mod validate;

pub use types::*;
pub use validate::*;
