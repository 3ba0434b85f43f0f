//! The `@string`, `@preamble` and `@comment` entries.
use serde::{Deserialize, Serialize};

/// A `@string` definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringEntry {
    pub variable: String,
    pub value: String,
}

impl StringEntry {
    /// A string definition with the variable and value trimmed.
    pub fn new(variable: &str, value: &str) -> Self {
        Self {
            variable: variable.trim().to_owned(),
            value: value.trim().to_owned(),
        }
    }
}

/// A `@preamble` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preamble {
    pub value: String,
}

impl Preamble {
    /// The value is trimmed.
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_owned(),
        }
    }
}

/// A `@comment` entry. The value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comment {
    pub value: String,
}

impl Comment {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
