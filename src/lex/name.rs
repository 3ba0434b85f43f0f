//! Splitting a single name into comma-delimited parts of words.
use crate::error::{Error, ErrorCode, Result};

/// A whitespace-delimited piece of a name, with all grouping braces removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameWord {
    pub text: String,
    /// The word began with a brace group, such as `{de}` or `{Marshall Smith}`.
    pub braced: bool,
}

impl NameWord {
    pub fn new(text: impl Into<String>, braced: bool) -> Self {
        Self {
            text: text.into(),
            braced,
        }
    }

    /// Whether the word is a candidate for a `von` particle: not braced, with at least one
    /// cased character and no uppercase characters.
    pub fn is_lowercase(&self) -> bool {
        !self.braced
            && self.text.chars().any(char::is_lowercase)
            && !self.text.chars().any(char::is_uppercase)
    }
}

/// The result of [`lex_name`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameParts {
    pub parts: Vec<Vec<NameWord>>,
    /// Number of commas at brace depth zero.
    pub commas: usize,
}

#[derive(Default)]
struct WordBuilder {
    text: String,
    braced: bool,
    started: bool,
}

impl WordBuilder {
    fn flush(&mut self, part: &mut Vec<NameWord>) {
        let word = std::mem::take(self);
        if !word.text.is_empty() {
            part.push(NameWord::new(word.text, word.braced));
        }
    }
}

/// Split a name into parts at commas outside braces, and each part into words at whitespace
/// outside braces.
///
/// A brace group is never split. A group starting with a backslash, such as `{\'e}`, is a
/// command and merges into the surrounding word; `\{` and `\}` are literal braces.
///
/// ```
/// use bibkit::lex::lex_name;
///
/// let name = lex_name("van der {Graaf Smith}, Jr., John").unwrap();
/// assert_eq!(name.commas, 2);
/// assert_eq!(name.parts[0].len(), 3);
/// assert_eq!(name.parts[0][2].text, "Graaf Smith");
/// assert!(name.parts[0][2].braced);
/// ```
pub fn lex_name(input: &str) -> Result<NameParts> {
    let mut parts = Vec::new();
    let mut part = Vec::new();
    let mut word = WordBuilder::default();
    let mut commas = 0;
    let mut depth = 0usize;

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if matches!(chars.peek(), Some('{' | '}')) => {
                word.text.push(ch);
                word.text.extend(chars.next());
                word.started = true;
            }
            '{' => {
                if depth == 0 && !word.started && chars.peek() != Some(&'\\') {
                    word.braced = true;
                }
                word.started = true;
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(Error::syntax(ErrorCode::UnbalancedBraces));
                }
                depth -= 1;
            }
            ch if depth > 0 => word.text.push(ch),
            ',' => {
                word.flush(&mut part);
                parts.push(std::mem::take(&mut part));
                commas += 1;
            }
            ch if ch.is_whitespace() => word.flush(&mut part),
            ch => {
                word.text.push(ch);
                word.started = true;
            }
        }
    }

    if depth > 0 {
        return Err(Error::syntax(ErrorCode::UnclosedBrace));
    }

    word.flush(&mut part);
    parts.push(part);

    Ok(NameParts { parts, commas })
}
