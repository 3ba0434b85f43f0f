//! Splitting a list of names on the conjunction `and`.
use crate::error::{Error, ErrorCode, Result};

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// An iterator over the names in a name list such as `A and B and {C and D}`.
///
/// The list is split on the word `and` outside of braces. Each name is trimmed and empty names
/// are skipped. A closing brace without a matching opening brace is an error, after which the
/// iterator is exhausted.
///
/// ```
/// use bibkit::lex::NameList;
///
/// let names: Vec<&str> = NameList::new("Smith and {Jones and Co} and  Brandon ")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(names, ["Smith", "{Jones and Co}", "Brandon"]);
/// ```
#[derive(Debug, Clone)]
pub struct NameList<'r> {
    input: &'r str,
    pos: usize,
    depth: usize,
    done: bool,
}

impl<'r> NameList<'r> {
    pub fn new(input: &'r str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            done: false,
        }
    }

    /// Whether an `and` at `at` is a separate word.
    fn is_conjunction(&self, at: usize) -> bool {
        let input = self.input;
        input[at..].starts_with("and")
            && !input[..at].chars().next_back().is_some_and(is_word_char)
            && !input[at + 3..].chars().next().is_some_and(is_word_char)
    }
}

impl<'r> Iterator for NameList<'r> {
    type Item = Result<&'r str>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();

        while !self.done {
            let start = self.pos;
            let mut end = None;

            let mut i = start;
            while i < bytes.len() {
                match bytes[i] {
                    b'{' => self.depth += 1,
                    b'}' => {
                        if self.depth == 0 {
                            self.done = true;
                            return Some(Err(Error::syntax(ErrorCode::UnbalancedBraces)));
                        }
                        self.depth -= 1;
                    }
                    b'a' if self.depth == 0 && self.is_conjunction(i) => {
                        end = Some(i);
                        break;
                    }
                    _ => {}
                }
                i += 1;
            }

            let name = match end {
                Some(at) => {
                    self.pos = at + 3;
                    self.input[start..at].trim()
                }
                None => {
                    self.done = true;
                    self.pos = bytes.len();
                    self.input[start..].trim()
                }
            };

            if !name.is_empty() {
                return Some(Ok(name));
            }
        }

        None
    }
}

impl std::iter::FusedIterator for NameList<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<&str> {
        NameList::new(input).collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_split() {
        assert_eq!(split("A and B and C"), ["A", "B", "C"]);
        assert_eq!(split("Smith and {Jones and Co}"), ["Smith", "{Jones and Co}"]);
        assert_eq!(split(""), Vec::<&str>::new());
        assert_eq!(split("  and  A and "), ["A"]);
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(
            split("T. Ohtsuki and H. Moriand and Anders Andersen"),
            ["T. Ohtsuki", "H. Moriand", "Anders Andersen"]
        );
        assert_eq!(split("Sandy Band"), ["Sandy Band"]);
        assert_eq!(split("A AND B"), ["A AND B"]);
        assert_eq!(split("A\tand\nB"), ["A", "B"]);
    }

    #[test]
    fn test_braced_and() {
        assert_eq!(
            split("L. {Sunil Chandran} {and } C. R. Subramanian"),
            ["L. {Sunil Chandran} {and } C. R. Subramanian"]
        );
        assert_eq!(
            split("Department of Communications {and} Data and Jane Doe"),
            ["Department of Communications {and} Data", "Jane Doe"]
        );
    }

    #[test]
    fn test_unbalanced() {
        let mut names = NameList::new("A and B} and C");
        assert_eq!(names.next(), Some(Ok("A")));
        assert_eq!(
            names.next().unwrap().unwrap_err().code(),
            &ErrorCode::UnbalancedBraces
        );
        assert!(names.next().is_none());
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            for name in NameList::new(&s) {
                if name.is_err() {
                    break;
                }
            }
        }
    }
}
