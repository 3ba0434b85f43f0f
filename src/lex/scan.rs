//! Byte-level scanners used by the lexers.
//!
//! Every scanner takes the input and a starting offset and returns the offset at which it
//! stopped. All of the cuts are made immediately before or after an ascii byte, so slicing a
//! `str` at a returned offset is always on a char boundary.
use memchr::{memchr, memchr2_iter, memchr3_iter};

use crate::error::ErrorCode;
use crate::token::is_name_byte;

/// Find the next `@` at or after `pos`.
#[inline]
pub fn next_entry(input: &[u8], pos: usize) -> Option<usize> {
    memchr(b'@', &input[pos..]).map(|offset| pos + offset)
}

/// Skip ascii whitespace.
///
/// Note that this follows the same convention as the built-in `u8::is_ascii_whitespace`
/// and in particular does not consider U+000B VERTICAL TAB to be whitespace.
pub fn whitespace(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && input[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Consume a run of name bytes.
pub fn identifier(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && is_name_byte(input[pos]) {
        pos += 1;
    }
    pos
}

/// Consume `-?[0-9]+`, provided the digits are not the start of a longer name.
pub fn number(input: &[u8], start: usize) -> Option<usize> {
    let mut end = start;
    if end < input.len() && input[end] == b'-' {
        end += 1;
    }

    let digits = end;
    while end < input.len() && input[end].is_ascii_digit() {
        end += 1;
    }

    if end == digits || (end < input.len() && is_name_byte(input[end])) {
        None
    } else {
        Some(end)
    }
}

/// Consume a string with balanced brackets, until the string becomes unbalanced.
///
/// Returns the offset of the closing bracket, or `None` if the input ends first.
pub fn balanced(input: &[u8], start: usize) -> Option<usize> {
    let mut bracket_depth = 0;

    for offset in memchr2_iter(b'{', b'}', &input[start..]) {
        let end = start + offset;
        if input[end] == b'{' {
            bracket_depth += 1
        } else {
            // found the closing bracket
            if bracket_depth == 0 {
                return Some(end);
            }
            bracket_depth -= 1;
        }
    }

    None
}

/// Consume a string with balanced parentheses, until the string becomes unbalanced.
pub fn parenthesized(input: &[u8], start: usize) -> Option<usize> {
    let mut paren_depth = 0;

    for offset in memchr2_iter(b'(', b')', &input[start..]) {
        let end = start + offset;
        if input[end] == b'(' {
            paren_depth += 1
        } else {
            if paren_depth == 0 {
                return Some(end);
            }
            paren_depth -= 1;
        }
    }

    None
}

/// Consume the body of a quoted string starting after the opening `"`, terminating at the
/// first `"` outside of brackets.
pub fn quoted(input: &[u8], start: usize) -> Result<usize, ErrorCode> {
    let mut bracket_depth = 0;

    for offset in memchr3_iter(b'"', b'{', b'}', &input[start..]) {
        let end = start + offset;
        match input[end] {
            b'"' => {
                if bracket_depth == 0 {
                    return Ok(end);
                }
            }
            b'{' => bracket_depth += 1,
            _ => {
                if bracket_depth == 0 {
                    return Err(ErrorCode::UnbalancedBraces);
                }
                bracket_depth -= 1;
            }
        }
    }

    // we did not find an unprotected `"`
    Err(ErrorCode::UnterminatedString)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_entry() {
        assert_eq!(next_entry(b"junk", 0), None);
        assert_eq!(next_entry(b"", 0), None);
        assert_eq!(next_entry(b"  @art", 0), Some(2));
        assert_eq!(next_entry(b"@a@b", 1), Some(2));
    }

    #[test]
    fn test_number() {
        assert_eq!(number(b"2004,", 0), Some(4));
        assert_eq!(number(b"-12}", 0), Some(3));
        assert_eq!(number(b"12", 0), Some(2));
        assert_eq!(number(b"2004smith,", 0), None);
        assert_eq!(number(b"-", 0), None);
        assert_eq!(number(b"abc", 0), None);
    }

    #[test]
    fn test_balanced() {
        assert_eq!(balanced("url}🍄bc".as_bytes(), 0), Some(3));
        assert_eq!(balanced("u{}r🍄}🍄c".as_bytes(), 0), Some(8));
        assert_eq!(balanced(b"none", 2), None);
        assert_eq!(balanced(b"{n}e", 0), None);
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(parenthesized(b"(nested parentheses))", 0), Some(20));
        assert_eq!(parenthesized(b"(open", 0), None);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted("🍄\"🍄rest".as_bytes(), 0), Ok(4));
        assert_eq!(quoted("🍄{\"}\"🍄est".as_bytes(), 0), Ok(7));
        assert_eq!(quoted(b"\"", 0), Ok(0));
        assert_eq!(quoted(b"a}\"", 0), Err(ErrorCode::UnbalancedBraces));
        assert_eq!(quoted(b"abc", 0), Err(ErrorCode::UnterminatedString));
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            let b = s.as_bytes();
            let _ = next_entry(b, 0);
            let _ = whitespace(b, 0);
            let _ = identifier(b, 0);
            let _ = number(b, 0);
            let _ = balanced(b, 0);
            let _ = parenthesized(b, 0);
            let _ = quoted(b, 0);
        }
    }
}
