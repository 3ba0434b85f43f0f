//! # Validation methods
//! This module exposes some methods to aid validation of names and values.
use memchr::memchr2_iter;

use crate::error::ErrorCode;

/// Lookup table for bytes which could appear in a name token. This includes the
/// ascii printable characters with "{}(),= \t\n\\#%\"@" removed, as well as bytes
/// that could appear in non-ascii UTF-8.
///
/// Since every disallowed byte is ascii, a run of allowed bytes always ends on a char
/// boundary.
pub(crate) static IDENTIFIER_ALLOWED: [bool; 256] = {
    const PR: bool = false; // disallowed printable bytes
    const CT: bool = false; // non-printable ascii
    const __: bool = true; // permitted bytes
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 0
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 1
        CT, __, PR, PR, __, PR, __, __, PR, PR, __, __, PR, __, __, __, // 2
        __, __, __, __, __, __, __, __, __, __, __, __, __, PR, __, __, // 3
        PR, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, PR, __, __, __, // 5
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, PR, __, PR, __, CT, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

#[inline]
pub fn is_name_byte(b: u8) -> bool {
    IDENTIFIER_ALLOWED[b as usize]
}

/// Check if a given string could be lexed as a single name token.
pub fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_name_byte)
}

/// Check if a given string is valid as a string variable: an identifier which does not begin
/// with an ascii digit.
pub fn is_variable(s: &str) -> bool {
    is_identifier(s) && !s.as_bytes()[0].is_ascii_digit()
}

/// Check if a given string is a permissible entry type or field name in the relaxed dialect:
/// a non-empty run of word characters, `-`, `:` and `.`.
pub fn is_relaxed_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
}

pub fn check_balanced(input: &[u8]) -> Result<(), ErrorCode> {
    let mut bracket_depth = 0;

    for pos in memchr2_iter(b'{', b'}', input) {
        if input[pos] == b'{' {
            bracket_depth += 1
        } else {
            // too many closing brackets
            if bracket_depth == 0 {
                return Err(ErrorCode::UnbalancedBraces);
            }
            bracket_depth -= 1;
        }
    }

    if bracket_depth == 0 {
        Ok(())
    } else {
        Err(ErrorCode::UnclosedBrace)
    }
}

/// Check if a given string has balanced `{}` brackets.
#[inline]
pub fn is_balanced(input: &[u8]) -> bool {
    check_balanced(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("Knuth1984"));
        assert!(is_identifier("a:b-c.d/e+f"));
        assert!(is_identifier("Ærøskøbing"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("a@b"));
        assert!(!is_identifier("a{b"));
        assert!(!is_identifier("a%b"));
    }

    #[test]
    fn test_variable() {
        assert!(is_variable("var"));
        assert!(!is_variable("1var"));
        assert!(!is_variable(""));
    }

    #[test]
    fn test_relaxed_name() {
        assert!(is_relaxed_name("journaltitle"));
        assert!(is_relaxed_name("my-field:sub.part"));
        assert!(is_relaxed_name("höhe_2"));
        assert!(!is_relaxed_name("entry!"));
        assert!(!is_relaxed_name("a/b"));
        assert!(!is_relaxed_name(""));
    }

    #[test]
    fn test_balanced() {
        assert_eq!(check_balanced(b"{a}{b{c}}"), Ok(()));
        assert_eq!(check_balanced(b"a}"), Err(ErrorCode::UnbalancedBraces));
        assert_eq!(check_balanced(b"{a"), Err(ErrorCode::UnclosedBrace));
        assert!(is_balanced(b"no braces"));
    }
}
