//! Character classes and the lexical primitives of the select grammar.
//!
//! All functions work on `&str` cursors: they return what they consumed and
//! the unconsumed remainder.

use nom::{
    bytes::complete::{take_while, take_while1},
    IResult,
};

use crate::error::ParseError;

/// `[0-9A-Za-z_]`.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Space, tab, newline or carriage return.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Strip leading whitespace.
pub fn skip_whitespace(input: &str) -> &str {
    let res: IResult<&str, &str> = take_while(is_whitespace)(input);
    match res {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

/// Read the maximal run of identifier characters at the start of `input`.
///
/// Returns `(identifier, remainder)`. Does not skip whitespace.
pub fn read_identifier(input: &str) -> Result<(&str, &str), ParseError> {
    let res: IResult<&str, &str> = take_while1(is_identifier_char)(input);
    match res {
        Ok((rest, ident)) => Ok((ident, rest)),
        Err(_) => Err(ParseError::expected_identifier(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_alphabet() {
        for c in ['a', 'Z', '0', '9', '_'] {
            assert!(is_identifier_char(c), "{c:?}");
        }
        for c in ['-', '.', ' ', '*', '(', ':', '!', 'é'] {
            assert!(!is_identifier_char(c), "{c:?}");
        }
    }

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace(" \t\r\n id "), "id ");
        assert_eq!(skip_whitespace("id"), "id");
        assert_eq!(skip_whitespace(""), "");
        assert_eq!(skip_whitespace("   "), "");
    }

    #[test]
    fn test_read_identifier_is_greedy() {
        assert_eq!(read_identifier("user_id2,x"), Ok(("user_id2", ",x")));
        assert_eq!(read_identifier("a b"), Ok(("a", " b")));
    }

    #[test]
    fn test_read_identifier_rejects() {
        assert_eq!(
            read_identifier(" a"),
            Err(ParseError::ExpectedIdentifier { at: " a".to_string() })
        );
        assert_eq!(
            read_identifier(""),
            Err(ParseError::ExpectedIdentifier { at: String::new() })
        );
    }
}
