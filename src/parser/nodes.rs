//! Node, node-list and embedded-resource productions.
//!
//! ```text
//! nodes    := node ( ',' node )*
//! node     := '*'
//!           | ident embedded?
//!           | ident ':' ident embedded?
//!           | ident ':' ident '!' ident embedded
//! embedded := '(' nodes ')'
//! ```
//!
//! One character of lookahead after each identifier picks the production.
//! Every production returns with trailing whitespace skipped.

use crate::ast::{Field, Node};
use crate::error::ParseError;

use super::tokens::{read_identifier, skip_whitespace};
use super::Parser;

/// Outcome of looking for an embedded resource.
///
/// `Absent` is not a failure: it hands the input back untouched so the caller
/// can treat the field as a plain column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embedded<'a> {
    Present(Vec<Node>, &'a str),
    Absent(&'a str),
    Error(ParseError),
}

impl Parser {
    pub(crate) fn node<'a>(
        &self,
        input: &'a str,
        depth: usize,
    ) -> Result<(Node, &'a str), ParseError> {
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some(rest) = input.strip_prefix('*') {
            return Ok((Node::Wildcard, skip_whitespace(rest)));
        }

        let (name, rest) = read_identifier(input)?;
        let rest = skip_whitespace(rest);

        let Some(rest) = rest.strip_prefix(':') else {
            return self.optional_children(Field::new(name), rest, depth);
        };

        let (original, rest) = read_identifier(skip_whitespace(rest))?;
        let field = Field::renamed(name, original);
        let rest = skip_whitespace(rest);

        let Some(rest) = rest.strip_prefix('!') else {
            return self.optional_children(field, rest, depth);
        };

        let (hint, rest) = read_identifier(skip_whitespace(rest))?;
        let rest = skip_whitespace(rest);

        match self.embedded(rest, depth) {
            Embedded::Present(children, rest) => Ok((
                field.with_hint(hint).with_children(children).into(),
                rest,
            )),
            Embedded::Absent(rest) => Err(ParseError::missing_embedded(rest)),
            Embedded::Error(e) => Err(e),
        }
    }

    fn optional_children<'a>(
        &self,
        field: Field,
        input: &'a str,
        depth: usize,
    ) -> Result<(Node, &'a str), ParseError> {
        match self.embedded(input, depth) {
            Embedded::Present(children, rest) => Ok((field.with_children(children).into(), rest)),
            Embedded::Absent(rest) => Ok((field.into(), rest)),
            Embedded::Error(e) => Err(e),
        }
    }

    pub(crate) fn nodes<'a>(
        &self,
        input: &'a str,
        depth: usize,
    ) -> Result<(Vec<Node>, &'a str), ParseError> {
        let mut nodes = Vec::new();
        let mut input = input;

        loop {
            let (node, rest) = self.node(input, depth)?;
            nodes.push(node);

            let rest = skip_whitespace(rest);
            match rest.strip_prefix(',') {
                Some(rest) => input = skip_whitespace(rest),
                None => return Ok((nodes, rest)),
            }
        }
    }

    pub(crate) fn embedded<'a>(&self, input: &'a str, depth: usize) -> Embedded<'a> {
        let Some(rest) = input.strip_prefix('(') else {
            return Embedded::Absent(input);
        };

        if depth >= self.options.max_depth {
            return Embedded::Error(ParseError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }

        let rest = skip_whitespace(rest);
        if rest.starts_with(')') {
            return Embedded::Error(ParseError::EmptyEmbeddedResource);
        }

        let (children, rest) = match self.nodes(rest, depth + 1) {
            Ok(parsed) => parsed,
            Err(e) => return Embedded::Error(e),
        };

        let rest = skip_whitespace(rest);
        match rest.strip_prefix(')') {
            Some(rest) => Embedded::Present(children, skip_whitespace(rest)),
            None => Embedded::Error(ParseError::expected_close_paren(rest)),
        }
    }
}

/// Parse one node. `input` must not start with whitespace.
pub fn parse_node(input: &str) -> Result<(Node, &str), ParseError> {
    Parser::default().node(input, 0)
}

/// Parse a comma-separated list of one or more nodes.
pub fn parse_nodes(input: &str) -> Result<(Vec<Node>, &str), ParseError> {
    Parser::default().nodes(input, 0)
}

/// Parse an optional parenthesized node list.
pub fn parse_embedded(input: &str) -> Embedded<'_> {
    Parser::default().embedded(input, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_node_returns_remainder() {
        assert_eq!(parse_node("id , name"), Ok((Node::field("id"), ", name")));
        assert_eq!(parse_node("* ,x"), Ok((Node::Wildcard, ",x")));
    }

    #[test]
    fn test_parse_node_empty() {
        assert_eq!(parse_node(""), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_rename_without_original_is_a_parse_error() {
        assert_eq!(
            parse_node("a:,b"),
            Err(ParseError::ExpectedIdentifier { at: ",b".to_string() })
        );
        assert_eq!(
            parse_node("a:"),
            Err(ParseError::ExpectedIdentifier { at: String::new() })
        );
    }

    #[test]
    fn test_hint_without_identifier() {
        assert_eq!(
            parse_node("a:b!(c)"),
            Err(ParseError::ExpectedIdentifier { at: "(c)".to_string() })
        );
    }

    #[test]
    fn test_parse_nodes_stops_at_terminator() {
        let (nodes, rest) = parse_nodes("a, b ) tail").unwrap();
        assert_eq!(nodes, vec![Node::field("a"), Node::field("b")]);
        assert_eq!(rest, ") tail");
    }

    #[test]
    fn test_parse_nodes_rejects_empty() {
        assert_eq!(parse_nodes(""), Err(ParseError::EmptyInput));
        assert_eq!(parse_nodes("a,"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_parse_embedded_absent_hands_input_back() {
        assert_eq!(parse_embedded(",x"), Embedded::Absent(",x"));
        assert_eq!(parse_embedded(""), Embedded::Absent(""));
    }

    #[test]
    fn test_parse_embedded_present() {
        assert_eq!(
            parse_embedded("( a , b ) ,c"),
            Embedded::Present(vec![Node::field("a"), Node::field("b")], ",c")
        );
    }

    #[test]
    fn test_parse_embedded_errors() {
        assert_eq!(
            parse_embedded("(  )"),
            Embedded::Error(ParseError::EmptyEmbeddedResource)
        );
        assert_eq!(
            parse_embedded("(a b)"),
            Embedded::Error(ParseError::ExpectedCloseParen { at: "b)".to_string() })
        );
        assert_eq!(
            parse_embedded("(a"),
            Embedded::Error(ParseError::ExpectedCloseParen { at: String::new() })
        );
    }
}
