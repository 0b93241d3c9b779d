use super::*;
use crate::ast::{to_query, Field, Node};
use pretty_assertions::assert_eq;

// ========================================================================
// Productions
// ========================================================================

#[test]
fn test_plain_identifiers() {
    for ident in ["a", "id", "user_id", "_x", "2fa", "ABC_123"] {
        assert_eq!(parse_query(ident), Ok(vec![Node::field(ident)]), "{ident}");
    }
}

#[test]
fn test_wildcard() {
    assert_eq!(parse_query("*"), Ok(vec![Node::Wildcard]));
}

#[test]
fn test_rename() {
    assert_eq!(parse_query("a:b"), Ok(vec![Node::renamed("a", "b")]));
}

#[test]
fn test_rename_with_hint() {
    let expected: Node = Field::renamed("a", "b")
        .with_hint("h")
        .with_children(vec![Node::field("c")])
        .into();
    assert_eq!(parse_query("a:b!h(c)"), Ok(vec![expected]));
}

#[test]
fn test_embedded_children_keep_order() {
    assert_eq!(
        parse_query("a(b,c)"),
        Ok(vec![Node::embedded("a", vec![Node::field("b"), Node::field("c")])])
    );
}

#[test]
fn test_renamed_embedded() {
    let expected: Node = Field::renamed("team", "members")
        .with_children(vec![Node::Wildcard])
        .into();
    assert_eq!(parse_query("team:members(*)"), Ok(vec![expected]));
}

#[test]
fn test_nested_query() {
    let nodes = parse_query("*,team:members(user:users(id,email))").unwrap();
    let expected = vec![
        Node::Wildcard,
        Field::renamed("team", "members")
            .with_children(vec![
                Field::renamed("user", "users")
                    .with_children(vec![Node::field("id"), Node::field("email")])
                    .into(),
            ])
            .into(),
    ];
    assert_eq!(nodes, expected);
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_hint_requires_embedded_resource() {
    assert_eq!(
        parse_query("a:b!h"),
        Err(ParseError::MissingEmbeddedResourceAfterHint { at: String::new() })
    );
    assert_eq!(
        parse_query("a:b!h,c"),
        Err(ParseError::MissingEmbeddedResourceAfterHint { at: ",c".to_string() })
    );
}

#[test]
fn test_hint_propagates_embedded_error() {
    assert_eq!(parse_query("a:b!h()"), Err(ParseError::EmptyEmbeddedResource));
}

#[test]
fn test_empty_embedded_resource() {
    assert_eq!(parse_query("a()"), Err(ParseError::EmptyEmbeddedResource));
    assert_eq!(parse_query("a:b( \n )"), Err(ParseError::EmptyEmbeddedResource));
}

#[test]
fn test_empty_node_between_commas() {
    assert_eq!(
        parse_query("a,,b"),
        Err(ParseError::ExpectedIdentifier { at: ",b".to_string() })
    );
}

#[test]
fn test_trailing_comma() {
    assert_eq!(parse_query("a,"), Err(ParseError::EmptyInput));
}

#[test]
fn test_empty_query() {
    assert_eq!(parse_query(""), Err(ParseError::EmptyInput));
    assert_eq!(parse_query(" \n\t "), Err(ParseError::EmptyInput));
}

#[test]
fn test_unclosed_embedded_resource() {
    assert_eq!(
        parse_query("a(b"),
        Err(ParseError::ExpectedCloseParen { at: String::new() })
    );
}

#[test]
fn test_trailing_input() {
    assert_eq!(
        parse_query("a) b"),
        Err(ParseError::UnexpectedTrailingInput(") b".to_string()))
    );
    assert_eq!(
        parse_query("a b"),
        Err(ParseError::UnexpectedTrailingInput("b".to_string()))
    );
    assert_eq!(
        parse_query("*(a)"),
        Err(ParseError::UnexpectedTrailingInput("(a)".to_string()))
    );
}

#[test]
fn test_hint_without_rename_is_trailing_input() {
    assert_eq!(
        parse_query("a!h(b)"),
        Err(ParseError::UnexpectedTrailingInput("!h(b)".to_string()))
    );
}

#[test]
fn test_unsupported_operators_are_rejected() {
    assert!(parse_query("id::text").is_err());
    assert!(parse_query("data->a").is_err());
    assert!(parse_query("id.eq.1").is_err());
}

// ========================================================================
// Whitespace
// ========================================================================

/// Surround every punctuation character with a run of mixed whitespace.
fn spread(query: &str) -> String {
    let mut out = String::from("\n  ");
    for c in query.chars() {
        if is_identifier_char(c) {
            out.push(c);
        } else {
            out.push_str(" \t");
            out.push(c);
            out.push_str("\r\n ");
        }
    }
    out.push_str("\n");
    out
}

#[test]
fn test_whitespace_invariance() {
    let queries = [
        "*",
        "a",
        "a:b",
        "a(b,c)",
        "a:b!h(c)",
        "*,team:members(workspaceId:workspace_id,user:users(id,email))",
        "x:y!fk(*,z(w))",
    ];
    for q in queries {
        let spaced = spread(q);
        assert_eq!(parse_query(&spaced), parse_query(q), "{spaced:?}");
    }
}

#[test]
fn test_multiline_query() {
    let query = "
      *,
      team:members(
        workspaceId:workspace_id,
        user:users(
          id,
          email
        )
      )
    ";
    let compact = "*,team:members(workspaceId:workspace_id,user:users(id,email))";
    assert_eq!(parse_query(query), parse_query(compact));
}

// ========================================================================
// Rendering
// ========================================================================

#[test]
fn test_canonical_rendering_reparses() {
    let queries = [
        "*",
        "a , b:c",
        "a:b!h( c , d(e) )",
        " x ( * ) , y:z(w:v) ",
        "a:a!h(c)",
    ];
    for q in queries {
        let nodes = parse_query(q).unwrap();
        let rendered = to_query(&nodes);
        assert_eq!(parse_query(&rendered).unwrap(), nodes, "{rendered}");
    }
    assert_eq!(
        to_query(&parse_query(" a : b ! h ( c ) ").unwrap()),
        "a:b!h(c)"
    );
}

// ========================================================================
// Limits
// ========================================================================

fn nested(depth: usize) -> String {
    let mut q = String::new();
    for i in 0..depth {
        q.push_str(&format!("r{i}("));
    }
    q.push('x');
    q.push_str(&")".repeat(depth));
    q
}

#[test]
fn test_depth_limit() {
    let parser = Parser::new(ParserOptions {
        max_depth: 3,
        ..ParserOptions::default()
    });
    assert!(parser.parse_query(&nested(3)).is_ok());
    assert_eq!(
        parser.parse_query(&nested(4)),
        Err(ParseError::NestingTooDeep { limit: 3 })
    );
}

#[test]
fn test_default_depth_limit_guards_adversarial_input() {
    let q = nested(DEFAULT_MAX_DEPTH + 1);
    assert_eq!(
        parse_query(&q),
        Err(ParseError::NestingTooDeep {
            limit: DEFAULT_MAX_DEPTH
        })
    );
    let q = "a(".repeat(100_000);
    assert!(matches!(
        parse_query(&q),
        Err(ParseError::InputTooLong { .. })
    ));
}

#[test]
fn test_length_limit() {
    let parser = Parser::new(ParserOptions {
        max_length: 8,
        ..ParserOptions::default()
    });
    assert!(parser.parse_query("abcdefgh").is_ok());
    assert_eq!(
        parser.parse_query("abcdefghi"),
        Err(ParseError::InputTooLong { len: 9, limit: 8 })
    );
}
