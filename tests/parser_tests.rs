// tests/parser_tests.rs

use sqlweave::ast::{BlockKind, FunctionKind, Node};
use sqlweave::lexer::Lexer;
use sqlweave::parser::{foreach_variable, split_arguments, split_command, ParseError, Parser};

fn parse(template: &str) -> Result<sqlweave::ast::Block, ParseError> {
    Parser::new(Lexer::new(template)).parse()
}

// ============================================================================
// Command Splitting
// ============================================================================

#[test]
fn test_split_command() {
    let test_cases = vec![
        ("value(\"a\")", "value", "(\"a\")"),
        ("endif", "endif", ""),
        ("IF exists(\"x\")", "if", " exists(\"x\")"),
        ("foreach(\"tags\")", "foreach", "(\"tags\")"),
        ("break 2", "break", " 2"),
        ("", "", ""),
    ];

    for (input, cmd, rest) in test_cases {
        let (got_cmd, got_rest) = split_command(input);
        assert_eq!(got_cmd, cmd, "Failed command for: {}", input);
        assert_eq!(got_rest, rest, "Failed rest for: {}", input);
    }
}

// ============================================================================
// Argument Splitting
// ============================================================================

#[test]
fn test_split_arguments() {
    let test_cases: Vec<(&str, Vec<&str>)> = vec![
        ("(\"a\")", vec!["a"]),
        ("(\"a\", \"b\")", vec!["a", "b"]),
        ("(a, b)", vec!["a", "b"]),
        ("('a')", vec!["a"]),
        ("\"a\" , \"b\"", vec!["a", "b"]),
        ("(\"a,b\")", vec!["a,b"]),
        ("(\"a\" \"b\")", vec!["ab"]),
        ("(\"a\",)", vec!["a"]),
        ("(,)", vec![""]),
        ("", vec![]),
        ("()", vec![]),
    ];

    for (input, expected) in test_cases {
        assert_eq!(split_arguments(input), expected, "Failed for: {}", input);
    }
}

#[test]
fn test_split_arguments_escapes() {
    assert_eq!(split_arguments(r"('it\'s')"), vec!["it's"]);
    assert_eq!(split_arguments(r#"("a\"b")"#), vec![r#"a"b"#]);
    assert_eq!(split_arguments(r"('a\\b')"), vec![r"a\b"]);
}

#[test]
fn test_split_arguments_stops_at_closing_paren() {
    assert_eq!(split_arguments("(\"a\") trailing junk"), vec!["a"]);
}

// ============================================================================
// Foreach Variable Extraction
// ============================================================================

#[test]
fn test_foreach_variable() {
    let test_cases = vec![
        ("(\"tags\")", "tags"),
        ("('tags')", "tags"),
        ("\"tags\"", "tags"),
        ("  (\"tags\")  ", "tags"),
        // only quoted characters contribute
        ("(tags)", ""),
        ("(\"a\", \"b\")", "a"),
        ("", ""),
    ];

    for (input, expected) in test_cases {
        assert_eq!(foreach_variable(input), expected, "Failed for: {}", input);
    }
}

// ============================================================================
// Tree Shape
// ============================================================================

#[test]
fn test_plain_text_tree() {
    let root = parse("SELECT 1").unwrap();
    assert_eq!(root.kind, BlockKind::Generic);
    assert_eq!(root.children, vec![Node::Text("SELECT 1".to_string())]);
    assert!(root.alt.is_none());
}

#[test]
fn test_function_node() {
    let root = parse("SELECT <? value(\"a\") ?>").unwrap();
    assert_eq!(root.children.len(), 2);
    match &root.children[1] {
        Node::Function(f) => {
            assert_eq!(f.kind, FunctionKind::Value);
            assert_eq!(f.args, vec!["a"]);
        }
        other => panic!("Expected Function, got {:?}", other),
    }
}

#[test]
fn test_if_block_nesting() {
    let root = parse("<? if exists(\"x\") ?>A<? endif ?>").unwrap();
    assert_eq!(root.children.len(), 1);
    match &root.children[0] {
        Node::Block(block) => {
            match &block.kind {
                BlockKind::If { negated, test } => {
                    assert!(!negated);
                    assert_eq!(test.kind, FunctionKind::Exists);
                    assert_eq!(test.args, vec!["x"]);
                }
                other => panic!("Expected If, got {:?}", other),
            }
            assert_eq!(block.children, vec![Node::Text("A".to_string())]);
            assert!(block.alt.is_none());
        }
        other => panic!("Expected Block, got {:?}", other),
    }
}

#[test]
fn test_if_not_sets_negation() {
    let root = parse("<? if not exists(\"x\") ?>A<? endif ?>").unwrap();
    match &root.children[0] {
        Node::Block(block) => match &block.kind {
            BlockKind::If { negated, .. } => assert!(negated),
            other => panic!("Expected If, got {:?}", other),
        },
        other => panic!("Expected Block, got {:?}", other),
    }
}

#[test]
fn test_elseif_else_chain() {
    let root = parse(
        "<? if exists(\"a\") ?>A<? elseif exists(\"b\") ?>B<? else ?>C<? endif ?>",
    )
    .unwrap();
    assert_eq!(root.children.len(), 1);

    let if_block = match &root.children[0] {
        Node::Block(block) => block,
        other => panic!("Expected Block, got {:?}", other),
    };
    assert!(matches!(if_block.kind, BlockKind::If { .. }));
    assert_eq!(if_block.children, vec![Node::Text("A".to_string())]);

    let elseif = if_block.alt.as_ref().expect("if should have an alternate");
    match &elseif.kind {
        BlockKind::ElseIf { negated, test } => {
            assert!(!negated);
            assert_eq!(test.args, vec!["b"]);
        }
        other => panic!("Expected ElseIf, got {:?}", other),
    }
    assert_eq!(elseif.children, vec![Node::Text("B".to_string())]);

    let else_block = elseif.alt.as_ref().expect("elseif should chain to else");
    assert_eq!(else_block.kind, BlockKind::Else);
    assert_eq!(else_block.children, vec![Node::Text("C".to_string())]);
    assert!(else_block.alt.is_none());
}

#[test]
fn test_foreach_block() {
    let root = parse("<? foreach(\"tags\") ?>x<? endforeach ?>").unwrap();
    match &root.children[0] {
        Node::Block(block) => {
            assert_eq!(
                block.kind,
                BlockKind::ForEach {
                    var: "tags".to_string()
                }
            );
            assert_eq!(block.children, vec![Node::Text("x".to_string())]);
        }
        other => panic!("Expected Block, got {:?}", other),
    }
}

#[test]
fn test_unclosed_block_is_accepted() {
    // end of input closes open blocks implicitly
    let root = parse("<? if exists(\"x\") ?>A").unwrap();
    match &root.children[0] {
        Node::Block(block) => {
            assert!(matches!(block.kind, BlockKind::If { .. }));
            assert_eq!(block.children, vec![Node::Text("A".to_string())]);
        }
        other => panic!("Expected Block, got {:?}", other),
    }
}

#[test]
fn test_break_depth() {
    let test_cases = vec![
        ("<? break ?>", 1),
        ("<? break(1) ?>", 1),
        ("<? break(2) ?>", 2),
        ("<? break(0) ?>", 1),
        ("<? break(-3) ?>", 1),
        ("<? continue(2.9) ?>", 2),
        ("<? continue(\"2\") ?>", 2),
    ];

    for (input, depth) in test_cases {
        let root = parse(input).unwrap();
        match &root.children[0] {
            Node::Function(f) => assert_eq!(f.depth, depth, "Failed for: {}", input),
            other => panic!("Expected Function, got {:?} for {}", other, input),
        }
    }
}

#[test]
fn test_comment_node() {
    let root = parse("a /* note */ b").unwrap();
    assert_eq!(
        root.children,
        vec![
            Node::Text("a ".to_string()),
            Node::Comment("/* note */".to_string()),
            Node::Text(" b".to_string()),
        ]
    );
}

// ============================================================================
// Structural Errors
// ============================================================================

#[test]
fn test_unmatched_endif() {
    let err = parse("SELECT 1 <? endif ?>").unwrap_err();
    assert_eq!(err, ParseError::MismatchedEnd("endif".to_string()));
    assert!(err.to_string().contains("endif"));
}

#[test]
fn test_unmatched_endforeach() {
    let err = parse("<? endforeach ?>").unwrap_err();
    assert_eq!(err, ParseError::MismatchedEnd("endforeach".to_string()));
}

#[test]
fn test_endif_inside_foreach() {
    let err = parse("<? foreach(\"t\") ?><? endif ?><? endforeach ?>").unwrap_err();
    assert_eq!(err, ParseError::MismatchedEnd("endif".to_string()));
}

#[test]
fn test_endforeach_inside_if() {
    let err = parse("<? if exists(\"x\") ?><? endforeach ?><? endif ?>").unwrap_err();
    assert_eq!(err, ParseError::MismatchedEnd("endforeach".to_string()));
}

#[test]
fn test_else_outside_if() {
    let err = parse("<? else ?>").unwrap_err();
    assert_eq!(err, ParseError::AlternateOutsideIf("else".to_string()));
}

#[test]
fn test_elseif_outside_if() {
    let err = parse("<? elseif exists(\"x\") ?>").unwrap_err();
    assert_eq!(err, ParseError::AlternateOutsideIf("elseif".to_string()));
}

#[test]
fn test_else_after_else() {
    let err =
        parse("<? if exists(\"a\") ?>A<? else ?>B<? else ?>C<? endif ?>").unwrap_err();
    assert_eq!(err, ParseError::AlternateAfterElse("else".to_string()));
}

#[test]
fn test_elseif_after_else() {
    let err = parse("<? if exists(\"a\") ?><? else ?><? elseif exists(\"b\") ?><? endif ?>")
        .unwrap_err();
    assert_eq!(err, ParseError::AlternateAfterElse("elseif".to_string()));
}

#[test]
fn test_unknown_function() {
    let err = parse("<? frobnicate(\"x\") ?>").unwrap_err();
    assert_eq!(err, ParseError::UnknownFunction("frobnicate".to_string()));
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn test_unknown_condition_function() {
    let err = parse("<? if frobnicate(\"x\") ?>A<? endif ?>").unwrap_err();
    assert_eq!(err, ParseError::UnknownFunction("frobnicate".to_string()));
}

#[test]
fn test_empty_directive() {
    let err = parse("<? ?>").unwrap_err();
    assert_eq!(err, ParseError::UnknownFunction(String::new()));
}

#[test]
fn test_function_missing_argument() {
    let test_cases = vec![
        "<? value ?>",
        "<? literal() ?>",
        "<? exists ?>",
        "<? reexists ?>",
        "<? isfirst ?>",
        "<? islast ?>",
    ];

    for input in test_cases {
        match parse(input) {
            Err(ParseError::MissingArgument(_)) => {}
            other => panic!("Expected MissingArgument, got {:?} for {}", other, input),
        }
    }
}

#[test]
fn test_foreach_without_quoted_variable() {
    let err = parse("<? foreach(tags) ?>x<? endforeach ?>").unwrap_err();
    assert_eq!(err, ParseError::EmptyLoopVariable);
}

#[test]
fn test_case_insensitive_commands() {
    assert!(parse("<? IF EXISTS(\"x\") ?>A<? ENDIF ?>").is_ok());
    assert!(parse("<? If Not Exists(\"x\") ?>A<? EndIf ?>").is_ok());
}
