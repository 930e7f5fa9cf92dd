use lovelace_syntax::{
    ImportError, Node, NodeKind, Side, TokenKind, TokenizeError, TokenizerOptions, ValidationError, print_tree, stdlib,
    tokenize, tokenize_with,
};

fn position(node: &Node) -> (usize, usize) {
    (node.row, node.col)
}

#[test]
fn test_binary_operator() {
    let nodes = tokenize("1 and 0").unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].token(), TokenKind::And);
    assert_eq!(position(&nodes[0]), (3, 1));
    let NodeKind::And { lhs, rhs: Some(rhs) } = &nodes[0].kind else { panic!("expected a bound and") };
    assert_eq!(lhs.kind, NodeKind::Bool(true));
    assert_eq!(position(lhs), (1, 1));
    assert_eq!(rhs.kind, NodeKind::Bool(false));
    assert_eq!(position(rhs), (7, 1));
}

#[test]
fn test_assignment() {
    let nodes = tokenize("let a = 1").unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].kind, NodeKind::Assignment { names: vec!["a".into()] });
    assert_eq!(position(&nodes[0]), (1, 1));
    assert_eq!(nodes[1].kind, NodeKind::Bool(true));
    assert_eq!(position(&nodes[1]), (9, 1));

    let nodes = tokenize("let a _ b=foo").unwrap();
    assert_eq!(nodes[0].kind, NodeKind::Assignment { names: vec!["a".into(), "_".into(), "b".into()] });
    assert_eq!(nodes[1].kind, NodeKind::Identifier("foo".into()));
}

#[test]
fn test_block() {
    let nodes = tokenize(concat!(
        "block foo(a b) {\n",
        "    return a b\n",
        "}\n",
    ))
    .unwrap();
    assert_eq!(nodes.len(), 1);
    let NodeKind::Block(block) = &nodes[0].kind else { panic!("expected a block") };
    assert_eq!(block.name, "foo");
    assert_eq!(block.params, vec!["a", "b"]);
    assert_eq!(block.outputs, 2);
    assert_eq!(block.body.len(), 3);
    assert_eq!(block.body[0].kind, NodeKind::Return);
    assert_eq!(position(&block.body[0]), (5, 2));
    assert_eq!(position(&block.body[1]), (12, 2));
    assert_eq!(position(&block.body[2]), (14, 2));
}

#[test]
fn test_block_param_expansion() {
    let nodes = tokenize("block wide(a b[3]) {\n}").unwrap();
    let NodeKind::Block(block) = &nodes[0].kind else { panic!("expected a block") };
    assert_eq!(block.params, vec!["a", "b0", "b1", "b2"]);
    assert_eq!(block.inputs(), 4);
    assert_eq!(block.outputs, 0);
}

#[test]
fn test_invocation() {
    let nodes = tokenize("foo(a b 1)").unwrap();
    assert_eq!(nodes.len(), 1);
    let NodeKind::Invocation { name, args } = &nodes[0].kind else { panic!("expected an invocation") };
    assert_eq!(name, "foo");
    assert_eq!(position(&nodes[0]), (1, 1));
    let positions: Vec<_> = args.iter().map(position).collect();
    assert_eq!(positions, vec![(5, 1), (7, 1), (9, 1)]);
}

#[test]
fn test_groups_stay_groups() {
    let nodes = tokenize("(a) (b)").unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|node| node.token() == TokenKind::Group));
}

#[test]
fn test_unary_operator() {
    let nodes = tokenize("not (1 and 0)").unwrap();
    assert_eq!(nodes.len(), 1);
    let NodeKind::Not { rhs: Some(rhs) } = &nodes[0].kind else { panic!("expected a bound not") };
    let NodeKind::Group(children) = &rhs.kind else { panic!("expected a group operand") };
    assert_eq!(children[0].token(), TokenKind::And);
}

#[test]
fn test_keywords_need_word_boundary() {
    let nodes = tokenize("order android nothing returned").unwrap();
    let names: Vec<_> = nodes
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Identifier(name) => name.as_str(),
            _ => panic!("expected identifiers"),
        })
        .collect();
    assert_eq!(names, vec!["order", "android", "nothing", "returned"]);
}

#[test]
fn test_comments() {
    let nodes = tokenize("// hello \n1 /* I am a multiline\ncomment */").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].kind, NodeKind::Comment { text: "hello".into(), multiline: false });
    assert_eq!(nodes[1].kind, NodeKind::Bool(true));
    assert_eq!(nodes[2].kind, NodeKind::Comment { text: "I am a multiline\ncomment".into(), multiline: true });
}

#[test]
fn test_reserved_identifier() {
    assert_eq!(
        tokenize("a or let"),
        Err(TokenizeError::Validation { row: 6, col: 1, reason: ValidationError::ReservedIdentifier("let".into()) })
    );
}

#[test]
fn test_reserved_assignment() {
    assert_eq!(
        tokenize("let return = 1"),
        Err(TokenizeError::Validation { row: 1, col: 1, reason: ValidationError::ReservedAssignment("return".into()) })
    );
}

#[test]
fn test_non_expression_after_return() {
    let result = tokenize(concat!(
        "block foo(a) {\n",
        "    return a\n",
        "    let b = 1\n",
        "}\n",
    ));
    assert_eq!(
        result,
        Err(TokenizeError::Validation {
            row: 5,
            col: 3,
            reason: ValidationError::NonExpressionAfterReturn(TokenKind::Assignment),
        })
    );
}

#[test]
fn test_unopened_wrapper() {
    assert_eq!(tokenize("(1 or 0)) and (0 or 1)"), Err(TokenizeError::UnopenedWrapper { row: 9, col: 1 }));
}

#[test]
fn test_unclosed_wrapper() {
    assert_eq!(tokenize("(1 or 0) and (0"), Err(TokenizeError::Unclosed { extra: 1 }));
}

#[test]
fn test_mismatched_wrapper() {
    assert_eq!(
        tokenize("(1 }"),
        Err(TokenizeError::MismatchedWrapper { row: 4, col: 1, found: TokenKind::BlockEnd, open: TokenKind::Group })
    );
}

#[test]
fn test_no_match() {
    assert_eq!(tokenize("1 & 0"), Err(TokenizeError::NoMatch { row: 3, col: 1, excerpt: "& 0".into() }));
}

#[test]
fn test_missing_left_operand() {
    assert_eq!(tokenize("and 1"), Err(TokenizeError::MissingLeftOperand { token: TokenKind::And, row: 1, col: 1 }));
}

#[test]
fn test_missing_right_operand() {
    let Err(TokenizeError::Validation { reason, .. }) = tokenize("1 and") else { panic!("expected a validation error") };
    assert_eq!(reason, ValidationError::MissingOperand { token: TokenKind::And, side: Side::Right });

    // operands must be bare expressions; `not` binds its operand but is not one itself
    let Err(TokenizeError::Validation { reason, .. }) = tokenize("not not 1") else {
        panic!("expected a validation error")
    };
    assert_eq!(reason, ValidationError::MissingOperand { token: TokenKind::Not, side: Side::Right });
}

#[test]
fn test_import() {
    let nodes = tokenize("import adder\nlet s c = halfadder(1 0)").unwrap();
    let blocks: Vec<_> = nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Block(block) => Some(block.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(blocks, vec!["halfadder", "adder", "adder4", "twoscomplement4"]);
    assert!(nodes.iter().all(|node| node.token() != TokenKind::Import));
    assert_eq!(nodes.last().unwrap().token(), TokenKind::Invocation);
}

#[test]
fn test_import_errors() {
    let Err(TokenizeError::Import { reason, .. }) = tokenize("import ../secrets") else { panic!("expected an error") };
    assert_eq!(reason, ImportError::LocalPath);

    let options = TokenizerOptions { server_mode: true };
    let Err(TokenizeError::Import { reason, .. }) = tokenize_with("import ../secrets", &options) else {
        panic!("expected an error")
    };
    assert_eq!(reason, ImportError::ServerLocalPath);

    let Err(TokenizeError::Import { path, reason, .. }) = tokenize_with("import multiplier", &options) else {
        panic!("expected an error")
    };
    assert_eq!(path, "multiplier");
    assert_eq!(reason, ImportError::UnknownCollection);
}

#[test]
fn test_standard_library_tokenizes() {
    for (name, source) in stdlib::COLLECTIONS {
        let nodes = tokenize(source).unwrap_or_else(|error| panic!("{name}: {error}"));
        for node in &nodes {
            if let NodeKind::Block(block) = &node.kind {
                assert!(block.outputs > 0, "{name}: block {} returns nothing", block.name);
            }
        }
    }
}

#[test]
fn test_print_tree() {
    let mut buffer = Vec::new();
    print_tree(&mut buffer, &tokenize("1 and 0").unwrap()).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text, "OP_AND 3:1\n  LHS:BOOL 1:1 1\n  RHS:BOOL 7:1 0\n");
}
