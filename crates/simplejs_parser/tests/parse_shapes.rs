use simplejs_lexer::{Lexer, normalize_source};
use simplejs_parser::{
    AssignOp, BinaryOp, CodeKind, Expr, MAX_NESTING_DEPTH, ParseResult, Parser, Stmt, UnaryOp,
    UpdateOp,
};

fn parse(src: &str) -> ParseResult {
    let normalized = normalize_source(src);
    let lex = Lexer::new(&normalized.text).lex();
    assert!(lex.diagnostics.is_empty(), "{:?}", lex.diagnostics);
    Parser::new(&normalized.text, &lex.tokens).parse()
}

/// Parse without requiring a clean lex, for inputs the lexer also complains about.
fn parse_lenient(src: &str) -> ParseResult {
    let normalized = normalize_source(src);
    let lex = Lexer::new(&normalized.text).lex();
    Parser::new(&normalized.text, &lex.tokens).parse()
}

fn single_expr(src: &str) -> Expr {
    let r = parse(src);
    assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
    match r.program.stmts() {
        [Stmt::Expr(e)] => e.clone(),
        other => panic!("expected one expression statement, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let e = single_expr("1 + 2 * 3");
    let Expr::Binary { op, right, .. } = e else {
        panic!("not binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn assignment_is_right_associative() {
    let e = single_expr("a = b += 1");
    let Expr::Assign(outer) = e else {
        panic!("not assign");
    };
    assert_eq!(outer.op, AssignOp::Set);
    let Expr::Assign(inner) = &outer.value else {
        panic!("inner not assign");
    };
    assert_eq!(inner.op, AssignOp::Add);
}

#[test]
fn typeof_binds_tighter_than_strict_equality() {
    let e = single_expr("typeof x === 'number'");
    let Expr::Binary { op, left, .. } = e else {
        panic!("not binary");
    };
    assert_eq!(op, BinaryOp::StrictEq);
    assert!(matches!(*left, Expr::Unary { op: UnaryOp::Typeof, .. }));
}

#[test]
fn member_call_and_index_chain() {
    let e = single_expr("a.b(1)[c].d");
    let Expr::Member(m) = e else {
        panic!("not member");
    };
    assert_eq!(m.field, "d");
    assert!(matches!(m.object, Expr::Index(_)));
}

#[test]
fn new_with_member_callee() {
    let e = single_expr("new ns.Point(1, 2)");
    let Expr::New(call) = e else {
        panic!("not new");
    };
    assert_eq!(call.args.len(), 2);
    assert!(matches!(call.callee, Expr::Member(_)));
}

#[test]
fn arrow_functions() {
    let Expr::Function(code) = single_expr("x => x + 1") else {
        panic!("not function");
    };
    assert_eq!(code.kind, CodeKind::Arrow);
    assert_eq!(&*code.params, &["x"]);
    assert!(matches!(&*code.body, [Stmt::Return(Some(_))]));

    let Expr::Function(code) = single_expr("(a, b) => { return a }") else {
        panic!("not function");
    };
    assert_eq!(code.params.len(), 2);
}

#[test]
fn postfix_and_prefix_update() {
    assert!(matches!(
        single_expr("i++"),
        Expr::Update { op: UpdateOp::Inc, prefix: false, .. }
    ));
    assert!(matches!(
        single_expr("--i"),
        Expr::Update { op: UpdateOp::Dec, prefix: true, .. }
    ));
}

#[test]
fn function_declaration_is_hoisted_into_program() {
    let r = parse("f()\nfunction f() { var inner = 1 }");
    assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
    assert_eq!(r.program.code.hoisted_funcs.len(), 1);
    assert_eq!(&*r.program.code.hoisted_vars, &["f"]);
}

#[test]
fn statements_split_on_newlines() {
    let r = parse("var a = 1\nvar b = a\nb");
    assert!(r.diagnostics.is_empty(), "{:?}", r.diagnostics);
    assert_eq!(r.program.stmts().len(), 3);
}

#[test]
fn object_literal_keys() {
    let Expr::Object(props) = single_expr("({a: 1, 'b c': 2, 3: 4, if: 5})") else {
        panic!("not object");
    };
    let keys: Vec<&str> = props.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["a", "b c", "3", "if"]);
}

#[test]
fn invalid_assignment_target_is_reported() {
    let r = parse("1 = 2");
    assert_eq!(r.diagnostics.len(), 1);
    assert!(r.diagnostics[0].message.contains("Invalid assignment target"));
}

#[test]
fn break_outside_loop_is_reported() {
    let r = parse("break");
    assert!(r.diagnostics.iter().any(|d| d.message.contains("Illegal break")));
    let r = parse("while (true) { function f() { continue } }");
    assert!(r.diagnostics.iter().any(|d| d.message.contains("Illegal continue")));
}

#[test]
fn try_requires_catch_or_finally() {
    let r = parse("try { }");
    assert!(r.diagnostics.iter().any(|d| d.message.contains("Missing catch or finally")));
}

#[test]
fn parser_recovers_after_error() {
    let r = parse("var = 1;\nvar ok = 2;");
    assert!(!r.diagnostics.is_empty());
    assert!(matches!(r.program.stmts()[0], Stmt::Error(_)));
    assert!(matches!(r.program.stmts()[1], Stmt::Var(_)));
}

#[test]
fn code_after_return_is_flagged_once() {
    let r = parse("function f() {\n  return 1\n  g()\n  h()\n}");
    let warnings: Vec<_> = r.diagnostics.iter().filter(|d| !d.is_error()).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, Some("W0001"));
}

#[test]
fn stray_closing_brace_at_top_level_is_reported_and_skipped() {
    let r = parse_lenient("}");
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].code, Some("E0005"));
    assert!(r.diagnostics[0].message.contains("Unexpected '}'"));

    let r = parse_lenient("var a = 1\n}\n}\nvar b = 2");
    assert_eq!(r.diagnostics.iter().filter(|d| d.code == Some("E0005")).count(), 2);
    let stmts = r.program.stmts();
    assert!(matches!(stmts.first(), Some(Stmt::Var(_))));
    assert!(matches!(stmts.last(), Some(Stmt::Var(_))));
}

#[test]
fn moderate_nesting_is_accepted() {
    let src = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert!(matches!(single_expr(&src), Expr::Number(_)));
    let chain = vec!["x"; 100].join(" + ");
    assert!(matches!(single_expr(&chain), Expr::Binary { .. }));
}

#[test]
fn excessive_nesting_is_reported_not_overflowed() {
    let nesting_error = |r: &ParseResult| {
        r.diagnostics
            .iter()
            .any(|d| d.code == Some("E0006") && d.message.contains(&MAX_NESTING_DEPTH.to_string()))
    };

    let parens = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert!(nesting_error(&parse(&parens)));

    let unary = format!("{}x", "!".repeat(20_000));
    assert!(nesting_error(&parse(&unary)));

    let blocks = format!("{}{}", "{".repeat(20_000), "}".repeat(20_000));
    assert!(nesting_error(&parse(&blocks)));

    let chain = vec!["1"; 20_000].join(" + ");
    assert!(nesting_error(&parse(&chain)));

    let members = format!("a{}", ".b".repeat(20_000));
    assert!(nesting_error(&parse(&members)));

    // Parsing continues with the next statement.
    let r = parse(&format!("{parens}\nvar after = 1"));
    assert!(nesting_error(&r));
    assert!(matches!(r.program.stmts().last(), Some(Stmt::Var(_))));
}
