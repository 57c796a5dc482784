//! Parser acceptance and rejection tests.

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::context::Context;
use crate::parser::options::ParseOptions;
use crate::{parse, parse_expression, parse_with_context};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_ok(src: &str, opts: &ParseOptions) -> Program {
    match parse(src, opts) {
        Ok(program) => program,
        Err(err) => panic!("{src:?} was rejected: {err}"),
    }
}

fn parse_err(src: &str, opts: &ParseOptions) -> ParseError {
    match parse(src, opts) {
        Ok(_) => panic!("{src:?} was accepted"),
        Err(err) => err,
    }
}

fn script(src: &str) -> Program {
    parse_ok(src, &ParseOptions::default())
}

fn module(src: &str) -> Program {
    parse_ok(src, &ParseOptions::module())
}

fn script_err(src: &str) -> ParseError {
    parse_err(src, &ParseOptions::default())
}

fn module_err(src: &str) -> ParseError {
    parse_err(src, &ParseOptions::module())
}

fn strict() -> ParseOptions {
    ParseOptions::default().with_strict(true)
}

fn no_web_compat() -> ParseOptions {
    ParseOptions::default().with_web_compat(false)
}

fn next() -> ParseOptions {
    ParseOptions::default().with_next(true)
}

fn stmt(program: &Program, index: usize) -> &Stmt {
    match &program.body[index] {
        ProgramItem::Stmt(stmt) => stmt,
        ProgramItem::ModuleDecl(decl) => panic!("expected a statement, found {decl:?}"),
    }
}

fn var_decl(program: &Program) -> &VarDecl {
    match stmt(program, 0) {
        Stmt::VarDecl(decl) => decl,
        other => panic!("expected a variable declaration, found {other:?}"),
    }
}

fn expr_stmt(program: &Program) -> &Expr {
    match stmt(program, 0) {
        Stmt::Expr(stmt) => &stmt.expr,
        other => panic!("expected an expression statement, found {other:?}"),
    }
}

fn ident_name(expr: &Expr) -> &str {
    match expr {
        Expr::Ident(id) => &id.name,
        other => panic!("expected an identifier, found {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations and patterns
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_array_pattern_declarators_with_locations() {
    let opts = ParseOptions::default().with_locations(true);
    let program = parse_ok("var [foo] = arr, bar = arr2;", &opts);
    let decl = var_decl(&program);
    assert_eq!(decl.kind, VarKind::Var);
    assert_eq!((decl.loc.start, decl.loc.end), (0, 28));
    let lines = decl.loc.lines.expect("locations requested");
    assert_eq!((lines.start.line, lines.start.column), (1, 0));
    assert_eq!((lines.end.line, lines.end.column), (1, 28));

    assert_eq!(decl.declarations.len(), 2);
    let first = &decl.declarations[0];
    let Pat::Array(arr) = &first.id else {
        panic!("expected an array pattern, found {:?}", first.id);
    };
    assert_eq!(arr.elements.len(), 1);
    assert!(matches!(&arr.elements[0], Some(Pat::Ident(id)) if id.name == "foo"));
    assert_eq!(ident_name(first.init.as_deref().expect("initializer")), "arr");

    let second = &decl.declarations[1];
    assert!(matches!(&second.id, Pat::Ident(id) if id.name == "bar"));
    assert_eq!(ident_name(second.init.as_deref().expect("initializer")), "arr2");
}

#[test]
fn test_object_pattern_shorthand_is_stable() {
    let first = script("var {x} = obj;");
    let Pat::Object(obj) = &var_decl(&first).declarations[0].id else {
        panic!("expected an object pattern");
    };
    assert_eq!(obj.properties.len(), 1);
    let ObjectPatProp::Prop(prop) = &obj.properties[0] else {
        panic!("expected a property");
    };
    assert!(prop.shorthand);
    assert!(matches!(&prop.value, Pat::Ident(id) if id.name == "x"));

    // The pattern's own source text parses to the same tree.
    let text = obj.loc.source_text("var {x} = obj;");
    assert_eq!(text, "{x}");
    let again = script(&format!("var {text} = obj;"));
    assert_eq!(first, again);
}

#[test]
fn test_object_pattern_defaults() {
    let program = script("var {x=1, y=2} = o");
    let Pat::Object(obj) = &var_decl(&program).declarations[0].id else {
        panic!("expected an object pattern");
    };
    let defaults: Vec<(String, f64)> = obj
        .properties
        .iter()
        .map(|prop| {
            let ObjectPatProp::Prop(prop) = prop else {
                panic!("unexpected rest element");
            };
            assert!(prop.shorthand);
            let Pat::Assign(assign) = &prop.value else {
                panic!("expected a default value");
            };
            let Pat::Ident(id) = assign.left.as_ref() else {
                panic!("expected an identifier target");
            };
            let Expr::Lit(Literal {
                value: LitValue::Num(n),
                ..
            }) = assign.right.as_ref()
            else {
                panic!("expected a numeric default");
            };
            (id.name.clone(), *n)
        })
        .collect();
    assert_eq!(defaults, vec![("x".to_string(), 1.0), ("y".to_string(), 2.0)]);
}

#[test]
fn test_reserved_words_rejected_as_bindings() {
    let words = [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with",
    ];
    for word in words {
        for src in [
            format!("var {word} = 1;"),
            format!("let {word} = 1;"),
            format!("const {word} = 1;"),
            format!("for (var {word} = x;;);"),
        ] {
            assert!(parse(&src, &ParseOptions::default()).is_err(), "{src:?} was accepted");
        }
    }
}

#[test]
fn test_escaped_keyword_rejected() {
    let err = script_err("var v\\u0061r = 1;");
    assert_eq!(err.message(), "Unexpected keyword 'var'");
    script_err("\\u0069f (x) {}");
}

#[test]
fn test_const_named_var_rejected() {
    let err = script_err("const var = 1;");
    assert_eq!(err.message(), "Unexpected keyword 'var'");
}

#[test]
fn test_strict_reserved_words() {
    script("var yield, let, static, implements;");
    let err = parse_err("var implements;", &strict());
    assert_eq!(err.message(), "The keyword 'implements' is reserved");
    parse_err("var yield;", &strict());
    script_err("let let = 1;");
}

#[test]
fn test_rest_element_must_be_last() {
    script_err("var [...a, ...b] = [];");
    let program = script("var [...a] = y");
    let Pat::Array(arr) = &var_decl(&program).declarations[0].id else {
        panic!("expected an array pattern");
    };
    assert_eq!(arr.elements.len(), 1);
    assert!(matches!(&arr.elements[0], Some(Pat::Rest(_))));
}

#[test]
fn test_declaration_initializers() {
    let err = script_err("const a;");
    assert_eq!(err.message(), "Missing initializer in const declaration");
    let err = script_err("let [a];");
    assert_eq!(
        err.message(),
        "Complex binding patterns require an initialization value"
    );
    script("let a, b = 1; var c;");
}

#[test]
fn test_let_declaration_detection() {
    let program = script("let\nx = 1");
    assert_eq!(var_decl(&program).kind, VarKind::Let);
    // `let` is an ordinary identifier in sloppy code.
    let program = script("let = 1; let in o;");
    assert_eq!(program.body.len(), 2);
    script_err("if (x) let [a] = b;");
}

// ─────────────────────────────────────────────────────────────────────────────
// Scopes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_var_let_redeclaration() {
    let err = script_err("var foo = 1; let foo = 1;");
    assert_eq!(err.message(), "Identifier 'foo' has already been declared");
    assert_eq!(err.offset(), 17);
    script("{ var foo = 1; } let foo = 1;");
    script_err("let foo; { var foo; }");
    script_err("let a; let a;");
    script("var a; var a;");
    script("let a; { let a; }");
}

#[test]
fn test_function_declarations_in_blocks() {
    script("{ function f() {} function f() {} }");
    parse_err("{ function f() {} function f() {} }", &strict());
    parse_err("{ function f() {} function f() {} }", &no_web_compat());
    script_err("{ let f; function f() {} }");
    script("function f() {} var f;");
}

#[test]
fn test_catch_parameter_scope() {
    script("try {} catch (e) { var e; }");
    script_err("try {} catch (e) { let e; }");
    script_err("try {} catch ([e]) { var e; }");
    script_err("try {} catch ([a, a]) {}");
    parse_err("try {} catch (e) { var e; }", &no_web_compat());
    script("try {} catch { } finally { }");
}

#[test]
fn test_parameters() {
    script("function f(a, a) {}");
    let err = parse_err("function f(a, a) {}", &strict());
    assert_eq!(err.message(), "Argument name clash");
    script_err("function f(a, [a]) {}");
    script_err("(a, a) => 1");
    script_err("function f(a) { let a; }");
    script("function f(a) { var a; }");
}

// ─────────────────────────────────────────────────────────────────────────────
// Cover grammar
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_destructuring_assignment() {
    let program = script("[a, b] = [b, a];");
    let Expr::Assign(assign) = expr_stmt(&program) else {
        panic!("expected an assignment");
    };
    assert!(matches!(assign.left, Pat::Array(_)));

    script("({a = 1} = o);");
    script("({a: (b)} = c);");
    script("(a) = 1;");
    script("({ a: b.c } = d);");
}

#[test]
fn test_shorthand_init_outside_pattern() {
    let err = script_err("({a = 1});");
    assert_eq!(
        err.message(),
        "Shorthand property assignments are valid only in destructuring patterns"
    );
    script_err("f({a = 1});");
    // A literal with a subscript applied is an expression, even inside a
    // pattern.
    for src in [
        "[{a = 1}.x] = 1;",
        "({a: {b = 1}.c} = 1);",
        "[{a = 1}[k]] = 1;",
        "[{a = 1}`t`] = 1;",
    ] {
        assert_eq!(
            script_err(src).message(),
            "Shorthand property assignments are valid only in destructuring patterns"
        );
    }
    assert_eq!(
        script_err("[{__proto__: 1, __proto__: 2}.x] = 1;").message(),
        "Redefinition of __proto__ property"
    );
    script("[{a = 1}, b.x] = 1;");
    script("({a: {b = 1}, c: d.e} = 1);");
}

#[test]
fn test_invalid_assignment_targets() {
    assert_eq!(script_err("(a + 1) = 2;").message(), "Assigning to rvalue");
    assert_eq!(script_err("({a}) = 1;").message(), "Assigning to rvalue");
    script_err("[...a, b] = c;");
    script_err("a + 1 += 2;");
    script_err("++a.b();");
    assert_eq!(
        script_err("a?.b = 1;").message(),
        "Optional chaining cannot appear in left-hand side"
    );
}

#[test]
fn test_arrow_parameters() {
    let program = script("(a, ...b) => b;");
    let Expr::Arrow(arrow) = expr_stmt(&program) else {
        panic!("expected an arrow function");
    };
    assert_eq!(arrow.params.len(), 2);
    assert!(matches!(arrow.params[1], Pat::Rest(_)));
    assert!(matches!(arrow.body, ArrowBody::Expr(_)));

    script("(a = 1, {b}, [c]) => {};");
    script("() => {};");
    assert_eq!(script_err("((a)) => a;").message(), "Parenthesized pattern");
    script_err("(a, ...b,) => b;");
    script_err("(a + b) => 1;");
    script_err("()");
}

#[test]
fn test_arrow_is_not_an_operand() {
    script_err("a => {} ? c : d;");
    script_err("(a) => {} ? b : c;");
    script_err("a => {}\n? c : d;");
    script_err("a => {} + 1;");
    script("(a => {}) ? b : c;");
    let program = script("a => b ? c : d;");
    let Expr::Arrow(arrow) = expr_stmt(&program) else {
        panic!("expected an arrow function");
    };
    assert!(matches!(&arrow.body, ArrowBody::Expr(body) if matches!(**body, Expr::Conditional(_))));
}

#[test]
fn test_async_arrows_and_calls() {
    let program = script("async x => x;");
    assert!(matches!(expr_stmt(&program), Expr::Arrow(a) if a.is_async));
    let program = script("async (x) => x;");
    assert!(matches!(expr_stmt(&program), Expr::Arrow(a) if a.is_async));
    let program = script("async(x);");
    assert!(matches!(expr_stmt(&program), Expr::Call(_)));
    script_err("async (await) => 1; async function f() {}");
}

#[test]
fn test_yield_and_await_in_arrow_defaults() {
    assert_eq!(
        script_err("function* g() { (x = yield) => 1; }").message(),
        "Yield expression cannot be a default value"
    );
    assert_eq!(
        script_err("async function f() { (x = await 1) => 1; }").message(),
        "Await expression cannot be a default value"
    );
    script("function* g() { (yield); }");
}

#[test]
fn test_yield_and_await_as_identifiers() {
    script("var yield; var await; yield = await;");
    script_err("function* g() { var yield; }");
    let err = script_err("async function f() { var await; }");
    assert_eq!(
        err.message(),
        "Cannot use 'await' as identifier inside an async function"
    );
    module_err("var await;");
    assert_eq!(
        module_err("function f() { var await; }").message(),
        "Cannot use keyword 'await' outside an async function"
    );
}

#[test]
fn test_proto_redefinition() {
    assert_eq!(
        script_err("({ __proto__: a, __proto__: b });").message(),
        "Redefinition of __proto__ property"
    );
    script("({ __proto__: a, __proto__: b } = c);");
    script("({ __proto__: a, ['__proto__']: b, __proto__() {} });");
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_operator_precedence() {
    let expr = parse_expression("a + b * c", &ParseOptions::default()).unwrap();
    let Expr::Binary(add) = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(add.op, BinaryOp::Add);
    assert!(matches!(add.right.as_ref(), Expr::Binary(mul) if mul.op == BinaryOp::Mul));

    let expr = parse_expression("a / b / c", &ParseOptions::default()).unwrap();
    let Expr::Binary(outer) = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(outer.op, BinaryOp::Div);
    assert!(matches!(outer.left.as_ref(), Expr::Binary(inner) if inner.op == BinaryOp::Div));
}

#[test]
fn test_coalesce_mixing() {
    script_err("a ?? b || c;");
    script_err("a && b ?? c;");
    script("(a ?? b) || c; a ?? (b && c);");
}

#[test]
fn test_exponent_operand() {
    script_err("-a ** 2;");
    script("(-a) ** 2; 2 ** -a; a ** b ** c;");
}

#[test]
fn test_regexp_literals() {
    let program = script("x = /re/g;");
    let Expr::Assign(assign) = expr_stmt(&program) else {
        panic!("expected an assignment");
    };
    let Expr::Lit(lit) = assign.right.as_ref() else {
        panic!("expected a literal");
    };
    assert_eq!(
        lit.value,
        LitValue::RegExp(RegExpLit {
            pattern: "re".into(),
            flags: "g".into(),
        })
    );
    let program = script("if (x) /re/.test(y);");
    let Stmt::If(stmt) = stmt(&program, 0) else {
        panic!("expected an if statement");
    };
    assert!(matches!(stmt.consequent.as_ref(), Stmt::Expr(_)));
}

#[test]
fn test_optional_chains() {
    let program = script("a?.b.c();");
    assert!(matches!(expr_stmt(&program), Expr::Chain(_)));
    script_err("new a?.b();");
    script_err("a?.b`c`;");
    script("(a?.b).c = 1;");
}

#[test]
fn test_templates() {
    let program = script("`a${b}c`;");
    let Expr::Template(tpl) = expr_stmt(&program) else {
        panic!("expected a template literal");
    };
    assert_eq!(tpl.quasis.len(), 2);
    assert_eq!(tpl.expressions.len(), 1);
    assert_eq!(tpl.quasis[0].cooked.as_deref(), Some("a"));
    assert!(tpl.quasis[1].tail);

    let program = script("tag`\\unicode`;");
    let Expr::TaggedTemplate(tagged) = expr_stmt(&program) else {
        panic!("expected a tagged template");
    };
    assert_eq!(tagged.quasi.quasis[0].cooked, None);
    assert_eq!(tagged.quasi.quasis[0].raw, "\\unicode");
    assert_eq!(
        script_err("`\\unicode`;").message(),
        "Bad escape sequence in untagged template literal"
    );
}

#[test]
fn test_object_literal_members() {
    script("({ a, b: 1, [c]: 2, d() {}, get e() {}, set e(v) {}, async f() {}, *g() {}, async *h() {}, ...i });");
    script("({ get: 1, set() {}, async: true, get() {} });");
    assert_eq!(
        script_err("({ get x(a) {} });").message(),
        "getter should have no params"
    );
    script_err("({ set x() {} });");
    script_err("({ if });");
}

#[test]
fn test_super_and_meta_properties() {
    script("({ m() { return super.x; } });");
    assert_eq!(
        script_err("function f() { super.x; }").message(),
        "'super' keyword outside a method"
    );
    script("function f() { return new.target; }");
    script_err("new.target;");
    module("import.meta.url;");
    assert_eq!(
        script_err("import.meta;").message(),
        "Cannot use 'import.meta' outside a module"
    );
    script("import('x').then(f);");
    module("new import.meta.x;");
    module("new import.meta();");
    assert_eq!(
        module_err("new import('x');").message(),
        "Cannot use new with import()"
    );
}

#[test]
fn test_delete_operand() {
    script("delete x;");
    assert_eq!(
        parse_err("delete x;", &strict()).message(),
        "Deleting local variable in strict mode"
    );
    parse_ok("delete x.y;", &strict());
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_return_outside_function() {
    assert_eq!(
        script_err("return 1;").message(),
        "'return' outside of function"
    );
    parse_ok(
        "return 1;",
        &ParseOptions::default().with_allow_return(true),
    );
    let program = script("function f() { return\nx }");
    let Stmt::FnDecl(func) = stmt(&program, 0) else {
        panic!("expected a function declaration");
    };
    assert!(matches!(&func.body.body[0], Stmt::Return(r) if r.argument.is_none()));
}

#[test]
fn test_break_and_continue() {
    assert_eq!(script_err("break;").message(), "Unsyntactic break");
    assert_eq!(script_err("continue;").message(), "Unsyntactic continue");
    script("while (1) break; do continue; while (0)");
    script("l: while (1) { continue l; }");
    script("l: { break l; }");
    script_err("l: { continue l; }");
    script_err("l: while (1) { function f() { break l; } }");
    script("a: b: while (1) continue a;");
    script_err("switch (x) { case 1: continue; }");
    script("switch (x) { case 1: break; }");
}

#[test]
fn test_labels() {
    assert_eq!(
        script_err("l: l: ;").message(),
        "Label 'l' is already declared"
    );
    script("l: ; l: ;");
    let program = script("l: for (;;) break l;");
    assert!(matches!(stmt(&program, 0), Stmt::Labeled(l) if l.label.name == "l"));
}

#[test]
fn test_switch_statement() {
    let program = script("switch (x) { case 1: a; b; default: c; case 2: }");
    let Stmt::Switch(sw) = stmt(&program, 0) else {
        panic!("expected a switch statement");
    };
    assert_eq!(sw.cases.len(), 3);
    assert_eq!(sw.cases[0].consequent.len(), 2);
    assert!(sw.cases[1].test.is_none());
    assert_eq!(
        script_err("switch (x) { default: default: }").message(),
        "Multiple default clauses"
    );
    script_err("switch (x) { case 1: let a; case 2: let a; }");
}

#[test]
fn test_try_and_throw() {
    assert_eq!(
        script_err("try {}").message(),
        "Missing catch or finally clause"
    );
    assert_eq!(
        script_err("throw\nx;").message(),
        "Illegal newline after throw"
    );
    script("try { throw x; } catch (e) {} finally {}");
}

#[test]
fn test_with_statement() {
    script("with (o) { x; }");
    assert_eq!(
        parse_err("with (o) {}", &strict()).message(),
        "'with' in strict mode"
    );
    module_err("with (o) {}");
}

#[test]
fn test_automatic_semicolon_insertion() {
    let program = script("a\n++b");
    assert_eq!(program.body.len(), 2);
    let program = script("a\n(b)");
    assert!(matches!(expr_stmt(&program), Expr::Call(_)));
    let program = script("do x; while (0) y");
    assert_eq!(program.body.len(), 2);
    script_err("a b");
}

#[test]
fn test_for_statements() {
    script("for (var i = 0; i < n; i++) ;");
    script("for (;;) break;");
    script("for (let x of y) ; for (const k in o) ; for ([a, b] of c) ; for (a.b in c) ;");
    script("for (let in x) ;");
    assert_eq!(
        script_err("for (let x = 1 of y) ;").message(),
        "for-of loop variable declaration may not have an initializer."
    );
    script("for (var x = 1 in y) ;");
    parse_err("for (var x = 1 in y) ;", &strict());
    script_err("for (let x, y of z) ;");
    script_err("for (let of x) ;");
    script("for (let [a] in b, c) ;");
    script_err("for (let [a] of b, c) ;");
    script_err("for ((a + b) of c) ;");
    script("for (let i = 0; ;) { let i; }");
    script("for (var i = 0, j = (a in b) ? 1 : 2; ;) ;");
    script_err("for (var i = 0, j = a in b; ;) ;");
}

#[test]
fn test_for_await() {
    let program = script("async function f() { for await (x of y) ; }");
    let Stmt::FnDecl(func) = stmt(&program, 0) else {
        panic!("expected a function declaration");
    };
    assert!(matches!(&func.body.body[0], Stmt::ForOf(f) if f.is_await));
    script_err("for await (x of y) ;");
    script_err("async function f() { for await (x in y) ; }");
    module("for await (const x of y) ;");
}

#[test]
fn test_annex_b_function_positions() {
    script("if (x) function f() {}");
    script("l: function f() {}");
    parse_err("if (x) function f() {}", &strict());
    parse_err("if (x) function f() {}", &no_web_compat());
    parse_err("l: function f() {}", &strict());
    script_err("while (x) function f() {}");
    script_err("if (x) function* g() {}");
    script_err("if (x) async function f() {}");
    script_err("if (x) class C {}");
    script_err("if (x) const y = 1;");
}

#[test]
fn test_legacy_octal() {
    script("010; 08; '\\07';");
    assert_eq!(
        parse_err("010;", &strict()).message(),
        "Octal literals are not allowed in strict mode"
    );
    parse_err("010;", &no_web_compat());
    script_err("'use strict'; '\\07';");
    script_err("'\\07'; 'use strict';");
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions and directives
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_use_strict_directive() {
    let program = script("'use strict'; x;");
    let Stmt::Expr(directive) = stmt(&program, 0) else {
        panic!("expected a directive");
    };
    assert_eq!(directive.directive.as_deref(), Some("use strict"));
    script_err("'use strict'; with (o) {}");
    script("function f() { 'use strict'; } with (o) {}");
    script_err("function f() { 'use strict'; with (o) {} }");
    let program = script("'a' + b; with (o) {}");
    let Stmt::Expr(first) = stmt(&program, 0) else {
        panic!("expected an expression statement");
    };
    assert_eq!(first.directive, None);
}

#[test]
fn test_retroactive_strictness() {
    assert_eq!(
        script_err("function eval() { 'use strict'; }").message(),
        "Binding eval in strict mode"
    );
    script_err("function f(arguments) { 'use strict'; }");
    script_err("function f(a, a) { 'use strict'; }");
    assert_eq!(
        script_err("function f(a = 1) { 'use strict'; }").message(),
        "Illegal 'use strict' directive in function with non-simple parameter list"
    );
}

#[test]
fn test_strict_assignment_to_eval() {
    assert_eq!(
        parse_err("eval = 1;", &strict()).message(),
        "Assigning to eval in strict mode"
    );
    script("eval = 1; arguments++;");
}

#[test]
fn test_generators_and_async_functions() {
    let program = script("function* g() { yield; yield* a; yield b; }");
    let Stmt::FnDecl(func) = stmt(&program, 0) else {
        panic!("expected a function declaration");
    };
    assert!(func.is_generator);
    assert_eq!(func.body.body.len(), 3);
    script("async function f() { await x; }");
    script("var f = async function () { await x; };");
    script_err("function f() { await x; }");
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_class_constructors() {
    assert_eq!(
        script_err("class A { constructor() {} constructor() {} }").message(),
        "Duplicate constructor in the same class"
    );
    script("class A extends B { constructor() { super(); } }");
    assert_eq!(
        script_err("class A { constructor() { super(); } }").message(),
        "super() call outside constructor of a subclass"
    );
    script_err("class A { get constructor() {} }");
    script_err("class A { *constructor() {} }");
    script("class A { static constructor() {} }");
}

#[test]
fn test_class_members() {
    let program = script(
        "class A { a = 1; static b; #c; static #d() {} get e() {} set e(v) {} static { this.f = 2; } }",
    );
    let Stmt::ClassDecl(class) = stmt(&program, 0) else {
        panic!("expected a class declaration");
    };
    assert_eq!(class.body.body.len(), 7);
    assert!(matches!(class.body.body[6], ClassMember::StaticBlock(_)));
    script("class A { static; get; set; async; static async *gen() {} 'constructor'() {} }");
    assert_eq!(
        script_err("class A { static prototype() {} }").message(),
        "Classes may not have a static property named prototype"
    );
    script_err("class A { constructor = 1; }");
    assert_eq!(
        script_err("class A { x = arguments; }").message(),
        "Cannot use 'arguments' in class field initializer"
    );
    script_err("class A { static { var await; } }");
    script_err("class A { m() { with (o) {} } }");
}

#[test]
fn test_private_names() {
    script("class A { #x; m() { return this.#x; } static has(o) { return #x in o; } }");
    script("class A { get #x() {} set #x(v) {} }");
    script("class A { #x; m() { class B { n() { return this.#x; } } } }");
    assert_eq!(
        script_err("class A { m() { this.#y; } }").message(),
        "Private field '#y' must be declared in an enclosing class"
    );
    assert_eq!(
        script_err("class A { #x; #x; }").message(),
        "Identifier '#x' has already been declared"
    );
    script_err("class A { get #x() {} static set #x(v) {} }");
    script_err("class A { #x; m() { delete this.#x; } }");
    script_err("this.#x;");
}

// ─────────────────────────────────────────────────────────────────────────────
// Modules
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_imports() {
    let program = module("import a, { b as c, \"d\" as e, default as f } from \"m\";");
    let ProgramItem::ModuleDecl(ModuleDecl::Import(import)) = &program.body[0] else {
        panic!("expected an import declaration");
    };
    assert_eq!(import.specifiers.len(), 4);
    assert!(matches!(&import.specifiers[0], ImportSpecifier::Default(s) if s.local.name == "a"));
    assert!(matches!(&import.source.value, LitValue::Str(s) if s == "m"));

    module("import * as ns from 'm'; import 'side-effect';");
    module("import json from './a.json' with { type: 'json' };");
    module_err("import a from 'm' with { type: 'json', type: 'css' };");
    module_err("import x from 'm'; let x;");
    module_err("import { if } from 'm';");
    module_err("import { 'a b' } from 'm';");
}

#[test]
fn test_exports() {
    module("export var a = 1; export let b; export const c = 2; export function d() {} export class E {}");
    module("export default function () {}");
    module("export default class {}");
    module("export default async function f() {}");
    module("export default a + b;");
    module("export * from 'm'; export * as ns from 'n'; export { x as y, 'a b' } from 'o';");
    module("import a from 'm'; export { a, a as default };");
    module("export { x }; var x;");
}

#[test]
fn test_export_errors() {
    assert_eq!(
        module_err("export { x };").message(),
        "Export 'x' is not defined"
    );
    assert_eq!(
        module_err("export default 1; export default 2;").message(),
        "Duplicate export 'default'"
    );
    assert_eq!(
        module_err("export var a; export { a };").message(),
        "Duplicate export 'a'"
    );
    module_err("export { 'a b' };");
    module_err("export { if };");
    module_err("export let;");
    module_err("{ export var a; }");
}

#[test]
fn test_module_goal() {
    assert_eq!(
        script_err("import a from 'm';").message(),
        "'import' and 'export' may appear only with 'sourceType: module'"
    );
    assert_eq!(
        module_err("{ import a from 'm'; }").message(),
        "'import' and 'export' may only appear at the top level"
    );
    let program = module("await x;");
    assert_eq!(program.source_type, SourceType::Module);
    script_err("await x;");
}

// ─────────────────────────────────────────────────────────────────────────────
// Next syntax
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_using_declarations() {
    let program = parse_ok("{ using x = f(); }", &next());
    let Stmt::Block(block) = stmt(&program, 0) else {
        panic!("expected a block");
    };
    assert!(matches!(&block.body[0], Stmt::VarDecl(d) if d.kind == VarKind::Using));
    assert_eq!(
        parse_err("using x = f();", &next()).message(),
        "Using declaration cannot appear in the top level when source type is `script`"
    );
    parse_ok("using x = f();", &ParseOptions::module().with_next(true));
    assert_eq!(
        parse_err("{ using x; }", &next()).message(),
        "Missing initializer in using declaration"
    );
    parse_err("{ using x = 1; let x; }", &next());
    script_err("{ using x = f(); }");
    parse_ok("{ using[a] = b; }", &next());
}

// ─────────────────────────────────────────────────────────────────────────────
// Output shape and entry points
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_ranges_option() {
    let program = parse_ok("a;\nb;", &ParseOptions::default().with_ranges(true));
    assert_eq!(program.loc.range, Some((0, 5)));
    assert_eq!(stmt(&program, 1).loc().range, Some((3, 5)));
    let program = script("a;");
    assert_eq!(program.loc.range, None);
    assert_eq!(program.loc.lines, None);
}

#[test]
fn test_program_span_covers_significant_text() {
    let src = "  // lead\nvar a = 1; /* mid */ f(a)  \n";
    let program = script(src);
    let first = stmt(&program, 0).loc();
    let last = stmt(&program, 1).loc();
    assert_eq!(&src[first.start..last.end], "var a = 1; /* mid */ f(a)");
}

#[test]
fn test_lexical_errors() {
    let err = script_err("'abc");
    assert!(err.is_lexical());
    assert_eq!(err.message(), "Unterminated string constant");
    assert!(script_err("`abc").is_lexical());
    assert!(!script_err("a b").is_lexical());
}

#[test]
fn test_unicode_identifiers() {
    script("var a\u{0301} = 1;");
    script("var a\\u0301 = 1;");
    script("var \u{2118} = 1;");
    script("var \u{309B} = 1;");
    assert!(script_err("var a\u{00B2} = 1;").is_lexical());
    assert!(script_err("var \\u0301 = 1;").is_lexical());
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = 5000;
    let open = |s: &str| s.repeat(depth);
    for src in [
        format!("x = {}1{};", open("["), open("]")),
        format!("{}x{};", open("("), open(")")),
        format!("{}{}", open("{"), open("}")),
        format!("{}x;", open("!")),
        format!("x = {}1;", open("a ** ")),
        format!("{}X;", open("new ")),
        format!("var {}a{} = x;", open("["), open("]")),
    ] {
        assert_eq!(script_err(&src).message(), "Maximum nesting depth exceeded");
    }
}

#[test]
fn test_moderate_nesting_parses() {
    script(&format!("x = {}1{};", "[".repeat(300), "]".repeat(300)));
    script(&format!("{}x{};", "(".repeat(300), ")".repeat(300)));
    script(&format!("[{}a{}] = x;", "[".repeat(300), "]".repeat(300)));
    // Operators of one precedence level chain without nesting.
    script(&format!("{}1;", "1 + ".repeat(1000)));
}

#[test]
fn test_hash_bang() {
    script("#!/usr/bin/env node\nx;");
    parse_err(
        "#!/usr/bin/env node\nx;",
        &ParseOptions::default().with_hash_bang(false),
    );
}

#[test]
fn test_parse_with_context_seeds_modes() {
    let opts = ParseOptions::default();
    script_err("await x;");
    parse_with_context("await x;", &opts, Context::IN_ASYNC).unwrap();
    assert!(parse_with_context("with (o) {}", &opts, Context::STRICT).is_err());
}

#[test]
fn test_parse_expression_entry_point() {
    let opts = ParseOptions::default();
    assert!(matches!(
        parse_expression("x => x", &opts).unwrap(),
        Expr::Arrow(_)
    ));
    assert!(parse_expression("a; b", &opts).is_err());
    assert!(parse_expression("", &opts).is_err());
}
