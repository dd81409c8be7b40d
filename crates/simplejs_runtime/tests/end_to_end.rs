use simplejs_runtime::{ErrorKind, Interpreter, Value};

fn eval_in(interp: &mut Interpreter, src: &str) -> Value {
    match interp.eval(src) {
        Ok(v) => v,
        Err(e) => panic!("fatal error for {src:?}: {e}"),
    }
}

fn eval_number(src: &str) -> f64 {
    let mut interp = Interpreter::default();
    let v = eval_in(&mut interp, src);
    assert!(
        v.is_number(),
        "{src:?} produced {}",
        interp.to_string(v).unwrap()
    );
    v.as_number()
}

fn eval_display(src: &str) -> String {
    let mut interp = Interpreter::default();
    let v = eval_in(&mut interp, src);
    interp.to_string(v).unwrap()
}

fn eval_error(src: &str) -> (ErrorKind, String) {
    let mut interp = Interpreter::default();
    let v = eval_in(&mut interp, src);
    assert!(v.is_error(), "{src:?} did not throw");
    (
        interp.error_kind(v).unwrap(),
        interp.error_message(v).unwrap(),
    )
}

#[test]
fn arithmetic_and_completion_value() {
    assert_eq!(eval_number("1+2"), 3.0);
    assert_eq!(eval_number("var o={}; o.x=5; o.x"), 5.0);
    assert_eq!(eval_number("2 * (3 + 4) % 5"), 4.0);
    assert_eq!(eval_number("-7 / 2"), -3.5);
    assert_eq!(eval_display("var a = 1"), "undefined");
}

#[test]
fn unbound_identifier_is_reference_error() {
    let (kind, message) = eval_error("undefinedVar");
    assert_eq!(kind, ErrorKind::ReferenceError);
    assert_eq!(message, "undefinedVar is not defined");
}

#[test]
fn syntax_errors_become_syntax_error_values() {
    let (kind, message) = eval_error("var = 1");
    assert_eq!(kind, ErrorKind::SyntaxError);
    assert!(message.contains("(1:"), "{message}");
}

#[test]
fn closures_capture_their_scope() {
    let src = "
        function makeCounter() {
            var n = 0;
            return function() { n = n + 1; return n; };
        }
        var c = makeCounter();
        c(); c();
        c()
    ";
    assert_eq!(eval_number(src), 3.0);
}

#[test]
fn string_concatenation_and_number_formatting() {
    assert_eq!(eval_display("'a' + 1 + 2"), "a12");
    assert_eq!(eval_display("1 + 2 + 'a'"), "3a");
    assert_eq!(eval_display("0.1 + 0.2 + ''"), "0.30000000000000004");
    assert_eq!(eval_display("1 / 0 + ''"), "Infinity");
    assert_eq!(eval_display("'' + 1e21"), "1e+21");
    assert_eq!(eval_display("'x' + null + undefined + true"), "xnullundefinedtrue");
    assert_eq!(eval_number("'hello'.length"), 5.0);
    assert_eq!(eval_display("'abc'[1]"), "b");
}

#[test]
fn control_flow_statements() {
    assert_eq!(
        eval_number("var s = 0; for (var i = 0; i < 10; i++) { s += i } s"),
        45.0
    );
    assert_eq!(
        eval_number("var n = 0; while (true) { n++; if (n == 7) break; } n"),
        7.0
    );
    assert_eq!(
        eval_number("var s = 0; for (var i = 0; i < 10; i++) { if (i % 2 == 0) continue; s += i } s"),
        25.0
    );
    assert_eq!(eval_number("var k = 10; do { k++ } while (k < 5); k"), 11.0);
    assert_eq!(eval_number("var t = 1 < 2 ? 10 : 20; t"), 10.0);
}

#[test]
fn try_catch_finally() {
    let src = "
        var log = '';
        try {
            throw new TypeError('bad');
        } catch (e) {
            log = log + e.name + ':' + e.message;
        } finally {
            log = log + '!';
        }
        log
    ";
    assert_eq!(eval_display(src), "TypeError:bad!");
    assert_eq!(eval_number("try { throw 42 } catch (e) { e + 1 }"), 43.0);
    assert_eq!(
        eval_number("function f() { try { return 1 } finally { return 2 } } f()"),
        2.0
    );
    assert_eq!(
        eval_number("var e = 5; try { throw 1 } catch (e) { } e"),
        5.0
    );
}

#[test]
fn uncaught_primitive_throw_is_wrapped_in_an_error() {
    let (kind, message) = eval_error("throw 'boom'");
    assert_eq!(kind, ErrorKind::Error);
    assert_eq!(message, "boom");
}

#[test]
fn typeof_and_equality() {
    assert_eq!(eval_display("typeof undeclaredThing"), "undefined");
    assert_eq!(eval_display("typeof 1"), "number");
    assert_eq!(eval_display("typeof 'x'"), "string");
    assert_eq!(eval_display("typeof null"), "object");
    assert_eq!(eval_display("typeof function() {}"), "function");
    assert_eq!(eval_display("null == undefined"), "true");
    assert_eq!(eval_display("null === undefined"), "false");
    assert_eq!(eval_display("'1' == 1"), "true");
    assert_eq!(eval_display("'1' === 1"), "false");
    assert_eq!(eval_display("NaN == NaN"), "false");
    assert_eq!(eval_display("var o = {}; o === o"), "true");
}

#[test]
fn relational_comparison_of_strings_and_numbers() {
    assert_eq!(eval_display("'a' < 'b'"), "true");
    assert_eq!(eval_display("'10' < '9'"), "true");
    assert_eq!(eval_display("10 < 9"), "false");
    assert_eq!(eval_display("'10' < 9"), "false");
}

#[test]
fn constructors_and_prototype_methods() {
    let src = "
        function Point(x, y) { this.x = x; this.y = y; }
        Point.prototype.sum = function() { return this.x + this.y; };
        var p = new Point(2, 3);
        p.sum()
    ";
    assert_eq!(eval_number(src), 5.0);
    assert_eq!(
        eval_display("function P() {} var p = new P(); p.constructor === P"),
        "true"
    );
}

#[test]
fn arrow_functions_keep_the_defining_this() {
    let src = "
        function Box(v) { this.v = v; this.get = () => this.v; }
        var b = new Box(7);
        var g = b.get;
        g()
    ";
    assert_eq!(eval_number(src), 7.0);
}

#[test]
fn declarations_are_hoisted() {
    assert_eq!(eval_number("var r = g(); function g() { return 10 } r"), 10.0);
    assert_eq!(
        eval_display("var before = typeof x; var x = 5; before"),
        "undefined"
    );
}

#[test]
fn let_and_const_are_function_scoped() {
    assert_eq!(
        eval_number("function f() { if (true) { let a = 3 } return a } f()"),
        3.0
    );
}

#[test]
fn compound_assignment_and_update_expressions() {
    assert_eq!(eval_number("var i = 5; i += 2; i *= 3; i"), 21.0);
    assert_eq!(eval_number("var a = 1; var b = a++; b * 10 + a"), 12.0);
    assert_eq!(eval_number("var o = {n: 1}; ++o.n + o.n"), 4.0);
    assert_eq!(eval_number("var o = {}; o['k'] = 2; o.k -= 5; o.k"), -3.0);
}

#[test]
fn calling_a_non_function_is_a_type_error() {
    let (kind, message) = eval_error("var o = {}; o.f()");
    assert_eq!(kind, ErrorKind::TypeError);
    assert_eq!(message, "o.f is not a function");
}

#[test]
fn reading_a_property_of_undefined_is_a_type_error() {
    let (kind, message) = eval_error("var u; u.x");
    assert_eq!(kind, ErrorKind::TypeError);
    assert_eq!(message, "Cannot read properties of undefined (reading 'x')");
}

#[test]
fn error_constructors_work_without_new() {
    assert_eq!(
        eval_display("var e = RangeError('r'); e.name + '/' + e.message"),
        "RangeError/r"
    );
    assert_eq!(eval_display("'' + new Error('plain')"), "Error: plain");
}

#[test]
fn global_bindings() {
    assert_eq!(eval_display("Infinity > 1e308"), "true");
    assert_eq!(eval_display("NaN !== NaN"), "true");
    assert_eq!(eval_number("globalThis.answer = 42; answer"), 42.0);
    assert_eq!(eval_display("typeof undefined"), "undefined");
}

#[test]
fn assignment_to_an_undeclared_name_creates_a_global() {
    let mut interp = Interpreter::default();
    eval_in(&mut interp, "function f() { leaked = 9 } f()");
    let global = interp.global_object();
    assert_eq!(interp.get_property(global, "leaked").unwrap().as_number(), 9.0);
}

#[test]
fn state_persists_between_evaluations() {
    let mut interp = Interpreter::default();
    eval_in(&mut interp, "var total = 1; function bump(n) { total += n; return total }");
    eval_in(&mut interp, "bump(4)");
    let v = eval_in(&mut interp, "bump(5)");
    assert_eq!(v.as_number(), 10.0);
    assert_eq!(interp.call_depth(), 0);
}

#[test]
fn stray_closing_brace_is_a_syntax_error() {
    let (kind, _) = eval_error("}");
    assert_eq!(kind, ErrorKind::SyntaxError);
    let (kind, _) = eval_error("var a = 1\n}\na");
    assert_eq!(kind, ErrorKind::SyntaxError);
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let parens = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    let (kind, message) = eval_error(&parens);
    assert_eq!(kind, ErrorKind::SyntaxError);
    assert!(message.contains("Nesting exceeds"), "{message}");

    let (kind, _) = eval_error(&vec!["1"; 20_000].join(" + "));
    assert_eq!(kind, ErrorKind::SyntaxError);

    let nested = format!("{}7{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(eval_number(&nested), 7.0);
}

#[test]
fn bang_on_a_new_line_starts_a_new_statement() {
    assert_eq!(eval_display("var a = 1\n!a"), "false");
    assert_eq!(eval_display("var a = 1\na\n!= 2"), "true");
}

#[test]
fn string_indices_count_utf16_code_units() {
    assert_eq!(eval_number("'\u{1F600}'.length"), 2.0);
    assert_eq!(eval_display("'\u{1F600}'[0]"), "\u{FFFD}");
    assert_eq!(eval_display("'\u{1F600}'[1]"), "\u{FFFD}");
    assert_eq!(eval_display("typeof '\u{1F600}'[2]"), "undefined");
    assert_eq!(eval_display("'h\u{e9}\u{1F600}!'[4]"), "!");
    assert_eq!(eval_number("'h\u{e9}\u{1F600}!'.length"), 5.0);
}
