use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::{env, fs};

use scrawl::error::Error;
use scrawl::interpreter::evaluator::core::Interpreter;
use scrawl::interpreter::lexer::lex;
use scrawl::interpreter::parser::core::parse_program;
use walkdir::WalkDir;

/// Runs a script in a fresh interpreter with a captured output sink,
/// returning the result and everything the script printed.
fn run_capture(source: &str) -> (Result<(), Error>, String) {
    let sink: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    let out: Rc<RefCell<dyn Write>> = sink.clone();
    let result = (|| -> Result<(), Error> {
        let tokens = lex(source)?;
        let statements = parse_program(&tokens)?;
        let mut interpreter = Interpreter::with_output(out);
        interpreter.run(&statements)?;
        Ok(())
    })();
    let output = String::from_utf8(sink.borrow().clone()).expect("script output was not UTF-8");
    (result, output)
}

fn assert_output(source: &str, expected: &str) {
    let (result, output) = run_capture(source);
    if let Err(e) = result {
        panic!("Script failed: {e}\n{source}");
    }
    assert_eq!(output, expected, "for script:\n{source}");
}

fn assert_error_contains(source: &str, needle: &str) {
    let (result, _) = run_capture(source);
    match result {
        Ok(()) => panic!("Script succeeded but was expected to fail:\n{source}"),
        Err(e) => assert!(
            e.to_string().contains(needle),
            "expected error containing {needle:?}, got: {e}"
        ),
    }
}

#[test]
fn arithmetic_precedence() {
    assert_output("var x = 1 + 2 * 3; print(x);", "7\n");
    assert_output("print((1 + 2) * 3);", "9\n");
    assert_output("print(10 - 2 - 3);", "5\n");
}

#[test]
fn division_follows_ieee_semantics() {
    assert_output("print(1 / 0);", "inf\n");
    assert_output("print(-1 / 0);", "-inf\n");
    assert_output("print(0 / 0);", "NaN\n");
    assert_output("print(7 / 2);", "3.5\n");
}

#[test]
fn modulo_is_a_single_operator() {
    assert_output("print(7 % 4);", "3\n");
    assert_output("print(10 % 3 == 1);", "true\n");
}

#[test]
fn number_literals_and_stringification() {
    assert_output("print(2.5); print(3.0); print(NaN); print(infinity);", "2.5\n3\nNaN\ninf\n");
}

#[test]
fn string_concatenation_stringifies_either_side() {
    assert_output(r#"print("value: " + 3);"#, "value: 3\n");
    assert_output(r#"print(1 + "!");"#, "1!\n");
    assert_output(r#"print("a" + "b");"#, "ab\n");
}

#[test]
fn string_escape_is_decoded() {
    assert_output(r#"print("a\nb");"#, "a\nb\n");
    assert_output(r#"printRaw('single quoted');"#, "single quoted");
}

#[test]
fn list_literals_concatenation_and_printing() {
    assert_output("print([1, 2] + [3]);", "[1, 2, 3]\n");
    assert_output("print([]);", "[]\n");
    assert_output(r#"print([1, "two", true, nil]);"#, "[1, two, true, nil]\n");
}

#[test]
fn list_indexing_and_element_assignment() {
    assert_output("var xs = [10, 20, 30]; print(xs[1]);", "20\n");
    assert_output("var xs = [1, 2, 3]; xs[1] = 99; print(xs);", "[1, 99, 3]\n");
    assert_output("var xs = [1]; print(xs[0] + 1);", "2\n");
}

#[test]
fn lists_share_storage() {
    assert_output("var a = [1]; var b = a; b[0] = 2; print(a);", "[2]\n");
    assert_output(
        "fn touch(xs) { xs[0] = 9; } var a = [1, 2]; touch(a); print(a);",
        "[9, 2]\n",
    );
}

#[test]
fn equality_is_structural_and_nil_aware() {
    assert_output("print(nil == nil);", "true\n");
    assert_output("print(nil == 0);", "false\n");
    assert_output("print([1, 2] == [1, 2]);", "true\n");
    assert_output("print([1, 2] != [1, 3]);", "true\n");
    assert_output(r#"print("a" == "a");"#, "true\n");
    assert_output("print(1 == true);", "false\n");
}

#[test]
fn truthiness_only_rejects_nil_and_false() {
    assert_output(r#"if 0 { print("zero is truthy"); }"#, "zero is truthy\n");
    assert_output(r#"if "" { print("empty is truthy"); }"#, "empty is truthy\n");
    assert_output(r#"if nil { print("then"); } else { print("else"); }"#, "else\n");
    assert_output(r#"if false { print("then"); } else { print("else"); }"#, "else\n");
}

#[test]
fn logical_operators_require_booleans() {
    assert_output("print(true & false); print(false | true);", "false\ntrue\n");
    assert_error_contains("print(1 & true);", "Invalid types for '&'");
    assert_error_contains("print(true | 0);", "Invalid types for '|'");
}

#[test]
fn unary_operators() {
    assert_output("print(-3); print(!true); print(!false);", "-3\ntrue\nfalse\n");
    assert_output("print(--3);", "3\n");
    assert_error_contains("print(-true);", "Invalid type for '-'");
    assert_error_contains("print(!1);", "Invalid type for '!'");
}

#[test]
fn assignment_is_an_expression_yielding_nil() {
    assert_output("var a; print(a = 5); print(a);", "nil\n5\n");
    assert_output("var a; var b; a = b = 1; print(a); print(b);", "nil\n1\n");
}

#[test]
fn block_scoping_shadows_and_restores() {
    assert_output("var x = 1; { var x = 2; print(x); } print(x);", "2\n1\n");
    assert_output("var x = 1; { x = 2; } print(x);", "2\n");
}

#[test]
fn while_loop_with_break_and_continue() {
    assert_output(
        "var i = 0; while i < 5 { i = i + 1; if i == 3 { continue; } printRaw(i); }",
        "1245",
    );
    assert_output(
        "var i = 0; while true { if i == 4 { break; } i = i + 1; } print(i);",
        "4\n",
    );
}

#[test]
fn infinite_loop_with_break() {
    assert_output(
        "var i = 0; loop { if i == 3 { break; } i = i + 1; } print(i);",
        "3\n",
    );
}

#[test]
fn c_style_for_loop() {
    assert_output("for var i = 0; i < 3; i = i + 1 { print(i); }", "0\n1\n2\n");
    assert_output(
        "var total = 0; for var i = 1; i <= 4; i = i + 1 { total = total + i; } print(total);",
        "10\n",
    );
}

#[test]
fn for_each_loop() {
    assert_output("var xs = [10, 20, 30]; for var v in xs { print(v); }", "10\n20\n30\n");
    assert_output("for var v in [] { print(v); }", "");
}

#[test]
fn for_each_matches_hand_written_desugaring() {
    let sugared = "var xs = [1, 2, 3]; var total = 0; \
                   for var v in xs { total = total + v; } print(total);";
    let manual = "var xs = [1, 2, 3]; var total = 0; { \
                      var i = 0; \
                      while i < len(xs) { var v = xs[i]; total = total + v; i = i + 1; } \
                  } print(total);";
    let (_, sugared_out) = run_capture(sugared);
    let (_, manual_out) = run_capture(manual);
    assert_eq!(sugared_out, manual_out);
    assert_eq!(sugared_out, "6\n");
}

#[test]
fn break_inside_for_loops() {
    assert_output(
        "for var i = 0; i < 10; i = i + 1 { if i == 2 { break; } print(i); }",
        "0\n1\n",
    );
    assert_output(
        "for var v in [1, 2, 3, 4] { if v == 3 { break; } print(v); }",
        "1\n2\n",
    );
}

#[test]
fn functions_declare_and_call() {
    assert_output("fn add(a, b) { return a + b; } print(add(2, 5));", "7\n");
    assert_output("fn nothing() { } print(nothing());", "nil\n");
    assert_output("fn early() { return; print(1); } print(early());", "nil\n");
}

#[test]
fn recursion_through_self_binding() {
    assert_output(
        "fn fact(n) { if n == 0 { return 1; } return n * fact(n - 1); } print(fact(5));",
        "120\n",
    );
    assert_output(
        "fn fib(n) { if n < 2 { return n; } return fib(n - 1) + fib(n - 2); } print(fib(10));",
        "55\n",
    );
}

#[test]
fn functions_are_values() {
    assert_output(
        "fn greet(name) { return \"hi \" + name; } var g = greet; print(g(\"there\"));",
        "hi there\n",
    );
    assert_output("fn f(x) { return x; } print(f);", "fn f(x)\n");
    assert_output("print(print);", "<native fn print>\n");
}

#[test]
fn functions_do_not_close_over_locals() {
    // Call scopes are parented to globals, never to the declaration site.
    assert_error_contains(
        "var g = 1; fn f() { return g; } print(f());",
        "Undefined variable 'g'",
    );
}

#[test]
fn under_application_curries() {
    assert_output(
        "fn add(a, b) { return a + b; } var inc = add(1); print(inc(41));",
        "42\n",
    );
    assert_output(
        "fn add3(a, b, c) { return a + b + c; } var f = add3(1); var g = f(2); print(g(3));",
        "6\n",
    );
    assert_output(
        "fn add3(a, b, c) { return a + b + c; } var h = add3(1, 2); print(h(3));",
        "6\n",
    );
}

#[test]
fn curried_callables_are_reusable() {
    assert_output(
        "fn add(a, b) { return a + b; } var inc = add(1); print(inc(1)); print(inc(10));",
        "2\n11\n",
    );
}

#[test]
fn over_application_is_an_error() {
    assert_error_contains("print(1, 2);", "Incorrect argument count");
    assert_error_contains("fn f(a) { return a; } f(1, 2);", "Incorrect argument count");
}

#[test]
fn calling_a_non_function_is_an_error() {
    assert_error_contains("var x = 1; x();", "Cannot call non-function");
}

#[test]
fn control_flow_escapes_are_errors() {
    assert_error_contains("break;", "Can't break outside a loop");
    assert_error_contains("continue;", "Can't continue outside a loop");
    assert_error_contains("return 1;", "Can't return outside a function");
    // A break inside a function body does not cross the call boundary into
    // the caller's loop.
    assert_error_contains("fn f() { break; } loop { f(); }", "Can't break outside a loop");
}

#[test]
fn undefined_variables_are_errors() {
    assert_error_contains("print(missing);", "Undefined variable 'missing'");
    assert_error_contains("missing = 1;", "Undefined variable 'missing'");
}

#[test]
fn indexing_errors() {
    assert_error_contains("var a = 1; print(a[0]);", "Cannot index a non-iterable");
    assert_error_contains("var xs = [1]; print(xs[5]);", "Index out of bounds");
    assert_error_contains("var xs = [1]; print(xs[-1]);", "Index out of bounds");
    assert_error_contains("var xs = [1]; print(xs[true]);", "Cannot index with a non-number");
    assert_error_contains("var a = 1; a[0] = 2;", "Cannot index a non-iterable");
}

#[test]
fn index_truncates_fractional_numbers() {
    assert_output("var xs = [10, 20, 30]; print(xs[1.9]);", "20\n");
}

#[test]
fn module_access_requires_an_import() {
    assert_error_contains("var a = 1; a.b;", "Undefined or un-imported module");
    assert_error_contains("math.sqrt(4);", "Undefined or un-imported module");
}

#[test]
fn builtin_len() {
    assert_output("print(len([1, 2, 3]));", "3\n");
    assert_output(r#"print(len("abc"));"#, "3\n");
    assert_output("print(len([]));", "0\n");
    assert_error_contains("len(1);", "Expect a list");
}

#[test]
fn global_version_constant() {
    assert_output("print(VERSION);", "0.0.1\n");
}

#[test]
fn math_module() {
    assert_output("import math; print(math.sqrt(4));", "2\n");
    assert_output("import math; print(math.pow(2, 10));", "1024\n");
    assert_output("import math; print(math.log(1));", "0\n");
    assert_output("import math; print(math.cos(0));", "1\n");
    assert_output("import math; print(math.sin(0) + math.tan(0));", "0\n");
    assert_output("import math; print(math.exp(0));", "1\n");
    assert_output("import math; print(math.pi > 3.14 & math.pi < 3.15);", "true\n");
    assert_error_contains("import math; math.sqrt(\"4\");", "Expect a number");
}

#[test]
fn native_module_members_curry_too() {
    assert_output("import math; var square = math.pow; print(square(3, 2));", "9\n");
    assert_output("import math; var two_to = math.pow(2); print(two_to(8));", "256\n");
}

#[test]
fn os_module() {
    let expected = format!("{}\n", std::env::consts::OS);
    assert_output("import os; print(os.name);", &expected);
}

#[test]
fn unknown_import_is_an_error() {
    assert_error_contains("import nosuchmodule;", "Could not find import");
}

#[test]
fn io_module_round_trips_files() {
    let dir = env::temp_dir().join(format!("scrawl-io-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    let path = dir.join("out.txt");
    let path = path.to_str().expect("scratch path is not UTF-8");

    assert_output(
        &format!("import io; io.write('{path}', 'hello'); print(io.read('{path}'));"),
        "hello\n",
    );
    assert_output(
        &format!("import io; io.write('{path}', 'a'); io.append('{path}', 'b'); print(io.read('{path}'));"),
        "ab\n",
    );
    // Contents are stringified the way print would render them.
    assert_output(
        &format!("import io; io.write('{path}', 3.0); print(io.read('{path}'));"),
        "3\n",
    );
    assert_error_contains("import io; io.write(1, 'x');", "Filename must be a string");
    assert_error_contains("import io; io.write('/tmp/x', nil);", "Cannot write nil to a file");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn imports_resolve_from_the_working_directory() {
    let dir = env::temp_dir().join(format!("scrawl-imports-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    fs::write(
        dir.join("helpers.scr"),
        "var answer = 42;\nfn shout(word) { return word + \"!\"; }\nprint(\"loading helpers\");\n",
    )
    .expect("write module");
    fs::write(dir.join("first.scr"), "import second;\n").expect("write module");
    fs::write(dir.join("second.scr"), "import first;\n").expect("write module");

    let original = env::current_dir().expect("read cwd");
    env::set_current_dir(&dir).expect("enter scratch dir");

    // A sibling file import runs the module once and exposes its top level;
    // the module's own prints share the importer's sink.
    assert_output(
        "import helpers; print(helpers.answer); print(helpers.shout(\"hey\"));",
        "loading helpers\n42\nhey!\n",
    );

    assert_error_contains("import first;", "Circular import");
    assert_error_contains("import helpers; helpers.nope;", "Undefined variable 'nope'");

    env::set_current_dir(original).expect("restore cwd");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn nested_block_comments_are_skipped() {
    assert_output("/* outer /* inner */ still outer */ print(1);", "1\n");
    assert_output("// just a comment\nprint(2);", "2\n");
}

#[test]
fn diagnostics_point_at_the_offending_line() {
    let source = "var x = 1;\nprint(y);\nprint(x);";
    let error = scrawl::run_source(source).expect_err("script should fail");
    assert_eq!(error.position(), (2, 7));

    let mut rendered = Vec::new();
    scrawl::diagnostics::render(source, &error, &mut rendered).expect("render diagnostic");
    let text = String::from_utf8(rendered).expect("diagnostic was not UTF-8");
    assert!(text.contains("There was an error running your program"));
    assert!(text.contains("  1| var x = 1;"));
    assert!(text.contains("  2| print(y);"));
    assert!(text.contains("~~~~~~~~~~^"));
    assert!(text.contains("Message: Undefined variable 'y'"));
    assert!(text.contains("  3| print(x);"));
}

#[test]
fn demo_scripts_run() {
    let demos = concat!(env!("CARGO_MANIFEST_DIR"), "/demos");
    let mut count = 0;
    for entry in WalkDir::new(demos)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "scr"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        let (result, _) = run_capture(&source);
        if let Err(e) = result {
            panic!("Demo {path:?} failed: {e}");
        }
    }
    assert!(count > 0, "No demo scripts found in demos/");
}
