mod common;

#[test]
fn bare_expression_is_auto_printed() {
    let (stdout, stderr) = common::run_repl(&["1 + 2;"]);

    assert_eq!(stderr, "");
    assert_eq!(stdout, "3\n");
}

#[test]
fn globals_persist_across_lines() {
    let (stdout, stderr) = common::run_repl(&["var a = 1;", "a = a + 1;", "a;"]);

    assert_eq!(stderr, "");
    assert_eq!(stdout, "2\n2\n");
}

#[test]
fn a_statement_with_no_value_prints_nothing() {
    let (stdout, stderr) = common::run_repl(&["var a = 1;", "print a;"]);

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\n");
}

#[test]
fn an_error_on_one_line_does_not_poison_the_next() {
    let (stdout, stderr) = common::run_repl(&["1 / 0;", "2 + 2;"]);

    assert!(stderr.contains("division by zero"));
    assert_eq!(stdout, "4\n");
}

#[test]
fn function_declared_in_one_line_is_callable_from_the_next() {
    let (stdout, stderr) = common::run_repl(&["fun square(n) { return n * n; }", "square(5);"]);

    assert_eq!(stderr, "");
    assert_eq!(stdout, "25\n");
}

/// A closure's nested variable reference resolves to a depth entry keyed by
/// an expression id from its own (now-finished) parse. A later line that
/// restarted its id counter at zero could collide with one of those stale
/// entries and resolve a plain global against the wrong depth.
#[test]
fn later_lines_do_not_collide_with_an_earlier_lines_resolved_ids() {
    let (stdout, stderr) = common::run_repl(&[
        "fun f() { var x = 0; fun g() { x = x + 1; } return g; }",
        "var p = 1; var q = 2; p; q;",
    ]);

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\n2\n");
}
