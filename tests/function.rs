mod common;

#[test]
fn recursive_fibonacci() {
    let (stdout, stderr) = common::run(
        r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "55\n");
}

#[test]
fn call_with_wrong_arity_is_a_runtime_error() {
    let (stdout, stderr) = common::run(
        r#"
        fun add(a, b) { return a + b; }
        add(1);
        "#,
    );

    assert_eq!(stdout, "");
    assert!(stderr.contains("expected 2 arguments but got 1"));
}

#[test]
fn calling_a_non_callable_value_is_a_runtime_error() {
    let (stdout, stderr) = common::run(
        r#"
        var notAFunction = 1;
        notAFunction();
        "#,
    );

    assert_eq!(stdout, "");
    assert!(stderr.contains("can only call functions and classes"));
}

#[test]
fn function_with_no_return_yields_nil() {
    let (stdout, stderr) = common::run(
        r#"
        fun doesNothing() {}
        print doesNothing();
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "nil\n");
}

#[test]
fn bare_return_yields_nil() {
    let (stdout, stderr) = common::run(
        r#"
        fun early() {
            return;
            print "unreachable";
        }
        print early();
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "nil\n");
}

#[test]
fn function_value_prints_its_name() {
    let (stdout, stderr) = common::run(
        r#"
        fun greet() {}
        print greet;
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "<fn greet>\n");
}

#[test]
fn native_clock_is_callable_with_no_arguments() {
    let (stdout, stderr) = common::run("print clock() >= 0;");

    assert_eq!(stderr, "");
    assert_eq!(stdout, "true\n");
}

#[test]
fn native_min_compares_numbers_and_strings() {
    let (stdout, stderr) = common::run(
        r#"
        print min(3, 1);
        print min("b", "a");
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\na\n");
}
