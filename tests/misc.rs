mod common;

#[test]
fn value_display_forms() {
    let (stdout, stderr) = common::run(
        r#"
        print nil;
        print true;
        print false;
        print 1;
        print 1.5;
        print "hi";
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "nil\ntrue\nfalse\n1\n1.5\nhi\n");
}

#[test]
fn fibonacci_sequence_via_a_while_loop() {
    let (stdout, stderr) = common::run(
        r#"
        var a = 0;
        var b = 1;
        var i = 0;
        while (i < 8) {
            print a;
            var temp = a;
            a = b;
            b = temp + b;
            i = i + 1;
        }
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "0\n1\n1\n2\n3\n5\n8\n13\n");
}

#[test]
fn scan_parse_and_runtime_errors_are_each_reported_distinctly() {
    let (_, scan_stderr) = common::run("print \"unterminated;");
    assert!(scan_stderr.contains("unterminated string"));

    let (_, parse_stderr) = common::run("print;");
    assert!(parse_stderr.contains("expect expression"));

    let (_, runtime_stderr) = common::run("print -\"not a number\";");
    assert!(runtime_stderr.contains("operand must be a number"));
}

#[test]
fn a_scan_error_anywhere_in_the_source_prevents_the_whole_program_from_running() {
    let (stdout, stderr) = common::run(
        r#"
        print 1;
        @
        print 2;
        "#,
    );

    assert!(stderr.contains("unexpected character '@'"));
    assert_eq!(stdout, "");
}

#[test]
fn multiple_scan_errors_in_one_run_are_all_reported() {
    let (stdout, stderr) = common::run("@ # $");

    assert!(stderr.contains("unexpected character '@'"));
    assert!(stderr.contains("unexpected character '#'"));
    assert!(stderr.contains("unexpected character '$'"));
    assert_eq!(stdout, "");
}

#[test]
fn closures_and_higher_order_functions_compose() {
    let (stdout, stderr) = common::run(
        r#"
        fun twice(f, x) {
            return f(f(x));
        }
        fun addOne(n) {
            return n + 1;
        }
        print twice(addOne, 10);
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "12\n");
}
