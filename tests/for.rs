mod common;

#[test]
fn counts_up_with_all_three_clauses() {
    let (stdout, stderr) = common::run("for (var i = 0; i < 3; i = i + 1) print i;");

    assert_eq!(stderr, "");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn accumulates_a_string_across_iterations() {
    let (stdout, stderr) = common::run(
        r#"
        var s = "";
        for (var i = 0; i < 3; i = i + 1) s = s + "a";
        print s;
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "aaa\n");
}

#[test]
fn missing_initializer_still_runs() {
    let (stdout, stderr) = common::run(
        r#"
        var i = 0;
        for (; i < 2; i = i + 1) print i;
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "0\n1\n");
}

#[test]
fn missing_condition_relies_on_break() {
    let (stdout, stderr) = common::run(
        r#"
        var i = 0;
        for (;;) {
            if (i >= 3) break;
            print i;
            i = i + 1;
        }
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "0\n1\n2\n");
}

#[test]
fn initializer_variable_is_scoped_to_the_loop() {
    let (stdout, stderr) = common::run(
        r#"
        for (var i = 0; i < 1; i = i + 1) {}
        print i;
        "#,
    );

    assert_eq!(stdout, "");
    assert!(stderr.contains("undefined variable 'i'"));
}
