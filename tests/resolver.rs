mod common;

#[test]
fn reading_a_local_in_its_own_initializer_is_a_static_error() {
    let (stdout, stderr) = common::run(
        r#"
        var a = "outer";
        {
            var a = a;
        }
        "#,
    );

    assert_eq!(stdout, "");
    assert!(stderr.contains("can't read local variable in its own initialiser"));
}

#[test]
fn return_at_top_level_is_a_static_error() {
    let (stdout, stderr) = common::run("return 1;");

    assert_eq!(stdout, "");
    assert!(stderr.contains("can't return from top-level code"));
}

#[test]
fn return_inside_nested_function_is_fine() {
    let (stdout, stderr) = common::run(
        r#"
        fun outer() {
            fun inner() { return 1; }
            print inner();
        }
        outer();
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\n");
}

#[test]
fn shadowing_a_parameter_with_a_local_resolves_to_the_innermost() {
    let (stdout, stderr) = common::run(
        r#"
        fun f(x) {
            {
                var x = x + 1;
                print x;
            }
            print x;
        }
        f(1);
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "2\n1\n");
}
