mod common;

#[test]
fn each_call_captures_independent_state() {
    let (stdout, stderr) = common::run(
        r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                print i;
            }
            return count;
        }

        var c1 = makeCounter();
        var c2 = makeCounter();
        c1();
        c1();
        c2();
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\n2\n1\n");
}

#[test]
fn nested_function_closes_over_outer_locals() {
    let (stdout, stderr) = common::run(
        r#"
        fun outer() {
            var x = "outside";
            fun inner() {
                print x;
            }
            inner();
        }
        outer();
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "outside\n");
}

#[test]
fn block_shadowing_does_not_leak_outward() {
    let (stdout, stderr) = common::run(
        r#"
        var a = 1;
        {
            var a = 2;
            print a;
        }
        print a;
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "2\n1\n");
}
