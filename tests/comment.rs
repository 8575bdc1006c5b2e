mod common;

#[test]
fn line_comment_is_ignored() {
    let (stdout, stderr) = common::run(
        r#"
        // this whole line does nothing
        print 1; // trailing comment
        "#,
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "1\n");
}

#[test]
fn block_comment_spans_multiple_lines() {
    let (stdout, stderr) = common::run(
        "/* this\n   spans\n   several lines */\nprint 2;",
    );

    assert_eq!(stderr, "");
    assert_eq!(stdout, "2\n");
}

#[test]
fn block_comments_nest() {
    let (stdout, stderr) = common::run("/* outer /* inner */ still outer */ print 3;");

    assert_eq!(stderr, "");
    assert_eq!(stdout, "3\n");
}

#[test]
fn unterminated_block_comment_is_a_scan_error() {
    let (stdout, stderr) = common::run("/* never closed");

    assert_eq!(stdout, "");
    assert!(stderr.contains("unterminated block comment"));
}
