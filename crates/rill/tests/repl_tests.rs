//! Behavior of the persistent REPL session across lines.

use pretty_assertions::assert_eq;
use rill::{CollectStringPrint, NoPrint, ReplError, ReplSession};

/// Executes a line that must succeed and returns what it printed.
fn run_line(session: &mut ReplSession, source: &str) -> String {
    let mut print = CollectStringPrint::new();
    session
        .execute(source, &mut print)
        .unwrap_or_else(|err| panic!("line {source:?} failed: {err}"));
    print.into_output()
}

#[test]
fn variables_persist_across_lines() {
    let mut session = ReplSession::new();
    run_line(&mut session, "var a = 10;");
    run_line(&mut session, "var b = 20;");
    assert_eq!(run_line(&mut session, "print a + b;"), "30\n");
}

#[test]
fn functions_defined_earlier_are_callable_later() {
    let mut session = ReplSession::new();
    run_line(&mut session, "fun double(n) { return n * 2; }");
    assert_eq!(run_line(&mut session, "print double(21);"), "42\n");
}

#[test]
fn closures_survive_the_line_that_made_them() {
    let mut session = ReplSession::new();
    run_line(
        &mut session,
        "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } var c = make();",
    );
    assert_eq!(run_line(&mut session, "print c();"), "1\n");
    assert_eq!(run_line(&mut session, "print c();"), "2\n");
}

#[test]
fn compile_errors_do_not_poison_the_session() {
    let mut session = ReplSession::new();
    run_line(&mut session, "var a = 1;");

    let err = session.execute("var = 2;", &mut NoPrint).expect_err("bad syntax");
    assert!(matches!(err, ReplError::Compile(_)));
    assert_eq!(
        err.to_string(),
        "[line 1] Error  at '=': Expected variable name."
    );

    // The session keeps working and keeps its state.
    assert_eq!(run_line(&mut session, "print a;"), "1\n");
}

#[test]
fn runtime_errors_keep_already_defined_state() {
    let mut session = ReplSession::new();
    run_line(&mut session, "var x = 5;");

    let err = session.execute("print missing;", &mut NoPrint).expect_err("undefined");
    assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 1]");

    assert_eq!(run_line(&mut session, "print x;"), "5\n");
}

#[test]
fn runtime_error_stops_the_rest_of_the_line() {
    let mut session = ReplSession::new();
    let mut print = CollectStringPrint::new();
    let err = session.execute("print \"first\"; print 1 + nil; print \"second\";", &mut print);
    assert!(matches!(err, Err(ReplError::Runtime(_))));
    assert_eq!(print.output(), "first\n");
}

#[test]
fn globals_defined_later_satisfy_earlier_functions() {
    let mut session = ReplSession::new();
    run_line(&mut session, "fun show() { print message; }");
    run_line(&mut session, "var message = \"hello\";");
    assert_eq!(run_line(&mut session, "show();"), "hello\n");
}

#[test]
fn identical_lines_do_not_confuse_resolution() {
    // The same source text parsed twice produces distinct nodes; each run
    // must see its own scope table entries.
    let mut session = ReplSession::new();
    assert_eq!(run_line(&mut session, "{ var a = 1; print a; }"), "1\n");
    assert_eq!(run_line(&mut session, "{ var a = 1; print a; }"), "1\n");
}

#[test]
fn top_level_return_is_rejected_per_line() {
    let mut session = ReplSession::new();
    let err = session.execute("return 1;", &mut NoPrint).expect_err("static error");
    assert!(matches!(err, ReplError::Compile(_)));
}

#[test]
fn list_variables_reports_definition_order() {
    let mut session = ReplSession::new();

    let initial = session.list_variables();
    assert_eq!(initial.len(), 1, "fresh session holds only the natives");
    assert_eq!(initial[0].0, "clock");
    assert_eq!(initial[0].1.to_string(), "<native fn>");

    run_line(&mut session, "var beta = 2;");
    run_line(&mut session, "var alpha = 1;");

    let vars = session.list_variables();
    let names: Vec<&str> = vars.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["clock", "beta", "alpha"]);

    let rendered: Vec<String> = session
        .list_variables()
        .iter()
        .skip(1)
        .map(|(_, value)| value.to_string())
        .collect();
    assert_eq!(rendered, vec!["2", "1"]);
}

#[test]
fn locals_never_leak_into_the_session() {
    let mut session = ReplSession::new();
    run_line(&mut session, "{ var hidden = 1; }");
    let err = session.execute("print hidden;", &mut NoPrint).expect_err("undefined");
    assert_eq!(err.to_string(), "Undefined variable 'hidden'.\n[line 1]");
}
